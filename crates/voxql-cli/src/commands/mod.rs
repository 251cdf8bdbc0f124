use voxql_config::VoxConfig;

use crate::cli::{Commands, GlobalFlags};

pub mod ask;
pub mod run;
pub mod schema;
pub mod serve;
pub mod sql;
pub mod transcribe;

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Commands,
    config: VoxConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Serve(args) => serve::handle(&args, config).await,
        Commands::Transcribe(args) => transcribe::handle(&args, &config, flags).await,
        Commands::Ask(args) => ask::handle(&args, &config, flags).await,
        Commands::Run(args) => run::handle(&args, &config, flags).await,
        Commands::Sql(args) => sql::handle(&args, &config, flags).await,
        Commands::Schema => schema::handle(&config, flags).await,
    }
}
