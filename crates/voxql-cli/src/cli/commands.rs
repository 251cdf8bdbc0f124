use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server.
    Serve(ServeArgs),
    /// Transcribe an audio file.
    Transcribe(AudioArgs),
    /// Ask a question in text; prints the generated SQL and its rows.
    Ask(AskArgs),
    /// Transcribe an audio file, then answer it.
    Run(AudioArgs),
    /// Run a SQL statement directly against the dataset.
    Sql(SqlArgs),
    /// Show the loaded table's columns next to the configured schema text.
    Schema,
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Bind host (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides server.port)
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Clone, Debug, Args)]
pub struct AudioArgs {
    /// Path to the audio file
    pub audio: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct AskArgs {
    /// The request, in plain words
    pub text: String,
}

#[derive(Clone, Debug, Args)]
pub struct SqlArgs {
    /// SQL statement to execute
    pub statement: String,
}
