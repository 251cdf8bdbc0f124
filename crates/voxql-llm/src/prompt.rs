//! Prompt assembly.

/// Instructions sent ahead of every request.
pub const SYSTEM_PROMPT: &str = "\
You are an Intelligent SQL Query Writer for DUCKDB. Respond only in fenced code blocks as
```sql your_sql_query ```.
User will give a simple table schema and requirement in words.
<task>
- Analyze the user request and write a meaningful SQL query based on the requirements.
</task>";

/// The three ordered parts of a generation request: system instructions,
/// schema description, user request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    system: String,
    schema: String,
    user: String,
}

impl Prompt {
    /// Build a prompt with the standard instructions.
    ///
    /// `user_text` is passed through as-is, even when empty.
    #[must_use]
    pub fn new(schema_description: &str, user_text: &str) -> Self {
        Self {
            system: SYSTEM_PROMPT.to_string(),
            schema: format!("Table Schema: {}", schema_description.trim()),
            user: user_text.to_string(),
        }
    }

    /// Replace the system instructions.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }

    #[must_use]
    pub fn system(&self) -> &str {
        &self.system
    }

    /// The `Table Schema: ...` part.
    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// All parts in send order.
    #[must_use]
    pub fn parts(&self) -> [&str; 3] {
        [&self.system, &self.schema, &self.user]
    }
}
