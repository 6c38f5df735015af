use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// A row read from a settings table couldn't be turned into a settings record.
    ///
    /// Happens when the row is not an object or its ID column is missing, negative or
    /// not numeric.
    #[error("Malformed row in {table}: {reason}")]
    MalformedSettingsRow {
        /// Table the row was read from
        table: &'static str,
        /// What was wrong with the row
        reason: String,
    },
}
