/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the pipeline
/// can handle failures consistently (user-facing reply vs recovered locally).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// A t.co link could not be unshortened. Always recovered locally.
    #[error("link resolution failed: {0}")]
    Resolution(String),

    /// Metadata HTTP failure or an unparseable extraction-service response.
    #[error("HTTP error: {0}")]
    Fetch(String),

    /// Structured error reported by the extraction service itself.
    #[error("API returned error: {0}")]
    Api(String),

    /// The chat platform rejected a send, or the transfer failed midway.
    #[error("delivery error: {0}")]
    Delivery(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Short reply shown to the user when one tweet fails to process.
    ///
    /// Full detail goes to the server log; the chat only gets the error kind.
    pub fn user_reply(&self) -> String {
        match self {
            Error::Fetch(msg) => format!("HTTP Error: {msg}"),
            Error::Api(msg) => format!("API Exception: {msg}"),
            Error::Delivery(_) => "Error occurred when trying to send media.".to_string(),
            _ => "An unexpected error occurred.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
