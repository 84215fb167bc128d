use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaperdeskError {
    /// Required input missing or rejected locally. Never reaches the network.
    #[error("{title}: {message}")]
    Validation { title: String, message: String },

    /// Network unreachable, or a response that could not be read.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered `success: false`.
    #[error("Backend error: {0}")]
    Application(String),

    /// The LaTeX render endpoint rejected the document.
    #[error("Render error: {0}")]
    Render(String),

    /// A `success: true` response whose payload does not have the expected shape.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PaperdeskError {
    pub fn validation(title: impl Into<String>, message: impl Into<String>) -> Self {
        PaperdeskError::Validation {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Text shown to the user in a failure notice.
    ///
    /// Backend-reported messages and render logs pass through verbatim;
    /// everything else is shown with its category prefix.
    pub fn user_message(&self) -> String {
        match self {
            PaperdeskError::Validation { message, .. } => message.clone(),
            PaperdeskError::Application(msg) | PaperdeskError::Render(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, PaperdeskError::Validation { .. })
    }
}

pub type Result<T> = std::result::Result<T, PaperdeskError>;
