use serde::{Deserialize, Serialize};

/// Where a tool is in its submit cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Busy,
    Success,
    Error,
}

impl Status {
    pub fn is_settled(&self) -> bool {
        matches!(self, Status::Success | Status::Error)
    }
}

/// Lifecycle of the most recent request a tool issued.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestState {
    pub status: Status,
    pub error_message: Option<String>,
}

impl RequestState {
    pub fn busy() -> Self {
        Self {
            status: Status::Busy,
            error_message: None,
        }
    }

    pub fn success() -> Self {
        Self {
            status: Status::Success,
            error_message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            error_message: Some(message.into()),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.status == Status::Busy
    }
}
