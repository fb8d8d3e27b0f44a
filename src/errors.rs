use reqwest::StatusCode;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network failure or a server-side fault; the same call may succeed later.
    Transient,
    /// The server refused the request (4xx).
    Rejected,
    /// The response could not be decoded.
    Malformed,
    /// A local precondition failed and nothing was sent.
    Invalid,
}

impl FailureKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Transient => "transient",
            Self::Rejected => "rejected",
            Self::Malformed => "malformed",
            Self::Invalid => "invalid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncError {
    pub kind: FailureKind,
    pub status: Option<StatusCode>,
    pub message: String,
}

impl SyncError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transient,
            status: None,
            message: message.into(),
        }
    }

    pub fn malformed(err: impl std::error::Error) -> Self {
        Self {
            kind: FailureKind::Malformed,
            status: None,
            message: err.to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Invalid,
            status: None,
            message: message.into(),
        }
    }

    /// Classifies a non-success response by its status code.
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let kind = if status.is_client_error() {
            FailureKind::Rejected
        } else {
            FailureKind::Transient
        };
        Self {
            kind,
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind == FailureKind::Transient
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({status}): {}", self.kind.label(), self.message),
            None => write!(f, "{}: {}", self.kind.label(), self.message),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::malformed(err);
        }
        match err.status() {
            Some(status) => Self::from_status(status, err.to_string()),
            None => Self::transient(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_rejections() {
        let err = SyncError::from_status(StatusCode::BAD_REQUEST, "Already exists");
        assert_eq!(err.kind, FailureKind::Rejected);
        assert_eq!(err.to_string(), "rejected (400 Bad Request): Already exists");
    }

    #[test]
    fn server_errors_are_transient() {
        let err = SyncError::from_status(StatusCode::SERVICE_UNAVAILABLE, "down");
        assert!(err.is_transient());
    }

    #[test]
    fn json_failures_are_malformed() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = SyncError::from(parse);
        assert_eq!(err.kind, FailureKind::Malformed);
        assert!(err.status.is_none());
    }
}
