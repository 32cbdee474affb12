use thiserror::Error;

#[derive(Error, Debug)]
pub enum MLServiceError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(reqwest::Error),

    #[error("ML service did not respond in time")]
    Timeout,

    #[error("ML service returned status {status}{}", fmt_detail(.detail))]
    UpstreamStatus { status: u16, detail: Option<String> },

    #[error("ML service returned empty response")]
    EmptyResponse,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl MLServiceError {
    /// Timeouts get their own variant; every other transport failure is `RequestFailed`.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MLServiceError::Timeout
        } else {
            MLServiceError::RequestFailed(err)
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, MLServiceError::RequestFailed(_) | MLServiceError::Timeout)
    }
}

fn fmt_detail(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

pub type MLResult<T> = Result<T, MLServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_message() {
        let err = MLServiceError::UpstreamStatus {
            status: 503,
            detail: Some("model not loaded".into()),
        };
        assert_eq!(err.to_string(), "ML service returned status 503: model not loaded");

        let err = MLServiceError::UpstreamStatus { status: 500, detail: None };
        assert_eq!(err.to_string(), "ML service returned status 500");
    }

    #[test]
    fn test_transport_classification() {
        assert!(MLServiceError::Timeout.is_transport());
        assert!(!MLServiceError::EmptyResponse.is_transport());
        assert!(!MLServiceError::InvalidResponse("bad".into()).is_transport());
    }
}
