use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurveyPrintError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("stylesheet error: {0}")]
    Stylesheet(String),
    #[error("invalid report input: {0}")]
    Input(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn io_errors_keep_their_source() {
        let err = SurveyPrintError::from(std::io::Error::other("disk gone"));
        assert_eq!(err.to_string(), "io error: disk gone");
        assert!(err.source().is_some());
    }

    #[test]
    fn configuration_errors_have_no_source() {
        let err = SurveyPrintError::InvalidConfiguration("photos_per_page must be >= 1".into());
        assert!(err.source().is_none());
        assert!(err.to_string().starts_with("invalid configuration"));
    }
}
