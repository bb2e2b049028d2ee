//! Error taxonomy for the analysis core.

use thiserror::Error;

/// Errors raised by the analysis core.
///
/// `MalformedInput` rejects a whole request. `InsufficientData` is soft: callers
/// treat it as "indicators unavailable" and the scorer degrades to HOLD.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("insufficient data: need at least {required} candles, got {actual}")]
    InsufficientData { required: usize, actual: usize },
}

impl AnalysisError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_counts() {
        let err = AnalysisError::InsufficientData {
            required: 20,
            actual: 7,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 20 candles, got 7"
        );
        assert!(err.is_insufficient_data());
        assert!(!AnalysisError::malformed("bad").is_insufficient_data());
    }
}
