//! Survey domain errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurveyError {
    /// The model kept issuing directives without a text answer.
    #[error("no answer after {rounds} directive rounds")]
    LoopExceeded { rounds: u32 },

    /// The model returned neither text nor directives.
    #[error("model returned an empty answer")]
    EmptyAnswer,

    /// Directive addressed a field outside the registry.
    #[error("field index {index} out of range (registry has {len} fields)")]
    InvalidFieldIndex { index: i64, len: usize },
}

impl SurveyError {
    pub fn loop_exceeded(rounds: u32) -> Self {
        Self::LoopExceeded { rounds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_display() {
        assert_eq!(
            SurveyError::loop_exceeded(3).to_string(),
            "no answer after 3 directive rounds"
        );
        assert_eq!(
            SurveyError::InvalidFieldIndex { index: -1, len: 2 }.to_string(),
            "field index -1 out of range (registry has 2 fields)"
        );
    }
}
