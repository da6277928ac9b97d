//! Error hierarchy for loop simulations
//!
//! Every fallible operation in the crate returns [`LoopResult`]. Numerical
//! degradation that the model tolerates (an adaptive step that did not meet
//! its tolerance, initial conditions that did not reach the requested
//! precision) is reported through `log::warn!` instead.

use thiserror::Error;

/// Root error type for all loop simulation failures.
#[derive(Error, Debug)]
pub enum LoopError {
    /// Missing, malformed or inconsistent configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Reading a configuration file or writing results failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// NaN or Inf appeared in the integrated state.
    #[error("numerical error: {0}")]
    Numerical(String),

    /// A lifecycle operation was called out of order.
    #[error("lifecycle error: {0}")]
    Lifecycle(String),

    /// The caller-imposed step ceiling was reached before `total_time`.
    #[error("step limit reached: {limit} steps taken before the end of the simulation")]
    StepLimit { limit: usize },
}

pub type LoopResult<T> = Result<T, LoopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let error = LoopError::Config("tau must be > 0".to_string());
        assert_eq!(error.to_string(), "config error: tau must be > 0");

        let error = LoopError::StepLimit { limit: 10 };
        assert!(error.to_string().contains("10 steps"));
    }

    #[test]
    fn test_io_conversion() {
        fn open_missing() -> LoopResult<std::fs::File> {
            Ok(std::fs::File::open("/definitely/not/here.json")?)
        }

        assert!(matches!(open_missing(), Err(LoopError::Io(_))));
    }
}
