//! Domain error types.
//!
//! Only conditions that stop a run are errors. Insufficient cash, insufficient
//! shares and undefined indicator values are ordinary outcomes and never show up
//! here.

/// Top-level error type for trendtrader.
#[derive(Debug, thiserror::Error)]
pub enum TraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error for {symbol}: {reason}")]
    DataSource { symbol: String, reason: String },

    #[error("no valid price data retrieved for any instrument")]
    NoValidData,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TraderError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        TraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Process exit status for this error category.
    pub fn exit_status(&self) -> u8 {
        match self {
            TraderError::Io(_) => 1,
            TraderError::ConfigParse { .. }
            | TraderError::ConfigMissing { .. }
            | TraderError::ConfigInvalid { .. } => 2,
            TraderError::DataSource { .. } => 3,
            TraderError::NoValidData => 5,
        }
    }
}

impl From<&TraderError> for std::process::ExitCode {
    fn from(err: &TraderError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_invalid_message() {
        let err = TraderError::invalid("strategy", "short_window", "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid config value [strategy] short_window: must be positive"
        );
    }

    #[test]
    fn no_valid_data_message() {
        assert_eq!(
            TraderError::NoValidData.to_string(),
            "no valid price data retrieved for any instrument"
        );
    }

    #[test]
    fn exit_codes_by_category() {
        let cases = [
            (TraderError::Io(std::io::Error::other("boom")), 1),
            (
                TraderError::ConfigMissing {
                    section: "backtest".into(),
                    key: "symbols".into(),
                },
                2,
            ),
            (
                TraderError::DataSource {
                    symbol: "AAPL".into(),
                    reason: "bad row".into(),
                },
                3,
            ),
            (TraderError::NoValidData, 5),
        ];
        for (err, expected) in cases {
            assert_eq!(err.exit_status(), expected, "{err}");
        }
    }
}
