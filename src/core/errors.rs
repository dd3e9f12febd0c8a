//! CALM-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, CalmError>;

/// Top-level error type for calmkit.
///
/// The SOS controller never returns these: its entry points degrade to no-ops.
/// They surface from configuration, persistence, widget bootstrap and the CLI.
#[derive(Debug, Error)]
pub enum CalmError {
    #[error("[CALM-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[CALM-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[CALM-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[CALM-2001] unknown action {input:?}: {details}")]
    UnknownAction { input: String, details: String },

    #[error("[CALM-2002] invalid scenario step {line}: {details}")]
    Scenario { line: usize, details: String },

    #[error("[CALM-2003] invalid input for {field}: {details}")]
    InvalidInput {
        field: &'static str,
        details: String,
    },

    #[error("[CALM-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[CALM-2201] widget {widget} failed to initialise: {details}")]
    WidgetInit {
        widget: &'static str,
        details: String,
    },

    #[error("[CALM-3001] stored progress is corrupt at {path}: {details}")]
    CorruptProgress { path: PathBuf, details: String },

    #[error("[CALM-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[CALM-3003] channel closed in component {component}")]
    ChannelClosed { component: &'static str },

    #[error("[CALM-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl CalmError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "CALM-1001",
            Self::MissingConfig { .. } => "CALM-1002",
            Self::ConfigParse { .. } => "CALM-1003",
            Self::UnknownAction { .. } => "CALM-2001",
            Self::Scenario { .. } => "CALM-2002",
            Self::InvalidInput { .. } => "CALM-2003",
            Self::Serialization { .. } => "CALM-2101",
            Self::WidgetInit { .. } => "CALM-2201",
            Self::CorruptProgress { .. } => "CALM-3001",
            Self::Io { .. } => "CALM-3002",
            Self::ChannelClosed { .. } => "CALM-3003",
            Self::Runtime { .. } => "CALM-3900",
        }
    }

    /// Whether retrying might resolve the failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::ChannelClosed { .. } | Self::Runtime { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for CalmError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for CalmError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<toml::ser::Error> for CalmError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Serialization {
            context: "toml",
            details: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<CalmError> {
        vec![
            CalmError::InvalidConfig {
                details: String::new(),
            },
            CalmError::MissingConfig {
                path: PathBuf::new(),
            },
            CalmError::ConfigParse {
                context: "",
                details: String::new(),
            },
            CalmError::UnknownAction {
                input: String::new(),
                details: String::new(),
            },
            CalmError::Scenario {
                line: 0,
                details: String::new(),
            },
            CalmError::InvalidInput {
                field: "",
                details: String::new(),
            },
            CalmError::Serialization {
                context: "",
                details: String::new(),
            },
            CalmError::WidgetInit {
                widget: "",
                details: String::new(),
            },
            CalmError::CorruptProgress {
                path: PathBuf::new(),
                details: String::new(),
            },
            CalmError::Io {
                path: PathBuf::new(),
                source: std::io::Error::other("test"),
            },
            CalmError::ChannelClosed { component: "" },
            CalmError::Runtime {
                details: String::new(),
            },
        ]
    }

    #[test]
    fn error_codes_are_unique() {
        let codes: Vec<&str> = all_variants().iter().map(CalmError::code).collect();
        let unique: std::collections::HashSet<&&str> = codes.iter().collect();
        assert_eq!(
            codes.len(),
            unique.len(),
            "error codes must be unique: {codes:?}"
        );
    }

    #[test]
    fn display_carries_code_prefix() {
        for err in all_variants() {
            let rendered = err.to_string();
            assert!(
                rendered.starts_with(&format!("[{}]", err.code())),
                "{rendered} should start with its code"
            );
        }
    }

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(CalmError::io("/tmp/x", std::io::Error::other("busy")).is_retryable());
        assert!(CalmError::ChannelClosed { component: "logger" }.is_retryable());
        assert!(
            !CalmError::InvalidConfig {
                details: "bad".into()
            }
            .is_retryable()
        );
    }

    #[test]
    fn toml_errors_map_to_config_parse() {
        let err: CalmError = toml::from_str::<toml::Value>("not = [valid")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "CALM-1003");
    }
}
