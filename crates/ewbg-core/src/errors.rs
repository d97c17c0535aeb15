//! Structured error types shared across EWBG crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`EwbgError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (temperatures, point indices, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the EWBG pipeline.
///
/// `Config` and `Input` failures are fatal for the invocation that raised
/// them. `Minimize` and `Transport` failures are recoverable at model-point
/// granularity: batch callers record the status flag for the affected row
/// and continue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum EwbgError {
    /// Run configuration or model selection errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Malformed or missing input rows and files.
    #[error("input error: {0}")]
    Input(ErrorInfo),
    /// Model construction and parameter errors.
    #[error("model error: {0}")]
    Model(ErrorInfo),
    /// Minimizer convergence failures.
    #[error("minimize error: {0}")]
    Minimize(ErrorInfo),
    /// Phase-transition scan failures.
    #[error("transition error: {0}")]
    Transition(ErrorInfo),
    /// Transport-equation integration failures.
    #[error("transport error: {0}")]
    Transport(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl EwbgError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            EwbgError::Config(info)
            | EwbgError::Input(info)
            | EwbgError::Model(info)
            | EwbgError::Minimize(info)
            | EwbgError::Transition(info)
            | EwbgError::Transport(info)
            | EwbgError::Serde(info) => info,
        }
    }
}
