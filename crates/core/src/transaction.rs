//! Transaction port, failure taxonomy, and the single-callback runner.
//!
//! Storage backends report failures as a code and/or message. They are
//! classified once into a [`TransactionErrorKind`]; the retryability of each
//! kind is fixed by [`TransactionErrorKind::is_retryable`].

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionErrorKind {
    Conflict,
    Timeout,
    Deadlock,
    SerializationFailure,
    ConnectionFailure,
    ConstraintViolation,
    Cancelled,
    NotSupported,
    Unknown,
}

impl TransactionErrorKind {
    pub fn is_retryable(self) -> bool {
        match self {
            Self::Conflict
            | Self::Timeout
            | Self::Deadlock
            | Self::SerializationFailure
            | Self::ConnectionFailure => true,
            Self::ConstraintViolation | Self::Cancelled | Self::NotSupported | Self::Unknown => {
                false
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conflict => "conflict",
            Self::Timeout => "timeout",
            Self::Deadlock => "deadlock",
            Self::SerializationFailure => "serialization_failure",
            Self::ConnectionFailure => "connection_failure",
            Self::ConstraintViolation => "constraint_violation",
            Self::Cancelled => "cancelled",
            Self::NotSupported => "not_supported",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TransactionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend error codes with a known classification.
///
/// Covers PostgreSQL SQLSTATE values and gRPC-style status names as
/// reported by document stores.
const CODE_TABLE: &[(&str, TransactionErrorKind)] = &[
    ("40P01", TransactionErrorKind::Deadlock),
    ("40001", TransactionErrorKind::SerializationFailure),
    ("55P03", TransactionErrorKind::Timeout),
    ("57014", TransactionErrorKind::Cancelled),
    ("08000", TransactionErrorKind::ConnectionFailure),
    ("08003", TransactionErrorKind::ConnectionFailure),
    ("08006", TransactionErrorKind::ConnectionFailure),
    ("23502", TransactionErrorKind::ConstraintViolation),
    ("23503", TransactionErrorKind::ConstraintViolation),
    ("23505", TransactionErrorKind::ConstraintViolation),
    ("23514", TransactionErrorKind::ConstraintViolation),
    ("ABORTED", TransactionErrorKind::Conflict),
    ("DEADLINE_EXCEEDED", TransactionErrorKind::Timeout),
    ("UNAVAILABLE", TransactionErrorKind::ConnectionFailure),
    ("ALREADY_EXISTS", TransactionErrorKind::ConstraintViolation),
    ("FAILED_PRECONDITION", TransactionErrorKind::Conflict),
    ("CANCELLED", TransactionErrorKind::Cancelled),
    ("UNIMPLEMENTED", TransactionErrorKind::NotSupported),
];

/// Message fragments checked when no code matched. Order matters.
const KEYWORD_TABLE: &[(&str, TransactionErrorKind)] = &[
    ("deadlock", TransactionErrorKind::Deadlock),
    ("serializ", TransactionErrorKind::SerializationFailure),
    ("timeout", TransactionErrorKind::Timeout),
    ("timed out", TransactionErrorKind::Timeout),
    ("conflict", TransactionErrorKind::Conflict),
    ("concurrent", TransactionErrorKind::Conflict),
    ("connection", TransactionErrorKind::ConnectionFailure),
    ("unique", TransactionErrorKind::ConstraintViolation),
    ("duplicate", TransactionErrorKind::ConstraintViolation),
    ("constraint", TransactionErrorKind::ConstraintViolation),
    ("cancel", TransactionErrorKind::Cancelled),
    ("not supported", TransactionErrorKind::NotSupported),
];

/// Classify a backend failure from its code (preferred) or message.
pub fn classify(code: Option<&str>, message: &str) -> TransactionErrorKind {
    if let Some(code) = code {
        let code = code.trim();
        if let Some((_, kind)) = CODE_TABLE.iter().find(|(c, _)| c.eq_ignore_ascii_case(code)) {
            return *kind;
        }
    }

    let lowered = message.to_lowercase();
    KEYWORD_TABLE
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, kind)| *kind)
        .unwrap_or(TransactionErrorKind::Unknown)
}

// ---------------------------------------------------------------------------
// TransactionError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Transaction {kind}: {message}")]
pub struct TransactionError {
    pub kind: TransactionErrorKind,
    pub code: Option<String>,
    pub message: String,
}

impl TransactionError {
    pub fn new(kind: TransactionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
        }
    }

    /// Build an error by classifying a raw backend code and message.
    pub fn from_backend(code: Option<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = classify(code.as_deref(), &message);
        Self {
            kind,
            code,
            message,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// An open unit of work. Consumed by `commit` or `rollback`.
#[async_trait]
pub trait Transaction: Send {
    async fn commit(self: Box<Self>) -> Result<(), TransactionError>;
    async fn rollback(self: Box<Self>) -> Result<(), TransactionError>;
}

/// Begins transactions on a storage backend.
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// Backends without transactions run work directly.
    fn supports_transactions(&self) -> bool;

    async fn begin(&self) -> Result<Box<dyn Transaction>, TransactionError>;
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Default number of attempts for retryable failures.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Wraps a callback in begin / commit / rollback.
///
/// Failures classified as retryable are re-run until `max_attempts` is
/// reached. There is no backoff and no nesting.
#[derive(Clone)]
pub struct TransactionRunner {
    service: Arc<dyn TransactionService>,
    max_attempts: u32,
}

impl TransactionRunner {
    pub fn new(service: Arc<dyn TransactionService>) -> Self {
        Self {
            service,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Values below 1 are treated as 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `op` inside a transaction.
    ///
    /// `op` is called once per attempt, so it must be safe to repeat.
    pub async fn execute<T, F, Fut>(&self, mut op: F) -> Result<T, CoreError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, CoreError>> + Send,
        T: Send,
    {
        if !self.service.supports_transactions() {
            return op().await;
        }

        let mut attempt = 1;
        loop {
            match self.attempt(&mut op).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    tracing::warn!(attempt, error = %err, "Retrying transaction");
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn attempt<T, F, Fut>(&self, op: &mut F) -> Result<T, CoreError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, CoreError>> + Send,
        T: Send,
    {
        let tx = self.service.begin().await?;

        match op().await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "Transaction rollback failed");
                }
                Err(err)
            }
        }
    }
}
