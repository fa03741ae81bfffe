//! Lazy, once-only initialization of the acceleration subsystem.
//!
//! The first caller of [`LazyInit::ensure_ready`] runs the initializer.
//! Concurrent callers block until it finishes; later callers return at
//! once. Everyone observes the same outcome, including a failure, which is
//! recorded and replayed instead of retried.

use once_cell::sync::OnceCell;
use std::fmt;

/// The initializer failed. Cloned out to every caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{subsystem} failed to initialize: {message}")]
pub struct InitError {
    pub subsystem: String,
    pub message: String,
}

impl InitError {
    pub fn new(subsystem: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subsystem: subsystem.into(),
            message: message.into(),
        }
    }
}

/// Errors from the process-wide guard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccelError {
    #[error("no acceleration subsystem installed")]
    NotInstalled,

    #[error("acceleration subsystem already installed: {subsystem}")]
    AlreadyInstalled { subsystem: String },

    #[error(transparent)]
    Init(#[from] InitError),
}

type Initializer = Box<dyn Fn() -> Result<(), InitError> + Send + Sync>;

/// A named initializer that runs at most once.
pub struct LazyInit {
    subsystem: String,
    init: Initializer,
    outcome: OnceCell<Result<(), InitError>>,
}

impl LazyInit {
    pub fn new<F>(subsystem: impl Into<String>, init: F) -> Self
    where
        F: Fn() -> Result<(), InitError> + Send + Sync + 'static,
    {
        Self {
            subsystem: subsystem.into(),
            init: Box::new(init),
            outcome: OnceCell::new(),
        }
    }

    pub fn subsystem(&self) -> &str {
        &self.subsystem
    }

    /// Run the initializer if nobody has yet, then return its outcome.
    pub fn ensure_ready(&self) -> Result<(), InitError> {
        self.outcome
            .get_or_init(|| {
                let outcome = (self.init)();
                match &outcome {
                    Ok(()) => tracing::info!(subsystem = %self.subsystem, "initialized"),
                    Err(err) => tracing::warn!(subsystem = %self.subsystem, %err, "initialization failed"),
                }
                outcome
            })
            .clone()
    }

    /// Whether an outcome has been recorded.
    pub fn is_initialized(&self) -> bool {
        self.outcome.get().is_some()
    }
}

impl fmt::Debug for LazyInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyInit")
            .field("subsystem", &self.subsystem)
            .field("outcome", &self.outcome.get())
            .finish()
    }
}

static GLOBAL: OnceCell<LazyInit> = OnceCell::new();

/// Register the process-wide initializer. Only the first install wins.
pub fn install<F>(subsystem: impl Into<String>, init: F) -> Result<(), AccelError>
where
    F: Fn() -> Result<(), InitError> + Send + Sync + 'static,
{
    let guard = LazyInit::new(subsystem, init);
    GLOBAL.set(guard).map_err(|_| AccelError::AlreadyInstalled {
        subsystem: GLOBAL
            .get()
            .map(|g| g.subsystem().to_string())
            .unwrap_or_default(),
    })
}

/// Make sure the process-wide subsystem is initialized.
pub fn ensure_ready() -> Result<(), AccelError> {
    let guard = GLOBAL.get().ok_or(AccelError::NotInstalled)?;
    guard.ensure_ready()?;
    Ok(())
}
