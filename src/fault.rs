//! Fail-fast invariant checking
//!
//! Every precondition and structural guarantee in this crate is enforced
//! through a [`FaultPolicy`]. A failed check never returns control to the
//! caller: the policy logs the violation, records it in an optional
//! capture log, and then either unwinds with the [`Violation`] as payload
//! or aborts the process, depending on deployment policy.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// A detected breach of a precondition or structural guarantee.
///
/// Carries the failed condition text as written at the call site, the
/// caller-supplied message, and the source location of the check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// The condition that failed, as described by the call site
    pub check: String,
    /// Caller-supplied context (may be empty)
    pub message: String,
    /// Source file of the failed check
    pub file: String,
    /// Source line of the failed check
    pub line: u32,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invariant violation: `{}` failed at {}:{}",
            self.check, self.file, self.line
        )?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for Violation {}

/// How a failed check terminates the current operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaultAction {
    /// Unwind with the violation as panic payload. Callers at a task
    /// boundary may catch it; execution below the check never resumes.
    #[default]
    Unwind,
    /// Abort the whole process after logging.
    Abort,
}

/// Shared capture buffer for violations.
///
/// Attached to a [`FaultPolicy`] by tests that assert on violation
/// messages: the violation is recorded before the operation terminates,
/// and the test catches the unwind at its own boundary.
#[derive(Clone, Debug, Default)]
pub struct ViolationLog {
    inner: Arc<Mutex<Vec<Violation>>>,
}

impl ViolationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded violations, oldest first.
    pub fn violations(&self) -> Vec<Violation> {
        self.inner.lock().clone()
    }

    /// Remove and return all recorded violations.
    pub fn take(&self) -> Vec<Violation> {
        std::mem::take(&mut *self.inner.lock())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    fn push(&self, violation: Violation) {
        self.inner.lock().push(violation);
    }
}

/// Invariant-checking policy threaded through segment construction.
///
/// The policy decides how a failed check terminates the operation and
/// whether violations are additionally captured for inspection. Cloning
/// is cheap; clones share the same capture log.
#[derive(Clone, Debug, Default)]
pub struct FaultPolicy {
    action: FaultAction,
    log: Option<ViolationLog>,
}

impl FaultPolicy {
    /// Policy that unwinds with the violation as payload (the default).
    pub fn unwinding() -> Self {
        Self {
            action: FaultAction::Unwind,
            log: None,
        }
    }

    /// Policy that aborts the process on the first violation.
    pub fn aborting() -> Self {
        Self {
            action: FaultAction::Abort,
            log: None,
        }
    }

    /// Attach a capture log; recorded violations survive the unwind.
    pub fn with_log(mut self, log: ViolationLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Unwinding policy plus a fresh capture log, for tests.
    pub fn capturing() -> (Self, ViolationLog) {
        let log = ViolationLog::new();
        (Self::unwinding().with_log(log.clone()), log)
    }

    pub fn action(&self) -> FaultAction {
        self.action
    }

    /// Check `condition`; on `false`, raise a violation described by
    /// `check` and terminate the operation. The condition is evaluated
    /// exactly once, at the call site.
    #[track_caller]
    pub fn assert(&self, condition: bool, check: &str) {
        if !condition {
            self.raise(check, String::new());
        }
    }

    /// [`FaultPolicy::assert`] with a caller-supplied message.
    #[track_caller]
    pub fn assert_info(&self, condition: bool, check: &str, message: impl fmt::Display) {
        if !condition {
            self.raise(check, message.to_string());
        }
    }

    /// Unconditionally raise a violation. Marked never-returning so
    /// callers downstream need no further error handling. The message
    /// doubles as the failed-check text.
    #[track_caller]
    pub fn panic_info(&self, message: impl fmt::Display) -> ! {
        self.raise(&message.to_string(), String::new())
    }

    #[track_caller]
    fn raise(&self, check: &str, message: String) -> ! {
        let location = Location::caller();
        let violation = Violation {
            check: check.to_string(),
            message,
            file: location.file().to_string(),
            line: location.line(),
        };
        tracing::error!(%violation, "segment invariant violated");
        if let Some(log) = &self.log {
            log.push(violation.clone());
        }
        match self.action {
            FaultAction::Abort => {
                eprintln!("{violation}");
                std::process::abort();
            }
            FaultAction::Unwind => std::panic::panic_any(violation),
        }
    }
}
