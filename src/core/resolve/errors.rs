use std::sync::{Arc, Mutex, MutexGuard};

use tracing::error;

use crate::core::error::{LauncherError, LauncherResult};

/// Append-only error sink shared by every resolution task.
///
/// Recording never affects sibling tasks. The lock is only held for the
/// push itself.
#[derive(Debug, Clone, Default)]
pub struct ErrorCollector {
    errors: Arc<Mutex<Vec<LauncherError>>>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, err: LauncherError) {
        error!("{}", err);
        self.lock().push(err);
    }

    pub fn has_errors(&self) -> bool {
        !self.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain the collected errors into a single result.
    ///
    /// One error is returned as is. Several are wrapped in
    /// `LauncherError::Aggregate`, sorted by message so the outcome does not
    /// depend on task completion order.
    pub fn into_result(self) -> LauncherResult<()> {
        let mut errors = std::mem::take(&mut *self.lock());
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => {
                errors.sort_by_cached_key(ToString::to_string);
                Err(LauncherError::Aggregate(errors))
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LauncherError>> {
        self.errors.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
