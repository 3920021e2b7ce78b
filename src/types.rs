//! Shared types for npage: configuration, session outcomes, errors.

use std::io;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default number of items shown on one page.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Default delay between redraws, in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 300;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Options recognized by the paging and tab entry points.
///
/// `page_size` only matters for paging; the tabbed display ignores it.
/// Missing fields take their defaults when deserialized, so a config file
/// may set just one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    /// Items per page. Must be positive.
    pub page_size: usize,
    /// Milliseconds between redraws.
    pub interval_ms: u64,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl PagerConfig {
    /// Build a config from signed host input (CLI flags, foreign callers).
    ///
    /// # Errors
    /// `InvalidConfiguration` if `page_size <= 0` or `interval_ms < 0`.
    pub fn from_raw(page_size: i64, interval_ms: i64) -> Result<Self, Error> {
        Self::default().with_overrides(Some(page_size), Some(interval_ms))
    }

    /// Replace the given fields with signed host input. Fields left as
    /// `None` keep their current value unchanged.
    ///
    /// # Errors
    /// `InvalidConfiguration` if an override is out of range, or if the
    /// result fails [`validate`](Self::validate).
    pub fn with_overrides(
        mut self,
        page_size: Option<i64>,
        interval_ms: Option<i64>,
    ) -> Result<Self, Error> {
        if let Some(page_size) = page_size {
            if page_size <= 0 {
                return Err(Error::InvalidConfiguration {
                    reason: format!("page size must be positive, got {}", page_size),
                });
            }
            self.page_size = usize::try_from(page_size).map_err(|_| Error::InvalidConfiguration {
                reason: format!("page size {} does not fit this platform", page_size),
            })?;
        }
        if let Some(interval_ms) = interval_ms {
            self.interval_ms = u64::try_from(interval_ms).map_err(|_| Error::InvalidConfiguration {
                reason: format!("interval must not be negative, got {}ms", interval_ms),
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check the invariants the render loop relies on.
    ///
    /// # Errors
    /// `InvalidConfiguration` if `page_size` is zero.
    pub fn validate(&self) -> Result<(), Error> {
        if self.page_size == 0 {
            return Err(Error::InvalidConfiguration {
                reason: "page size must be positive, got 0".to_string(),
            });
        }
        Ok(())
    }

    /// Redraw interval as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

// ============================================================================
// OUTCOMES
// ============================================================================

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The cancellation signal was observed at the top of a tick.
    Cancelled,
    /// There was nothing to page through; no task was started.
    EmptyInput,
}

// ============================================================================
// ERRORS
// ============================================================================

/// Errors raised by npage.
///
/// Everything except `Io` is a synchronous validation failure raised
/// before any screen output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A navigation state was requested over zero positions.
    #[error("navigation extent must be at least 1")]
    EmptyExtent,

    /// A tab collection was built from no tabs.
    #[error("tab collection must contain at least one tab")]
    EmptyCollection,

    /// Rejected configuration value.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// Terminal I/O failed while the session was running.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

// ============================================================================
// TESTS
// ============================================================================
