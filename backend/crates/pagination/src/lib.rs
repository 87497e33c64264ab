//! Offset pagination primitives shared by list endpoints.
//!
//! A [`PageRequest`] carries the raw `limit`/`offset` pair supplied by a
//! client. Resolving it against [`PageBounds`] yields an optional
//! [`PageWindow`]; `None` means every matching row is returned.
//!
//! ```
//! use pagination::{PageBounds, PageRequest};
//!
//! let window = PageRequest::new(None, Some(20))
//!     .resolve(PageBounds::default())
//!     .expect("offset-only requests are valid")
//!     .expect("an offset selects a window");
//! assert_eq!(window.limit(), 10);
//! assert_eq!(window.offset(), 20);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size applied when a client supplies an offset without a limit.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Errors raised while resolving a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageError {
    /// The requested limit was zero.
    #[error("limit must be at least 1")]
    ZeroLimit,
    /// The requested limit exceeded the configured maximum.
    #[error("limit must be at most {max}")]
    LimitTooLarge {
        /// Configured maximum page size.
        max: u32,
    },
}

/// Default and maximum page sizes for an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    default_size: u32,
    max_size: u32,
}

impl PageBounds {
    /// Build bounds, clamping the default size so it never exceeds the
    /// maximum.
    #[must_use]
    pub const fn new(default_size: u32, max_size: u32) -> Self {
        let clamped = if default_size > max_size {
            max_size
        } else {
            default_size
        };
        Self {
            default_size: clamped,
            max_size,
        }
    }

    /// Page size used when no limit is supplied.
    #[must_use]
    pub const fn default_size(&self) -> u32 {
        self.default_size
    }

    /// Largest accepted limit.
    #[must_use]
    pub const fn max_size(&self) -> u32 {
        self.max_size
    }
}

impl Default for PageBounds {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }
}

/// Raw pagination parameters as supplied by a client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Maximum number of rows to return.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: Option<u32>,
}

impl PageRequest {
    /// Build a request from optional limit and offset values.
    #[must_use]
    pub const fn new(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self { limit, offset }
    }

    /// Resolve the request into a concrete window.
    ///
    /// Returns `Ok(None)` when neither value is supplied. An offset without a
    /// limit uses the default page size.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::ZeroLimit`] for a zero limit and
    /// [`PageError::LimitTooLarge`] when the limit exceeds the bounds.
    pub const fn resolve(self, bounds: PageBounds) -> Result<Option<PageWindow>, PageError> {
        let limit = match self.limit {
            Some(0) => return Err(PageError::ZeroLimit),
            Some(value) if value > bounds.max_size => {
                return Err(PageError::LimitTooLarge {
                    max: bounds.max_size,
                });
            }
            Some(value) => value,
            None => {
                if self.offset.is_none() {
                    return Ok(None);
                }
                bounds.default_size
            }
        };
        let offset = match self.offset {
            Some(value) => value,
            None => 0,
        };
        Ok(Some(PageWindow { limit, offset }))
    }
}

/// A resolved slice of a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    limit: u32,
    offset: u32,
}

impl PageWindow {
    /// Number of rows in the window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows skipped before the window starts.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }
}
