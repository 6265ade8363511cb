//! Pagination utilities for service layer
//!
//! `PageRequest` is what callers send (`skip`/`limit`); `PageWindow` is the checked,
//! clamped form handed to stores.

use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Largest offset a store can bind (`BIGINT`).
pub const MAX_SKIP: u64 = i64::MAX as u64;

/// Offset pagination parameters as received from callers.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub skip: u64,
    /// `None` falls back to the configured default.
    #[serde(default)]
    pub limit: Option<u64>,
}

/// Normalized window: `limit` is always within `1..=max_limit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PageLimits {
    fn default() -> Self { Self { default_limit: 100, max_limit: 100 } }
}

impl PageLimits {
    /// Reject a zero limit, clamp anything above the maximum. `skip` must fit a signed
    /// 64-bit SQL offset.
    pub fn normalize(&self, req: PageRequest) -> Result<PageWindow, ServiceError> {
        if req.skip > MAX_SKIP {
            return Err(ServiceError::invalid("skip", format!("must be at most {MAX_SKIP}")));
        }
        let limit = match req.limit {
            None => self.default_limit,
            Some(0) => return Err(ServiceError::invalid("limit", "must be at least 1")),
            Some(n) => n.min(self.max_limit),
        };
        Ok(PageWindow { offset: req.skip, limit })
    }
}

/// One page of results. `count` is the size of the whole matching set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub count: u64,
}
