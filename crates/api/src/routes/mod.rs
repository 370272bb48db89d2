pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod employees;
pub mod members;
pub mod payments;
pub mod plans;
pub mod schedule;
pub mod services;

use infra::pagination::LimitOffset;
use serde::{Deserialize, Serialize};

/// Standard `?page=&limit=` query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    pub fn limit_offset(&self) -> LimitOffset {
        LimitOffset::from_page(self.page.unwrap_or(1), self.limit.unwrap_or(10))
    }
}

/// Pagination envelope mirrored on every list response.
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub current: i64,
    pub pages: i64,
    pub total: i64,
}

impl Pagination {
    pub fn new(page: &PageQuery, total: i64) -> Self {
        let limit = page.limit.unwrap_or(10).clamp(1, 100);
        Self {
            current: page.page.unwrap_or(1).max(1),
            pages: (total + limit - 1) / limit,
            total,
        }
    }
}
