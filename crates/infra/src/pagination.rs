/// Limit/offset pair applied to paginated list queries.
#[derive(Debug, Clone, Copy)]
pub struct LimitOffset {
    pub limit: i64,
    pub offset: i64,
}

impl Default for LimitOffset {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
        }
    }
}

impl LimitOffset {
    /// Build from 1-based page number and page size, clamping nonsense input.
    pub fn from_page(page: i64, limit: i64) -> Self {
        let limit = limit.clamp(1, 100);
        let page = page.max(1);
        Self {
            limit,
            offset: (page - 1) * limit,
        }
    }
}
