use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;
/// Highest page whose offset still fits in an `i64`
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

// Generic success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

// Pagination block attached to list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if total <= 0 { 0 } else { (total + limit - 1) / limit };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

// List envelope
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: PageRequest, total: i64) -> Self {
        Self {
            success: true,
            data,
            pagination: Pagination::new(page.page, page.limit, total),
        }
    }
}

// `?page=&limit=` query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Normalized page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl PaginationQuery {
    pub fn resolve(&self) -> PageRequest {
        PageRequest {
            page: self.page.unwrap_or(1).clamp(1, MAX_PAGE),
            limit: self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamping() {
        let page = PaginationQuery::default().resolve();
        assert_eq!(page, PageRequest { page: 1, limit: 20 });
        assert_eq!(page.offset(), 0);

        let page = PaginationQuery { page: Some(0), limit: Some(500) }.resolve();
        assert_eq!(page, PageRequest { page: 1, limit: 100 });

        let page = PaginationQuery { page: Some(3), limit: Some(10) }.resolve();
        assert_eq!(page.offset(), 20);
    }

    #[test]
    fn huge_page_numbers_do_not_overflow() {
        let page = PaginationQuery { page: Some(i64::MAX), limit: Some(20) }.resolve();
        assert_eq!(page.page, MAX_PAGE);
        assert!(page.offset() > 0);

        let page = PaginationQuery { page: Some(i64::MAX), limit: Some(MAX_PAGE_SIZE) }.resolve();
        assert!(page.offset() > 0);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(Pagination::new(1, 20, 0).pages, 0);
        assert_eq!(Pagination::new(1, 20, 20).pages, 1);
        assert_eq!(Pagination::new(1, 20, 21).pages, 2);
    }

    #[test]
    fn envelope_skips_empty_fields() {
        let body = serde_json::to_value(ApiResponse::success(5)).unwrap();
        assert_eq!(body, serde_json::json!({ "success": true, "data": 5 }));
        let body = serde_json::to_value(ApiResponse::message("Deleted")).unwrap();
        assert_eq!(body, serde_json::json!({ "success": true, "message": "Deleted" }));
    }
}
