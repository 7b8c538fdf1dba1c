use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_records: u64,
    pub page_index: u64,
    pub page_size: u64,
    pub page_count: u64,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total_records: u64, page_index: u64, page_size: u64) -> Self {
        let page_count = if page_size == 0 {
            0
        } else {
            total_records.div_ceil(page_size)
        };
        PagedResult {
            items,
            total_records,
            page_index,
            page_size,
            page_count,
        }
    }
}

/// Outcome wrapper for operations that report failure as data instead of an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResult<T> {
    pub is_success: bool,
    pub message: Option<String>,
    pub result_obj: Option<T>,
}

impl<T> ApiResult<T> {
    pub fn success(value: T) -> Self {
        ApiResult {
            is_success: true,
            message: None,
            result_obj: Some(value),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ApiResult {
            is_success: false,
            message: Some(message.into()),
            result_obj: None,
        }
    }
}
