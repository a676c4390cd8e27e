//! Page selection for admin listings.

use serde::Deserialize;
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};

use crate::error::AppError;

const DEFAULT_PAGE_SIZE: u32 = 25;
const MAX_PAGE_SIZE: u32 = 100;

/// `?page=&page_size=` as sent by the caller. Both are optional; query
/// strings arrive as text, hence `DisplayFromStr`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default, alias = "pageSize")]
    pub page_size: Option<u32>,
}

/// A checked page: `number` is 1-based, `size` is within `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    pub fn offset(&self) -> i64 {
        (i64::from(self.number) - 1) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

impl PaginationParams {
    /// Applies defaults (page 1, 25 per page) and range checks.
    ///
    /// # Errors
    ///
    /// A bad-request [`AppError`] naming the offending parameter.
    pub fn resolve(&self) -> Result<Page, AppError> {
        let number = self.page.unwrap_or(1);
        let size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if number == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({ "field": "page" }),
            ));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(AppError::bad_request(
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
                json!({ "field": "page_size", "max": MAX_PAGE_SIZE }),
            ));
        }

        Ok(Page { number, size })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn params(page: Option<u32>, page_size: Option<u32>) -> PaginationParams {
        PaginationParams { page, page_size }
    }

    #[test]
    fn test_defaults_to_first_page() {
        let page = params(None, None).resolve().unwrap();
        assert_eq!(page, Page { number: 1, size: 25 });
        assert_eq!((page.offset(), page.limit()), (0, 25));
    }

    #[test]
    fn test_offset_follows_page_number() {
        assert_eq!(params(Some(2), None).resolve().unwrap().offset(), 25);
        assert_eq!(params(Some(3), Some(50)).resolve().unwrap().offset(), 100);
    }

    #[test]
    fn test_page_zero_names_page_field() {
        let err = params(Some(0), None).resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.details()["field"], "page");
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(params(None, Some(1)).resolve().is_ok());
        assert!(params(None, Some(100)).resolve().is_ok());

        for size in [0, 101] {
            let err = params(None, Some(size)).resolve().unwrap_err();
            assert_eq!(err.details()["field"], "page_size");
        }
    }

    #[test]
    fn test_last_representable_page_does_not_overflow() {
        let page = params(Some(u32::MAX), Some(100)).resolve().unwrap();
        assert_eq!(page.offset(), (i64::from(u32::MAX) - 1) * 100);
    }

    #[test]
    fn test_query_accepts_camel_case_size() {
        let parsed: PaginationParams =
            serde_json::from_value(json!({ "page": "2", "pageSize": "10" })).unwrap();
        assert_eq!(parsed.resolve().unwrap(), Page { number: 2, size: 10 });
    }
}
