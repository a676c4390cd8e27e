//! DTOs for coupon validation and admin coupon management.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::{Coupon, DiscountType, NewCoupon};

/// Compiled regex for coupon codes.
static COUPON_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Body of `POST /api/coupons/validate`.
///
/// `code` is optional here so that a missing code is reported by the coupon
/// service as a validation error rather than as a body rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ValidateCouponRequest {
    #[serde(default)]
    pub code: Option<String>,
}

/// Body of `POST /api/admin/coupons`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCouponRequest {
    #[validate(length(min = 3, max = 32))]
    #[validate(regex(path = "*COUPON_CODE_REGEX", message = "Only letters, digits, '-' and '_'"))]
    pub code: String,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    pub discount_type: DiscountType,

    #[validate(range(min = 1))]
    pub discount_value: i64,

    #[serde(default = "default_active")]
    pub is_active: bool,

    pub valid_from: DateTime<Utc>,

    pub valid_to: DateTime<Utc>,

    #[validate(range(min = 0))]
    pub usage_limit: Option<i32>,
}

fn default_active() -> bool {
    true
}

impl From<CreateCouponRequest> for NewCoupon {
    fn from(req: CreateCouponRequest) -> Self {
        NewCoupon {
            code: req.code,
            description: req.description,
            discount_type: req.discount_type,
            discount_value: req.discount_value,
            is_active: req.is_active,
            valid_from: req.valid_from,
            valid_to: req.valid_to,
            usage_limit: req.usage_limit,
        }
    }
}

/// Coupon as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponResponse {
    pub id: i64,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub is_active: bool,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub usage_count: i32,
    pub usage_limit: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<Coupon> for CouponResponse {
    fn from(c: Coupon) -> Self {
        Self {
            id: c.id,
            code: c.code,
            description: c.description,
            discount_type: c.discount_type,
            discount_value: c.discount_value,
            is_active: c.is_active,
            valid_from: c.valid_from,
            valid_to: c.valid_to,
            usage_count: c.usage_count,
            usage_limit: c.usage_limit,
            created_at: c.created_at,
        }
    }
}

/// Paginated coupon list for the admin API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponListResponse {
    pub items: Vec<CouponResponse>,
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> CreateCouponRequest {
        serde_json::from_value(value).unwrap()
    }

    fn valid_body() -> serde_json::Value {
        json!({
            "code": "SAVE10",
            "discountType": "percentage",
            "discountValue": 10,
            "validFrom": "2024-01-01T00:00:00Z",
            "validTo": "2024-12-31T23:59:59Z"
        })
    }

    #[test]
    fn test_create_request_defaults() {
        let req = request(valid_body());
        assert!(req.validate().is_ok());
        assert!(req.is_active);
        assert!(req.usage_limit.is_none());
    }

    #[test]
    fn test_create_request_rejects_bad_code() {
        let mut body = valid_body();
        body["code"] = json!("SAVE 10!");
        assert!(request(body).validate().is_err());

        let mut body = valid_body();
        body["code"] = json!("AB");
        assert!(request(body).validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_non_positive_value() {
        let mut body = valid_body();
        body["discountValue"] = json!(0);
        let errors = request(body).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("discount_value"));
    }

    #[test]
    fn test_unknown_discount_type_fails_to_parse() {
        let mut body = valid_body();
        body["discountType"] = json!("bogo");
        assert!(serde_json::from_value::<CreateCouponRequest>(body).is_err());
    }

    #[test]
    fn test_validate_request_code_is_optional() {
        let req: ValidateCouponRequest = serde_json::from_str("{}").unwrap();
        assert!(req.code.is_none());
    }
}
