//! PostgreSQL implementation of coupon repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Coupon, DiscountType, NewCoupon};
use crate::domain::repositories::CouponRepository;
use crate::error::AppError;

const COUPON_COLUMNS: &str = "id, code, description, discount_type, discount_value, is_active, \
     valid_from, valid_to, usage_count, usage_limit, created_at";

/// PostgreSQL repository for coupons.
pub struct PgCouponRepository {
    pool: Arc<PgPool>,
}

impl PgCouponRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CouponRow {
    id: i64,
    code: String,
    description: Option<String>,
    discount_type: String,
    discount_value: i64,
    is_active: bool,
    valid_from: DateTime<Utc>,
    valid_to: DateTime<Utc>,
    usage_count: i32,
    usage_limit: Option<i32>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CouponRow> for Coupon {
    type Error = AppError;

    fn try_from(row: CouponRow) -> Result<Self, Self::Error> {
        let discount_type: DiscountType = row.discount_type.parse().map_err(|e: String| {
            tracing::error!(coupon_id = row.id, error = %e, "Corrupt coupon row");
            AppError::internal("Database error", json!({ "coupon_id": row.id }))
        })?;

        Ok(Coupon {
            id: row.id,
            code: row.code,
            description: row.description,
            discount_type,
            discount_value: row.discount_value,
            is_active: row.is_active,
            valid_from: row.valid_from,
            valid_to: row.valid_to,
            usage_count: row.usage_count,
            usage_limit: row.usage_limit,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl CouponRepository for PgCouponRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, AppError> {
        let sql = format!("SELECT {COUPON_COLUMNS} FROM coupons WHERE code = $1");

        let row = sqlx::query_as::<_, CouponRow>(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Coupon::try_from).transpose()
    }

    async fn create(&self, new_coupon: NewCoupon) -> Result<Coupon, AppError> {
        let sql = format!(
            r#"
            INSERT INTO coupons
                (code, description, discount_type, discount_value, is_active,
                 valid_from, valid_to, usage_limit)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COUPON_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, CouponRow>(&sql)
            .bind(new_coupon.code)
            .bind(new_coupon.description)
            .bind(new_coupon.discount_type.as_str())
            .bind(new_coupon.discount_value)
            .bind(new_coupon.is_active)
            .bind(new_coupon.valid_from)
            .bind(new_coupon.valid_to)
            .bind(new_coupon.usage_limit)
            .fetch_one(self.pool.as_ref())
            .await?;

        Coupon::try_from(row)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Coupon>, AppError> {
        let sql = format!(
            "SELECT {COUPON_COLUMNS} FROM coupons ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );

        let rows = sqlx::query_as::<_, CouponRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        rows.into_iter().map(Coupon::try_from).collect()
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM coupons")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
