#![allow(dead_code)]

use axum::Router;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use storefront::application::services::hash_token;
use storefront::config::{CarrierConfig, CarrierEndpoint};
use storefront::domain::carriers::CarrierRegistry;
use storefront::domain::entities::Carrier;
use storefront::infrastructure::carriers::build_registry;
use storefront::state::AppState;
use url::Url;

pub const SIGNING_SECRET: &str = "test-signing-secret";

/// Counts requests that reached a mock carrier.
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_carrier_mock(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Url::parse(&format!("http://{addr}/")).unwrap()
}

/// Points every carrier at `base_url`.
pub fn carrier_config(base_url: &Url, default_carrier: Carrier, timeout_secs: u64) -> CarrierConfig {
    let endpoint = || CarrierEndpoint {
        base_url: base_url.clone(),
        api_key: Some("test-key".to_string()),
    };

    CarrierConfig {
        default_carrier,
        timeout_secs,
        fedex: endpoint(),
        ups: endpoint(),
        dhl: endpoint(),
        usps: endpoint(),
    }
}

pub fn registry_for(base_url: &Url, default_carrier: Carrier, timeout_secs: u64) -> CarrierRegistry {
    build_registry(&carrier_config(base_url, default_carrier, timeout_secs)).unwrap()
}

/// State over a real database; carriers point at a closed local port.
pub fn create_test_state(pool: PgPool) -> AppState {
    let unreachable = Url::parse("http://127.0.0.1:9/").unwrap();
    create_state_with_registry(pool, registry_for(&unreachable, Carrier::Fedex, 1))
}

pub fn create_state_with_registry(pool: PgPool, registry: CarrierRegistry) -> AppState {
    AppState::new(
        Arc::new(pool),
        Arc::new(registry),
        SIGNING_SECRET.to_string(),
    )
}

/// State for tests that never touch the database.
pub fn create_tracking_state(registry: CarrierRegistry) -> AppState {
    let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
    create_state_with_registry(pool, registry)
}

pub struct TestCoupon<'a> {
    pub code: &'a str,
    pub discount_type: &'a str,
    pub discount_value: i64,
    pub is_active: bool,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub usage_count: i32,
    pub usage_limit: Option<i32>,
}

impl<'a> TestCoupon<'a> {
    /// Active 10% coupon valid from yesterday until tomorrow.
    pub fn active(code: &'a str) -> Self {
        let now = Utc::now();
        Self {
            code,
            discount_type: "percentage",
            discount_value: 10,
            is_active: true,
            valid_from: now - Duration::days(1),
            valid_to: now + Duration::days(1),
            usage_count: 0,
            usage_limit: None,
        }
    }

    pub fn expired(code: &'a str) -> Self {
        let now = Utc::now();
        Self {
            valid_from: now - Duration::days(30),
            valid_to: now - Duration::days(1),
            ..Self::active(code)
        }
    }

    pub async fn insert(&self, pool: &PgPool) -> i64 {
        sqlx::query_scalar(
            r#"
            INSERT INTO coupons (code, discount_type, discount_value, is_active,
                                 valid_from, valid_to, usage_count, usage_limit)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(self.code)
        .bind(self.discount_type)
        .bind(self.discount_value)
        .bind(self.is_active)
        .bind(self.valid_from)
        .bind(self.valid_to)
        .bind(self.usage_count)
        .bind(self.usage_limit)
        .fetch_one(pool)
        .await
        .unwrap()
    }
}

/// Stores an admin token and returns the raw value to send as Bearer.
pub async fn create_admin_token(pool: &PgPool, name: &str) -> String {
    let raw = format!("{name}-raw-token");
    sqlx::query("INSERT INTO api_tokens (name, token_hash) VALUES ($1, $2)")
        .bind(name)
        .bind(hash_token(SIGNING_SECRET, &raw))
        .execute(pool)
        .await
        .unwrap();
    raw
}
