use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
    routing::get,
};
use std::net::SocketAddr;
use std::time::Duration;
use storefront::api::middleware::rate_limit;
use tower::ServiceExt;

fn request() -> Request<Body> {
    let mut request = Request::builder().uri("/").body(Body::empty()).unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 7], 51000))));
    request
}

async fn allowed(app: &Router, n: usize) -> usize {
    let mut ok = 0;
    for _ in 0..n {
        let response = app.clone().oneshot(request()).await.unwrap();
        if response.status() == StatusCode::OK {
            ok += 1;
        } else {
            assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        }
    }
    ok
}

/// Drains the bucket, waits a little over a second, and counts refills.
async fn refilled_after_drain(app: Router, burst: usize) -> usize {
    assert_eq!(allowed(&app, burst).await, burst);
    assert_eq!(allowed(&app, 1).await, 0);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    allowed(&app, 10).await
}

#[tokio::test]
async fn test_public_limit_refills_five_per_second() {
    let app = Router::new()
        .route("/", get(|| async { "ok" }))
        .layer(rate_limit::layer());

    let refilled = refilled_after_drain(app, 50).await;

    assert!((4..=6).contains(&refilled), "refilled {refilled}");
}

#[tokio::test]
async fn test_admin_limit_refills_one_per_second() {
    let app = Router::new()
        .route("/", get(|| async { "ok" }))
        .layer(rate_limit::secure_layer());

    let refilled = refilled_after_drain(app, 10).await;

    assert_eq!(refilled, 1);
}
