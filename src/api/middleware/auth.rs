//! Bearer token guard for the admin coupon routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Admits a request to `/api/admin/*` only with a live admin token.
///
/// The raw bearer value is HMAC-hashed with the server's signing secret and
/// matched against non-revoked rows in `api_tokens`; a match also stamps
/// `last_used_at` and is logged with the token's name. Rejections are logged with the admin route and the reason
/// so a misconfigured back-office client shows up in the logs, while the
/// response stays a plain `401` with `WWW-Authenticate: Bearer`.
///
/// ```rust,ignore
/// let admin = api::routes::admin_routes()
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let method = parts.method.clone();
    let admin_route = parts.uri.path().to_owned();

    let AuthBearer(token) = match AuthBearer::from_request_parts(&mut parts, &()).await {
        Ok(bearer) => bearer,
        Err(_) => {
            tracing::warn!(
                %method,
                admin_route = admin_route.as_str(),
                reason = "missing_bearer",
                "Rejected admin request"
            );
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "missing_bearer" }),
            ));
        }
    };

    let admin = st.auth_service.authenticate(&token).await.inspect_err(|e| {
        tracing::warn!(
            %method,
            admin_route = admin_route.as_str(),
            reason = e.details()["reason"].as_str().unwrap_or("rejected"),
            "Rejected admin request"
        );
    })?;

    tracing::info!(
        %method,
        admin_route = admin_route.as_str(),
        token_id = admin.id,
        token_name = admin.name.as_str(),
        "Admin request authenticated"
    );

    Ok(next.run(Request::from_parts(parts, body)).await)
}
