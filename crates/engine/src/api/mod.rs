//! API layer - HTTP entry points.

pub mod auth;
pub mod error;
pub mod http;

use std::sync::Arc;

use axum::http::header::{HeaderName, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::app::App;
use crate::infrastructure::config::CorsOrigins;
use crate::infrastructure::correlation::{self, CORRELATION_HEADER};

pub use error::ApiError;

/// The full HTTP service: routes, request tracing, correlation ids and CORS.
pub fn router(app: Arc<App>, origins: &CorsOrigins) -> Router {
    http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(correlation::propagate))
        .layer(cors_layer(origins))
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static(auth::ADMIN_TOKEN_HEADER),
            HeaderName::from_static(auth::USER_TOKEN_HEADER),
            HeaderName::from_static(CORRELATION_HEADER),
        ])
        .expose_headers([HeaderName::from_static(CORRELATION_HEADER)]);

    match origins {
        CorsOrigins::Any => cors.allow_origin(Any),
        CorsOrigins::List(list) => {
            let parsed: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            cors.allow_origin(parsed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::app::ApiTokens;

    fn app() -> Arc<App> {
        Arc::new(App::in_memory(ApiTokens {
            admin: "a".into(),
            user: "u".into(),
        }))
    }

    #[tokio::test]
    async fn responses_carry_a_correlation_id() {
        let response = router(app(), &CorsOrigins::Any)
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(CORRELATION_HEADER));
    }

    #[tokio::test]
    async fn listed_origin_is_echoed() {
        let origins = CorsOrigins::List(vec!["https://play.example".into()]);
        let response = router(app(), &origins)
            .oneshot(
                Request::get("/api/health")
                    .header("origin", "https://play.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://play.example"
        );
    }
}
