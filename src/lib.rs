pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod gifts;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    Router::new()
        // Public
        .route("/", get(handlers::public::service::root))
        .route("/health", get(handlers::public::service::health))
        .merge(public_routes())
        // Protected API
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public::{auth, gifts, products};

    Router::new()
        .route("/api/register", post(auth::register_post))
        .route("/api/login", post(auth::login_post))
        .route("/api/products", get(products::products_get))
        .route("/api/products/search", get(products::products_search))
        .route("/api/products/:id", get(products::product_get))
        .route("/api/gift-bundles", post(gifts::gift_bundles_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::{auth, gifts};

    Router::new()
        .route("/api/auth/whoami", get(auth::session_whoami))
        .route("/api/gift-bundles/history", get(gifts::history_get))
        .route_layer(from_fn_with_state(state, middleware::jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Skipping invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{generate_jwt, Claims};
    use crate::config::AppConfig;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState::new(AppConfig::development()).unwrap()
    }

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = app(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn root_describes_service() {
        let request = Request::get("/").body(Body::empty()).unwrap();
        let (status, body) = send(state(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "SmartPantry API");
    }

    #[tokio::test]
    async fn gift_bundles_curated_response_envelope() {
        let request = post_json("/api/gift-bundles", json!({"prompt": "sister birthday"}));
        let (status, body) = send(state(), request).await;

        assert_eq!(status, StatusCode::OK);
        let bundles = body["bundles"].as_array().unwrap();
        assert_eq!(bundles.len(), 2);
        assert_eq!(bundles[0]["title"], "Stylish Birthday Picks");
        assert_eq!(bundles[0]["totalPrice"], json!(149.97));
        assert_eq!(bundles[0]["items"].as_array().unwrap().len(), 3);
        assert!(bundles[0]["items"][0]["imageUrl"].is_string());
    }

    #[tokio::test]
    async fn gift_bundles_rejects_blank_prompt() {
        for body in [json!({}), json!({"prompt": "   "}), json!({"prompt": null, "budget": 50})] {
            let (status, body) = send(state(), post_json("/api/gift-bundles", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["code"], "BAD_REQUEST");
        }
    }

    #[tokio::test]
    async fn gift_bundles_ignores_malformed_budget() {
        let request = post_json(
            "/api/gift-bundles",
            json!({"prompt": "sister birthday", "budget": "lots"}),
        );
        let (status, body) = send(state(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bundles"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn gift_bundles_applies_range_budget() {
        let request = post_json(
            "/api/gift-bundles",
            json!({"prompt": "sister birthday", "budget": {"min": 100, "max": 130}}),
        );
        let (_, body) = send(state(), request).await;
        let bundles = body["bundles"].as_array().unwrap();
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0]["title"], "Fragrance & Fashion");
    }

    #[tokio::test]
    async fn gift_bundles_accepts_largest_budget() {
        for budget in [json!(7.9e28), json!("79228162514264337593543950335")] {
            let request = post_json(
                "/api/gift-bundles",
                json!({"prompt": "sister birthday", "budget": budget}),
            );
            let (status, body) = send(state(), request).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["bundles"].as_array().unwrap().len(), 2);
        }
    }

    #[tokio::test]
    async fn invalid_json_is_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/gift-bundles")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(state(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_JSON");
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let request = post_json("/api/login", json!({"email": "a@b.co"}));
        let (status, body) = send(state(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Email and password required");
    }

    #[tokio::test]
    async fn register_validates_before_touching_database() {
        let request = post_json("/api/register", json!({"email": "nope", "password": "x"}));
        let (status, body) = send(state(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn search_requires_query() {
        let request = Request::get("/api/products/search?q=").body(Body::empty()).unwrap();
        let (status, _) = send(state(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn product_id_must_be_uuid() {
        let request = Request::get("/api/products/42").body(Body::empty()).unwrap();
        let (status, body) = send(state(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["field_errors"]["id"].is_string());
    }

    #[tokio::test]
    async fn protected_routes_require_token() {
        for uri in ["/api/auth/whoami", "/api/gift-bundles/history"] {
            let request = Request::get(uri).body(Body::empty()).unwrap();
            let (status, body) = send(state(), request).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["code"], "UNAUTHORIZED");
        }
    }

    #[tokio::test]
    async fn protected_routes_reject_foreign_token() {
        let mut other = AppConfig::development().security;
        other.jwt_secret = "someone-else".into();
        let token = generate_jwt(
            &Claims::new(uuid::Uuid::new_v4(), "a@b.co".into(), &other),
            &other,
        )
        .unwrap();

        let request = Request::get("/api/auth/whoami")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(state(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
