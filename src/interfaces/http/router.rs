//! API router
//!
//! Public routes are always open. Gated routes (state-changing inventory
//! operations and everything that exposes guest data) require a bearer token
//! when `security.require_auth` is enabled.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    http::StatusCode,
    middleware,
    routing::{delete, get, post, MethodRouter},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::application::{IdentityService, ReservationLedger};
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::auth::AuthHandlerState;
use crate::interfaces::http::modules::health::HealthState;
use crate::interfaces::http::modules::metrics::{http_metrics_middleware, MetricsState};
use crate::interfaces::http::modules::rooms::LedgerState;
use crate::interfaces::http::modules::{auth, health, metrics, reservations, rooms};

const WELCOME: &str = "Welcome to the Hotel Reservation System API";

/// Everything the router needs from the running service
pub struct RouterDeps {
    pub ledger: Arc<ReservationLedger>,
    pub identity: Arc<IdentityService>,
    pub db: DatabaseConnection,
    pub prometheus: PrometheusHandle,
    pub require_auth: bool,
}

/// Unified router state. Handlers extract their own slice via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub ledger: LedgerState,
    pub auth: AuthHandlerState,
    pub health: HealthState,
    pub metrics: MetricsState,
}

impl FromRef<ApiState> for LedgerState {
    fn from_ref(s: &ApiState) -> Self {
        s.ledger.clone()
    }
}

impl FromRef<ApiState> for AuthHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        s.auth.clone()
    }
}

impl FromRef<ApiState> for HealthState {
    fn from_ref(s: &ApiState) -> Self {
        s.health.clone()
    }
}

impl FromRef<ApiState> for MetricsState {
    fn from_ref(s: &ApiState) -> Self {
        s.metrics.clone()
    }
}

/// Wrap a method router with the auth middleware when the gate is enabled.
fn gated(route: MethodRouter<ApiState>, auth: Option<&AuthState>) -> MethodRouter<ApiState> {
    match auth {
        Some(auth) => route.route_layer(middleware::from_fn_with_state(
            auth.clone(),
            auth_middleware,
        )),
        None => route,
    }
}

async fn welcome() -> &'static str {
    WELCOME
}

async fn not_found() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error("Route not found")),
    )
}

/// Create the API router with all routes
pub fn create_api_router(deps: RouterDeps) -> Router {
    let auth_state = deps.require_auth.then(|| AuthState {
        jwt_config: deps.identity.jwt_config().clone(),
    });
    let gate = auth_state.as_ref();

    let state = ApiState {
        ledger: LedgerState {
            ledger: deps.ledger,
        },
        auth: AuthHandlerState {
            identity: deps.identity,
        },
        health: HealthState {
            db: deps.db,
            started_at: Arc::new(Instant::now()),
        },
        metrics: MetricsState {
            handle: deps.prometheus,
        },
    };

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let room_routes = Router::new()
        .route(
            "/",
            get(rooms::list_rooms).merge(gated(post(rooms::add_room), gate)),
        )
        .route("/available", get(rooms::list_available))
        .route("/available/summary", get(rooms::available_summary))
        .route("/booked", gated(get(reservations::list_booked), gate))
        .route("/reserve", gated(post(reservations::reserve_room), gate))
        .route(
            "/cancel",
            gated(post(reservations::cancel_reservation), gate),
        )
        .route(
            "/{room_number}",
            get(rooms::get_room).merge(gated(delete(rooms::remove_room), gate)),
        );

    let reservation_routes =
        Router::new().route("/{id}", gated(get(reservations::get_reservation), gate));

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/rooms", room_routes)
        .nest("/api/v1/reservations", reservation_routes)
        .fallback(not_found)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::infrastructure::crypto::jwt::JwtConfig;
    use crate::infrastructure::database::test_connection;
    use crate::infrastructure::SeaOrmRepositoryProvider;

    async fn app(require_auth: bool) -> Router {
        let db = test_connection().await;
        let repos = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let ledger = Arc::new(ReservationLedger::new(repos.clone()));
        ledger.initialize_inventory().await.unwrap();
        let identity =
            Arc::new(IdentityService::new(repos, JwtConfig::default()).with_bcrypt_cost(4));

        create_api_router(RouterDeps {
            ledger,
            identity,
            db,
            prometheus: PrometheusBuilder::new().build_recorder().handle(),
            require_auth,
        })
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn alice(room_number: i32) -> Value {
        json!({
            "roomNumber": room_number,
            "customerName": "Alice",
            "startDate": "2024-01-01",
            "endDate": "2024-01-05"
        })
    }

    #[tokio::test]
    async fn reserve_and_cancel_scenario() {
        let app = app(false).await;

        let (status, body) =
            send(&app, "POST", "/api/v1/rooms/reserve", Some(alice(1)), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "booked");
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (_, room) = send(&app, "GET", "/api/v1/rooms/1", None, None).await;
        assert_eq!(room["data"]["status"], "reserved");

        let (status, body) = send(&app, "GET", "/api/v1/rooms/booked", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let cancel = json!({ "reservationId": id });
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/rooms/cancel",
            Some(cancel.clone()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "cancelled");

        let (_, room) = send(&app, "GET", "/api/v1/rooms/1", None, None).await;
        assert_eq!(room["data"]["status"], "available");

        let (status, body) = send(&app, "POST", "/api/v1/rooms/cancel", Some(cancel), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn reserving_a_held_room_is_a_client_error() {
        let app = app(false).await;
        send(&app, "POST", "/api/v1/rooms/reserve", Some(alice(2)), None).await;

        let (status, body) =
            send(&app, "POST", "/api/v1/rooms/reserve", Some(alice(2)), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("not available"));

        let (status, _) = send(&app, "POST", "/api/v1/rooms/reserve", Some(alice(99)), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_requests_are_rejected() {
        let app = app(false).await;

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/rooms/reserve",
            Some(json!({ "roomNumber": 1 })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut inverted = alice(1);
        inverted["endDate"] = json!("2023-12-31");
        let (status, _) = send(&app, "POST", "/api/v1/rooms/reserve", Some(inverted), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "GET", "/api/v1/rooms/abc", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let app = app(false).await;

        let cancel = json!({ "reservationId": "does-not-exist" });
        let (status, _) = send(&app, "POST", "/api/v1/rooms/cancel", Some(cancel), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", "/api/v1/rooms/500", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", "/api/v1/reservations/nope", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn inventory_endpoints() {
        let app = app(false).await;

        let (status, body) = send(&app, "GET", "/api/v1/rooms/available", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 30);

        let (_, body) = send(&app, "GET", "/api/v1/rooms/available/summary", None, None).await;
        let summary = body["data"].as_array().unwrap();
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0]["roomType"], "1bhk");
        assert_eq!(summary[0]["count"], 10);

        let new_room = json!({ "roomNumber": 31, "roomType": "suite", "price": 320.0 });
        let (status, _) = send(&app, "POST", "/api/v1/rooms", Some(new_room.clone()), None).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = send(&app, "POST", "/api/v1/rooms", Some(new_room), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let bad_type = json!({ "roomNumber": 32, "roomType": "penthouse", "price": 320.0 });
        let (status, _) = send(&app, "POST", "/api/v1/rooms", Some(bad_type), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "DELETE", "/api/v1/rooms/31", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = send(&app, "GET", "/api/v1/rooms", None, None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 30);
    }

    #[tokio::test]
    async fn gated_routes_require_a_token_when_enabled() {
        let app = app(true).await;

        let (status, _) = send(&app, "POST", "/api/v1/rooms/reserve", Some(alice(3)), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/rooms/reserve",
            Some(alice(3)),
            Some("not-a-jwt"),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Public routes stay open.
        let (status, _) = send(&app, "GET", "/api/v1/rooms/available", None, None).await;
        assert_eq!(status, StatusCode::OK);

        let creds = json!({ "username": "frontdesk", "password": "secret1" });
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/auth/register",
            Some(creds.clone()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/auth/register",
            Some(creds.clone()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let wrong = json!({ "username": "frontdesk", "password": "wrong-pass" });
        let (status, _) = send(&app, "POST", "/api/v1/auth/login", Some(wrong), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(&app, "POST", "/api/v1/auth/login", Some(creds), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["tokenType"], "Bearer");
        let token = body["data"]["token"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/rooms/reserve",
            Some(alice(3)),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn service_endpoints() {
        let app = app(false).await;

        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], WELCOME.as_bytes());

        let (status, body) = send(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"]["status"], "ok");

        let req = Request::builder()
            .uri("/metrics")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let (status, body) = send(&app, "GET", "/api/v1/unknown", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }
}
