//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{BookingWorkflow, ChatbotService, FeedbackService, ScanSimulator};

use super::common::{ApiResponse, EmptyData};
use super::modules::chatbot::{self, ChatbotState};
use super::modules::feedback::{self, FeedbackState};
use super::modules::health::{self, HealthState};
use super::modules::locations::{self, BookingState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::scan::{self, ScanState};
use super::modules::sessions;

/// Unified state for every route. Handlers pick their own slice via `FromRef`.
#[derive(Clone)]
pub struct ParkWatchState {
    pub workflow: Arc<BookingWorkflow>,
    pub scanner: Arc<ScanSimulator>,
    pub chatbot: Arc<ChatbotService>,
    pub feedback: Arc<FeedbackService>,
    pub started_at: Arc<Instant>,
}

impl ParkWatchState {
    pub fn new(
        workflow: Arc<BookingWorkflow>,
        scanner: Arc<ScanSimulator>,
        chatbot: Arc<ChatbotService>,
        feedback: Arc<FeedbackService>,
    ) -> Self {
        Self {
            workflow,
            scanner,
            chatbot,
            feedback,
            started_at: Arc::new(Instant::now()),
        }
    }
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<ParkWatchState> for BookingState {
    fn from_ref(s: &ParkWatchState) -> Self {
        BookingState {
            workflow: Arc::clone(&s.workflow),
        }
    }
}

impl FromRef<ParkWatchState> for ScanState {
    fn from_ref(s: &ParkWatchState) -> Self {
        ScanState {
            scanner: Arc::clone(&s.scanner),
        }
    }
}

impl FromRef<ParkWatchState> for ChatbotState {
    fn from_ref(s: &ParkWatchState) -> Self {
        ChatbotState {
            chatbot: Arc::clone(&s.chatbot),
        }
    }
}

impl FromRef<ParkWatchState> for FeedbackState {
    fn from_ref(s: &ParkWatchState) -> Self {
        FeedbackState {
            feedback: Arc::clone(&s.feedback),
        }
    }
}

impl FromRef<ParkWatchState> for HealthState {
    fn from_ref(s: &ParkWatchState) -> Self {
        HealthState {
            sessions: s.workflow.sessions().clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Locations
        locations::list_locations,
        locations::get_location,
        locations::get_spot_board,
        // Sessions
        sessions::create_session,
        sessions::get_session,
        sessions::delete_session,
        sessions::select_location,
        sessions::select_spot,
        sessions::submit_booking,
        sessions::get_payment,
        sessions::confirm_payment,
        sessions::get_confirmation,
        sessions::cancel_booking,
        sessions::reset_booking,
        // Scanner
        scan::simulate_scan,
        // Chatbot
        chatbot::chat,
        // Feedback
        feedback::submit_feedback,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            EmptyData,
            health::HealthResponse,
            // Locations
            locations::LocationDto,
            locations::SpotDto,
            locations::SpotBoardDto,
            // Sessions
            sessions::SessionDto,
            sessions::SelectLocationRequest,
            sessions::SelectSpotRequest,
            sessions::BookingRequest,
            sessions::PaymentSummaryDto,
            sessions::PassDto,
            sessions::RefundDto,
            sessions::ConfirmationDto,
            // Scanner
            scan::ScanResultDto,
            // Chatbot
            chatbot::ChatTurnDto,
            chatbot::ChatbotRequest,
            chatbot::ChatbotResponse,
            // Feedback
            feedback::FeedbackTypeDto,
            feedback::FeedbackRequest,
            feedback::FeedbackReceiptDto,
        )
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Locations", description = "Parking location catalog and spot grids"),
        (name = "Sessions", description = "Booking flow: select, book, pay, confirm, cancel, reset"),
        (name = "Scanner", description = "Simulated QR pass scanning"),
        (name = "Chatbot", description = "Help assistant backed by a hosted language model"),
        (name = "Feedback", description = "User feedback intake"),
    ),
    info(
        title = "ParkWatch Pass API",
        version = "1.0.0",
        description = "Demo parking booking service: pick a spot, pay, get a QR pass",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `/metrics` is only mounted when a Prometheus handle is supplied.
pub fn create_api_router(state: ParkWatchState, metrics: Option<PrometheusHandle>) -> Router {
    let api_routes = Router::new()
        // --- Catalog ---
        .route("/locations", get(locations::list_locations))
        .route("/locations/{location_id}", get(locations::get_location))
        .route(
            "/locations/{location_id}/spots",
            get(locations::get_spot_board),
        )
        // --- Booking sessions ---
        .route("/sessions", post(sessions::create_session))
        .route(
            "/sessions/{session_id}",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route(
            "/sessions/{session_id}/location",
            post(sessions::select_location),
        )
        .route("/sessions/{session_id}/spot", post(sessions::select_spot))
        .route(
            "/sessions/{session_id}/booking",
            post(sessions::submit_booking),
        )
        .route("/sessions/{session_id}/payment", get(sessions::get_payment))
        .route(
            "/sessions/{session_id}/payment/confirm",
            post(sessions::confirm_payment),
        )
        .route(
            "/sessions/{session_id}/confirmation",
            get(sessions::get_confirmation),
        )
        .route("/sessions/{session_id}/cancel", post(sessions::cancel_booking))
        .route("/sessions/{session_id}/reset", post(sessions::reset_booking))
        // --- Standalone tools ---
        .route("/scan/simulate", post(scan::simulate_scan))
        .route("/chatbot", post(chatbot::chat))
        .route("/feedback", post(feedback::submit_feedback));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));

    if let Some(handle) = metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::SessionRegistry;
    use crate::infrastructure::{DisabledGenerator, InMemoryCatalog, SeededRandom};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tokio::time::Duration;
    use tower::Service;

    fn app() -> Router {
        app_with_metrics(None)
    }

    fn app_with_metrics(metrics: Option<PrometheusHandle>) -> Router {
        let catalog = InMemoryCatalog::standard().with_occupied("pw_a2", &["B2"]);
        let workflow = Arc::new(BookingWorkflow::new(
            SessionRegistry::shared(),
            Arc::new(catalog),
            Duration::ZERO,
        ));
        let scanner = Arc::new(ScanSimulator::new(
            Arc::new(SeededRandom::from_seed(1)),
            Duration::ZERO,
            1.0,
        ));
        let chatbot = Arc::new(ChatbotService::new(Arc::new(DisabledGenerator), 20));
        let feedback = Arc::new(FeedbackService::new(Duration::ZERO));
        create_api_router(
            ParkWatchState::new(workflow, scanner, chatbot, feedback),
            metrics,
        )
    }

    struct Reply {
        status: StatusCode,
        headers: axum::http::HeaderMap,
        body: Value,
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Reply {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let mut svc = app.clone().into_service();
        let resp = svc.call(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Reply {
            status,
            headers,
            body,
        }
    }

    async fn new_session(app: &Router) -> String {
        let reply = call(app, "POST", "/api/v1/sessions", None).await;
        assert_eq!(reply.status, StatusCode::CREATED);
        reply.body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn submitted_session(app: &Router) -> String {
        let id = new_session(app).await;
        let base = format!("/api/v1/sessions/{}", id);
        let r = call(app, "POST", &format!("{}/location", base), Some(json!({"location_id": "pw_a2"}))).await;
        assert_eq!(r.status, StatusCode::OK);
        let r = call(app, "POST", &format!("{}/spot", base), Some(json!({"spot_id": "A1"}))).await;
        assert_eq!(r.status, StatusCode::OK);
        let r = call(
            app,
            "POST",
            &format!("{}/booking", base),
            Some(json!({"duration": 3, "vehicle_plate": "ABC123"})),
        )
        .await;
        assert_eq!(r.status, StatusCode::OK);
        assert_eq!(r.body["data"]["total_price"], "66.00");
        assert_eq!(r.body["data"]["phase"], "submitted");
        id
    }

    #[tokio::test]
    async fn health_reports_sessions() {
        let app = app();
        new_session(&app).await;
        let reply = call(&app, "GET", "/health", None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["status"], "ok");
        assert_eq!(reply.body["active_sessions"], 1);
    }

    #[tokio::test]
    async fn metrics_route_needs_recorder() {
        let reply = call(&app(), "GET", "/metrics", None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);

        let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
            .build_recorder()
            .handle();
        let reply = call(&app_with_metrics(Some(handle)), "GET", "/metrics", None).await;
        assert_eq!(reply.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let app = app();
        let mut svc = app.into_service();
        let req = Request::builder()
            .uri("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let resp = svc.call(req).await.unwrap();
        assert_eq!(resp.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn catalog_endpoints() {
        let app = app();
        let reply = call(&app, "GET", "/api/v1/locations", None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["data"].as_array().unwrap().len(), 9);

        let reply = call(&app, "GET", "/api/v1/locations/pw_a2", None).await;
        assert_eq!(reply.body["data"]["hourly_rate"], "22.00");

        let reply = call(&app, "GET", "/api/v1/locations/pw_a2/spots", None).await;
        assert_eq!(reply.body["data"]["rows"][1][1]["spot"], "B2");
        assert_eq!(reply.body["data"]["rows"][1][1]["occupied"], true);

        let reply = call(&app, "GET", "/api/v1/locations/nowhere", None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body["success"], false);
    }

    #[tokio::test]
    async fn booking_flow_issues_pass() {
        let app = app();
        let id = submitted_session(&app).await;
        let base = format!("/api/v1/sessions/{}", id);

        let reply = call(&app, "GET", &format!("{}/payment", base), None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["data"]["location_name"], "Downtown Metro Garage");
        assert_eq!(reply.body["data"]["currency"], "RM");

        let reply = call(&app, "POST", &format!("{}/payment/confirm", base), None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["data"]["phase"], "confirmed");
        let qr = reply.body["data"]["qr_code"].as_str().unwrap();
        assert!(qr.contains("\"spot\":\"A1\""));
        assert!(qr.contains("\"plate\":\"ABC123\""));
        assert!(qr.contains("\"paid\":\"66\""));

        let reply = call(&app, "GET", &format!("{}/confirmation", base), None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["data"]["status"], "confirmed");
        assert_eq!(
            reply.body["data"]["pass"]["download_file_name"],
            "ParkWatchPass-QR-ABC123-A1.png"
        );

        let reply = call(&app, "POST", &format!("{}/payment/confirm", base), None).await;
        assert_eq!(reply.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn incomplete_booking_redirects_home() {
        let app = app();
        let id = new_session(&app).await;
        for screen in ["payment", "confirmation"] {
            let reply = call(&app, "GET", &format!("/api/v1/sessions/{}/{}", id, screen), None).await;
            assert_eq!(reply.status, StatusCode::SEE_OTHER);
            assert_eq!(reply.headers[header::LOCATION], "/");
            assert!(reply.body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn selection_errors_map_to_statuses() {
        let app = app();
        let id = new_session(&app).await;
        let base = format!("/api/v1/sessions/{}", id);

        let reply = call(&app, "POST", &format!("{}/spot", base), Some(json!({"spot_id": "A1"}))).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body["error"], "Please select a parking location first.");

        call(&app, "POST", &format!("{}/location", base), Some(json!({"location_id": "pw_a2"}))).await;
        let reply = call(&app, "POST", &format!("{}/spot", base), Some(json!({"spot_id": "B2"}))).await;
        assert_eq!(reply.status, StatusCode::CONFLICT);

        let reply = call(
            &app,
            "POST",
            &format!("{}/booking", base),
            Some(json!({"duration": 0, "vehicle_plate": "ABC123"})),
        )
        .await;
        assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);

        let reply = call(
            &app,
            "POST",
            &format!("/api/v1/sessions/{}/location", uuid::Uuid::new_v4()),
            Some(json!({"location_id": "pw_a1"})),
        )
        .await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cancel_shows_refund_then_reset_clears() {
        let app = app();
        let id = submitted_session(&app).await;
        let base = format!("/api/v1/sessions/{}", id);
        call(&app, "POST", &format!("{}/payment/confirm", base), None).await;

        let reply = call(&app, "POST", &format!("{}/cancel", base), None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["data"]["amount"], "66.00");

        let reply = call(&app, "GET", &format!("{}/confirmation", base), None).await;
        assert_eq!(reply.body["data"]["status"], "cancelled");

        let reply = call(&app, "POST", &format!("{}/reset", base), None).await;
        assert_eq!(reply.body["data"]["phase"], "idle");
        assert_eq!(reply.body["data"]["location"], Value::Null);

        let reply = call(&app, "DELETE", &base, None).await;
        assert_eq!(reply.status, StatusCode::OK);
        let reply = call(&app, "GET", &base, None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn scan_chatbot_and_feedback() {
        let app = app();

        let reply = call(&app, "POST", "/api/v1/scan/simulate", None).await;
        assert_eq!(reply.body["data"]["status"], "success");

        let reply = call(&app, "POST", "/api/v1/chatbot", Some(json!({"message": "Hello"}))).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.body["data"]["reply"],
            "Apologies, I'm unable to process your request at the moment. Please try again later."
        );

        let reply = call(
            &app,
            "POST",
            "/api/v1/feedback",
            Some(json!({"feedback_type": "general", "email": "", "message": "Lovely little demo app."})),
        )
        .await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["data"]["message"], "Thank you for your valuable feedback.");

        let reply = call(
            &app,
            "POST",
            "/api/v1/feedback",
            Some(json!({"feedback_type": "bug", "message": "short"})),
        )
        .await;
        assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn openapi_lists_session_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/sessions/{session_id}/payment/confirm"));
        assert!(doc.paths.paths.contains_key("/api/v1/chatbot"));
    }
}
