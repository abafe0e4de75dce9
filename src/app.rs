use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::database::models::{Contractor, DairySite, Diesel, Mnr, NmrVehicle, Painting, Stock, Task, VehicleLog};
use crate::database::store::RecordStore;
use crate::handlers::protected::{self, report::collection, report::record};
use crate::handlers::public;
use crate::middleware::jwt_auth_middleware;
use crate::report::{ReportEngine, Reportable};
use crate::services::RecordService;

/// Shared handler state. Built once by the entry point; the store is injected.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn RecordStore>,
    pub reports: ReportEngine,
    pub records: RecordService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn RecordStore>) -> Self {
        Self {
            config: Arc::new(config),
            reports: ReportEngine::new(store.clone()),
            records: RecordService::new(store.clone()),
            store,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/v1/token", get(protected::auth::whoami))
        .merge(report_routes::<Contractor>())
        .merge(report_routes::<DairySite>())
        .merge(report_routes::<Painting>())
        .merge(report_routes::<Mnr>())
        .merge(report_routes::<NmrVehicle>())
        .merge(report_routes::<Task>())
        .merge(report_routes::<VehicleLog>())
        .merge(report_routes::<Stock>())
        .merge(report_routes::<Diesel>())
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected
        .merge(api)
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    if let Some(cors) = cors_layer(&state.config) {
        router = router.layer(cors);
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn report_routes<R: Reportable>() -> Router<AppState> {
    let base = format!("/api/v1/{}", R::SCHEMA.slug);

    Router::new()
        .route(&base, get(collection::list::<R>).post(collection::create::<R>))
        .route(&format!("{}/batch", base), post(collection::batch::<R>))
        .route(
            &format!("{}/:id", base),
            get(record::get::<R>).put(record::update::<R>).delete(record::delete::<R>),
        )
}

fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    if !config.security.enable_cors {
        return None;
    }
    if config.cors_allows_any() {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{generate_jwt, Claims};
    use crate::testing::MemoryStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const SECRET: &str = "app-test-secret";
    const ID: &str = "3d0f6b8e-2a41-4c9b-8f57-6a1e0c2d9b10";

    fn config() -> AppConfig {
        AppConfig::from_lookup(|key| match key {
            "JWT_SECRET" => Some(SECRET.to_string()),
            "DATABASE_URL" => Some("postgres://localhost/fieldops".to_string()),
            _ => None,
        })
    }

    fn state_with(store: Arc<MemoryStore>) -> AppState {
        AppState::new(config(), store)
    }

    fn token() -> String {
        let claims = Claims::new("user-7", "Priya", "555-0142", "engineer", 1);
        generate_jwt(&claims, SECRET).unwrap()
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token()));
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = app(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, body)
    }

    fn task(id: &str) -> Value {
        json!({
            "id": id,
            "label": "Replace valve",
            "location": "Depot 4",
            "measurement": "1 unit",
            "taskType": "pipeline",
            "expectedCompletionDays": "2",
            "startDate": "2024-01-02T00:00:00Z",
            "endDate": "2024-01-04T00:00:00Z",
            "siteEngineerName": "Someone Else",
            "siteEngineerPhone": "000",
            "latitude": 12.9,
            "longitude": 77.6,
            "submittedAt": "2024-01-02T09:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let state = state_with(Arc::new(MemoryStore::new()));
        let req = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&state, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let down = state_with(Arc::new(MemoryStore::unavailable()));
        let req = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&down, req).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
    }

    #[tokio::test]
    async fn test_root_lists_report_routes() {
        let state = state_with(Arc::new(MemoryStore::new()));
        let (status, body) = send(&state, Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let reports = body["endpoints"]["reports"].as_array().unwrap();
        assert!(reports.contains(&json!("/api/v1/nmr-vehicle")));
    }

    #[tokio::test]
    async fn test_requires_bearer_token() {
        let state = state_with(Arc::new(MemoryStore::new()));
        let req = Request::get("/api/v1/contractor").body(Body::empty()).unwrap();
        let (status, body) = send(&state, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");

        let req = Request::get("/api/v1/contractor")
            .header(header::AUTHORIZATION, "Bearer not.a.token")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&state, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_whoami() {
        let state = state_with(Arc::new(MemoryStore::new()));
        let (status, body) = send(&state, request("GET", "/api/v1/token", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["userId"], "user-7");
        assert_eq!(body["phone"], "555-0142");
    }

    #[tokio::test]
    async fn test_bad_pagination_never_reaches_storage() {
        let store = Arc::new(MemoryStore::new());
        let state = state_with(store.clone());
        for uri in [
            "/api/v1/stock?page=0",
            "/api/v1/stock?limit=0",
            "/api/v1/stock?page=abc",
            "/api/v1/stock?limit=-5",
            "/api/v1/stock?fromDate=2024-1-1",
        ] {
            let (status, _) = send(&state, request("GET", uri, None)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_limit_above_cap_is_served_at_cap() {
        let state = state_with(Arc::new(MemoryStore::new()));
        let (status, body) = send(&state, request("GET", "/api/v1/diesel?limit=5000", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["limit"], 1000);
        assert_eq!(body["total"], 0);
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_create_list_get_delete() {
        let state = state_with(Arc::new(MemoryStore::new()));

        let (status, created) = send(&state, request("POST", "/api/v1/tasks", Some(task(ID)))).await;
        assert_eq!(status, StatusCode::CREATED, "{}", created);
        assert_eq!(created["siteEngineerName"], "Priya");

        let (status, listed) = send(&state, request("GET", "/api/v1/tasks?taskType=pipeline&fields=id,label", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed["total"], 1);
        assert_eq!(listed["data"][0], json!({ "id": ID, "label": "Replace valve" }));

        let uri = format!("/api/v1/tasks/{}", ID);
        let (status, fetched) = send(&state, request("GET", &uri, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["location"], "Depot 4");

        let (status, updated) = send(&state, request("PUT", &uri, Some(json!({ "remarks": "done" })))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["remarks"], "done");
        assert_eq!(updated["label"], "Replace valve");

        let (status, body) = send(&state, request("DELETE", &uri, None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = send(&state, request("GET", &uri, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_create_conflicts() {
        let state = state_with(Arc::new(MemoryStore::new()));
        let (status, _) = send(&state, request("POST", "/api/v1/tasks", Some(task(ID)))).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = send(&state, request("POST", "/api/v1/tasks", Some(task(ID)))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_batch_is_insert_or_ignore() {
        let state = state_with(Arc::new(MemoryStore::new()));
        let other = "9a3c1e7b-5d20-4f68-a1b4-7c8d9e0f1a2b";
        let batch = json!([task(ID), task(other)]);

        let (status, first) = send(&state, request("POST", "/api/v1/tasks/batch", Some(batch.clone()))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first, json!({ "received": 2, "inserted": 2 }));

        let (_, second) = send(&state, request("POST", "/api/v1/tasks/batch", Some(batch))).await;
        assert_eq!(second, json!({ "received": 2, "inserted": 0 }));

        let (_, listed) = send(&state, request("GET", "/api/v1/tasks", None)).await;
        assert_eq!(listed["total"], 2);
    }

    #[tokio::test]
    async fn test_malformed_input() {
        let state = state_with(Arc::new(MemoryStore::new()));

        let req = Request::post("/api/v1/tasks")
            .header(header::AUTHORIZATION, format!("Bearer {}", token()))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&state, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_JSON");

        let (status, body) = send(&state, request("GET", "/api/v1/tasks/42", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "invalid id parameter: 42 (must be a UUID)");

        let mut missing = task(ID);
        missing.as_object_mut().unwrap().remove("label");
        let (status, body) = send(&state, request("POST", "/api/v1/tasks", Some(missing))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field_errors"]["label"], "This field is required");
    }
}
