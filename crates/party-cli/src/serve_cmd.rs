use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;

use party_core::plan::{Category, GeneratedPlan, PlanBackend};
use party_core::{Dictionary, FormSelection, Language, PlaceholderScore, Plan, placeholder_score};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Handler-boundary failure, rendered as the 500 error envelope.
pub struct ApiError {
    language: Language,
    details: String,
}

impl ApiError {
    pub fn internal(language: Language, err: anyhow::Error) -> Self {
        Self {
            language,
            details: format!("{err:#}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!(details = %self.details, "request failed");
        let body = ErrorResponse {
            success: false,
            error: Dictionary::load(self.language).text("api.error"),
            details: self.details,
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanResponse {
    pub success: bool,
    pub data: Plan,
    pub is_mock_data: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub success: bool,
    pub data: PlaceholderScore,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub details: String,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Immutable state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn PlanBackend>,
    /// Language used when a request does not name one.
    pub default_language: Language,
}

impl AppState {
    pub fn new(backend: impl PlanBackend + 'static, default_language: Language) -> Self {
        Self {
            backend: Arc::new(backend),
            default_language,
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/generate-plan", post(generate_plan_handler))
        .route("/api/score", post(score_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let backend = state.backend.name().to_string();
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {bind}:{port}"))?;
    tracing::info!(%backend, "partyplan serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("partyplan serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}

// ---------------------------------------------------------------------------
// Request parsing
// ---------------------------------------------------------------------------

/// Parse a request body leniently.
///
/// Any syntactically valid JSON is accepted; fields that are missing or of
/// the wrong type become empty. Only unparseable bytes are an error.
fn parse_request(
    body: &Bytes,
    default_language: Language,
) -> Result<(FormSelection, Language), ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        ApiError::internal(
            default_language,
            anyhow::Error::new(e).context("request body is not valid JSON"),
        )
    })?;
    let language = value
        .get("language")
        .and_then(Value::as_str)
        .map_or(default_language, Language::from_code_lossy);
    Ok((FormSelection::from_json_value(&value), language))
}

async fn run_backend(
    state: &AppState,
    selection: &FormSelection,
    language: Language,
) -> Result<GeneratedPlan, ApiError> {
    state
        .backend
        .generate(selection, language)
        .await
        .map_err(|e| ApiError::internal(language, e))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index(State(state): State<AppState>) -> Html<String> {
    let dict = Dictionary::load(state.default_language);
    let categories = Category::ALL
        .iter()
        .map(|c| dict.text(&format!("categories.{}", c.key())))
        .collect::<Vec<_>>()
        .join(" · ");

    Html(format!(
        "<!DOCTYPE html>\
<html><head><meta charset=\"utf-8\"><title>partyplan</title></head><body>\
<h1>{title}</h1>\
<p>{categories}</p>\
<p><code>POST /api/generate-plan</code> | <code>POST /api/score</code> | <a href=\"/api/health\">/api/health</a></p>\
</body></html>",
        title = dict.text("export.title"),
    ))
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn generate_plan_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GeneratePlanResponse>, ApiError> {
    let (selection, language) = parse_request(&body, state.default_language)?;
    let missing = selection.missing_fields();
    if !missing.is_empty() {
        tracing::debug!(?missing, "generating with incomplete selection");
    }

    let generated = run_backend(&state, &selection, language).await?;
    tracing::info!(
        backend = state.backend.name(),
        %language,
        entries = generated.plan.len(),
        "generated plan"
    );

    Ok(Json(GeneratePlanResponse {
        success: true,
        data: generated.plan,
        is_mock_data: generated.is_mock,
        message: Dictionary::load(language).text("api.success"),
    }))
}

async fn score_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ScoreResponse>, ApiError> {
    let (selection, language) = parse_request(&body, state.default_language)?;
    let generated = run_backend(&state, &selection, language).await?;
    let score = placeholder_score(&selection, generated.plan.len(), language);
    tracing::info!(total = score.total, level = %score.level, "computed placeholder score");

    Ok(Json(ScoreResponse {
        success: true,
        data: score,
        message: Dictionary::load(language).text("api.scoreSuccess"),
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use anyhow::bail;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use party_core::plan::{GeneratedPlan, MockPlanBackend, PlanBackend};
    use party_core::{FormSelection, Language};

    use super::AppState;

    // -----------------------------------------------------------------------
    // HTTP helpers
    // -----------------------------------------------------------------------

    fn mock_state() -> AppState {
        AppState::new(MockPlanBackend::default(), Language::Zh)
    }

    async fn post(state: AppState, uri: &str, body: &str) -> axum::response::Response {
        let app = super::build_router(state);
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn get(uri: &str) -> axum::response::Response {
        let app = super::build_router(mock_state());
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const EXAMPLE: &str = r#"{"partyType":"child","guestCount":"medium","venue":"indoor","budget":"medium","theme":"公主主题","atmosphere":"lively"}"#;

    struct FailingBackend;

    #[async_trait]
    impl PlanBackend for FailingBackend {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(
            &self,
            _selection: &FormSelection,
            _language: Language,
        ) -> anyhow::Result<GeneratedPlan> {
            bail!("template store unavailable")
        }
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_index_lists_categories_and_routes() {
        let resp = get("/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let is_html = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/html"));
        assert!(is_html, "index page is not served as HTML");

        let bytes = axum::body::to_bytes(resp.into_body(), 1_048_576)
            .await
            .unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        for name in ["场地布置", "活动安排", "装饰方案", "餐饮建议", "音乐选择", "时间安排"] {
            assert!(page.contains(name), "index page lacks category {name}");
        }
        assert!(page.contains("/api/generate-plan"));
        assert!(page.contains("/api/score"));
    }

    #[tokio::test]
    async fn test_health() {
        let resp = get("/api/health").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_generate_plan_envelope() {
        let resp = post(mock_state(), "/api/generate-plan", EXAMPLE).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["isMockData"], true);
        assert!(json["message"].as_str().is_some_and(|m| !m.is_empty()));

        let data = json["data"].as_object().expect("data should be an object");
        assert_eq!(data.len(), 6);
        for (key, len) in [
            ("venue", 4),
            ("activities", 5),
            ("decorations", 4),
            ("catering", 4),
            ("music", 3),
            ("schedule", 6),
        ] {
            assert_eq!(data[key].as_array().map(Vec::len), Some(len), "{key}");
        }
    }

    #[tokio::test]
    async fn test_generate_plan_is_deterministic() {
        let first = body_json(post(mock_state(), "/api/generate-plan", EXAMPLE).await).await;
        let second = body_json(post(mock_state(), "/api/generate-plan", EXAMPLE).await).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_generate_plan_tolerates_missing_and_odd_fields() {
        for body in [
            "{}",
            r#"{"budget":"ultra"}"#,
            r#"{"guestCount":25,"venue":null,"theme":["x"]}"#,
            "[]",
            "\"just a string\"",
            "null",
        ] {
            let resp = post(mock_state(), "/api/generate-plan", body).await;
            assert_eq!(resp.status(), StatusCode::OK, "body {body}");
            let json = body_json(resp).await;
            assert_eq!(json["success"], true, "body {body}");
        }
    }

    #[tokio::test]
    async fn test_generate_plan_ultra_budget_uses_lowest_price() {
        let body = r#"{"budget":"ultra","language":"en"}"#;
        let json = body_json(post(mock_state(), "/api/generate-plan", body).await).await;
        let first = json["data"]["catering"][0].as_str().unwrap();
        assert!(first.ends_with("$10-15 per person"), "got {first}");
    }

    #[tokio::test]
    async fn test_generate_plan_respects_language_field() {
        let body = r#"{"partyType":"wedding","language":"en-US"}"#;
        let json = body_json(post(mock_state(), "/api/generate-plan", body).await).await;
        assert_eq!(json["message"], "Party plan generated (sample data)");

        let json = body_json(post(mock_state(), "/api/generate-plan", "{}").await).await;
        assert_eq!(json["message"], "派对方案生成成功（示例数据）");
    }

    #[tokio::test]
    async fn test_invalid_json_returns_error_envelope() {
        let resp = post(mock_state(), "/api/generate-plan", "{not json").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()));
        assert!(
            json["details"]
                .as_str()
                .is_some_and(|d| d.contains("not valid JSON")),
            "details: {}",
            json["details"]
        );
    }

    #[tokio::test]
    async fn test_backend_failure_returns_error_envelope() {
        let state = AppState::new(FailingBackend, Language::En);
        let resp = post(state, "/api/generate-plan", EXAMPLE).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
        assert_eq!(
            json["error"],
            "Something went wrong while generating the party plan, please try again later"
        );
        assert_eq!(json["details"], "template store unavailable");
    }

    #[tokio::test]
    async fn test_score_endpoint() {
        let resp = post(mock_state(), "/api/score", EXAMPLE).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["success"], true);

        let data = &json["data"];
        assert_eq!(data["isPlaceholder"], true);
        let total = data["total"].as_u64().unwrap();
        assert!((90..=100).contains(&total));

        let sum: u64 = data["categories"]
            .as_object()
            .unwrap()
            .values()
            .map(|v| v.as_u64().unwrap())
            .sum();
        assert_eq!(sum, total);

        let again = body_json(post(mock_state(), "/api/score", EXAMPLE).await).await;
        assert_eq!(again["data"], json["data"]);
    }
}
