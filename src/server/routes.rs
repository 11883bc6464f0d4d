use std::sync::Arc;

use axum::{
    extract::{
        ws::WebSocketUpgrade,
        Query,
        State,
    },
    http::StatusCode,
    response::{
        Html,
        IntoResponse,
        Response,
    },
    routing::get,
    Json,
    Router,
};
use serde_json::json;

use super::{
    connection::handle_connection,
    types::DashboardQuery,
};
use crate::{
    core::DashboardError,
    dashboard::{
        CourseOptions,
        Dashboard,
        Overview,
        Snapshot,
    },
    render::TablePage,
};

const DASHBOARD_PAGE: &str = include_str!("dashboard.html");

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::UnknownCourse(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            log::error!("[HTTP] {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(dashboard: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/courses", get(courses))
        .route("/api/overview", get(overview))
        .route("/api/dashboard", get(snapshot))
        .route("/api/table", get(table))
        .route("/ws", get(websocket))
        .with_state(AppState { dashboard })
}

async fn index() -> Html<&'static str> {
    Html(DASHBOARD_PAGE)
}

async fn courses(State(state): State<AppState>) -> Json<CourseOptions> {
    Json(state.dashboard.course_options())
}

async fn overview(State(state): State<AppState>) -> Json<Overview> {
    Json(state.dashboard.overview().clone())
}

fn ensure_option(dashboard: &Dashboard, course_id: &str) -> Result<(), DashboardError> {
    if dashboard.is_option(course_id) {
        Ok(())
    } else {
        Err(DashboardError::UnknownCourse(course_id.to_string()))
    }
}

async fn snapshot(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Snapshot>, DashboardError> {
    ensure_option(&state.dashboard, &query.course_id)?;
    log::debug!("[HTTP] Snapshot for {}", query.course_id);

    let dashboard = state.dashboard.clone();
    let snapshot = tokio::task::spawn_blocking(move || dashboard.select(&query.course_id))
        .await
        .map_err(|e| DashboardError::Custom(format!("Snapshot task failed: {e}")))?;
    Ok(Json(snapshot))
}

async fn table(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<TablePage>, DashboardError> {
    ensure_option(&state.dashboard, &query.course_id)?;
    Ok(Json(state.dashboard.table_page(&query.course_id, query.page)))
}

async fn websocket(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = handle_connection(socket, state.dashboard).await {
            log::warn!("[WS] Connection ended with error: {}", e);
        }
    })
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{
            to_bytes,
            Body,
        },
        http::Request,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{
        core::DashboardSettings,
        dataset::{
            fixtures::sample_reviews,
            Dataset,
        },
    };

    fn app() -> Router {
        let dataset = Arc::new(Dataset::new(sample_reviews()).unwrap());
        router(Arc::new(Dashboard::new(dataset, &DashboardSettings::default()).unwrap()))
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response =
            app().oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn test_index_serves_page() {
        let response =
            app().oneshot(Request::builder().uri("/").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("Sentiment Analysis Dashboard"));
    }

    #[test]
    fn test_page_renders_overview_header() {
        assert!(DASHBOARD_PAGE.contains(r#"id="overview-gauge""#));
        assert!(DASHBOARD_PAGE.contains(r#"fetch("/api/overview")"#));
        assert!(DASHBOARD_PAGE.contains("overview.gauge.svg"));
        assert!(DASHBOARD_PAGE.contains("overview.course_count"));
    }

    #[test]
    fn test_page_selects_over_socket_before_http() {
        let startup = DASHBOARD_PAGE.rsplit("fetch(\"/api/courses\")").next().unwrap();
        assert!(startup.contains("connect();"));
        assert!(!startup.contains("requestSnapshot();"));
        assert!(DASHBOARD_PAGE.contains("readyState === WebSocket.CONNECTING) return;"));
    }

    #[test]
    fn test_page_builds_table_from_columns() {
        assert!(DASHBOARD_PAGE.contains("table.columns"));
        assert!(!DASHBOARD_PAGE.contains("<th>ID</th>"));
    }

    #[tokio::test]
    async fn test_courses() {
        let (status, body) = get_json("/api/courses").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["options"], json!(["C1", "C2"]));
        assert_eq!(body["default"], "C1");
    }

    #[tokio::test]
    async fn test_dashboard_snapshot() {
        let (status, body) = get_json("/api/dashboard?course_id=C1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["course_id"], "C1");
        assert_eq!(body["summary"]["count"], 4);
        assert_eq!(body["summary"]["average_rating"], 2.75);
        assert_eq!(body["summary"]["sentiment_percentage"], 50.0);
        assert_eq!(body["summary"]["class_counts"], json!({"negative": 1, "neutral": 1, "positive": 2}));
        assert_eq!(body["word_images"]["neutral"]["status"], "rendered");
        assert_eq!(body["table"]["columns"][0], json!({"header": "ID", "field": "id"}));
    }

    #[tokio::test]
    async fn test_unknown_course_is_404() {
        let (status, body) = get_json("/api/dashboard?course_id=ghost").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Unknown course: ghost");
    }

    #[tokio::test]
    async fn test_missing_course_id_is_400() {
        let (status, _) = get_json("/api/dashboard").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_table_page() {
        let (status, body) = get_json("/api/table?course_id=C1&page=0").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page_size"], 5);
        assert_eq!(body["total_rows"], 4);
        assert_eq!(body["rows"].as_array().unwrap().len(), 4);
        assert_eq!(body["rows"][0]["classification"], "Positive");
    }

    #[tokio::test]
    async fn test_overview() {
        let (status, body) = get_json("/api/overview").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["count"], 5);
        assert_eq!(body["gauge"]["kind"], "overview");
        assert_eq!(body["course_count"], 2);
        assert_eq!(body["average_rating_display"], "3.00");
        assert!(body["gauge"]["svg"].as_str().unwrap().starts_with("<svg"));
    }
}
