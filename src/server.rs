//! Web form
//!
//! `GET /` shows the form, `POST /solve` runs one solve and renders the
//! report under the form, `GET /health` answers liveness checks.

use crate::llm::CompletionBackend;
use crate::render;
use crate::session::SolverSession;
use axum::extract::{Form, State};
use axum::response::{Html, Json};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Debug, Deserialize)]
pub struct SolveForm {
    #[serde(default)]
    pub problem: String,
}

pub fn router<B>(session: Arc<SolverSession<B>>) -> Router
where
    B: CompletionBackend + 'static,
{
    Router::new()
        .route("/", get(index))
        .route("/solve", post(solve::<B>))
        .route("/health", get(health::<B>))
        .layer(TraceLayer::new_for_http())
        .with_state(session)
}

pub async fn serve<B>(session: Arc<SolverSession<B>>, addr: SocketAddr) -> anyhow::Result<()>
where
    B: CompletionBackend + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(session)).await?;
    Ok(())
}

async fn index() -> Html<String> {
    Html(render::render_page("", None))
}

async fn solve<B>(
    State(session): State<Arc<SolverSession<B>>>,
    Form(form): Form<SolveForm>,
) -> Html<String>
where
    B: CompletionBackend + 'static,
{
    let report = session.solve(&form.problem).await;
    Html(render::render_page(&form.problem, Some(&report)))
}

async fn health<B>(State(session): State<Arc<SolverSession<B>>>) -> Json<serde_json::Value>
where
    B: CompletionBackend + 'static,
{
    Json(serde_json::json!({
        "status": "ok",
        "records": session.matrix().len(),
        "principles": session.catalog().len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PrincipleCatalog;
    use crate::llm::testing::ScriptedBackend;
    use crate::matrix::ContradictionMatrix;
    use crate::types::ContradictionRecord;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn app(backend: ScriptedBackend) -> Router {
        let matrix = ContradictionMatrix::new(vec![ContradictionRecord {
            improving: "Strength".to_string(),
            worsening: "Weight".to_string(),
            principles: vec![1, 8],
        }]);
        router(Arc::new(SolverSession::new(
            backend,
            matrix,
            PrincipleCatalog::standard(),
        )))
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_serves_form() {
        let response = app(ScriptedBackend::new())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Solve Problem"));
    }

    #[tokio::test]
    async fn test_solve_renders_report() {
        let backend = ScriptedBackend::new()
            .reply("Strength")
            .reply("segment it")
            .reply("float it")
            .reply("pick 8");

        let response = app(backend)
            .oneshot(
                Request::post("/solve")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("problem=stronger+but+lighter+frame"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Principle 1: Segmentation"));
        assert!(html.contains("Principle 8: Anti-weight"));
        assert!(html.contains("pick 8"));
        assert!(html.contains("stronger but lighter frame</textarea>"));
    }

    #[tokio::test]
    async fn test_solve_empty_problem() {
        let response = app(ScriptedBackend::new())
            .oneshot(
                Request::post("/solve")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("problem="))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(body_text(response)
            .await
            .contains("Please describe your engineering problem"));
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(ScriptedBackend::new())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["records"], 1);
    }
}
