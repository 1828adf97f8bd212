pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::biography::handlers as biography;
use crate::export;
use crate::narrative::handlers as narrative;
use crate::state::AppState;
use crate::story::handlers as story;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Biography records
        .route(
            "/api/v1/biographies",
            get(biography::handle_list_biographies).post(biography::handle_save_biography),
        )
        .route("/api/v1/biographies/:id", get(biography::handle_get_biography))
        .route(
            "/api/v1/biographies/:id/fields",
            patch(biography::handle_update_field),
        )
        .route(
            "/api/v1/biographies/:id/progress",
            get(biography::handle_progress),
        )
        .route(
            "/api/v1/biographies/:id/timeline",
            get(biography::handle_timeline),
        )
        // Generation
        .route("/api/v1/styles", get(narrative::handle_list_styles))
        .route("/api/v1/generate", post(narrative::handle_generate))
        // Stories and export
        .route(
            "/api/v1/stories",
            get(story::handle_list_stories).post(story::handle_save_story),
        )
        .route("/api/v1/stories/:id", get(story::handle_get_story))
        .route(
            "/api/v1/stories/:id/export",
            get(story::handle_export_story),
        )
        .route("/api/v1/export", post(export::handle_export))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::llm_client::{LlmClient, DEFAULT_BASE_URL};
    use crate::store::MemoryRecordStore;
    use crate::testing::StubGenerator;

    fn app_with(narrator: Arc<StubGenerator>) -> Router {
        build_router(AppState {
            store: Arc::new(MemoryRecordStore::default()),
            narrator,
        })
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        app.clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn create_biography(app: &Router, user_id: Uuid, full_name: &str) -> Value {
        let response = send(
            app,
            Method::POST,
            "/api/v1/biographies",
            Some(json!({
                "owner_id": user_id,
                "personal_info": { "full_name": full_name }
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_health_reports_generation_state() {
        let app = app_with(Arc::new(StubGenerator::replying("x")));
        let json = body_json(send(&app, Method::GET, "/health", None).await).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["store"], "memory");
        assert_eq!(json["generation_enabled"], true);
    }

    #[tokio::test]
    async fn test_generate_inline_record() {
        let stub = Arc::new(StubGenerator::replying("Hello story"));
        let app = app_with(stub.clone());

        let response = send(
            &app,
            Method::POST,
            "/api/v1/generate",
            Some(json!({
                "record": { "personal_info": { "full_name": "Jane Doe" } },
                "style": "simple"
            })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["content"], "Hello story");
        assert_eq!(json["suggested_title"], "Jane Doe's Life Story");
        assert_eq!(stub.calls(), 1);
        assert!(stub.last_prompt().unwrap().contains("Name: Jane Doe"));
    }

    #[tokio::test]
    async fn test_generate_rejects_unknown_style() {
        let stub = Arc::new(StubGenerator::replying("unused"));
        let app = app_with(stub.clone());

        let response = send(
            &app,
            Method::POST,
            "/api/v1/generate",
            Some(json!({ "record": {}, "style": "dramatic" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "INVALID_REQUEST");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_with_mistyped_fields_is_invalid_request() {
        let stub = Arc::new(StubGenerator::replying("unused"));
        let app = app_with(stub.clone());

        for body in [
            json!({ "record": {}, "style": 5 }),
            json!({ "record": { "personal_info": { "full_name": 7 } }, "style": "simple" }),
        ] {
            let response = send(&app, Method::POST, "/api/v1/generate", Some(body)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(response).await["error"]["code"], "INVALID_REQUEST");
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_unparseable_body_uses_error_envelope() {
        let app = app_with(Arc::new(StubGenerator::replying("x")));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/biographies")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_generate_without_record_is_invalid() {
        let stub = Arc::new(StubGenerator::replying("unused"));
        let app = app_with(stub.clone());

        let response = send(
            &app,
            Method::POST,
            "/api/v1/generate",
            Some(json!({ "style": "poetic" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_without_credential_is_503() {
        let app = build_router(AppState {
            store: Arc::new(MemoryRecordStore::default()),
            narrator: Arc::new(LlmClient::new(None, DEFAULT_BASE_URL)),
        });

        let response = send(
            &app,
            Method::POST,
            "/api/v1/generate",
            Some(json!({ "record": {}, "style": "emotional" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body_json(response).await["error"]["code"],
            "SERVICE_UNAVAILABLE"
        );
    }

    #[tokio::test]
    async fn test_generate_from_stored_biography() {
        let stub = Arc::new(StubGenerator::replying("Stored story"));
        let app = app_with(stub.clone());
        let user_id = Uuid::new_v4();
        let saved = create_biography(&app, user_id, "Ada").await;

        let response = send(
            &app,
            Method::POST,
            "/api/v1/generate",
            Some(json!({
                "biography_id": saved["id"],
                "user_id": user_id,
                "style": "professional"
            })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["content"], "Stored story");
        assert!(stub.last_prompt().unwrap().contains("Name: Ada"));
    }

    #[tokio::test]
    async fn test_generate_from_unknown_biography_is_404() {
        let stub = Arc::new(StubGenerator::replying("unused"));
        let app = app_with(stub.clone());

        let response = send(
            &app,
            Method::POST,
            "/api/v1/generate",
            Some(json!({
                "biography_id": Uuid::new_v4(),
                "user_id": Uuid::new_v4(),
                "style": "simple"
            })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_biography_lifecycle() {
        let app = app_with(Arc::new(StubGenerator::replying("x")));
        let user_id = Uuid::new_v4();
        let saved = create_biography(&app, user_id, "Jane Doe").await;
        let id = saved["id"].as_str().unwrap().to_string();

        let response = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/biographies/{id}/fields"),
            Some(json!({
                "user_id": user_id,
                "section": "education_journey",
                "field": "schools",
                "value": "Lincoln High"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["education_journey"]["schools"], "Lincoln High");
        assert_eq!(updated["personal_info"]["full_name"], "Jane Doe");

        let fetched = body_json(
            send(
                &app,
                Method::GET,
                &format!("/api/v1/biographies/{id}?user_id={user_id}"),
                None,
            )
            .await,
        )
        .await;
        assert_eq!(fetched["education_journey"]["schools"], "Lincoln High");

        let listed = body_json(
            send(
                &app,
                Method::GET,
                &format!("/api/v1/biographies?user_id={user_id}"),
                None,
            )
            .await,
        )
        .await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let progress = body_json(
            send(
                &app,
                Method::GET,
                &format!("/api/v1/biographies/{id}/progress?user_id={user_id}"),
                None,
            )
            .await,
        )
        .await;
        assert_eq!(progress["sections"][0]["filled"], 1);
        assert_eq!(progress["sections"][2]["status"], "partial");

        let timeline = body_json(
            send(
                &app,
                Method::GET,
                &format!("/api/v1/biographies/{id}/timeline?user_id={user_id}"),
                None,
            )
            .await,
        )
        .await;
        assert_eq!(timeline[0]["category"], "Education");
    }

    #[tokio::test]
    async fn test_saving_a_stale_copy_is_409() {
        let app = app_with(Arc::new(StubGenerator::replying("x")));
        let user_id = Uuid::new_v4();
        let mut stale = create_biography(&app, user_id, "Jane Doe").await;
        let id = stale["id"].as_str().unwrap().to_string();

        let response = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/biographies/{id}/fields"),
            Some(json!({
                "user_id": user_id,
                "section": "education_journey",
                "field": "schools",
                "value": "Lincoln High"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        stale["personal_info"]["birthplace"] = json!("Oslo");
        let response = send(&app, Method::POST, "/api/v1/biographies", Some(stale)).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["error"]["code"], "CONFLICT");

        let fetched = body_json(
            send(
                &app,
                Method::GET,
                &format!("/api/v1/biographies/{id}?user_id={user_id}"),
                None,
            )
            .await,
        )
        .await;
        assert_eq!(fetched["education_journey"]["schools"], "Lincoln High");
        assert_eq!(fetched["personal_info"]["birthplace"], "");
    }

    #[tokio::test]
    async fn test_update_unknown_field_is_400() {
        let app = app_with(Arc::new(StubGenerator::replying("x")));
        let user_id = Uuid::new_v4();
        let saved = create_biography(&app, user_id, "Jane Doe").await;
        let id = saved["id"].as_str().unwrap().to_string();

        let response = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/biographies/{id}/fields"),
            Some(json!({
                "user_id": user_id,
                "section": "personal_info",
                "field": "nickname",
                "value": "JD"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_save_biography_requires_owner() {
        let app = app_with(Arc::new(StubGenerator::replying("x")));
        let response = send(
            &app,
            Method::POST,
            "/api/v1/biographies",
            Some(json!({ "personal_info": { "full_name": "Nobody" } })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_other_user_cannot_read_biography() {
        let app = app_with(Arc::new(StubGenerator::replying("x")));
        let saved = create_biography(&app, Uuid::new_v4(), "Jane Doe").await;
        let id = saved["id"].as_str().unwrap().to_string();

        let response = send(
            &app,
            Method::GET,
            &format!("/api/v1/biographies/{id}?user_id={}", Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_save_and_export_story() {
        let app = app_with(Arc::new(StubGenerator::replying("x")));
        let user_id = Uuid::new_v4();
        let saved = create_biography(&app, user_id, "Jane Doe").await;

        let response = send(
            &app,
            Method::POST,
            "/api/v1/stories",
            Some(json!({
                "user_id": user_id,
                "biography_id": saved["id"],
                "style": "poetic",
                "title": "Jane Doe's Life Story",
                "content": "Chapter 1\nThe beginning."
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let story = body_json(response).await;
        let story_id = story["id"].as_str().unwrap().to_string();
        assert_eq!(story["style"], "poetic");

        let listed = body_json(
            send(
                &app,
                Method::GET,
                &format!("/api/v1/stories?user_id={user_id}"),
                None,
            )
            .await,
        )
        .await;
        assert_eq!(listed[0]["excerpt"], "Chapter 1\nThe beginning....");

        let response = send(
            &app,
            Method::GET,
            &format!("/api/v1/stories/{story_id}/export?user_id={user_id}&format=html"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Jane Doe's Life Story.html\"; \
             filename*=UTF-8''Jane%20Doe%27s%20Life%20Story.html"
        );
        let html = body_text(response).await;
        assert!(html.contains("<p>The beginning.</p>"));
    }

    #[tokio::test]
    async fn test_story_for_unknown_biography_is_404() {
        let app = app_with(Arc::new(StubGenerator::replying("x")));
        let response = send(
            &app,
            Method::POST,
            "/api/v1/stories",
            Some(json!({
                "user_id": Uuid::new_v4(),
                "biography_id": Uuid::new_v4(),
                "style": "simple",
                "content": "Hello story"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_unsaved_text() {
        let app = app_with(Arc::new(StubGenerator::replying("x")));
        let response = send(
            &app,
            Method::POST,
            "/api/v1/export",
            Some(json!({ "title": "", "content": "Hello story", "format": "txt" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"autobiography.txt\"; filename*=UTF-8''autobiography.txt"
        );
        assert_eq!(body_text(response).await, "Hello story");
    }

    #[tokio::test]
    async fn test_styles_listing() {
        let app = app_with(Arc::new(StubGenerator::replying("x")));
        let json = body_json(send(&app, Method::GET, "/api/v1/styles", None).await).await;
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["style"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["emotional", "professional", "simple", "poetic"]);
    }
}
