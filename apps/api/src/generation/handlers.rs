//! POST /api/generate-product — the generate → store → render pipeline.
//!
//! The steps are strictly ordered and each failure short-circuits the rest:
//! request validation (400), duplicate-title check (409), generation call
//! and record extraction (502), store append (500), and finally the render,
//! which is only *initiated* before the response goes out. A render failure
//! is logged and recorded in the tracker, never surfaced on this request.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::prompts::{build_mix_prompt, build_single_prompt, GENERATION_SYSTEM};
use crate::llm_client::extract::parse_record;
use crate::render::spawn_render;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Single,
    Mix,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateProductRequest {
    pub title: String,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub mix_components: Option<Vec<String>>,
    pub product_type: ProductType,
    #[serde(default)]
    pub api_key: Option<String>,
}

pub async fn handle_generate_product(
    State(state): State<AppState>,
    Json(req): Json<GenerateProductRequest>,
) -> Result<Json<Value>, AppError> {
    let title = req.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }

    let prompt = match req.product_type {
        ProductType::Single => {
            let scientific_name = req
                .scientific_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    AppError::Validation(
                        "scientificName is required for single-species products".to_string(),
                    )
                })?;
            build_single_prompt(&title, scientific_name)
        }
        ProductType::Mix => {
            let components: Vec<String> = req
                .mix_components
                .unwrap_or_default()
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            if components.is_empty() {
                return Err(AppError::Validation(
                    "mixComponents must be a non-empty list for mix products".to_string(),
                ));
            }
            build_mix_prompt(&title, &components)
        }
    };

    let api_key = req
        .api_key
        .filter(|k| !k.trim().is_empty())
        .or_else(|| state.config.openai_api_key.clone())
        .ok_or_else(|| AppError::Validation("apiKey is required".to_string()))?;

    // Caller-side duplicate check; the store itself stays permissive.
    if state.store.find_by_title(&title)?.is_some() {
        return Err(AppError::Conflict(format!(
            "product '{title}' already exists"
        )));
    }

    info!("generating product information for '{title}'");
    let raw = state.llm.complete(GENERATION_SYSTEM, &prompt, &api_key).await?;
    let record = parse_record(&raw)?;

    // The prompt directs mix percentages to total 100; the model does not
    // always comply. Off-by-more-than-one is logged, not rejected.
    if req.product_type == ProductType::Mix {
        match record.mix_breakdown() {
            Some(components) => {
                let total: f64 = components.iter().map(|c| c.percent).sum();
                if (total - 100.0).abs() > 1.0 {
                    warn!("mix percentages for '{title}' sum to {total}, not 100");
                }
            }
            None => warn!("mix product '{title}' came back without a parseable mix breakdown"),
        }
    }

    state.store.append(record.clone())?;

    // Detached: the response reports success once the record is stored and
    // the render has been initiated, not completed.
    spawn_render(
        record.clone(),
        state.config.documents_dir.clone(),
        state.render_tracker.clone(),
    );

    Ok(Json(json!({ "success": true, "data": record })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::documents::handlers::{
        handle_delete_document, handle_list_documents, DeleteDocumentRequest,
    };
    use crate::llm_client::{GenerationError, GenerationService};
    use crate::models::product::fixtures::sample_record_json;
    use crate::render::{RenderStatus, RenderTracker};
    use crate::store::ProductStore;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Stub backend returning a fixed reply, or an auth failure for key "bad".
    struct StubGeneration {
        reply: String,
    }

    #[async_trait]
    impl GenerationService for StubGeneration {
        async fn complete(
            &self,
            _system: &str,
            _prompt: &str,
            api_key: &str,
        ) -> Result<String, GenerationError> {
            if api_key == "bad" {
                return Err(GenerationError::CredentialRejected);
            }
            Ok(self.reply.clone())
        }
    }

    fn test_state(dir: &TempDir, reply: String) -> AppState {
        AppState {
            config: Config {
                products_file: dir.path().join("products_data.json"),
                documents_dir: dir.path().join("Product_Documents"),
                openai_api_key: None,
                port: 0,
                rust_log: "info".to_string(),
            },
            store: ProductStore::new(dir.path().join("products_data.json")),
            llm: Arc::new(StubGeneration { reply }),
            render_tracker: RenderTracker::default(),
        }
    }

    fn poppy_request(api_key: &str) -> GenerateProductRequest {
        GenerateProductRequest {
            title: "California Poppy".to_string(),
            scientific_name: Some("Eschscholzia californica".to_string()),
            mix_components: None,
            product_type: ProductType::Single,
            api_key: Some(api_key.to_string()),
        }
    }

    async fn wait_for_render(state: &AppState, filename: &str) {
        for _ in 0..100 {
            if state.render_tracker.get(filename) == Some(RenderStatus::Completed) {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        panic!("render of {filename} did not complete");
    }

    #[tokio::test]
    async fn test_generate_stores_record_and_renders_document() {
        let dir = TempDir::new().unwrap();
        let reply = format!(
            "```json\n{}\n```",
            sample_record_json("California Poppy", "Eschscholzia californica")
        );
        let state = test_state(&dir, reply);

        let response = handle_generate_product(State(state.clone()), Json(poppy_request("k")))
            .await
            .unwrap();
        assert_eq!(response.0["success"], true);
        assert_eq!(response.0["data"]["Title"], "California Poppy");
        assert_eq!(
            response.0["data"]["Scientific Name / mix %"],
            "Eschscholzia californica"
        );

        let stored = state.store.list_all().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "California Poppy");

        wait_for_render(&state, "California_Poppy.docx").await;
        let index = handle_list_documents(State(state.clone())).await.unwrap();
        assert_eq!(index.0.len(), 1);
        assert_eq!(index.0[0].filename, "California_Poppy.docx");
    }

    #[tokio::test]
    async fn test_generate_mix_stores_record_with_valid_breakdown() {
        let dir = TempDir::new().unwrap();
        let reply = format!(
            "```json\n{}\n```",
            sample_record_json("Meadow Mix", "Yarrow 40%; California poppy 60%")
        );
        let state = test_state(&dir, reply);
        let req = GenerateProductRequest {
            title: "Meadow Mix".to_string(),
            scientific_name: None,
            mix_components: Some(vec!["Yarrow".to_string(), "California Poppy".to_string()]),
            product_type: ProductType::Mix,
            api_key: Some("k".to_string()),
        };

        let response = handle_generate_product(State(state.clone()), Json(req))
            .await
            .unwrap();
        assert_eq!(response.0["success"], true);
        assert_eq!(
            response.0["data"]["Scientific Name / mix %"],
            "Yarrow 40%; California poppy 60%"
        );

        let stored = state.store.list_all().unwrap();
        assert_eq!(stored.len(), 1);
        let breakdown = stored[0].mix_breakdown().unwrap();
        let total: f64 = breakdown.iter().map(|c| c.percent).sum();
        assert!((total - 100.0).abs() <= 1.0);

        wait_for_render(&state, "Meadow_Mix.docx").await;
        let index = handle_list_documents(State(state)).await.unwrap();
        assert_eq!(index.0[0].filename, "Meadow_Mix.docx");
    }

    #[tokio::test]
    async fn test_delete_removes_file_and_record() {
        let dir = TempDir::new().unwrap();
        let reply = sample_record_json("California Poppy", "Eschscholzia californica").to_string();
        let state = test_state(&dir, reply);

        handle_generate_product(State(state.clone()), Json(poppy_request("k")))
            .await
            .unwrap();
        wait_for_render(&state, "California_Poppy.docx").await;

        let response = handle_delete_document(
            State(state.clone()),
            Json(DeleteDocumentRequest {
                filename: "California_Poppy.docx".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.0["fileRemoved"], true);
        assert_eq!(response.0["recordRemoved"], true);

        assert!(!state
            .config
            .documents_dir
            .join("California_Poppy.docx")
            .exists());
        assert!(state.store.list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_scientific_name_is_rejected_before_generation() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, "unused".to_string());
        let mut req = poppy_request("k");
        req.scientific_name = None;

        let err = handle_generate_product(State(state.clone()), Json(req))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(state.store.list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mix_requires_components() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, "unused".to_string());
        let req = GenerateProductRequest {
            title: "Pollinator Mix".to_string(),
            scientific_name: None,
            mix_components: Some(vec!["  ".to_string()]),
            product_type: ProductType::Mix,
            api_key: Some("k".to_string()),
        };

        let err = handle_generate_product(State(state), Json(req))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_rejected_credential_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, "unused".to_string());

        let err = handle_generate_product(State(state.clone()), Json(poppy_request("bad")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CredentialRejected));
        assert!(state.store.list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_reply_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, "I'm sorry, I can't help with that.".to_string());

        let err = handle_generate_product(State(state.clone()), Json(poppy_request("k")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::GenerationParse(_)));
        assert!(state.store.list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_title_is_a_conflict() {
        let dir = TempDir::new().unwrap();
        let reply = sample_record_json("California Poppy", "Eschscholzia californica").to_string();
        let state = test_state(&dir, reply);

        handle_generate_product(State(state.clone()), Json(poppy_request("k")))
            .await
            .unwrap();
        let err = handle_generate_product(State(state.clone()), Json(poppy_request("k")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(state.store.list_all().unwrap().len(), 1);
    }
}
