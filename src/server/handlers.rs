use super::{
    error::ApiError,
    state::AppState,
    types::{AskRequest, AskResponse, HealthResponse, UploadResponse},
};
use crate::document::{self, Upload};
use crate::qa::{AskOutcome, extract_qa};
use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::MultipartRejection,
        rejection::JsonRejection,
    },
};

/// Name of the multipart field that carries the document.
pub const UPLOAD_FIELD: &str = "file";

pub async fn home_handler(State(state): State<AppState>) -> String {
    state.config().messages.welcome.clone()
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        qa_count: state.qa_service.qa_count().await,
    })
}

/// Extracts Q&A pairs from the uploaded document and replaces the store with them.
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let missing_file = || ApiError::MissingFile(state.config().messages.missing_file.clone());

    let mut multipart = multipart.map_err(|e| {
        log::debug!("Upload without a multipart body: {}", e);
        missing_file()
    })?;

    let upload = read_upload_field(&mut multipart)
        .await?
        .ok_or_else(missing_file)?;

    log::info!(
        "Received upload '{}' ({} bytes)",
        upload.file_name.as_deref().unwrap_or("<unnamed>"),
        upload.bytes.len()
    );

    let text = document::extract_text_blocking(upload).await?;
    let store = extract_qa(&text);
    let qa_count = state.qa_service.replace_store(store).await;

    Ok(Json(UploadResponse {
        message: state.config().messages.upload_success.clone(),
        qa_count,
    }))
}

async fn read_upload_field(multipart: &mut Multipart) -> Result<Option<Upload>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidUpload(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidUpload(e.body_text()))?;
        return Ok(Some(Upload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

/// Answers a question against the current store.
pub async fn ask_handler(
    State(state): State<AppState>,
    request: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(request) = request.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    log::info!("User question: {}", request.question);

    let outcome = state.qa_service.ask(&request.question).await?;
    let messages = &state.config().messages;

    let response = match outcome {
        AskOutcome::NoData => AskResponse::answer(&messages.no_data),
        AskOutcome::Greeting => AskResponse::answer(&messages.greeting),
        AskOutcome::Irrelevant => AskResponse::answer(&messages.irrelevant),
        AskOutcome::Matched { answer, .. } => AskResponse::answer(answer),
        AskOutcome::NoMatch { suggestions: None } => AskResponse::answer(&messages.irrelevant),
        AskOutcome::NoMatch {
            suggestions: Some(suggestions),
        } => AskResponse {
            answer: messages.no_match.clone(),
            suggested_questions: Some(suggestions),
        },
    };

    Ok(Json(response))
}
