//! Resume endpoints: multipart upload through the verification pipeline,
//! record retrieval, search/filter listing, and JSON report export.

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::{ResumeRecord, ResumeStatus};
use crate::pipeline::claims::ClaimSet;
use crate::pipeline::document::ExtractError;
use crate::pipeline::verification::{Flag, VerificationOutcome, VerificationResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub resume_id: String,
    pub filename: String,
    pub parsed: ClaimSet,
    pub verification: VerificationResult,
    pub flags: Vec<Flag>,
    pub trust_score: f64,
}

/// POST /api/v1/resumes
///
/// Accepts a multipart form with a `resume` file (PDF or DOCX), persists the
/// file, and runs extract → claims → verify, transitioning the record
/// pending → processing → (completed | error). Extraction failures are
/// terminal for the upload: the record is marked `error` and no partial
/// claim set is stored.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() == Some("resume") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            upload = Some((filename, bytes.to_vec()));
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| AppError::Validation("Resume file is required".to_string()))?;
    if filename.is_empty() {
        return Err(AppError::Validation("No file selected".to_string()));
    }
    if !allowed_extension(&filename) {
        return Err(AppError::Validation(
            "Unsupported file type. Please upload PDF or DOCX files.".to_string(),
        ));
    }

    let filename = sanitize_filename(&filename);
    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    let file_path = state.config.upload_dir.join(&filename);
    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let record = ResumeRecord::new(filename.clone(), file_path.display().to_string());
    let id = state.store.insert(record).await?;
    state
        .store
        .update(&id, |r| r.status = ResumeStatus::Processing)
        .await?;

    // The pipeline is synchronous and CPU/file-bound; keep it off the runtime.
    let extractor = state.extractor.clone();
    let engine = state.engine.clone();
    let pipeline_path = file_path.clone();
    let pipeline: Result<(ClaimSet, VerificationOutcome), ExtractError> =
        tokio::task::spawn_blocking(move || {
            let text = crate::pipeline::document::extract_text(&pipeline_path)?;
            let claims = extractor.extract(&text);
            let outcome = engine.verify(&claims);
            Ok((claims, outcome))
        })
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let (claims, outcome) = match pipeline {
        Ok(parsed) => parsed,
        Err(e) => {
            state
                .store
                .update(&id, |r| r.status = ResumeStatus::Error)
                .await?;
            return Err(e.into());
        }
    };

    state
        .store
        .update(&id, |r| {
            r.claims = Some(claims.clone());
            r.verification = Some(outcome.result.clone());
            r.trust_score = outcome.trust_score;
            r.flags = outcome.flags.clone();
            r.status = ResumeStatus::Completed;
        })
        .await?;

    info!(
        resume_id = %id,
        trust_score = outcome.trust_score,
        flags = outcome.flags.len(),
        "Resume processed"
    );

    Ok(Json(UploadResponse {
        message: "Resume processed successfully!".to_string(),
        resume_id: id,
        filename,
        parsed: claims,
        verification: outcome.result,
        flags: outcome.flags,
        trust_score: outcome.trust_score,
    }))
}

#[derive(Debug, Serialize)]
pub struct ResumeDetailResponse {
    #[serde(flatten)]
    pub record: ResumeRecord,
    pub verified_count: usize,
    pub review_count: usize,
}

/// GET /api/v1/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResumeDetailResponse>, AppError> {
    let record = state
        .store
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    let (verified_count, review_count) = match &record.verification {
        Some(result) => (result.verified_count(), result.review_count()),
        None => (0, 0),
    };

    Ok(Json(ResumeDetailResponse {
        record,
        verified_count,
        review_count,
    }))
}

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    20
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub search: String,
    /// One of: all, high (≥90), medium (70–89), low (50–69), very-low (<50).
    #[serde(default)]
    pub trust_score: Option<String>,
    /// One of: all, verified, review, flagged (derived from the trust score).
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

#[derive(Debug, Serialize)]
pub struct ResumeSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub filename: String,
    pub upload_date: String,
    pub trust_score: f64,
    pub status: String,
    pub flags_count: usize,
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub resumes: Vec<ResumeSummary>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

/// GET /api/v1/resumes
///
/// Search, filter, and paginate records, newest upload first.
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let search = params.search.to_lowercase();
    let trust_filter = params.trust_score.as_deref().unwrap_or("all");
    let status_filter = params.status.as_deref().unwrap_or("all");

    let filtered: Vec<ResumeRecord> = state
        .store
        .all()
        .await
        .into_iter()
        .filter(|record| {
            (search.is_empty() || searchable_text(record).contains(&search))
                && trust_score_matches(trust_filter, record.trust_score)
                && (status_filter == "all" || derived_status(record.trust_score) == status_filter)
        })
        .collect();

    let total = filtered.len();
    let page = params.page.max(1);
    let per_page = params.per_page.max(1);
    let total_pages = total.div_ceil(per_page);
    let start = (page - 1) * per_page;

    let resumes = filtered
        .into_iter()
        .skip(start)
        .take(per_page)
        .map(summarize)
        .collect();

    Ok(Json(SearchResponse {
        resumes,
        total,
        page,
        per_page,
        total_pages,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ReportParams {
    #[serde(default)]
    pub format: Option<String>,
}

/// GET /api/v1/resumes/:id/report
///
/// Exports the full record as one JSON document. Other formats (the original
/// system rendered PDF) are out of scope here.
pub async fn handle_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ReportParams>,
) -> Result<Json<ResumeRecord>, AppError> {
    let format = params.format.as_deref().unwrap_or("json");
    if format != "json" {
        return Err(AppError::Validation(format!(
            "Report format '{format}' is not supported; use format=json"
        )));
    }

    let record = state
        .store
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(record))
}

/// Keeps alphanumerics plus `.`, `-`, `_`; everything else becomes `_`.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn allowed_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| matches!(ext.to_lowercase().as_str(), "pdf" | "docx"))
        .unwrap_or(false)
}

fn searchable_text(record: &ResumeRecord) -> String {
    let Some(claims) = &record.claims else {
        return String::new();
    };
    let companies: Vec<&str> = claims
        .experience
        .iter()
        .map(|e| e.company.as_str())
        .collect();
    format!(
        "{} {} {} {}",
        claims.name,
        claims.email.as_deref().unwrap_or_default(),
        claims.skills.join(" "),
        companies.join(" ")
    )
    .to_lowercase()
}

fn trust_score_matches(filter: &str, score: f64) -> bool {
    match filter {
        "high" => score >= 90.0,
        "medium" => (70.0..90.0).contains(&score),
        "low" => (50.0..70.0).contains(&score),
        "very-low" => score < 50.0,
        _ => true,
    }
}

fn derived_status(score: f64) -> &'static str {
    if score >= 80.0 {
        "verified"
    } else if score >= 60.0 {
        "review"
    } else {
        "flagged"
    }
}

fn summarize(record: ResumeRecord) -> ResumeSummary {
    let status = derived_status(record.trust_score).to_string();
    let (name, email, skills) = match &record.claims {
        Some(claims) => (
            claims.name.clone(),
            claims
                .email
                .clone()
                .unwrap_or_else(|| "No email".to_string()),
            claims.skills.clone(),
        ),
        None => ("Unknown".to_string(), "No email".to_string(), Vec::new()),
    };

    ResumeSummary {
        id: record.id,
        name,
        email,
        filename: record.filename,
        upload_date: record.uploaded_at.format("%Y-%m-%d %H:%M").to_string(),
        trust_score: record.trust_score,
        status,
        flags_count: record.flags.len(),
        skills,
    }
}
