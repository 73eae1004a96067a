use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::{BatchRunner, Matcher};
use crate::error::EngineError;
use crate::models::{
    AnalysisRequest, BatchScoreRequest, BatchScoreResponse, ErrorResponse, HealthResponse,
    ScoreRequest,
};

/// Application state shared across all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub batch: BatchRunner,
}

impl AppState {
    pub fn new(matcher: Matcher) -> Self {
        Self {
            batch: BatchRunner::from_matcher(matcher.clone()),
            matcher,
        }
    }
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/match/score", web::post().to(score))
        .route("/match/batch", web::post().to(score_batch))
        .route("/match/analysis", web::post().to(analysis));
}

/// Map an engine failure onto an HTTP error body
fn engine_error(err: &EngineError) -> HttpResponse {
    match err {
        EngineError::MissingProfile => HttpResponse::UnprocessableEntity().json(ErrorResponse {
            error: "missing_profile".to_string(),
            message: err.to_string(),
            status_code: 422,
        }),
        EngineError::MalformedCriteria(_) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "malformed_criteria".to_string(),
            message: err.to_string(),
            status_code: 400,
        }),
        EngineError::BatchInterrupted { .. } => HttpResponse::InternalServerError().json(ErrorResponse {
            error: "batch_interrupted".to_string(),
            message: err.to_string(),
            status_code: 500,
        }),
    }
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Score one scholarship
///
/// POST /api/v1/match/score
///
/// Request body:
/// ```json
/// {
///   "profile": { "gpa": 3.7, "intendedMajor": "Computer Science" },
///   "scholarship": { "id": "string", "awardAmount": 5000, "criteria": {} }
/// }
/// ```
async fn score(state: web::Data<AppState>, req: web::Json<ScoreRequest>) -> impl Responder {
    let req = req.into_inner();

    match state.matcher.compute_match_score(req.profile.as_ref(), &req.scholarship) {
        Ok(score) => HttpResponse::Ok().json(score),
        Err(e) => {
            tracing::info!("Scoring failed for {}: {}", req.scholarship.label(), e);
            engine_error(&e)
        }
    }
}

/// Score many scholarships for one student, in request order
///
/// POST /api/v1/match/batch
async fn score_batch(state: web::Data<AppState>, req: web::Json<BatchScoreRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for batch request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let req = req.into_inner();
    match state.batch.run(req.profile.as_ref(), req.scholarships).await {
        Ok(scores) => HttpResponse::Ok().json(BatchScoreResponse {
            total_results: scores.len(),
            scores,
        }),
        Err(e) => {
            tracing::info!("Batch scoring failed: {}", e);
            engine_error(&e)
        }
    }
}

/// Narrative eligibility breakdown for one scholarship
///
/// POST /api/v1/match/analysis
async fn analysis(state: web::Data<AppState>, req: web::Json<AnalysisRequest>) -> impl Responder {
    let req = req.into_inner();

    match state
        .matcher
        .compute_eligibility_analysis(req.profile.as_ref(), &req.scholarship)
    {
        Ok(analysis) => HttpResponse::Ok().json(analysis),
        Err(e) => {
            tracing::info!("Analysis failed for {}: {}", req.scholarship.label(), e);
            engine_error(&e)
        }
    }
}
