use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::{compatibility_breakdown, Matcher};
use crate::models::{
    CandidateProfile, ErrorResponse, FindMatchesRequest, FindMatchesResponse, HealthResponse,
    InteractionEvent, InteractionKind, MatchFilters, RecordEventRequest, RecordEventResponse,
    ScorePairRequest, ScorePairResponse,
};
use crate::services::{
    CacheKey, CacheManager, EventType, InteractionStore, SupabaseClient, SupabaseError,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub supabase: Arc<SupabaseClient>,
    pub cache: Arc<CacheManager>,
    pub interactions: Arc<InteractionStore>,
    pub matcher: Matcher,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/matches/score", web::post().to(score_pair))
        .route("/matches/event", web::post().to(record_event))
        .route("/matches/seen", web::get().to(get_seen_candidates))
        .route("/debug/echo", web::post().to(debug_echo));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.interactions.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Debug endpoint to echo raw JSON for debugging
async fn debug_echo(body: web::Bytes, req: actix_web::HttpRequest) -> impl Responder {
    let body_str = String::from_utf8_lossy(&body);
    tracing::info!(
        "DEBUG echo - path: {}, method: {}, body: {}",
        req.path(),
        req.method(),
        body_str
    );
    HttpResponse::Ok().json(serde_json::json!({
        "path": req.path(),
        "method": req.method().to_string(),
        "body": body_str,
    }))
}

/// Fetch a candidate through the short-lived profile cache.
async fn load_candidate(
    state: &AppState,
    user_id: &str,
) -> Result<CandidateProfile, SupabaseError> {
    let key = CacheKey::candidate(user_id);

    if let Ok(profile) = state.cache.get::<CandidateProfile>(&key).await {
        return Ok(profile);
    }

    let profile = state.supabase.get_candidate(user_id).await?;

    if let Err(e) = state.cache.set(&key, &profile).await {
        tracing::warn!("Failed to cache candidate {}: {}", user_id, e);
    }

    Ok(profile)
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "limit": 20,
///   "excludeUserIds": ["string"]
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let user_id = &req.user_id;
    // Cap limit at 100 to prevent excessive queries
    let limit = req.limit.min(100) as usize;

    tracing::info!("Finding matches for user: {}, limit: {}", user_id, limit);

    // Already-seen candidates are excluded so the same profiles are not
    // surfaced twice
    let mut exclude_ids = match state.interactions.get_seen_candidates(user_id).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(
                "Failed to fetch seen candidates for {}, proceeding without filtering: {}",
                user_id,
                e
            );
            vec![]
        }
    };

    exclude_ids.extend(req.exclude_user_ids.clone());

    tracing::debug!("Excluding {} candidates for user {}", exclude_ids.len(), user_id);

    let seeker = match load_candidate(&state, user_id).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch user profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let filters = MatchFilters {
        genders: seeker.preferred_genders.clone(),
        city: seeker.city.clone(),
        exclude_user_ids: exclude_ids,
    };

    // Overfetch: the in-process filters and the score floor thin the pool
    let candidates = match state
        .supabase
        .list_candidates(user_id, &filters, limit * 5)
        .await
    {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to query candidates for {}: {}", user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to query candidates".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    tracing::debug!("Found {} candidates for {}", candidates.len(), user_id);

    let result = state.matcher.find_matches(&seeker, &filters, candidates, limit);

    let response = FindMatchesResponse {
        matches: result.matches,
        next_cursor: None, // TODO: implement cursor-based pagination
        total_results: result.total_candidates,
    };

    tracing::info!(
        "Returning {} matches for user {} (from {} candidates)",
        response.matches.len(),
        user_id,
        result.total_candidates
    );

    HttpResponse::Ok().json(response)
}

/// Score a single pair endpoint
///
/// POST /api/v1/matches/score
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "targetUserId": "string"
/// }
/// ```
///
/// Returns the compatibility percentage with its per-criterion breakdown.
/// Results are memoized per (user, target, survey versions).
async fn score_pair(
    state: web::Data<AppState>,
    req: web::Json<ScorePairRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let seeker = match load_candidate(&state, &req.user_id).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", req.user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch user profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let target = match load_candidate(&state, &req.target_user_id).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", req.target_user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch target profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let cache_key = CacheKey::pair_score(
        &seeker.user_id,
        &target.user_id,
        seeker.survey_version,
        target.survey_version,
    );

    if let Ok(cached) = state.cache.get::<ScorePairResponse>(&cache_key).await {
        tracing::debug!("Serving cached score for {}", cache_key);
        return HttpResponse::Ok().json(cached);
    }

    let breakdown =
        compatibility_breakdown(&seeker.answers, &target.answers, state.matcher.weights());

    let response = ScorePairResponse {
        user_id: seeker.user_id,
        target_user_id: target.user_id,
        compatibility: breakdown.total,
        criteria: breakdown.criteria,
    };

    if let Err(e) = state.cache.set(&cache_key, &response).await {
        tracing::warn!("Failed to cache score {}: {}", cache_key, e);
    }

    HttpResponse::Ok().json(response)
}

/// Record interaction event endpoint
///
/// POST /api/v1/matches/event
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "targetUserId": "string",
///   "eventType": "viewed|liked|skipped|contacted"
/// }
/// ```
async fn record_event(
    state: web::Data<AppState>,
    req: web::Json<RecordEventRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let kind = match req.event_type.to_lowercase().as_str() {
        "viewed" => InteractionKind::Viewed,
        "liked" => InteractionKind::Liked,
        "skipped" => InteractionKind::Skipped,
        "contacted" => InteractionKind::Contacted,
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid event type".to_string(),
                message: "Event type must be one of: viewed, liked, skipped, contacted"
                    .to_string(),
                status_code: 400,
            });
        }
    };

    let event = InteractionEvent {
        user_id: req.user_id.clone(),
        target_user_id: req.target_user_id.clone(),
        event_type: kind,
        created_at: chrono::Utc::now(),
    };

    // Postgres is the primary store for seen-candidate tracking
    let pg_result = state
        .interactions
        .record_seen(&req.user_id, &req.target_user_id, EventType::from(kind))
        .await;

    // Mirror to Supabase for analytics (best-effort)
    let backend_result = state.supabase.record_event(event).await;

    match pg_result {
        Ok(_) => {
            if let Err(e) = &backend_result {
                tracing::warn!("Event recorded in Postgres but Supabase mirror failed: {}", e);
            } else {
                tracing::debug!(
                    "Recorded event: {} -> {:?} (both Postgres and Supabase)",
                    req.user_id,
                    req.event_type
                );
            }

            // Drop the ranked list and memoized scores for this user
            if let Err(e) = state.cache.delete(&CacheKey::matches(&req.user_id)).await {
                tracing::warn!("Failed to invalidate match cache: {}", e);
            }
            if let Err(e) = state
                .cache
                .invalidate_pattern(&CacheKey::pair_score_pattern(&req.user_id))
                .await
            {
                tracing::warn!("Failed to invalidate score cache: {}", e);
            }

            HttpResponse::Ok().json(RecordEventResponse {
                success: true,
                event_id: uuid::Uuid::new_v4().to_string(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to record event in Postgres: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to record event".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Get seen candidates for a user
///
/// GET /api/v1/matches/seen?userId={userId}
///
/// Returns the candidate ids the user has already interacted with, for
/// client-side synchronization and debugging purposes.
async fn get_seen_candidates(
    state: web::Data<AppState>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let user_id = match query.get("userId") {
        Some(id) => id,
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Missing userId parameter".to_string(),
                message: "userId query parameter is required".to_string(),
                status_code: 400,
            });
        }
    };

    match state.interactions.get_seen_candidates(user_id).await {
        Ok(seen_ids) => HttpResponse::Ok().json(serde_json::json!({
            "userId": user_id,
            "seenCandidates": seen_ids,
            "count": seen_ids.len(),
        })),
        Err(e) => {
            tracing::error!("Failed to fetch seen candidates for {}: {}", user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch seen candidates".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
