use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use crate::models::{CandidateProfile, InteractionEvent, MatchFilters};
use crate::services::normalize::{candidate_from_raw, RawProfileRecord};

/// Errors that can occur when talking to the Supabase REST interface.
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid service key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Supabase REST client.
///
/// All reads go through the PostgREST query interface; the survey rows are
/// embedded into profile rows with a `select=*,<survey_table>(*)` query so
/// a candidate arrives in one round trip. Rows are normalized into the
/// closed enum model immediately after parsing.
pub struct SupabaseClient {
    base_url: String,
    service_key: String,
    client: Client,
    tables: SupabaseTables,
}

/// Table names in the Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseTables {
    pub profiles: String,
    pub surveys: String,
    pub interactions: String,
}

/// PostgREST filters live in the URL; past this many exclusions the query
/// string risks exceeding proxy URL limits, so the rest is left to the
/// in-process filter.
const MAX_SERVER_SIDE_EXCLUSIONS: usize = 200;

impl SupabaseClient {
    /// Create a new Supabase client
    pub fn new(base_url: String, service_key: String, tables: SupabaseTables) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            service_key,
            client,
            tables,
        }
    }

    fn rest_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            table
        )
    }

    fn embedded_select(&self) -> String {
        format!("*,{}(*)", self.tables.surveys)
    }

    /// Fetch a single profile with its embedded survey answers.
    pub async fn get_candidate(&self, user_id: &str) -> Result<CandidateProfile, SupabaseError> {
        let url = format!(
            "{}?select={}&user_id=eq.{}&limit=1",
            self.rest_url(&self.tables.profiles),
            urlencoding::encode(&self.embedded_select()),
            urlencoding::encode(user_id)
        );

        tracing::debug!("Fetching candidate from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SupabaseError::Unauthorized);
        }
        if !status.is_success() {
            return Err(SupabaseError::ApiError(format!(
                "Failed to fetch candidate: {}",
                status
            )));
        }

        let rows: Vec<RawProfileRecord> = response
            .json()
            .await
            .map_err(|e| SupabaseError::InvalidResponse(format!("Failed to parse profile: {}", e)))?;

        let raw = rows
            .into_iter()
            .next()
            .ok_or_else(|| SupabaseError::NotFound(format!("Profile not found for user {}", user_id)))?;

        Ok(candidate_from_raw(raw))
    }

    /// Query candidate profiles for a seeker.
    ///
    /// Only cheap row filters run server-side (active flag, self-exclusion,
    /// seen-candidate exclusion); gender and city are free-form text in the
    /// backend and are enforced by the normalized in-process filter instead.
    pub async fn list_candidates(
        &self,
        seeker_id: &str,
        filters: &MatchFilters,
        limit: usize,
    ) -> Result<Vec<CandidateProfile>, SupabaseError> {
        let mut params = vec![
            format!("select={}", urlencoding::encode(&self.embedded_select())),
            "is_active=eq.true".to_string(),
            format!("user_id=neq.{}", urlencoding::encode(seeker_id)),
            format!("limit={}", limit),
        ];

        if !filters.exclude_user_ids.is_empty()
            && filters.exclude_user_ids.len() <= MAX_SERVER_SIDE_EXCLUSIONS
        {
            let quoted = filters
                .exclude_user_ids
                .iter()
                .map(|id| format!("\"{}\"", id))
                .collect::<Vec<_>>()
                .join(",");
            params.push(format!(
                "user_id=not.in.({})",
                urlencoding::encode(&quoted)
            ));
        }

        let url = format!("{}?{}", self.rest_url(&self.tables.profiles), params.join("&"));

        tracing::debug!("Querying candidates from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SupabaseError::Unauthorized);
        }
        if !status.is_success() {
            return Err(SupabaseError::ApiError(format!(
                "Failed to query candidates: {}",
                status
            )));
        }

        let rows: Vec<RawProfileRecord> = response.json().await.map_err(|e| {
            SupabaseError::InvalidResponse(format!("Failed to parse candidates: {}", e))
        })?;

        let candidates: Vec<CandidateProfile> = rows
            .into_iter()
            .map(candidate_from_raw)
            .filter(|p| p.user_id != seeker_id)
            .filter(|p| !filters.exclude_user_ids.contains(&p.user_id))
            .collect();

        tracing::debug!("Queried {} candidates for {}", candidates.len(), seeker_id);

        Ok(candidates)
    }

    /// Record an interaction event (best-effort analytics mirror; Postgres
    /// is the primary store).
    pub async fn record_event(&self, event: InteractionEvent) -> Result<(), SupabaseError> {
        let url = self.rest_url(&self.tables.interactions);

        // Column names are snake_case in the backend schema.
        let payload = serde_json::json!({
            "id": uuid::Uuid::new_v4().to_string(),
            "user_id": event.user_id,
            "target_user_id": event.target_user_id,
            "event_type": event.event_type,
            "created_at": event.created_at,
        });

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("Prefer", "return=minimal")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SupabaseError::ApiError(format!(
                "Failed to record event: {}",
                response.status()
            )));
        }

        tracing::debug!(
            "Recorded event: {} -> {} ({:?})",
            event.user_id,
            event.target_user_id,
            event.event_type
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supabase_client_creation() {
        let tables = SupabaseTables {
            profiles: "profiles".to_string(),
            surveys: "survey_answers".to_string(),
            interactions: "interactions".to_string(),
        };

        let client = SupabaseClient::new(
            "https://project.supabase.co/".to_string(),
            "service_key".to_string(),
            tables,
        );

        assert_eq!(client.base_url, "https://project.supabase.co/");
        assert_eq!(client.rest_url("profiles"), "https://project.supabase.co/rest/v1/profiles");
        assert_eq!(client.embedded_select(), "*,survey_answers(*)");
    }
}
