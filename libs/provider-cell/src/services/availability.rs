use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::PostgrestClient;

use crate::models::{
    ProviderError, SetAvailabilityRequest, StaffAvailabilityRow, Weekday, WeeklySchedule,
};

const STAFF_COLUMNS: &str = "user_id,sun_start,sun_end,mon_start,mon_end,tue_start,tue_end,\
wed_start,wed_end,thu_start,thu_end,fri_start,fri_end,sat_start,sat_end";

/// Reads and mutates the per-provider weekly availability record.
///
/// One row per provider in the `staff` table; the row doubles as the
/// provider-capability marker: a user without a staff row is not bookable.
pub struct AvailabilityService {
    postgrest: PostgrestClient,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            postgrest: PostgrestClient::new(config),
        }
    }

    pub async fn get_schedule(
        &self,
        provider_id: Uuid,
        auth_token: &str,
    ) -> Result<WeeklySchedule, ProviderError> {
        debug!("Fetching availability for provider {}", provider_id);

        let row = self.fetch_row(provider_id, auth_token).await?;
        Ok(row.into_schedule())
    }

    /// Whether the identity holds the provider capability (has a staff row).
    pub async fn provider_exists(
        &self,
        provider_id: Uuid,
        auth_token: &str,
    ) -> Result<bool, ProviderError> {
        let path = format!("/rest/v1/staff?user_id=eq.{}&select=user_id", provider_id);
        let result: Vec<Value> = self
            .postgrest
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        Ok(!result.is_empty())
    }

    /// Set one weekday's open/close pair. Rejects start >= end before any
    /// write happens.
    pub async fn set_window(
        &self,
        provider_id: Uuid,
        request: SetAvailabilityRequest,
        auth_token: &str,
    ) -> Result<(), ProviderError> {
        if request.start >= request.end {
            return Err(ProviderError::InvalidWindow(
                "start must be before end".to_string(),
            ));
        }

        debug!(
            "Setting {} availability for provider {}: {} - {}",
            request.day, provider_id, request.start, request.end
        );

        let update = json!({
            request.day.start_column(): request.start.format("%H:%M:%S").to_string(),
            request.day.end_column(): request.end.format("%H:%M:%S").to_string(),
        });

        self.patch_row(provider_id, update, auth_token).await
    }

    /// Null out one weekday's pair. Rows are never deleted, only nulled per
    /// day.
    pub async fn clear_window(
        &self,
        provider_id: Uuid,
        day: Weekday,
        auth_token: &str,
    ) -> Result<(), ProviderError> {
        debug!("Clearing {} availability for provider {}", day, provider_id);

        let update = json!({
            day.start_column(): null,
            day.end_column(): null,
        });

        self.patch_row(provider_id, update, auth_token).await
    }

    async fn fetch_row(
        &self,
        provider_id: Uuid,
        auth_token: &str,
    ) -> Result<StaffAvailabilityRow, ProviderError> {
        let path = format!(
            "/rest/v1/staff?user_id=eq.{}&select={}",
            provider_id, STAFF_COLUMNS
        );
        let result: Vec<StaffAvailabilityRow> = self
            .postgrest
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        result.into_iter().next().ok_or(ProviderError::NotFound)
    }

    async fn patch_row(
        &self,
        provider_id: Uuid,
        update: Value,
        auth_token: &str,
    ) -> Result<(), ProviderError> {
        let path = format!("/rest/v1/staff?user_id=eq.{}", provider_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .postgrest
            .request_with_headers(Method::PATCH, &path, Some(auth_token), Some(update), Some(headers))
            .await?;

        // PostgREST returns an empty representation when the filter matched
        // no rows, which here means the provider does not exist.
        if result.is_empty() {
            return Err(ProviderError::NotFound);
        }

        Ok(())
    }
}
