use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;

pub struct TestConfig {
    pub jwt_secret: String,
    pub postgrest_url: String,
    pub postgrest_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            postgrest_url: "http://localhost:54321".to_string(),
            postgrest_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_postgrest_url(url: &str) -> Self {
        Self {
            postgrest_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            postgrest_url: self.postgrest_url.clone(),
            postgrest_anon_key: self.postgrest_anon_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            redis_url: None,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "customer".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn with_id(id: Uuid, email: &str, role: &str) -> Self {
        Self {
            id: id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn staff(email: &str) -> Self {
        Self::new(email, "staff")
    }

    pub fn customer(email: &str) -> Self {
        Self::new(email, "customer")
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "admin")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }
}

pub struct MockPostgrestResponses;

impl MockPostgrestResponses {
    /// A `staff` row as returned by the availability/provider lookups.
    pub fn staff_row(user_id: &str) -> serde_json::Value {
        json!({
            "user_id": user_id,
            "sun_start": null, "sun_end": null,
            "mon_start": "09:00:00", "mon_end": "17:00:00",
            "tue_start": "09:00:00", "tue_end": "17:00:00",
            "wed_start": "09:00:00", "wed_end": "12:00:00",
            "thu_start": null, "thu_end": null,
            "fri_start": "10:00:00", "fri_end": "16:00:00",
            "sat_start": null, "sat_end": null
        })
    }

    pub fn appointment_row(
        appointment_id: &str,
        customer_id: &str,
        provider_id: &str,
        starts_at: &str,
        ends_at: &str,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "id": appointment_id,
            "customer_id": customer_id,
            "provider_id": provider_id,
            "starts_at": starts_at,
            "ends_at": ends_at,
            "status": status,
            "created_at": Utc::now().to_rfc3339()
        })
    }

    /// The PostgREST body produced when the overlap exclusion constraint
    /// rejects an insert.
    pub fn exclusion_violation_body() -> serde_json::Value {
        json!({
            "code": "23P01",
            "details": "Key (provider_id, tsrange(starts_at, ends_at)) conflicts with existing key",
            "hint": null,
            "message": "conflicting key value violates exclusion constraint \"no_overlapping_provider_appointments\""
        })
    }
}
