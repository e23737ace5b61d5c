use std::collections::HashMap;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Generic JWT claims structure.
///
/// Supports the registered claims this workspace issues plus custom fields via
/// the `extra` map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Claims {
    /// Subject (user/entity identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims for a subject valid for `ttl` from `issued_at`.
    ///
    /// # Arguments
    /// * `subject` - Identifier the token is bound to
    /// * `issued_at` - Issuance instant
    /// * `ttl` - Time until the token expires
    ///
    /// # Returns
    /// Claims with sub, iat and exp set, or `None` if `issued_at + ttl` overflows
    pub fn for_subject(
        subject: impl ToString,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<Self> {
        let expires_at = issued_at.checked_add_signed(ttl)?;

        Some(
            Self::new()
                .with_subject(subject)
                .with_issued_at(issued_at.timestamp())
                .with_expiration(expires_at.timestamp()),
        )
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Set issuer.
    pub fn with_issuer(mut self, iss: String) -> Self {
        self.iss = Some(iss);
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Get role from extra fields (convenience method).
    pub fn role(&self) -> Option<String> {
        self.extra
            .get("role")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(false, |exp| exp < current_timestamp)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_new_claims() {
        let claims = Claims::new().with_subject("12345678900");
        assert_eq!(claims.sub, Some("12345678900".to_string()));
        assert!(claims.exp.is_none());
    }

    #[test]
    fn test_for_subject_overflowing_ttl() {
        let issued_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

        // About 273,000 years, past the largest representable DateTime
        assert!(Claims::for_subject("12345678900", issued_at, Duration::days(100_000_000)).is_none());
    }

    #[test]
    fn test_for_subject() {
        let issued_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let claims = Claims::for_subject("12345678900", issued_at, Duration::minutes(5)).unwrap();

        assert_eq!(claims.sub, Some("12345678900".to_string()));
        assert_eq!(claims.iat, Some(issued_at.timestamp()));

        let exp = claims.exp.unwrap();
        let iat = claims.iat.unwrap();
        assert_eq!(exp - iat, 5 * 60);
        assert!(claims.role().is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let claims = Claims::new()
            .with_subject("12345678900")
            .with_expiration(1234567890)
            .with_issued_at(1234567800)
            .with_issuer("auth-gateway".to_string())
            .with_extra("role", "ADMIN");

        assert_eq!(claims.sub, Some("12345678900".to_string()));
        assert_eq!(claims.exp, Some(1234567890));
        assert_eq!(claims.iat, Some(1234567800));
        assert_eq!(claims.iss, Some("auth-gateway".to_string()));
        assert_eq!(claims.role(), Some("ADMIN".to_string()));
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims::new().with_expiration(1000);

        assert!(!claims.is_expired(999)); // Not expired
        assert!(!claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001)); // Expired
    }

    #[test]
    fn test_is_expired_no_exp_claim() {
        let claims = Claims::new();
        assert!(!claims.is_expired(9999999999)); // Never expires without exp
    }
}
