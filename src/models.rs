//! Data models for the ChronoAuth API and dashboard state.
//!
//! Wire types mirror the server's camelCase JSON; display types carry the
//! extra state the dashboard needs (the current code string).

use serde::{Deserialize, Serialize};

/// Placeholder shown for an entry whose code has not been fetched yet.
pub const CODE_PLACEHOLDER: &str = "------";

/// An authenticator entry as listed by `GET /api/otp`.
///
/// The server never returns the shared secret here; codes are requested
/// separately by id.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntrySummary {
    /// Server-assigned stable identifier.
    pub id: i64,
    /// Display label for the service.
    pub service_name: String,
    /// Username of the owning account. Present when an admin views
    /// entries belonging to another identity.
    #[serde(default)]
    pub owner: Option<String>,
    /// Creation timestamp (informational only).
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A dashboard entry: the listed summary plus the live code field.
///
/// The entry set is owned exclusively by the dashboard state. Only the
/// full-list reload replaces it, and only the merge-by-id path mutates a
/// `code` field, so a late fetch response can never touch another entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OtpEntry {
    pub id: i64,
    pub service_name: String,
    /// Set when the entry is owned by another identity; the dashboard
    /// shows it as an owner badge.
    pub owner: Option<String>,
    /// Current 6-digit display string, or [`CODE_PLACEHOLDER`].
    pub code: String,
}

impl From<EntrySummary> for OtpEntry {
    fn from(summary: EntrySummary) -> Self {
        Self {
            id: summary.id,
            service_name: summary.service_name,
            owner: summary.owner,
            code: CODE_PLACEHOLDER.to_string(),
        }
    }
}

/// Transient output of the provisioning-URI parser.
///
/// Exists only to pre-fill the add-entry form; never persisted. The
/// secret is raw - case and whitespace normalization happen when the form
/// is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningCredential {
    /// Issuer or service label; never empty.
    pub service_name: String,
    /// Base32-ish shared secret, verbatim from the URI.
    pub secret: String,
}

/// One activity-log row from `GET /api/logs`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    /// Action tag, e.g. `LOGIN`, `ADD_SERVICE`, `VIEW_OTP`.
    pub action: String,
    pub details: String,
    /// ISO-8601 timestamp as sent by the server.
    pub timestamp: String,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /api/otp`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub service_name: String,
    pub secret_key: String,
}

/// Response of `GET /api/otp/{id}/token`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeResponse {
    /// Six ASCII digits.
    pub code: String,
    #[serde(default)]
    pub service_name: Option<String>,
}

/// Response of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Opaque session token, attached as a bearer credential afterwards.
    pub token: String,
}

/// Generic `{"message": ...}` envelope used by the server for write
/// results and errors.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_summary_from_wire_json() {
        let json = r#"{
            "id": 7,
            "serviceName": "GitHub",
            "owner": "thanapat",
            "createdAt": "2026-07-01T09:30:00"
        }"#;
        let summary: EntrySummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.id, 7);
        assert_eq!(summary.service_name, "GitHub");
        assert_eq!(summary.owner.as_deref(), Some("thanapat"));
    }

    #[test]
    fn test_entry_summary_owner_optional() {
        let json = r#"{"id": 1, "serviceName": "AWS"}"#;
        let summary: EntrySummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.owner, None);
        assert_eq!(summary.created_at, None);
    }

    #[test]
    fn test_entry_starts_with_placeholder() {
        let summary: EntrySummary =
            serde_json::from_str(r#"{"id": 3, "serviceName": "Google"}"#).unwrap();
        let entry = OtpEntry::from(summary);
        assert_eq!(entry.code, CODE_PLACEHOLDER);
        assert_eq!(entry.service_name, "Google");
    }

    #[test]
    fn test_create_request_serializes_camel_case() {
        let request = CreateEntryRequest {
            service_name: "GitHub".to_string(),
            secret_key: "JBSWY3DPEHPK3PXP".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["serviceName"], "GitHub");
        assert_eq!(json["secretKey"], "JBSWY3DPEHPK3PXP");
    }

    #[test]
    fn test_code_response_parses() {
        let response: CodeResponse =
            serde_json::from_str(r#"{"code": "492039", "serviceName": "GitHub"}"#).unwrap();
        assert_eq!(response.code, "492039");
    }

    #[test]
    fn test_activity_log_parses() {
        let json = r#"{
            "id": 12,
            "username": "thanapat",
            "action": "VIEW_OTP",
            "details": "Viewed OTP for service: GitHub",
            "timestamp": "2026-07-02T10:00:00"
        }"#;
        let log: ActivityLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.action, "VIEW_OTP");
        assert_eq!(log.username.as_deref(), Some("thanapat"));
    }
}
