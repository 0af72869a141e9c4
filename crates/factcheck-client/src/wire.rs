//! Request and response bodies exchanged with the backend.

use factcheck_domain::{ClaimRecord, RecordId};
use serde::{Deserialize, Serialize};

/// `POST verify-claim`
#[derive(Debug, Clone, Serialize)]
pub struct VerifyClaimRequest {
    /// Claim title
    pub claim: String,
}

/// `GET claims`
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimsResponse {
    /// Catalogued claims
    #[serde(default)]
    pub claims: Vec<ClaimRecord>,
}

/// `POST login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

/// Profile returned by `login` and `verify-token`
///
/// Every field is optional; the backend decides what it sends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// First name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl UserProfile {
    /// Best available display name
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            return full;
        }
        self.email.clone().unwrap_or_else(|| "unknown user".to_string())
    }
}

/// Answer to `POST login`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    /// Whether the credentials were accepted
    #[serde(default)]
    pub success: bool,
    /// Profile of the logged-in user
    #[serde(default)]
    pub user: Option<UserProfile>,
    /// Bearer token
    #[serde(default)]
    pub token: Option<String>,
    /// Failure reason
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST signup`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: String,
    /// Ten-digit phone number
    pub phone: String,
    /// Password
    pub password: String,
}

/// Answer to `POST signup`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupResponse {
    /// Whether the account was created
    #[serde(default)]
    pub success: bool,
    /// Failure reason or confirmation
    #[serde(default)]
    pub message: Option<String>,
}

/// Answer to `GET verify-token`
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyTokenResponse {
    /// Profile behind the token
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// `POST chat`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// User message
    pub message: String,
    /// Conversation context label
    pub context: String,
    /// RFC 3339 send time
    pub timestamp: String,
}

/// Answer to `POST chat`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    /// Preferred reply field
    #[serde(default)]
    pub response: Option<String>,
    /// Alternative reply field
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body some endpoints send with non-2xx statuses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// Error text
    #[serde(default)]
    pub error: Option<String>,
    /// Alternative error text
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_profile_parsing() {
        let user: UserProfile = serde_json::from_str(
            r#"{"id": 7, "email": "a@b.co", "firstName": "Ada", "lastName": "Lovelace", "role": "admin"}"#,
        )
        .unwrap();
        assert_eq!(user.id, Some(RecordId::Number(7)));
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = UserProfile {
            email: Some("a@b.co".to_string()),
            ..UserProfile::default()
        };
        assert_eq!(user.display_name(), "a@b.co");
        assert_eq!(UserProfile::default().display_name(), "unknown user");
    }

    #[test]
    fn test_signup_request_is_camel_case() {
        let request = SignupRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "a@b.co".to_string(),
            phone: "0123456789".to_string(),
            password: "secret1".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["lastName"], "Lovelace");
    }

    #[test]
    fn test_login_response_failure() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"success": false, "message": "Invalid credentials"}"#).unwrap();
        assert!(!response.success);
        assert!(response.token.is_none());
        assert_eq!(response.message.as_deref(), Some("Invalid credentials"));
    }
}
