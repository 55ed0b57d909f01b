use serde::{Deserialize, Serialize};

use crate::user::Role;

/// The access/refresh token pair that constitutes login state.
///
/// Both tokens are opaque bearer credentials issued by the backend. The pair
/// is rotated as a unit: login, registration, and a successful refresh each
/// replace both tokens, and an irrecoverable refresh failure clears both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionCredentials {
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of the `login` mutation: identity fields plus fresh credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub role: Role,
    pub access_token: String,
    pub refresh_token: String,
}

impl LoginPayload {
    pub fn credentials(&self) -> SessionCredentials {
        SessionCredentials {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// Result of the `verifyCodeAndRegister` mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl RegisterPayload {
    pub fn credentials(&self) -> SessionCredentials {
        SessionCredentials {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// Body of the dedicated `POST <base>/refresh-token` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response of the refresh endpoint. Fields are optional on purpose: a
/// response missing either token is a refresh failure, not a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl RefreshResponse {
    /// Returns the rotated pair when the response carries both tokens.
    pub fn into_credentials(self) -> Option<SessionCredentials> {
        match (self.access_token, self.refresh_token) {
            (Some(access), Some(refresh))
                if !access.is_empty() && !refresh.is_empty() =>
            {
                Some(SessionCredentials {
                    access_token: access,
                    refresh_token: refresh,
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_payload_uses_server_field_names() {
        let raw = r#"{
            "_id": "u1",
            "email": "a@b.com",
            "role": "Doctor",
            "accessToken": "T1",
            "refreshToken": "R1"
        }"#;

        let payload: LoginPayload =
            serde_json::from_str(raw).expect("payload deserializes");
        assert_eq!(payload.id, "u1");
        let credentials = payload.credentials();
        assert_eq!(credentials.access_token, "T1");
        assert_eq!(credentials.refresh_token, "R1");
    }

    #[test]
    fn refresh_response_requires_both_tokens() {
        let complete: RefreshResponse = serde_json::from_str(
            r#"{"accessToken": "A2", "refreshToken": "R2"}"#,
        )
        .unwrap();
        assert!(complete.into_credentials().is_some());

        let partial: RefreshResponse =
            serde_json::from_str(r#"{"accessToken": "A2"}"#).unwrap();
        assert!(partial.into_credentials().is_none());

        let empty: RefreshResponse =
            serde_json::from_str(r#"{"accessToken": "", "refreshToken": "R2"}"#)
                .unwrap();
        assert!(empty.into_credentials().is_none());
    }
}
