use serde::{Deserialize, Serialize};

/// Body of `GET /auth/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthMeResponse {
    pub user_id: String,
    pub is_authenticated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_auth_me_response() {
        let json = r#"{"user_id": "42", "is_authenticated": true}"#;
        let resp: AuthMeResponse = serde_json::from_str(json).expect("Failed to parse auth/me JSON");
        assert_eq!(resp.user_id, "42");
        assert!(resp.is_authenticated);
    }

    #[test]
    fn test_parse_auth_me_ignores_extra_fields() {
        let json = r#"{"user_id": "7", "is_authenticated": false, "expires_at": null}"#;
        let resp: AuthMeResponse = serde_json::from_str(json).expect("Failed to parse auth/me JSON");
        assert_eq!(resp.user_id, "7");
        assert!(!resp.is_authenticated);
    }

    #[test]
    fn test_parse_auth_me_rejects_numeric_user_id() {
        let json = r#"{"user_id": 42, "is_authenticated": true}"#;
        assert!(serde_json::from_str::<AuthMeResponse>(json).is_err());
    }
}
