// src/types/response.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ===== Webhook Response Types =====

/// Body returned by the profile service. Every field is optional: older
/// deployments answer with `success`, newer ones with `status: "accepted"`.
///
/// Fields are read independently; one of an unexpected type is treated as
/// absent instead of discarding the whole body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookResponse {
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub success: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
    #[serde(
        default,
        rename = "profileId",
        alias = "profile_id",
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub errors: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,
    /// Machine-readable error code, when the service provides one
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub code: Option<String>,
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_bool())
}

fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Ids arrive as strings or bare numbers depending on the deployment
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_string_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

impl WebhookResponse {
    /// Parse a raw body, treating anything that is not a JSON object as absent
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(raw) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }

    pub fn indicates_success(&self) -> bool {
        self.success == Some(true)
            || self
                .status
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("accepted"))
    }

    /// Server-supplied human readable text: `message`, then `error`
    pub fn server_message(&self) -> Option<&str> {
        let non_empty = |m: &&str| !m.is_empty();
        self.message
            .as_deref()
            .filter(non_empty)
            .or(self.error.as_deref().filter(non_empty))
    }

    pub fn error_list(&self) -> Vec<String> {
        self.errors.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepted_response() {
        let body = WebhookResponse::parse(
            r#"{"status":"accepted","profileId":"p-42","message":"queued"}"#,
        )
        .unwrap();
        assert!(body.indicates_success());
        assert_eq!(body.profile_id.as_deref(), Some("p-42"));
        assert_eq!(body.server_message(), Some("queued"));
    }

    #[test]
    fn test_parse_rejects_non_object_bodies() {
        assert!(WebhookResponse::parse("").is_none());
        assert!(WebhookResponse::parse("<html>bad gateway</html>").is_none());
        assert!(WebhookResponse::parse("[1,2]").is_none());
    }

    #[test]
    fn test_error_field_is_fallback_message() {
        let body = WebhookResponse::parse(r#"{"success":false,"error":"boom"}"#).unwrap();
        assert!(!body.indicates_success());
        assert_eq!(body.server_message(), Some("boom"));
        assert!(body.error_list().is_empty());
    }

    #[test]
    fn test_numeric_profile_id_is_kept() {
        let body =
            WebhookResponse::parse(r#"{"success":true,"profileId":42,"message":"ok"}"#).unwrap();
        assert!(body.indicates_success());
        assert_eq!(body.profile_id.as_deref(), Some("42"));
        assert_eq!(body.server_message(), Some("ok"));
    }

    #[test]
    fn test_mistyped_fields_do_not_hide_the_rest() {
        let body = WebhookResponse::parse(
            r#"{"success":"yes","message":"actor mismatch","errors":[{"field":"actor"},"bad actor"],"code":7}"#,
        )
        .unwrap();
        assert_eq!(body.success, None);
        assert_eq!(body.server_message(), Some("actor mismatch"));
        assert_eq!(body.error_list(), vec!["bad actor".to_string()]);
        assert_eq!(body.code, None);
    }

    #[test]
    fn test_empty_message_falls_back_to_error() {
        let body = WebhookResponse::parse(r#"{"message":"","error":"quota exceeded"}"#).unwrap();
        assert_eq!(body.server_message(), Some("quota exceeded"));
    }
}
