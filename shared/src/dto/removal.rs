use serde::{Deserialize, Serialize};
use crate::config::ResponseShape;
use crate::error::{Result, SharedError};

pub const GENERIC_FAILURE: &str = "Failed to remove participant. Please try again.";

/// Body returned by the JSON removal endpoints.
///
/// Error responses only carry `error` (and sometimes `details`), so `success`
/// defaults to false when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemovalResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl RemovalResponse {
    fn server_message(&self) -> Option<String> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }
}

/// Raw HTTP reply as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Acknowledgement of a removal the server accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalAck {
    pub message: Option<String>,
}

/// Decides whether a reply means the removal happened.
pub fn interpret_reply(reply: &HttpReply, shape: ResponseShape) -> Result<RemovalAck> {
    let parsed = serde_json::from_str::<RemovalResponse>(&reply.body);

    if !reply.ok() {
        let message = parsed.ok().and_then(|r| r.server_message());
        return Err(SharedError::Status {
            status: reply.status,
            message,
        });
    }

    match shape {
        ResponseShape::Redirect => Ok(RemovalAck { message: None }),
        ResponseShape::Json => {
            let response = parsed.map_err(|e| SharedError::MalformedResponse(e.to_string()))?;
            if response.success {
                Ok(RemovalAck {
                    message: response.message.clone(),
                })
            } else {
                Err(SharedError::Rejected(
                    response
                        .server_message()
                        .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_success_true_is_accepted() {
        let reply = HttpReply::new(200, r#"{"success": true, "message": "User 42 deleted successfully"}"#);
        let ack = interpret_reply(&reply, ResponseShape::Json).unwrap();
        assert_eq!(ack.message.as_deref(), Some("User 42 deleted successfully"));
    }

    #[test]
    fn test_success_false_uses_server_error() {
        let reply = HttpReply::new(200, r#"{"success": false, "error": "Team is locked"}"#);
        let err = interpret_reply(&reply, ResponseShape::Json).unwrap_err();
        assert_eq!(err, SharedError::Rejected("Team is locked".into()));
        assert_eq!(err.user_message(), "Team is locked");
    }

    #[test]
    fn test_success_false_without_message_is_generic() {
        let reply = HttpReply::new(200, r#"{"success": false}"#);
        let err = interpret_reply(&reply, ResponseShape::Json).unwrap_err();
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[rstest]
    #[case(401, r#"{"error": "Admin access required"}"#, Some("Admin access required"))]
    #[case(404, r#"{"error": "User not found"}"#, Some("User not found"))]
    #[case(500, "<html>Internal Server Error</html>", None)]
    fn test_non_ok_status_is_failure(
        #[case] status: u16,
        #[case] body: &str,
        #[case] expected: Option<&str>,
    ) {
        let err = interpret_reply(&HttpReply::new(status, body), ResponseShape::Json).unwrap_err();
        assert_eq!(
            err,
            SharedError::Status {
                status,
                message: expected.map(str::to_string)
            }
        );
        assert!(!err.user_message().is_empty());
    }

    #[test]
    fn test_malformed_json_is_logical_failure() {
        let reply = HttpReply::new(200, "<!doctype html><p>redirecting</p>");
        let err = interpret_reply(&reply, ResponseShape::Json).unwrap_err();
        assert!(matches!(err, SharedError::MalformedResponse(_)));
        assert!(err.user_message().contains("unexpected response"));
    }

    #[test]
    fn test_redirect_shape_only_needs_ok_status() {
        let reply = HttpReply::new(200, "<html>admin</html>");
        assert!(interpret_reply(&reply, ResponseShape::Redirect).is_ok());
        let reply = HttpReply::new(302, "");
        assert!(interpret_reply(&reply, ResponseShape::Redirect).is_err());
    }
}
