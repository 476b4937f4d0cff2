use reqwest::StatusCode;
use url::Url;

/// Error code the Connect API returns when no OAuth integration is associated with the content.
pub const NO_INTEGRATION_CODE: i64 = 212;

#[derive(thiserror::Error, Debug)]
pub enum AdminError {
    #[error("Request to the Connect API failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{url} responded with {status}")]
    Status { url: Url, status: StatusCode },
    #[error("Unexpected response from {url}: {source}")]
    Decode { url: Url, source: serde_json::Error },
    #[error("No OAuth integration is associated with this content")]
    NoIntegration,
    #[error("Connect API error {code} ({status}): {message}")]
    Api {
        status: StatusCode,
        code: i64,
        message: String,
    },
    #[error("Invalid Connect API URL {url:?}: {source}")]
    InvalidUrl { url: String, source: url::ParseError },
}

/// Error body of the Connect API.
#[derive(serde::Deserialize)]
struct ApiErrorBody {
    code: i64,
    #[serde(default)]
    error: String,
}

impl AdminError {
    /// Classify a non-success response from its body.
    pub(crate) fn from_response(url: Url, status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(ApiErrorBody {
                code: NO_INTEGRATION_CODE,
                ..
            }) => AdminError::NoIntegration,
            Ok(ApiErrorBody { code, error }) => AdminError::Api {
                status,
                code,
                message: error,
            },
            Err(_) => AdminError::Status { url, status },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://connect.example.com/__api__/server_settings").unwrap()
    }

    #[test]
    fn classifies_error_bodies() {
        assert!(matches!(
            AdminError::from_response(url(), StatusCode::BAD_REQUEST, r#"{"code": 212, "error": "no integration"}"#),
            AdminError::NoIntegration
        ));
        assert!(matches!(
            AdminError::from_response(url(), StatusCode::FORBIDDEN, r#"{"code": 4, "error": "forbidden"}"#),
            AdminError::Api { code: 4, .. }
        ));
        assert!(matches!(
            AdminError::from_response(url(), StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            AdminError::Status {
                status: StatusCode::BAD_GATEWAY,
                ..
            }
        ));
    }
}
