//! Request boundary.
//!
//! Turns the `domain` query parameter of a `/publicsuffix` request into a
//! status code and JSON body. The HTTP server itself lives outside this
//! crate; it only has to copy `status`, `content_type()` and `to_json()`
//! onto the wire.

use serde::Serialize;

use crate::classifier::Classifier;
use crate::error::{PslError, Result};
use crate::types::{Classification, ManagedBy};

/// Content type of every response body
pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Message used when the `domain` parameter is missing or empty
pub const MISSING_DOMAIN_MESSAGE: &str = "Malformed URL query parameter `domain`";

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_INTERNAL_SERVER_ERROR: u16 = 500;

/// Successful classification as sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSuffixResponse {
    pub domain: String,
    pub public_suffix: String,
    pub is_managed_by: ManagedBy,
}

impl PublicSuffixResponse {
    /// Build a response echoing the caller's `domain` value
    pub fn new(requested: &str, classification: Classification) -> Self {
        Self {
            domain: requested.to_string(),
            public_suffix: classification.matched_suffix,
            is_managed_by: classification.origin,
        }
    }
}

/// Error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_code: u16,
    pub error_type: String,
    pub error_message: String,
}

impl ErrorResponse {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            error_code: status,
            error_type: status_text(status).to_string(),
            error_message: message.into(),
        }
    }
}

/// Response body variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    PublicSuffix(PublicSuffixResponse),
    Error(ErrorResponse),
}

/// Status and body of one `/publicsuffix` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ServiceResponse {
    fn ok(body: PublicSuffixResponse) -> Self {
        Self {
            status: STATUS_OK,
            body: ResponseBody::PublicSuffix(body),
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ResponseBody::Error(ErrorResponse::new(status, message)),
        }
    }

    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Serialize the body
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.body)?)
    }
}

/// Handle a request given the raw (still percent-encoded) query string,
/// e.g. `domain=www.example.co.uk`. The first `domain` value wins.
pub fn handle_query(classifier: &Classifier, query: &str) -> ServiceResponse {
    let domain = domain_from_query(query);
    handle_domain(classifier, domain.as_deref())
}

/// Handle a request given the decoded `domain` parameter.
pub fn handle_domain(classifier: &Classifier, domain: Option<&str>) -> ServiceResponse {
    let domain = match domain {
        Some(d) if !d.is_empty() => d,
        _ => {
            log::debug!("rejecting request without domain parameter");
            return ServiceResponse::error(STATUS_BAD_REQUEST, MISSING_DOMAIN_MESSAGE);
        }
    };

    match classifier.classify(domain) {
        Ok(classification) => {
            ServiceResponse::ok(PublicSuffixResponse::new(domain, classification))
        }
        Err(e) => {
            log::debug!("rejecting domain {:?}: {}", domain, e);
            ServiceResponse::from(&e)
        }
    }
}

/// First `domain` value of an `application/x-www-form-urlencoded` query
pub fn domain_from_query(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "domain")
        .map(|(_, value)| value.into_owned())
}

fn status_text(status: u16) -> &'static str {
    match status {
        STATUS_OK => "OK",
        STATUS_BAD_REQUEST => "Bad Request",
        STATUS_INTERNAL_SERVER_ERROR => "Internal Server Error",
        _ => "",
    }
}

impl From<&PslError> for ServiceResponse {
    fn from(err: &PslError) -> Self {
        let status = if err.is_client_error() {
            STATUS_BAD_REQUEST
        } else {
            STATUS_INTERNAL_SERVER_ERROR
        };
        ServiceResponse::error(status, err.to_string())
    }
}
