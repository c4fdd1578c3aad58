//! # HTTP Operation Descriptor
//!
//! File: cli/src/model/operation.rs
//!
//! Declarative description of one REST call a command performs: the URL
//! template, the method, how URL and query parameters are filled, and the
//! schema of each response.
//!
use super::schema::Schema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpOperation {
    pub operation_id: String,
    pub http: HttpAction,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HttpAction {
    /// URL template, e.g. `/subscriptions/{subscriptionId}/...`.
    pub path: String,
    pub request: HttpRequest,
    #[serde(default)]
    pub responses: Vec<HttpResponse>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequest {
    pub method: HttpMethod,
    #[serde(default)]
    pub path_params: Vec<HttpParam>,
    #[serde(default)]
    pub query_params: Vec<HttpParam>,
}

/// A URL or query parameter. The value comes from a command argument
/// (`arg`), from a constant (`const`), or for `subscriptionId` from the
/// CLI context.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HttpParam {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
    #[serde(rename = "const", default, skip_serializing_if = "Option::is_none")]
    pub const_value: Option<String>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_codes: Vec<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Schema>,
    #[serde(default)]
    pub is_error: bool,
}

impl HttpOperation {
    /// Responses that represent success, in declaration order.
    pub fn success_responses(&self) -> impl Iterator<Item = &HttpResponse> {
        self.http.responses.iter().filter(|r| !r.is_error)
    }
}
