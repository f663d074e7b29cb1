use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ExecuteError;

/// Request body being edited: parameter name to JSON value, in insertion order
pub type RequestValues = Map<String, Value>;

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    #[serde(alias = "get")]
    GET,
    #[serde(alias = "post")]
    POST,
    #[serde(alias = "put")]
    PUT,
    #[serde(alias = "patch")]
    PATCH,
    #[serde(alias = "delete")]
    DELETE,
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
        }
    }
}

/// Authentication a recipe expects
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthKind {
    #[default]
    None,
    /// `Authorization: Bearer <secret>`
    Bearer,
    /// Secret sent verbatim in the named header
    ApiKey { header: String },
    /// Needs a secret but adds no header of its own
    Custom(String),
}

impl AuthKind {
    pub fn as_str(&self) -> &str {
        match self {
            AuthKind::None => "None",
            AuthKind::Bearer => "Bearer",
            AuthKind::ApiKey { .. } => "API Key",
            AuthKind::Custom(s) => s,
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, AuthKind::None)
    }
}

fn default_type_hint() -> String {
    String::from("string")
}

/// One entry of a request-body schema
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type", default = "default_type_hint")]
    pub type_hint: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, required: bool) -> Self {
        ParamSpec {
            name: name.into(),
            required,
            type_hint: default_type_hint(),
            description: None,
        }
    }
}

/// Ordered request-body schema
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSchema(Vec<ParamSpec>);

impl ParameterSchema {
    pub fn new(params: Vec<ParamSpec>) -> Self {
        ParameterSchema(params)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamSpec> {
        self.0.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.0.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_required(&self) -> bool {
        self.0.iter().any(|p| p.required)
    }

    /// Required names absent from `values`, in schema order
    pub fn missing_required(&self, values: &RequestValues) -> Vec<String> {
        self.0
            .iter()
            .filter(|p| p.required && !values.contains_key(&p.name))
            .map(|p| p.name.clone())
            .collect()
    }

    /// First name that appears more than once, if any
    pub fn first_duplicate(&self) -> Option<&str> {
        self.0
            .iter()
            .enumerate()
            .find(|(i, p)| self.0[..*i].iter().any(|q| q.name == p.name))
            .map(|(_, p)| p.name.as_str())
    }
}

/// Ready-made body shipped with a recipe
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeExample {
    pub title: String,
    #[serde(default)]
    pub body: RequestValues,
}

/// A predefined API call from the catalog
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Namespace used to look up credentials
    pub project: String,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    /// Full request URL
    pub path: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub auth: AuthKind,
    /// Present only for endpoints that send a JSON body
    #[serde(default)]
    pub request_body: Option<ParameterSchema>,
    #[serde(default)]
    pub examples: Vec<RecipeExample>,
}

impl EndpointDescriptor {
    pub fn new(
        project: impl Into<String>,
        title: impl Into<String>,
        method: HttpMethod,
        path: impl Into<String>,
    ) -> Self {
        EndpointDescriptor {
            project: project.into(),
            title: title.into(),
            summary: None,
            path: path.into(),
            method,
            auth: AuthKind::None,
            request_body: None,
            examples: Vec::new(),
        }
    }

    pub fn with_auth(mut self, auth: AuthKind) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_body(mut self, schema: ParameterSchema) -> Self {
        self.request_body = Some(schema);
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// "project / title", the label shown in search results
    pub fn label(&self) -> String {
        format!("{} / {}", self.project, self.title)
    }

    pub fn is_body_bearing(&self) -> bool {
        self.request_body.is_some()
    }

    pub fn has_required_params(&self) -> bool {
        self.request_body
            .as_ref()
            .is_some_and(ParameterSchema::has_required)
    }

    pub fn missing_required(&self, values: &RequestValues) -> Vec<String> {
        self.request_body
            .as_ref()
            .map(|schema| schema.missing_required(values))
            .unwrap_or_default()
    }
}

/// Fully resolved request: what gets sent and what code is generated from
#[derive(Clone, Debug, PartialEq)]
pub struct RequestInfo {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestInfo {
    /// Pair an endpoint with resolved headers and the current values.
    /// Only body-bearing endpoints carry a body.
    pub fn new(
        endpoint: &EndpointDescriptor,
        headers: Vec<(String, String)>,
        values: &RequestValues,
    ) -> Self {
        RequestInfo {
            method: endpoint.method,
            url: endpoint.path.clone(),
            headers,
            body: endpoint
                .is_body_bearing()
                .then(|| Value::Object(values.clone())),
        }
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response body, parsed when the server says it is JSON
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn parse(text: String, content_type: Option<&str>) -> Self {
        let is_json = content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));
        if is_json {
            if let Ok(json) = serde_json::from_str::<Value>(&text) {
                return ResponseBody::Json(json);
            }
        }
        ResponseBody::Text(text)
    }

    /// Pretty JSON or the raw text
    pub fn display(&self) -> String {
        match self {
            ResponseBody::Json(json) => {
                serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string())
            }
            ResponseBody::Text(text) => text.clone(),
        }
    }
}

/// Response from HTTP request
#[derive(Clone, Debug, PartialEq)]
pub struct ResponsePayload {
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub body: ResponseBody,
    pub time_ms: u64,
}

impl ResponsePayload {
    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Outcome of one execution
#[derive(Clone, Debug, PartialEq)]
pub enum RequestResult {
    /// A response arrived, whatever its status code
    Success(ResponsePayload),
    Failure(ExecuteError),
}

impl RequestResult {
    pub fn is_success(&self) -> bool {
        matches!(self, RequestResult::Success(_))
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            RequestResult::Success(payload) => Some(payload.status_code),
            RequestResult::Failure(_) => None,
        }
    }
}
