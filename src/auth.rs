//! Credential lookup
//!
//! Secrets are keyed by recipe project. How they get into the store (a
//! settings screen, CLI flags) is up to the caller.

use std::collections::HashMap;

use anyhow::{anyhow, Result};

use crate::constants::JSON_CONTENT_TYPE;
use crate::error::ExecuteError;
use crate::models::{AuthKind, EndpointDescriptor};

/// Looks up the secret for an endpoint
pub trait AuthResolver {
    fn resolve(&self, endpoint: &EndpointDescriptor) -> Option<String>;
}

impl<F> AuthResolver for F
where
    F: Fn(&EndpointDescriptor) -> Option<String>,
{
    fn resolve(&self, endpoint: &EndpointDescriptor) -> Option<String> {
        self(endpoint)
    }
}

/// In-memory secrets per project
#[derive(Clone, Debug, Default)]
pub struct SecretStore {
    secrets: HashMap<String, String>,
}

impl SecretStore {
    pub fn new() -> Self {
        SecretStore::default()
    }

    pub fn set(&mut self, project: impl Into<String>, secret: impl Into<String>) {
        self.secrets.insert(project.into(), secret.into());
    }

    pub fn remove(&mut self, project: &str) -> Option<String> {
        self.secrets.remove(project)
    }

    pub fn get(&self, project: &str) -> Option<&str> {
        self.secrets
            .get(project)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Parse a `project=secret` assignment
    pub fn parse_assignment(input: &str) -> Result<(String, String)> {
        match input.split_once('=') {
            Some((project, secret)) if !project.trim().is_empty() => {
                Ok((project.trim().to_string(), secret.to_string()))
            }
            _ => Err(anyhow!("Invalid secret assignment (expected project=secret): {}", input)),
        }
    }
}

impl AuthResolver for SecretStore {
    fn resolve(&self, endpoint: &EndpointDescriptor) -> Option<String> {
        self.get(&endpoint.project).map(String::from)
    }
}

/// Headers for `endpoint`: JSON content type plus whatever the auth kind adds.
///
/// Fails with `MissingCredentials` when auth is needed and nothing resolves.
pub fn resolve_headers(
    endpoint: &EndpointDescriptor,
    resolver: &dyn AuthResolver,
) -> Result<Vec<(String, String)>, ExecuteError> {
    let mut headers = vec![(String::from("Content-Type"), String::from(JSON_CONTENT_TYPE))];

    if !endpoint.auth.is_required() {
        return Ok(headers);
    }

    let token = resolver
        .resolve(endpoint)
        .ok_or_else(|| ExecuteError::MissingCredentials {
            project: endpoint.project.clone(),
        })?;

    match &endpoint.auth {
        AuthKind::Bearer => {
            headers.push((String::from("Authorization"), format!("Bearer {}", token)))
        }
        AuthKind::ApiKey { header } => headers.push((header.clone(), token)),
        AuthKind::Custom(_) | AuthKind::None => {}
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpMethod;

    fn endpoint(auth: AuthKind) -> EndpointDescriptor {
        EndpointDescriptor::new("acme", "Things", HttpMethod::GET, "https://acme.test/things")
            .with_auth(auth)
    }

    #[test]
    fn test_no_auth_only_content_type() {
        let headers = resolve_headers(&endpoint(AuthKind::None), &SecretStore::new()).unwrap();
        assert_eq!(headers, vec![("Content-Type".to_string(), "application/json".to_string())]);
    }

    #[test]
    fn test_bearer_header() {
        let mut secrets = SecretStore::new();
        secrets.set("acme", "s3cret");
        let headers = resolve_headers(&endpoint(AuthKind::Bearer), &secrets).unwrap();
        assert_eq!(headers[1], ("Authorization".to_string(), "Bearer s3cret".to_string()));
    }

    #[test]
    fn test_api_key_and_custom() {
        let resolver = |_: &EndpointDescriptor| Some(String::from("k"));
        let api_key = AuthKind::ApiKey { header: "X-Api-Key".into() };
        let headers = resolve_headers(&endpoint(api_key), &resolver).unwrap();
        assert_eq!(headers[1], ("X-Api-Key".to_string(), "k".to_string()));

        let headers =
            resolve_headers(&endpoint(AuthKind::Custom("oauth".into())), &resolver).unwrap();
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_missing_or_empty_secret() {
        let mut secrets = SecretStore::new();
        secrets.set("acme", "");
        let err = resolve_headers(&endpoint(AuthKind::Bearer), &secrets).unwrap_err();
        assert_eq!(err, ExecuteError::MissingCredentials { project: "acme".into() });
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            SecretStore::parse_assignment("acme=a=b").unwrap(),
            ("acme".to_string(), "a=b".to_string())
        );
        assert!(SecretStore::parse_assignment("no-equals").is_err());
        assert!(SecretStore::parse_assignment("=x").is_err());
    }
}
