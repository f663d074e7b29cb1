//! Request execution
//!
//! `prepare` runs every check that can fail before the network is touched:
//! credentials, then required parameters. `RequestExecutor::send` issues
//! exactly one transport call and turns whatever comes back into a
//! `RequestResult`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::auth::{resolve_headers, AuthResolver};
use crate::error::ExecuteError;
use crate::models::{
    EndpointDescriptor, RequestInfo, RequestResult, RequestValues, ResponseBody, ResponsePayload,
};
use crate::network::client::{HttpRequest, Transport};

/// Resolve headers and validate the body. Nothing is sent.
pub fn prepare(
    endpoint: &EndpointDescriptor,
    values: &RequestValues,
    resolver: &dyn AuthResolver,
) -> Result<RequestInfo, ExecuteError> {
    let headers = resolve_headers(endpoint, resolver)?;

    let missing = endpoint.missing_required(values);
    if !missing.is_empty() {
        return Err(ExecuteError::MissingRequiredParameters { missing });
    }

    Ok(RequestInfo::new(endpoint, headers, values))
}

/// Clears the in-flight flag however the send future ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct RequestExecutor<T: Transport> {
    transport: T,
    in_flight: AtomicBool,
}

impl<T: Transport> RequestExecutor<T> {
    pub fn new(transport: T) -> Self {
        RequestExecutor {
            transport,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate, then send. Validation failures never reach the transport.
    pub async fn execute(
        &self,
        endpoint: &EndpointDescriptor,
        values: &RequestValues,
        resolver: &dyn AuthResolver,
    ) -> RequestResult {
        match prepare(endpoint, values, resolver) {
            Ok(info) => self.send(&info).await,
            Err(err) => {
                tracing::warn!(recipe = %endpoint.label(), %err, "Request not sent");
                RequestResult::Failure(err)
            }
        }
    }

    /// Send a prepared request. Any received response counts as success.
    pub async fn send(&self, info: &RequestInfo) -> RequestResult {
        self.in_flight.store(true, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.in_flight);

        let start = Instant::now();
        let result = self.transport.send(HttpRequest::from(info)).await;
        let time_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(response) => {
                let content_type = response.header("content-type");
                let body = ResponseBody::parse(response.body.clone(), content_type);
                RequestResult::Success(ResponsePayload {
                    status_code: response.status,
                    headers: response.headers,
                    body,
                    time_ms,
                })
            }
            Err(e) => {
                tracing::warn!(url = %info.url, error = %e, "Transport failure");
                RequestResult::Failure(ExecuteError::NetworkError(e.message))
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::CountingTransport;
    use super::*;
    use crate::auth::SecretStore;
    use crate::models::{AuthKind, HttpMethod, ParamSpec, ParameterSchema};
    use serde_json::json;
    use std::time::Duration;

    fn search_endpoint() -> EndpointDescriptor {
        EndpointDescriptor::new("acme", "Search", HttpMethod::POST, "https://acme.test/search")
            .with_body(ParameterSchema::new(vec![ParamSpec::new("q", true)]))
    }

    fn values(v: serde_json::Value) -> RequestValues {
        v.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_missing_required_sends_nothing() {
        let executor =
            RequestExecutor::new(CountingTransport::replying(200, "application/json", "{}"));
        let result = executor
            .execute(&search_endpoint(), &RequestValues::new(), &SecretStore::new())
            .await;

        assert_eq!(
            result,
            RequestResult::Failure(ExecuteError::MissingRequiredParameters {
                missing: vec!["q".into()]
            })
        );
        assert_eq!(executor.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_credentials_sends_nothing() {
        let executor =
            RequestExecutor::new(CountingTransport::replying(200, "application/json", "{}"));
        let endpoint = search_endpoint().with_auth(AuthKind::Bearer);
        let no_secret = |_: &EndpointDescriptor| -> Option<String> { None };

        let result = executor
            .execute(&endpoint, &values(json!({"q": "x"})), &no_secret)
            .await;

        assert_eq!(
            result,
            RequestResult::Failure(ExecuteError::MissingCredentials { project: "acme".into() })
        );
        assert_eq!(executor.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn test_sends_headers_and_body_once() {
        let executor = RequestExecutor::new(CountingTransport::replying(
            200,
            "application/json",
            r#"{"hits":[]}"#,
        ));
        let endpoint = search_endpoint().with_auth(AuthKind::Bearer);
        let mut secrets = SecretStore::new();
        secrets.set("acme", "tok");

        let result = executor
            .execute(&endpoint, &values(json!({"q": "cats"})), &secrets)
            .await;

        assert_eq!(result.status_code(), Some(200));
        assert_eq!(executor.transport().call_count(), 1);
        let sent = executor.transport().requests.lock().unwrap()[0].clone();
        assert_eq!(sent.method, HttpMethod::POST);
        assert_eq!(sent.body.as_deref(), Some(r#"{"q":"cats"}"#));
        assert!(sent.headers.contains(&("Authorization".into(), "Bearer tok".into())));
        assert!(sent.headers.contains(&("Content-Type".into(), "application/json".into())));
        assert!(!executor.is_in_flight());
    }

    #[tokio::test]
    async fn test_no_body_without_schema() {
        let executor = RequestExecutor::new(CountingTransport::replying(200, "text/plain", "pong"));
        let endpoint =
            EndpointDescriptor::new("acme", "Ping", HttpMethod::GET, "https://acme.test/ping");

        let result = executor
            .execute(&endpoint, &values(json!({"stray": true})), &SecretStore::new())
            .await;

        let sent = executor.transport().requests.lock().unwrap()[0].clone();
        assert_eq!(sent.body, None);
        match result {
            RequestResult::Success(payload) => {
                assert_eq!(payload.body, ResponseBody::Text("pong".into()))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_status_is_a_result() {
        let executor = RequestExecutor::new(CountingTransport::replying(
            422,
            "application/json",
            r#"{"error":"bad q"}"#,
        ));
        let result = executor
            .execute(&search_endpoint(), &values(json!({"q": ""})), &SecretStore::new())
            .await;

        match result {
            RequestResult::Success(payload) => {
                assert_eq!(payload.status_code, 422);
                assert!(!payload.is_success_status());
                assert_eq!(payload.body, ResponseBody::Json(json!({"error": "bad q"})));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let executor =
            RequestExecutor::new(CountingTransport::failing("Connection failed: refused"));
        let result = executor
            .execute(&search_endpoint(), &values(json!({"q": "x"})), &SecretStore::new())
            .await;

        assert_eq!(
            result,
            RequestResult::Failure(ExecuteError::NetworkError("Connection failed: refused".into()))
        );
        assert_eq!(executor.transport().call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_only_while_pending() {
        let transport = CountingTransport::replying(200, "application/json", "{}")
            .with_delay(Duration::from_millis(500));
        let executor = RequestExecutor::new(transport);
        let request = prepare(&search_endpoint(), &values(json!({"q": "x"})), &SecretStore::new())
            .unwrap();
        assert!(!executor.is_in_flight());

        let send = executor.send(&request);
        tokio::pin!(send);
        let early = tokio::time::timeout(Duration::from_millis(100), &mut send).await;
        assert!(early.is_err());
        assert!(executor.is_in_flight());

        let result = send.await;
        assert!(result.is_success());
        assert!(!executor.is_in_flight());
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_send_clears_in_flight() {
        let transport = CountingTransport::replying(200, "application/json", "{}")
            .with_delay(Duration::from_secs(5));
        let executor = RequestExecutor::new(transport);
        let request = prepare(&search_endpoint(), &values(json!({"q": "x"})), &SecretStore::new())
            .unwrap();

        let timed_out = tokio::time::timeout(Duration::from_secs(1), executor.send(&request)).await;
        assert!(timed_out.is_err());
        assert!(!executor.is_in_flight());
        assert_eq!(executor.transport().call_count(), 1);
    }
}
