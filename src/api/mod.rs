//! REST client for the workshop backend.
//!
//! Every view goes through [`ApiClient::send`]: it builds the URL, attaches
//! the credential, runs the request and turns a non-success status into a
//! [`TallerError::Api`] carrying the server's message. Typed calls for each
//! resource live in `resources`.

mod resources;
mod transport;

pub use transport::{redact_token, HttpRequest, HttpResponse, Method, Transport, UreqTransport};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Result, TallerError};

/// Bearer token for authenticated calls
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential").field("token", &"***").finish()
    }
}

/// How a request proves who is calling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Public endpoint
    None,
    /// `Authorization: Bearer <token>`
    Header,
    /// `?token=<token>`, for downloads opened as plain links
    Query,
}

/// Description of one backend call
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    auth: Auth,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            auth: Auth::Header,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        Ok(Self::new(Method::Post, path).with_body(serde_json::to_value(body)?))
    }

    pub fn put<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        Ok(Self::new(Method::Put, path).with_body(serde_json::to_value(body)?))
    }

    fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn public(mut self) -> Self {
        self.auth = Auth::None;
        self
    }

    pub fn token_in_query(mut self) -> Self {
        self.auth = Auth::Query;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Client bound to one backend and, optionally, one credential
pub struct ApiClient<T: Transport = UreqTransport> {
    base_url: String,
    credential: Option<Credential>,
    transport: T,
}

impl ApiClient<UreqTransport> {
    pub fn from_config(config: &Config, credential: Option<Credential>) -> Result<Self> {
        let transport = UreqTransport::new(config.api.timeout());
        ApiClient::with_transport(&config.api.base_url, credential, transport)
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(
        base_url: &str,
        credential: Option<Credential>,
        transport: T,
    ) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(TallerError::InvalidApiUrl(base_url));
        }
        Ok(Self {
            base_url,
            credential,
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn credential_for(&self, auth: Auth) -> Result<Option<&Credential>> {
        match auth {
            Auth::None => Ok(None),
            Auth::Header | Auth::Query => self
                .credential
                .as_ref()
                .map(Some)
                .ok_or(TallerError::NotLoggedIn),
        }
    }

    /// Absolute URL for a request, token included when it travels in the query
    pub fn url_for(&self, request: &ApiRequest) -> Result<String> {
        let mut url = format!(
            "{}/{}",
            self.base_url,
            request.path.trim_start_matches('/')
        );

        let mut pairs: Vec<String> = request
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();
        if request.auth == Auth::Query {
            if let Some(credential) = self.credential_for(Auth::Query)? {
                pairs.push(format!("token={}", urlencoding::encode(credential.token())));
            }
        }
        if !pairs.is_empty() {
            url.push('?');
            url.push_str(&pairs.join("&"));
        }
        Ok(url)
    }

    fn build(&self, request: &ApiRequest) -> Result<HttpRequest> {
        let url = self.url_for(request)?;
        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];

        if request.auth == Auth::Header {
            if let Some(credential) = self.credential_for(Auth::Header)? {
                headers.push(("Authorization".to_string(), credential.bearer()));
            }
        }

        let body = match &request.body {
            Some(value) => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                Some(serde_json::to_vec(value)?)
            }
            None => None,
        };

        Ok(HttpRequest {
            method: request.method,
            url,
            headers,
            body,
        })
    }

    /// Run a request and fail on any non-success status
    pub fn send(&self, request: &ApiRequest) -> Result<HttpResponse> {
        let http = self.build(request)?;
        debug!(method = %http.method, url = %redact_token(&http.url), "request");

        let response = self.transport.execute(&http)?;
        debug!(status = response.status, bytes = response.body.len(), "response");

        if response.is_success() {
            return Ok(response);
        }

        let message = server_message(&response.body)
            .unwrap_or_else(|| format!("{} {} failed", request.method, request.path));
        warn!(status = response.status, path = %request.path, %message, "request failed");
        Err(TallerError::Api {
            status: response.status,
            message,
        })
    }

    /// Run a request and return its JSON body (`null` when empty)
    pub fn fetch_json(&self, request: &ApiRequest) -> Result<Value> {
        let response = self.send(request)?;
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&response.body).map_err(|e| TallerError::InvalidResponse {
            path: request.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Run a request and decode its JSON body into `R`
    pub fn fetch<R: DeserializeOwned>(&self, request: &ApiRequest) -> Result<R> {
        let value = self.fetch_json(request)?;
        serde_json::from_value(value).map_err(|e| TallerError::InvalidResponse {
            path: request.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Fetch a collection, tolerating bare arrays and `{key: [...]}` envelopes
    pub fn fetch_list<R: DeserializeOwned>(&self, request: &ApiRequest, key: &str) -> Result<Vec<R>> {
        let value = self.fetch_json(request)?;
        crate::models::extract_list(value, key).map_err(|e| TallerError::InvalidResponse {
            path: request.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Run a request and return the raw body, for file downloads
    pub fn download(&self, request: &ApiRequest) -> Result<Vec<u8>> {
        Ok(self.send(request)?.body)
    }
}

/// Error text the backend put in the body, if any
fn server_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["error", "message", "mensaje"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Transport that replays canned responses and records requests
    #[derive(Default)]
    pub struct FakeTransport {
        pub requests: RefCell<Vec<HttpRequest>>,
        responses: RefCell<VecDeque<HttpResponse>>,
    }

    impl FakeTransport {
        pub fn respond(self, status: u16, body: Value) -> Self {
            self.responses.borrow_mut().push_back(HttpResponse {
                status,
                body: serde_json::to_vec(&body).unwrap(),
            });
            self
        }

        pub fn respond_raw(self, status: u16, body: &[u8]) -> Self {
            self.responses.borrow_mut().push_back(HttpResponse {
                status,
                body: body.to_vec(),
            });
            self
        }

        pub fn last(&self) -> HttpRequest {
            self.requests.borrow().last().cloned().unwrap()
        }
    }

    impl Transport for FakeTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.requests.borrow_mut().push(request.clone());
            Ok(self
                .responses
                .borrow_mut()
                .pop_front()
                .unwrap_or(HttpResponse {
                    status: 200,
                    body: Vec::new(),
                }))
        }
    }

    pub fn client(transport: FakeTransport) -> ApiClient<FakeTransport> {
        ApiClient::with_transport(
            "http://backend.test/api/",
            Some(Credential::new("tok en")),
            transport,
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{client, FakeTransport};
    use super::*;
    use serde_json::json;

    #[test]
    fn authenticated_request_carries_bearer_header() {
        let api = client(FakeTransport::default().respond(200, json!([])));
        api.send(&ApiRequest::get("/clientes")).unwrap();

        let req = api.transport().last();
        assert_eq!(req.url, "http://backend.test/api/clientes");
        assert_eq!(req.header("Authorization"), Some("Bearer tok en"));
    }

    #[test]
    fn download_puts_token_in_query_instead_of_header() {
        let api = client(FakeTransport::default().respond_raw(200, b"%PDF"));
        let bytes = api
            .download(&ApiRequest::get("facturas/7/pdf").token_in_query())
            .unwrap();

        assert_eq!(bytes, b"%PDF");
        let req = api.transport().last();
        assert_eq!(req.url, "http://backend.test/api/facturas/7/pdf?token=tok%20en");
        assert!(req.header("Authorization").is_none());
    }

    #[test]
    fn public_request_needs_no_credential() {
        let api = ApiClient::with_transport(
            "http://backend.test/api",
            None,
            FakeTransport::default().respond(201, json!({"ok": true})),
        )
        .unwrap();

        api.send(&ApiRequest::post("valoraciones", &json!({"calificacion": 5}))
            .unwrap()
            .public())
            .unwrap();
        let req = api.transport().last();
        assert!(req.header("Authorization").is_none());
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.method, Method::Post);

        let err = api.send(&ApiRequest::get("clientes")).unwrap_err();
        assert!(matches!(err, TallerError::NotLoggedIn));
    }

    #[test]
    fn server_message_is_surfaced() {
        let api = client(FakeTransport::default().respond(400, json!({"error": "Orden ya tiene comisión"})));
        let err = api.send(&ApiRequest::get("comisiones")).unwrap_err();
        assert_eq!(err.to_string(), "Orden ya tiene comisión (HTTP 400)");
    }

    #[test]
    fn missing_message_falls_back_to_request() {
        let api = client(FakeTransport::default().respond_raw(500, b"<html>oops</html>"));
        let err = api.send(&ApiRequest::delete("facturas/3")).unwrap_err();
        assert_eq!(err.to_string(), "DELETE facturas/3 failed (HTTP 500)");
    }

    #[test]
    fn query_values_are_encoded() {
        let api = client(FakeTransport::default());
        let url = api
            .url_for(&ApiRequest::get("reportes/x").query("mes", 3).query("q", "a&b"))
            .unwrap();
        assert_eq!(url, "http://backend.test/api/reportes/x?mes=3&q=a%26b");
    }

    #[test]
    fn empty_body_reads_as_null() {
        let api = client(FakeTransport::default().respond_raw(204, b""));
        assert_eq!(api.fetch_json(&ApiRequest::delete("x/1")).unwrap(), Value::Null);
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = ApiClient::with_transport("localhost:3000", None, FakeTransport::default())
            .err()
            .unwrap();
        assert!(matches!(err, TallerError::InvalidApiUrl(_)));
    }
}
