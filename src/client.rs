//! HTTP session client for the Cloud Director API
//!
//! This module owns every outbound request. One `VcdClient` is built per
//! process from the selected site:
//! - one `reqwest` connection pool with a fixed 30 second timeout
//! - certificate validation relaxed when the site allows it
//! - a bearer token obtained once through `login` and never refreshed
//! - the versioned `Accept` header injected into every request
//!
//! There is no retry policy. A transport failure is returned to the caller as
//! `VcdError::Transport` and the binary decides what to do with it.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Site;
use crate::error::{VcdError, VcdResult};
use crate::xml;

/// Client-wide request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Session creation path for provider logins.
pub const SESSION_PATH: &str = "/cloudapi/1.0.0/sessions/provider";

/// Response header carrying the bearer token after login.
pub const ACCESS_TOKEN_HEADER: &str = "x-vmware-vcloud-access-token";

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// A fully buffered API response.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Turns a non-2xx status into `VcdError::Api`.
    pub fn ensure_success(self, method: &Method, path: &str) -> VcdResult<Self> {
        if self.status.is_success() {
            return Ok(self);
        }
        Err(VcdError::Api {
            method: method.to_string(),
            path: path.to_string(),
            status: self.status,
            body: self.text(),
        })
    }

    fn header_summary(&self) -> String {
        self.headers
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value.to_str().unwrap_or("<binary>")))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Authenticated session against one Cloud Director endpoint.
pub struct VcdClient {
    client: Client,
    endpoint: String,
    accept: String,
    credential: String,
    token: Option<String>,
}

impl VcdClient {
    /// Builds a client for `site` with the default timeout.
    ///
    /// No request is made until `login` is called.
    pub fn new(site: &Site) -> VcdResult<Self> {
        Self::with_timeout(site, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(site: &Site, timeout: Duration) -> VcdResult<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("vcdctl/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(site.accepts_invalid_certs())
            .build()
            .map_err(|e| VcdError::InvalidRequest(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: site.endpoint.trim_end_matches('/').to_string(),
            accept: format!("application/*;version={}", site.api_version()),
            credential: site.credential()?,
            token: None,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Exchanges the site credential for a bearer token.
    ///
    /// The token is read from the `X-VMWARE-VCLOUD-ACCESS-TOKEN` response
    /// header; a response without it is `VcdError::MissingToken`. Any
    /// token already held is dropped first so the session request carries
    /// the credential rather than the old bearer.
    pub async fn login(&mut self) -> VcdResult<()> {
        self.token = None;
        let basic = format!("Basic {}", self.credential);
        let res = self
            .request(Method::POST, SESSION_PATH, &[("Authorization", basic.as_str())], None)
            .await?;

        let token = res
            .headers
            .get(ACCESS_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        match token {
            Some(token) => {
                info!("Logged in to {}", self.endpoint);
                self.token = Some(token);
                Ok(())
            }
            None => Err(VcdError::MissingToken {
                status: res.status,
                headers: res.header_summary(),
                body: res.text(),
            }),
        }
    }

    /// Sends one request to `endpoint + path` and buffers the response.
    ///
    /// `Accept` and (once logged in) `Authorization: Bearer` are set first;
    /// caller headers with the same name are ignored.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        headers: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> VcdResult<Response> {
        let url = format!("{}{}", self.endpoint, path);

        let mut header_map = HeaderMap::new();
        header_map.insert(ACCEPT, header_value(&self.accept)?);
        if let Some(token) = &self.token {
            header_map.insert(AUTHORIZATION, header_value(&format!("Bearer {}", token))?);
        }
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| VcdError::InvalidRequest(format!("header name '{}': {}", name, e)))?;
            if !header_map.contains_key(&name) {
                header_map.insert(name, header_value(value)?);
            }
        }

        debug!("Method: {}", method);
        debug!("Path: {}", path);
        for (name, value) in &header_map {
            if name == AUTHORIZATION {
                debug!("Header: {}: <redacted>", name);
            } else {
                debug!("Header: {}: {}", name, value.to_str().unwrap_or("<binary>"));
            }
        }
        if let Some(body) = &body {
            debug!("Data: {}", String::from_utf8_lossy(body));
        }

        let mut builder = self.client.request(method.clone(), &url).headers(header_map);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let transport = |source| VcdError::Transport {
            method: method.to_string(),
            path: path.to_string(),
            source,
        };
        let res = builder.send().await.map_err(transport)?;
        let status = res.status();
        let headers = res.headers().clone();
        let body = res.bytes().await.map_err(transport)?.to_vec();

        debug!("Status: {} ({} bytes)", status, body.len());
        Ok(Response {
            status,
            headers,
            body,
        })
    }

    /// GET an XML document and decode it into `T`.
    pub async fn get_xml<T: DeserializeOwned>(&self, path: &str, what: &str) -> VcdResult<T> {
        let res = self
            .request(Method::GET, path, &[], None)
            .await?
            .ensure_success(&Method::GET, path)?;
        xml::from_xml(&res.body, what)
    }

    /// GET a JSON document and decode it into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> VcdResult<T> {
        let res = self
            .request(Method::GET, path, &[], None)
            .await?
            .ensure_success(&Method::GET, path)?;
        serde_json::from_slice(&res.body).map_err(|e| VcdError::decode(what, e))
    }

    /// Sends `payload` as JSON.
    pub async fn send_json<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        payload: &B,
    ) -> VcdResult<Response> {
        let body = serde_json::to_vec(payload).map_err(|e| VcdError::decode("request payload", e))?;
        self.request(method.clone(), path, &[("Content-Type", CONTENT_TYPE_JSON)], Some(body))
            .await?
            .ensure_success(&method, path)
    }

    /// Sends `payload` serialized as XML with the given media type.
    pub async fn send_xml<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        content_type: &str,
        payload: &B,
    ) -> VcdResult<Response> {
        let body = xml::to_xml(payload)?;
        self.request(method.clone(), path, &[(CONTENT_TYPE.as_str(), content_type)], Some(body.into_bytes()))
            .await?
            .ensure_success(&method, path)
    }

    /// Sends a request without a body and checks the status.
    pub async fn send_empty(&self, method: Method, path: &str) -> VcdResult<Response> {
        self.request(method.clone(), path, &[], None)
            .await?
            .ensure_success(&method, path)
    }
}

fn header_value(value: &str) -> VcdResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| VcdError::InvalidRequest(format!("header value: {}", e)))
}
