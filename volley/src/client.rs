//! `reqwest` implementation of [`HttpClient`].
use crate::{Error, HttpClient, HttpResponse, TransportError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use volley_core::{ConfigError, Method, RequestTemplate, RunConfig};

#[derive(Clone, Debug)]
pub struct ReqwestClient {
    client: Client,
    headers: HeaderMap,
    timeout: Duration,
}

impl ReqwestClient {
    /// Builds a client for `config`. Header names and values are checked here, before any
    /// request goes out.
    pub fn new(config: &RunConfig) -> Result<Self, Error> {
        let headers = header_map(&config.request.headers)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            client,
            headers,
            timeout: config.timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

impl HttpClient for ReqwestClient {
    async fn send(&self, request: &RequestTemplate) -> Result<HttpResponse, TransportError> {
        let res = self
            .client
            .request(method(request.method), request.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .headers(self.headers.clone())
            .json(&request.body)
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = res.status().as_u16();
        // The status already arrived, so a body that fails to stream is still a completed exchange.
        let body = res.text().await.unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}

fn method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, ConfigError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let invalid = |reason: String| ConfigError::InvalidHeader {
            name: name.clone(),
            reason,
        };
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
        map.append(header_name, header_value);
    }
    Ok(map)
}
