//! HTTP client abstraction for making requests to the diary backend

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, RequestBuilder, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Response envelope used by the auth and user endpoints.
///
/// The backend answers application failures with HTTP 200 and a non-200
/// `status` here, so the envelope status has to be checked separately.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: i32,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Status code of a successful envelope
    pub const OK: i32 = 200;

    pub fn is_success(&self) -> bool {
        self.status == Self::OK
    }

    /// The payload of a successful envelope, if any.
    pub fn into_result(self) -> Result<Option<T>> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(Error::api(
                self.status,
                self.message.unwrap_or_else(|| "request failed".to_string()),
            ))
        }
    }

    /// The payload of a successful envelope, failing when it is missing.
    pub fn require_data(self) -> Result<T> {
        let message = self.message.clone();
        self.into_result()?.ok_or_else(|| {
            Error::general(format!(
                "response carried no data ({})",
                message.as_deref().unwrap_or("no message")
            ))
        })
    }
}

/// Helper for building and executing HTTP requests
///
/// The builder keeps its body, so the same request can be sent again after
/// [`FetchBuilder::set_bearer`] replaced the token.
#[derive(Debug, Clone)]
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    timeout: Option<Duration>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: &str, method: Method) -> Self {
        Self {
            client,
            url: url.to_string(),
            method,
            headers: HeaderMap::new(),
            query_params: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    /// Add bearer token authentication to the request
    pub fn bearer_auth(mut self, token: &str) -> Self {
        self.set_bearer(token);
        self
    }

    /// Replace the bearer token in place
    pub fn set_bearer(&mut self, token: &str) {
        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => log::warn!("access token is not a valid header value"),
        }
    }

    /// Add a query parameter to the request
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Set a per-request timeout
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let json = serde_json::to_vec(body)?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Some(json);
        Ok(self)
    }

    /// Add a plain-text body to the request
    pub fn text(mut self, body: &str) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        self.body = Some(body.as_bytes().to_vec());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Build the request
    fn build(&self) -> Result<RequestBuilder> {
        let mut url = Url::parse(&self.url)?;

        if !self.query_params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                query_pairs.append_pair(key, value);
            }
        }

        let mut req = self
            .client
            .request(self.method.clone(), url.as_str())
            .headers(self.headers.clone());

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        if let Some(body) = &self.body {
            req = req.body(body.clone());
        }

        Ok(req)
    }

    /// Execute the request and return the raw response
    pub async fn execute_raw(&self) -> Result<Response> {
        log::debug!("{} {}", self.method, self.url);
        let req = self.build()?;
        let response = req.send().await?;
        log::debug!("{} {} -> {}", self.method, self.url, response.status());
        Ok(response)
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<T> {
        let response = self.execute_raw().await?;
        parse_json(response).await
    }

    /// Execute the request and check the response envelope
    pub async fn execute_envelope<T: DeserializeOwned>(&self) -> Result<ApiEnvelope<T>> {
        let envelope: ApiEnvelope<T> = self.execute().await?;
        if !envelope.is_success() {
            log::warn!(
                "{} {} answered with envelope status {}",
                self.method,
                self.url,
                envelope.status
            );
        }
        Ok(envelope)
    }
}

/// Helper for creating HTTP requests
pub struct Fetch;

impl Fetch {
    /// Create a GET request
    pub fn get<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::GET)
    }

    /// Create a POST request
    pub fn post<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::POST)
    }

    /// Create a PUT request
    pub fn put<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::PUT)
    }

    /// Create a DELETE request
    pub fn delete<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::DELETE)
    }
}

/// Turns a non-success response into [`Error::Api`], passing others through.
pub async fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_from_response(response).await)
    }
}

/// Decodes a successful response body as JSON.
pub async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Builds an API error from a failed response, preferring the envelope
/// message when the body carries one.
pub async fn error_from_response(response: Response) -> Error {
    let status = response.status();
    let text = match response.text().await {
        Ok(text) => text,
        Err(err) => return Error::Http(err),
    };
    Error::api(i32::from(status.as_u16()), failure_message(status, &text))
}

fn failure_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct Failure {
        message: Option<String>,
        error: Option<String>,
    }

    match serde_json::from_str::<Failure>(body) {
        Ok(Failure {
            message: Some(message),
            ..
        }) => message,
        Ok(Failure {
            error: Some(error), ..
        }) => error,
        _ if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success() {
        let envelope: ApiEnvelope<u32> =
            serde_json::from_str(r#"{"status":200,"message":"ok","data":7}"#).unwrap();
        assert_eq!(envelope.require_data().unwrap(), 7);
    }

    #[test]
    fn test_envelope_application_error() {
        let envelope: ApiEnvelope<u32> =
            serde_json::from_str(r#"{"status":999,"message":"이미 존재하는 이메일입니다.","data":null}"#)
                .unwrap();
        match envelope.into_result() {
            Err(Error::Api { status, message }) => {
                assert_eq!(status, 999);
                assert_eq!(message, "이미 존재하는 이메일입니다.");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_envelope_without_data() {
        let envelope: ApiEnvelope<u32> =
            serde_json::from_str(r#"{"status":200,"message":"로그아웃 성공"}"#).unwrap();
        assert!(envelope.clone().into_result().unwrap().is_none());
        assert!(matches!(envelope.require_data(), Err(Error::General(_))));
    }

    #[test]
    fn test_envelope_payload_needs_no_default() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Token {
            token: String,
        }

        fn decode<T: DeserializeOwned>(body: &str) -> ApiEnvelope<T> {
            serde_json::from_str(body).unwrap()
        }

        let envelope: ApiEnvelope<Token> = decode(r#"{"status":200,"data":{"token":"t"}}"#);
        assert_eq!(
            envelope.require_data().unwrap(),
            Token {
                token: "t".to_string()
            }
        );
        let missing: ApiEnvelope<Token> = decode(r#"{"status":200}"#);
        assert!(missing.data.is_none());
    }

    #[test]
    fn test_failure_message() {
        assert_eq!(
            failure_message(StatusCode::BAD_REQUEST, r#"{"status":400,"message":"bad email"}"#),
            "bad email"
        );
        assert_eq!(
            failure_message(StatusCode::UNAUTHORIZED, ""),
            "Unauthorized"
        );
        assert_eq!(failure_message(StatusCode::FORBIDDEN, "nope\n"), "nope");
    }

    #[test]
    fn test_query_pairs_are_kept_in_order() {
        let client = Client::new();
        let builder = Fetch::get(&client, "http://localhost/api")
            .query("userId", 3)
            .query("yearMonth", "202403");
        let request = builder.build().unwrap().build().unwrap();
        assert_eq!(request.url().query(), Some("userId=3&yearMonth=202403"));
    }

    #[test]
    fn test_set_bearer_replaces_token() {
        let client = Client::new();
        let mut builder = Fetch::get(&client, "http://localhost/api").bearer_auth("old");
        builder.set_bearer("new");
        let request = builder.build().unwrap().build().unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "Bearer new"
        );
    }
}
