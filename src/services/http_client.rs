use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, warn};

use super::cookies::{CookieSource, read_cookie};
use super::error_handling::StorefrontError;
use crate::domain::response::decode_envelope;

/// One JSON POST to a storefront endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRequest {
    pub path: String,
    pub body: Option<Value>,
    pub csrf_token: Option<String>,
}

/// Transport seam; the browser build uses [`ReqwestClient`].
#[cfg_attr(test, mockall::automock)]
#[async_trait(?Send)]
pub trait HttpClient {
    /// Send the request and return the parsed JSON body, whatever its shape.
    async fn post_json(&self, request: PostRequest) -> Result<Value, StorefrontError>;
}

pub struct ReqwestClient {
    client: reqwest::Client,
    base_url: Url,
    csrf_header: String,
}

impl ReqwestClient {
    pub fn new(base_url: &str, csrf_header: impl Into<String>) -> Result<Self, StorefrontError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StorefrontError::Configuration(format!("invalid base url {base_url}: {e}")))?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            csrf_header: csrf_header.into(),
        })
    }
}

#[async_trait(?Send)]
impl HttpClient for ReqwestClient {
    async fn post_json(&self, request: PostRequest) -> Result<Value, StorefrontError> {
        let url = self
            .base_url
            .join(&request.path)
            .map_err(|e| StorefrontError::Configuration(format!("invalid path {}: {e}", request.path)))?;

        let mut builder = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = &request.csrf_token {
            builder = builder.header(self.csrf_header.as_str(), token.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| StorefrontError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(path = %request.path, status = %status, "Response received");

        response
            .json::<Value>()
            .await
            .map_err(|e| StorefrontError::Decode(format!("{status}: {e}")))
    }
}

/// The shared request path every controller uses: reads the CSRF cookie,
/// posts JSON, unwraps the `{success, error}` envelope.
pub struct ApiClient {
    http: Rc<dyn HttpClient>,
    cookies: Rc<dyn CookieSource>,
    csrf_cookie_name: String,
}

impl ApiClient {
    pub fn new(http: Rc<dyn HttpClient>, cookies: Rc<dyn CookieSource>, csrf_cookie_name: impl Into<String>) -> Self {
        Self {
            http,
            cookies,
            csrf_cookie_name: csrf_cookie_name.into(),
        }
    }

    pub fn read_cookie(&self, name: &str) -> Option<String> {
        self.cookies
            .raw_cookies()
            .and_then(|raw| read_cookie(&raw, name))
    }

    pub fn csrf_token(&self) -> Option<String> {
        let token = self.read_cookie(&self.csrf_cookie_name);
        if token.is_none() {
            warn!(cookie = %self.csrf_cookie_name, "CSRF cookie not set; sending request without token");
        }
        token
    }

    /// POST and return the raw JSON body.
    pub async fn post_json(&self, path: &str, body: Option<Value>) -> Result<Value, StorefrontError> {
        let request = PostRequest {
            path: path.to_string(),
            body,
            csrf_token: self.csrf_token(),
        };
        self.http.post_json(request).await
    }

    /// POST and decode the success payload; declines become
    /// [`StorefrontError::Declined`].
    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: Option<Value>) -> Result<T, StorefrontError> {
        let value = self.post_json(path, body).await?;
        decode_envelope(value)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::domain::response::CartCount;
    use crate::services::cookies::StaticCookies;
    use serde_json::json;

    fn api(mock: MockHttpClient, cookies: Option<&str>) -> ApiClient {
        ApiClient::new(
            Rc::new(mock),
            Rc::new(StaticCookies(cookies.map(str::to_string))),
            "csrftoken",
        )
    }

    #[tokio::test]
    async fn test_attaches_csrf_token_from_cookie() {
        let mut mock = MockHttpClient::new();
        mock.expect_post_json()
            .withf(|req| {
                req.path == "/add-to-cart/3/" && req.csrf_token.as_deref() == Some("abc") && req.body.is_none()
            })
            .times(1)
            .returning(|_| Ok(json!({"success": true, "cart_count": 4})));

        let api = api(mock, Some("sessionid=x; csrftoken=abc"));
        let count: CartCount = api.post("/add-to-cart/3/", None).await.unwrap();
        assert_eq!(count.cart_count, 4);
    }

    #[tokio::test]
    async fn test_sends_without_token_when_cookie_missing() {
        let mut mock = MockHttpClient::new();
        mock.expect_post_json()
            .withf(|req| req.csrf_token.is_none())
            .times(1)
            .returning(|_| Ok(json!({"success": false, "error": "CSRF verification failed"})));

        let api = api(mock, None);
        let err = api.post::<CartCount>("/add-to-cart/3/", None).await.unwrap_err();
        assert_eq!(
            err,
            StorefrontError::Declined {
                message: Some("CSRF verification failed".into())
            }
        );
    }

    #[tokio::test]
    async fn test_transport_errors_pass_through() {
        let mut mock = MockHttpClient::new();
        mock.expect_post_json()
            .returning(|_| Err(StorefrontError::Transport("offline".into())));

        let api = api(mock, Some("csrftoken=abc"));
        let err = api.post::<CartCount>("/add-to-cart/3/", None).await.unwrap_err();
        assert_eq!(err, StorefrontError::Transport("offline".into()));
    }

    #[test]
    fn test_reqwest_client_rejects_bad_base_url() {
        assert!(matches!(
            ReqwestClient::new("not a url", "X-CSRFToken"),
            Err(StorefrontError::Configuration(_))
        ));
        assert!(ReqwestClient::new("https://shop.example", "X-CSRFToken").is_ok());
    }
}
