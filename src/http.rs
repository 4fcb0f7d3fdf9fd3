//! HTTP client wrapper for storage API requests.

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::error::error_from_response;
use crate::error::{DriveError, Result};

/// HTTP client for making requests to the storage server.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create a new HTTP client with a proxy.
    pub fn with_proxy(proxy: &str) -> Result<Self> {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|e| DriveError::Custom(format!("Invalid proxy: {}", e)))?;

        let client = Client::builder()
            .proxy(proxy)
            .build()
            .map_err(|e| DriveError::Custom(format!("Failed to build client: {}", e)))?;

        Ok(Self { client })
    }

    /// Access the underlying reqwest client to build a request.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Send a request and return the raw response if the status is 2xx.
    ///
    /// Non-success statuses are turned into [`DriveError::Api`] or
    /// [`DriveError::Unauthorized`] with the server's message.
    pub async fn send(&self, request: RequestBuilder, token: Option<&str>) -> Result<Response> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "api response");

        if !status.is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response)
    }

    /// Send a request and deserialize the JSON body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: Option<&str>,
    ) -> Result<T> {
        let response = self.send(request, token).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Echo {
        authorization: Option<String>,
    }

    async fn echo(headers: HeaderMap) -> Json<serde_json::Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Json(json!({ "authorization": auth }))
    }

    async fn serve() -> String {
        let app = Router::new()
            .route("/echo", get(echo))
            .route(
                "/missing",
                get(|| async {
                    (StatusCode::NOT_FOUND, Json(json!({ "detail": "File not found" })))
                }),
            )
            .route(
                "/forbidden",
                get(|| async {
                    (StatusCode::FORBIDDEN, Json(json!({ "detail": "Not allowed" })))
                }),
            )
            .route(
                "/html",
                get(|| async { (StatusCode::BAD_GATEWAY, "<html>down</html>").into_response() }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_bearer_only_with_token() {
        let base = serve().await;
        let client = HttpClient::new();

        let echo: Echo = client
            .send_json(client.inner().get(format!("{base}/echo")), Some("t0k"))
            .await
            .unwrap();
        assert_eq!(echo.authorization.as_deref(), Some("Bearer t0k"));

        let echo: Echo = client
            .send_json(client.inner().get(format!("{base}/echo")), None)
            .await
            .unwrap();
        assert_eq!(echo.authorization, None);
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let base = serve().await;
        let client = HttpClient::default();

        let err = client
            .send(client.inner().get(format!("{base}/missing")), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DriveError::Api { status: 404, .. }));
        assert_eq!(err.to_string(), "File not found");

        let err = client
            .send(client.inner().get(format!("{base}/forbidden")), Some("t"))
            .await
            .unwrap_err();
        assert!(err.is_auth_failure());
        assert_eq!(err.status(), Some(403));

        let err = client
            .send(client.inner().get(format!("{base}/html")), None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[tokio::test]
    async fn test_send_json_rejects_unexpected_shape() {
        let base = serve().await;
        let client = HttpClient::new();

        let result: Result<Vec<u32>> = client
            .send_json(client.inner().get(format!("{base}/echo")), None)
            .await;
        assert!(matches!(result, Err(DriveError::JsonError(_))));
    }

    #[test]
    fn test_proxy_url_checked() {
        assert!(HttpClient::with_proxy("http://127.0.0.1:8080").is_ok());
        assert!(HttpClient::with_proxy(":::::::").is_err());
    }
}
