//! Blocking HTTP client for the lab booking API

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{ApiConfig, ClientError, ClientResult, Session};

/// HTTP client bound to one API root and one session.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: ApiConfig,
    session: Session,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: ApiConfig, session: Session) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Make a GET request with query parameters
    pub fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let request = self.client.get(self.config.url(path)).query(query);
        self.send("GET", path, request)
    }

    /// Make a POST request with JSON body
    pub fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.client.post(self.config.url(path)).json(body);
        self.send("POST", path, request)
    }

    /// Make a PATCH request with JSON body
    pub fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.client.patch(self.config.url(path)).json(body);
        self.send("PATCH", path, request)
    }

    fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        mut request: RequestBuilder,
    ) -> ClientResult<T> {
        if let Some(auth) = self.session.bearer() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        tracing::debug!(method, path, "api request");
        let response = request.send()?;
        self.handle_response(method, path, response)
    }

    /// Handle the HTTP response. A 401 logs the session out.
    fn handle_response<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        response: Response,
    ) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text()?;
            let error = ClientError::from_status(status, &text);
            if matches!(error, ClientError::Unauthorized) {
                self.session.logout();
            }
            tracing::warn!(
                method,
                path,
                status = status.as_u16(),
                error = %error,
                "api request rejected"
            );
            return Err(error);
        }

        let text = response.text()?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(method, path, error = %e, "unreadable api response");
            ClientError::InvalidResponse(e.to_string())
        })
    }
}
