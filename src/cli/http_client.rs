use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::credentials::Credentials;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl ApiClient {
    pub fn new(creds: &Credentials) -> anyhow::Result<Self> {
        let mut client = Self::anonymous(&creds.server_url)?;
        client.token = Some(creds.token.clone());
        Ok(client)
    }

    /// A client without a session, for signing up and logging in.
    pub fn anonymous(server_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: server_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let resp = self.authorize(self.client.get(self.url(path))).send()?;
        handle_response(resp)
    }

    pub fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        let resp = self
            .authorize(self.client.post(self.url(path)))
            .json(body)
            .send()?;
        handle_response(resp)
    }

    /// POST without a body or response payload.
    pub fn post_empty(&self, path: &str) -> anyhow::Result<()> {
        let resp = self.authorize(self.client.post(self.url(path))).send()?;
        handle_empty_response(resp)
    }

    pub fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        let resp = self
            .authorize(self.client.put(self.url(path)))
            .json(body)
            .send()?;
        handle_response(resp)
    }

    /// PUT without a body.
    pub fn put_empty<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let resp = self.authorize(self.client.put(self.url(path))).send()?;
        handle_response(resp)
    }

    pub fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        let resp = self
            .authorize(self.client.patch(self.url(path)))
            .json(body)
            .send()?;
        handle_response(resp)
    }

    pub fn delete(&self, path: &str) -> anyhow::Result<()> {
        let resp = self.authorize(self.client.delete(self.url(path))).send()?;
        handle_empty_response(resp)
    }

    /// DELETE that returns a payload, such as the like state after unliking.
    pub fn delete_with<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let resp = self.authorize(self.client.delete(self.url(path))).send()?;
        handle_response(resp)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn handle_response<T: DeserializeOwned>(resp: Response) -> anyhow::Result<T> {
    if resp.status().is_success() {
        let api_resp: ApiResponse<T> = resp.json()?;
        api_resp
            .data
            .ok_or_else(|| anyhow::anyhow!("Server returned an empty response"))
    } else {
        Err(error_from_response(resp))
    }
}

fn handle_empty_response(resp: Response) -> anyhow::Result<()> {
    if resp.status().is_success() {
        Ok(())
    } else {
        Err(error_from_response(resp))
    }
}

fn error_from_response(resp: Response) -> anyhow::Error {
    let status = resp.status();
    match resp.json::<ApiResponse<()>>() {
        Ok(ApiResponse {
            error: Some(message),
            ..
        }) => anyhow::anyhow!(message),
        _ => anyhow::anyhow!("Server error ({status})"),
    }
}

/// Builds a query string from the pairs that have a value.
#[must_use]
pub fn query_string(pairs: &[(&str, Option<&str>)]) -> String {
    let parts: Vec<String> = pairs
        .iter()
        .filter_map(|(key, value)| {
            value
                .filter(|v| !v.is_empty())
                .map(|v| format!("{key}={}", urlencoding::encode(v)))
        })
        .collect();

    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}
