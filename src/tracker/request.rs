use anyhow::anyhow;
use reqwest::{header, Client};
use serde::Serialize;

fn default_header() -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();
    [
        ("Accept", header::HeaderValue::from_static("application/json")),
        ("Connection", header::HeaderValue::from_static("keep-alive")),
    ]
    .into_iter()
    .for_each(|(x, y)| {
        headers.insert(x, y);
    });
    headers
}

/// HTTP client for the persistence service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub client: Client,
    pub base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .default_headers(default_header())
                .build()
                .expect("failed to build http client"),
            base_url: base_url.to_string(),
        }
    }

    pub fn get_url(&self, url: &str) -> String {
        if url.starts_with("http") {
            return url.into();
        }

        let mut res = self.base_url.clone();

        if !res.ends_with('/') {
            res.push('/')
        }

        if let Some(stripped) = url.strip_prefix('/') {
            res.push_str(stripped)
        } else {
            res.push_str(url)
        }
        res
    }

    pub async fn get(&self, url: &str) -> anyhow::Result<reqwest::Response> {
        Ok(self.client.get(self.get_url(url)).send().await?)
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        data: &T,
    ) -> anyhow::Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.get_url(url))
            .json(data)
            .send()
            .await?)
    }

    /// Create-record request; an unreachable service or non-success status is
    /// an error for the caller to log.
    pub async fn create_submission<T: Serialize + ?Sized>(&self, record: &T) -> anyhow::Result<()> {
        let resp = self.post_json("submissions", record).await?;
        if !resp.status().is_success() {
            return Err(anyhow!("create submission rejected: {}", resp.status()));
        }
        Ok(())
    }

    /// The popup's listing fetch. Returned as raw JSON; rendering is not this
    /// crate's concern.
    pub async fn list_submissions(&self, query: &str) -> anyhow::Result<serde_json::Value> {
        let path = if query.is_empty() {
            "submissions".to_string()
        } else {
            format!("submissions?{query}")
        };
        let resp = self.get(&path).await?;
        if !resp.status().is_success() {
            return Err(anyhow!("error loading submissions: {}", resp.status()));
        }
        Ok(resp.json().await?)
    }
}
