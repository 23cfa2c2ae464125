//! HTTP client for the GitHub REST API.

use crate::issues::models::Issue;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

const API_BASE: &str = "https://api.github.com";
// GitHub rejects requests without a User-Agent
const USER_AGENT: &str = "issues-native";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    total_count: i64,
    items: Vec<Issue>,
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl ApiClient {
    pub fn new(auth_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: API_BASE.to_string(),
            auth_token,
        }
    }

    fn get(&self, url: &str) -> reqwest::blocking::RequestBuilder {
        let mut req = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .timeout(Duration::from_secs(15));
        if let Some(ref token) = self.auth_token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Check if the API is reachable
    pub fn health(&self) -> Result<bool, String> {
        match self.get(&self.base_url).send() {
            Ok(resp) => {
                if resp.status().is_success() {
                    Ok(true)
                } else {
                    Err(format!("API returned status: {}", resp.status()))
                }
            }
            Err(e) => Err(format!("Failed to connect to API: {}", e)),
        }
    }

    /// Run one issue search, returning items in the API's result order
    pub fn search_issues(&self, query: &str) -> Result<Vec<Issue>, String> {
        let url = format!(
            "{}/search/issues?q={}&per_page=100",
            self.base_url,
            urlencoding::encode(query)
        );

        let resp = self
            .get(&url)
            .send()
            .map_err(|e| format!("Request failed: {}", e))?;

        if resp.status() == reqwest::StatusCode::FORBIDDEN {
            return Err("API rate limit hit (set an auth token in settings)".to_string());
        }
        if !resp.status().is_success() {
            return Err(format!("API error: {}", resp.status()));
        }

        let search: SearchResponse = resp
            .json()
            .map_err(|e| format!("Failed to parse response: {}", e))?;

        tracing::info!(
            "search '{}' returned {} of {} issues",
            query,
            search.items.len(),
            search.total_count
        );
        Ok(search.items)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(None)
    }
}
