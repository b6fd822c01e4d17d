// API client module: a small blocking HTTP client that talks to the
// MakeCloud backend. Two calls, no retries, no caching: fetch the
// follow-up questions for a resource type, and submit the collected
// answers to generate a Terraform script.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// What can go wrong talking to the backend. Both kinds are surfaced as
/// a transcript line; neither ends the session.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure or a non-2xx response.
    #[error("request failed: {0}")]
    Network(String),
    /// The response body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Body of the script-generation request. Field names mirror what the
/// backend expects.
#[derive(Serialize, Debug)]
struct GenerateRequest<'a> {
    resource_type: &'a str,
    questions: &'a [String],
    answers: &'a [String],
}

/// Blocking client holding the backend base URL. Cheap to clone; carries
/// no session state.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create an ApiClient configured from the environment variable
    /// `MAKECLOUD_API_URL`, falling back to the backend's default local
    /// address.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("MAKECLOUD_API_URL").unwrap_or_else(|_| "http://localhost:5000".into());
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetch the follow-up questions for a resource type. The backend
    /// answers with a JSON array of question strings.
    pub fn fetch_questions(&self, resource_type: &str) -> Result<Vec<String>, GatewayError> {
        let url = format!("{}/get_info", self.base_url);
        debug!(resource_type, "fetching questions");
        let res = self
            .client
            .get(&url)
            .query(&[("resource_type", resource_type)])
            .send()
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            return Err(GatewayError::Network(format!("{status} - {txt}")));
        }
        let questions: Vec<String> = res.json().map_err(|e| GatewayError::Decode(e.to_string()))?;
        debug!(count = questions.len(), "questions fetched");
        Ok(questions)
    }

    /// Submit the resource type, questions and answers and get back the
    /// generation result. The result shape is backend-defined, so it is
    /// returned as an opaque JSON value for the UI to render.
    pub fn generate_script(
        &self,
        resource_type: &str,
        questions: &[String],
        answers: &[String],
    ) -> Result<serde_json::Value, GatewayError> {
        let url = format!("{}/generate_script", self.base_url);
        debug!(resource_type, answers = answers.len(), "requesting script generation");
        let res = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                resource_type,
                questions,
                answers,
            })
            .send()
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            return Err(GatewayError::Network(format!("{status} - {txt}")));
        }
        res.json().map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn fetch_questions_encodes_query_and_parses_array() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/get_info")
                .query_param("resource_type", "S3 bucket");
            then.status(200)
                .json_body(json!(["Region?", "Public access?"]));
        });

        let api = ApiClient::new(server.base_url()).unwrap();
        let questions = api.fetch_questions("S3 bucket").unwrap();
        mock.assert();
        assert_eq!(questions, vec!["Region?", "Public access?"]);
    }

    #[test]
    fn fetch_questions_maps_server_error_to_network() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/get_info");
            then.status(500).body("boom");
        });

        let api = ApiClient::new(server.base_url()).unwrap();
        let err = api.fetch_questions("S3 bucket").unwrap_err();
        assert!(matches!(err, GatewayError::Network(_)), "got {err:?}");
    }

    #[test]
    fn fetch_questions_maps_wrong_shape_to_decode() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/get_info");
            then.status(200).json_body(json!({"error": "not a list"}));
        });

        let api = ApiClient::new(server.base_url()).unwrap();
        let err = api.fetch_questions("S3 bucket").unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)), "got {err:?}");
    }

    #[test]
    fn generate_script_posts_the_full_payload() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/generate_script").json_body(json!({
                "resource_type": "S3 bucket",
                "questions": ["Region?"],
                "answers": ["us-east-1"],
            }));
            then.status(200)
                .json_body(json!({"script": "provider \"aws\" {}"}));
        });

        let api = ApiClient::new(server.base_url()).unwrap();
        let value = api
            .generate_script(
                "S3 bucket",
                &["Region?".to_string()],
                &["us-east-1".to_string()],
            )
            .unwrap();
        mock.assert();
        assert_eq!(value["script"], "provider \"aws\" {}");
    }

    #[test]
    fn generate_script_maps_server_error_to_network() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/generate_script");
            then.status(400).body("Missing required field: answers");
        });

        let api = ApiClient::new(server.base_url()).unwrap();
        let err = api.generate_script("S3 bucket", &[], &[]).unwrap_err();
        assert!(matches!(err, GatewayError::Network(_)), "got {err:?}");
    }
}
