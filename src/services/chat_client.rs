use reqwest::Client;
use serde_json::{json, Value};

use crate::error::AppError;

/// Thin forwarder for the dashboard's single remote chat call. The remote
/// protocol is not this service's concern: the reply JSON passes through
/// unchanged.
pub struct ChatClient {
    client: Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    pub async fn send(&self, message: &str) -> Result<Value, AppError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "message": message }))
            .send()
            .await
            .map_err(|e| AppError::ChatError(format!("Failed to reach chat endpoint: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ChatError(format!(
                "Chat endpoint returned status: {}",
                response.status()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::ChatError(format!("Failed to decode chat response: {}", e)))
    }
}
