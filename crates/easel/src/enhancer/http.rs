// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use async_trait::async_trait;
use easel_contracts::{EnhancementConfig, EnhancementError, EnhancementResult, Route};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::Enhancer;

#[derive(Debug, Clone)]
pub struct HttpEnhancer {
    client: Client,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    backoff: Duration,
}

impl HttpEnhancer {
    pub fn new(config: &EnhancementConfig) -> EnhancementResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                EnhancementError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            timeout: config.timeout(),
            max_retries: config.max_retries,
            backoff: Duration::from_millis(200),
        })
    }

    /// Base delay between attempts; doubled per attempt.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn url(&self, route: Route) -> String {
        format!("{}{}", self.base_url, route.path())
    }

    async fn execute_request_with_retry(
        &self,
        route: Route,
        payload: Value,
    ) -> EnhancementResult<Value> {
        let url = self.url(route);
        let mut last_error = EnhancementError::Network("no request attempted".to_string());

        for attempt in 0..=self.max_retries {
            debug!(
                attempt = attempt + 1,
                max_attempts = self.max_retries + 1,
                route = route.path(),
                "Sending request to enhancement service"
            );

            let response =
                tokio::time::timeout(self.timeout, self.client.post(&url).json(&payload).send())
                    .await;

            let error = match response {
                Ok(Ok(resp)) => {
                    let status = resp.status();
                    if status.is_success() {
                        match resp.json::<Value>().await {
                            Ok(data) => {
                                debug!(route = route.path(), "Enhancement service answered");
                                return Ok(data);
                            }
                            Err(e) => EnhancementError::Serialisation(format!(
                                "Failed to parse JSON response: {e}"
                            )),
                        }
                    } else if status == StatusCode::TOO_MANY_REQUESTS {
                        warn!(route = route.path(), "Rate limited by enhancement service");
                        EnhancementError::RateLimit
                    } else {
                        let body = match resp.text().await {
                            Ok(body) => body,
                            Err(e) => format!("failed to read error body: {e}"),
                        };
                        EnhancementError::Http {
                            status: status.as_u16(),
                            body,
                        }
                    }
                }
                Ok(Err(e)) => EnhancementError::Network(format!("Request failed: {e}")),
                Err(_) => {
                    warn!(
                        timeout_ms = self.timeout.as_millis() as u64,
                        route = route.path(),
                        "Request to enhancement service timed out"
                    );
                    EnhancementError::Timeout
                }
            };

            if !error.is_retryable() {
                return Err(error);
            }
            last_error = error;
            if attempt < self.max_retries {
                let wait_time = self.backoff * 2_u32.pow(attempt.min(4));
                debug!(wait_ms = wait_time.as_millis() as u64, error = %last_error, "Retrying");
                tokio::time::sleep(wait_time).await;
            }
        }

        Err(last_error)
    }
}

#[async_trait]
impl Enhancer for HttpEnhancer {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn health_check(&self) -> EnhancementResult<()> {
        let url = self.url(Route::Health);
        let response = tokio::time::timeout(self.timeout, self.client.get(&url).send())
            .await
            .map_err(|_| EnhancementError::Timeout)?
            .map_err(|e| {
                EnhancementError::Network(format!("Failed to connect to enhancement service: {e}"))
            })?;

        let status = response.status();
        if status.is_success() {
            info!(endpoint = %self.base_url, "Enhancement service reachable");
            Ok(())
        } else {
            Err(EnhancementError::Http {
                status: status.as_u16(),
                body: format!("health check failed: {status}"),
            })
        }
    }

    async fn send(&self, route: Route, payload: Value) -> EnhancementResult<Value> {
        self.execute_request_with_retry(route, payload).await
    }
}
