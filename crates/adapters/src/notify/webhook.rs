// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Webhook notification target.
//!
//! Delivers payloads as JSON over HTTP. `${VAR}` references in the URL and
//! header values resolve from the environment at construction time, so
//! webhook credentials stay out of the deployment file.

use super::{DeliveryError, NotifyTarget};
use async_trait::async_trait;
use cronbell_config::TargetDef;

#[derive(Debug)]
pub struct WebhookTarget {
    name: String,
    url: String,
    method: reqwest::Method,
    headers: Vec<(String, String)>,
    client: reqwest::Client,
}

impl WebhookTarget {
    /// Build a webhook target from its config definition.
    ///
    /// Env references in the URL and headers must resolve; the method, if
    /// present, must parse. Both are startup errors.
    pub fn from_def(def: &TargetDef) -> Result<Self, DeliveryError> {
        let url = resolve_env(&def.url)?;

        let method = match &def.method {
            Some(m) => m
                .to_uppercase()
                .parse::<reqwest::Method>()
                .map_err(|_| DeliveryError::Config(format!("invalid HTTP method: {m}")))?,
            None => reqwest::Method::POST,
        };

        let mut headers = Vec::with_capacity(def.headers.len());
        for (key, value) in &def.headers {
            headers.push((key.clone(), resolve_env(value)?));
        }

        Ok(Self {
            name: def.name.clone(),
            url,
            method,
            headers,
            client: reqwest::Client::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[cfg(test)]
    fn method(&self) -> &reqwest::Method {
        &self.method
    }
}

#[async_trait]
impl NotifyTarget for WebhookTarget {
    async fn deliver(&self, payload: &serde_json::Value) -> Result<(), DeliveryError> {
        let mut request = self
            .client
            .request(self.method.clone(), &self.url)
            .json(payload);
        for (key, value) in &self.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(DeliveryError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(target = %self.name, status = %status, "webhook delivered");
        Ok(())
    }

    fn kind(&self) -> &str {
        "webhook"
    }
}

/// Resolve `${VAR}` references from the environment.
///
/// An unset variable or an unclosed reference is a configuration error.
fn resolve_env(input: &str) -> Result<String, DeliveryError> {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_name = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                var_name.push(c);
            }
            if !closed {
                return Err(DeliveryError::Config(format!(
                    "unclosed env reference in: {input}"
                )));
            }
            let value = std::env::var(&var_name)
                .map_err(|_| DeliveryError::Config(format!("env var not found: {var_name}")))?;
            result.push_str(&value);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
