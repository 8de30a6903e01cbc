use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::source::{BenchmarkSource, RawAverages, SourceError};

/// Spreadsheet web-app endpoint answering `action=getAverages` lookups.
///
/// The endpoint replies with `{"success": bool, "result": {...}}`; a `false` success flag
/// carries an optional `error` message.
#[derive(Debug, Clone)]
pub struct HttpBenchmarkSource {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct AveragesEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl HttpBenchmarkSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl BenchmarkSource for HttpBenchmarkSource {
    async fn fetch_averages(
        &self,
        sector: &str,
        size_bucket: &str,
    ) -> Result<RawAverages, SourceError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("action", "getAverages"),
                ("sector", sector),
                ("tamano", size_bucket),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Transport(format!("unexpected status {status}")));
        }

        let body = response.text().await?;
        parse_averages(&body)
    }
}

/// Decodes an averages envelope. Non-numeric entries are treated as absent.
pub fn parse_averages(body: &str) -> Result<RawAverages, SourceError> {
    let envelope: AveragesEnvelope =
        serde_json::from_str(body).map_err(|err| SourceError::Malformed(err.to_string()))?;

    if !envelope.success {
        return Err(SourceError::Rejected(
            envelope
                .error
                .unwrap_or_else(|| "success flag not set".to_string()),
        ));
    }

    match envelope.result {
        Some(Value::Object(fields)) => Ok(fields
            .into_iter()
            .filter_map(|(metric, value)| numeric_value(&value).map(|number| (metric, number)))
            .collect()),
        Some(other) => Err(SourceError::Malformed(format!(
            "result must be an object, got {other}"
        ))),
        None => Err(SourceError::Malformed("result missing".to_string())),
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}
