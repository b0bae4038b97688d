// Remote history client
//
// Talks to the calculation history REST service:
//
//   POST   {api}/calc/calcular/                 save a calculation
//   GET    {api}/calc/historico/                list (paginated or bare list)
//   DELETE {api}/calc/operacao/{id}/deletar/    delete one entry
//   DELETE {api}/calc/limpar_historico/         delete everything
//   POST   {api}/auth/token/refresh/            exchange refresh → access token
//
// Every request carries the bearer access token. A 401 triggers one token
// refresh and a single retry; if that also fails the session has expired.

use super::HistoryEntry;
use crate::calculator::{format_number, BinaryOp, Evaluation};
use crate::config::RemoteConfig;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryError {
    /// No API URL or no access token
    NotConfigured,
    /// 401 persisted after a token refresh (or no refresh token to try)
    SessionExpired,
    /// Non-success status from the service
    Api { status: u16, message: String },
    /// Transport failure
    Network(String),
    /// Response body did not have the expected shape
    Decode(String),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "Remote history not configured"),
            Self::SessionExpired => write!(f, "Session expired, please log in again"),
            Self::Api { status, message } => write!(f, "API error ({}): {}", status, message),
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Decode(msg) => write!(f, "Unexpected response: {}", msg),
        }
    }
}

impl std::error::Error for HistoryError {}

impl From<reqwest::Error> for HistoryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Wire types
// ═══════════════════════════════════════════════════════════════════════════

/// One operation as the service returns it
#[derive(Debug, Deserialize)]
struct RemoteOperation {
    id: i64,
    /// Operands joined with `", "`
    #[serde(default)]
    parametros_display: String,
    #[serde(default)]
    resultado_serializado: Option<Numeric>,
    #[serde(default)]
    data_criacao: Option<String>,
    #[serde(default)]
    simbolo_operacao: Option<String>,
    #[serde(default)]
    tipo_operacao: Option<String>,
}

/// Decimal fields arrive as numbers or strings depending on server settings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn value(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HistoryPage {
    Paginated { results: Vec<RemoteOperation> },
    List(Vec<RemoteOperation>),
}

impl HistoryPage {
    fn into_operations(self) -> Vec<RemoteOperation> {
        match self {
            Self::Paginated { results } => results,
            Self::List(items) => items,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SaveResponse {
    operacao: Option<RemoteOperation>,
}

#[derive(Debug, Deserialize)]
struct ClearResponse {
    #[serde(default)]
    count: usize,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
}

impl RemoteOperation {
    /// Convert to a history entry with an `"A op B"` expression
    fn into_entry(self) -> HistoryEntry {
        let symbol = self
            .simbolo_operacao
            .as_deref()
            .and_then(BinaryOp::from_symbol)
            .or_else(|| {
                self.tipo_operacao
                    .as_deref()
                    .and_then(BinaryOp::from_remote_kind)
            })
            .map(|op| op.symbol().to_string())
            .unwrap_or_else(|| self.simbolo_operacao.clone().unwrap_or_default());

        let operands: Vec<String> = self
            .parametros_display
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| match p.parse::<f64>() {
                Ok(v) => format_number(v),
                Err(_) => p.to_string(),
            })
            .collect();

        HistoryEntry {
            id: Some(self.id),
            expression: operands.join(&format!(" {} ", symbol)),
            result: self
                .resultado_serializado
                .as_ref()
                .and_then(Numeric::value)
                .unwrap_or(f64::NAN),
            timestamp: self
                .data_criacao
                .as_deref()
                .and_then(parse_timestamp)
                .unwrap_or_else(Utc::now),
        }
    }
}

/// RFC 3339, or a naive timestamp taken as UTC
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

// ═══════════════════════════════════════════════════════════════════════════
// Client
// ═══════════════════════════════════════════════════════════════════════════

pub struct RemoteHistory {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl RemoteHistory {
    pub fn new(config: &RemoteConfig) -> Result<Self, HistoryError> {
        if config.api_url.trim().is_empty() {
            return Err(HistoryError::NotConfigured);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HistoryError::Network(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Remote history client initialized: {} (authenticated: {})",
            config.api_url,
            config.access_token.is_some()
        );

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            refresh_token: config.refresh_token.clone(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// True if the service can store this evaluation
    ///
    /// It rejects modulo with a 400, and JSON cannot carry non-finite operands.
    pub fn accepts(evaluation: &Evaluation) -> bool {
        evaluation.op.is_remote_supported()
            && evaluation.lhs.is_finite()
            && evaluation.rhs.is_finite()
    }

    /// Persist one evaluation; returns the stored entry when the service echoes it
    pub async fn save(
        &mut self,
        evaluation: &Evaluation,
    ) -> Result<Option<HistoryEntry>, HistoryError> {
        let body = serde_json::json!({
            "numeros": [evaluation.lhs, evaluation.rhs],
            "tipo_operacao": evaluation.op.remote_kind(),
            "resultado": evaluation.result,
        });
        let response = self
            .send(Method::POST, "calc/calcular/", Some(&body))
            .await?;
        let saved: SaveResponse = response.json().await?;
        Ok(saved.operacao.map(RemoteOperation::into_entry))
    }

    pub async fn fetch(&mut self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let response = self.send(Method::GET, "calc/historico/", None).await?;
        let page: HistoryPage = response.json().await?;
        Ok(page
            .into_operations()
            .into_iter()
            .map(RemoteOperation::into_entry)
            .collect())
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), HistoryError> {
        let path = format!("calc/operacao/{}/deletar/", id);
        self.send(Method::DELETE, &path, None).await?;
        Ok(())
    }

    /// Delete every entry; returns the count the service reports
    pub async fn clear(&mut self) -> Result<usize, HistoryError> {
        let response = self
            .send(Method::DELETE, "calc/limpar_historico/", None)
            .await?;
        let cleared: ClearResponse = response.json().await?;
        Ok(cleared.count)
    }

    /// Send an authenticated request, refreshing the token once on 401
    async fn send(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, HistoryError> {
        if self.access_token.is_none() {
            return Err(HistoryError::NotConfigured);
        }

        let mut response = self.dispatch(method.clone(), path, body).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!("Access token rejected for {} {}, refreshing", method, path);
            self.refresh().await?;
            response = self.dispatch(method, path, body).await?;
            if response.status() == StatusCode::UNAUTHORIZED {
                return Err(HistoryError::SessionExpired);
            }
        }

        check_status(response).await
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, HistoryError> {
        let mut req = self.client.request(method, self.url(path));
        if let Some(token) = &self.access_token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        Ok(req.send().await?)
    }

    async fn refresh(&mut self) -> Result<(), HistoryError> {
        let Some(refresh) = self.refresh_token.clone() else {
            return Err(HistoryError::SessionExpired);
        };

        let response = self
            .client
            .post(self.url("auth/token/refresh/"))
            .json(&serde_json::json!({ "refresh": refresh }))
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!("Token refresh failed: {}", response.status());
            self.access_token = None;
            return Err(HistoryError::SessionExpired);
        }

        let refreshed: RefreshResponse = response.json().await?;
        self.access_token = Some(refreshed.access);
        tracing::info!("Access token refreshed");
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, HistoryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(HistoryError::Api {
        status: status.as_u16(),
        message,
    })
}
