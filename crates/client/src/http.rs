//! `reqwest` implementation of [`CrmApi`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use prometheus_core::budget::BudgetBalanceQuery;
use prometheus_core::installment::{ActualPayment, PlannedInstallment};
use prometheus_core::tuition::TuitionFeeMap;
use prometheus_shared::types::{ContractId, PageResponse, StudentId};
use prometheus_shared::{AppConfig, AppError, AppResult};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Value, json};

use crate::api::CrmApi;
use crate::models::{Debtor, NewContract, Student};
use crate::token::{StaticToken, TokenStore};
use crate::wire;

/// HTTP client for the CRM backend.
///
/// Every call is authenticated with the token current at call time. GET
/// requests carry a `_` timestamp so intermediaries never serve a stale
/// balance or payment list.
#[derive(Clone)]
pub struct HttpCrmApi {
    base_url: String,
    client: reqwest::Client,
    tokens: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for HttpCrmApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCrmApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpCrmApi {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a client for `base_url` with the default timeout.
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> AppResult<Self> {
        Self::with_timeout(base_url, tokens, Self::DEFAULT_TIMEOUT)
    }

    /// Creates a client with an explicit request timeout.
    pub fn with_timeout(
        base_url: &str,
        tokens: Arc<dyn TokenStore>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            tokens,
        })
    }

    /// Creates a client from application configuration, using the
    /// configured (or `PROMETHEUS_TOKEN`) bearer token.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        Self::with_timeout(
            &config.api.base_url,
            Arc::new(StaticToken::new(config.token())),
            Duration::from_secs(config.api.timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn bearer(&self) -> AppResult<String> {
        self.tokens.token().ok_or_else(|| {
            tracing::error!("Authentication token not found, login required");
            AppError::Unauthorized("authentication token not found".to_string())
        })
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> AppResult<Value> {
        let token = self.bearer()?;
        tracing::debug!(path, "GET");

        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .query(query)
            .query(&[("_", cache_buster())])
            .send()
            .await
            .map_err(|e| transport_error(path, &e))?;

        read_json(path, response).await
    }

    async fn post_json<B>(&self, path: &str, body: &B) -> AppResult<Value>
    where
        B: Serialize + Sync + ?Sized,
    {
        let token = self.bearer()?;
        tracing::debug!(path, "POST");

        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(path, &e))?;

        read_json(path, response).await
    }
}

fn cache_buster() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

fn transport_error(path: &str, e: &reqwest::Error) -> AppError {
    tracing::error!(error = %e, path, "Request to CRM backend failed");
    AppError::ExternalService(format!("request to {path} failed: {e}"))
}

async fn read_json(path: &str, response: reqwest::Response) -> AppResult<Value> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(path, &e))?;

    if !status.is_success() {
        let mut message = wire::error_message(&body);
        if message.is_empty() {
            message = status.to_string();
        }
        tracing::warn!(status = status.as_u16(), path, %message, "CRM backend returned an error");
        return Err(AppError::from_status(status.as_u16(), message));
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(error = %e, path, "CRM backend returned invalid JSON");
        AppError::ExternalService(format!("invalid JSON from {path}: {e}"))
    })
}

#[async_trait]
impl CrmApi for HttpCrmApi {
    async fn planned_payments(&self, contract_id: ContractId) -> AppResult<Vec<PlannedInstallment>> {
        let body = self
            .get_json(
                "/api/planned-payments/",
                &[("contract_id", contract_id.to_string()), ("all", "true".to_string())],
            )
            .await?;
        Ok(wire::planned_payments(&body, contract_id))
    }

    async fn payment_facts(&self, contract_id: ContractId) -> AppResult<Vec<ActualPayment>> {
        let body = self
            .get_json(
                "/api/payment-facts",
                &[("contract_id", contract_id.to_string()), ("all", "true".to_string())],
            )
            .await?;
        Ok(wire::payment_facts(&body, contract_id))
    }

    async fn budget_balance(&self, query: &BudgetBalanceQuery) -> AppResult<Decimal> {
        let body = self
            .get_json(
                "/api/budget/balance",
                &[
                    ("department", query.department.clone()),
                    ("budgetItem", query.budget_item.clone()),
                    ("registerItem", query.register_item.clone()),
                ],
            )
            .await?;
        wire::register_balance(&body)
    }

    async fn tuition_fees(&self) -> AppResult<TuitionFeeMap> {
        let body = self.get_json("/api/tuition-fees", &[]).await?;
        Ok(wire::tuition_fees(&body))
    }

    async fn student(&self, student_id: StudentId) -> AppResult<Student> {
        let body = self
            .get_json(&format!("/api/students/{student_id}"), &[])
            .await?;
        Ok(wire::student(&body, student_id))
    }

    async fn debtors(&self, page: u32) -> AppResult<PageResponse<Debtor>> {
        let body = self
            .get_json(
                "/api/payment-reconciliation/debtors",
                &[("page", page.max(1).to_string())],
            )
            .await?;
        Ok(wire::debtors(&body))
    }

    async fn save_contract_comment(&self, contract_id: ContractId, comment: &str) -> AppResult<()> {
        self.post_json(
            &format!("/api/contracts/{contract_id}/comment"),
            &json!({ "comment": comment }),
        )
        .await?;
        Ok(())
    }

    async fn create_contract(&self, contract: &NewContract) -> AppResult<()> {
        self.post_json("/api/contracts", contract).await?;
        Ok(())
    }
}
