//! Payment reconciliation page: debtor list, per-contract breakdown, comments.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use prometheus_client::{CrmApi, Debtor};
use prometheus_core::installment::{AllocationEngine, AllocationSummary};
use prometheus_shared::types::{ContractId, PageResponse};
use prometheus_shared::{AppError, AppResult};

use crate::views::{DetailsView, render_debtor_rows, render_debtors_error, render_pagination};

/// Longest comment accepted, in characters.
pub const COMMENT_MAX_CHARS: usize = 100;

/// Character counter shown under the comment box, e.g. `42/100`.
#[must_use]
pub fn comment_counter(text: &str) -> String {
    format!("{}/{COMMENT_MAX_CHARS}", text.chars().count())
}

/// Rendered debtor list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebtorList {
    /// Table body.
    pub rows_html: String,
    /// Page links; empty for a single page.
    pub pagination_html: String,
    /// The page that was loaded, `None` when loading failed.
    pub page: Option<PageResponse<Debtor>>,
}

/// Result of expanding a debtor row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsOutcome {
    /// Fragment for the details cell.
    Rendered(String),
    /// The row was collapsed or expanded again while loading; nothing to show.
    Superseded,
}

/// Controller for the reconciliation page.
///
/// Each expansion of a row is stamped with a fresh request token. Only the
/// response carrying the row's latest token is rendered, so a slow answer
/// can never overwrite a newer one.
pub struct ReconciliationPage<A: ?Sized> {
    api: Arc<A>,
    next_token: AtomicU64,
    in_flight: Mutex<HashMap<ContractId, u64>>,
}

impl<A: CrmApi + ?Sized> ReconciliationPage<A> {
    /// Creates the page controller.
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            next_token: AtomicU64::new(0),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Loads and renders one page of debtors.
    ///
    /// Failures render an error row; only a missing session is returned as
    /// an error.
    pub async fn load_debtors(&self, page: u32) -> AppResult<DebtorList> {
        match self.api.debtors(page).await {
            Ok(response) => Ok(DebtorList {
                rows_html: render_debtor_rows(&response.data),
                pagination_html: render_pagination(response.current_page, response.total_pages),
                page: Some(response),
            }),
            Err(e) if e.requires_login() => Err(e),
            Err(e) => {
                tracing::error!(error = %e, code = e.error_code(), page, "Failed to load debtors");
                Ok(DebtorList {
                    rows_html: render_debtors_error(),
                    pagination_html: String::new(),
                    page: None,
                })
            }
        }
    }

    /// Loads the plan and payments of a contract and renders the breakdown.
    pub async fn expand(&self, contract_id: ContractId) -> AppResult<DetailsOutcome> {
        let token = self.begin(contract_id);
        let result = self.summary(contract_id).await;

        if !self.is_current(contract_id, token) {
            tracing::debug!(%contract_id, token, "Discarding superseded details response");
            return Ok(DetailsOutcome::Superseded);
        }

        let view = match result {
            Ok(summary) => DetailsView::from(summary),
            Err(e) if e.requires_login() => return Err(e),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    code = e.error_code(),
                    %contract_id,
                    "Failed to load debt details"
                );
                DetailsView::Failed
            }
        };
        Ok(DetailsOutcome::Rendered(view.render()))
    }

    /// Hides a row's details; any response still in flight is discarded.
    pub fn collapse(&self, contract_id: ContractId) {
        self.requests().remove(&contract_id);
    }

    /// Allocation of a contract's payments over its plan.
    pub async fn summary(&self, contract_id: ContractId) -> AppResult<AllocationSummary> {
        let (planned, facts) = tokio::try_join!(
            self.api.planned_payments(contract_id),
            self.api.payment_facts(contract_id)
        )?;

        let total_paid = AllocationEngine::total_paid(&facts);
        Ok(AllocationEngine::allocate_summary(&planned, total_paid))
    }

    /// Saves the comment on a contract.
    ///
    /// Comments longer than [`COMMENT_MAX_CHARS`] are rejected before any
    /// request is made.
    pub async fn save_comment(&self, contract_id: ContractId, text: &str) -> AppResult<()> {
        let length = text.chars().count();
        if length > COMMENT_MAX_CHARS {
            return Err(AppError::Validation(format!(
                "comment is {length} characters, the limit is {COMMENT_MAX_CHARS}"
            )));
        }

        self.api
            .save_contract_comment(contract_id, text)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    error = %e,
                    code = e.error_code(),
                    %contract_id,
                    "Failed to save comment"
                );
            })?;

        tracing::info!(%contract_id, "Comment saved");
        Ok(())
    }

    fn begin(&self, contract_id: ContractId) -> u64 {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed) + 1;
        self.requests().insert(contract_id, token);
        token
    }

    fn is_current(&self, contract_id: ContractId, token: u64) -> bool {
        self.requests().get(&contract_id) == Some(&token)
    }

    fn requests(&self) -> std::sync::MutexGuard<'_, HashMap<ContractId, u64>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
