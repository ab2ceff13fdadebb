//! Contracts page: creating a contract for a student.

use std::sync::Arc;
use std::time::Duration;

use prometheus_client::{CrmApi, create_contract_for_student};
use prometheus_core::contract::RetryPolicy;
use prometheus_core::tuition::TuitionResolution;
use prometheus_shared::AppResult;
use prometheus_shared::config::ContractsConfig;
use prometheus_shared::types::StudentId;

/// Shown after a contract was created.
pub const CONTRACT_CREATED_MESSAGE: &str = "Договор успешно создан!";

/// Alert text for a failed creation.
#[must_use]
pub fn contract_failed_message(error: &str) -> String {
    format!("Ошибка создания договора: {error}")
}

/// Controller for the contracts page.
pub struct ContractsPage<A: ?Sized> {
    api: Arc<A>,
    retry: RetryPolicy,
}

impl<A: CrmApi + ?Sized> ContractsPage<A> {
    /// Creates the controller with the configured retry budget.
    pub fn new(api: Arc<A>, config: &ContractsConfig) -> Self {
        Self {
            api,
            retry: RetryPolicy::new(
                config.retry_attempts,
                Duration::from_millis(config.retry_backoff_ms),
            ),
        }
    }

    /// Creates a contract priced from the tuition list.
    pub async fn create_contract(&self, student_id: StudentId) -> AppResult<TuitionResolution> {
        create_contract_for_student(self.api.as_ref(), student_id, &self.retry)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    error = %e,
                    code = e.error_code(),
                    %student_id,
                    "Failed to create contract"
                );
            })
    }
}
