//! The seam between page controllers and the CRM backend.

use async_trait::async_trait;
use prometheus_core::budget::BudgetBalanceQuery;
use prometheus_core::installment::{ActualPayment, PlannedInstallment};
use prometheus_core::tuition::TuitionFeeMap;
use prometheus_shared::AppResult;
use prometheus_shared::types::{ContractId, PageResponse, StudentId};
use rust_decimal::Decimal;

use crate::models::{Debtor, NewContract, Student};

/// Operations the reconciliation, invoice and contract pages need.
///
/// Every method returns canonical models; wire-format quirks never leak
/// past an implementation of this trait.
#[async_trait]
pub trait CrmApi: Send + Sync {
    /// All planned installments of a contract.
    async fn planned_payments(&self, contract_id: ContractId) -> AppResult<Vec<PlannedInstallment>>;

    /// All recorded payments of a contract.
    async fn payment_facts(&self, contract_id: ContractId) -> AppResult<Vec<ActualPayment>>;

    /// Remaining balance of a register line.
    async fn budget_balance(&self, query: &BudgetBalanceQuery) -> AppResult<Decimal>;

    /// Tuition prices by year.
    async fn tuition_fees(&self) -> AppResult<TuitionFeeMap>;

    /// A student record.
    async fn student(&self, student_id: StudentId) -> AppResult<Student>;

    /// One page (1-indexed) of the debtor list.
    async fn debtors(&self, page: u32) -> AppResult<PageResponse<Debtor>>;

    /// Replaces the accountant's comment on a contract.
    async fn save_contract_comment(&self, contract_id: ContractId, comment: &str) -> AppResult<()>;

    /// Creates a contract. A duplicate contract number surfaces as an error
    /// whose text names the collision.
    async fn create_contract(&self, contract: &NewContract) -> AppResult<()>;
}
