//! In-memory [`CrmApi`] for controller tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use prometheus_client::{CrmApi, Debtor, NewContract, Student};
use prometheus_core::budget::BudgetBalanceQuery;
use prometheus_core::installment::{ActualPayment, PlannedInstallment};
use prometheus_core::tuition::TuitionFeeMap;
use prometheus_shared::types::{ContractId, PageResponse, StudentId};
use prometheus_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use tokio::sync::{Notify, oneshot};

#[derive(Default)]
pub(crate) struct FakeCrm {
    pub planned: HashMap<ContractId, Vec<PlannedInstallment>>,
    pub paid: HashMap<ContractId, Decimal>,
    pub broken_contracts: Vec<ContractId>,
    pub balance: Option<Decimal>,
    pub debtors: Option<PageResponse<Debtor>>,
    pub fees: TuitionFeeMap,
    pub admission_year: Option<i32>,
    pub signed_out: bool,
    /// Contract creations that fail with a duplicate number before one succeeds.
    pub duplicate_failures: u32,

    pub gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub gate_taken: Notify,

    pub balance_calls: AtomicU32,
    pub create_calls: AtomicU32,
    pub comments: Mutex<Vec<(ContractId, String)>>,
    pub created: Mutex<Vec<NewContract>>,
}

pub(crate) fn installment(contract: u64, name: &str, month: u32, amount: Decimal) -> PlannedInstallment {
    PlannedInstallment {
        id: None,
        contract_id: ContractId::new(contract),
        payment_name: name.to_string(),
        payment_date: NaiveDate::from_ymd_opt(2024, month, 1),
        planned_amount: amount,
    }
}

impl FakeCrm {
    /// Makes the next `planned_payments` call wait until the returned sender fires.
    pub fn hold_next_plan(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(rx);
        tx
    }

    fn check_session(&self) -> AppResult<()> {
        if self.signed_out {
            Err(AppError::Unauthorized("authentication token not found".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CrmApi for FakeCrm {
    async fn planned_payments(&self, contract_id: ContractId) -> AppResult<Vec<PlannedInstallment>> {
        self.check_session()?;
        let gate = self.gate.lock().unwrap().take();
        if let Some(rx) = gate {
            self.gate_taken.notify_one();
            let _ = rx.await;
        }
        if self.broken_contracts.contains(&contract_id) {
            return Err(AppError::ExternalService("connection reset".into()));
        }
        Ok(self.planned.get(&contract_id).cloned().unwrap_or_default())
    }

    async fn payment_facts(&self, contract_id: ContractId) -> AppResult<Vec<ActualPayment>> {
        self.check_session()?;
        Ok(self
            .paid
            .get(&contract_id)
            .map(|amount| {
                vec![ActualPayment {
                    id: None,
                    contract_id,
                    amount: *amount,
                    payment_date: None,
                }]
            })
            .unwrap_or_default())
    }

    async fn budget_balance(&self, _query: &BudgetBalanceQuery) -> AppResult<Decimal> {
        self.check_session()?;
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.balance
            .ok_or_else(|| AppError::ExternalService("balance service unavailable".into()))
    }

    async fn tuition_fees(&self) -> AppResult<TuitionFeeMap> {
        self.check_session()?;
        Ok(self.fees.clone())
    }

    async fn student(&self, student_id: StudentId) -> AppResult<Student> {
        self.check_session()?;
        Ok(Student {
            id: student_id,
            admission_year: self.admission_year,
        })
    }

    async fn debtors(&self, _page: u32) -> AppResult<PageResponse<Debtor>> {
        self.check_session()?;
        self.debtors
            .clone()
            .ok_or_else(|| AppError::ExternalService("debtors query failed".into()))
    }

    async fn save_contract_comment(&self, contract_id: ContractId, comment: &str) -> AppResult<()> {
        self.check_session()?;
        self.comments
            .lock()
            .unwrap()
            .push((contract_id, comment.to_string()));
        Ok(())
    }

    async fn create_contract(&self, contract: &NewContract) -> AppResult<()> {
        self.check_session()?;
        let attempt = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.duplicate_failures {
            return Err(AppError::Conflict(
                "duplicate key value violates unique constraint \"contracts_contract_number_key\"".into(),
            ));
        }
        self.created.lock().unwrap().push(contract.clone());
        Ok(())
    }
}
