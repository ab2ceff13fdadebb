//! Wire formats of the CRM backend and their conversion to canonical models.
//!
//! This is the only place that knows the backend's spelling quirks: `ID` vs
//! `id`, `Amount` vs `amount`, numbers sent as strings, several shapes of
//! the tuition price list. Malformed amounts become zero here so nothing
//! downstream ever sees a half-parsed record.

use prometheus_core::installment::{ActualPayment, PlannedInstallment};
use prometheus_core::tuition::TuitionFeeMap;
use prometheus_shared::types::{
    ContractId, PageResponse, PaymentFactId, PlannedPaymentId, StudentId, parse_amount,
    parse_api_date, try_parse_amount,
};
use prometheus_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{Debtor, Student};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PlannedPaymentWire {
    #[serde(alias = "ID")]
    id: Value,
    #[serde(alias = "ContractID")]
    contract_id: Value,
    payment_name: Value,
    payment_date: Value,
    planned_amount: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PaymentFactWire {
    #[serde(alias = "ID")]
    id: Value,
    #[serde(alias = "ContractID")]
    contract_id: Value,
    #[serde(alias = "Amount")]
    amount: Value,
    #[serde(alias = "PaymentDate")]
    payment_date: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DebtorWire {
    contract_id: Value,
    contract_number: Value,
    student_full_name: Value,
    student_class: Value,
    debt_amount: Value,
    comment: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StudentWire {
    #[serde(alias = "ID")]
    id: Value,
    admission_year: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PageWire {
    data: Value,
    current_page: Value,
    total_pages: Value,
    total_rows: Value,
}

/// Planned installments from a `{ data: [...] }` envelope.
///
/// Items without a contract ID are attributed to `contract_id`, the
/// contract that was asked for.
#[must_use]
pub fn planned_payments(body: &Value, contract_id: ContractId) -> Vec<PlannedInstallment> {
    items::<PlannedPaymentWire>(body, "planned payment")
        .map(|wire| PlannedInstallment {
            id: id_of(&wire.id).map(PlannedPaymentId::new),
            contract_id: id_of(&wire.contract_id).map_or(contract_id, ContractId::new),
            payment_name: text_of(&wire.payment_name),
            payment_date: wire.payment_date.as_str().and_then(parse_api_date),
            planned_amount: parse_amount(&wire.planned_amount),
        })
        .collect()
}

/// Recorded payments from a `{ data: [...] }` envelope.
#[must_use]
pub fn payment_facts(body: &Value, contract_id: ContractId) -> Vec<ActualPayment> {
    items::<PaymentFactWire>(body, "payment fact")
        .map(|wire| ActualPayment {
            id: id_of(&wire.id).map(PaymentFactId::new),
            contract_id: id_of(&wire.contract_id).map_or(contract_id, ContractId::new),
            amount: parse_amount(&wire.amount),
            payment_date: wire.payment_date.as_str().and_then(parse_api_date),
        })
        .collect()
}

/// Remaining register-line balance from `{ registerBalance }`.
///
/// A missing balance is an error rather than zero so the caller's gate
/// fails closed instead of comparing against a made-up number.
pub fn register_balance(body: &Value) -> AppResult<Decimal> {
    match body.get("registerBalance") {
        None | Some(Value::Null) => Err(AppError::ExternalService(
            "balance response has no registerBalance".to_string(),
        )),
        Some(value) => Ok(parse_amount(value)),
    }
}

/// Tuition prices from any of the shapes the endpoint has used.
///
/// * `{ "byYear": { "2023": 3429500 } }`
/// * `{ "prices": [{ "year": 2023, "amount": 3429500 }] }`
/// * `[{ "Year": 2023, "Price": 3429500 }]`
///
/// Shapes are read in that order and later entries override earlier ones.
/// Entries whose year or amount does not parse are skipped.
#[must_use]
pub fn tuition_fees(body: &Value) -> TuitionFeeMap {
    let mut fees = TuitionFeeMap::new();

    if let Some(by_year) = body.get("byYear").and_then(Value::as_object) {
        for (year, price) in by_year {
            if let (Ok(year), Some(price)) = (year.trim().parse::<i32>(), try_parse_amount(price)) {
                fees.insert(year, price);
            }
        }
    }

    let listed = body
        .get("prices")
        .and_then(Value::as_array)
        .into_iter()
        .chain(body.as_array())
        .flatten();

    for entry in listed {
        let year = first_present(entry, &["year", "Year"]).and_then(year_of);
        let price = first_present(entry, &["amount", "price", "Amount", "Price"])
            .and_then(try_parse_amount);
        if let (Some(year), Some(price)) = (year, price) {
            fees.insert(year, price);
        }
    }

    fees
}

/// Student record, keeping only what contract creation needs.
#[must_use]
pub fn student(body: &Value, student_id: StudentId) -> Student {
    let wire: StudentWire = serde_json::from_value(body.clone()).unwrap_or_default();
    Student {
        id: id_of(&wire.id).map_or(student_id, StudentId::new),
        admission_year: year_of(&wire.admission_year),
    }
}

/// A page of debtors. Rows without a contract ID cannot be expanded and are
/// dropped.
#[must_use]
pub fn debtors(body: &Value) -> PageResponse<Debtor> {
    let page: PageWire = serde_json::from_value(body.clone()).unwrap_or_default();

    let rows = items::<DebtorWire>(body, "debtor")
        .filter_map(|wire| {
            let Some(contract_id) = id_of(&wire.contract_id) else {
                tracing::warn!("Skipping debtor row without contractId");
                return None;
            };
            Some(Debtor {
                contract_id: ContractId::new(contract_id),
                contract_number: text_of(&wire.contract_number),
                student_full_name: text_of(&wire.student_full_name).trim().to_string(),
                student_class: text_of(&wire.student_class).trim().to_string(),
                debt_amount: parse_amount(&wire.debt_amount),
                comment: text_of(&wire.comment),
            })
        })
        .collect();

    let current_page = count_of(&page.current_page).unwrap_or(1).max(1);
    let total_pages = count_of(&page.total_pages).unwrap_or(0);
    let total_rows = id_of(&page.total_rows).unwrap_or(0);

    PageResponse::new(rows, current_page, total_pages, total_rows)
}

/// Error text from a failed response: `error`, then `message`, else the raw body.
#[must_use]
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            first_present(&v, &["error", "message"])
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

fn items<'a, T: DeserializeOwned + 'a>(body: &'a Value, what: &'static str) -> impl Iterator<Item = T> + 'a {
    body.get("data")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(move |item| match serde_json::from_value::<T>(item.clone()) {
            Ok(wire) => Some(wire),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed {what} record");
                None
            }
        })
}

fn first_present<'a>(item: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| item.get(*name))
        .find(|v| !v.is_null())
}

fn id_of(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn count_of(value: &Value) -> Option<u32> {
    id_of(value).and_then(|n| u32::try_from(n).ok())
}

fn year_of(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}
