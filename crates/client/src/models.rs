//! Canonical records returned by the client that the core crate has no type for.

use prometheus_shared::types::{ContractId, StudentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the debtor list: a contract whose payments fall short of its
/// discounted amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debtor {
    /// Contract ID.
    pub contract_id: ContractId,
    /// Printed contract number.
    pub contract_number: String,
    /// "Фамилия Имя" of the student.
    pub student_full_name: String,
    /// Grade and letter, e.g. "5 А".
    pub student_class: String,
    /// Discounted contract amount minus all payments.
    pub debt_amount: Decimal,
    /// Accountant's free-text note.
    pub comment: String,
}

/// The part of a student record contract creation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Student ID.
    pub id: StudentId,
    /// Year the student was admitted, if recorded.
    pub admission_year: Option<i32>,
}

/// Body of `POST /api/contracts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContract {
    /// Student the contract is for.
    pub student_id: StudentId,
    /// Contract amount; omitted so the backend can apply its own default.
    /// Sent as a JSON number, the backend does not accept numeric strings.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub total_amount: Option<Decimal>,
}
