//! Contract creation: price lookup, then a POST retried on number collisions.

use prometheus_core::contract::RetryPolicy;
use prometheus_core::tuition::{TuitionResolution, TuitionService};
use prometheus_shared::AppResult;
use prometheus_shared::types::StudentId;

use crate::api::CrmApi;
use crate::models::NewContract;

/// Resolves the tuition price for a student from their admission year and
/// the current price list.
pub async fn compute_tuition_for_student<A>(
    api: &A,
    student_id: StudentId,
) -> AppResult<TuitionResolution>
where
    A: CrmApi + ?Sized,
{
    let (student, fees) = tokio::try_join!(api.student(student_id), api.tuition_fees())?;
    let resolution = TuitionService::resolve(&fees, student.admission_year);

    tracing::debug!(
        %student_id,
        admission_year = ?student.admission_year,
        used_year = ?resolution.used_year,
        amount = %resolution.amount,
        "Resolved tuition"
    );

    Ok(resolution)
}

/// Creates a contract priced by [`compute_tuition_for_student`].
///
/// A zero price is left out of the request so the backend applies its own
/// default. Duplicate contract numbers are retried according to `policy`.
pub async fn create_contract_for_student<A>(
    api: &A,
    student_id: StudentId,
    policy: &RetryPolicy,
) -> AppResult<TuitionResolution>
where
    A: CrmApi + ?Sized,
{
    let tuition = compute_tuition_for_student(api, student_id).await?;

    let contract = NewContract {
        student_id,
        total_amount: Some(tuition.amount).filter(|amount| !amount.is_zero()),
    };

    policy.execute(|| api.create_contract(&contract)).await?;
    tracing::info!(%student_id, amount = %tuition.amount, "Contract created");

    Ok(tuition)
}
