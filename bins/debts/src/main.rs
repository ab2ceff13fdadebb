//! Prometheus CRM operator CLI
//!
//! Lists debtors with their per-installment breakdown, checks invoices
//! against the remaining budget and creates contracts from the terminal.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prometheus_client::{CrmApi, HttpCrmApi};
use prometheus_core::installment::AllocationSummary;
use prometheus_shared::types::{ContractId, StudentId, format_date, format_kzt};
use prometheus_shared::{AppConfig, AppError};
use prometheus_web::pages::contracts::{CONTRACT_CREATED_MESSAGE, contract_failed_message};
use prometheus_web::pages::read_form;
use prometheus_web::views::debtors::DEBTORS_EMPTY_MESSAGE;
use prometheus_web::views::details::{NO_PLAN_MESSAGE, OVERPAYMENT_LABEL};
use prometheus_web::{CheckOutcome, ContractsPage, DetailsOutcome, InvoiceFormController, ReconciliationPage};

#[derive(Debug, Parser)]
#[command(name = "prometheus", version, about = "Prometheus CRM payment reconciliation")]
struct Cli {
    /// Print the HTML fragments the web pages show instead of plain text.
    #[arg(long, global = true)]
    html: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List contracts with outstanding debt.
    Debts {
        /// Page number, starting at 1.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show how a contract's payments cover its installments.
    Details {
        /// Contract ID.
        contract_id: ContractId,
    },
    /// Check which attachments an invoice needs.
    BudgetCheck {
        /// Department name.
        #[arg(long, default_value = "")]
        department: String,
        /// Budget item name.
        #[arg(long, default_value = "")]
        budget_item: String,
        /// Register line name.
        #[arg(long, default_value = "")]
        register_item: String,
        /// Invoice amount, e.g. "1 234,50".
        #[arg(long)]
        amount: String,
    },
    /// Create a contract for a student, priced from the tuition list.
    CreateContract {
        /// Student ID.
        student_id: StudentId,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prometheus=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;
    let api = Arc::new(HttpCrmApi::from_config(&config)?);
    info!(base_url = %config.api.base_url, "Using CRM backend");

    if let Err(e) = run(cli, &config, api).await {
        if e.downcast_ref::<AppError>().is_some_and(AppError::requires_login) {
            error!("Not signed in: set api.token or PROMETHEUS_TOKEN");
        }
        return Err(e);
    }

    Ok(())
}

async fn run(cli: Cli, config: &AppConfig, api: Arc<HttpCrmApi>) -> anyhow::Result<()> {
    match cli.command {
        Command::Debts { page } => debts(&api, page, cli.html).await,
        Command::Details { contract_id } => details(api, contract_id, cli.html).await,
        Command::BudgetCheck {
            department,
            budget_item,
            register_item,
            amount,
        } => {
            let controller = InvoiceFormController::new(api, &config.invoices);
            let form = read_form(&department, &budget_item, &register_item, &amount);

            let CheckOutcome::Current(view) = controller.check(&form).await? else {
                return Ok(());
            };
            if cli.html {
                println!("{}", view.render());
            } else {
                println!("Договор: {}", yes_no(view.contract_required));
                println!("Служебная записка: {}", yes_no(view.memo_required()));
                if let Some(warning) = &view.warning {
                    println!("{warning}");
                }
            }
            Ok(())
        }
        Command::CreateContract { student_id } => {
            let page = ContractsPage::new(api, &config.contracts);
            match page.create_contract(student_id).await {
                Ok(tuition) => {
                    println!("{CONTRACT_CREATED_MESSAGE}");
                    let year = tuition
                        .used_year
                        .map_or_else(|| "не определен".to_string(), |y| y.to_string());
                    println!("Сумма: {} (цена {year} года)", format_kzt(tuition.amount));
                    Ok(())
                }
                Err(e) => {
                    eprintln!("{}", contract_failed_message(&e.to_string()));
                    Err(e.into())
                }
            }
        }
    }
}

async fn debts(api: &Arc<HttpCrmApi>, page: u32, html: bool) -> anyhow::Result<()> {
    if html {
        let list = ReconciliationPage::new(Arc::clone(api)).load_debtors(page).await?;
        println!("{}", list.rows_html);
        println!("{}", list.pagination_html);
        return Ok(());
    }

    let response = api.debtors(page).await?;
    if response.data.is_empty() {
        println!("{DEBTORS_EMPTY_MESSAGE}");
        return Ok(());
    }

    for debtor in &response.data {
        println!(
            "{:>6}  {:<16} {:<32} {:<8} {:>22}  {}",
            debtor.contract_id.into_inner(),
            debtor.contract_number,
            debtor.student_full_name,
            debtor.student_class,
            format_kzt(debtor.debt_amount),
            debtor.comment
        );
    }
    println!(
        "Страница {} из {}, всего {}",
        response.current_page, response.total_pages, response.total_rows
    );
    Ok(())
}

async fn details(api: Arc<HttpCrmApi>, contract_id: ContractId, html: bool) -> anyhow::Result<()> {
    let page = ReconciliationPage::new(api);

    if html {
        if let DetailsOutcome::Rendered(fragment) = page.expand(contract_id).await? {
            println!("{fragment}");
        }
        return Ok(());
    }

    let summary = page.summary(contract_id).await?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &AllocationSummary) {
    if summary.is_empty() {
        println!("{NO_PLAN_MESSAGE}");
        return;
    }

    for row in &summary.rows {
        let date = row.payment_date.map(format_date).unwrap_or_default();
        println!(
            "{} {:<24} {:<10} {:>22} {:>22} {:>22}",
            if row.is_paid { "+" } else { " " },
            row.payment_name,
            date,
            format_kzt(row.planned_amount),
            format_kzt(row.paid_amount),
            format_kzt(row.remaining_amount)
        );
    }
    println!("План: {}", format_kzt(summary.total_planned));
    println!("Оплачено: {}", format_kzt(summary.total_paid));
    println!("Остаток: {}", format_kzt(summary.total_outstanding));
    if summary.is_overpaid() {
        println!("{OVERPAYMENT_LABEL}: {}", format_kzt(summary.unallocated_surplus));
    }
}

const fn yes_no(value: bool) -> &'static str {
    if value { "требуется" } else { "не требуется" }
}
