//! Debtor list table and its pagination.

use std::fmt::Write as _;

use prometheus_client::Debtor;
use prometheus_shared::types::format_kzt;

use crate::html::{escape, message_row};

/// Shown when the list is empty.
pub const DEBTORS_EMPTY_MESSAGE: &str = "Должники не найдены.";
/// Shown when the list could not be loaded.
pub const DEBTORS_ERROR_MESSAGE: &str = "Не удалось загрузить список должников.";
/// Placeholder inside a collapsed details row.
pub const DETAILS_LOADING_MESSAGE: &str = "Загрузка деталей...";

/// Columns of the debtor table, including the details toggle and actions.
pub const DEBTOR_COLUMNS: usize = 7;

/// Renders the `<tbody>` content for one page of debtors.
///
/// Every debtor row is followed by a hidden details row that
/// [`DetailsView`](super::DetailsView) fills on expansion.
#[must_use]
pub fn render_debtor_rows(debtors: &[Debtor]) -> String {
    if debtors.is_empty() {
        return message_row(DEBTOR_COLUMNS, DEBTORS_EMPTY_MESSAGE, None);
    }

    let mut html = String::new();
    for debtor in debtors {
        let _ = write!(
            html,
            concat!(
                r#"<tr class="debtor-row" data-contract-id="{id}">"#,
                r#"<td class="details-col"><button class="details-toggle-btn"><i class="bi bi-plus-circle"></i></button></td>"#,
                r##"<td data-label="Действия"><a href="#" class="add-comment-btn">Добавить комментарий</a></td>"##,
                r#"<td data-label="Номер договора">{number}</td>"#,
                r#"<td data-label="Фамилия ребенка">{name}</td>"#,
                r#"<td data-label="Класс или группа">{class}</td>"#,
                r#"<td data-label="Разница" class="debt-amount">{debt}</td>"#,
                r#"<td data-label="Комментарий" class="comment-cell">{comment}</td>"#,
                "</tr>",
                r#"<tr class="details-row" style="display: none;"><td colspan="{colspan}">"#,
                r#"<div class="details-content"><p>{loading}</p></div></td></tr>"#,
            ),
            id = debtor.contract_id,
            number = escape(&debtor.contract_number),
            name = escape(&debtor.student_full_name),
            class = escape(&debtor.student_class),
            debt = escape(&format_kzt(debtor.debt_amount)),
            comment = escape(&debtor.comment),
            colspan = DEBTOR_COLUMNS,
            loading = DETAILS_LOADING_MESSAGE,
        );
    }
    html
}

/// The table body shown when loading failed.
#[must_use]
pub fn render_debtors_error() -> String {
    message_row(DEBTOR_COLUMNS, DEBTORS_ERROR_MESSAGE, Some("text-danger"))
}

/// Page links: "Назад", one link per page, "Вперед".
///
/// Nothing is rendered for a single page.
#[must_use]
pub fn render_pagination(current_page: u32, total_pages: u32) -> String {
    if total_pages <= 1 {
        return String::new();
    }

    let mut html = String::from(r#"<nav><ul class="pagination">"#);
    page_item(
        &mut html,
        current_page.saturating_sub(1),
        "Назад",
        if current_page <= 1 { "disabled" } else { "" },
    );
    for page in 1..=total_pages {
        page_item(
            &mut html,
            page,
            &page.to_string(),
            if page == current_page { "active" } else { "" },
        );
    }
    page_item(
        &mut html,
        current_page.saturating_add(1),
        "Вперед",
        if current_page >= total_pages { "disabled" } else { "" },
    );
    html.push_str("</ul></nav>");
    html
}

fn page_item(html: &mut String, page: u32, label: &str, state: &str) {
    let class = if state.is_empty() {
        "page-item".to_string()
    } else {
        format!("page-item {state}")
    };
    let _ = write!(
        html,
        r##"<li class="{class}"><a class="page-link" href="#" data-page="{page}">{label}</a></li>"##
    );
}
