//! Expense deletion page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    expense::{ExpenseId, ExpenseWithCategory, delete_expense, get_expense_with_category},
    html::{BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, base, form_page, format_currency, link},
    navigation::NavBar,
};

/// The state needed for deleting an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page asking the user to confirm deleting an expense.
///
/// Responds with the 404 page if the expense does not exist.
pub async fn get_delete_expense_page(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<DeleteExpenseState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_expense_with_category(expense_id, &connection)?;

    let nav_bar = NavBar::new(endpoints::DELETE_EXPENSE).into_html();
    let content = form_page(nav_bar, "Delete Expense", delete_expense_form_view(&expense));

    Ok(base("Delete Expense", &[], &content).into_response())
}

/// Handle expense deletion, redirecting to the expenses page.
///
/// Deleting an expense that does not exist is treated as a success.
pub async fn delete_expense_endpoint(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<DeleteExpenseState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_expense(expense_id, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting expense {expense_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn delete_expense_form_view(expense_with_category: &ExpenseWithCategory) -> Markup {
    let expense = &expense_with_category.expense;
    let delete_endpoint = endpoints::format_endpoint(endpoints::DELETE_EXPENSE, expense.id);

    html! {
        form
            hx-post=(delete_endpoint)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            p { "Are you sure you want to delete this expense?" }

            dl class="grid grid-cols-2 gap-2 text-sm"
            {
                dt class="font-medium" { "Date" }
                dd { (expense.date) }

                dt class="font-medium" { "Description" }
                dd { (expense.description) }

                dt class="font-medium" { "Amount" }
                dd { (format_currency(expense.amount.value())) }

                dt class="font-medium" { "Category" }
                dd
                {
                    @match &expense_with_category.category_name {
                        Some(name) => {
                            span class=(CATEGORY_BADGE_STYLE) { (name) }
                        }
                        None => { "Unknown" }
                    }
                }
            }

            button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }

            (link(endpoints::EXPENSES_VIEW, "Back to expenses"))
        }
    }
}

#[cfg(test)]
mod delete_expense_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error, endpoints,
        expense::{
            Amount, Description, NewExpense, count_expenses, create_expense,
            delete::DeleteExpenseState, delete_expense_endpoint, get_delete_expense_page,
            get_expense,
        },
        test_utils::{
            assert_hx_endpoint, assert_hx_redirect, assert_valid_html, get_test_db_connection,
            must_get_form, parse_html_document,
        },
    };

    fn get_state() -> DeleteExpenseState {
        DeleteExpenseState {
            db_connection: Arc::new(Mutex::new(get_test_db_connection())),
        }
    }

    fn create_test_expense(state: &DeleteExpenseState) -> i64 {
        create_expense(
            NewExpense {
                date: date!(2025 - 09 - 30),
                description: Description::new_unchecked("Bus fare"),
                amount: Amount::new_unchecked(dec!(3.20)),
                category_id: 2,
            },
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test expense")
        .id
    }

    #[tokio::test]
    async fn confirm_page_posts_to_delete_endpoint() {
        let state = get_state();
        let expense_id = create_test_expense(&state);

        let response = get_delete_expense_page(Path(expense_id), State(state))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::DELETE_EXPENSE, expense_id),
            "hx-post",
        );
    }

    #[tokio::test]
    async fn confirm_page_for_missing_expense_is_404() {
        let response = get_delete_expense_page(Path(42), State(get_state()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_removes_expense_and_redirects() {
        let state = get_state();
        let expense_id = create_test_expense(&state);

        let response = delete_expense_endpoint(Path(expense_id), State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::EXPENSES_VIEW);
        assert_eq!(
            get_expense(expense_id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn deleting_missing_expense_is_idempotent() {
        let state = get_state();
        create_test_expense(&state);

        let response = delete_expense_endpoint(Path(999), State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(count_expenses(&state.db_connection.lock().unwrap()), Ok(1));
    }
}
