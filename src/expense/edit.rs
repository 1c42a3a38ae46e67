//! Expense editing page and endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, get_all_categories},
    endpoints,
    expense::{
        EditExpenseFormData, ExpenseFormData, ExpenseId, form::expense_form_fields, get_expense,
        update_expense,
    },
    html::{BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, base, dollar_input_styles, form_page},
    navigation::NavBar,
};

/// The state needed for editing an expense.
#[derive(Debug, Clone)]
pub struct EditExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the expense editing page.
///
/// Responds with the 404 page if the expense does not exist.
pub async fn get_edit_expense_page(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<EditExpenseState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_expense(expense_id, &connection)?;
    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let values = ExpenseFormData {
        date: expense.date.to_string(),
        description: expense.description.to_string(),
        amount: expense.amount.to_string(),
        category_id: expense.category_id.to_string(),
    };

    let nav_bar = NavBar::new(endpoints::EDIT_EXPENSE_VIEW).into_html();
    let content = form_page(
        nav_bar,
        "Edit Expense",
        edit_expense_form_view(expense_id, &values, &categories, ""),
    );

    Ok(base("Edit Expense", &[dollar_input_styles()], &content).into_response())
}

/// Handle an expense update where the expense ID is taken from the form.
pub async fn update_expense_endpoint(
    State(state): State<EditExpenseState>,
    Form(form): Form<EditExpenseFormData>,
) -> Response {
    let (expense_id, fields) = match form.into_parts() {
        Ok(parts) => parts,
        Err(error) => return error.into_alert_response(),
    };

    update_expense_from_form(expense_id, &fields, &state)
}

/// Handle an expense update where the expense ID is in both the path and the form.
///
/// If the two IDs differ, nothing is changed and the response is a 404 alert.
pub async fn update_expense_with_path_endpoint(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<EditExpenseState>,
    Form(form): Form<EditExpenseFormData>,
) -> Response {
    let (form_id, fields) = match form.into_parts() {
        Ok(parts) => parts,
        Err(error) => return error.into_alert_response(),
    };

    if expense_id != form_id {
        tracing::warn!("Rejected edit of expense {expense_id} with form for expense {form_id}");
        return Error::IdMismatch {
            path: expense_id,
            form: form_id,
        }
        .into_alert_response();
    }

    update_expense_from_form(expense_id, &fields, &state)
}

fn update_expense_from_form(
    expense_id: ExpenseId,
    fields: &ExpenseFormData,
    state: &EditExpenseState,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = fields
        .to_new_expense()
        .and_then(|new_expense| update_expense(expense_id, new_expense, &connection));

    match result {
        Ok(_) => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) if error.is_validation() => {
            let categories = match get_all_categories(&connection) {
                Ok(categories) => categories,
                Err(error) => return error.into_alert_response(),
            };

            edit_expense_form_view(expense_id, fields, &categories, &format!("Error: {error}"))
                .into_response()
        }
        Err(Error::UpdateMissingExpense) => Error::UpdateMissingExpense.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating expense {expense_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_expense_form_view(
    expense_id: ExpenseId,
    values: &ExpenseFormData,
    categories: &[Category],
    error_message: &str,
) -> Markup {
    let update_endpoint = endpoints::format_endpoint(endpoints::EDIT_EXPENSE_VIEW, expense_id);

    html! {
        form
            hx-post=(update_endpoint)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            input type="hidden" name="id" value=(expense_id);

            (expense_form_fields(values, categories))

            @if !error_message.is_empty() {
                p class=(FORM_ERROR_STYLE)
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Expense" }
        }
    }
}
