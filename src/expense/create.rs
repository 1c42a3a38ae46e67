//! Expense creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, get_all_categories},
    clock::Clock,
    endpoints,
    expense::{ExpenseFormData, create_expense, form::expense_form_fields},
    html::{BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, base, dollar_input_styles, form_page},
    navigation::NavBar,
};

/// The state needed for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub clock: Arc<dyn Clock>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            clock: state.clock.clone(),
        }
    }
}

/// Render the expense creation page with the date set to today.
pub async fn get_new_expense_page(
    State(state): State<CreateExpenseState>,
) -> Result<Response, Error> {
    let today = state.clock.today()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let values = ExpenseFormData {
        date: today.to_string(),
        ..Default::default()
    };

    let nav_bar = NavBar::new(endpoints::NEW_EXPENSE).into_html();
    let content = form_page(
        nav_bar,
        "New Expense",
        new_expense_form_view(&values, &categories, ""),
    );

    Ok(base("Create Expense", &[dollar_input_styles()], &content).into_response())
}

/// Handle expense creation form submission.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Form(form): Form<ExpenseFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = form
        .to_new_expense()
        .and_then(|new_expense| create_expense(new_expense, &connection));

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

            new_expense_form_view(&form, &categories, &format!("Error: {error}")).into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating an expense: {error}");
            error.into_alert_response()
        }
    }
}

fn new_expense_form_view(
    values: &ExpenseFormData,
    categories: &[Category],
    error_message: &str,
) -> Markup {
    html! {
        form
            hx-post=(endpoints::NEW_EXPENSE)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (expense_form_fields(values, categories))

            @if !error_message.is_empty() {
                p class=(FORM_ERROR_STYLE)
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Expense" }
        }
    }
}

#[cfg(test)]
mod new_expense_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        clock::FixedClock,
        endpoints,
        expense::{create::CreateExpenseState, get_new_expense_page},
        test_utils::{
            assert_content_type, assert_form_input, assert_form_input_with_value,
            assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            get_test_db_connection, must_get_form, parse_html_document,
        },
    };

    #[tokio::test]
    async fn render_page() {
        let state = CreateExpenseState {
            db_connection: Arc::new(Mutex::new(get_test_db_connection())),
            clock: Arc::new(FixedClock(date!(2025 - 09 - 30))),
        };

        let response = get_new_expense_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::NEW_EXPENSE, "hx-post");
        assert_form_input_with_value(&form, "date", "date", "2025-09-30");
        assert_form_input(&form, "description", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_submit_button(&form);

        // The placeholder plus the five default categories.
        let option_count = form.select(&Selector::parse("option").unwrap()).count();
        assert_eq!(option_count, 6);
    }
}

#[cfg(test)]
mod create_expense_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        clock::FixedClock,
        endpoints,
        expense::{
            Amount, ExpenseFormData, count_expenses, create::CreateExpenseState,
            create_expense_endpoint, get_expense,
        },
        test_utils::{
            assert_form_error_message, assert_hx_redirect, assert_valid_html,
            get_test_db_connection, must_get_form, parse_html_fragment,
        },
    };

    fn get_state() -> CreateExpenseState {
        CreateExpenseState {
            db_connection: Arc::new(Mutex::new(get_test_db_connection())),
            clock: Arc::new(FixedClock(date!(2025 - 09 - 30))),
        }
    }

    fn valid_form() -> ExpenseFormData {
        ExpenseFormData {
            date: "2025-09-30".to_owned(),
            description: "Coffee run".to_owned(),
            amount: "4.5".to_owned(),
            category_id: "1".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_create_expense() {
        let state = get_state();

        let response = create_expense_endpoint(State(state.clone()), Form(valid_form())).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::EXPENSES_VIEW);
        let connection = state.db_connection.lock().unwrap();
        let expense = get_expense(1, &connection).expect("Could not get created expense");
        assert_eq!(expense.date, date!(2025 - 09 - 30));
        assert_eq!(expense.description.as_ref(), "Coffee run");
        assert_eq!(expense.amount, Amount::new_unchecked(dec!(4.50)));
        assert_eq!(expense.category_id, 1);
    }

    #[tokio::test]
    async fn zero_amount_is_rejected_without_mutation() {
        let state = get_state();
        let form = ExpenseFormData {
            amount: "0".to_owned(),
            ..valid_form()
        };

        let response = create_expense_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Amount must be greater than zero");
        assert_eq!(count_expenses(&state.db_connection.lock().unwrap()), Ok(0));
    }

    #[tokio::test]
    async fn long_description_is_rejected_without_mutation() {
        let state = get_state();
        let form = ExpenseFormData {
            description: "a".repeat(201),
            ..valid_form()
        };

        let response = create_expense_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(
            &form,
            "Error: Description cannot be longer than 200 characters",
        );
        assert_eq!(count_expenses(&state.db_connection.lock().unwrap()), Ok(0));
    }

    #[tokio::test]
    async fn missing_category_is_rejected_without_mutation() {
        let state = get_state();
        let form = ExpenseFormData {
            category_id: String::new(),
            ..valid_form()
        };

        let response = create_expense_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: A category must be selected");
        assert_eq!(count_expenses(&state.db_connection.lock().unwrap()), Ok(0));
    }

    #[tokio::test]
    async fn unknown_category_is_rejected_without_mutation() {
        let state = get_state();
        let form = ExpenseFormData {
            category_id: "999".to_owned(),
            ..valid_form()
        };

        let response = create_expense_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Could not find a category with the ID 999");
        assert_eq!(count_expenses(&state.db_connection.lock().unwrap()), Ok(0));
    }

    #[tokio::test]
    async fn amount_above_largest_is_rejected_without_mutation() {
        let state = get_state();
        let form = ExpenseFormData {
            amount: "10000000000000000.00".to_owned(),
            ..valid_form()
        };

        let response = create_expense_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Amount cannot be more than 9999999999999999.99");
        assert_eq!(count_expenses(&state.db_connection.lock().unwrap()), Ok(0));
    }

    #[tokio::test]
    async fn non_numeric_category_is_rejected_without_mutation() {
        let state = get_state();
        let form = ExpenseFormData {
            category_id: "food".to_owned(),
            ..valid_form()
        };

        let response = create_expense_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: \"food\" is not a valid category");
        assert_eq!(count_expenses(&state.db_connection.lock().unwrap()), Ok(0));
    }
}
