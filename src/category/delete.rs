//! Category deletion page and endpoint.

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
    AppState, Error,
    category::{
        Category, CategoryId, count_expenses_per_category, db::delete_category, get_category,
    },
    endpoints,
    html::{BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, FORM_ERROR_STYLE, base, form_page, link},
    navigation::NavBar,
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page asking the user to confirm deleting a category.
///
/// Responds with the 404 page if the category does not exist.
pub async fn get_delete_category_page(
    Path(category_id): Path<CategoryId>,
    State(state): State<DeleteCategoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = get_category(category_id, &connection)?;
    let expense_count = count_expenses_per_category(&connection)
        .inspect_err(|error| tracing::error!("Could not count expenses per category: {error}"))?
        .get(&category_id)
        .copied()
        .unwrap_or(0);

    let nav_bar = NavBar::new(endpoints::DELETE_CATEGORY).into_html();
    let content = form_page(
        nav_bar,
        "Delete Category",
        delete_category_form_view(&category, expense_count),
    );

    Ok(base("Delete Category", &[], &content).into_response())
}

/// Handle category deletion, redirecting to the categories page.
///
/// Deleting a category that does not exist is treated as a success.
/// Categories that are used by expenses are not deleted and a 409 alert is
/// returned instead.
pub async fn delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<DeleteCategoryState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_category(category_id, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::CategoryInUse(expense_count)) => {
            Error::CategoryInUse(expense_count).into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting category {category_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn delete_category_form_view(category: &Category, expense_count: u32) -> Markup {
    let delete_endpoint = endpoints::format_endpoint(endpoints::DELETE_CATEGORY, category.id);

    html! {
        form
            hx-post=(delete_endpoint)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            p
            {
                "Are you sure you want to delete "
                span class=(CATEGORY_BADGE_STYLE) { (category.name) }
                "?"
            }

            @if expense_count > 0 {
                p class=(FORM_ERROR_STYLE)
                {
                    "This category is used by " (expense_count) " expense(s) and cannot be \
                    deleted until they are moved to another category or deleted."
                }
            }

            button
                type="submit"
                class=(BUTTON_DELETE_STYLE)
                disabled[expense_count > 0]
            {
                "Delete"
            }

            (link(endpoints::CATEGORIES_VIEW, "Back to categories"))
        }
    }
}

#[cfg(test)]
mod delete_category_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rust_decimal_macros::dec;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        Error,
        category::{
            CategoryName, count_categories, create_category, delete::DeleteCategoryState,
            delete_category_endpoint, get_category, get_delete_category_page,
        },
        endpoints,
        expense::{Amount, Description, NewExpense, create_expense},
        test_utils::{
            assert_content_type, assert_hx_endpoint, assert_hx_redirect, assert_valid_html,
            get_test_db_connection, must_get_form, parse_html_document, parse_html_fragment,
        },
    };

    fn get_state() -> DeleteCategoryState {
        DeleteCategoryState {
            db_connection: Arc::new(Mutex::new(get_test_db_connection())),
        }
    }

    fn create_unused_category(state: &DeleteCategoryState) -> i64 {
        create_category(
            CategoryName::new_unchecked("Unused"),
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test category")
        .id
    }

    fn create_used_category(state: &DeleteCategoryState) -> i64 {
        let connection = state.db_connection.lock().unwrap();
        let category = create_category(CategoryName::new_unchecked("Used"), &connection)
            .expect("Could not create test category");
        create_expense(
            NewExpense {
                date: date!(2025 - 09 - 30),
                description: Description::new_unchecked("Lunch"),
                amount: Amount::new_unchecked(dec!(10)),
                category_id: category.id,
            },
            &connection,
        )
        .expect("Could not create test expense");

        category.id
    }

    #[tokio::test]
    async fn confirm_page_posts_to_delete_endpoint() {
        let state = get_state();
        let category_id = create_unused_category(&state);

        let response = get_delete_category_page(Path(category_id), State(state))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::DELETE_CATEGORY, category_id),
            "hx-post",
        );
    }

    #[tokio::test]
    async fn confirm_page_disables_delete_for_used_category() {
        let state = get_state();
        let category_id = create_used_category(&state);

        let response = get_delete_category_page(Path(category_id), State(state))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let button = html
            .select(&Selector::parse("button[type=submit]").unwrap())
            .next()
            .expect("No submit button found");
        assert!(button.value().attr("disabled").is_some());
    }

    #[tokio::test]
    async fn confirm_page_for_missing_category_is_404() {
        let response = get_delete_category_page(Path(999), State(get_state()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_removes_category_and_redirects() {
        let state = get_state();
        let category_id = create_unused_category(&state);

        let response = delete_category_endpoint(Path(category_id), State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CATEGORIES_VIEW);
        assert_eq!(
            get_category(category_id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn deleting_missing_category_is_idempotent() {
        let state = get_state();

        let response = delete_category_endpoint(Path(999), State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(count_categories(&state.db_connection.lock().unwrap()), Ok(5));
    }

    #[tokio::test]
    async fn deleting_used_category_is_a_conflict() {
        let state = get_state();
        let category_id = create_used_category(&state);

        let response = delete_category_endpoint(Path(category_id), State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert!(
            get_category(category_id, &state.db_connection.lock().unwrap()).is_ok(),
            "category in use should not be deleted"
        );
    }
}
