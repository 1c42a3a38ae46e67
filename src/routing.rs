//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::{
    AppState,
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_page,
        get_delete_category_page, get_edit_category_page, get_new_category_page,
        update_category_endpoint, update_category_with_path_endpoint,
    },
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_delete_expense_page,
        get_edit_expense_page, get_expenses_page, get_new_expense_page, update_expense_endpoint,
        update_expense_with_path_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    summary::{get_monthly_totals, get_summary_by_category, get_summary_page},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let category_routes = Router::new()
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(
            endpoints::NEW_CATEGORY,
            get(get_new_category_page).post(create_category_endpoint),
        )
        .route(endpoints::EDIT_CATEGORY, post(update_category_endpoint))
        .route(
            endpoints::EDIT_CATEGORY_VIEW,
            get(get_edit_category_page).post(update_category_with_path_endpoint),
        )
        .route(
            endpoints::DELETE_CATEGORY,
            get(get_delete_category_page).post(delete_category_endpoint),
        );

    let expense_routes = Router::new()
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(
            endpoints::NEW_EXPENSE,
            get(get_new_expense_page).post(create_expense_endpoint),
        )
        .route(endpoints::EDIT_EXPENSE, post(update_expense_endpoint))
        .route(
            endpoints::EDIT_EXPENSE_VIEW,
            get(get_edit_expense_page).post(update_expense_with_path_endpoint),
        )
        .route(
            endpoints::DELETE_EXPENSE,
            get(get_delete_expense_page).post(delete_expense_endpoint),
        );

    let summary_routes = Router::new()
        .route(endpoints::SUMMARY_VIEW, get(get_summary_page))
        .route(
            endpoints::SUMMARY_BY_CATEGORY_API,
            get(get_summary_by_category),
        )
        .route(endpoints::MONTHLY_TOTALS_API, get(get_monthly_totals));

    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .merge(category_routes)
        .merge(expense_routes)
        .merge(summary_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the expenses page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::EXPENSES_VIEW)
}
