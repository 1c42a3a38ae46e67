//! Expense Tracker is a web app for recording personal expenses against
//! categories and reviewing where the money went.
//!
//! This library provides a REST API that directly serves HTML pages, plus two
//! JSON endpoints with the category and monthly spending totals.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod category;
mod clock;
mod database_id;
mod db;
mod endpoints;
mod expense;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod summary;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use category::{Category, CategoryId, CategoryName, create_category, get_all_categories};
pub use clock::{Clock, FixedClock, LocalClock};
pub use db::{DEFAULT_CATEGORIES, initialize as initialize_db};
pub use expense::{
    Amount, Description, Expense, ExpenseId, NewExpense, count_expenses, create_expense,
};
pub use logging::{add_tracing_layer, logging_middleware, setup_logging};
pub use routing::build_router;
pub use timezone::get_local_offset;

use crate::{
    alert::Alert, internal_server_error::InternalServerError, not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// The category name has more characters than allowed.
    #[error("Category name cannot be longer than {0} characters")]
    CategoryNameTooLong(usize),

    /// An empty string was used to describe an expense.
    #[error("Description cannot be empty")]
    EmptyDescription,

    /// The expense description has more characters than allowed.
    #[error("Description cannot be longer than {0} characters")]
    DescriptionTooLong(usize),

    /// The amount could not be parsed as a decimal number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// Expenses must have an amount greater than zero.
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    /// Amounts are recorded in whole cents.
    #[error("Amount cannot have more than two decimal places")]
    TooManyDecimalPlaces,

    /// Amounts are recorded with at most 16 digits before the decimal point.
    #[error("Amount cannot be more than {0}")]
    AmountTooLarge(rust_decimal::Decimal),

    /// The date could not be parsed as a `YYYY-MM-DD` calendar date.
    #[error("\"{0}\" is not a valid date")]
    InvalidDate(String),

    /// No category was selected for an expense.
    #[error("A category must be selected")]
    MissingCategory,

    /// The submitted category was not a category ID.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategoryId(String),

    /// The category ID used for an expense did not match a category.
    #[error("Could not find a category with the ID {0}")]
    InvalidCategory(category::CategoryId),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The ID in the request path does not match the ID in the submitted form.
    #[error("the path ID {path} does not match the form ID {form}")]
    IdMismatch {
        /// The ID taken from the URL path.
        path: database_id::DatabaseId,
        /// The ID taken from the submitted form.
        form: database_id::DatabaseId,
    },

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to update an expense that does not exist, e.g. it was deleted
    /// after the edit page was loaded.
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete a category that expenses still refer to.
    #[error("the category is used by {0} expense(s)")]
    CategoryInUse(u32),

    /// A spending total is larger than the biggest representable decimal.
    #[error("a spending total is too large to calculate")]
    TotalOverflow,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// Whether the error was caused by malformed or out-of-range user input.
    ///
    /// Validation errors are shown next to the form that caused them rather
    /// than as an error page.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::EmptyCategoryName
                | Error::CategoryNameTooLong(_)
                | Error::EmptyDescription
                | Error::DescriptionTooLong(_)
                | Error::InvalidAmount(_)
                | Error::NonPositiveAmount
                | Error::TooManyDecimalPlaces
                | Error::AmountTooLarge(_)
                | Error::InvalidDate(_)
                | Error::MissingCategory
                | Error::InvalidCategoryId(_)
                | Error::InvalidCategory(_)
        )
    }

    /// Whether the error means the requested record does not exist.
    ///
    /// An update that finds its record gone (e.g., deleted by another request
    /// in the meantime) is reported the same way as a plain lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound
                | Error::IdMismatch { .. }
                | Error::UpdateMissingCategory
                | Error::UpdateMissingExpense
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            error if error.is_not_found() => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::IdMismatch { .. } => (
                StatusCode::NOT_FOUND,
                Alert::new(
                    "Could not save changes",
                    "The form does not match the item it was submitted for. \
                    Reload the page and try again.",
                ),
            ),
            Error::UpdateMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::new(
                    "Could not update expense",
                    "The expense could not be found. \
                    It may have been deleted since the page was loaded.",
                ),
            ),
            Error::UpdateMissingCategory => (
                StatusCode::NOT_FOUND,
                Alert::new(
                    "Could not update category",
                    "The category could not be found.",
                ),
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::new("Not found", "The requested item could not be found."),
            ),
            Error::CategoryInUse(expense_count) => (
                StatusCode::CONFLICT,
                Alert::new(
                    "Could not delete category",
                    &format!(
                        "The category is used by {expense_count} expense(s). \
                        Move or delete those expenses first."
                    ),
                ),
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::new(
                    "Invalid Timezone Settings",
                    &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                        ensure the timezone has been set to valid, canonical timezone string"
                    ),
                ),
            ),
            error if error.is_validation() => (
                StatusCode::BAD_REQUEST,
                Alert::new("Invalid input", &error.to_string()),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::new(
                        "Something went wrong",
                        "An unexpected error occurred, check the server logs for more details.",
                    ),
                )
            }
        };

        (status_code, alert).into_response()
    }
}
