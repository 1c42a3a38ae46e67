//! JSON endpoints that expose the summary totals.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    clock::Clock,
    expense::list_expenses,
    summary::aggregation::{CategoryTotal, MonthlyTotal, monthly_totals, summarize_by_category},
};

/// The number of months returned when the `months` parameter is omitted.
pub const DEFAULT_MONTHS: u32 = 6;

/// The state needed for the summary JSON endpoints.
#[derive(Debug, Clone)]
pub struct SummaryApiState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub clock: Arc<dyn Clock>,
}

impl FromRef<AppState> for SummaryApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            clock: state.clock.clone(),
        }
    }
}

/// The query parameters for the monthly totals endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct MonthlyTotalsQuery {
    /// How many calendar months to include, counting the current month.
    pub months: Option<u32>,
}

/// The total spent in each category, ordered by category name.
pub async fn get_summary_by_category(
    State(state): State<SummaryApiState>,
) -> Result<Json<Vec<CategoryTotal>>, Error> {
    let expenses = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        list_expenses(None, &connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve expenses: {error}"))?
    };

    let category_totals = summarize_by_category(&expenses)
        .inspect_err(|error| tracing::error!("Could not total expenses by category: {error}"))?;

    Ok(Json(category_totals))
}

/// The total spent in each of the last `months` calendar months, oldest first.
pub async fn get_monthly_totals(
    State(state): State<SummaryApiState>,
    Query(query): Query<MonthlyTotalsQuery>,
) -> Result<Json<Vec<MonthlyTotal>>, Error> {
    let months = query.months.unwrap_or(DEFAULT_MONTHS);
    let today = state.clock.today()?;

    let expenses = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        list_expenses(None, &connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve expenses: {error}"))?
    };

    let expenses = expenses
        .into_iter()
        .map(|row| row.expense)
        .collect::<Vec<_>>();
    let totals = monthly_totals(&expenses, months, today)
        .inspect_err(|error| tracing::error!("Could not total expenses by month: {error}"))?;

    Ok(Json(totals))
}
