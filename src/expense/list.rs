//! Expenses listing page with a description search.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    expense::{ExpenseWithCategory, list_expenses},
    html::{
        BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
};

/// The state needed for the expenses listing page.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for the expenses listing page.
#[derive(Debug, Default, Deserialize)]
pub struct ExpensesQuery {
    /// Only show expenses whose description contains this text.
    pub search: Option<String>,
}

/// Render the expenses, newest first, optionally filtered by description.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    Query(query): Query<ExpensesQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let search = query.search.as_deref().unwrap_or_default();
    let expenses = list_expenses(Some(search), &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve expenses: {error}"))?;

    Ok(expenses_view(&expenses, search).into_response())
}

fn expenses_view(expenses: &[ExpenseWithCategory], search: &str) -> Markup {
    let new_expense_route = endpoints::NEW_EXPENSE;
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();

    let table_row = |row: &ExpenseWithCategory| {
        let expense = &row.expense;
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_EXPENSE_VIEW, expense.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_EXPENSE, expense.id);

        html!(
            tr class=(TABLE_ROW_STYLE) data-expense-row="true"
            {
                td class=(TABLE_CELL_STYLE) { (expense.date) }

                td class=(TABLE_CELL_STYLE) { (expense.description) }

                td class={ (TABLE_CELL_STYLE) " text-right tabular-nums" }
                {
                    (format_currency(expense.amount.value()))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    @match &row.category_name {
                        Some(name) => {
                            span class=(CATEGORY_BADGE_STYLE) { (name) }
                        }
                        None => {
                            span class="text-gray-500 dark:text-gray-400" { "Unknown" }
                        }
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (edit_delete_action_links(&edit_url, &delete_url))
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Expenses" }

                    a href=(new_expense_route) class=(LINK_STYLE)
                    {
                        "Create Expense"
                    }
                }

                form
                    method="get"
                    action=(endpoints::EXPENSES_VIEW)
                    class="flex gap-2 items-center"
                {
                    input
                        type="search"
                        name="search"
                        value=(search)
                        placeholder="Search descriptions"
                        class=(FORM_TEXT_INPUT_STYLE);

                    button type="submit" class={ (BUTTON_PRIMARY_STYLE) " max-w-32" } { "Search" }
                }

                section class="overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in expenses {
                                (table_row(row))
                            }

                            @if expenses.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        @if search.trim().is_empty() {
                                            "No expenses recorded yet. "
                                            a href=(new_expense_route) class=(LINK_STYLE)
                                            {
                                                "Record your first expense"
                                            }
                                        } @else {
                                            "No expenses match \"" (search) "\"."
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Expenses", &[], &content)
}
