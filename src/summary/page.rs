//! The summary page: every expense, the totals per category and the grand total.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    clock::Clock,
    endpoints,
    expense::list_expenses,
    html::{
        CATEGORY_BADGE_STYLE, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    summary::{
        aggregation::{Summary, build_summary, monthly_totals},
        charts::{
            ECHARTS_URL, SummaryChart, category_chart, charts_script, charts_view, monthly_chart,
        },
    },
};

/// The number of months shown in the monthly spending chart.
const CHART_MONTHS: u32 = 6;

/// The state needed for the summary page.
#[derive(Debug, Clone)]
pub struct SummaryPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub clock: Arc<dyn Clock>,
}

impl FromRef<AppState> for SummaryPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            clock: state.clock.clone(),
        }
    }
}

/// Render the summary page.
pub async fn get_summary_page(State(state): State<SummaryPageState>) -> Result<Response, Error> {
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

    let all_expenses = expenses
        .iter()
        .map(|row| row.expense.clone())
        .collect::<Vec<_>>();
    let by_month = monthly_totals(&all_expenses, CHART_MONTHS, today)
        .inspect_err(|error| tracing::error!("Could not total expenses by month: {error}"))?;
    let summary = build_summary(expenses)
        .inspect_err(|error| tracing::error!("Could not summarise expenses: {error}"))?;

    let charts = [
        SummaryChart {
            id: "category-chart",
            options: category_chart(&summary.by_category).to_string(),
        },
        SummaryChart {
            id: "monthly-chart",
            options: monthly_chart(&by_month).to_string(),
        },
    ];

    Ok(summary_view(&summary, &charts).into_response())
}

fn summary_view(summary: &Summary, charts: &[SummaryChart]) -> Markup {
    let nav_bar = NavBar::new(endpoints::SUMMARY_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Summary" }

                    p class="text-lg"
                    {
                        "Total spent: "
                        span id="grand-total" class="font-semibold tabular-nums"
                        {
                            (format_currency(summary.total))
                        }
                    }
                }

                @if summary.expenses.is_empty() {
                    p class="text-gray-500 dark:text-gray-400"
                    {
                        "Nothing to summarise yet. "
                        a href=(endpoints::NEW_EXPENSE) class=(LINK_STYLE)
                        {
                            "Record your first expense"
                        }
                    }
                } @else {
                    (charts_view(charts))
                }

                (category_totals_table(summary))

                (expenses_table(summary))
            }
        }
    );

    let head_elements = if summary.expenses.is_empty() {
        Vec::new()
    } else {
        vec![
            HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
            charts_script(charts),
        ]
    };

    base("Summary", &head_elements, &content)
}

fn category_totals_table(summary: &Summary) -> Markup {
    html!(
        section class="dark:bg-gray-800"
        {
            h2 class="text-lg font-semibold mb-2" { "By category" }

            table
                id="category-totals"
                class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Total" }
                    }
                }

                tbody
                {
                    @for category_total in &summary.by_category {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                span class=(CATEGORY_BADGE_STYLE) { (category_total.category) }
                            }
                            td class={ (TABLE_CELL_STYLE) " text-right tabular-nums" }
                            {
                                (format_currency(category_total.total))
                            }
                        }
                    }
                }
            }
        }
    )
}

fn expenses_table(summary: &Summary) -> Markup {
    html!(
        section class="dark:bg-gray-800"
        {
            h2 class="text-lg font-semibold mb-2" { "All expenses" }

            table
                id="summary-expenses"
                class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Amount" }
                    }
                }

                tbody
                {
                    @for row in &summary.expenses {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (row.expense.date) }
                            td class=(TABLE_CELL_STYLE) { (row.expense.description) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                @if let Some(name) = &row.category_name {
                                    (name)
                                } @else {
                                    "Unknown"
                                }
                            }
                            td class={ (TABLE_CELL_STYLE) " text-right tabular-nums" }
                            {
                                (format_currency(row.expense.amount.value()))
                            }
                        }
                    }
                }
            }
        }
    )
}
