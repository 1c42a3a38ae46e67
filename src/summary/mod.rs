//! Spending summaries: totals per category, totals per month and the summary page.

mod aggregation;
mod api;
mod charts;
mod page;

pub use api::{get_monthly_totals, get_summary_by_category};
pub use page::get_summary_page;
