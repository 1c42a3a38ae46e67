//! Pure functions that total expenses by category and by month.
//!
//! These functions take everything they need as arguments, including the
//! current date, so they can be tested without a database or a clock.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use time::{Date, Month};

use crate::{
    Error,
    expense::{Expense, ExpenseWithCategory},
};

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category name.
    pub category: String,
    /// The sum of the category's expenses.
    pub total: Decimal,
}

/// The total spent in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub year: i32,
    /// The month number, 1 for January through 12 for December.
    pub month: u8,
    pub total: Decimal,
}

/// Everything shown on the summary page.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Every expense, newest first.
    pub expenses: Vec<ExpenseWithCategory>,
    /// Totals per category, ordered by category name.
    pub by_category: Vec<CategoryTotal>,
    /// The sum of every expense.
    pub total: Decimal,
}

/// Add `amount` to `total`.
///
/// # Errors
/// Returns [Error::TotalOverflow] if the sum does not fit in a [Decimal].
fn add_to_total(total: &mut Decimal, amount: Decimal) -> Result<(), Error> {
    *total = total.checked_add(amount).ok_or(Error::TotalOverflow)?;

    Ok(())
}

/// Sum the expenses for each category name.
///
/// Expenses whose category could not be found are left out. The result is
/// ordered by category name.
///
/// # Errors
/// Returns [Error::TotalOverflow] if a category total is too large for a [Decimal].
pub fn summarize_by_category(
    expenses: &[ExpenseWithCategory],
) -> Result<Vec<CategoryTotal>, Error> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();

    for row in expenses {
        let Some(category_name) = &row.category_name else {
            tracing::warn!(
                "Skipping expense {} in category summary: category {} does not exist",
                row.expense.id,
                row.expense.category_id
            );
            continue;
        };

        add_to_total(
            totals.entry(category_name.as_ref()).or_default(),
            row.expense.amount.value(),
        )?;
    }

    let category_totals = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_owned(),
            total,
        })
        .collect();

    Ok(category_totals)
}

/// The first day of the earliest month in the last `months` calendar months,
/// counting the month of `today` as the first.
///
/// For example, with `today` in September and `months` set to 3, the cutoff
/// is the first of July.
///
/// Returns `None` when `months` is zero. Cutoffs before the earliest
/// representable date are clamped to [Date::MIN].
pub fn month_cutoff(today: Date, months: u32) -> Option<Date> {
    if months == 0 {
        return None;
    }

    let current_month_index = i64::from(today.year()) * 12 + i64::from(u8::from(today.month())) - 1;
    let cutoff_month_index = current_month_index - (i64::from(months) - 1);

    let year = cutoff_month_index.div_euclid(12);
    let month = cutoff_month_index.rem_euclid(12) as u8 + 1;

    let cutoff = i32::try_from(year)
        .ok()
        .zip(Month::try_from(month).ok())
        .and_then(|(year, month)| Date::from_calendar_date(year, month, 1).ok())
        .unwrap_or(Date::MIN);

    Some(cutoff)
}

/// Sum the expenses for each of the last `months` calendar months.
///
/// The result is ordered from oldest to newest month. Months without any
/// expenses are not included.
///
/// # Errors
/// Returns [Error::TotalOverflow] if a monthly total is too large for a [Decimal].
pub fn monthly_totals(
    expenses: &[Expense],
    months: u32,
    today: Date,
) -> Result<Vec<MonthlyTotal>, Error> {
    let Some(cutoff) = month_cutoff(today, months) else {
        return Ok(Vec::new());
    };

    let mut totals: BTreeMap<(i32, u8), Decimal> = BTreeMap::new();

    for expense in expenses.iter().filter(|expense| expense.date >= cutoff) {
        let key = (expense.date.year(), u8::from(expense.date.month()));
        add_to_total(totals.entry(key).or_default(), expense.amount.value())?;
    }

    let monthly_totals = totals
        .into_iter()
        .map(|((year, month), total)| MonthlyTotal { year, month, total })
        .collect();

    Ok(monthly_totals)
}

/// The sum of every expense.
///
/// # Errors
/// Returns [Error::TotalOverflow] if the sum is too large for a [Decimal].
pub fn grand_total(expenses: &[ExpenseWithCategory]) -> Result<Decimal, Error> {
    expenses.iter().try_fold(Decimal::ZERO, |mut total, row| {
        add_to_total(&mut total, row.expense.amount.value())?;
        Ok(total)
    })
}

/// Combine the expense list, the category totals and the grand total.
///
/// # Errors
/// Returns [Error::TotalOverflow] if any total is too large for a [Decimal].
pub fn build_summary(expenses: Vec<ExpenseWithCategory>) -> Result<Summary, Error> {
    let by_category = summarize_by_category(&expenses)?;
    let total = grand_total(&expenses)?;

    Ok(Summary {
        expenses,
        by_category,
        total,
    })
}
