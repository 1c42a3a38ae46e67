//! Core expense domain types and validation.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::{
    Error,
    category::{CategoryId, CategoryName},
    database_id::DatabaseId,
};

/// Database identifier for an expense.
pub type ExpenseId = DatabaseId;

/// Text detailing an expense, e.g. "Coffee with Sam".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Description(String);

impl Description {
    /// The maximum number of characters in a description.
    pub const MAX_LENGTH: usize = 200;

    /// Create a description from `text` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an:
    /// - [Error::EmptyDescription] if `text` is empty or only whitespace,
    /// - or [Error::DescriptionTooLong] if `text` has more than [Description::MAX_LENGTH] characters.
    pub fn new(text: &str) -> Result<Self, Error> {
        let text = text.trim();

        if text.is_empty() {
            Err(Error::EmptyDescription)
        } else if text.chars().count() > Self::MAX_LENGTH {
            Err(Error::DescriptionTooLong(Self::MAX_LENGTH))
        } else {
            Ok(Self(text.to_owned()))
        }
    }

    /// Create a description without validation.
    ///
    /// The caller should ensure that the string is not empty and not too long.
    pub fn new_unchecked(text: &str) -> Self {
        Self(text.to_owned())
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Description {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sum of money spent, always greater than zero and in whole cents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// The number of decimal places amounts are recorded with.
    pub const DECIMAL_PLACES: u32 = 2;

    /// The number of digits allowed before the decimal point.
    pub const INTEGER_DIGITS: u32 = 16;

    /// The largest amount that can be recorded, 9999999999999999.99.
    pub fn max_value() -> Decimal {
        // 18 nines with two of them after the decimal point.
        Decimal::new(999_999_999_999_999_999, Self::DECIMAL_PLACES)
    }

    /// Create an amount from `value`.
    ///
    /// Trailing zeros do not count towards the decimal places, so `12.500`
    /// is accepted and stored as `12.50`.
    ///
    /// # Errors
    ///
    /// This function will return an:
    /// - [Error::NonPositiveAmount] if `value` is zero or negative,
    /// - [Error::AmountTooLarge] if `value` is more than [Amount::max_value],
    /// - or [Error::TooManyDecimalPlaces] if `value` has fractional cents.
    pub fn new(value: Decimal) -> Result<Self, Error> {
        if value <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount);
        }

        if value > Self::max_value() {
            return Err(Error::AmountTooLarge(Self::max_value()));
        }

        if value.normalize().scale() > Self::DECIMAL_PLACES {
            return Err(Error::TooManyDecimalPlaces);
        }

        let mut value = value.normalize();
        value.rescale(Self::DECIMAL_PLACES);

        Ok(Self(value))
    }

    /// Create an amount without validation.
    ///
    /// The caller should ensure that `value` is positive with at most two
    /// decimal places.
    pub fn new_unchecked(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| Error::InvalidAmount(s.to_owned()))?;

        Amount::new(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.to_string()))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        Decimal::from_str(text)
            .map(Amount)
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// A validated expense that has not been assigned an ID yet.
///
/// Used for both creating and replacing expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub date: Date,
    pub description: Description,
    pub amount: Amount,
    pub category_id: CategoryId,
}

/// A single dated spending record tied to one category.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub date: Date,
    pub description: Description,
    pub amount: Amount,
    pub category_id: CategoryId,
}

/// An expense with the name of its category.
///
/// `category_name` is `None` if the expense refers to a category that does
/// not exist.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseWithCategory {
    pub expense: Expense,
    pub category_name: Option<CategoryName>,
}

/// Form data for creating an expense.
///
/// Fields are kept as text so that bad input can be shown back to the user
/// alongside the error message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseFormData {
    pub date: String,
    pub description: String,
    pub amount: String,
    /// The selected category ID, empty when nothing is selected.
    #[serde(default)]
    pub category_id: String,
}

impl ExpenseFormData {
    /// Validate the form fields.
    ///
    /// # Errors
    /// Returns the first validation error found, checking the description,
    /// amount, date and then the category.
    pub fn to_new_expense(&self) -> Result<NewExpense, Error> {
        let description = Description::new(&self.description)?;
        let amount = self.amount.parse()?;
        let date = parse_date(&self.date)?;
        let category_id = parse_category_id(&self.category_id)?;

        Ok(NewExpense {
            date,
            description,
            amount,
            category_id,
        })
    }
}

/// Form data for editing an expense.
///
/// The ID travels with the form so that it can be checked against the ID in
/// the URL path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditExpenseFormData {
    pub id: String,
    pub date: String,
    pub description: String,
    pub amount: String,
    #[serde(default)]
    pub category_id: String,
}

impl EditExpenseFormData {
    /// Split the form into its ID and the fields shared with the create form.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the ID is not an expense ID.
    pub fn into_parts(self) -> Result<(ExpenseId, ExpenseFormData), Error> {
        let id = self.id.trim().parse().map_err(|_| {
            tracing::warn!("Rejected expense form with the ID {:?}", self.id);
            Error::NotFound
        })?;

        Ok((
            id,
            ExpenseFormData {
                date: self.date,
                description: self.description,
                amount: self.amount,
                category_id: self.category_id,
            },
        ))
    }
}

/// Parse the category ID submitted with an expense form.
///
/// # Errors
/// Returns an:
/// - [Error::MissingCategory] if `text` is empty,
/// - or [Error::InvalidCategoryId] if `text` is not an integer.
fn parse_category_id(text: &str) -> Result<CategoryId, Error> {
    let text = text.trim();

    if text.is_empty() {
        return Err(Error::MissingCategory);
    }

    text.parse()
        .map_err(|_| Error::InvalidCategoryId(text.to_owned()))
}

/// Parse an ISO 8601 calendar date, e.g. "2025-09-30".
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not a valid `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

#[cfg(test)]
mod description_tests {
    use crate::{Error, expense::Description};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(Description::new(""), Err(Error::EmptyDescription));
        assert_eq!(Description::new(" \t\n"), Err(Error::EmptyDescription));
    }

    #[test]
    fn new_accepts_max_length() {
        let text = "a".repeat(Description::MAX_LENGTH);

        assert!(Description::new(&text).is_ok());
    }

    #[test]
    fn new_fails_on_long_description() {
        let text = "a".repeat(Description::MAX_LENGTH + 1);

        assert_eq!(
            Description::new(&text),
            Err(Error::DescriptionTooLong(Description::MAX_LENGTH))
        );
    }

    #[test]
    fn new_trims_whitespace() {
        let description = Description::new("  Coffee run ").unwrap();

        assert_eq!(description.as_ref(), "Coffee run");
    }
}

#[cfg(test)]
mod amount_tests {
    use rust_decimal_macros::dec;

    use crate::{Error, expense::Amount};

    #[test]
    fn new_fails_on_zero() {
        assert_eq!(Amount::new(dec!(0)), Err(Error::NonPositiveAmount));
        assert_eq!(Amount::new(dec!(0.00)), Err(Error::NonPositiveAmount));
    }

    #[test]
    fn new_fails_on_negative() {
        assert_eq!(Amount::new(dec!(-1.50)), Err(Error::NonPositiveAmount));
    }

    #[test]
    fn new_fails_on_fractional_cents() {
        assert_eq!(Amount::new(dec!(1.005)), Err(Error::TooManyDecimalPlaces));
    }

    #[test]
    fn new_accepts_smallest_amount() {
        assert_eq!(Amount::new(dec!(0.01)).map(|amount| amount.value()), Ok(dec!(0.01)));
    }

    #[test]
    fn new_ignores_trailing_zeros() {
        let amount = Amount::new(dec!(12.500)).unwrap();

        assert_eq!(amount.to_string(), "12.50");
    }

    #[test]
    fn parse_pads_to_two_decimal_places() {
        let amount: Amount = "7".parse().unwrap();

        assert_eq!(amount.to_string(), "7.00");
    }

    #[test]
    fn new_accepts_largest_amount() {
        let amount = Amount::new(dec!(9999999999999999.99)).unwrap();

        assert_eq!(amount.to_string(), "9999999999999999.99");
    }

    #[test]
    fn new_fails_above_largest_amount() {
        assert_eq!(
            Amount::new(dec!(10000000000000000.00)),
            Err(Error::AmountTooLarge(Amount::max_value()))
        );
    }

    #[test]
    fn parse_fails_on_huge_amount() {
        let result = "79228162514264337593543950335".parse::<Amount>();

        assert_eq!(result, Err(Error::AmountTooLarge(Amount::max_value())));
    }

    #[test]
    fn parse_fails_on_text() {
        let result = "twelve".parse::<Amount>();

        assert_eq!(result, Err(Error::InvalidAmount("twelve".to_owned())));
    }
}
