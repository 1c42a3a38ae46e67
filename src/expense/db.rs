//! Database operations for expenses.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{CategoryId, CategoryName},
    expense::{Description, Expense, ExpenseId, ExpenseWithCategory, NewExpense},
};

/// Create an expense and return it with its generated ID.
///
/// # Errors
/// Returns [Error::InvalidCategory] if `new_expense` refers to a category
/// that does not exist.
pub fn create_expense(new_expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let category_id = new_expense.category_id;

    connection
        .prepare(
            "INSERT INTO expense (date, description, amount, category_id)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, date, description, amount, category_id",
        )?
        .query_row(
            (
                new_expense.date,
                new_expense.description.as_ref(),
                new_expense.amount,
                new_expense.category_id,
            ),
            map_expense_row,
        )
        .map_err(|error| map_foreign_key_error(error, category_id))
}

/// Retrieve a single expense by ID.
///
/// # Errors
/// Returns [Error::NotFound] if `expense_id` does not refer to an expense.
pub fn get_expense(expense_id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT id, date, description, amount, category_id FROM expense WHERE id = :id",
        )?
        .query_row(&[(":id", &expense_id)], map_expense_row)
        .map_err(|error| error.into())
}

/// Retrieve a single expense by ID along with the name of its category.
///
/// # Errors
/// Returns [Error::NotFound] if `expense_id` does not refer to an expense.
pub fn get_expense_with_category(
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<ExpenseWithCategory, Error> {
    connection
        .prepare(
            "SELECT expense.id, expense.date, expense.description, expense.amount,
                expense.category_id, category.name
             FROM expense
             LEFT JOIN category ON category.id = expense.category_id
             WHERE expense.id = :id",
        )?
        .query_row(&[(":id", &expense_id)], map_expense_with_category_row)
        .map_err(|error| error.into())
}

/// Retrieve expenses with their category names, newest first.
///
/// If `search` contains non-whitespace text, only expenses whose description
/// contains `search` are returned. The match is case-sensitive.
/// Expenses on the same date are ordered by most recently created.
pub fn list_expenses(
    search: Option<&str>,
    connection: &Connection,
) -> Result<Vec<ExpenseWithCategory>, Error> {
    let search = search.filter(|text| !text.trim().is_empty());

    let mut query = String::from(
        "SELECT expense.id, expense.date, expense.description, expense.amount,
            expense.category_id, category.name
         FROM expense
         LEFT JOIN category ON category.id = expense.category_id",
    );

    if search.is_some() {
        // instr is case-sensitive, unlike LIKE.
        query.push_str(" WHERE instr(expense.description, ?1) > 0");
    }

    query.push_str(" ORDER BY expense.date DESC, expense.id DESC");

    let mut statement = connection.prepare(&query)?;
    let rows = match search {
        Some(search) => statement.query_map([search], map_expense_with_category_row)?,
        None => statement.query_map([], map_expense_with_category_row)?,
    };

    rows.map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Replace every field of an expense.
///
/// # Errors
/// Returns an:
/// - [Error::UpdateMissingExpense] if the expense does not exist, e.g. it was
///   deleted after the edit page was loaded,
/// - or [Error::InvalidCategory] if `new_expense` refers to a category that
///   does not exist.
pub fn update_expense(
    expense_id: ExpenseId,
    new_expense: NewExpense,
    connection: &Connection,
) -> Result<(), Error> {
    let category_id = new_expense.category_id;

    let rows_affected = connection
        .execute(
            "UPDATE expense
             SET date = ?1, description = ?2, amount = ?3, category_id = ?4
             WHERE id = ?5",
            (
                new_expense.date,
                new_expense.description.as_ref(),
                new_expense.amount,
                new_expense.category_id,
                expense_id,
            ),
        )
        .map_err(|error| map_foreign_key_error(error, category_id))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    Ok(())
}

/// Delete an expense by ID.
///
/// Deleting an expense that does not exist succeeds without changing anything.
pub fn delete_expense(expense_id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM expense WHERE id = ?1", [expense_id])?;

    Ok(())
}

/// Get the total number of expenses in the database.
pub fn count_expenses(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM expense;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Initialize the expense table and indexes.
///
/// The category table must be created first.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            amount TEXT NOT NULL,
            category_id INTEGER NOT NULL,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
        );

        CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);
        CREATE INDEX IF NOT EXISTS idx_expense_category ON expense(category_id);",
    )?;

    Ok(())
}

fn map_foreign_key_error(error: rusqlite::Error, category_id: CategoryId) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::InvalidCategory(category_id),
        error => error.into(),
    }
}

fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let raw_description: String = row.get(2)?;

    Ok(Expense {
        id: row.get(0)?,
        date: row.get(1)?,
        description: Description::new_unchecked(&raw_description),
        amount: row.get(3)?,
        category_id: row.get(4)?,
    })
}

fn map_expense_with_category_row(row: &Row) -> Result<ExpenseWithCategory, rusqlite::Error> {
    let expense = map_expense_row(row)?;
    let raw_category_name: Option<String> = row.get(5)?;

    Ok(ExpenseWithCategory {
        expense,
        category_name: raw_category_name.map(|name| CategoryName::new_unchecked(&name)),
    })
}
