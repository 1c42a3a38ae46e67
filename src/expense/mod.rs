//! Expense management: recording, browsing and searching expenses.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod list;

pub use create::{create_expense_endpoint, get_new_expense_page};
pub use db::{
    count_expenses, create_expense, create_expense_table, delete_expense, get_expense,
    get_expense_with_category, list_expenses, update_expense,
};
pub use delete::{delete_expense_endpoint, get_delete_expense_page};
pub use domain::{
    Amount, Description, EditExpenseFormData, Expense, ExpenseFormData, ExpenseId,
    ExpenseWithCategory, NewExpense,
};
pub use edit::{get_edit_expense_page, update_expense_endpoint, update_expense_with_path_endpoint};
pub use list::get_expenses_page;
