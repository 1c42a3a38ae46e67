//! Category management for grouping expenses.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::{create_category_endpoint, get_new_category_page};
pub use db::{
    count_categories, count_expenses_per_category, create_category, create_category_table,
    delete_category, get_all_categories, get_category, update_category,
};
pub use delete::{delete_category_endpoint, get_delete_category_page};
pub use domain::{Category, CategoryId, CategoryName};
pub use edit::{
    get_edit_category_page, update_category_endpoint, update_category_with_path_endpoint,
};
pub use list::get_categories_page;
