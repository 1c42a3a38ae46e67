//! The endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/expenses/edit/{expense_id}', use [format_endpoint].

/// The root route which redirects to the expenses page.
pub const ROOT: &str = "/";

/// The page listing all categories.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The page for creating a category, and the route the form posts to.
pub const NEW_CATEGORY: &str = "/categories/create";
/// The page for editing a category.
pub const EDIT_CATEGORY_VIEW: &str = "/categories/edit/{category_id}";
/// The route for submitting an edited category, the ID is taken from the form.
pub const EDIT_CATEGORY: &str = "/categories/edit";
/// The page for confirming and the route for executing the deletion of a category.
pub const DELETE_CATEGORY: &str = "/categories/delete/{category_id}";

/// The page listing expenses, optionally filtered with `?search=`.
pub const EXPENSES_VIEW: &str = "/expenses";
/// The page for creating an expense, and the route the form posts to.
pub const NEW_EXPENSE: &str = "/expenses/create";
/// The page for editing an expense.
pub const EDIT_EXPENSE_VIEW: &str = "/expenses/edit/{expense_id}";
/// The route for submitting an edited expense, the ID is taken from the form.
pub const EDIT_EXPENSE: &str = "/expenses/edit";
/// The page for confirming and the route for executing the deletion of an expense.
pub const DELETE_EXPENSE: &str = "/expenses/delete/{expense_id}";

/// The page summarising expenses by category.
pub const SUMMARY_VIEW: &str = "/expenses/summary";
/// JSON totals per category.
pub const SUMMARY_BY_CATEGORY_API: &str = "/expenses/summary-by-category";
/// JSON totals per month, takes an optional `?months=` parameter.
pub const MONTHLY_TOTALS_API: &str = "/expenses/monthly-totals";

/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/expenses/edit/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::EDIT_CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::EDIT_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::SUMMARY_VIEW);
        assert_endpoint_is_valid_uri(endpoints::SUMMARY_BY_CATEGORY_API);
        assert_endpoint_is_valid_uri(endpoints::MONTHLY_TOTALS_API);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);

        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::EDIT_CATEGORY_VIEW, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::DELETE_CATEGORY, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::EDIT_EXPENSE_VIEW, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::DELETE_EXPENSE, 1));
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
    }
}
