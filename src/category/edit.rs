//! Category editing page and endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{
        CategoryId, CategoryName, domain::EditCategoryFormData, get_category, update_category,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        form_page,
    },
    navigation::NavBar,
};

/// The state needed for editing a category.
#[derive(Debug, Clone)]
pub struct EditCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the category editing page.
///
/// Responds with the 404 page if the category does not exist.
pub async fn get_edit_category_page(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = get_category(category_id, &connection)?;

    let nav_bar = NavBar::new(endpoints::EDIT_CATEGORY_VIEW).into_html();
    let content = form_page(
        nav_bar,
        "Edit Category",
        edit_category_form_view(category_id, category.name.as_ref(), ""),
    );

    Ok(base("Edit Category", &[], &content).into_response())
}

/// Handle a category update where the category ID is taken from the form.
pub async fn update_category_endpoint(
    State(state): State<EditCategoryState>,
    Form(form): Form<EditCategoryFormData>,
) -> Response {
    update_category_from_form(form.id, &form.name, &state)
}

/// Handle a category update where the category ID is in both the path and the form.
///
/// If the two IDs differ, nothing is changed and the response is a 404 alert.
pub async fn update_category_with_path_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryState>,
    Form(form): Form<EditCategoryFormData>,
) -> Response {
    if category_id != form.id {
        tracing::warn!(
            "Rejected edit of category {category_id} with form for category {}",
            form.id
        );
        return Error::IdMismatch {
            path: category_id,
            form: form.id,
        }
        .into_alert_response();
    }

    update_category_from_form(category_id, &form.name, &state)
}

fn update_category_from_form(
    category_id: CategoryId,
    raw_name: &str,
    state: &EditCategoryState,
) -> Response {
    let name = match CategoryName::new(raw_name) {
        Ok(name) => name,
        Err(error) => {
            return edit_category_form_view(category_id, raw_name, &format!("Error: {error}"))
                .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_category(category_id, name, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingCategory) => Error::UpdateMissingCategory.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating category {category_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_category_form_view(category_id: CategoryId, name: &str, error_message: &str) -> Markup {
    let update_endpoint = endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category_id);

    html! {
        form
            hx-post=(update_endpoint)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            input type="hidden" name="id" value=(category_id);

            div
            {
                label
                    for="name"
                    class=(FORM_LABEL_STYLE)
                {
                    "Category Name"
                }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Category Name"
                    maxlength=(CategoryName::MAX_LENGTH)
                    value=(name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class=(FORM_ERROR_STYLE)
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Category" }
        }
    }
}
