//! Alert messages for reporting failed htmx requests to users.
//!
//! Alerts are rendered as HTML fragments that htmx swaps into the
//! `#alert-container` element of the base page.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

const ALERT_STYLE: &str = "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
    dark:bg-gray-800 dark:text-red-400";

/// An error message shown after a failed htmx request.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// The headline.
    pub message: String,
    /// Extra information shown below the headline, e.g. how to fix the problem.
    pub details: String,
}

impl Alert {
    pub fn new(message: &str, details: &str) -> Self {
        Self {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    pub fn into_html(self) -> Markup {
        html!(
            div role="alert" class=(ALERT_STYLE)
            {
                p class="font-medium" { (self.message) }

                @if !self.details.is_empty() {
                    p { (self.details) }
                }
            }
        )
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        Html(self.into_html().into_string()).into_response()
    }
}
