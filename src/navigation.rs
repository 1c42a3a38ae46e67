//! The navigation bar shown at the top of every page.

use maud::{Markup, html};

use crate::endpoints;

/// The sections of the app, in the order they appear in the navigation bar.
const SECTIONS: [(&str, &str); 3] = [
    (endpoints::EXPENSES_VIEW, "Expenses"),
    (endpoints::SUMMARY_VIEW, "Summary"),
    (endpoints::CATEGORIES_VIEW, "Categories"),
];

const LINK_STYLE: &str = "block py-2 px-3 rounded-sm text-gray-900 hover:bg-gray-100 \
    lg:hover:bg-transparent lg:hover:text-blue-700 lg:p-0 dark:text-white \
    lg:dark:hover:text-blue-500 dark:hover:bg-gray-700";

const CURRENT_LINK_STYLE: &str = "block py-2 px-3 rounded-sm text-white bg-blue-700 \
    lg:bg-transparent lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500";

/// A link to one section of the app.
#[derive(Debug, Clone, PartialEq)]
struct Link {
    url: &'static str,
    title: &'static str,
    is_current: bool,
}

impl Link {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            CURRENT_LINK_STYLE
        } else {
            LINK_STYLE
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }
}

/// The navigation bar with the section of the current page highlighted.
pub struct NavBar {
    links: Vec<Link>,
}

impl NavBar {
    /// Create the navigation bar for the page at `current_endpoint`.
    ///
    /// The section whose URL is the longest prefix of `current_endpoint` is
    /// highlighted, so the create, edit and delete pages highlight the list
    /// they belong to. Pages outside every section highlight nothing.
    pub fn new(current_endpoint: &str) -> NavBar {
        let current_section = SECTIONS
            .iter()
            .map(|(url, _)| *url)
            .filter(|url| current_endpoint.starts_with(url))
            .max_by_key(|url| url.len());

        let links = SECTIONS
            .into_iter()
            .map(|(url, title)| Link {
                url,
                title,
                is_current: current_section == Some(url),
            })
            .collect();

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between
                        gap-4 mx-auto p-4"
                {
                    a
                        href=(endpoints::ROOT)
                        class="text-2xl font-semibold whitespace-nowrap dark:text-white"
                    {
                        "Expense Tracker"
                    }

                    ul class="flex flex-row gap-2 lg:gap-8 font-medium"
                    {
                        @for link in self.links {
                            li { (link.into_html()) }
                        }
                    }
                }
            }
        )
    }
}
