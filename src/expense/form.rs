//! The form fields shared by the create and edit expense pages.

use maud::{Markup, html};

use crate::{
    category::Category,
    expense::{Description, ExpenseFormData},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// Render the inputs for an expense, pre-filled with the values in `values`.
///
/// The category select lists `categories` in the order given.
pub fn expense_form_fields(values: &ExpenseFormData, categories: &[Category]) -> Markup {
    html! {
        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                value=(values.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                maxlength=(Description::MAX_LENGTH)
                value=(values.description)
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    value=(values.amount)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="category_id"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            select
                name="category_id"
                id="category_id"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Select a category" }

                @for category in categories {
                    @if category.id.to_string() == values.category_id.trim() {
                        option value=(category.id) selected { (category.name) }
                    } @else {
                        option value=(category.id) { (category.name) }
                    }
                }
            }
        }
    }
}
