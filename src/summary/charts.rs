//! ECharts visualisations for the summary page.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger,
    },
    series::{Pie, bar},
};
use maud::{Markup, PreEscaped, html};
use rust_decimal::prelude::ToPrimitive;

use crate::{
    html::HeadElement,
    summary::aggregation::{CategoryTotal, MonthlyTotal},
};

/// Where the summary page loads ECharts from.
pub(super) const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// A chart with its HTML container ID and ECharts configuration.
pub(super) struct SummaryChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for the charts.
pub(super) fn charts_view(charts: &[SummaryChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates the JavaScript that initialises each chart once the page has loaded.
pub(super) fn charts_script(charts: &[SummaryChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A pie chart of the share of spending in each category.
pub(super) fn category_chart(category_totals: &[CategoryTotal]) -> Chart {
    let data = category_totals
        .iter()
        .map(|total| (total.total.to_f64().unwrap_or_default(), total.category.as_str()))
        .collect::<Vec<_>>();

    Chart::new()
        .title(Title::new().text("Spending by category").subtext("All time"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("1%"))
        .series(
            Pie::new()
                .name("Spending")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

/// A bar chart of the total spent in each month.
pub(super) fn monthly_chart(monthly_totals: &[MonthlyTotal]) -> Chart {
    let labels = monthly_totals
        .iter()
        .map(|total| format!("{}-{:02}", total.year, total.month))
        .collect::<Vec<_>>();
    let values = monthly_totals
        .iter()
        .map(|total| total.total.to_f64().unwrap_or_default())
        .collect::<Vec<_>>();

    Chart::new()
        .title(
            Title::new()
                .text("Monthly spending")
                .subtext("Last six months"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter())
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(bar::Bar::new().name("Spending").data(values))
}

fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

#[cfg(test)]
mod chart_tests {
    use rust_decimal_macros::dec;

    use crate::summary::{
        aggregation::{CategoryTotal, MonthlyTotal},
        charts::{category_chart, monthly_chart},
    };

    #[test]
    fn category_chart_includes_each_category() {
        let totals = vec![
            CategoryTotal {
                category: "Food".to_owned(),
                total: dec!(30),
            },
            CategoryTotal {
                category: "Transport".to_owned(),
                total: dec!(5),
            },
        ];

        let options = category_chart(&totals).to_string();

        assert!(options.contains("\"Food\""), "got {options}");
        assert!(options.contains("\"Transport\""), "got {options}");
    }

    #[test]
    fn monthly_chart_labels_months() {
        let totals = vec![MonthlyTotal {
            year: 2025,
            month: 9,
            total: dec!(12.50),
        }];

        let options = monthly_chart(&totals).to_string();

        assert!(options.contains("\"2025-09\""), "got {options}");
    }
}
