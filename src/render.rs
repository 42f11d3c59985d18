//! Plain-text rendering of a dashboard view for the terminal shell.

use crate::dashboard::{DashboardView, FilterOptions};
use itertools::Itertools;

pub const TITLE: &str = "Dashboard: Top Burger & Fried Chicken Restaurants in Saudi Arabia";
const EMPTY: &str = "  No data for the current selection";
const BAR: char = '█';

fn heading(text: &str) -> Vec<String> {
    vec![String::new(), text.to_string(), "-".repeat(text.chars().count())]
}

/// Horizontal bars scaled so the largest value spans `width` cells.
fn bar_chart(rows: &[(String, f64)], unit: &str, width: usize) -> Vec<String> {
    if rows.is_empty() {
        return vec![EMPTY.to_string()];
    }

    let label_width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    let max = rows.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);

    let mut lines = rows
        .iter()
        .map(|(label, value)| {
            let len = if max > 0.0 {
                ((value / max) * width as f64).round() as usize
            } else {
                0
            };
            format!(
                "  {:<label_width$} │ {:<width$} {:.2}",
                label,
                BAR.to_string().repeat(len),
                value,
                label_width = label_width,
                width = width
            )
        })
        .collect::<Vec<_>>();
    lines.push(format!("  ({})", unit));
    lines
}

fn share_table(rows: &[(String, f64)]) -> Vec<String> {
    if rows.is_empty() {
        return vec![EMPTY.to_string()];
    }

    let total: f64 = rows.iter().map(|(_, v)| v).sum();
    let label_width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);

    rows.iter()
        .map(|(label, value)| {
            let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
            format!(
                "  {:<label_width$} {:>6.1}%  ({:.2} Million SAR)",
                label,
                share,
                value,
                label_width = label_width
            )
        })
        .collect()
}

pub fn render_view(view: &DashboardView, bar_width: usize) -> String {
    let mut lines = vec![TITLE.to_string(), "=".repeat(TITLE.chars().count())];

    lines.push(format!(
        "Categories: {}",
        view.selection.categories.iter().map(|c| c.as_str()).join(", ")
    ));
    lines.push(format!("Cities: {}", view.selection.cities.iter().join(", ")));
    lines.push(format!(
        "Rows: {}   Total revenue: {:.2} Million SAR",
        view.row_count, view.total_revenue
    ));

    lines.extend(heading("Total Revenue by Restaurant"));
    let revenue = view
        .revenue_by_restaurant
        .iter()
        .map(|r| (r.restaurant.clone(), r.revenue))
        .collect::<Vec<_>>();
    lines.extend(bar_chart(&revenue, "Revenue (Million SAR)", bar_width));

    lines.extend(heading("Average Revenue per Branch by Restaurant"));
    let averages = view
        .avg_revenue_by_restaurant
        .iter()
        .map(|r| (r.restaurant.clone(), r.avg_revenue_per_branch))
        .collect::<Vec<_>>();
    lines.extend(bar_chart(
        &averages,
        "Avg Revenue per Branch (Million SAR)",
        bar_width,
    ));

    lines.extend(heading("Revenue Distribution by Category"));
    let shares = view
        .revenue_by_category
        .iter()
        .map(|r| (r.category.to_string(), r.revenue))
        .collect::<Vec<_>>();
    lines.extend(share_table(&shares));

    lines.join("\n")
}

pub fn render_options(options: &FilterOptions) -> String {
    [
        "Categories:".to_string(),
        options.categories.iter().map(|c| format!("  {}", c)).join("\n"),
        "Cities:".to_string(),
        options.cities.iter().map(|c| format!("  {}", c)).join("\n"),
    ]
    .join("\n")
}
