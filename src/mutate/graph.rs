//! Chart / graph slide mutation.
//!
//! Chart content lands in text slots: `ChartTitle{i}` takes the chart's
//! title, `ChartData{i}` (or `Chart{i}`) a formatted summary of labels and
//! series the template renders as text. Embedded native chart parts are
//! left untouched.

use crate::content::{ChartContent, GraphContent};
use crate::mutate::{MutationError, load_target, set_slot_text};
use crate::pptx::document::Document;
use crate::resolve::{SlotRule, SlotTarget};

pub(crate) fn apply(doc: &mut Document, content: &GraphContent) -> Result<(), MutationError> {
    let mut slide = load_target(doc, content.slide_number)?;

    set_slot_text(
        &mut slide,
        &SlotRule::contains("title", SlotTarget::Text),
        &content.title,
        None,
    )?;

    let chart_type = content.chart_type.as_deref().unwrap_or("bar");

    for (index, chart) in content.charts.iter().enumerate() {
        let slot = index + 1;

        set_slot_text(
            &mut slide,
            &SlotRule::indexed("ChartTitle", slot, SlotTarget::Text),
            &chart.title,
            None,
        )?;

        set_slot_text(
            &mut slide,
            &SlotRule::indexed_keywords(&["ChartData", "chart"], slot, SlotTarget::Text),
            &chart_summary(chart, chart_type),
            None,
        )?;
    }

    doc.store_slide(slide)?;
    Ok(())
}

/// Render chart data as the line-per-series text form the templates show.
fn chart_summary(chart: &ChartContent, chart_type: &str) -> String {
    if chart.labels.is_empty() || chart.series.is_empty() {
        return format!("Chart Type: {}\nNo data available", title_case(chart_type));
    }

    let mut lines = vec![
        format!("Chart Type: {}", title_case(chart_type)),
        format!("Labels: {}", chart.labels.join(", ")),
    ];
    for series in &chart.series {
        let values: Vec<String> = series.data.iter().map(|v| format_value(*v)).collect();
        lines.push(format!("{}: {}", series.label, values.join(", ")));
    }
    lines.join("\n")
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Integral values print without a trailing `.0`.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ChartSeries;

    #[test]
    fn test_chart_summary_format() {
        let chart = ChartContent {
            title: "Revenue".to_string(),
            labels: vec!["Q1".to_string(), "Q2".to_string()],
            series: vec![ChartSeries {
                label: "2024".to_string(),
                data: vec![100.0, 150.5],
            }],
        };
        assert_eq!(
            chart_summary(&chart, "bar"),
            "Chart Type: Bar\nLabels: Q1, Q2\n2024: 100, 150.5"
        );
    }

    #[test]
    fn test_chart_summary_without_data() {
        let chart = ChartContent {
            title: "Empty".to_string(),
            labels: Vec::new(),
            series: Vec::new(),
        };
        assert_eq!(
            chart_summary(&chart, "line"),
            "Chart Type: Line\nNo data available"
        );
    }
}
