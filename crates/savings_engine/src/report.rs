use models::{FleetModel, NumberFormat, SavingsResults};

use crate::format::{format_currency, format_number, format_quantity};

/// Plain-text report: a baseline block followed by one row per scenario.
pub fn render_table(results: &SavingsResults, format: &NumberFormat) -> String {
    let mut out = String::new();
    let baseline = &results.baseline;

    out.push_str("Baseline\n");
    let mut lines = vec![
        (
            "Fleet draw".to_string(),
            format!("{} kW", format_quantity(baseline.total_consumption_kw, format)),
        ),
        (
            "Energy per year".to_string(),
            format!("{} MWh", format_quantity(baseline.mwh_per_year, format)),
        ),
        (
            "Cost per year".to_string(),
            format_currency(baseline.cost_per_year, format),
        ),
    ];
    if let (Some(years), Some(cost)) = (results.lifetime_years, baseline.lifetime_cost) {
        lines.push((
            format!("Cost over {} years", format_number(years, 2, format)),
            format_currency(cost, format),
        ));
    }
    if results.optimizable_ratio < 1.0 {
        lines.push((
            "Optimizable share".to_string(),
            format!("{} %", format_number(results.optimizable_ratio * 100.0, 1, format)),
        ));
    }
    let label_width = lines.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    for (label, value) in &lines {
        out.push_str(&format!("  {:<width$}  {}\n", label, value, width = label_width));
    }
    out.push('\n');

    let (header, rows) = scenario_rows(results, format);
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }
    out.push_str(&join_row(&header, &widths));
    for row in &rows {
        out.push_str(&join_row(row, &widths));
    }

    if !results.fallbacks.is_empty() {
        out.push_str(&format!(
            "\nNo numeric value for: {} (default used)\n",
            results.fallbacks.join(", ")
        ));
    }
    out
}

fn scenario_rows(results: &SavingsResults, format: &NumberFormat) -> (Vec<String>, Vec<Vec<String>>) {
    let improvement = |pct: u32, assumed: bool| {
        if assumed {
            format!("{}% (typical)", pct)
        } else {
            format!("{}%", pct)
        }
    };

    match results.model {
        FleetModel::PayloadFleet => {
            let header = ["Improvement", "Energy (MWh)", "CO₂ (t)", "Savings"]
                .map(String::from)
                .to_vec();
            let rows = results
                .scenarios
                .iter()
                .map(|s| {
                    vec![
                        improvement(s.pct, s.assumed),
                        format_quantity(s.total_energy_savings_mwh.unwrap_or(s.energy_savings_mwh), format),
                        format_quantity(s.co2_savings_tons.unwrap_or_default(), format),
                        format_currency(s.lifetime_savings.unwrap_or(s.annual_savings), format),
                    ]
                })
                .collect();
            (header, rows)
        }
        FleetModel::SingleClass => {
            let header = ["Improvement", "Energy (MWh/yr)", "Savings/yr", "Savings %"]
                .map(String::from)
                .to_vec();
            let rows = results
                .scenarios
                .iter()
                .map(|s| {
                    vec![
                        improvement(s.pct, s.assumed),
                        format_quantity(s.energy_savings_mwh, format),
                        format_currency(s.annual_savings, format),
                        format!("{} %", format_number(s.savings_percent, 1, format)),
                    ]
                })
                .collect();
            (header, rows)
        }
    }
}

fn join_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        if i + 1 == cells.len() {
            // right-align the money column
            line.push_str(&format!("{:>width$}", cell, width = widths[i]));
        } else {
            line.push_str(&format!("{:<width$}", cell, width = widths[i]));
        }
    }
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SavingsModel;
    use models::{PayloadFleetInputs, SingleClassInputs};

    #[test]
    fn test_payload_table_lists_lifetime_figures() {
        let results = PayloadFleetInputs::default().calculate();
        let table = render_table(&results, &NumberFormat::default());

        assert!(table.starts_with("Baseline\n"));
        assert!(table.contains("Cost over 5 years"));
        assert!(table.contains("765\u{a0}000\u{a0}€"));
        assert!(table.contains("CO₂ (t)"));
        let typical = table.lines().find(|l| l.contains("(typical)")).unwrap();
        assert!(typical.starts_with("20%"));
        assert!(typical.contains("850"));
        assert!(typical.contains("340"));
        assert!(typical.ends_with("153\u{a0}000\u{a0}€"));
        assert!(!table.contains("No numeric value"));
    }

    #[test]
    fn test_single_class_table_rows() {
        let results = SingleClassInputs::default().calculate();
        let table = render_table(&results, &NumberFormat::default());

        assert!(table.contains("Savings %"));
        assert!(!table.contains("Cost over"));
        let rows: Vec<&str> = table.lines().filter(|l| l.contains('%') && !l.contains("Savings")).collect();
        assert_eq!(rows.len(), 6);
        assert!(rows[2].starts_with("15% (typical)"));
    }

    #[test]
    fn test_fallback_note() {
        let mut inputs = SingleClassInputs::default();
        inputs.robot_count = "many".to_string();
        let table = render_table(&inputs.calculate(), &NumberFormat::default());
        assert!(table.contains("No numeric value for: r"));
    }
}
