use crate::domain::simulation::{InputField, SimulationInputs, SimulationResponse};
use crate::services::chart::{build_chart, tooltip_label, tooltip_value, BucketCategory};
use crate::services::summary_cards::summary_cards;

pub fn format_simulation_report(inputs: &SimulationInputs, response: &SimulationResponse) -> String {
    let mut lines = Vec::new();
    lines.push("Simulation Parameters".to_string());
    for field in InputField::ALL {
        lines.push(format!("{}: {}", field.label(), inputs.get(field)));
    }

    lines.push(String::new());
    lines.push("Simulation Summary".to_string());
    for card in summary_cards(&response.summary) {
        lines.push(format!("{}: {}", card.title, card.value));
    }

    let chart = build_chart(
        &response.histogram_data,
        response.summary.expected_profit,
        response.summary.value_at_risk,
    );
    lines.push(String::new());
    lines.push(chart.title.to_string());
    lines.push("Bucket | Count | Category".to_string());
    lines.push("-------|-------|---------".to_string());
    for bar in &chart.bars {
        let category = match bar.category {
            BucketCategory::AtRisk => "at risk",
            BucketCategory::Normal => "normal",
        };
        let (count, series) = tooltip_value(Some(bar.count as f64));
        lines.push(format!(
            "{} | {count} {series} | {category}",
            tooltip_label(bar.bin)
        ));
    }
    lines.push(format!(
        "At-risk buckets: {} of {}",
        chart.at_risk_count(),
        chart.bars.len()
    ));
    lines.push(chart.footnote.to_string());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_response;

    #[test]
    fn report_lists_parameters_cards_and_buckets() {
        let output = format_simulation_report(&SimulationInputs::default(), &sample_response());

        assert!(output.contains("Production Quantity: 12000"));
        assert!(output.contains("Fixed Cost: 100000"));
        assert!(output.contains("Expected Profit: $61,250"));
        assert!(output.contains("Value at Risk (5%): -$35,000"));
        assert!(output.contains("Best Case (95%): $140,000"));
        assert!(output.contains("Prob. of Loss: 23.7%"));
        assert!(output.contains("Profit Range: -$80,000 | 120 Iterations | at risk"));
        assert!(output.contains("Profit Range: -$35,000 | 380 Iterations | at risk"));
        assert!(output.contains("Profit Range: $10,000 | 1450 Iterations | normal"));
        assert!(output.contains("At-risk buckets: 2 of 5"));
    }

    #[test]
    fn report_shows_coerced_values() {
        let mut inputs = SimulationInputs::default();
        inputs.update_field(InputField::UnitCost, "abc");

        let output = format_simulation_report(&inputs, &sample_response());

        assert!(output.contains("Unit Cost: 0"));
    }
}
