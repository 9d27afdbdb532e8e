use crate::domain::simulation::SimulationSummary;
use crate::services::chart::ThemeColor;
use crate::services::currency::{format_currency, format_percentage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCard {
    pub title: &'static str,
    pub value: String,
    pub accent: ThemeColor,
}

/// The four headline numbers, taken as-is from the service summary.
pub fn summary_cards(summary: &SimulationSummary) -> [SummaryCard; 4] {
    [
        SummaryCard {
            title: "Expected Profit",
            value: format_currency(summary.expected_profit),
            accent: ThemeColor::Chart2,
        },
        SummaryCard {
            title: "Value at Risk (5%)",
            value: format_currency(summary.value_at_risk),
            accent: ThemeColor::Destructive,
        },
        SummaryCard {
            title: "Best Case (95%)",
            value: format_currency(summary.best_case),
            accent: ThemeColor::Chart1,
        },
        SummaryCard {
            title: "Prob. of Loss",
            value: format_percentage(summary.prob_of_loss),
            accent: ThemeColor::Chart5,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_response;

    #[test]
    fn cards_show_summary_values() {
        let cards = summary_cards(&sample_response().summary);

        let rendered: Vec<(&str, &str)> = cards
            .iter()
            .map(|card| (card.title, card.value.as_str()))
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("Expected Profit", "$61,250"),
                ("Value at Risk (5%)", "-$35,000"),
                ("Best Case (95%)", "$140,000"),
                ("Prob. of Loss", "23.7%"),
            ]
        );
    }

    #[test]
    fn accents_match_the_chart_markers() {
        let cards = summary_cards(&sample_response().summary);
        assert_eq!(cards[0].accent, ThemeColor::Chart2);
        assert_eq!(cards[1].accent, ThemeColor::Destructive);
        assert_eq!(cards[2].accent, ThemeColor::Chart1);
        assert_eq!(cards[3].accent, ThemeColor::Chart5);
    }
}
