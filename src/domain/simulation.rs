use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One editable field of the production-planning form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    ProductionQuantity,
    UnitCost,
    UnitPrice,
    SalvagePrice,
    FixedCost,
    WorstLikelyDemand,
    ExpectedDemand,
    BestLikelyDemand,
}

impl InputField {
    pub const ALL: [InputField; 8] = [
        InputField::ProductionQuantity,
        InputField::UnitCost,
        InputField::UnitPrice,
        InputField::SalvagePrice,
        InputField::FixedCost,
        InputField::WorstLikelyDemand,
        InputField::ExpectedDemand,
        InputField::BestLikelyDemand,
    ];

    /// Wire name, as sent to the simulation service.
    pub fn name(self) -> &'static str {
        match self {
            InputField::ProductionQuantity => "productionQuantity",
            InputField::UnitCost => "unitCost",
            InputField::UnitPrice => "unitPrice",
            InputField::SalvagePrice => "salvagePrice",
            InputField::FixedCost => "fixedCost",
            InputField::WorstLikelyDemand => "worstLikelyDemand",
            InputField::ExpectedDemand => "expectedDemand",
            InputField::BestLikelyDemand => "bestLikelyDemand",
        }
    }

    /// Human label derived from the wire name ("unitCost" => "Unit Cost").
    pub fn label(self) -> String {
        let mut label = String::new();
        for (idx, ch) in self.name().chars().enumerate() {
            if idx == 0 {
                label.extend(ch.to_uppercase());
            } else if ch.is_ascii_uppercase() {
                label.push(' ');
                label.push(ch);
            } else {
                label.push(ch);
            }
        }
        label
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown simulation field: {0}")]
pub struct UnknownFieldError(pub String);

impl FromStr for InputField {
    type Err = UnknownFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        InputField::ALL
            .iter()
            .copied()
            .find(|field| field.name() == value)
            .ok_or_else(|| UnknownFieldError(value.to_string()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInputs {
    pub production_quantity: f64,
    pub unit_cost: f64,
    pub unit_price: f64,
    pub salvage_price: f64,
    pub fixed_cost: f64,
    pub worst_likely_demand: f64,
    pub expected_demand: f64,
    pub best_likely_demand: f64,
}

impl Default for SimulationInputs {
    fn default() -> Self {
        Self {
            production_quantity: 12000.0,
            unit_cost: 80.0,
            unit_price: 100.0,
            salvage_price: 30.0,
            fixed_cost: 100000.0,
            worst_likely_demand: 5000.0,
            expected_demand: 12000.0,
            best_likely_demand: 16000.0,
        }
    }
}

impl SimulationInputs {
    pub fn get(&self, field: InputField) -> f64 {
        match field {
            InputField::ProductionQuantity => self.production_quantity,
            InputField::UnitCost => self.unit_cost,
            InputField::UnitPrice => self.unit_price,
            InputField::SalvagePrice => self.salvage_price,
            InputField::FixedCost => self.fixed_cost,
            InputField::WorstLikelyDemand => self.worst_likely_demand,
            InputField::ExpectedDemand => self.expected_demand,
            InputField::BestLikelyDemand => self.best_likely_demand,
        }
    }

    /// Stores the numeric reading of `raw`; anything unreadable becomes 0.
    pub fn update_field(&mut self, field: InputField, raw: &str) {
        let value = parse_lenient_number(raw);
        let slot = match field {
            InputField::ProductionQuantity => &mut self.production_quantity,
            InputField::UnitCost => &mut self.unit_cost,
            InputField::UnitPrice => &mut self.unit_price,
            InputField::SalvagePrice => &mut self.salvage_price,
            InputField::FixedCost => &mut self.fixed_cost,
            InputField::WorstLikelyDemand => &mut self.worst_likely_demand,
            InputField::ExpectedDemand => &mut self.expected_demand,
            InputField::BestLikelyDemand => &mut self.best_likely_demand,
        };
        *slot = value;
    }
}

/// Reads the longest leading number in `raw`, the way form inputs are read
/// while the user is still typing ("12e" => 12). Never yields NaN or an
/// infinity: those collapse to 0.
pub fn parse_lenient_number(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let end = numeric_prefix_len(trimmed);
    match trimmed[..end].parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Byte length of the longest `[+-]digits[.digits][e[+-]digits]` prefix,
/// found in one pass. At least one mantissa digit is required.
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits_from = |mut idx: usize| {
        while bytes.get(idx).is_some_and(u8::is_ascii_digit) {
            idx += 1;
        }
        idx
    };

    let mut idx = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(idx);
    let mut mantissa_digits = int_end - idx;
    idx = int_end;
    if bytes.get(idx) == Some(&b'.') {
        let frac_end = digits_from(idx + 1);
        mantissa_digits += frac_end - (idx + 1);
        idx = frac_end;
    }
    if mantissa_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(idx), Some(b'e' | b'E')) {
        let mut exp = idx + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            idx = exp_end;
        }
    }
    idx
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub expected_profit: f64,
    pub value_at_risk: f64,
    pub best_case: f64,
    pub prob_of_loss: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub bin: f64,
    pub count: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResponse {
    pub summary: SimulationSummary,
    pub histogram_data: Vec<HistogramBin>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResponseShapeError {
    #[error("summary field {0} is not a finite number")]
    NonFiniteSummary(&'static str),
    #[error("probability of loss {0} is outside [0, 1]")]
    ProbabilityOutOfRange(f64),
    #[error("histogram bin {0} is not a finite number")]
    NonFiniteBin(usize),
    #[error("histogram bin {0} is out of ascending order")]
    UnorderedBins(usize),
}

impl SimulationResponse {
    /// Checks the invariants the chart relies on before anyone renders it.
    pub fn validate(self) -> Result<Self, ResponseShapeError> {
        let summary = &self.summary;
        let scalars = [
            ("expectedProfit", summary.expected_profit),
            ("valueAtRisk", summary.value_at_risk),
            ("bestCase", summary.best_case),
            ("probOfLoss", summary.prob_of_loss),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(ResponseShapeError::NonFiniteSummary(name));
            }
        }
        if !(0.0..=1.0).contains(&summary.prob_of_loss) {
            return Err(ResponseShapeError::ProbabilityOutOfRange(summary.prob_of_loss));
        }

        for (idx, bucket) in self.histogram_data.iter().enumerate() {
            if !bucket.bin.is_finite() {
                return Err(ResponseShapeError::NonFiniteBin(idx));
            }
            if idx > 0 && bucket.bin < self.histogram_data[idx - 1].bin {
                return Err(ResponseShapeError::UnorderedBins(idx));
            }
        }
        Ok(self)
    }
}
