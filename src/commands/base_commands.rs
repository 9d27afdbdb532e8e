use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::domain::simulation::InputField;
use crate::services::api_config::{ApiConfig, ApiEnvironment, ApiSettings, ConfigError};

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    #[command(flatten)]
    pub api: ApiArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ApiArgs {
    /// Backend deployment to use (defaults to development for debug builds)
    #[arg(long, value_enum, global = true)]
    pub environment: Option<ApiEnvironment>,
    /// Base URL of the API, overriding the environment
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,
    /// Path to an API settings YAML file
    #[arg(long, global = true)]
    pub config: Option<String>,
}

impl ApiArgs {
    pub fn resolve(&self) -> Result<ApiConfig, ConfigError> {
        let settings = match &self.config {
            Some(path) => ApiSettings::from_yaml_file(path)?,
            None => ApiSettings::default(),
        };
        let environment = self.environment.unwrap_or_else(ApiEnvironment::from_build);
        ApiConfig::resolve(environment, &settings, self.api_base_url.as_deref())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize a cloud billing CSV export to FOCUS 1.3
    Convert {
        /// Billing export (AWS CUR 2.0 or Azure consumption CSV)
        #[arg(short, long)]
        input: String,
        /// Directory the normalized file is saved to
        #[arg(short, long, default_value = ".")]
        output_dir: String,
    },
    /// Run the production-planning Monte Carlo simulation
    Simulate {
        #[command(flatten)]
        inputs: SimulationArgs,
        /// Write the profit distribution chart to this PNG file
        #[arg(short, long)]
        chart: Option<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Raw form values. Each is read the way the form reads what is typed, so
/// anything unreadable becomes 0.
#[derive(Args, Debug, Clone, Default)]
pub struct SimulationArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub production_quantity: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub unit_cost: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub unit_price: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub salvage_price: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub fixed_cost: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub worst_likely_demand: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub expected_demand: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub best_likely_demand: Option<String>,
    /// Set a field by its request name, e.g. `--set unitCost=95`. Applied
    /// after the per-field flags.
    #[arg(long = "set", value_name = "FIELD=VALUE", allow_hyphen_values = true)]
    pub assignments: Vec<String>,
}

impl SimulationArgs {
    /// Fields the user actually typed something into.
    pub fn edits(&self) -> Vec<(InputField, &str)> {
        let values = [
            (InputField::ProductionQuantity, &self.production_quantity),
            (InputField::UnitCost, &self.unit_cost),
            (InputField::UnitPrice, &self.unit_price),
            (InputField::SalvagePrice, &self.salvage_price),
            (InputField::FixedCost, &self.fixed_cost),
            (InputField::WorstLikelyDemand, &self.worst_likely_demand),
            (InputField::ExpectedDemand, &self.expected_demand),
            (InputField::BestLikelyDemand, &self.best_likely_demand),
        ];
        values
            .into_iter()
            .filter_map(|(field, raw)| raw.as_deref().map(|raw| (field, raw)))
            .collect()
    }

    /// `--set` values split into (field name, raw value).
    pub fn named_edits(&self) -> Result<Vec<(&str, &str)>, String> {
        self.assignments
            .iter()
            .map(|assignment| {
                assignment
                    .split_once('=')
                    .ok_or_else(|| format!("expected FIELD=VALUE, got {assignment:?}"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulate_collects_only_given_fields() {
        let args = CliArgs::parse_from([
            "finops-desk",
            "simulate",
            "--unit-cost",
            "abc",
            "--fixed-cost",
            "-500",
        ]);

        if let Commands::Simulate { inputs, chart } = args.command {
            assert_eq!(
                inputs.edits(),
                vec![(InputField::UnitCost, "abc"), (InputField::FixedCost, "-500")]
            );
            assert_eq!(chart, None);
        } else {
            panic!("expected simulate command");
        }
    }

    #[test]
    fn set_values_split_on_the_first_equals_sign() {
        let args = CliArgs::parse_from([
            "finops-desk",
            "simulate",
            "--set",
            "unitCost=-5",
            "--set",
            "fixedCost=1=2",
        ]);

        if let Commands::Simulate { inputs, .. } = args.command {
            assert_eq!(
                inputs.named_edits().unwrap(),
                vec![("unitCost", "-5"), ("fixedCost", "1=2")]
            );
        } else {
            panic!("expected simulate command");
        }
    }

    #[test]
    fn set_value_without_equals_sign_is_an_error() {
        let inputs = SimulationArgs {
            assignments: vec!["unitCost".to_string()],
            ..SimulationArgs::default()
        };
        assert!(inputs.named_edits().unwrap_err().contains("FIELD=VALUE"));
    }

    #[test]
    fn convert_defaults_output_dir_to_current_directory() {
        let args = CliArgs::parse_from(["finops-desk", "convert", "-i", "aws_cur.csv"]);

        if let Commands::Convert { input, output_dir } = args.command {
            assert_eq!(input, "aws_cur.csv");
            assert_eq!(output_dir, ".");
        } else {
            panic!("expected convert command");
        }
    }

    #[test]
    fn api_flags_are_global() {
        let args = CliArgs::parse_from([
            "finops-desk",
            "convert",
            "-i",
            "aws_cur.csv",
            "--environment",
            "production",
            "--api-base-url",
            "http://127.0.0.1:9000",
        ]);

        assert_eq!(args.api.environment, Some(ApiEnvironment::Production));
        assert_eq!(
            args.api.resolve().unwrap().base_url(),
            "http://127.0.0.1:9000"
        );
    }

    #[test]
    fn environment_flag_selects_base_url() {
        let api = ApiArgs {
            environment: Some(ApiEnvironment::Production),
            ..ApiArgs::default()
        };
        assert_eq!(
            api.resolve().unwrap().base_url(),
            "https://simulation-api-rsaw.onrender.com"
        );
    }
}
