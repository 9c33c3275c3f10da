use crate::core::report::DEFAULT_CURRENCY_SYMBOL;
use crate::domain::model::{ReportMode, SnapshotFormat, UnitMatching};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use chrono::NaiveDate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "quote-ranker")]
#[command(about = "Find the cheapest store for each prescribed product on a given date")]
pub struct CliConfig {
    /// Snapshot to read: a .json or .toml file, or a directory of CSV tables
    #[arg(long)]
    pub data: String,

    /// Report date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    #[arg(long, value_enum, default_value_t = ReportMode::Winner)]
    pub mode: ReportMode,

    /// Overrides format detection from the data path
    #[arg(long, value_enum)]
    pub format: Option<SnapshotFormat>,

    /// Also write the report to this file
    #[arg(long)]
    pub output: Option<String>,

    #[arg(long, default_value = DEFAULT_CURRENCY_SYMBOL)]
    pub currency: String,

    #[arg(long, value_enum, default_value_t = UnitMatching::Exact)]
    pub unit_matching: UnitMatching,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn data_path(&self) -> &str {
        &self.data
    }

    fn snapshot_format(&self) -> SnapshotFormat {
        self.format
            .unwrap_or_else(|| SnapshotFormat::from_path(&self.data))
    }

    fn report_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn report_mode(&self) -> ReportMode {
        self.mode
    }

    fn output_path(&self) -> Option<&str> {
        self.output.as_deref()
    }

    fn currency_symbol(&self) -> &str {
        &self.currency
    }

    fn unit_matching(&self) -> UnitMatching {
        self.unit_matching
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("data", &self.data)?;
        if let Some(output) = &self.output {
            validate_path("output", output)?;
        }
        validate_non_empty_string("currency", &self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_args() {
        let config = CliConfig::try_parse_from([
            "quote-ranker",
            "--data",
            "data/snapshot.toml",
            "--date",
            "2024-03-01",
            "--mode",
            "full",
            "--unit-matching",
            "case-insensitive",
        ])
        .unwrap();

        assert_eq!(config.report_date(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(config.report_mode(), ReportMode::Full);
        assert_eq!(config.snapshot_format(), SnapshotFormat::Toml);
        assert_eq!(config.unit_matching(), UnitMatching::CaseInsensitive);
        assert_eq!(config.currency_symbol(), "R$");
        assert!(config.output_path().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_date_rejected() {
        let result = CliConfig::try_parse_from([
            "quote-ranker",
            "--data",
            "snapshot.json",
            "--date",
            "01/03/2024",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_override() {
        let config = CliConfig::try_parse_from([
            "quote-ranker",
            "--data",
            "exports/latest",
            "--date",
            "2024-03-01",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(config.snapshot_format(), SnapshotFormat::Json);
    }

    #[test]
    fn test_blank_currency_fails_validation() {
        let config = CliConfig::try_parse_from([
            "quote-ranker",
            "--data",
            "snapshot.json",
            "--date",
            "2024-03-01",
            "--currency",
            " ",
        ])
        .unwrap();
        assert!(config.validate().is_err());
    }
}
