use crate::adapters::memory::SnapshotRepository;
use crate::adapters::snapshot::{
    CsvTables, Snapshot, PRESCRIPTIONS_TABLE, PRODUCTS_TABLE, QUOTES_TABLE, STORES_TABLE,
};
use crate::core::report::ReportGenerator;
use crate::domain::model::SnapshotFormat;
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{RankerError, Result};
use crate::utils::validation::Validate;
use std::path::Path;

/// Loads a snapshot, generates the configured report and optionally stores it.
pub struct ReportEngine<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ReportEngine<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub async fn load_snapshot(&self) -> Result<Snapshot> {
        let path = self.config.data_path();
        let format = self.config.snapshot_format();
        tracing::info!("Loading {:?} snapshot from {}", format, path);

        let snapshot = match format {
            SnapshotFormat::Json => {
                let data = self.storage.read_file(path).await?;
                Snapshot::from_json_slice(&data)?
            }
            SnapshotFormat::Toml => {
                let data = self.storage.read_file(path).await?;
                let content = String::from_utf8(data).map_err(|e| RankerError::SnapshotError {
                    message: format!("{} is not valid UTF-8: {}", path, e),
                })?;
                Snapshot::from_toml_str(&content)?
            }
            SnapshotFormat::Csv => {
                let products = self.read_table(path, PRODUCTS_TABLE).await?;
                let stores = self.read_table(path, STORES_TABLE).await?;
                let quotes = self.read_table(path, QUOTES_TABLE).await?;
                let prescriptions = self.read_table(path, PRESCRIPTIONS_TABLE).await?;
                Snapshot::from_csv_tables(CsvTables {
                    products: &products,
                    stores: &stores,
                    quotes: &quotes,
                    prescriptions: &prescriptions,
                })?
            }
        };

        snapshot.validate()?;
        Ok(snapshot)
    }

    async fn read_table(&self, dir: &str, table: &str) -> Result<Vec<u8>> {
        let table_path = Path::new(dir).join(table);
        self.storage.read_file(&table_path.to_string_lossy()).await
    }

    /// Returns the report text; writes it to the configured output path too.
    pub async fn run(&self) -> Result<String> {
        let date = self
            .config
            .report_date()
            .ok_or_else(|| RankerError::MissingConfigError {
                field: "report date".to_string(),
            })?;

        let snapshot = self.load_snapshot().await?;
        tracing::info!(
            "Snapshot loaded: {} prescriptions, {} quotes",
            snapshot.prescriptions.len(),
            snapshot.quotes.len()
        );

        let repository = SnapshotRepository::new(snapshot);
        let report = ReportGenerator::new(&repository)
            .with_unit_policy(self.config.unit_matching().policy())
            .with_currency_symbol(self.config.currency_symbol())
            .generate(date, self.config.report_mode());

        if let Some(output_path) = self.config.output_path() {
            self.storage
                .write_file(output_path, report.as_bytes())
                .await?;
            tracing::info!("Report saved to: {}", output_path);
        }

        Ok(report)
    }
}
