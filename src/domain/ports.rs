use crate::domain::model::{
    EntityId, ReportMode, ResolvedPrescription, SnapshotFormat, StoreQuote, UnitMatching,
};
use crate::utils::error::Result;
use chrono::NaiveDate;

/// Read-only access to the entities a report needs. Every call returns a
/// fresh snapshot.
pub trait QuoteRepository {
    fn find_all_prescriptions(&self) -> Result<Vec<ResolvedPrescription>>;

    /// Quotes for one product on one date, in storage order, with stores resolved.
    fn find_quotes(&self, product_id: EntityId, date: NaiveDate) -> Result<Vec<StoreQuote>>;
}

/// Decides whether a prescription's unit can be priced against a product's
/// standard unit.
pub trait UnitPolicy: Send + Sync {
    fn is_compatible(&self, required_unit: &str, standard_unit: &str) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExactUnitPolicy;

impl UnitPolicy for ExactUnitPolicy {
    fn is_compatible(&self, required_unit: &str, standard_unit: &str) -> bool {
        required_unit == standard_unit
    }
}

/// Treats "kg" and "KG" as the same unit. Surrounding whitespace is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitiveUnitPolicy;

impl UnitPolicy for CaseInsensitiveUnitPolicy {
    fn is_compatible(&self, required_unit: &str, standard_unit: &str) -> bool {
        required_unit
            .trim()
            .eq_ignore_ascii_case(standard_unit.trim())
    }
}

impl UnitMatching {
    pub fn policy(self) -> Box<dyn UnitPolicy> {
        match self {
            UnitMatching::Exact => Box::new(ExactUnitPolicy),
            UnitMatching::CaseInsensitive => Box::new(CaseInsensitiveUnitPolicy),
        }
    }
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_path(&self) -> &str;
    fn snapshot_format(&self) -> SnapshotFormat;
    fn report_date(&self) -> Option<NaiveDate>;
    fn report_mode(&self) -> ReportMode;
    fn output_path(&self) -> Option<&str>;
    fn currency_symbol(&self) -> &str;
    fn unit_matching(&self) -> UnitMatching;
}
