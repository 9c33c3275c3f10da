//! Report generation over every prescription for one date.
//!
//! Each prescription becomes a [`ProductOutcome`]: either a priced ranking or
//! one of the skip conditions (unknown product, incompatible unit, failed
//! fetch, no quotes, no usable quotes). Outcomes are then rendered as display
//! text. Nothing raised while handling one prescription aborts the report.

use crate::core::ranking::{cost_candidates, rank, select_winner};
use crate::domain::model::{
    CostedQuote, ProductOutcome, RankedQuote, RejectedQuote, ReportMode, ResolvedPrescription,
    Standing,
};
use crate::domain::ports::{ExactUnitPolicy, QuoteRepository, UnitPolicy};
use crate::utils::error::Result;
use chrono::NaiveDate;
use std::fmt::Write;

pub const DEFAULT_CURRENCY_SYMBOL: &str = "R$";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct ReportGenerator<'a, R: QuoteRepository + ?Sized> {
    repository: &'a R,
    unit_policy: Box<dyn UnitPolicy>,
    currency_symbol: String,
}

impl<'a, R: QuoteRepository + ?Sized> ReportGenerator<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        Self {
            repository,
            unit_policy: Box::new(ExactUnitPolicy),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }

    pub fn with_unit_policy(mut self, unit_policy: Box<dyn UnitPolicy>) -> Self {
        self.unit_policy = unit_policy;
        self
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn generate_winner_report(&self, date: NaiveDate) -> String {
        self.generate(date, ReportMode::Winner)
    }

    pub fn generate_full_report(&self, date: NaiveDate) -> String {
        self.generate(date, ReportMode::Full)
    }

    pub fn generate(&self, date: NaiveDate, mode: ReportMode) -> String {
        let mut report = String::new();
        let day = date.format(DATE_FORMAT);
        match mode {
            ReportMode::Winner => {
                let _ = writeln!(report, "Winning quotes report for {}:", day);
            }
            ReportMode::Full => {
                let _ = writeln!(
                    report,
                    "Full quotes report (winners and losers) for {}:",
                    day
                );
            }
        }
        report.push('\n');

        let outcomes = match self.evaluate(date, mode) {
            Ok(outcomes) => outcomes,
            Err(e) => {
                tracing::error!("Failed to load prescriptions: {}", e);
                let _ = writeln!(report, "Could not load prescriptions: {}", e);
                return report;
            }
        };

        let sections: Vec<String> = outcomes
            .iter()
            .map(|outcome| self.render_outcome(outcome, date))
            .collect();
        report.push_str(&sections.join("\n"));

        tracing::info!(
            "Generated {} report for {} covering {} prescriptions",
            mode,
            day,
            outcomes.len()
        );
        report
    }

    /// Evaluates every prescription. Fails only when the prescription list
    /// itself cannot be loaded.
    pub fn evaluate(&self, date: NaiveDate, mode: ReportMode) -> Result<Vec<ProductOutcome>> {
        let prescriptions = self.repository.find_all_prescriptions()?;

        tracing::debug!(
            "Evaluating {} prescriptions for {}",
            prescriptions.len(),
            date
        );

        Ok(prescriptions
            .into_iter()
            .map(|entry| self.evaluate_prescription(entry, date, mode))
            .collect())
    }

    fn evaluate_prescription(
        &self,
        entry: ResolvedPrescription,
        date: NaiveDate,
        mode: ReportMode,
    ) -> ProductOutcome {
        let ResolvedPrescription {
            prescription,
            product,
        } = entry;

        let Some(product) = product else {
            tracing::warn!(
                "Prescription #{} references unknown product {}",
                prescription.id,
                prescription.product_id
            );
            return ProductOutcome::ProductNotFound {
                product_id: prescription.product_id,
            };
        };

        if !self
            .unit_policy
            .is_compatible(&prescription.required_unit, &product.standard_unit)
        {
            tracing::warn!(
                "Unit mismatch for '{}': required '{}', standard '{}'",
                product.name,
                prescription.required_unit,
                product.standard_unit
            );
            return ProductOutcome::IncompatibleUnit {
                product,
                required_unit: prescription.required_unit,
            };
        }

        let quotes = match self.repository.find_quotes(product.id, date) {
            Ok(quotes) => quotes,
            Err(e) => {
                tracing::warn!("Could not load quotes for '{}': {}", product.name, e);
                return ProductOutcome::FetchFailed {
                    product,
                    reason: e.to_string(),
                };
            }
        };

        if quotes.is_empty() {
            tracing::warn!("No quotes for '{}' on {}", product.name, date);
            return ProductOutcome::NoQuotes { product };
        }

        let costing = cost_candidates(quotes, prescription.required_quantity);
        if costing.costed.is_empty() {
            tracing::warn!(
                "All {} quotes for '{}' on {} were unusable",
                costing.rejected.len(),
                product.name,
                date
            );
            return ProductOutcome::NoValidQuotes {
                product,
                rejected: costing.rejected,
            };
        }

        let ranking: Vec<RankedQuote> = match mode {
            ReportMode::Winner => select_winner(&costing.costed)
                .cloned()
                .map(|costed| RankedQuote {
                    rank: 1,
                    standing: Standing::Winner,
                    costed,
                })
                .into_iter()
                .collect(),
            ReportMode::Full => rank(costing.costed),
        };

        if let Some(winner) = ranking.first() {
            tracing::debug!(
                "Winner for '{}': store '{}' at {:.2}",
                product.name,
                winner.costed.store.name,
                winner.costed.total_cost
            );
        }

        ProductOutcome::Priced {
            product,
            prescription,
            ranking,
            rejected: costing.rejected,
        }
    }

    fn render_outcome(&self, outcome: &ProductOutcome, date: NaiveDate) -> String {
        let mut out = String::new();
        let day = date.format(DATE_FORMAT);

        match outcome {
            ProductOutcome::ProductNotFound { product_id } => {
                let _ = writeln!(out, "Product with ID {} not found.", product_id);
            }
            ProductOutcome::IncompatibleUnit {
                product,
                required_unit,
            } => {
                let _ = writeln!(
                    out,
                    "Required unit '{}' is incompatible with standard unit '{}' for '{}'.",
                    required_unit, product.standard_unit, product.name
                );
            }
            ProductOutcome::FetchFailed { product, reason } => {
                let _ = writeln!(out, "Could not load quotes for '{}': {}", product.name, reason);
            }
            ProductOutcome::NoQuotes { product } => {
                let _ = writeln!(out, "No quote for '{}' on {}.", product.name, day);
            }
            ProductOutcome::NoValidQuotes { product, rejected } => {
                let _ = writeln!(out, "No valid quote for '{}' on {}.", product.name, day);
                self.render_rejected(&mut out, rejected);
            }
            ProductOutcome::Priced {
                product,
                prescription,
                ranking,
                rejected,
            } => {
                let _ = writeln!(
                    out,
                    "For '{}' ({:.2} {}):",
                    product.name, prescription.required_quantity, prescription.required_unit
                );
                for entry in ranking {
                    self.render_ranked(&mut out, entry);
                }
                self.render_rejected(&mut out, rejected);
            }
        }

        out
    }

    fn render_ranked(&self, out: &mut String, entry: &RankedQuote) {
        let CostedQuote {
            quote,
            store,
            total_cost,
            ..
        } = &entry.costed;
        let symbol = &self.currency_symbol;

        let _ = writeln!(
            out,
            "  #{} {}: Store '{}' ({}) - Total cost: {} {:.2}",
            entry.rank, entry.standing, store.name, store.address, symbol, total_cost
        );
        let _ = writeln!(
            out,
            "    Details: Price {} {:.2} per {:.2} {} (Conv: {:.2}) on {}",
            symbol,
            quote.price,
            quote.packaging_size,
            quote.packaging_unit,
            quote.conversion_factor,
            quote.date.format(DATE_FORMAT)
        );
    }

    fn render_rejected(&self, out: &mut String, rejected: &[RejectedQuote]) {
        for entry in rejected {
            let _ = writeln!(
                out,
                "  Ignored: quote #{} from store '{}': {}",
                entry.quote.id, entry.store.name, entry.reason
            );
        }
    }
}
