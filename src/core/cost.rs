//! Normalizes package pricing to a cost per standard unit.

use crate::domain::model::Quote;
use crate::utils::error::{RankerError, Result};

/// `price / (packaging_size * conversion_factor)`.
///
/// Fails with [`RankerError::DegenerateCost`] when the package size or the
/// conversion factor is not a positive finite number, or when the result is
/// not finite.
pub fn unit_cost(quote: &Quote) -> Result<f64> {
    if !quote.packaging_size.is_finite() || quote.packaging_size <= 0.0 {
        let reason = if quote.packaging_size == 0.0 {
            "packaging size is zero".to_string()
        } else {
            format!("packaging size {} is not positive", quote.packaging_size)
        };
        return Err(degenerate(quote, reason));
    }
    if !quote.conversion_factor.is_finite() || quote.conversion_factor <= 0.0 {
        let reason = if quote.conversion_factor == 0.0 {
            "conversion factor is zero".to_string()
        } else {
            format!(
                "conversion factor {} is not positive",
                quote.conversion_factor
            )
        };
        return Err(degenerate(quote, reason));
    }

    let cost = quote.price / (quote.packaging_size * quote.conversion_factor);
    if !cost.is_finite() {
        return Err(degenerate(
            quote,
            format!("unit cost is not finite (price {})", quote.price),
        ));
    }
    Ok(cost)
}

/// Unit cost scaled to the quantity a prescription asks for.
pub fn total_cost(quote: &Quote, required_quantity: f64) -> Result<f64> {
    quote_costs(quote, required_quantity).map(|(_, total)| total)
}

/// Unit cost and total cost together, normalizing the quote once.
pub fn quote_costs(quote: &Quote, required_quantity: f64) -> Result<(f64, f64)> {
    let unit = unit_cost(quote)?;
    let total = unit * required_quantity;
    if !total.is_finite() {
        return Err(degenerate(
            quote,
            format!("total cost for {} units is not finite", required_quantity),
        ));
    }
    Ok((unit, total))
}

fn degenerate(quote: &Quote, reason: String) -> RankerError {
    RankerError::DegenerateCost {
        quote_id: quote.id,
        reason,
    }
}
