//! Winner selection and full ranking over the quotes of one product.

use crate::core::cost::quote_costs;
use crate::domain::model::{CostedQuote, RankedQuote, RejectedQuote, Standing, StoreQuote};
use crate::utils::error::RankerError;

/// Quotes split into those with a usable cost and those without.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Costing {
    pub costed: Vec<CostedQuote>,
    pub rejected: Vec<RejectedQuote>,
}

/// Costs every candidate against `required_quantity`, keeping input order in
/// both halves.
pub fn cost_candidates(quotes: Vec<StoreQuote>, required_quantity: f64) -> Costing {
    let mut costing = Costing::default();

    for StoreQuote { quote, store } in quotes {
        match quote_costs(&quote, required_quantity) {
            Ok((unit_cost, total_cost)) => costing.costed.push(CostedQuote {
                quote,
                store,
                unit_cost,
                total_cost,
            }),
            Err(e) => {
                tracing::debug!("Setting aside quote #{}: {}", quote.id, e);
                let reason = match e {
                    RankerError::DegenerateCost { reason, .. } => reason,
                    other => other.to_string(),
                };
                costing.rejected.push(RejectedQuote {
                    quote,
                    store,
                    reason,
                });
            }
        }
    }

    costing
}

/// The quote with the strictly lowest total cost; the earliest one wins ties.
pub fn select_winner(costed: &[CostedQuote]) -> Option<&CostedQuote> {
    let mut best: Option<&CostedQuote> = None;
    for candidate in costed {
        match best {
            Some(current) if candidate.total_cost >= current.total_cost => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// Orders quotes by ascending total cost. The sort is stable, so equal costs
/// keep their input order. The first entry is the winner.
pub fn rank(mut costed: Vec<CostedQuote>) -> Vec<RankedQuote> {
    costed.sort_by(|a, b| a.total_cost.total_cmp(&b.total_cost));

    costed
        .into_iter()
        .enumerate()
        .map(|(idx, costed)| RankedQuote {
            rank: idx + 1,
            standing: if idx == 0 {
                Standing::Winner
            } else {
                Standing::Loser
            },
            costed,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Quote, Store};
    use chrono::NaiveDate;

    fn store_quote(id: u32, store: &str, price: f64, packaging_size: f64) -> StoreQuote {
        StoreQuote {
            quote: Quote {
                id,
                product_id: 1,
                store_id: id,
                price,
                packaging_size,
                packaging_unit: "KG".to_string(),
                conversion_factor: 1.0,
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            },
            store: Store {
                id,
                name: store.to_string(),
                address: format!("{} road", store),
                phone: String::new(),
            },
        }
    }

    #[test]
    fn test_select_winner_picks_minimum() {
        let costing = cost_candidates(
            vec![
                store_quote(1, "Farm1", 50.0, 25.0),
                store_quote(2, "Farm2", 90.0, 50.0),
            ],
            100.0,
        );
        let winner = select_winner(&costing.costed).unwrap();
        assert_eq!(winner.store.name, "Farm2");
        assert!((winner.total_cost - 180.0).abs() < 1e-9);
        assert!((winner.unit_cost - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_select_winner_first_wins_ties() {
        let costing = cost_candidates(
            vec![
                store_quote(1, "Early", 20.0, 10.0),
                store_quote(2, "Late", 40.0, 20.0),
            ],
            10.0,
        );
        assert_eq!(select_winner(&costing.costed).unwrap().store.name, "Early");
    }

    #[test]
    fn test_select_winner_is_idempotent() {
        let costing = cost_candidates(
            vec![
                store_quote(1, "A", 30.0, 10.0),
                store_quote(2, "B", 25.0, 10.0),
                store_quote(3, "C", 25.0, 10.0),
            ],
            5.0,
        );
        let first = select_winner(&costing.costed).cloned();
        let second = select_winner(&costing.costed).cloned();
        assert_eq!(first, second);
        assert_eq!(first.unwrap().quote.id, 2);
    }

    #[test]
    fn test_select_winner_empty() {
        assert!(select_winner(&[]).is_none());
    }

    #[test]
    fn test_rank_is_ascending_and_stable() {
        let costing = cost_candidates(
            vec![
                store_quote(1, "Pricey", 100.0, 10.0),
                store_quote(2, "TieA", 50.0, 10.0),
                store_quote(3, "Cheap", 10.0, 10.0),
                store_quote(4, "TieB", 50.0, 10.0),
                store_quote(5, "TieC", 25.0, 5.0),
            ],
            1.0,
        );
        let ranked = rank(costing.costed);
        let order: Vec<&str> = ranked.iter().map(|r| r.costed.store.name.as_str()).collect();
        assert_eq!(order, vec!["Cheap", "TieA", "TieB", "TieC", "Pricey"]);

        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].standing, Standing::Winner);
        assert!(ranked[1..].iter().all(|r| r.standing == Standing::Loser));
        assert_eq!(ranked[4].rank, 5);
    }

    #[test]
    fn test_rank_winner_matches_selector() {
        let costing = cost_candidates(
            vec![
                store_quote(1, "A", 12.0, 3.0),
                store_quote(2, "B", 8.0, 2.0),
                store_quote(3, "C", 9.0, 2.0),
            ],
            7.0,
        );
        let selected = select_winner(&costing.costed).cloned().unwrap();
        let ranked = rank(costing.costed);
        assert_eq!(ranked[0].costed, selected);
    }

    #[test]
    fn test_degenerate_quotes_are_set_aside() {
        let costing = cost_candidates(
            vec![
                store_quote(1, "Broken", 10.0, 0.0),
                store_quote(2, "Fine", 10.0, 5.0),
            ],
            10.0,
        );
        assert_eq!(costing.costed.len(), 1);
        assert_eq!(costing.rejected.len(), 1);
        assert_eq!(costing.rejected[0].store.name, "Broken");
        assert_eq!(costing.rejected[0].reason, "packaging size is zero");
    }

    #[test]
    fn test_negative_size_and_factor_never_win() {
        let mut inverted = store_quote(1, "Inverted", 10.0, -25.0);
        inverted.quote.conversion_factor = -1.0;
        let costing = cost_candidates(vec![inverted, store_quote(2, "Fine", 90.0, 50.0)], 100.0);

        assert_eq!(costing.rejected.len(), 1);
        assert_eq!(costing.rejected[0].store.name, "Inverted");
        assert_eq!(select_winner(&costing.costed).unwrap().store.name, "Fine");
    }
}
