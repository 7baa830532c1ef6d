//! Stock movements on an existing record.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockmerge_core::{DomainError, DomainResult};
use stockmerge_matching::Stocked;

use crate::record::{CatalogRecord, ensure_quantity};

/// Direction of a stock movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockDirection {
    /// Goods received ("entrada").
    #[serde(alias = "entrada")]
    Inbound,
    /// Goods consumed or withdrawn ("saída").
    #[serde(alias = "saida", alias = "saída")]
    Outbound,
}

impl FromStr for StockDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inbound" | "entrada" => Ok(Self::Inbound),
            "outbound" | "saida" | "saída" => Ok(Self::Outbound),
            other => Err(DomainError::validation(format!(
                "unknown stock direction: {other}"
            ))),
        }
    }
}

/// Move `delta` units in or out of `record`, returning the new quantity.
///
/// An outbound movement larger than the available quantity fails with
/// `InsufficientStock` and leaves the record untouched.
pub fn adjust(record: &mut CatalogRecord, delta: f64, direction: StockDirection) -> DomainResult<f64> {
    ensure_quantity("delta", delta)?;

    let available = record.quantity_available();
    let next = match direction {
        StockDirection::Inbound => available + delta,
        StockDirection::Outbound => {
            if delta > available {
                return Err(DomainError::insufficient_stock(available, delta));
            }
            available - delta
        }
    };

    record.set_quantity_available(next)?;

    tracing::debug!(
        record_id = %record.record_id(),
        ?direction,
        delta,
        quantity = next,
        "stock adjusted"
    );

    Ok(next)
}

/// Active records at or below their minimum threshold, in catalog order.
pub fn low_stock(catalog: &[CatalogRecord]) -> Vec<&CatalogRecord> {
    catalog.iter().filter(|r| r.is_low_stock()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PendingRecord;
    use proptest::prelude::*;
    use stockmerge_core::RecordId;

    fn record(qty: f64) -> CatalogRecord {
        CatalogRecord::new(RecordId::new(1), PendingRecord::new("Ácido Hialurônico", qty)).unwrap()
    }

    #[test]
    fn outbound_beyond_available_is_rejected_without_change() {
        let mut r = record(25.0);
        let err = adjust(&mut r, 30.0, StockDirection::Outbound).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock(25.0, 30.0));
        assert_eq!(r.quantity_available(), 25.0);
    }

    #[test]
    fn outbound_within_available_decrements() {
        let mut r = record(30.0);
        let qty = adjust(&mut r, 5.0, StockDirection::Outbound).unwrap();
        assert_eq!(qty, 25.0);
        assert_eq!(r.quantity_available(), 25.0);
    }

    #[test]
    fn outbound_of_everything_reaches_zero() {
        let mut r = record(4.5);
        assert_eq!(adjust(&mut r, 4.5, StockDirection::Outbound).unwrap(), 0.0);
    }

    #[test]
    fn inbound_always_increments() {
        let mut r = record(0.0);
        assert_eq!(adjust(&mut r, 12.5, StockDirection::Inbound).unwrap(), 12.5);
    }

    #[test]
    fn negative_or_nan_delta_is_a_validation_error() {
        let mut r = record(10.0);
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let err = adjust(&mut r, bad, StockDirection::Inbound).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
        assert_eq!(r.quantity_available(), 10.0);
    }

    #[test]
    fn direction_parses_portuguese_and_english() {
        assert_eq!("entrada".parse::<StockDirection>().unwrap(), StockDirection::Inbound);
        assert_eq!("Saída".parse::<StockDirection>().unwrap(), StockDirection::Outbound);
        assert_eq!("outbound".parse::<StockDirection>().unwrap(), StockDirection::Outbound);
        assert!("transfer".parse::<StockDirection>().is_err());
    }

    #[test]
    fn low_stock_lists_active_records_at_or_below_minimum() {
        let catalog = vec![
            CatalogRecord::new(RecordId::new(1), PendingRecord::new("Gaze", 1.0).with_minimum_threshold(5.0)).unwrap(),
            CatalogRecord::new(RecordId::new(2), PendingRecord::new("Luva", 50.0).with_minimum_threshold(5.0)).unwrap(),
            CatalogRecord::new(RecordId::new(3), PendingRecord::new("Soro", 5.0).with_minimum_threshold(5.0)).unwrap(),
            CatalogRecord::new(
                RecordId::new(4),
                PendingRecord::new("Antigo", 0.0).with_minimum_threshold(5.0).inactive(),
            )
            .unwrap(),
        ];
        let ids: Vec<u64> = low_stock(&catalog).iter().map(|r| r.record_id().get()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    proptest! {
        #[test]
        fn quantity_never_goes_negative(
            start in 0.0f64..1_000.0,
            moves in prop::collection::vec((0.0f64..500.0, any::<bool>()), 0..20),
        ) {
            let mut r = record(start);
            for (delta, inbound) in moves {
                let direction = if inbound { StockDirection::Inbound } else { StockDirection::Outbound };
                let before = r.quantity_available();
                match adjust(&mut r, delta, direction) {
                    Ok(_) => {}
                    Err(DomainError::InsufficientStock { .. }) => {
                        prop_assert_eq!(r.quantity_available(), before);
                    }
                    Err(other) => prop_assert!(false, "unexpected error: {other:?}"),
                }
                prop_assert!(r.quantity_available() >= 0.0);
            }
        }
    }
}
