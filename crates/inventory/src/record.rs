use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockmerge_core::{DomainError, DomainResult, Entity, RecordId};
use stockmerge_matching::{Named, Stocked};

/// Default unit of measure ("unidade").
pub const DEFAULT_UNIT: &str = "un";

/// Entity: one inventory item in a catalog.
///
/// `quantity_available` is never negative; every mutation path checks it.
/// The canonical name is not stored, see [`Named::canonical_name`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogRecordRow")]
pub struct CatalogRecord {
    id: RecordId,
    raw_name: String,
    description: Option<String>,
    quantity_available: f64,
    unit: String,
    unit_price: f64,
    minimum_threshold: f64,
    active: bool,
    registered_at: DateTime<Utc>,
}

impl CatalogRecord {
    /// Materialize a record the store has assigned `id` to.
    pub fn new(id: RecordId, fields: PendingRecord) -> DomainResult<Self> {
        fields.validate()?;
        Ok(Self {
            id,
            raw_name: fields.raw_name,
            description: fields.description,
            quantity_available: fields.quantity_available,
            unit: fields.unit,
            unit_price: fields.unit_price,
            minimum_threshold: fields.minimum_threshold,
            active: fields.active,
            registered_at: fields.registered_at,
        })
    }

    pub fn record_id(&self) -> RecordId {
        self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn minimum_threshold(&self) -> f64 {
        self.minimum_threshold
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// At or below the reorder point (inactive records never are).
    pub fn is_low_stock(&self) -> bool {
        self.active && self.quantity_available <= self.minimum_threshold
    }

    /// Overwrite the on-hand quantity, e.g. when applying a merge decision.
    ///
    /// Rejects negative or non-finite values and leaves the record unchanged.
    pub fn set_quantity_available(&mut self, quantity: f64) -> DomainResult<()> {
        ensure_quantity("quantity_available", quantity)
            .map_err(|_| DomainError::invariant(format!("quantity cannot become {quantity}")))?;
        self.quantity_available = quantity;
        Ok(())
    }
}

impl Entity for CatalogRecord {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Named for CatalogRecord {
    fn raw_name(&self) -> &str {
        &self.raw_name
    }
}

impl Stocked for CatalogRecord {
    fn quantity_available(&self) -> f64 {
        self.quantity_available
    }
}

/// Every field of a record except its id, which the store assigns.
///
/// This is what a `Create` decision carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRecord {
    pub raw_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity_available: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub minimum_threshold: f64,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub registered_at: DateTime<Utc>,
}

impl PendingRecord {
    pub fn new(raw_name: impl Into<String>, quantity_available: f64) -> Self {
        Self {
            raw_name: raw_name.into(),
            description: None,
            quantity_available,
            unit: DEFAULT_UNIT.to_string(),
            unit_price: 0.0,
            minimum_threshold: 0.0,
            active: true,
            registered_at: DateTime::<Utc>::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_unit_price(mut self, unit_price: f64) -> Self {
        self.unit_price = unit_price;
        self
    }

    pub fn with_minimum_threshold(mut self, minimum_threshold: f64) -> Self {
        self.minimum_threshold = minimum_threshold;
        self
    }

    pub fn with_registered_at(mut self, registered_at: DateTime<Utc>) -> Self {
        self.registered_at = registered_at;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        ensure_name(self)?;
        ensure_quantity("quantity_available", self.quantity_available)?;
        ensure_quantity("unit_price", self.unit_price)?;
        ensure_quantity("minimum_threshold", self.minimum_threshold)?;
        Ok(())
    }
}

impl Named for PendingRecord {
    fn raw_name(&self) -> &str {
        &self.raw_name
    }
}

/// Command payload: an incoming inventory entry to merge or create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub raw_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub minimum_threshold: f64,
    pub occurred_at: DateTime<Utc>,
}

impl NewEntry {
    pub fn new(raw_name: impl Into<String>, quantity: f64, occurred_at: DateTime<Utc>) -> Self {
        Self {
            raw_name: raw_name.into(),
            description: None,
            quantity,
            unit: DEFAULT_UNIT.to_string(),
            unit_price: 0.0,
            minimum_threshold: 0.0,
            occurred_at,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_unit_price(mut self, unit_price: f64) -> Self {
        self.unit_price = unit_price;
        self
    }

    pub fn with_minimum_threshold(mut self, minimum_threshold: f64) -> Self {
        self.minimum_threshold = minimum_threshold;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        ensure_name(self)?;
        ensure_quantity("quantity", self.quantity)?;
        ensure_quantity("unit_price", self.unit_price)?;
        ensure_quantity("minimum_threshold", self.minimum_threshold)?;
        Ok(())
    }

    /// Fresh, active record built from this entry.
    pub fn to_pending_record(&self) -> PendingRecord {
        PendingRecord {
            raw_name: self.raw_name.clone(),
            description: self.description.clone(),
            quantity_available: self.quantity,
            unit: self.unit.clone(),
            unit_price: self.unit_price,
            minimum_threshold: self.minimum_threshold,
            active: true,
            registered_at: self.occurred_at,
        }
    }
}

impl Named for NewEntry {
    fn raw_name(&self) -> &str {
        &self.raw_name
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRecordRow {
    id: RecordId,
    #[serde(flatten)]
    fields: PendingRecord,
}

impl TryFrom<CatalogRecordRow> for CatalogRecord {
    type Error = DomainError;

    fn try_from(row: CatalogRecordRow) -> Result<Self, Self::Error> {
        CatalogRecord::new(row.id, row.fields)
    }
}

/// A name must keep at least one letter or digit once canonicalized;
/// otherwise it can never match anything, itself included.
fn ensure_name(named: &impl Named) -> DomainResult<()> {
    if named.canonical_name().is_empty() {
        return Err(DomainError::validation(format!(
            "name must contain at least one letter or digit (got '{}')",
            named.raw_name()
        )));
    }
    Ok(())
}

pub(crate) fn ensure_quantity(field: &str, value: f64) -> DomainResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(format!(
            "{field} must be a finite, non-negative number (got {value})"
        )));
    }
    Ok(())
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_rejects_negative_quantity() {
        let err = CatalogRecord::new(RecordId::new(1), PendingRecord::new("Gaze", -1.0)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn new_record_rejects_blank_name() {
        let err = CatalogRecord::new(RecordId::new(1), PendingRecord::new("  ", 1.0)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn names_without_letters_or_digits_are_rejected() {
        for raw in ["###", "---", "(!)"] {
            let err = PendingRecord::new(raw, 1.0).validate().unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{raw}: {err:?}");
            let err = NewEntry::new(raw, 1.0, Utc::now()).validate().unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{raw}: {err:?}");
        }
        assert!(NewEntry::new("Agulha 30G", 1.0, Utc::now()).validate().is_ok());
    }

    #[test]
    fn canonical_name_is_derived_from_raw_name() {
        let record =
            CatalogRecord::new(RecordId::new(1), PendingRecord::new("Ácido Hialurônico", 5.0)).unwrap();
        assert_eq!(record.canonical_name().as_str(), "acido hialuronico");
        assert_eq!(record.raw_name(), "Ácido Hialurônico");
    }

    #[test]
    fn low_stock_requires_active_record() {
        let low = CatalogRecord::new(
            RecordId::new(1),
            PendingRecord::new("Gaze", 2.0).with_minimum_threshold(2.0),
        )
        .unwrap();
        assert!(low.is_low_stock());

        let inactive = CatalogRecord::new(
            RecordId::new(2),
            PendingRecord::new("Gaze", 2.0).with_minimum_threshold(5.0).inactive(),
        )
        .unwrap();
        assert!(!inactive.is_low_stock());
    }

    #[test]
    fn set_quantity_refuses_negative_values() {
        let mut record = CatalogRecord::new(RecordId::new(1), PendingRecord::new("Gaze", 3.0)).unwrap();
        let err = record.set_quantity_available(-0.5).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(record.quantity_available(), 3.0);
    }

    #[test]
    fn deserialization_applies_defaults_and_validation() {
        let record: CatalogRecord =
            serde_json::from_str(r#"{"id": 4, "raw_name": "Botox", "quantity_available": 2.5}"#).unwrap();
        assert_eq!(record.record_id(), RecordId::new(4));
        assert_eq!(record.unit(), DEFAULT_UNIT);
        assert!(record.is_active());

        let bad = serde_json::from_str::<CatalogRecord>(
            r#"{"id": 4, "raw_name": "Botox", "quantity_available": -1}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn entry_becomes_active_pending_record() {
        let at = Utc::now();
        let entry = NewEntry::new("Botox Novo", 2.0, at)
            .with_unit("fr")
            .with_unit_price(900.0);
        let pending = entry.to_pending_record();
        assert_eq!(pending.raw_name, "Botox Novo");
        assert_eq!(pending.quantity_available, 2.0);
        assert_eq!(pending.unit, "fr");
        assert!(pending.active);
        assert_eq!(pending.registered_at, at);
    }
}
