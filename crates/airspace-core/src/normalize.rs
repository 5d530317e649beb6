//! Conversion of raw upstream records into [`PositionedEntity`] values.
//!
//! Upstream feeds deliver positional JSON arrays whose field order differs per
//! source. A [`FieldMapping`] names the role of each position once; everything
//! past this module only sees typed entities.

use serde_json::Value;

use crate::error::{MalformedRecord, MappingError};
use crate::metrics::{NoopMetrics, RiskMetrics};
use crate::models::{clean_label, PositionedEntity, UNKNOWN_LABEL};

/// Role of one positional field in a raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Latitude,
    Longitude,
    Altitude,
    Label,
    /// Present but unused
    Skip,
}

/// How record length is checked against the mapped roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Record length must equal the number of roles.
    Exact,
    /// Record may carry unmapped trailing fields.
    AtLeast,
}

/// Per-source field layout, resolved to positional indices at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    roles: Vec<FieldRole>,
    arity: Arity,
    latitude: usize,
    longitude: usize,
    altitude: usize,
    label: Option<usize>,
}

impl FieldMapping {
    pub fn new(roles: Vec<FieldRole>, arity: Arity) -> Result<Self, MappingError> {
        let latitude = position_of(&roles, FieldRole::Latitude, "latitude")?
            .ok_or(MappingError::MissingRole("latitude"))?;
        let longitude = position_of(&roles, FieldRole::Longitude, "longitude")?
            .ok_or(MappingError::MissingRole("longitude"))?;
        let altitude = position_of(&roles, FieldRole::Altitude, "altitude")?
            .ok_or(MappingError::MissingRole("altitude"))?;
        let label = position_of(&roles, FieldRole::Label, "label")?;

        Ok(Self {
            roles,
            arity,
            latitude,
            longitude,
            altitude,
            label,
        })
    }

    /// Mapping for records that are exactly `roles` long.
    pub fn exact(roles: Vec<FieldRole>) -> Result<Self, MappingError> {
        Self::new(roles, Arity::Exact)
    }

    /// Mapping for records that may carry extra fields after `roles`.
    pub fn with_trailing(roles: Vec<FieldRole>) -> Result<Self, MappingError> {
        Self::new(roles, Arity::AtLeast)
    }

    pub fn roles(&self) -> &[FieldRole] {
        &self.roles
    }

    fn accepts_len(&self, len: usize) -> bool {
        match self.arity {
            Arity::Exact => len == self.roles.len(),
            Arity::AtLeast => len >= self.roles.len(),
        }
    }
}

/// Multiplier turning a source altitude unit into meters.
///
/// Always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitScale(f64);

impl UnitScale {
    pub const METERS: UnitScale = UnitScale(1.0);
    pub const KILOMETERS: UnitScale = UnitScale(1000.0);

    pub fn new(factor: f64) -> Result<Self, MappingError> {
        if factor.is_finite() && factor > 0.0 {
            Ok(Self(factor))
        } else {
            Err(MappingError::InvalidUnitScale(factor))
        }
    }

    pub fn factor(self) -> f64 {
        self.0
    }
}

fn position_of(
    roles: &[FieldRole],
    role: FieldRole,
    name: &'static str,
) -> Result<Option<usize>, MappingError> {
    let mut positions = roles
        .iter()
        .enumerate()
        .filter(|(_, r)| **r == role)
        .map(|(idx, _)| idx);
    let first = positions.next();
    if positions.next().is_some() {
        return Err(MappingError::DuplicateRole(name));
    }
    Ok(first)
}

/// Normalize raw records, dropping malformed ones.
///
/// `unit_scale` multiplies the altitude field ([`UnitScale::KILOMETERS`]
/// turns km into m).
pub fn normalize(
    raw_records: &[Value],
    mapping: &FieldMapping,
    unit_scale: UnitScale,
) -> Vec<PositionedEntity> {
    normalize_with_metrics(raw_records, mapping, unit_scale, &NoopMetrics)
}

/// Same as [`normalize`], reporting the dropped count to `metrics`.
pub fn normalize_with_metrics(
    raw_records: &[Value],
    mapping: &FieldMapping,
    unit_scale: UnitScale,
    metrics: &dyn RiskMetrics,
) -> Vec<PositionedEntity> {
    let entities: Vec<PositionedEntity> = raw_records
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| match extract(record, mapping, unit_scale) {
            Ok(entity) => Some(entity),
            Err(reason) => {
                tracing::trace!("dropping record {}: {}", idx, reason);
                None
            }
        })
        .collect();

    let dropped = raw_records.len() - entities.len();
    if dropped > 0 {
        metrics.records_dropped(dropped);
    }
    tracing::debug!(
        "normalized {} of {} records ({} dropped)",
        entities.len(),
        raw_records.len(),
        dropped
    );

    entities
}

fn extract(
    record: &Value,
    mapping: &FieldMapping,
    unit_scale: UnitScale,
) -> Result<PositionedEntity, MalformedRecord> {
    let fields = record.as_array().ok_or(MalformedRecord::NotArray)?;
    if !mapping.accepts_len(fields.len()) {
        return Err(MalformedRecord::Arity {
            found: fields.len(),
        });
    }

    let latitude = finite_field(fields, mapping.latitude, "latitude")?;
    let longitude = finite_field(fields, mapping.longitude, "longitude")?;
    let altitude = finite_field(fields, mapping.altitude, "altitude")? * unit_scale.factor();

    if !altitude.is_finite() {
        return Err(MalformedRecord::NonFinite("altitude"));
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(MalformedRecord::OutOfRange("latitude"));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(MalformedRecord::OutOfRange("longitude"));
    }

    let label = match mapping.label {
        Some(idx) => clean_label(fields.get(idx).and_then(Value::as_str)),
        None => UNKNOWN_LABEL.to_string(),
    };

    Ok(PositionedEntity {
        latitude,
        longitude,
        altitude,
        label,
    })
}

fn finite_field(fields: &[Value], idx: usize, name: &'static str) -> Result<f64, MalformedRecord> {
    let value = fields
        .get(idx)
        .and_then(Value::as_f64)
        .ok_or(MalformedRecord::NonNumeric(name))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MalformedRecord::NonFinite(name))
    }
}
