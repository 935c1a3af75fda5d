use serde::{Deserialize, Serialize};
use ts_rs::TS;

use parkcheck_core::models::reading::{ClinicalForm, ClinicalReading};

use crate::error::ValidationError;
use crate::scoring::ValueRange;

/// One of the ten clinical data form fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FieldId {
    Ppe,
    Fo,
    Flo,
    Ddp,
    JitterAbs,
    Spread1,
    Spread2,
    Fhi,
    Nhr,
    Apq5,
}

impl FieldId {
    /// All fields in the order they are parsed and range-checked.
    pub const ALL: [FieldId; 10] = [
        FieldId::Ppe,
        FieldId::Fo,
        FieldId::Flo,
        FieldId::Ddp,
        FieldId::JitterAbs,
        FieldId::Spread1,
        FieldId::Spread2,
        FieldId::Fhi,
        FieldId::Nhr,
        FieldId::Apq5,
    ];

    /// Key used in form bodies.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Ppe => "ppe",
            Self::Fo => "fo",
            Self::Flo => "flo",
            Self::Ddp => "ddp",
            Self::JitterAbs => "jitter_abs",
            Self::Spread1 => "spread1",
            Self::Spread2 => "spread2",
            Self::Fhi => "fhi",
            Self::Nhr => "nhr",
            Self::Apq5 => "apq5",
        }
    }

    /// Label as printed on the form and in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ppe => "PPE",
            Self::Fo => "MDVP:Fo(Hz)",
            Self::Flo => "MDVP:Flo(Hz)",
            Self::Ddp => "Jitter:DDP",
            Self::JitterAbs => "MDVP:Jitter(Abs)",
            Self::Spread1 => "Spread1",
            Self::Spread2 => "Spread2",
            Self::Fhi => "MDVP:Fhi(Hz)",
            Self::Nhr => "NHR",
            Self::Apq5 => "Shimmer:APQ5",
        }
    }

    pub fn unit(&self) -> Option<&'static str> {
        match self {
            Self::Fo | Self::Flo | Self::Fhi => Some("Hz"),
            _ => None,
        }
    }

    pub(crate) fn unit_suffix(&self) -> String {
        self.unit().map(|u| format!(" {u}")).unwrap_or_default()
    }

    /// Clinically plausible closed interval for this field.
    pub fn range(&self) -> ValueRange {
        match self {
            Self::Ppe => ValueRange::new(0.0, 0.8),
            Self::Fo => ValueRange::new(60.0, 260.0),
            Self::Flo => ValueRange::new(60.0, 200.0),
            Self::Ddp => ValueRange::new(0.0, 0.03),
            Self::JitterAbs => ValueRange::new(0.0, 0.001),
            Self::Spread1 => ValueRange::new(-7.0, -1.0),
            Self::Spread2 => ValueRange::new(0.0, 0.5),
            Self::Fhi => ValueRange::new(100.0, 600.0),
            Self::Nhr => ValueRange::new(0.0, 0.6),
            Self::Apq5 => ValueRange::new(0.0, 0.05),
        }
    }
}

/// Field description for rendering the form.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldSpec {
    pub id: FieldId,
    pub key: String,
    pub label: String,
    pub unit: Option<String>,
    pub range: ValueRange,
}

/// Catalogue of every form field in form order.
pub fn field_specs() -> Vec<FieldSpec> {
    FieldId::ALL
        .iter()
        .map(|f| FieldSpec {
            id: *f,
            key: f.key().to_string(),
            label: f.label().to_string(),
            unit: f.unit().map(str::to_string),
            range: f.range(),
        })
        .collect()
}

/// Validate a submitted form.
///
/// Every field must parse as a number before any range is checked; ranges
/// are then checked in form order and the first violation is returned.
pub fn validate(form: &ClinicalForm) -> Result<ClinicalReading, ValidationError> {
    validate_values(form.values())
}

/// Validate raw field text given in form order (see [`FieldId::ALL`]).
pub fn validate_values(raw: [&str; 10]) -> Result<ClinicalReading, ValidationError> {
    let mut parsed = [0.0_f64; 10];
    for ((slot, text), field) in parsed.iter_mut().zip(raw).zip(FieldId::ALL) {
        *slot = text
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidNumberFormat { field })?;
    }

    for (value, field) in parsed.iter().zip(FieldId::ALL) {
        let range = field.range();
        if !range.contains(*value) {
            return Err(ValidationError::OutOfRange { field, range });
        }
    }

    let [ppe, fo, flo, ddp, jitter_abs, spread1, spread2, fhi, nhr, apq5] = parsed;
    Ok(ClinicalReading {
        ppe,
        fo,
        flo,
        ddp,
        jitter_abs,
        spread1,
        spread2,
        fhi,
        nhr,
        apq5,
    })
}
