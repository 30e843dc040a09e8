use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{FieldIssue, IssueKind, ValidationError};

// ---------------------------------------------------------------------------
// Input fields
// ---------------------------------------------------------------------------

/// One physical input, named by its parameter-file key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    SatelliteMassKg,
    CentralMassFactor,
    VelocityMps,
    DurationDays,
    DragCoeff,
    ThrustCoeff,
}

impl Field {
    /// Canonical order, also the order of lines in a parameter file.
    pub const ALL: [Field; 6] = [
        Field::SatelliteMassKg,
        Field::CentralMassFactor,
        Field::VelocityMps,
        Field::DurationDays,
        Field::DragCoeff,
        Field::ThrustCoeff,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Field::SatelliteMassKg => "m_satellite_kg",
            Field::CentralMassFactor => "M_central_body_factor",
            Field::VelocityMps => "V0_m_per_s",
            Field::DurationDays => "T_days",
            Field::DragCoeff => "k_coeff",
            Field::ThrustCoeff => "F_coeff",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Inclusive accepted range.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Field::SatelliteMassKg => (0.1, 100_000.0),
            Field::CentralMassFactor => (0.1, 100_000.0),
            Field::VelocityMps => (0.0, 1000.0),
            Field::DurationDays => (1.0, 10_000_000.0),
            Field::DragCoeff => (0.0, 2.0),
            Field::ThrustCoeff => (0.0, 2.0),
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Field::SatelliteMassKg => "kg",
            Field::CentralMassFactor => "x 1e25 kg",
            Field::VelocityMps => "m/s",
            Field::DurationDays => "days",
            Field::DragCoeff | Field::ThrustCoeff => "",
        }
    }

    fn check(&self, value: f64) -> Option<IssueKind> {
        let (min, max) = self.range();
        if !value.is_finite() {
            Some(IssueKind::NotFinite)
        } else if value < min || value > max {
            Some(IssueKind::OutOfRange(value))
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Physical inputs
// ---------------------------------------------------------------------------

/// User-facing quantities in SI units (plus the 1e25 kg mass factor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalInputs {
    pub m_satellite_kg: f64,
    pub m_central_body_factor: f64,
    pub v0_m_per_s: f64,
    pub t_days: f64,
    pub k_coeff: f64,
    pub f_coeff: f64,
}

impl PhysicalInputs {
    /// Near-circular orbit at the reference distance, about one revolution,
    /// no perturbation.
    pub fn reference() -> Self {
        Self {
            m_satellite_kg: 1000.0,
            m_central_body_factor: 1.0,
            v0_m_per_s: 66.0,
            t_days: 170_000.0,
            k_coeff: 0.0,
            f_coeff: 0.0,
        }
    }

    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::SatelliteMassKg => self.m_satellite_kg,
            Field::CentralMassFactor => self.m_central_body_factor,
            Field::VelocityMps => self.v0_m_per_s,
            Field::DurationDays => self.t_days,
            Field::DragCoeff => self.k_coeff,
            Field::ThrustCoeff => self.f_coeff,
        }
    }

    fn set(&mut self, field: Field, value: f64) {
        match field {
            Field::SatelliteMassKg => self.m_satellite_kg = value,
            Field::CentralMassFactor => self.m_central_body_factor = value,
            Field::VelocityMps => self.v0_m_per_s = value,
            Field::DurationDays => self.t_days = value,
            Field::DragCoeff => self.k_coeff = value,
            Field::ThrustCoeff => self.f_coeff = value,
        }
    }

    /// Check every field against its range; all failures are reported together.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let issues: Vec<FieldIssue> = Field::ALL
            .iter()
            .filter_map(|&field| field.check(self.get(field)).map(|kind| FieldIssue { field, kind }))
            .collect();

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Parse raw text values keyed by parameter-file key, then validate.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let mut inputs = PhysicalInputs {
            m_satellite_kg: 0.0,
            m_central_body_factor: 0.0,
            v0_m_per_s: 0.0,
            t_days: 0.0,
            k_coeff: 0.0,
            f_coeff: 0.0,
        };
        let mut issues = Vec::new();

        for field in Field::ALL {
            let Some(raw) = fields.get(field.key()) else {
                issues.push(FieldIssue { field, kind: IssueKind::Missing });
                continue;
            };
            match raw.trim().parse::<f64>() {
                Ok(value) => match field.check(value) {
                    Some(kind) => issues.push(FieldIssue { field, kind }),
                    None => inputs.set(field, value),
                },
                Err(_) => issues.push(FieldIssue {
                    field,
                    kind: IssueKind::Unparsable(raw.clone()),
                }),
            }
        }

        if issues.is_empty() {
            Ok(inputs)
        } else {
            Err(ValidationError { issues })
        }
    }
}
