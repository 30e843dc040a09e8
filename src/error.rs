use std::{error::Error as StdError, fmt, io};

use crate::scaling::inputs::Field;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    Missing,
    Unparsable(String),
    NotFinite,
    OutOfRange(f64),
}

/// One offending input field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    pub field: Field,
    pub kind: IssueKind,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (min, max) = self.field.range();
        match &self.kind {
            IssueKind::Missing => write!(f, "{} is missing", self.field.key()),
            IssueKind::Unparsable(raw) => {
                write!(f, "{} has an invalid number format: {:?}", self.field.key(), raw)
            }
            IssueKind::NotFinite => write!(f, "{} must be a finite number", self.field.key()),
            IssueKind::OutOfRange(v) => write!(
                f,
                "{} = {} is outside [{}, {}] {}",
                self.field.key(),
                v,
                min,
                max,
                self.field.unit()
            ),
        }
    }
}

/// All field problems found in one pass. Never empty when returned as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid parameters:")?;
        for issue in &self.issues {
            write!(f, "\n  - {}", issue)?;
        }
        Ok(())
    }
}

impl StdError for ValidationError {}

// ---------------------------------------------------------------------------
// Scaling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ScalingError {
    Invalid(ValidationError),
    NonPositiveMass { mass_unit: f64 },
    InvalidRadius { radius: f64 },
}

impl fmt::Display for ScalingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalingError::Invalid(e) => write!(f, "{}", e),
            ScalingError::NonPositiveMass { mass_unit } => write!(
                f,
                "central body mass must be significantly positive (got {:e} kg)",
                mass_unit
            ),
            ScalingError::InvalidRadius { radius } => write!(
                f,
                "central body radius must be positive and finite (got {})",
                radius
            ),
        }
    }
}

impl StdError for ScalingError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ScalingError::Invalid(e) => Some(e),
            ScalingError::NonPositiveMass { .. } | ScalingError::InvalidRadius { .. } => None,
        }
    }
}

impl From<ValidationError> for ScalingError {
    fn from(err: ValidationError) -> Self {
        ScalingError::Invalid(err)
    }
}

/// Recoverable degenerate cases; the scaler substitutes a safe value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalingWarning {
    /// length/time unit ratio near zero; initial velocity set to 0.
    DegenerateVelocity,
    /// dt near zero; the fallback step count was used.
    DegenerateStep,
}

impl fmt::Display for ScalingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalingWarning::DegenerateVelocity => {
                write!(f, "characteristic velocity is near zero; initial velocity set to 0")
            }
            ScalingWarning::DegenerateStep => {
                write!(f, "time step is too small or zero; using the fallback step count")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Crate error
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Csv(csv::Error),
    Validation(ValidationError),
    Scaling(ScalingError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Csv(e) => write!(f, "CSV error: {}", e),
            Error::Validation(e) => write!(f, "{}", e),
            Error::Scaling(e) => write!(f, "scaling failed: {}", e),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Csv(e) => Some(e),
            Error::Validation(e) => Some(e),
            Error::Scaling(e) => Some(e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation(err)
    }
}

impl From<ScalingError> for Error {
    fn from(err: ScalingError) -> Self {
        Error::Scaling(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
