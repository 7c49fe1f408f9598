//! Train domain model.
//!
//! # Responsibility
//! - Define the single persisted record for a train route offering.
//! - Provide the field-copy step used by wholesale updates.
//!
//! # Invariants
//! - `id` is assigned by the store and never changed afterwards.
//! - `discount_percentage` is a percentage in `0..=100`, not a fraction.
//! - `total_seats` is unsigned; capacity can never be negative.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned train identifier.
pub type TrainId = i64;

/// Errors returned when a train record violates write-path invariants.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainValidationError {
    /// A required text field is empty after trimming.
    BlankField(&'static str),
    /// Base price is negative, NaN or infinite.
    InvalidBasePrice(f64),
    /// Discount is outside `0..=100`, NaN or infinite.
    InvalidDiscountPercentage(f64),
}

impl Display for TrainValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::InvalidBasePrice(value) => {
                write!(f, "base_price ({value}) must be a finite value >= 0")
            }
            Self::InvalidDiscountPercentage(value) => write!(
                f,
                "discount_percentage ({value}) must be a finite value in 0..=100"
            ),
        }
    }
}

impl Error for TrainValidationError {}

/// A train route with pricing and capacity.
///
/// Serialized with camelCase keys (`basePrice`, `totalSeats`, ...) to match
/// the external record shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Train {
    /// `None` until the store assigns an identifier on first save.
    pub id: Option<TrainId>,
    pub name: String,
    /// Origin location name.
    pub source: String,
    /// Arrival location name.
    pub destination: String,
    pub base_price: f64,
    pub discount_percentage: f64,
    pub total_seats: u32,
}

impl Train {
    /// Creates a train that has not been persisted yet.
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
        base_price: f64,
        discount_percentage: f64,
        total_seats: u32,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            source: source.into(),
            destination: destination.into(),
            base_price,
            discount_percentage,
            total_seats,
        }
    }

    /// Returns this train with the given store identifier.
    pub fn with_id(mut self, id: TrainId) -> Self {
        self.id = Some(id);
        self
    }

    /// Copies every field except `id` from `replacement`.
    ///
    /// The receiver keeps its identity; the replacement's own `id`, if any,
    /// is ignored.
    pub fn overwrite_from(&mut self, replacement: &Train) {
        self.name.clone_from(&replacement.name);
        self.source.clone_from(&replacement.source);
        self.destination.clone_from(&replacement.destination);
        self.base_price = replacement.base_price;
        self.discount_percentage = replacement.discount_percentage;
        self.total_seats = replacement.total_seats;
    }

    /// Checks the invariants enforced on every persistence write.
    ///
    /// # Errors
    /// - `BlankField` for an empty `name`, `source` or `destination`.
    /// - `InvalidBasePrice` for a negative or non-finite price.
    /// - `InvalidDiscountPercentage` outside `0..=100` or non-finite.
    pub fn validate(&self) -> Result<(), TrainValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("source", &self.source),
            ("destination", &self.destination),
        ] {
            if value.trim().is_empty() {
                return Err(TrainValidationError::BlankField(field));
            }
        }

        if !self.base_price.is_finite() || self.base_price < 0.0 {
            return Err(TrainValidationError::InvalidBasePrice(self.base_price));
        }

        if !self.discount_percentage.is_finite()
            || !(0.0..=100.0).contains(&self.discount_percentage)
        {
            return Err(TrainValidationError::InvalidDiscountPercentage(
                self.discount_percentage,
            ));
        }

        Ok(())
    }

    /// Returns whether `term` occurs in name, source or destination,
    /// ignoring case. `term` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, term: &str) -> bool {
        [&self.name, &self.source, &self.destination]
            .into_iter()
            .any(|field| field.to_lowercase().contains(term))
    }
}
