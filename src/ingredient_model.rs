//! # Ingredient and Unit Data Model
//!
//! This module defines the data structures shared by the normalizer and the
//! pantry match calculator: canonical ingredient tokens, measurement units,
//! and the raw recipe/pantry ingredient shapes received from upstream storage.
//!
//! ## Core Concepts
//!
//! - **IngredientToken**: the canonical identity of an ingredient after
//!   normalization (e.g. "chicken breast" regardless of how the user typed it)
//! - **Unit**: a measurement unit that knows its category and its linear
//!   conversion factor to the category base unit
//! - **UnitCategory**: liquid (base ml), weight (base g), count (base units),
//!   or other (pinches, dashes, unconvertible measures)
//!
//! ## Usage
//!
//! ```rust
//! use discovery::ingredient_model::{Unit, UnitCategory};
//!
//! // Liters convert linearly to the liquid base unit (ml)
//! assert_eq!(Unit::Liters.category(), UnitCategory::Liquid);
//! assert_eq!(Unit::Liters.base_factor(), 1000.0);
//!
//! // Units in different categories are never auto-convertible
//! assert_ne!(Unit::Liters.category(), Unit::Grams.category());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Measurement category a unit belongs to
///
/// Conversion is only defined between units of the same category; the
/// normalizer treats cross-category quantities as incompatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    /// Volume measurements, base unit milliliters
    Liquid,
    /// Mass measurements, base unit grams
    Weight,
    /// Discrete items, base unit "units"
    Count,
    /// Small or unconvertible measures (pinches, dashes)
    Other,
}

/// Measurement units with category and base-unit conversion support
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Unit {
    // Volume units
    /// Teaspoons (~5 ml)
    Teaspoons,
    /// Tablespoons (~15 ml)
    Tablespoons,
    /// Fluid ounces (~30 ml)
    FluidOunces,
    /// Cups (~240 ml)
    Cups,
    /// Pints (~473 ml)
    Pints,
    /// Quarts (~946 ml)
    Quarts,
    /// Gallons (~3785 ml)
    Gallons,
    /// Milliliters (liquid base unit)
    Milliliters,
    /// Liters
    Liters,

    // Weight units
    /// Ounces (~28.35 g)
    Ounces,
    /// Pounds (~453.6 g)
    Pounds,
    /// Grams (weight base unit)
    Grams,
    /// Kilograms
    Kilograms,

    // Count units
    /// Individual items (count base unit)
    Units,
    /// Dozen (12 units)
    Dozen,
    /// Cloves (for garlic)
    Cloves,
    /// Packages/containers
    Packages,
    /// Cans
    Cans,
    /// Bottles
    Bottles,

    // Unconvertible measures
    /// Pinches (very small amounts)
    Pinches,
    /// Dashes (small amounts)
    Dashes,

    /// Unrecognized unit string, preserved for logging
    Unknown(String),
}

impl Unit {
    /// Category this unit belongs to
    ///
    /// Unknown units are treated as count so that discovery can degrade to
    /// presence-only matching instead of rejecting the entry.
    pub fn category(&self) -> UnitCategory {
        match self {
            Unit::Teaspoons
            | Unit::Tablespoons
            | Unit::FluidOunces
            | Unit::Cups
            | Unit::Pints
            | Unit::Quarts
            | Unit::Gallons
            | Unit::Milliliters
            | Unit::Liters => UnitCategory::Liquid,
            Unit::Ounces | Unit::Pounds | Unit::Grams | Unit::Kilograms => UnitCategory::Weight,
            Unit::Units
            | Unit::Dozen
            | Unit::Cloves
            | Unit::Packages
            | Unit::Cans
            | Unit::Bottles
            | Unit::Unknown(_) => UnitCategory::Count,
            Unit::Pinches | Unit::Dashes => UnitCategory::Other,
        }
    }

    /// Linear factor converting one of this unit into the category base unit
    pub fn base_factor(&self) -> f64 {
        match self {
            Unit::Teaspoons => 5.0,
            Unit::Tablespoons => 15.0,
            Unit::FluidOunces => 30.0,
            Unit::Cups => 240.0,
            Unit::Pints => 473.0,
            Unit::Quarts => 946.0,
            Unit::Gallons => 3785.0,
            Unit::Milliliters => 1.0,
            Unit::Liters => 1000.0,
            Unit::Ounces => 28.35,
            Unit::Pounds => 453.6,
            Unit::Grams => 1.0,
            Unit::Kilograms => 1000.0,
            Unit::Dozen => 12.0,
            Unit::Units
            | Unit::Cloves
            | Unit::Packages
            | Unit::Cans
            | Unit::Bottles
            | Unit::Pinches
            | Unit::Dashes
            | Unit::Unknown(_) => 1.0,
        }
    }

    /// The base unit of a category (the target of `base_factor` conversion)
    pub fn base_of(category: UnitCategory) -> Unit {
        match category {
            UnitCategory::Liquid => Unit::Milliliters,
            UnitCategory::Weight => Unit::Grams,
            UnitCategory::Count => Unit::Units,
            UnitCategory::Other => Unit::Units,
        }
    }

    /// Get a human-readable string representation of the unit
    pub fn display_name(&self) -> &str {
        match self {
            Unit::Teaspoons => "tsp",
            Unit::Tablespoons => "tbsp",
            Unit::FluidOunces => "fl oz",
            Unit::Cups => "cups",
            Unit::Pints => "pints",
            Unit::Quarts => "quarts",
            Unit::Gallons => "gallons",
            Unit::Milliliters => "ml",
            Unit::Liters => "L",
            Unit::Ounces => "oz",
            Unit::Pounds => "lbs",
            Unit::Grams => "g",
            Unit::Kilograms => "kg",
            Unit::Units => "units",
            Unit::Dozen => "dozen",
            Unit::Cloves => "cloves",
            Unit::Packages => "packages",
            Unit::Cans => "cans",
            Unit::Bottles => "bottles",
            Unit::Pinches => "pinches",
            Unit::Dashes => "dashes",
            Unit::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Canonical ingredient identity produced by normalization
///
/// Tokens come from the curated reference table (or, for unmatched inputs,
/// from the cleaned raw name). Equality is by canonical name only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientToken {
    /// Canonical display name (e.g. "parmesan cheese")
    pub canonical_name: String,
    /// Measurement category this ingredient is usually tracked in
    pub category: UnitCategory,
    /// Default unit used when the user gives no unit
    pub default_unit: Unit,
}

impl IngredientToken {
    /// Create a token with the category's base unit as default
    pub fn new(canonical_name: &str, category: UnitCategory) -> Self {
        Self {
            canonical_name: canonical_name.to_string(),
            category,
            default_unit: Unit::base_of(category),
        }
    }
}

/// A raw recipe ingredient line as stored upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Free-text ingredient name as the author wrote it
    pub name: String,
    /// Quantity in the author's unit
    pub quantity: f64,
    /// Free-text unit string ("cups", "g", "unit", ...)
    pub unit: String,
}

impl RecipeIngredient {
    pub fn new(name: &str, quantity: f64, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
        }
    }
}

/// A user's pantry inventory entry
///
/// Owned and mutated by the pantry CRUD surface; the discovery engine only
/// ever reads a snapshot of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryEntry {
    /// Free-text ingredient name as the user entered it
    pub ingredient_name: String,
    /// Quantity on hand, in `unit`
    pub quantity: f64,
    /// Free-text unit string
    pub unit: String,
}

impl PantryEntry {
    pub fn new(ingredient_name: &str, quantity: f64, unit: &str) -> Self {
        Self {
            ingredient_name: ingredient_name.to_string(),
            quantity,
            unit: unit.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_categories() {
        assert_eq!(Unit::Cups.category(), UnitCategory::Liquid);
        assert_eq!(Unit::Kilograms.category(), UnitCategory::Weight);
        assert_eq!(Unit::Dozen.category(), UnitCategory::Count);
        assert_eq!(Unit::Pinches.category(), UnitCategory::Other);
        assert_eq!(
            Unit::Unknown("blorp".to_string()).category(),
            UnitCategory::Count
        );
    }

    #[test]
    fn test_base_factors() {
        assert_eq!(Unit::Liters.base_factor(), 1000.0);
        assert_eq!(Unit::Kilograms.base_factor(), 1000.0);
        assert_eq!(Unit::Tablespoons.base_factor(), 15.0);
        assert_eq!(Unit::Dozen.base_factor(), 12.0);
        assert_eq!(Unit::Units.base_factor(), 1.0);
    }

    #[test]
    fn test_base_of_category() {
        assert_eq!(Unit::base_of(UnitCategory::Liquid), Unit::Milliliters);
        assert_eq!(Unit::base_of(UnitCategory::Weight), Unit::Grams);
        assert_eq!(Unit::base_of(UnitCategory::Count), Unit::Units);
    }

    #[test]
    fn test_token_default_unit_follows_category() {
        let token = IngredientToken::new("olive oil", UnitCategory::Liquid);
        assert_eq!(token.default_unit, Unit::Milliliters);

        let token = IngredientToken::new("eggs", UnitCategory::Count);
        assert_eq!(token.default_unit, Unit::Units);
    }

    #[test]
    fn test_unit_display() {
        assert_eq!(Unit::Milliliters.to_string(), "ml");
        assert_eq!(Unit::Unknown("shake".to_string()).to_string(), "shake");
    }
}
