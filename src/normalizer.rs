//! # Unit & Ingredient Normalizer
//!
//! This module canonicalizes free-text ingredient names and quantity units
//! into a comparable form. It is the foundation the pantry match calculator
//! builds on: both recipe ingredient lists and pantry inventories pass
//! through here before any comparison happens.
//!
//! ## Features
//!
//! - Exact lookup against a curated canonical ingredient table
//! - Fuzzy lookup (normalized edit-distance similarity) for misspellings
//! - Qualifier and plural stripping ("fresh chopped tomatoes" -> "tomato")
//! - Unit string recognition with linear conversion to per-category base
//!   units (liquid -> ml, weight -> g, count -> units)
//! - Graceful degradation: unknown inputs fall back to low-confidence count
//!   tokens instead of failing the request
//!
//! All reference tables are immutable, built once at first use, and safe for
//! concurrent reads.

use lazy_static::lazy_static;
use log::{debug, trace, warn};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use strsim::normalized_levenshtein;

use crate::ingredient_model::{IngredientToken, Unit, UnitCategory};

/// Minimum fuzzy similarity for a canonical-table match
pub const FUZZY_THRESHOLD: f64 = 0.6;
/// Confidence assigned to tokens built from unmatched raw names
pub const FALLBACK_CONFIDENCE: f32 = 0.4;
/// Hard floor below which an input is treated as unknown and excluded
pub const MIN_CONFIDENCE: f32 = 0.3;

/// Curated canonical ingredient table: name -> measurement category
///
/// Names are stored the way they are displayed to users. Lookup handles
/// case, qualifiers, and plural variants before consulting this table.
static CANONICAL_INGREDIENTS: LazyLock<HashMap<&'static str, UnitCategory>> = LazyLock::new(|| {
    use UnitCategory::{Count, Liquid, Weight};
    let mut map = HashMap::new();

    // Proteins
    map.insert("chicken breast", Weight);
    map.insert("chicken thigh", Weight);
    map.insert("ground beef", Weight);
    map.insert("ground turkey", Weight);
    map.insert("bacon", Weight);
    map.insert("ham", Weight);
    map.insert("salmon", Weight);
    map.insert("tuna", Weight);
    map.insert("shrimp", Weight);
    map.insert("tofu", Weight);
    map.insert("eggs", Count);

    // Dairy
    map.insert("milk", Liquid);
    map.insert("heavy cream", Liquid);
    map.insert("butter", Weight);
    map.insert("parmesan cheese", Weight);
    map.insert("cheddar cheese", Weight);
    map.insert("mozzarella cheese", Weight);
    map.insert("cream cheese", Weight);
    map.insert("feta cheese", Weight);
    map.insert("yogurt", Weight);
    map.insert("sour cream", Weight);

    // Produce
    map.insert("romaine lettuce", Count);
    map.insert("spinach", Weight);
    map.insert("kale", Weight);
    map.insert("tomato", Count);
    map.insert("cherry tomatoes", Weight);
    map.insert("onion", Count);
    map.insert("red onion", Count);
    map.insert("garlic", Count);
    map.insert("carrot", Count);
    map.insert("celery", Count);
    map.insert("bell pepper", Count);
    map.insert("jalapeno", Count);
    map.insert("potato", Count);
    map.insert("sweet potato", Count);
    map.insert("broccoli", Weight);
    map.insert("cauliflower", Weight);
    map.insert("mushroom", Weight);
    map.insert("zucchini", Count);
    map.insert("cucumber", Count);
    map.insert("avocado", Count);
    map.insert("lemon", Count);
    map.insert("lime", Count);
    map.insert("apple", Count);
    map.insert("banana", Count);
    map.insert("cilantro", Count);
    map.insert("parsley", Count);
    map.insert("basil", Count);
    map.insert("ginger", Weight);
    map.insert("scallion", Count);

    // Pantry staples
    map.insert("flour", Weight);
    map.insert("sugar", Weight);
    map.insert("brown sugar", Weight);
    map.insert("salt", Weight);
    map.insert("black pepper", Weight);
    map.insert("olive oil", Liquid);
    map.insert("vegetable oil", Liquid);
    map.insert("sesame oil", Liquid);
    map.insert("soy sauce", Liquid);
    map.insert("fish sauce", Liquid);
    map.insert("rice", Weight);
    map.insert("pasta", Weight);
    map.insert("bread", Count);
    map.insert("croutons", Weight);
    map.insert("breadcrumbs", Weight);
    map.insert("baking powder", Weight);
    map.insert("baking soda", Weight);
    map.insert("vanilla extract", Liquid);
    map.insert("honey", Liquid);
    map.insert("maple syrup", Liquid);
    map.insert("ketchup", Liquid);
    map.insert("mustard", Liquid);
    map.insert("mayonnaise", Weight);
    map.insert("vinegar", Liquid);
    map.insert("balsamic vinegar", Liquid);
    map.insert("chicken broth", Liquid);
    map.insert("beef broth", Liquid);
    map.insert("canned tomatoes", Count);
    map.insert("tomato paste", Weight);
    map.insert("black beans", Count);
    map.insert("chickpeas", Count);
    map.insert("oats", Weight);
    map.insert("peanut butter", Weight);
    map.insert("cinnamon", Weight);
    map.insert("cumin", Weight);
    map.insert("paprika", Weight);
    map.insert("oregano", Weight);
    map.insert("thyme", Weight);
    map.insert("rosemary", Weight);
    map.insert("chili powder", Weight);
    map.insert("red pepper flakes", Weight);
    map.insert("cornstarch", Weight);
    map.insert("yeast", Weight);
    map.insert("cocoa powder", Weight);
    map.insert("chocolate chips", Weight);
    map.insert("walnuts", Weight);
    map.insert("almonds", Weight);

    map
});

/// Unit string variations -> canonical unit
static UNIT_MAPPINGS: LazyLock<HashMap<&'static str, Unit>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Volume units
    map.insert("tsp", Unit::Teaspoons);
    map.insert("teaspoon", Unit::Teaspoons);
    map.insert("teaspoons", Unit::Teaspoons);
    map.insert("tbsp", Unit::Tablespoons);
    map.insert("tablespoon", Unit::Tablespoons);
    map.insert("tablespoons", Unit::Tablespoons);
    map.insert("cup", Unit::Cups);
    map.insert("cups", Unit::Cups);
    map.insert("c", Unit::Cups);
    map.insert("fl oz", Unit::FluidOunces);
    map.insert("fluid ounce", Unit::FluidOunces);
    map.insert("fluid ounces", Unit::FluidOunces);
    map.insert("pint", Unit::Pints);
    map.insert("pints", Unit::Pints);
    map.insert("pt", Unit::Pints);
    map.insert("quart", Unit::Quarts);
    map.insert("quarts", Unit::Quarts);
    map.insert("qt", Unit::Quarts);
    map.insert("gallon", Unit::Gallons);
    map.insert("gallons", Unit::Gallons);
    map.insert("gal", Unit::Gallons);
    map.insert("ml", Unit::Milliliters);
    map.insert("milliliter", Unit::Milliliters);
    map.insert("milliliters", Unit::Milliliters);
    map.insert("l", Unit::Liters);
    map.insert("liter", Unit::Liters);
    map.insert("liters", Unit::Liters);
    map.insert("litre", Unit::Liters);
    map.insert("litres", Unit::Liters);

    // Weight units
    map.insert("oz", Unit::Ounces);
    map.insert("ounce", Unit::Ounces);
    map.insert("ounces", Unit::Ounces);
    map.insert("lb", Unit::Pounds);
    map.insert("lbs", Unit::Pounds);
    map.insert("pound", Unit::Pounds);
    map.insert("pounds", Unit::Pounds);
    map.insert("g", Unit::Grams);
    map.insert("gram", Unit::Grams);
    map.insert("grams", Unit::Grams);
    map.insert("kg", Unit::Kilograms);
    map.insert("kilogram", Unit::Kilograms);
    map.insert("kilograms", Unit::Kilograms);

    // Count units
    map.insert("unit", Unit::Units);
    map.insert("units", Unit::Units);
    map.insert("piece", Unit::Units);
    map.insert("pieces", Unit::Units);
    map.insert("item", Unit::Units);
    map.insert("items", Unit::Units);
    map.insert("whole", Unit::Units);
    map.insert("dozen", Unit::Dozen);
    map.insert("doz", Unit::Dozen);
    map.insert("clove", Unit::Cloves);
    map.insert("cloves", Unit::Cloves);
    map.insert("package", Unit::Packages);
    map.insert("packages", Unit::Packages);
    map.insert("pkg", Unit::Packages);
    map.insert("can", Unit::Cans);
    map.insert("cans", Unit::Cans);
    map.insert("bottle", Unit::Bottles);
    map.insert("bottles", Unit::Bottles);

    // Specialized units
    map.insert("pinch", Unit::Pinches);
    map.insert("pinches", Unit::Pinches);
    map.insert("dash", Unit::Dashes);
    map.insert("dashes", Unit::Dashes);

    map
});

/// Preparation qualifiers stripped before canonical lookup
static QUALIFIERS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    vec![
        "fresh", "freshly", "chopped", "diced", "minced", "sliced", "grated", "shredded",
        "dried", "frozen", "cooked", "raw", "large", "small", "medium", "finely", "coarsely",
        "boneless", "skinless", "peeled", "ripe", "organic",
    ]
});

lazy_static! {
    /// Strips parenthetical modifiers like "(all-purpose)" or "(about 2)"
    static ref PARENTHETICAL_RE: Regex =
        Regex::new(r"\([^)]*\)").expect("Parenthetical pattern should be valid");
}

/// A recipe or pantry ingredient after normalization
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedIngredient {
    /// Canonical identity used for matching
    pub token: IngredientToken,
    /// Quantity converted to the base unit of `unit`'s category
    pub quantity: f64,
    /// Base unit the quantity is expressed in
    pub unit: Unit,
    /// Confidence in the name match (1.0 exact, similarity for fuzzy,
    /// `FALLBACK_CONFIDENCE` for unmatched names)
    pub confidence: f32,
    /// False when the raw unit string was not recognized
    pub unit_recognized: bool,
}

/// Normalize a raw ingredient into a comparable token and base-unit quantity
///
/// Returns `None` only when the name is unusable even at low confidence
/// (cleans to an empty string); every other input degrades to a fallback
/// token rather than failing.
///
/// # Examples
///
/// ```rust
/// use discovery::normalizer::normalize;
///
/// let norm = normalize("Fresh chopped Tomatoes", 2.0, "unit").unwrap();
/// assert_eq!(norm.token.canonical_name, "tomato");
///
/// let norm = normalize("olive oil", 1.0, "l").unwrap();
/// assert_eq!(norm.quantity, 1000.0); // converted to ml
/// ```
pub fn normalize(raw_name: &str, raw_quantity: f64, raw_unit: &str) -> Option<NormalizedIngredient> {
    let (token, confidence) = normalize_name(raw_name)?;

    let (unit, unit_recognized) = parse_unit(raw_unit);
    if !unit_recognized {
        debug!(
            "Unknown unit '{}' for '{}', falling back to count",
            raw_unit, raw_name
        );
    }
    let (quantity, base_unit) = convert_to_base(raw_quantity, &unit);

    Some(NormalizedIngredient {
        token,
        quantity,
        unit: base_unit,
        confidence,
        unit_recognized,
    })
}

/// Resolve a raw name to a canonical token with a confidence score
///
/// Lookup order: exact (raw, cleaned, singular) -> fuzzy against the table
/// -> fallback token built from the cleaned name itself.
pub fn normalize_name(raw_name: &str) -> Option<(IngredientToken, f32)> {
    let lowered = raw_name.trim().to_lowercase();

    // Exact hit before qualifier stripping protects names like "ground beef"
    if let Some(category) = CANONICAL_INGREDIENTS.get(lowered.as_str()) {
        return Some((IngredientToken::new(&lowered, *category), 1.0));
    }

    let cleaned = clean_name(&lowered);
    if cleaned.is_empty() {
        warn!("Ingredient name '{}' cleaned to empty, excluding", raw_name);
        return None;
    }

    if let Some(category) = CANONICAL_INGREDIENTS.get(cleaned.as_str()) {
        return Some((IngredientToken::new(&cleaned, *category), 1.0));
    }

    let singular = singularize(&cleaned);
    if let Some(category) = CANONICAL_INGREDIENTS.get(singular) {
        return Some((IngredientToken::new(singular, *category), 1.0));
    }

    if let Some((name, category, similarity)) = fuzzy_lookup(&cleaned) {
        trace!(
            "Fuzzy matched '{}' -> '{}' (similarity {:.2})",
            cleaned,
            name,
            similarity
        );
        return Some((IngredientToken::new(name, category), similarity as f32));
    }

    debug!(
        "No canonical match for '{}', using fallback count token",
        cleaned
    );
    Some((
        IngredientToken::new(&cleaned, UnitCategory::Count),
        FALLBACK_CONFIDENCE,
    ))
}

/// Best fuzzy match against the canonical table, if any clears the threshold
fn fuzzy_lookup(cleaned: &str) -> Option<(&'static str, UnitCategory, f64)> {
    let mut best: Option<(&'static str, UnitCategory, f64)> = None;

    for (&name, &category) in CANONICAL_INGREDIENTS.iter() {
        let similarity = normalized_levenshtein(cleaned, name);
        if similarity >= FUZZY_THRESHOLD {
            match best {
                Some((_, _, best_sim)) if best_sim >= similarity => {}
                _ => best = Some((name, category, similarity)),
            }
        }
    }

    best
}

/// Lower-cased name with parentheticals and preparation qualifiers removed
fn clean_name(lowered: &str) -> String {
    let without_parens = PARENTHETICAL_RE.replace_all(lowered, " ");

    without_parens
        .split_whitespace()
        .filter(|word| !QUALIFIERS.iter().any(|&q| q == *word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Naive plural stripping, mirroring unit lookup behavior
fn singularize(name: &str) -> &str {
    if let Some(stripped) = name.strip_suffix("es") {
        if CANONICAL_INGREDIENTS.contains_key(stripped) {
            return stripped;
        }
    }
    if name.len() > 1 {
        if let Some(stripped) = name.strip_suffix('s') {
            return stripped;
        }
    }
    name
}

/// Parse a unit string; the bool is false when the string was not recognized
///
/// An empty unit means "no unit given" and resolves to count units without
/// being flagged.
pub fn parse_unit(raw_unit: &str) -> (Unit, bool) {
    let unit_str = raw_unit.trim().to_lowercase();

    if unit_str.is_empty() {
        return (Unit::Units, true);
    }

    if let Some(unit) = UNIT_MAPPINGS.get(unit_str.as_str()) {
        return (unit.clone(), true);
    }

    // Try without pluralization
    let singular = if unit_str.ends_with('s') && unit_str.len() > 1 {
        &unit_str[..unit_str.len() - 1]
    } else {
        &unit_str
    };
    if let Some(unit) = UNIT_MAPPINGS.get(singular) {
        return (unit.clone(), true);
    }

    (Unit::Unknown(unit_str), false)
}

/// Convert a quantity to the base unit of its own category
///
/// Cross-category conversion is never performed; callers compare categories
/// via [`can_merge`] before treating two quantities as summable.
pub fn convert_to_base(quantity: f64, unit: &Unit) -> (f64, Unit) {
    let base = Unit::base_of(unit.category());
    (quantity * unit.base_factor(), base)
}

/// Whether two units are compatible for quantity merging
///
/// Units merge only within a category; "other" measures (pinches, dashes)
/// never auto-merge.
pub fn can_merge(a: &Unit, b: &Unit) -> bool {
    let (ca, cb) = (a.category(), b.category());
    ca == cb && ca != UnitCategory::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_lookup() {
        let (token, confidence) = normalize_name("Parmesan Cheese").unwrap();
        assert_eq!(token.canonical_name, "parmesan cheese");
        assert_eq!(token.category, UnitCategory::Weight);
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn test_qualifier_stripping() {
        let (token, confidence) = normalize_name("fresh chopped spinach").unwrap();
        assert_eq!(token.canonical_name, "spinach");
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn test_parenthetical_stripping() {
        let (token, _) = normalize_name("flour (all-purpose)").unwrap();
        assert_eq!(token.canonical_name, "flour");
    }

    #[test]
    fn test_plural_lookup() {
        let (token, confidence) = normalize_name("tomatoes").unwrap();
        assert_eq!(token.canonical_name, "tomato");
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn test_qualifier_does_not_break_compound_names() {
        // "ground beef" must not lose its first word to qualifier stripping
        let (token, confidence) = normalize_name("ground beef").unwrap();
        assert_eq!(token.canonical_name, "ground beef");
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn test_fuzzy_lookup_typo() {
        let (token, confidence) = normalize_name("parmesan chese").unwrap();
        assert_eq!(token.canonical_name, "parmesan cheese");
        assert!(confidence >= FUZZY_THRESHOLD as f32);
        assert!(confidence < 1.0);
    }

    #[test]
    fn test_unmatched_name_falls_back_to_count_token() {
        let (token, confidence) = normalize_name("dragon fruit compote").unwrap();
        assert_eq!(token.canonical_name, "dragon fruit compote");
        assert_eq!(token.category, UnitCategory::Count);
        assert_eq!(confidence, FALLBACK_CONFIDENCE);
        assert!(confidence > MIN_CONFIDENCE);
    }

    #[test]
    fn test_empty_name_excluded() {
        assert!(normalize_name("   ").is_none());
        assert!(normalize_name("(diced)").is_none());
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!(parse_unit("cups"), (Unit::Cups, true));
        assert_eq!(parse_unit("KG"), (Unit::Kilograms, true));
        assert_eq!(parse_unit("unit"), (Unit::Units, true));
        assert_eq!(parse_unit(""), (Unit::Units, true));

        let (unit, recognized) = parse_unit("smidgen");
        assert_eq!(unit, Unit::Unknown("smidgen".to_string()));
        assert!(!recognized);
    }

    #[test]
    fn test_base_conversion() {
        assert_eq!(convert_to_base(1.0, &Unit::Liters), (1000.0, Unit::Milliliters));
        assert_eq!(convert_to_base(2.0, &Unit::Kilograms), (2000.0, Unit::Grams));
        assert_eq!(convert_to_base(3.0, &Unit::Dozen), (36.0, Unit::Units));
        assert_eq!(convert_to_base(2.0, &Unit::Cups), (480.0, Unit::Milliliters));
    }

    #[test]
    fn test_normalize_never_fails_on_bad_unit() {
        let norm = normalize("olive oil", 2.0, "smidgen").unwrap();
        assert_eq!(norm.token.canonical_name, "olive oil");
        assert!(!norm.unit_recognized);
        assert_eq!(norm.unit, Unit::Units);
    }

    #[test]
    fn test_category_mismatch_is_not_mergeable() {
        // "olive oil, 1 unit" vs "olive oil, 400 ml": count vs liquid
        let count_side = normalize("olive oil", 1.0, "unit").unwrap();
        let liquid_side = normalize("olive oil", 400.0, "ml").unwrap();

        assert_eq!(count_side.token, liquid_side.token);
        assert!(!can_merge(&count_side.unit, &liquid_side.unit));
    }

    #[test]
    fn test_same_category_merges() {
        assert!(can_merge(&Unit::Liters, &Unit::Cups));
        assert!(can_merge(&Unit::Grams, &Unit::Pounds));
        assert!(!can_merge(&Unit::Pinches, &Unit::Pinches));
    }
}
