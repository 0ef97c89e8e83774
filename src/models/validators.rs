use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;
use validator::ValidationError;

/// Postal code: 4 to 10 digits.
/// Examples: "560001", "10115"
pub static PINCODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4,10}$").unwrap());

/// Maximum length for a single product variant
const MAX_VARIANT_LENGTH: usize = 128;

/// Maximum number of variants per product
const MAX_VARIANTS_COUNT: usize = 200;

/// Validate product variant names.
///
/// Ensures that:
/// - No more than MAX_VARIANTS_COUNT variants are provided
/// - No variant is empty or whitespace-only
/// - No variant exceeds MAX_VARIANT_LENGTH characters
pub fn validate_variants(variants: &[String]) -> Result<(), ValidationError> {
    if variants.len() > MAX_VARIANTS_COUNT {
        let mut err = ValidationError::new("too_many_variants");
        err.message = Some(Cow::Owned(format!(
            "Maximum {} variants allowed",
            MAX_VARIANTS_COUNT
        )));
        return Err(err);
    }

    for variant in variants {
        if variant.trim().is_empty() {
            let mut err = ValidationError::new("empty_variant");
            err.message = Some(Cow::Borrowed(
                "Variant names cannot be empty or whitespace-only",
            ));
            return Err(err);
        }
        if variant.len() > MAX_VARIANT_LENGTH {
            let mut err = ValidationError::new("variant_too_long");
            err.message = Some(Cow::Owned(format!(
                "Variant names cannot exceed {} characters",
                MAX_VARIANT_LENGTH
            )));
            return Err(err);
        }
    }
    Ok(())
}
