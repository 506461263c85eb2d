//! Phone number normalization
//!
//! Every comparison in callercard runs on the canonical form: the decimal
//! digits of the input, in order, with everything else dropped.

/// Reduce any phone representation to its digits.
///
/// `"+30 (210) 484-8484"` becomes `"302104848484"`. Input without digits
/// yields an empty string.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Whether a stored canonical number refers to the canonical `target`.
///
/// Historical records may carry a country code or trunk prefix the query
/// lacks, so this is a suffix test. Short targets match broadly; an empty
/// target never matches.
pub fn matches_suffix(stored: &str, target: &str) -> bool {
    !target.is_empty() && stored.ends_with(target)
}
