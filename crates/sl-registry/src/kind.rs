//! Enumerated property kinds and label canonicalization.

use std::fmt;
use std::hash::Hash;

/// A closed set of properties supported by one entity kind.
///
/// Each variant carries its canonical name, the other spellings accepted for it, and
/// the unit used when a request does not name one.
pub trait PropertyKind: Copy + Eq + Hash + fmt::Debug + 'static {
    /// Every variant, in the order accepted names are reported.
    fn all() -> &'static [Self];

    fn canonical_name(self) -> &'static str;

    /// Additional accepted spellings (already upper-case).
    fn synonyms(self) -> &'static [&'static str] {
        &[]
    }

    fn default_unit(self) -> &'static str;
}

/// Normalize a request label for lookup: surrounding whitespace removed, ASCII upper-case.
///
/// No other folding happens; `"MASS FLOW"` and `"MASS_FLOW"` stay distinct.
pub fn canonicalize(label: &str) -> String {
    label.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_case_only() {
        assert_eq!(canonicalize("massflow"), "MASSFLOW");
        assert_eq!(canonicalize("  Mass_Flow "), "MASS_FLOW");
        assert_eq!(canonicalize("mass flow"), "MASS FLOW");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn canonicalize_is_idempotent(label in "[ a-zA-Z_0-9]{0,24}") {
            let once = canonicalize(&label);
            prop_assert_eq!(canonicalize(&once), once.clone());
        }

        #[test]
        fn canonicalize_ignores_ascii_case(label in "[a-zA-Z_]{1,24}") {
            prop_assert_eq!(
                canonicalize(&label.to_ascii_lowercase()),
                canonicalize(&label.to_ascii_uppercase())
            );
        }
    }
}
