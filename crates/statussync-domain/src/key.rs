//! Unique key module - identity of one application across its lifecycle

use std::fmt;

/// Normalized `company|position` identity
///
/// Two records with the same key describe the same application at different
/// points in time. Normalization trims and lower-cases both halves, so
/// `" Acme "`/`"Engineer"` and `"acme"`/`" engineer "` collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniqueKey(String);

impl UniqueKey {
    /// Separator between the company and position halves
    pub const SEPARATOR: char = '|';

    /// Build the key for a company and position
    ///
    /// # Examples
    ///
    /// ```
    /// use statussync_domain::UniqueKey;
    ///
    /// let a = UniqueKey::new(" Acme ", "Engineer");
    /// let b = UniqueKey::new("acme", " engineer ");
    /// assert_eq!(a, b);
    /// assert_eq!(a.as_str(), "acme|engineer");
    /// ```
    pub fn new(company: &str, position: &str) -> Self {
        Self(format!(
            "{}{}{}",
            company.trim().to_lowercase(),
            Self::SEPARATOR,
            position.trim().to_lowercase()
        ))
    }

    /// The normalized key text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UniqueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_key_format() {
        assert_eq!(UniqueKey::new("Acme Corp", "Senior Engineer").as_str(), "acme corp|senior engineer");
    }

    #[test]
    fn test_distinct_positions_do_not_collide() {
        assert_ne!(UniqueKey::new("Acme", "Engineer"), UniqueKey::new("Acme", "Designer"));
    }

    proptest! {
        #[test]
        fn prop_key_ignores_case_and_padding(
            company in "[A-Za-z][A-Za-z ]{0,18}[A-Za-z]",
            position in "[A-Za-z][A-Za-z ]{0,18}[A-Za-z]",
            pad_left in " {0,3}",
            pad_right in "[ \t]{0,3}",
        ) {
            let plain = UniqueKey::new(&company, &position);
            let noisy = UniqueKey::new(
                &format!("{}{}{}", pad_left, company.to_uppercase(), pad_right),
                &format!("{}{}{}", pad_right, position.to_lowercase(), pad_left),
            );
            prop_assert_eq!(plain, noisy);
        }
    }
}
