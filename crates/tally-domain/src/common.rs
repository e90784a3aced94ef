//! Shared traits for bookkeeping entities.

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Case-insensitive substring test used by account and entity lookups.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Normalises a name for equality comparisons.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_ignore_case_matches_mixed_case() {
        assert!(contains_ignore_case("Main BANK Account", "bank"));
        assert!(!contains_ignore_case("Rent", "bank"));
        assert!(!contains_ignore_case("anything", ""));
    }
}
