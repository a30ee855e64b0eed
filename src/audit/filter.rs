//! Attribute eligibility policy
//!
//! Decides whether a single attribute takes part in an audit, given the
//! entity's include and exclude lists. Exclusion is checked first, so an
//! attribute named in both lists is never audited.

/// Include/exclude policy over attribute names
#[derive(Debug, Clone, Copy)]
pub struct AttributeFilter<'a> {
    include: &'a [String],
    exclude: &'a [String],
}

impl<'a> AttributeFilter<'a> {
    pub fn new(include: &'a [String], exclude: &'a [String]) -> Self {
        Self { include, exclude }
    }

    /// Determine if an attribute is eligible for auditing
    pub fn is_auditable(&self, attribute: &str) -> bool {
        is_auditable(attribute, self.include, self.exclude)
    }
}

/// Determine if an attribute is eligible for auditing
///
/// 1. listed in a non-empty `exclude`: not auditable
/// 2. `include` non-empty: auditable iff listed
/// 3. both empty: auditable
pub fn is_auditable(attribute: &str, include: &[String], exclude: &[String]) -> bool {
    if !exclude.is_empty() && exclude.iter().any(|a| a == attribute) {
        return false;
    }

    include.is_empty() || include.iter().any(|a| a == attribute)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_lists_audit_everything() {
        let filter = AttributeFilter::new(&[], &[]);
        assert!(filter.is_auditable("name"));
        assert!(filter.is_auditable("age"));
        assert!(filter.is_auditable(""));
    }

    #[test]
    fn test_include_restricts() {
        let include = names(&["name"]);
        let filter = AttributeFilter::new(&include, &[]);
        assert!(filter.is_auditable("name"));
        assert!(!filter.is_auditable("age"));
    }

    #[test]
    fn test_exclude_removes() {
        let exclude = names(&["password"]);
        let filter = AttributeFilter::new(&[], &exclude);
        assert!(!filter.is_auditable("password"));
        assert!(filter.is_auditable("email"));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let include = names(&["name", "age"]);
        let exclude = names(&["age"]);
        assert!(!is_auditable("age", &include, &exclude));
        assert!(is_auditable("name", &include, &exclude));
        assert!(!is_auditable("email", &include, &exclude));
    }

    #[test]
    fn test_matching_is_exact() {
        let include = names(&["Name"]);
        assert!(!is_auditable("name", &include, &[]));
    }
}
