//! Wildcard-aware matching primitives shared by the evaluation engine and
//! role-editing adapters.
//!
//! The wire format keeps the literal `"*"` token. Internally every grant is
//! lifted into a [`Segment`] so that wildcard handling is a match arm, not a
//! string comparison scattered through the engine. The token is only
//! recognised as a whole value: `"adm*"` is an ordinary literal.

use std::collections::{BTreeMap, HashSet};

/// Token meaning "any value" in logins, namespaces and node labels.
pub const WILDCARD: &str = "*";

/// A single grant value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment<'a> {
    Exact(&'a str),
    Any,
}

impl<'a> Segment<'a> {
    pub fn parse(raw: &'a str) -> Self {
        if raw == WILDCARD {
            Segment::Any
        } else {
            Segment::Exact(raw)
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Segment::Any => true,
            Segment::Exact(expected) => *expected == value,
        }
    }
}

/// True if any grant matches `value` verbatim or is the wildcard.
pub fn matches_any<'a, I>(grants: I, value: &str) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    grants
        .into_iter()
        .any(|grant| Segment::parse(grant).matches(value))
}

/// Namespace grant check: `namespaces` contains `namespace` or the wildcard.
pub fn match_namespace(namespaces: &[String], namespace: &str) -> bool {
    matches_any(namespaces, namespace)
}

/// Login grant check: `logins` contains `login` or the wildcard.
pub fn match_login(logins: &[String], login: &str) -> bool {
    matches_any(logins, login)
}

/// A node-label grant lifted out of its wire map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSelector<'a> {
    /// The `{"*": "*"}` pair is present: every host matches.
    Any,
    /// Empty map: grants no host at all.
    Nothing,
    /// Every key must be present on the host with an equal value.
    Exact(&'a BTreeMap<String, String>),
}

impl<'a> LabelSelector<'a> {
    pub fn from_map(selector: &'a BTreeMap<String, String>) -> Self {
        if selector.get(WILDCARD).is_some_and(|v| v == WILDCARD) {
            return LabelSelector::Any;
        }
        // An empty selector must not fall through to the key loop below,
        // where it would match every host vacuously.
        if selector.is_empty() {
            return LabelSelector::Nothing;
        }
        LabelSelector::Exact(selector)
    }

    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        match self {
            LabelSelector::Any => true,
            LabelSelector::Nothing => false,
            LabelSelector::Exact(selector) => selector
                .iter()
                .all(|(key, value)| labels.get(key) == Some(value)),
        }
    }
}

/// Node-label grant check against a host's labels.
pub fn match_labels(selector: &BTreeMap<String, String>, labels: &BTreeMap<String, String>) -> bool {
    LabelSelector::from_map(selector).matches(labels)
}

/// Resource rule check: `rules[resource]` lists `action`.
///
/// Resource kinds and actions are compared verbatim; a missing entry for the
/// resource denies.
pub fn match_rule(rules: &BTreeMap<String, Vec<String>>, resource: &str, action: &str) -> bool {
    rules
        .get(resource)
        .is_some_and(|actions| actions.iter().any(|a| a == action))
}

/// Remove duplicates, keeping the first occurrence of each value.
pub fn dedup_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn wildcard_is_only_recognised_as_a_whole_value() {
        assert_eq!(Segment::parse("*"), Segment::Any);
        assert_eq!(Segment::parse("adm*"), Segment::Exact("adm*"));
        assert!(!Segment::parse("adm*").matches("admin"));
    }

    #[test]
    fn namespace_matches_verbatim_or_wildcard() {
        assert!(match_namespace(&strings(&["system", "default"]), "default"));
        assert!(!match_namespace(&strings(&["system"]), "default"));
        assert!(match_namespace(&strings(&["*"]), "anything"));
        assert!(!match_namespace(&[], "default"));
    }

    #[test]
    fn login_matches_verbatim_or_wildcard() {
        assert!(match_login(&strings(&["admin"]), "admin"));
        assert!(!match_login(&strings(&["admin"]), "root"));
        assert!(match_login(&strings(&["*"]), "root"));
    }

    #[test]
    fn wildcard_label_pair_matches_unlabelled_host() {
        assert!(match_labels(&labels(&[("*", "*")]), &BTreeMap::new()));
    }

    #[test]
    fn wildcard_label_pair_absorbs_other_keys() {
        let selector = labels(&[("*", "*"), ("role", "db")]);
        assert_eq!(LabelSelector::from_map(&selector), LabelSelector::Any);
        assert!(match_labels(&selector, &labels(&[("role", "worker")])));
    }

    #[test]
    fn empty_label_selector_grants_nothing() {
        let selector = BTreeMap::new();
        assert_eq!(LabelSelector::from_map(&selector), LabelSelector::Nothing);
        assert!(!match_labels(&selector, &BTreeMap::new()));
        assert!(!match_labels(&selector, &labels(&[("role", "worker")])));
    }

    #[test]
    fn label_selector_requires_every_key_with_equal_value() {
        let selector = labels(&[("role", "worker")]);
        assert!(match_labels(&selector, &labels(&[("role", "worker"), ("status", "follower")])));
        assert!(!match_labels(&selector, &labels(&[("role", "db")])));
        assert!(!match_labels(&selector, &BTreeMap::new()));
    }

    #[test]
    fn wildcard_label_value_alone_is_literal() {
        let selector = labels(&[("role", "*")]);
        assert!(!match_labels(&selector, &labels(&[("role", "worker")])));
        assert!(match_labels(&selector, &labels(&[("role", "*")])));
    }

    #[test]
    fn rule_requires_resource_entry_and_action() {
        let mut rules = BTreeMap::new();
        rules.insert("session".to_string(), strings(&["read"]));
        assert!(match_rule(&rules, "session", "read"));
        assert!(!match_rule(&rules, "session", "write"));
        assert!(!match_rule(&rules, "role", "read"));
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let out = dedup_preserving_order(strings(&["root", "admin", "root", "*", "admin"]));
        assert_eq!(out, strings(&["root", "admin", "*"]));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the wildcard grant matches every value, an exact grant
        /// matches only itself.
        #[test]
        fn segment_semantics(grant in "[a-z]{1,8}", value in "[a-z*]{0,8}") {
            prop_assert!(Segment::Any.matches(&value));
            prop_assert_eq!(Segment::parse(&grant).matches(&value), grant == value);
        }

        /// Property: any host carrying all of the selector's pairs matches.
        #[test]
        fn superset_of_selector_matches(
            selector in prop::collection::btree_map("[a-z]{1,4}", "[a-z]{1,4}", 1..4),
            extra in prop::collection::btree_map("[A-Z]{1,4}", "[a-z]{1,4}", 0..4),
        ) {
            let mut host = extra.clone();
            host.extend(selector.clone());
            prop_assert!(match_labels(&selector, &host));
        }
    }
}
