//! # Option Descriptors
//!
//! Declared options and the values the current parse has bound to them.
//! The value shape is a closed enum so that adding a shape forces every
//! consumption site to handle it.

use std::collections::BTreeMap;

/// Shape of the value an option consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Presence alone records `"true"`; never consumes a following word.
    Flag,
    /// Exactly one value, inline after `=` or taken from the next word.
    Scalar,
    /// Several values split on `separator`, with trailing-separator
    /// continuation across words.
    List {
        /// The character the value text is split on.
        separator: char,
    },
    /// `key=value` pairs, one pair per occurrence; repeated keys keep
    /// the last value written.
    Map,
}

/// A declared option plus its per-parse value state.
///
/// The declaration half is immutable after building; the value half is
/// reset by [`ProcessedOption::clear`] before every parse.
#[derive(Debug, Clone)]
pub struct ProcessedOption {
    name: String,
    short_name: Option<char>,
    description: String,
    required: bool,
    overrides_required: bool,
    kind: OptionKind,
    values: Vec<String>,
    properties: BTreeMap<String, String>,
}

impl ProcessedOption {
    pub(crate) fn new(
        name: String,
        short_name: Option<char>,
        description: String,
        required: bool,
        overrides_required: bool,
        kind: OptionKind,
    ) -> Self {
        Self {
            name,
            short_name,
            description,
            required,
            overrides_required,
            kind,
            values: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    /// The long name, without dashes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The single-character short name, if one was declared.
    pub fn short_name(&self) -> Option<char> {
        self.short_name
    }

    /// Human readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether a parse without this option is a violation.
    pub fn required(&self) -> bool {
        self.required
    }

    /// Whether a value on this option excuses missing required options.
    pub fn overrides_required(&self) -> bool {
        self.overrides_required
    }

    /// The declared value shape.
    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    /// How the option is rendered in messages, e.g. `--name`.
    pub fn display_name(&self) -> String {
        format!("--{}", self.name)
    }

    /// Whether the declared shape expects a value beyond mere presence.
    pub fn has_value(&self) -> bool {
        !matches!(self.kind, OptionKind::Flag)
    }

    /// True once the current parse bound any value or pair to this option.
    pub fn has_any_value(&self) -> bool {
        !self.values.is_empty() || !self.properties.is_empty()
    }

    /// The first bound value, if any.
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// All bound values, in input order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Bound key-value pairs, keyed for deterministic iteration.
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub(crate) fn add_value(&mut self, value: String) {
        self.values.push(value);
    }

    pub(crate) fn add_property(&mut self, key: String, value: String) {
        self.properties.insert(key, value);
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
        self.properties.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(kind: OptionKind) -> ProcessedOption {
        ProcessedOption::new("foo".into(), Some('f'), String::new(), false, false, kind)
    }

    #[test]
    fn test_flag_expects_no_value() {
        assert!(!option(OptionKind::Flag).has_value());
        assert!(option(OptionKind::Scalar).has_value());
        assert!(option(OptionKind::List { separator: ',' }).has_value());
        assert!(option(OptionKind::Map).has_value());
    }

    #[test]
    fn test_properties_count_as_bound_values() {
        let mut opt = option(OptionKind::Map);
        assert!(!opt.has_any_value());
        opt.add_property("k".into(), "v".into());
        assert!(opt.has_any_value());
        assert!(opt.value().is_none());
    }

    #[test]
    fn test_repeated_property_keys_keep_last_value() {
        let mut opt = option(OptionKind::Map);
        opt.add_property("k".into(), "first".into());
        opt.add_property("k".into(), "second".into());
        assert_eq!(opt.properties().get("k").map(String::as_str), Some("second"));
        assert_eq!(opt.properties().len(), 1);
    }

    #[test]
    fn test_clear_resets_value_state_only() {
        let mut opt = option(OptionKind::Scalar);
        opt.add_value("bar".into());
        opt.clear();
        assert!(!opt.has_any_value());
        assert_eq!(opt.name(), "foo");
        assert_eq!(opt.short_name(), Some('f'));
    }

    #[test]
    fn test_display_name_uses_long_form() {
        assert_eq!(option(OptionKind::Flag).display_name(), "--foo");
    }
}
