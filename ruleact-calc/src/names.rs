//! # names
//!
//! The variable store of one evaluator, built on [`indexmap::IndexMap`] so
//! iteration follows first-assignment order.
//!
//! Unlike a symbol table that interns on sight, reading a name here never
//! creates it: only [`Names::set`] inserts.
//!
//! ## Example
//! ```rust
//! # use ruleact_calc::{Names, Number};
//! let mut names = Names::new();
//! assert_eq!(names.get("x"), None);
//! assert!(names.is_empty());
//! names.set("x", Number::from(5));
//! assert_eq!(names.get("x"), Some(&Number::from(5)));
//! ```

use crate::Number;
use indexmap::IndexMap;
use smartstring::alias::String;

#[derive(Debug, Clone, Default)]
pub struct Names {
    tab: IndexMap<String, Number>,
}

impl Names {
    pub fn new() -> Self {
        Self {
            tab: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tab.is_empty()
    }

    /// Binds `name` to `value` and returns the previous value, if any.
    ///
    /// Rebinding keeps the name's original position.
    pub fn set(&mut self, name: impl AsRef<str>, value: Number) -> Option<Number> {
        self.tab.insert(String::from(name.as_ref()), value)
    }

    pub fn get(&self, name: &str) -> Option<&Number> {
        self.tab.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tab.contains_key(name)
    }

    /// Bindings in first-assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Number)> {
        self.tab.iter().map(|(name, value)| (name.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Number::Real;

    fn int(n: i64) -> Number {
        Number::from(n)
    }

    #[test]
    fn new_store_is_empty() {
        let names = Names::new();
        assert_eq!(names.len(), 0);
        assert!(names.iter().next().is_none());
    }

    #[test]
    fn lookup_of_missing_name_does_not_insert() {
        let names = Names::new();
        assert_eq!(names.get("y"), None);
        assert_eq!(names.get("y"), None);
        assert!(!names.contains("y"));
        assert!(names.is_empty());
    }

    #[test]
    fn set_overwrites_and_returns_previous() {
        let mut names = Names::new();
        assert_eq!(names.set("x", int(1)), None);
        assert_eq!(names.set("x", Real(2.5)), Some(int(1)));
        assert_eq!(names.get("x"), Some(&Real(2.5)));
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn repeated_reads_see_the_same_value() {
        let mut names = Names::new();
        names.set("x", int(5));
        for _ in 0..10 {
            assert_eq!(names.get("x"), Some(&int(5)));
        }
    }

    #[test]
    fn iteration_follows_first_assignment() {
        let mut names = Names::new();
        names.set("b", int(1));
        names.set("a", int(2));
        names.set("b", int(3));
        let all: Vec<_> = names.iter().collect();
        assert_eq!(all, [("b", &int(3)), ("a", &int(2))]);
    }
}
