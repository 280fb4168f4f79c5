//! # Rule actions
//!
//! An [`ActionRegistry`] maps grammar rule tags to handlers. A handler is any
//! function of the actions context and the ordered symbol values of one
//! reduction, returning the value of the reduced symbol:
//!
//! ```text
//! Fn(&mut C, &[V]) -> V
//! ```
//!
//! The same grammar can be driven by different registries: plain evaluation,
//! instrumented evaluation, tree building, and so on. Lookups never fail.
//! A tag without a handler falls back to the default handler registered
//! under `""`; without one, the reduction passes its first symbol value
//! through unchanged.
//!
//! ## Example
//!
//! ```rust
//! use ruleact::ActionRegistry;
//!
//! struct Sum(i64);
//!
//! let registry = ActionRegistry::<Sum, i64>::new()
//!     .action("add", |sum: &mut Sum, values: &[i64]| {
//!         sum.0 += 1;
//!         values[0] + values[2]
//!     });
//!
//! let mut sum = Sum(0);
//! assert_eq!(registry.resolve("add").apply(&mut sum, &[2, 0, 3]), 5);
//! assert_eq!(registry.resolve("paren").apply(&mut sum, &[7, 8]), 7);
//! assert_eq!(sum.0, 1);
//! ```

use indexmap::IndexMap;
use smartstring::alias::String;
use std::fmt;

/// The tag of the fallback handler.
pub const DEFAULT_TAG: &str = "";

/// A semantic action for one rule tag.
pub type Handler<C, V> = Box<dyn Fn(&mut C, &[V]) -> V>;

/// Immutable mapping from rule tag to [`Handler`].
///
/// Registries are assembled with the consuming [`action`](Self::action)
/// builder and are read-only afterwards.
pub struct ActionRegistry<C, V> {
    handlers: IndexMap<String, Handler<C, V>>,
}

/// What [`ActionRegistry::resolve`] found for a tag.
pub enum Resolved<'a, C, V> {
    /// A handler registered under the exact tag.
    Exact(&'a Handler<C, V>),
    /// The handler registered under [`DEFAULT_TAG`].
    Default(&'a Handler<C, V>),
    /// Nothing registered; the result is the first symbol value.
    PassThrough,
}

impl<C, V> Resolved<'_, C, V>
where
    V: Clone + Default,
{
    /// Runs the resolved behavior on the symbol values of one reduction.
    ///
    /// A pass-through over an empty value list yields `V::default()`.
    pub fn apply(&self, ctx: &mut C, values: &[V]) -> V {
        match self {
            Resolved::Exact(handler) | Resolved::Default(handler) => handler(ctx, values),
            Resolved::PassThrough => values.first().cloned().unwrap_or_default(),
        }
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self, Resolved::PassThrough)
    }
}

impl<C, V> ActionRegistry<C, V> {
    /// Creates an empty registry; every tag passes through.
    pub fn new() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }

    /// Registers `handler` under `tag`, replacing any earlier handler for it.
    pub fn action<F>(mut self, tag: &str, handler: F) -> Self
    where
        F: Fn(&mut C, &[V]) -> V + 'static,
    {
        self.handlers.insert(String::from(tag), Box::new(handler));
        self
    }

    /// Looks up the behavior for `tag`: the exact handler, else the default
    /// handler, else pass-through.
    pub fn resolve(&self, tag: &str) -> Resolved<'_, C, V> {
        if let Some(handler) = self.handlers.get(tag) {
            Resolved::Exact(handler)
        } else if let Some(handler) = self.handlers.get(DEFAULT_TAG) {
            Resolved::Default(handler)
        } else {
            Resolved::PassThrough
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    /// Registered tags, in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(|tag| tag.as_str())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Re-targets every handler to an outer context `D` that owns a `C`.
    ///
    /// This is how a wrapper reuses the whole handler set of the context it
    /// wraps and then overrides only the tags it intercepts.
    pub fn lift<D>(self, project: fn(&mut D) -> &mut C) -> ActionRegistry<D, V>
    where
        C: 'static,
        D: 'static,
        V: 'static,
    {
        let handlers = self
            .handlers
            .into_iter()
            .map(|(tag, handler)| {
                let lifted: Handler<D, V> =
                    Box::new(move |outer: &mut D, values: &[V]| handler(project(outer), values));
                (tag, lifted)
            })
            .collect();
        ActionRegistry { handlers }
    }
}

impl<C, V> Default for ActionRegistry<C, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, V> fmt::Debug for ActionRegistry<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("tags", &self.tags().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Ctx {
        calls: Vec<&'static str>,
    }

    fn registry() -> ActionRegistry<Ctx, i64> {
        ActionRegistry::new()
            .action("add", |ctx: &mut Ctx, v: &[i64]| {
                ctx.calls.push("add");
                v[0] + v[2]
            })
            .action("neg", |ctx: &mut Ctx, v: &[i64]| {
                ctx.calls.push("neg");
                -v[1]
            })
    }

    #[test]
    fn exact_tag_resolves_to_its_handler() {
        let reg = registry();
        let mut ctx = Ctx::default();
        let r = reg.resolve("add");
        assert!(matches!(r, Resolved::Exact(_)));
        assert_eq!(r.apply(&mut ctx, &[2, 0, 3]), 5);
        assert_eq!(reg.resolve("neg").apply(&mut ctx, &[0, 4]), -4);
        assert_eq!(ctx.calls, ["add", "neg"]);
    }

    #[test]
    fn unknown_tag_without_default_passes_first_value_through() {
        let reg = registry();
        let mut ctx = Ctx::default();
        let r = reg.resolve("group");
        assert!(r.is_pass_through());
        assert_eq!(r.apply(&mut ctx, &[9, 8, 7]), 9);
        assert_eq!(r.apply(&mut ctx, &[]), 0);
        assert!(ctx.calls.is_empty());
    }

    #[test]
    fn unknown_tag_falls_back_to_default_handler() {
        let reg = registry().action(DEFAULT_TAG, |ctx: &mut Ctx, v: &[i64]| {
            ctx.calls.push("default");
            v.len() as i64
        });
        let mut ctx = Ctx::default();
        let r = reg.resolve("anything");
        assert!(matches!(r, Resolved::Default(_)));
        assert_eq!(r.apply(&mut ctx, &[1, 1, 1]), 3);
        // registered tags still win over the default
        assert_eq!(reg.resolve("add").apply(&mut ctx, &[1, 0, 1]), 2);
        assert_eq!(ctx.calls, ["default", "add"]);
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let reg = registry().action("add", |_: &mut Ctx, v: &[i64]| v[0] * v[2]);
        let mut ctx = Ctx::default();
        assert_eq!(reg.resolve("add").apply(&mut ctx, &[3, 0, 4]), 12);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.tags().collect::<Vec<_>>(), ["add", "neg"]);
    }

    struct Outer {
        inner: Ctx,
        seen: usize,
    }

    fn inner(outer: &mut Outer) -> &mut Ctx {
        &mut outer.inner
    }

    #[test]
    fn lift_reuses_inner_handlers_and_allows_overrides() {
        let reg = registry()
            .lift(inner)
            .action("neg", |outer: &mut Outer, v: &[i64]| {
                outer.seen += 1;
                v[1]
            });
        let mut outer = Outer {
            inner: Ctx::default(),
            seen: 0,
        };
        assert_eq!(reg.resolve("add").apply(&mut outer, &[1, 0, 2]), 3);
        assert_eq!(reg.resolve("neg").apply(&mut outer, &[0, 5]), 5);
        assert_eq!(outer.inner.calls, ["add"]);
        assert_eq!(outer.seen, 1);
        assert!(reg.resolve("other").is_pass_through());
    }

    #[test]
    fn empty_registry() {
        let reg: ActionRegistry<Ctx, i64> = ActionRegistry::default();
        assert!(reg.is_empty());
        assert!(!reg.contains("add"));
        assert_eq!(format!("{:?}", registry()), r#"ActionRegistry { tags: ["add", "neg"] }"#);
    }
}
