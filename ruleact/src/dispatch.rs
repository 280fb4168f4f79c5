//! # Reduction dispatch
//!
//! [`ReductionDispatcher`] is the single call site between a parser and its
//! semantic actions. The parser builds one [`Reduction`] per grammar rule it
//! applies and hands it to [`dispatch`](ReductionDispatcher::dispatch), which
//! resolves the rule tag in the registry, runs the handler on the symbol
//! values, stores the result in the event and returns it.
//!
//! The dispatcher owns both the registry and the actions context `C`, so one
//! dispatcher is one evaluation session. Contexts must not be shared between
//! sessions; swap them only between complete parses with
//! [`rebind`](ReductionDispatcher::rebind).

use crate::{ActionRegistry, Resolved};
use std::fmt::Debug;
use std::mem;

/// One completed application of a grammar rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction<'a, V> {
    /// Rule tag of the applied production.
    pub tag: &'a str,
    /// Values of the right-hand side symbols, leftmost first.
    pub values: Vec<V>,
    /// Written by the dispatcher.
    pub result: Option<V>,
}

impl<'a, V> Reduction<'a, V> {
    pub fn new(tag: &'a str, values: Vec<V>) -> Self {
        Self {
            tag,
            values,
            result: None,
        }
    }
}

/// A context that supplies its own handler set.
pub trait RuleActions: Sized + 'static {
    type Value: Clone + Default + Debug + 'static;

    fn actions() -> ActionRegistry<Self, Self::Value>;
}

#[derive(Debug, Clone, Default)]
pub struct DispatchStats {
    pub dispatched: usize,
    pub pass_through: usize,
}

pub struct ReductionDispatcher<C>
where
    C: RuleActions,
{
    registry: ActionRegistry<C, C::Value>,
    actions: C,
    stats: DispatchStats,
}

impl<C> ReductionDispatcher<C>
where
    C: RuleActions,
{
    pub fn new(actions: C) -> Self {
        Self {
            registry: C::actions(),
            actions,
            stats: DispatchStats::default(),
        }
    }

    /// Runs the action for `event.tag` and records the result in the event.
    pub fn dispatch(&mut self, event: &mut Reduction<'_, C::Value>) -> C::Value {
        let resolved = self.registry.resolve(event.tag);
        log::trace!(
            "dispatch {:?} {:?}{}",
            event.tag,
            event.values,
            match resolved {
                Resolved::Exact(_) => "",
                Resolved::Default(_) => " (default)",
                Resolved::PassThrough => " (pass-through)",
            }
        );
        self.stats.dispatched += 1;
        if resolved.is_pass_through() {
            self.stats.pass_through += 1;
        }
        let result = resolved.apply(&mut self.actions, &event.values);
        event.result = Some(result.clone());
        result
    }

    /// Installs a new actions context and returns the previous one.
    ///
    /// Only call this between complete parses; the context's state is not
    /// protected against a swap in the middle of one.
    pub fn rebind(&mut self, actions: C) -> C {
        self.registry = C::actions();
        self.stats = DispatchStats::default();
        mem::replace(&mut self.actions, actions)
    }

    pub fn actions(&self) -> &C {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut C {
        &mut self.actions
    }

    pub fn into_actions(self) -> C {
        self.actions
    }

    pub fn registry(&self) -> &ActionRegistry<C, C::Value> {
        &self.registry
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats.clone()
    }
}
