//! Key to constructor tables used when resolving assets.

use crate::core::{BehaviorFactory, BoxError, CompletionHandler, Condition, StateBehavior};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Named behaviours, conditions, and handlers.
///
/// Assets store keys only. The host registers what each key means for its
/// context type before resolving.
///
/// # Example
///
/// ```rust
/// use tickgraph::asset::Registry;
/// use tickgraph::core::Idle;
///
/// struct Ctx {
///     hungry: bool,
/// }
///
/// let mut registry = Registry::<Ctx>::new();
/// registry
///     .register_behavior("idle", || Idle)
///     .register_condition("hungry", |c: &mut Ctx| c.hungry)
///     .register_handler("eat", |c: &mut Ctx| c.hungry = false);
///
/// assert!(registry.condition("hungry").is_some());
/// assert!(registry.behavior("walk").is_none());
/// ```
pub struct Registry<C> {
    behaviors: HashMap<String, BehaviorFactory<C>>,
    conditions: HashMap<String, Condition<C>>,
    handlers: HashMap<String, CompletionHandler<C>>,
}

impl<C: 'static> Registry<C> {
    pub fn new() -> Self {
        Self {
            behaviors: HashMap::new(),
            conditions: HashMap::new(),
            handlers: HashMap::new(),
        }
    }

    /// Register a behaviour factory. A later registration under the same key
    /// replaces the earlier one.
    pub fn register_behavior<B, F>(&mut self, key: impl Into<String>, factory: F) -> &mut Self
    where
        B: StateBehavior<C> + 'static,
        F: Fn() -> B + Send + Sync + 'static,
    {
        let factory: BehaviorFactory<C> =
            Arc::new(move || Box::new(factory()) as Box<dyn StateBehavior<C>>);
        self.behaviors.insert(key.into(), factory);
        self
    }

    pub fn register_condition<F>(&mut self, key: impl Into<String>, predicate: F) -> &mut Self
    where
        F: Fn(&mut C) -> bool + Send + Sync + 'static,
    {
        let key = key.into();
        let condition = Condition::new(predicate).labeled(key.clone());
        self.conditions.insert(key, condition);
        self
    }

    /// Register a condition that can fail.
    pub fn register_fallible_condition<F>(
        &mut self,
        key: impl Into<String>,
        predicate: F,
    ) -> &mut Self
    where
        F: Fn(&mut C) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        let key = key.into();
        let condition = Condition::try_new(predicate).labeled(key.clone());
        self.conditions.insert(key, condition);
        self
    }

    pub fn register_handler<F>(&mut self, key: impl Into<String>, callback: F) -> &mut Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        let key = key.into();
        let handler = CompletionHandler::new(callback).labeled(key.clone());
        self.handlers.insert(key, handler);
        self
    }
}

impl<C> Registry<C> {
    pub fn behavior(&self, key: &str) -> Option<&BehaviorFactory<C>> {
        self.behaviors.get(key)
    }

    pub fn condition(&self, key: &str) -> Option<&Condition<C>> {
        self.conditions.get(key)
    }

    pub fn handler(&self, key: &str) -> Option<&CompletionHandler<C>> {
        self.handlers.get(key)
    }
}

impl<C: 'static> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut behaviors: Vec<_> = self.behaviors.keys().collect();
        let mut conditions: Vec<_> = self.conditions.keys().collect();
        let mut handlers: Vec<_> = self.handlers.keys().collect();
        behaviors.sort();
        conditions.sort();
        handlers.sort();
        f.debug_struct("Registry")
            .field("behaviors", &behaviors)
            .field("conditions", &conditions)
            .field("handlers", &handlers)
            .finish()
    }
}
