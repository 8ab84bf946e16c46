//! Resolver registry
//!
//! Resolvers are unique by name. Registering a name again replaces the
//! earlier resolver in its original slot, so built-ins registered first can
//! be overridden without changing dispatch order.

use std::path::Path;

use crate::domain::ports::Resolver;

#[derive(Default)]
pub struct ResolverRegistry {
    resolvers: Vec<Box<dyn Resolver>>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolvers(resolvers: impl IntoIterator<Item = Box<dyn Resolver>>) -> Self {
        let mut registry = Self::new();
        for resolver in resolvers {
            registry.register(resolver);
        }
        registry
    }

    /// Add or replace a resolver. Nameless resolvers are ignored.
    pub fn register(&mut self, resolver: Box<dyn Resolver>) -> bool {
        if resolver.name().is_empty() {
            return false;
        }
        match self
            .resolvers
            .iter_mut()
            .find(|existing| existing.name() == resolver.name())
        {
            Some(slot) => *slot = resolver,
            None => self.resolvers.push(resolver),
        }
        true
    }

    /// First resolver supporting `id`; `None` means default emission.
    pub fn dispatch(&self, id: &Path) -> Option<&dyn Resolver> {
        self.resolvers
            .iter()
            .find(|resolver| resolver.supports(id))
            .map(|resolver| resolver.as_ref())
    }

    pub fn supports(&self, id: &Path) -> bool {
        self.dispatch(id).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}
