#![forbid(unsafe_code)]

//! Named layout handlers.
//!
//! Boards pick their handler by name. The registry is an owned value: each
//! board (or host) keeps its own, there is no process-wide table.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::compact::{CompactConfig, CompactLayout};
use crate::error::{LayoutError, Result};
use crate::handler::{FreeLayout, LayoutHandler};

/// Handlers by name.
#[derive(Clone, Default)]
pub struct LayoutRegistry {
    handlers: FxHashMap<String, Rc<dyn LayoutHandler>>,
}

impl LayoutRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the `free` and `compact` handlers.
    #[must_use]
    pub fn with_builtins(compact: CompactConfig) -> Self {
        let mut registry = Self::new();
        registry.register(FreeLayout);
        registry.register(CompactLayout::new(compact));
        registry
    }

    /// Register `handler` under its own name, replacing any previous handler
    /// with that name.
    pub fn register(
        &mut self,
        handler: impl LayoutHandler + 'static,
    ) -> Option<Rc<dyn LayoutHandler>> {
        let name = handler.name().to_owned();
        tracing::debug!(handler = %name, "registered layout handler");
        self.handlers.insert(name, Rc::new(handler))
    }

    /// Look up a handler.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownHandler`] if nothing is registered under
    /// `name`.
    pub fn get(&self, name: &str) -> Result<Rc<dyn LayoutHandler>> {
        self.handlers
            .get(name)
            .cloned()
            .ok_or_else(|| LayoutError::UnknownHandler {
                name: name.to_owned(),
            })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for LayoutRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutRegistry")
            .field("handlers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use tinyboard_core::LayoutRect;

    use super::*;
    use crate::handler::LayoutContext;

    struct Reverse;

    impl LayoutHandler for Reverse {
        fn name(&self) -> &str {
            "reverse"
        }

        fn resolve(
            &self,
            _interacting: &[LayoutRect],
            all: &[LayoutRect],
            _cx: &LayoutContext<'_>,
        ) -> Vec<LayoutRect> {
            all.iter().rev().cloned().collect()
        }
    }

    #[test]
    fn builtins_are_registered() {
        let registry = LayoutRegistry::with_builtins(CompactConfig::default());
        assert_eq!(registry.names(), vec!["compact", "free"]);
        assert_eq!(registry.get("free").unwrap().name(), "free");
    }

    #[test]
    fn unknown_name_is_an_error() {
        let registry = LayoutRegistry::new();
        assert_eq!(
            registry.get("compact").err(),
            Some(LayoutError::UnknownHandler {
                name: "compact".into()
            })
        );
    }

    #[test]
    fn custom_handler_replaces_by_name() {
        let mut registry = LayoutRegistry::new();
        assert!(registry.register(Reverse).is_none());
        assert!(registry.register(Reverse).is_some());
        assert!(registry.contains("reverse"));
    }
}
