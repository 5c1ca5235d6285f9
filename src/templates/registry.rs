//! Template registry keyed by template id.

use std::collections::HashMap;
use std::sync::Arc;

use super::builtin;
use super::template::Template;

/// Registry of available DAO templates.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Arc<Template>>,
    /// Registration order, used for listing on the template screen.
    order: Vec<String>,
}

impl TemplateRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the democracy and multisig templates.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(builtin::democracy::template());
        registry.register(builtin::multisig::template());
        registry
    }

    /// Register a template, replacing any previous one with the same id.
    pub fn register(&mut self, template: Template) {
        let id = template.id.clone();
        if self.templates.insert(id.clone(), Arc::new(template)).is_some() {
            tracing::warn!(template = %id, "Replaced previously registered template");
        } else {
            self.order.push(id.clone());
            tracing::debug!("Registered template: {}", id);
        }
    }

    /// Get a template by id.
    pub fn get(&self, id: &str) -> Option<Arc<Template>> {
        self.templates.get(id).cloned()
    }

    /// Check if a template exists.
    pub fn has(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// List template ids in registration order.
    pub fn list(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Get the number of registered templates.
    pub fn count(&self) -> usize {
        self.templates.len()
    }
}
