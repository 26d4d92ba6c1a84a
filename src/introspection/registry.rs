use std::collections::HashMap;
use std::sync::Arc;

use super::descriptor::HandlerDescriptor;

/// Allow-list of handlers that appear in the function listing.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<HandlerDescriptor>>,
}

impl FunctionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its declared name, replacing any previous entry.
    pub fn register(&mut self, descriptor: HandlerDescriptor) {
        self.functions
            .insert(descriptor.name.clone(), Arc::new(descriptor));
    }

    /// Whether `name` is a documented function.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

impl FromIterator<HandlerDescriptor> for FunctionRegistry {
    fn from_iter<I: IntoIterator<Item = HandlerDescriptor>>(iter: I) -> Self {
        let mut registry = Self::new();
        for descriptor in iter {
            registry.register(descriptor);
        }
        registry
    }
}
