//! Policy listeners
//!
//! A listener walks a parsed tree and raises a [`Violation`] at the first
//! construct the policy forbids. Policies choose their listener through a
//! [`ListenerBinding`]; bindings can also be looked up by name in a
//! [`ListenerRegistry`] when the policy comes from a file.

pub mod checks;
mod sanitizer;

pub use sanitizer::SanitizerListener;

use crate::error::{SanitizerError, SanitizerResult, Violation};
use crate::options::SanitizerOptions;
use scriptguard_syntax::Listener;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A listener instance for one check, borrowing its policy.
pub type PolicyListener<'a> = Box<dyn Listener<Error = Violation> + 'a>;

pub const SANITIZER_LISTENER_NAME: &str = "SanitizerListener";

// ============================================================================
// FACTORIES
// ============================================================================

/// Why a listener could not be created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListenerError {
    #[error("no listener is registered under {name}")]
    Unregistered { name: String },

    #[error("listener {name} cannot be constructed: {reason}")]
    Construction { name: String, reason: String },
}

/// Creates a fresh listener for every check.
pub trait ListenerFactory: Send + Sync {
    fn create<'a>(&self, options: &'a SanitizerOptions) -> Result<PolicyListener<'a>, ListenerError>;
}

/// Factory for [`SanitizerListener`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SanitizerListenerFactory;

impl ListenerFactory for SanitizerListenerFactory {
    fn create<'a>(&self, options: &'a SanitizerOptions) -> Result<PolicyListener<'a>, ListenerError> {
        Ok(Box::new(SanitizerListener::new(options)))
    }
}

// ============================================================================
// BINDING
// ============================================================================

/// Named listener factory carried by a policy.
#[derive(Clone)]
pub struct ListenerBinding {
    name: String,
    factory: Arc<dyn ListenerFactory>,
}

impl ListenerBinding {
    pub fn new(name: impl Into<String>, factory: impl ListenerFactory + 'static) -> Self {
        Self {
            name: name.into(),
            factory: Arc::new(factory),
        }
    }

    pub fn sanitizer() -> Self {
        Self::new(SANITIZER_LISTENER_NAME, SanitizerListenerFactory)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create the listener for one check. A failing factory is a
    /// configuration error, reported as `ListenerNotFound`.
    pub fn instantiate<'a>(&self, options: &'a SanitizerOptions) -> SanitizerResult<PolicyListener<'a>> {
        self.factory.create(options).map_err(|error| {
            tracing::warn!(listener = %self.name, error = %error, "listener construction failed");
            SanitizerError::listener_not_found(self.name.clone(), error)
        })
    }
}

impl fmt::Debug for ListenerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerBinding")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Listener bindings by name.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    bindings: BTreeMap<String, ListenerBinding>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in [`SanitizerListener`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ListenerBinding::sanitizer());
        registry
    }

    /// Register a binding, replacing any binding with the same name.
    pub fn register(&mut self, binding: ListenerBinding) -> &mut Self {
        self.bindings.insert(binding.name.clone(), binding);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn resolve(&self, name: &str) -> SanitizerResult<ListenerBinding> {
        self.bindings.get(name).cloned().ok_or_else(|| {
            SanitizerError::listener_not_found(
                name,
                ListenerError::Unregistered {
                    name: name.to_string(),
                },
            )
        })
    }
}
