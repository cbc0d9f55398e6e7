use crate::registry::SharedRule;
use std::any::{Any, TypeId};

/// A type-erased mapping rule that remembers which error type it was stored with
pub(crate) struct AnyRule {
    error_type_id: TypeId,
    error_type_name: &'static str,
    rule: Box<dyn Any + Send + Sync>,
}

impl AnyRule {
    /// Erase a shared rule for storage
    pub(crate) fn new<S: 'static, D: 'static, E: 'static>(rule: SharedRule<S, D, E>) -> Self {
        Self {
            error_type_id: TypeId::of::<E>(),
            error_type_name: std::any::type_name::<E>(),
            rule: Box::new(rule),
        }
    }

    /// Check if the rule was stored with error type E
    pub(crate) fn has_error_type<E: 'static>(&self) -> bool {
        self.error_type_id == TypeId::of::<E>()
    }

    pub(crate) fn error_type_name(&self) -> &'static str {
        self.error_type_name
    }

    /// Get a new handle to the rule if it maps S to D with error type E
    pub(crate) fn downcast<S: 'static, D: 'static, E: 'static>(
        &self,
    ) -> Option<SharedRule<S, D, E>> {
        if !self.has_error_type::<E>() {
            return None;
        }
        self.rule.downcast_ref::<SharedRule<S, D, E>>().cloned()
    }
}
