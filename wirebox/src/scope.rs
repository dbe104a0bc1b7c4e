//! Instances of shared bindings are kept in a [Scope] - a container which decides when to reuse or
//! create an instance. Bindings which are not shared never reach the scope and are constructed on
//! every request.
//!
//! Note: sharing is decided per identifier, so `bind("A", "B", true)` caches the instance made
//! for `A`, while making `B` directly still results in a new instance every time. For the same
//! reason, rebinding `B` only drops the instance cached for `B`: the instance cached for `A` stays
//! until `A` itself gets rebound.

use crate::identifier::Identifier;
use crate::instance::Instance;
use fxhash::FxHashMap;
#[cfg(test)]
use mockall::automock;

pub type ScopePtr = Box<dyn Scope + Send + Sync>;

/// A scope containing instances of shared bindings.
#[cfg_attr(test, automock)]
pub trait Scope {
    /// Gets an instance stored for the given identifier, if available in this scope.
    fn instance(&self, identifier: &Identifier) -> Option<Instance>;

    /// Stores given instance in the scope. The scope might not support storing instances and ignore
    /// it.
    fn store_instance(&mut self, identifier: &Identifier, instance: Instance);

    /// Removes an instance stored for the given identifier, e.g. when it gets rebound.
    fn remove_instance(&mut self, identifier: &Identifier) -> Option<Instance>;
}

/// Scope keeping a single instance per identifier for the lifetime of the container.
#[derive(Default, Debug)]
pub struct SingletonScope {
    instances: FxHashMap<Identifier, Instance>,
}

impl Scope for SingletonScope {
    #[inline]
    fn instance(&self, identifier: &Identifier) -> Option<Instance> {
        self.instances.get(identifier).cloned()
    }

    #[inline]
    fn store_instance(&mut self, identifier: &Identifier, instance: Instance) {
        self.instances.insert(identifier.clone(), instance);
    }

    #[inline]
    fn remove_instance(&mut self, identifier: &Identifier) -> Option<Instance> {
        self.instances.remove(identifier)
    }
}

/// A scope which never stores anything, so a new instance gets created on each request.
#[derive(Default, Copy, Clone, Eq, PartialEq, Debug)]
pub struct PrototypeScope;

impl Scope for PrototypeScope {
    #[inline]
    fn instance(&self, _identifier: &Identifier) -> Option<Instance> {
        None
    }

    #[inline]
    fn store_instance(&mut self, _identifier: &Identifier, _instance: Instance) {}

    #[inline]
    fn remove_instance(&mut self, _identifier: &Identifier) -> Option<Instance> {
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::identifier::Identifier;
    use crate::instance::Instance;
    use crate::scope::{PrototypeScope, ScopePtr, SingletonScope};

    #[test]
    fn should_support_singletons() {
        let identifier = Identifier::from("a");
        let mut scope = Box::<SingletonScope>::default() as ScopePtr;

        let instance = Instance::new(0);
        scope.store_instance(&identifier, instance.clone());

        assert!(scope.instance(&identifier).unwrap().ptr_eq(&instance));
        assert!(scope.instance(&Identifier::from("b")).is_none());

        assert!(scope.remove_instance(&identifier).is_some());
        assert!(scope.instance(&identifier).is_none());
    }

    #[test]
    fn should_support_prototypes() {
        let identifier = Identifier::from("a");
        let mut scope = Box::<PrototypeScope>::default() as ScopePtr;

        scope.store_instance(&identifier, Instance::new(0));

        assert!(scope.instance(&identifier).is_none());
    }
}
