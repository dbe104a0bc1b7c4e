//! Functionality related to registering [type descriptors](TypeDescriptor). The
//! [Container](crate::container::Container) walks those descriptors when constructing types,
//! instead of querying runtime metadata.

use crate::error::TypeRegistryError;
use crate::identifier::Identifier;
use crate::instance::Cast;
use crate::reflect::TypeDescriptor;
use crate::registry::internal::{CastRegisterer, TypeRegisterer};
use crate::registry::map::TypeDefinitionMap;
use fxhash::FxHashMap;
use itertools::Itertools;
#[cfg(test)]
use mockall::automock;
use std::any::TypeId;
use tracing::debug;

pub type TypeRegistryPtr = Box<dyn TypeRegistry + Send + Sync>;

/// A registry of type descriptors and casts between concrete types and their contracts.
#[cfg_attr(test, automock)]
pub trait TypeRegistry {
    /// Adds a new descriptor. Handling of duplicate names is registry-dependent.
    fn register_type(&mut self, descriptor: TypeDescriptor) -> Result<(), TypeRegistryError>;

    /// Adds a cast for instances of the `source` concrete type. A cast with the same target
    /// replaces the previous one.
    fn register_cast(&mut self, source: TypeId, cast: Cast);

    /// Returns a descriptor with given name.
    fn descriptor(&self, name: &str) -> Option<TypeDescriptor>;

    /// Returns a descriptor registered for given concrete type.
    fn descriptor_by_type(&self, type_id: TypeId) -> Option<TypeDescriptor>;

    /// Returns all casts known for given concrete type.
    fn casts(&self, type_id: TypeId) -> Vec<Cast>;

    /// Checks if there's a descriptor with given name.
    fn is_registered(&self, name: &str) -> bool;

    /// Returns a copy of all descriptors.
    fn all_descriptors(&self) -> FxHashMap<Identifier, TypeDescriptor>;
}

/// Registry initialized from statically registered descriptors and casts, i.e. the ones submitted
/// by `#[derive(Constructible)]`, `#[contract]` and `#[contract_impl]`.
#[derive(Clone, Debug)]
pub struct StaticTypeRegistry {
    definition_map: TypeDefinitionMap,
    allow_type_overriding: bool,
}

impl StaticTypeRegistry {
    pub fn new(allow_type_overriding: bool) -> Result<Self, TypeRegistryError> {
        let descriptors = inventory::iter::<TypeRegisterer>
            .into_iter()
            .map(|registerer| (registerer.register)())
            .collect_vec();

        let mut registry = Self::empty(allow_type_overriding);
        for descriptor in descriptors {
            registry
                .definition_map
                .try_register_type(descriptor, allow_type_overriding)?;
        }

        for registerer in inventory::iter::<CastRegisterer> {
            let (source, cast) = (registerer.register)();
            registry.definition_map.register_cast(source, cast);
        }

        debug!(
            "Registered {} static type descriptors.",
            registry.definition_map.len()
        );

        Ok(registry)
    }

    /// Creates a registry without any statically registered content.
    pub fn empty(allow_type_overriding: bool) -> Self {
        Self {
            definition_map: TypeDefinitionMap::default(),
            allow_type_overriding,
        }
    }
}

impl TypeRegistry for StaticTypeRegistry {
    #[inline]
    fn register_type(&mut self, descriptor: TypeDescriptor) -> Result<(), TypeRegistryError> {
        self.definition_map
            .try_register_type(descriptor, self.allow_type_overriding)
    }

    #[inline]
    fn register_cast(&mut self, source: TypeId, cast: Cast) {
        self.definition_map.register_cast(source, cast);
    }

    #[inline]
    fn descriptor(&self, name: &str) -> Option<TypeDescriptor> {
        self.definition_map.descriptor(name)
    }

    #[inline]
    fn descriptor_by_type(&self, type_id: TypeId) -> Option<TypeDescriptor> {
        self.definition_map.descriptor_by_type(type_id)
    }

    #[inline]
    fn casts(&self, type_id: TypeId) -> Vec<Cast> {
        self.definition_map.casts(type_id)
    }

    #[inline]
    fn is_registered(&self, name: &str) -> bool {
        self.definition_map.is_registered(name)
    }

    #[inline]
    fn all_descriptors(&self) -> FxHashMap<Identifier, TypeDescriptor> {
        self.definition_map.all_descriptors()
    }
}

mod map {
    use crate::error::TypeRegistryError;
    use crate::identifier::Identifier;
    use crate::instance::Cast;
    use crate::reflect::TypeDescriptor;
    use fxhash::FxHashMap;
    use std::any::TypeId;

    #[derive(Default, Clone, Debug)]
    pub(super) struct TypeDefinitionMap {
        descriptors: FxHashMap<Identifier, TypeDescriptor>,
        names: FxHashMap<TypeId, Identifier>,
        casts: FxHashMap<TypeId, Vec<Cast>>,
    }

    impl TypeDefinitionMap {
        pub(super) fn try_register_type(
            &mut self,
            descriptor: TypeDescriptor,
            allow_type_overriding: bool,
        ) -> Result<(), TypeRegistryError> {
            if let Some(previous) = self.descriptors.get(&descriptor.name) {
                if !allow_type_overriding {
                    return Err(TypeRegistryError::DuplicateTypeName(
                        descriptor.name.clone(),
                    ));
                }

                if self.names.get(&previous.type_id) == Some(&descriptor.name) {
                    self.names.remove(&previous.type_id);
                }
            }

            self.names
                .insert(descriptor.type_id, descriptor.name.clone());
            self.descriptors.insert(descriptor.name.clone(), descriptor);

            Ok(())
        }

        pub(super) fn register_cast(&mut self, source: TypeId, cast: Cast) {
            let casts = self.casts.entry(source).or_default();
            if let Some(known) = casts.iter_mut().find(|known| known.target == cast.target) {
                *known = cast;
            } else {
                casts.push(cast);
            }
        }

        #[inline]
        pub(super) fn descriptor(&self, name: &str) -> Option<TypeDescriptor> {
            self.descriptors.get(name).cloned()
        }

        pub(super) fn descriptor_by_type(&self, type_id: TypeId) -> Option<TypeDescriptor> {
            self.names
                .get(&type_id)
                .and_then(|name| self.descriptors.get(name))
                .cloned()
        }

        pub(super) fn casts(&self, type_id: TypeId) -> Vec<Cast> {
            self.casts.get(&type_id).cloned().unwrap_or_default()
        }

        #[inline]
        pub(super) fn is_registered(&self, name: &str) -> bool {
            self.descriptors.contains_key(name)
        }

        #[inline]
        pub(super) fn len(&self) -> usize {
            self.descriptors.len()
        }

        #[inline]
        pub(super) fn all_descriptors(&self) -> FxHashMap<Identifier, TypeDescriptor> {
            self.descriptors.clone()
        }
    }

}

#[doc(hidden)]
pub mod internal {
    use crate::instance::Cast;
    use crate::reflect::TypeDescriptor;
    use inventory::collect;
    pub use inventory::submit;
    use std::any::TypeId;

    pub struct TypeRegisterer {
        pub register: fn() -> TypeDescriptor,
    }

    pub struct CastRegisterer {
        /// Returns the concrete source type and its cast.
        pub register: fn() -> (TypeId, Cast),
    }

    collect!(TypeRegisterer);
    collect!(CastRegisterer);
}
