//! Core functionality for binding identifiers to [Recipe]s and resolving instances.
//!
//! Resolution of an identifier goes through the following steps:
//!
//! 1. The concrete target is looked up: the bound recipe, or the identifier itself when nothing is
//! bound.
//! 2. A factory, or a target equal to the identifier, is built directly. Any other alias is
//! resolved recursively, which makes chains of bindings possible.
//! 3. Building a type walks its [TypeDescriptor](crate::reflect::TypeDescriptor) and makes every
//! dependency before calling the constructor.
//!
//! Every failure is returned to the caller of [Container::make] or [Container::build].

use crate::config::ContainerConfig;
use crate::error::{ContainerBuildError, ResolutionError};
use crate::identifier::Identifier;
use crate::instance::{Instance, InstancePtr};
use crate::reflect::{Arguments, Parameter};
use crate::registry::{StaticTypeRegistry, TypeRegistry, TypeRegistryPtr};
use crate::scope::{PrototypeScope, ScopePtr, SingletonScope};
use derivative::Derivative;
use fxhash::FxHashMap;
use itertools::Itertools;
use std::any::type_name;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Factory function creating an instance with full access to the container.
pub type FactoryPtr =
    Arc<dyn Fn(&mut Container) -> Result<Instance, ResolutionError> + Send + Sync>;

/// Construction recipe for a bound identifier.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub enum Recipe {
    /// Custom construction logic.
    Factory(#[derivative(Debug = "ignore")] FactoryPtr),
    /// Another identifier to resolve. When equal to the bound identifier, the type with that name
    /// gets constructed directly.
    Alias(Identifier),
}

impl Recipe {
    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn(&mut Container) -> Result<Instance, ResolutionError> + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(factory))
    }
}

impl From<&str> for Recipe {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Alias(value.into())
    }
}

impl From<String> for Recipe {
    #[inline]
    fn from(value: String) -> Self {
        Self::Alias(value.into())
    }
}

impl From<Identifier> for Recipe {
    #[inline]
    fn from(value: Identifier) -> Self {
        Self::Alias(value)
    }
}

impl From<FactoryPtr> for Recipe {
    #[inline]
    fn from(value: FactoryPtr) -> Self {
        Self::Factory(value)
    }
}

/// A registered recipe together with its sharing policy.
#[derive(Clone, Debug)]
pub struct Binding {
    pub recipe: Recipe,
    /// Shared bindings keep the first constructed instance in the container's shared scope.
    pub shared: bool,
}

/// Builder for [Container] with sensible defaults, for easy construction.
#[derive(Default)]
pub struct ContainerBuilder {
    config: ContainerConfig,
    registry: Option<TypeRegistryPtr>,
    shared_scope: Option<ScopePtr>,
}

impl ContainerBuilder {
    /// Creates a new builder with a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new builder with configuration loaded by
    /// [ContainerConfig::init_from_environment].
    pub fn from_environment() -> Result<Self, ContainerBuildError> {
        Ok(Self::new().with_config(ContainerConfig::init_from_environment()?))
    }

    /// Sets new configuration.
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets new [TypeRegistry]. By default, a [StaticTypeRegistry] is used.
    pub fn with_registry(mut self, registry: TypeRegistryPtr) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets new scope for shared bindings, instead of the one selected by configuration.
    pub fn with_shared_scope(mut self, shared_scope: ScopePtr) -> Self {
        self.shared_scope = Some(shared_scope);
        self
    }

    /// Builds resulting [Container].
    pub fn build(self) -> Result<Container, ContainerBuildError> {
        let registry = match self.registry {
            Some(registry) => registry,
            None => Box::new(StaticTypeRegistry::new(self.config.allow_type_overriding)?),
        };

        let shared_scope = self.shared_scope.unwrap_or_else(|| {
            if self.config.shared_instances {
                Box::<SingletonScope>::default()
            } else {
                Box::<PrototypeScope>::default()
            }
        });

        Ok(Container::new(
            registry,
            shared_scope,
            self.config.max_resolution_depth,
        ))
    }
}

/// The Inversion of Control container. Owns the binding table and resolves instances using
/// descriptors from a [TypeRegistry].
pub struct Container {
    registry: TypeRegistryPtr,
    bindings: FxHashMap<Identifier, Binding>,
    shared_scope: ScopePtr,
    resolution_chain: Vec<Identifier>,
    max_resolution_depth: usize,
}

impl Container {
    /// Creates a new container with an empty binding table.
    pub fn new(
        registry: TypeRegistryPtr,
        shared_scope: ScopePtr,
        max_resolution_depth: usize,
    ) -> Self {
        Self {
            registry,
            bindings: Default::default(),
            shared_scope,
            resolution_chain: Default::default(),
            max_resolution_depth,
        }
    }

    /// Binds `identifier` to given recipe, replacing any previous binding along with its shared
    /// instance. The target is not validated - failures surface when making the identifier.
    pub fn bind<I: Into<Identifier>, R: Into<Recipe>>(
        &mut self,
        identifier: I,
        recipe: R,
        shared: bool,
    ) {
        let identifier = identifier.into();
        let recipe = recipe.into();

        debug!("Binding [{identifier}] to {recipe:?} (shared: {shared}).");

        if self.shared_scope.remove_instance(&identifier).is_some() {
            debug!("Dropped shared instance of rebound [{identifier}].");
        }

        self.bindings
            .insert(identifier, Binding { recipe, shared });
    }

    /// Binds `identifier` to itself, i.e. the type with that name gets constructed directly.
    pub fn bind_type<I: Into<Identifier>>(&mut self, identifier: I, shared: bool) {
        let identifier = identifier.into();
        self.bind(identifier.clone(), identifier, shared);
    }

    /// Binds `identifier` to a factory function.
    pub fn bind_factory<I, F>(&mut self, identifier: I, factory: F, shared: bool)
    where
        I: Into<Identifier>,
        F: Fn(&mut Container) -> Result<Instance, ResolutionError> + Send + Sync + 'static,
    {
        self.bind(identifier, Recipe::factory(factory), shared);
    }

    /// Binds `identifier` as shared.
    #[inline]
    pub fn singleton<I: Into<Identifier>, R: Into<Recipe>>(&mut self, identifier: I, recipe: R) {
        self.bind(identifier, recipe, true);
    }

    #[inline]
    pub fn is_bound(&self, identifier: &str) -> bool {
        self.bindings.contains_key(identifier)
    }

    #[inline]
    pub fn binding(&self, identifier: &str) -> Option<&Binding> {
        self.bindings.get(identifier)
    }

    #[inline]
    pub fn registry(&self) -> &dyn TypeRegistry {
        self.registry.as_ref()
    }

    /// Gives access to the registry, e.g. for registering types manually.
    #[inline]
    pub fn registry_mut(&mut self) -> &mut (dyn TypeRegistry + Send + Sync) {
        self.registry.as_mut()
    }

    /// Resolves and constructs an instance for `identifier`, following aliases.
    pub fn make<I: Into<Identifier>>(&mut self, identifier: I) -> Result<Instance, ResolutionError> {
        let identifier = identifier.into();

        if self.resolution_chain.contains(&identifier) {
            let mut path = self.resolution_chain.clone();
            path.push(identifier);

            warn!("Circular dependency detected: {}", path.iter().join(" -> "));
            return Err(ResolutionError::DependencyCycle(path));
        }

        if self.resolution_chain.len() >= self.max_resolution_depth {
            warn!("Maximum resolution depth exceeded when resolving [{identifier}].");
            return Err(ResolutionError::ResolutionTooDeep {
                identifier,
                depth: self.max_resolution_depth,
            });
        }

        let shared = self
            .bindings
            .get(&identifier)
            .map(|binding| binding.shared)
            .unwrap_or(false);

        if shared {
            if let Some(instance) = self.shared_scope.instance(&identifier) {
                debug!("Reusing shared instance of [{identifier}].");
                return Ok(instance);
            }
        }

        self.resolution_chain.push(identifier.clone());
        let instance = self.resolve(&identifier);
        self.resolution_chain.pop();

        let instance = instance?;
        if shared {
            self.shared_scope
                .store_instance(&identifier, instance.clone());
        }

        Ok(instance)
    }

    /// Typesafe version of [Container::make], returning the instance viewed as `T`.
    pub fn make_typed<T: ?Sized + 'static>(
        &mut self,
        identifier: &str,
    ) -> Result<InstancePtr<T>, ResolutionError> {
        let instance = self.make(identifier)?;
        instance
            .cast::<T>()
            .ok_or_else(|| ResolutionError::IncompatibleInstance {
                identifier: identifier.into(),
                type_name: instance.type_name().clone(),
                expected: type_name::<T>(),
            })
    }

    fn concrete(&self, identifier: &Identifier) -> Recipe {
        self.bindings
            .get(identifier)
            .map(|binding| binding.recipe.clone())
            .unwrap_or_else(|| Recipe::Alias(identifier.clone()))
    }

    fn resolve(&mut self, identifier: &Identifier) -> Result<Instance, ResolutionError> {
        match self.concrete(identifier) {
            Recipe::Alias(target) if &target != identifier => {
                trace!("Resolving [{identifier}] through [{target}].");
                self.make(target)
            }
            concrete => self.build(&concrete),
        }
    }

    /// Constructs an instance directly from a recipe: factories are called with the container,
    /// while aliases are treated as names of types to construct.
    pub fn build(&mut self, target: &Recipe) -> Result<Instance, ResolutionError> {
        match target {
            Recipe::Factory(factory) => {
                let instance = factory(self)?;
                Ok(self.attach_type_information(instance))
            }
            Recipe::Alias(type_name) => self.build_type(type_name),
        }
    }

    fn attach_type_information(&self, mut instance: Instance) -> Instance {
        instance.extend_casts(self.registry.casts(instance.type_id()));
        match self.registry.descriptor_by_type(instance.type_id()) {
            Some(descriptor) => instance.with_type_name(descriptor.name),
            None => instance,
        }
    }

    fn build_type(&mut self, type_name: &Identifier) -> Result<Instance, ResolutionError> {
        let descriptor = self.registry.descriptor(type_name).ok_or_else(|| {
            debug!("No type registered with name [{type_name}].");
            ResolutionError::NotInstantiable(type_name.clone())
        })?;

        let (constructor, identity_cast) =
            match (descriptor.constructor, descriptor.identity_cast) {
                (Some(constructor), Some(identity_cast)) => (constructor, identity_cast),
                _ => return Err(ResolutionError::NotInstantiable(type_name.clone())),
            };

        trace!(
            "Constructing [{type_name}] with {} parameters.",
            descriptor.parameters.len()
        );

        let values: Vec<Option<Instance>> = descriptor
            .parameters
            .iter()
            .map(|parameter| match parameter {
                Parameter::Dependency(dependency) => self.make(dependency).map(Some),
                Parameter::Placeholder => Ok(None),
            })
            .try_collect()?;

        let mut arguments = Arguments::new(descriptor.name.clone(), values);
        let value = constructor(&mut arguments)?;

        let mut instance =
            Instance::from_parts(descriptor.name, descriptor.type_id, value, vec![identity_cast]);
        instance.extend_casts(self.registry.casts(descriptor.type_id));

        Ok(instance)
    }
}
