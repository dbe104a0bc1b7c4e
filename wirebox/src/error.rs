use crate::identifier::Identifier;
use crate::instance::ErrorPtr;
use config::ConfigError;
use itertools::Itertools;
use thiserror::Error;

/// Errors related to resolving and constructing instances.
#[derive(Error, Clone, Debug)]
pub enum ResolutionError {
    #[error("Target [{0}] is not instantiable")]
    NotInstantiable(Identifier),
    #[error("Circular dependency detected while resolving: {}", .0.iter().join(" -> "))]
    DependencyCycle(Vec<Identifier>),
    #[error("Resolving [{identifier}] exceeded the maximum resolution depth of {depth}")]
    ResolutionTooDeep { identifier: Identifier, depth: usize },
    #[error("Instance of [{type_name}] cannot be used as {expected} in [{identifier}]")]
    IncompatibleInstance {
        identifier: Identifier,
        type_name: Identifier,
        expected: &'static str,
    },
    #[error("Missing constructor argument #{index} for [{identifier}]")]
    MissingArgument { identifier: Identifier, index: usize },
    #[error("Error constructing [{identifier}]: {error}")]
    ConstructionFailed {
        identifier: Identifier,
        error: ErrorPtr,
    },
}

/// Errors related to type registries.
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum TypeRegistryError {
    #[error("Attempted to register a duplicated type with name: {0}")]
    DuplicateTypeName(Identifier),
}

/// Errors which can occur when building a [Container](crate::container::Container).
#[derive(Error, Debug)]
pub enum ContainerBuildError {
    #[error("Error creating type registry: {0}")]
    Registry(#[from] TypeRegistryError),
    #[error("Error loading container configuration: {0}")]
    Config(#[from] ConfigError),
}
