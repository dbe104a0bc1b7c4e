//! Static type descriptors standing in for runtime reflection.
//!
//! Any type which wants to be autowired by the [Container](crate::container::Container) needs to
//! implement [Constructible], which describes its constructor parameters in declaration order and
//! knows how to construct the type from resolved [Arguments]. For convenience, the trait can be
//! derived when the `derive` feature is enabled:
//!
//! ```
//! use wirebox::instance::InstancePtr;
//! use wirebox::{contract, contract_impl, Constructible};
//!
//! #[contract]
//! trait Visit {}
//!
//! #[derive(Constructible)]
//! struct Leg;
//!
//! #[contract_impl]
//! impl Visit for Leg {}
//!
//! fn default_trips() -> u32 {
//!     1
//! }
//!
//! #[derive(Constructible)]
//! #[constructible(name = "Traveller")]
//! struct Traveller {
//!     // dependency resolved by making "Visit"
//!     traffic_tool: InstancePtr<dyn Visit + Send + Sync>,
//!     // dependency with an explicit identifier
//!     #[inject(name = "Leg")]
//!     spare: InstancePtr<dyn Visit + Send + Sync>,
//!     // scalar placeholders are never resolved
//!     #[inject(default = "default_trips")]
//!     trips: u32,
//!     visited: Vec<String>,
//! }
//! ```
//!
//! ### Supported `#[constructible]` struct configuration
//!
//! * `name = "name"` - register the type under given identifier instead of the struct name
//! * `constructor = "path"` - call `path(fields...)` to construct the type, instead of using
//! standard struct construction; parameters are passed in field order, skipping fields marked with
//! `#[inject(ignore)]`; the function returns `Result<Self, ErrorPtr>`
//!
//! ### Supported `#[inject]` field configuration
//!
//! * `name = "name"` - resolve the dependency using given identifier
//! * `default = "path"` - call `path()` to initialize a placeholder field
//! * `ignore` - ignore the field when using a custom constructor

use crate::error::ResolutionError;
use crate::identifier::Identifier;
use crate::instance::{Cast, Instance, InstanceAnyPtr, InstancePtr};
use derivative::Derivative;
use std::any::{type_name, TypeId};

/// Type-erased constructor of a described type.
pub type ConstructorFn =
    fn(arguments: &mut Arguments) -> Result<InstanceAnyPtr, ResolutionError>;

/// A single constructor parameter.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Parameter {
    /// Parameter with a class or contract type, resolved by making the given identifier.
    Dependency(Identifier),
    /// Scalar parameter, which is never resolved. The constructed type supplies its own value.
    Placeholder,
}

impl Parameter {
    #[inline]
    pub fn dependency<I: Into<Identifier>>(identifier: I) -> Self {
        Self::Dependency(identifier.into())
    }
}

/// Ordered arguments resolved for a constructor. Each call consumes the next argument.
#[derive(Debug)]
pub struct Arguments {
    identifier: Identifier,
    values: Vec<Option<Instance>>,
    index: usize,
}

impl Arguments {
    pub fn new(identifier: Identifier, values: Vec<Option<Instance>>) -> Self {
        Self {
            identifier,
            values,
            index: 0,
        }
    }

    /// Identifier of the type under construction.
    #[inline]
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Number of arguments not consumed yet.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.values.len().saturating_sub(self.index)
    }

    fn next_value(&mut self) -> Result<Option<Instance>, ResolutionError> {
        let index = self.index;
        let value = self
            .values
            .get_mut(index)
            .ok_or_else(|| ResolutionError::MissingArgument {
                identifier: self.identifier.clone(),
                index,
            })?
            .take();

        self.index += 1;
        Ok(value)
    }

    /// Takes the next dependency and casts it to `T`.
    pub fn instance<T: ?Sized + 'static>(&mut self) -> Result<InstancePtr<T>, ResolutionError> {
        let index = self.index;
        let instance = self
            .next_value()?
            .ok_or_else(|| ResolutionError::MissingArgument {
                identifier: self.identifier.clone(),
                index,
            })?;

        instance
            .cast::<T>()
            .ok_or_else(|| ResolutionError::IncompatibleInstance {
                identifier: self.identifier.clone(),
                type_name: instance.type_name().clone(),
                expected: type_name::<T>(),
            })
    }

    /// Skips the next scalar placeholder.
    pub fn placeholder(&mut self) -> Result<(), ResolutionError> {
        self.next_value().map(|_| ())
    }
}

/// A type which can be constructed by the container.
pub trait Constructible: Send + Sync + Sized + 'static {
    /// Identifier under which the type gets registered.
    const NAME: &'static str;

    /// Constructor parameters in declaration order.
    fn parameters() -> Vec<Parameter>;

    /// Constructs the type from resolved arguments, consumed in the order of [Self::parameters].
    fn construct(arguments: &mut Arguments) -> Result<Self, ResolutionError>;
}

fn construct_erased<T: Constructible>(
    arguments: &mut Arguments,
) -> Result<InstanceAnyPtr, ResolutionError> {
    T::construct(arguments).map(|instance| InstancePtr::new(instance) as InstanceAnyPtr)
}

/// Static description of a type: its name, constructor parameters and constructor.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct TypeDescriptor {
    pub name: Identifier,
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub parameters: Vec<Parameter>,
    /// Missing constructor marks an abstract contract.
    #[derivative(Debug = "ignore")]
    pub constructor: Option<ConstructorFn>,
    /// Cast of constructed instances to the concrete type itself.
    pub identity_cast: Option<Cast>,
}

impl TypeDescriptor {
    /// Describes a concrete [Constructible] type.
    pub fn of<T: Constructible>() -> Self {
        Self {
            name: T::NAME.into(),
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            parameters: T::parameters(),
            constructor: Some(construct_erased::<T>),
            identity_cast: Some(Cast::identity::<T>()),
        }
    }

    /// Describes an abstract contract, usually a `dyn Trait`, which can never be instantiated.
    pub fn contract<C: ?Sized + 'static>(name: &str) -> Self {
        Self {
            name: name.into(),
            type_id: TypeId::of::<C>(),
            type_name: type_name::<C>(),
            parameters: Vec::new(),
            constructor: None,
            identity_cast: None,
        }
    }

    #[inline]
    pub fn is_instantiable(&self) -> bool {
        self.constructor.is_some()
    }
}
