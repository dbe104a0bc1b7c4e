//! Type-erased instances handed out by the [Container](crate::container::Container).
//!
//! An [Instance] remembers its concrete type together with a list of [Cast]s, which know how to
//! view the concrete value as one of the contracts it implements, e.g. `dyn Trait`. The identity
//! cast to the concrete type is always present.

use crate::identifier::Identifier;
use derivative::Derivative;
use std::any::{type_name, Any, TypeId};
use std::error::Error;
use std::sync::Arc;

pub type InstancePtr<T> = Arc<T>;

pub type InstanceAnyPtr = InstancePtr<dyn Any + Send + Sync + 'static>;

pub type ErrorPtr = Arc<dyn Error + Send + Sync>;

/// Casts a type-erased instance to a `Box<dyn Any>` holding `InstancePtr<T>`, where `T` is the
/// cast target. Returns the source instance back on failure.
pub type CastFunction = fn(instance: InstanceAnyPtr) -> Result<Box<dyn Any>, InstanceAnyPtr>;

/// A conversion from a concrete type to one of its contracts.
#[derive(Derivative, Clone, Copy)]
#[derivative(Debug)]
pub struct Cast {
    /// Type of the cast target, e.g. `dyn Trait + Send + Sync`.
    pub target: TypeId,
    pub target_name: &'static str,
    #[derivative(Debug = "ignore")]
    pub cast: CastFunction,
}

impl Cast {
    /// Creates a cast to `T` using given function.
    pub fn new<T: ?Sized + 'static>(cast: CastFunction) -> Self {
        Self {
            target: TypeId::of::<T>(),
            target_name: type_name::<T>(),
            cast,
        }
    }

    /// Creates the identity cast for a concrete type.
    pub fn identity<T: Any + Send + Sync>() -> Self {
        Self::new::<T>(identity_cast::<T>)
    }
}

fn identity_cast<T: Any + Send + Sync>(
    instance: InstanceAnyPtr,
) -> Result<Box<dyn Any>, InstanceAnyPtr> {
    instance
        .downcast::<T>()
        .map(|instance| Box::new(instance) as Box<dyn Any>)
}

/// A constructed, type-erased value.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct Instance {
    type_name: Identifier,
    type_id: TypeId,
    #[derivative(Debug = "ignore")]
    value: InstanceAnyPtr,
    casts: Vec<Cast>,
}

impl Instance {
    /// Wraps given value.
    #[inline]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_ptr(InstancePtr::new(value))
    }

    /// Wraps an already shared value.
    pub fn from_ptr<T: Any + Send + Sync>(value: InstancePtr<T>) -> Self {
        Self {
            type_name: type_name::<T>().into(),
            type_id: TypeId::of::<T>(),
            value: value as InstanceAnyPtr,
            casts: vec![Cast::identity::<T>()],
        }
    }

    /// Creates an instance from already erased parts. The identity cast is expected to be among
    /// `casts`.
    pub fn from_parts(
        type_name: Identifier,
        type_id: TypeId,
        value: InstanceAnyPtr,
        casts: Vec<Cast>,
    ) -> Self {
        Self {
            type_name,
            type_id,
            value,
            casts,
        }
    }

    /// Name of the concrete type: the registered identifier, if known, or the Rust type name.
    #[inline]
    pub fn type_name(&self) -> &Identifier {
        &self.type_name
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn value(&self) -> &InstanceAnyPtr {
        &self.value
    }

    #[inline]
    pub fn casts(&self) -> &[Cast] {
        &self.casts
    }

    /// Returns the instance viewed as `T`, which is either the concrete type or one of the
    /// contracts with a known cast.
    pub fn cast<T: ?Sized + 'static>(&self) -> Option<InstancePtr<T>> {
        let target = TypeId::of::<T>();
        self.casts
            .iter()
            .find(|cast| cast.target == target)
            .and_then(|cast| (cast.cast)(self.value.clone()).ok())
            .and_then(|boxed| boxed.downcast::<InstancePtr<T>>().ok())
            .map(|instance| *instance)
    }

    /// Checks if the instance can be viewed as `T`.
    #[inline]
    pub fn can_cast<T: ?Sized + 'static>(&self) -> bool {
        let target = TypeId::of::<T>();
        self.casts.iter().any(|cast| cast.target == target)
    }

    /// Adds casts not yet known to this instance. Re-registered targets keep the original cast.
    pub fn extend_casts<I: IntoIterator<Item = Cast>>(&mut self, casts: I) {
        for cast in casts {
            if !self.casts.iter().any(|known| known.target == cast.target) {
                self.casts.push(cast);
            }
        }
    }

    /// Renames the concrete type, typically to its registered identifier.
    #[inline]
    pub fn with_type_name(mut self, type_name: Identifier) -> Self {
        self.type_name = type_name;
        self
    }

    /// Checks if both instances point to the same value.
    #[inline]
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}
