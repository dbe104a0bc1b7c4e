//! A minimal Inversion of Control container. A [Container](container::Container) maps
//! [identifiers](identifier::Identifier) to construction [recipes](container::Recipe) and resolves
//! object graphs by recursively satisfying constructor dependencies.
//!
//! Instead of runtime reflection, every constructible type publishes a static
//! [TypeDescriptor](reflect::TypeDescriptor) with an ordered list of dependency identifiers. The
//! descriptors are collected at program-init time into a [registry](registry), which the container
//! walks when autowiring.
//!
//! ```
//! use wirebox::container::ContainerBuilder;
//! use wirebox::instance::InstancePtr;
//! use wirebox::{contract, contract_impl, Constructible};
//!
//! #[contract]
//! trait Visit {
//!     fn go(&self) -> &'static str;
//! }
//!
//! #[derive(Constructible)]
//! struct Train;
//!
//! #[contract_impl]
//! impl Visit for Train {
//!     fn go(&self) -> &'static str {
//!         "by train"
//!     }
//! }
//!
//! #[derive(Constructible)]
//! struct Traveller {
//!     traffic_tool: InstancePtr<dyn Visit + Send + Sync>,
//! }
//!
//! let mut container = ContainerBuilder::new().build().unwrap();
//! container.bind("Visit", "Train", false);
//! container.bind("traveller", "Traveller", false);
//!
//! let traveller = container.make_typed::<Traveller>("traveller").unwrap();
//! assert_eq!(traveller.traffic_tool.go(), "by train");
//! ```
//!
//! ### Features
//!
//! * `derive` - automatically derive [Constructible](reflect::Constructible) and register contracts

pub mod config;
pub mod container;
mod error;
pub mod identifier;
pub mod instance;
pub mod reflect;
pub mod registry;
pub mod scope;

pub use error::{ContainerBuildError, ResolutionError, TypeRegistryError};

#[cfg(feature = "derive")]
pub use wirebox_derive::{contract, contract_impl, Constructible};
