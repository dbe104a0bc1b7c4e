//! Container configuration. By default, the config is created with opinionated default values,
//! which can be overwritten by environment variables prefixed with `WIREBOX_` or a `wirebox.json`
//! file, when using [ContainerConfig::init_from_environment].

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_ENV_PREFIX: &str = "WIREBOX";
const MIN_RESOLUTION_DEPTH: usize = 1;

/// Name of the default config file.
pub const CONFIG_FILE: &str = "wirebox.json";

/// Configuration of a [Container](crate::container::Container).
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContainerConfig {
    /// Should instances of shared bindings be reused. When disabled, the `shared` flag is recorded
    /// but every resolution constructs a new instance.
    pub shared_instances: bool,
    /// Can type descriptors with duplicate names replace earlier ones.
    pub allow_type_overriding: bool,
    /// Maximum number of nested resolutions in a single `make` call. Never less than 1, so the
    /// top-level identifier can always be resolved.
    pub max_resolution_depth: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            shared_instances: true,
            allow_type_overriding: true,
            max_resolution_depth: 128,
        }
    }
}

impl From<OptionalContainerConfig> for ContainerConfig {
    fn from(value: OptionalContainerConfig) -> Self {
        let default = Self::default();
        Self {
            shared_instances: value.shared_instances.unwrap_or(default.shared_instances),
            allow_type_overriding: value
                .allow_type_overriding
                .unwrap_or(default.allow_type_overriding),
            max_resolution_depth: value
                .max_resolution_depth
                .map(|depth| depth.max(MIN_RESOLUTION_DEPTH))
                .unwrap_or(default.max_resolution_depth),
        }
    }
}

impl ContainerConfig {
    /// Loads the config from the optional [CONFIG_FILE] and `WIREBOX_` environment variables,
    /// falling back to defaults for anything not present.
    pub fn init_from_environment() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX).try_parsing(true))
            .build()
            .and_then(|config| config.try_deserialize::<OptionalContainerConfig>())
            .map(|config| config.into())
    }

    pub fn with_shared_instances(mut self, shared_instances: bool) -> Self {
        self.shared_instances = shared_instances;
        self
    }

    pub fn with_allow_type_overriding(mut self, allow_type_overriding: bool) -> Self {
        self.allow_type_overriding = allow_type_overriding;
        self
    }

    /// Sets the maximum resolution depth. Values below 1 are raised to 1.
    pub fn with_max_resolution_depth(mut self, max_resolution_depth: usize) -> Self {
        self.max_resolution_depth = max_resolution_depth.max(MIN_RESOLUTION_DEPTH);
        self
    }
}

#[derive(Deserialize, Default)]
struct OptionalContainerConfig {
    shared_instances: Option<bool>,
    allow_type_overriding: Option<bool>,
    max_resolution_depth: Option<usize>,
}
