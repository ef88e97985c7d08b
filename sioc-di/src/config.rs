//! Container configuration

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DiError, DiResult};

/// How long a resolved service lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// A new instance for every resolution
    Transient,
    /// One instance, created at registration time and shared afterwards
    Singleton,
}

impl Lifetime {
    /// Whether this is [`Lifetime::Singleton`]
    pub fn is_singleton(self) -> bool {
        matches!(self, Lifetime::Singleton)
    }
}

impl From<bool> for Lifetime {
    fn from(singleton: bool) -> Self {
        if singleton {
            Lifetime::Singleton
        } else {
            Lifetime::Transient
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Transient => write!(f, "transient"),
            Lifetime::Singleton => write!(f, "singleton"),
        }
    }
}

/// A service registered by type name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Fully qualified or short type name of a declared type
    pub service_type: String,
    /// Service lifetime
    pub lifetime: Lifetime,
}

/// Container configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Fail with a cycle error when a type is requested while it is being built
    pub detect_cycles: bool,
    /// Maximum depth of a single resolution chain
    pub max_depth: usize,
    /// Load the types submitted with `injectable!`
    pub include_declarations: bool,
    /// Services to register, in order
    pub services: Vec<ServiceConfig>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            detect_cycles: true,
            max_depth: 256,
            include_declarations: true,
            services: Vec::new(),
        }
    }
}

impl ContainerConfig {
    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> DiResult<Self> {
        toml::from_str::<Self>(toml_str)
            .map_err(|e| DiError::ConfigError(format!("Failed to parse TOML: {}", e)))?
            .validated()
    }

    /// Load configuration from JSON string
    pub fn from_json(json_str: &str) -> DiResult<Self> {
        serde_json::from_str::<Self>(json_str)
            .map_err(|e| DiError::ConfigError(format!("Failed to parse JSON: {}", e)))?
            .validated()
    }

    pub(crate) fn validated(self) -> DiResult<Self> {
        if self.max_depth == 0 {
            return Err(DiError::ConfigError(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Configuration builder with validation
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: ContainerConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle cycle detection
    pub fn detect_cycles(mut self, enabled: bool) -> Self {
        self.config.detect_cycles = enabled;
        self
    }

    /// Limit the depth of a resolution chain
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Toggle loading of `injectable!` declarations
    pub fn include_declarations(mut self, enabled: bool) -> Self {
        self.config.include_declarations = enabled;
        self
    }

    /// Add a service by type name
    pub fn service(mut self, service_type: impl Into<String>, lifetime: Lifetime) -> Self {
        self.config.services.push(ServiceConfig {
            service_type: service_type.into(),
            lifetime,
        });
        self
    }

    /// Build the configuration
    pub fn build(self) -> DiResult<ContainerConfig> {
        self.config.validated()
    }
}

// Example configuration file format:
// ```toml
// detect_cycles = true
// max_depth = 64
//
// [[services]]
// service_type = "ConsoleLogger"
// lifetime = "singleton"
//
// [[services]]
// service_type = "my_app::RequestHandler"
// lifetime = "transient"
// ```
