//! Error types for the DI container

use thiserror::Error;

/// Result type alias for DI operations
pub type DiResult<T> = Result<T, DiError>;

/// Errors that can occur while registering or resolving services
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// No constructor of the requested type (or of its dependencies) could be satisfied
    #[error("No registered implementation for {service}")]
    NotRegisteredImplementation {
        /// Type name of the service that could not be built
        service: &'static str,
    },

    /// Two constructors with the same parameter count compete for selection
    #[error("Ambiguous constructors for {service}: more than one takes {arity} parameter(s)")]
    AmbiguousConstructors {
        /// Type name of the service
        service: &'static str,
        /// The contested parameter count
        arity: usize,
    },

    /// More than one constructor carries the dependency marker
    #[error("{service} marks {count} constructors as the dependency constructor")]
    AmbiguousDependencyConstructor {
        /// Type name of the service
        service: &'static str,
        /// Number of marked constructors
        count: usize,
    },

    /// A key was registered twice
    #[error("Service already registered: {service}")]
    DuplicateRegistration {
        /// Type name of the service
        service: &'static str,
    },

    /// A key was requested again while it was still being built
    #[error("Circular dependency detected: {path}")]
    CyclicDependency {
        /// The in-progress resolution path, ending with the repeated key
        path: String,
    },

    /// The resolution chain grew deeper than the configured limit
    #[error("Resolution of {service} exceeded the maximum depth of {limit}")]
    DepthExceeded {
        /// Type name of the service being resolved when the limit was hit
        service: &'static str,
        /// Configured limit
        limit: usize,
    },

    /// An erased instance did not hold the expected type
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Requested type name
        expected: &'static str,
        /// Type name actually stored
        found: &'static str,
    },

    /// A constructor was handed the wrong number of resolved arguments
    #[error("Constructor for {service} expected {expected} argument(s), got {found}")]
    ArgumentCount {
        /// Type name of the service
        service: &'static str,
        /// Declared parameter count
        expected: usize,
        /// Number of arguments supplied
        found: usize,
    },

    /// A fallible constructor reported an error
    #[error("Failed to construct {service}: {reason}")]
    Construction {
        /// Type name of the service
        service: &'static str,
        /// Error reported by the constructor
        reason: String,
    },

    /// A configured service name does not match any declared type
    #[error("Unknown service name: {name}")]
    UnknownServiceName {
        /// The name as written in the configuration
        name: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DiError {
    /// Whether this error means nothing could build the requested service
    pub fn is_unsatisfied(&self) -> bool {
        matches!(self, DiError::NotRegisteredImplementation { .. })
    }

    /// Whether this error aborts the whole resolution.
    ///
    /// Any other failure while trying a constructor only rejects that
    /// constructor, and the selector moves on to the next candidate.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DiError::CyclicDependency { .. } | DiError::DepthExceeded { .. }
        )
    }
}
