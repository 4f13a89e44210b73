use thiserror::Error;

/// Errors returned by tree mutation operations.
///
/// Every variant is recoverable: the component the operation was called on is
/// guaranteed to be unchanged when one of these is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationError {
    /// The property name is not in the component's schema and is not a
    /// syntactically valid extension name.
    #[error("property is not allowed on this component")]
    InvalidProperty,

    /// A parameter was rejected by the property.
    #[error("parameter is not valid for this property")]
    InvalidParameter,

    /// The property's parameters are individually acceptable but violate an
    /// interdependency rule (e.g. ENCODING without a matching VALUE).
    #[error("property parameters violate the property invariant")]
    PropertyInvariantViolation,

    /// The value does not conform to the property's declared value type.
    #[error("value does not match the property's type")]
    InvalidValue,

    /// Accepting the property would break a component-level invariant.
    #[error("addition would violate the component invariant")]
    ComponentInvariantViolation,

    /// The child component kind is not allowed under this component.
    #[error("component kind is not allowed as a child here")]
    InvalidComponentKind,

    /// No value was supplied and the property has no intrinsic default.
    #[error("property has no default value")]
    NoDefaultValue,
}

/// Error returned when serialization is refused.
///
/// Serialization failure is a single condition; callers wanting detail run
/// validation themselves.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializeError {
    /// The component tree does not satisfy [`crate::Component::is_valid`].
    #[error("component tree is not valid")]
    NotValid,
}
