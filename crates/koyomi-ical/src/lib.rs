//! RFC 2445 (iCalendar) object model, parser, and serializer.
//!
//! A calendar document is represented as a typed tree of [`Component`]s, each
//! carrying named [`Property`] instances validated against a per-kind schema.
//! Text is converted to a tree with [`parse`] and back with
//! [`Component::serialize`]; both directions go through the canonical
//! line-folded, CRLF-terminated wire format.
//!
//! Mutation goes through atomic operations: a rejected
//! [`Component::add_property`] or [`Component::add_component`] leaves the
//! tree exactly as it was before the call.

pub mod error;
pub mod ical;

pub use error::{MutationError, SerializeError};
pub use ical::build::serialize;
pub use ical::core::{Component, ComponentKind, Parameter, Property, Value};
pub use ical::parse::{ParseError, ParseErrorKind, ParseReport, parse};
pub use ical::registry::{Registry, RegistryConfig, default_registry};
