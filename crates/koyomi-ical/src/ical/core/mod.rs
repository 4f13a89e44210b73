//! Core data model for iCalendar object trees.
//!
//! These types hold validated state only: mutation goes through atomic
//! operations on [`Component`], and values are parsed into typed form on the
//! way in.

pub mod component;
pub mod parameter;
pub mod property;
pub mod schema;
pub mod value;

pub use component::{Component, ComponentKind};
pub use parameter::Parameter;
pub use property::Property;
pub use schema::{Cardinality, Schema};
pub use value::{Date, DateTime, Duration, Period, Time, UtcOffset, Value, ValueKind};
