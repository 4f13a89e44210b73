//! Cross-module test suites.

mod atomicity;
mod round_trip;
