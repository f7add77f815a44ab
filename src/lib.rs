//! Cost basis and treatment pricing for a small clinic.
//!
//! The [`core`] module is the pure engine: every function takes plain records
//! by reference and returns a value or a [`core::PricingError`]. Storage lives
//! behind [`store::ClinicStore`] and is never touched by the engine.

pub mod catalog;
pub mod core;
pub mod store;
