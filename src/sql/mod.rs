//! Parameterized SQL for the products table: identifiers are fixed, values are bound.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
