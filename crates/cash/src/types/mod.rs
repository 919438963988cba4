//! Holds Bitcoin Cash output types: locking scripts and transaction outputs.

pub mod script;
pub mod txout;

pub use script::*;
pub use txout::*;
