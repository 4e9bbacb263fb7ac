//! Game implementations.

pub mod quantum;
