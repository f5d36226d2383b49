//! Domain types shared by the TRG Nexus booking service crates.

pub mod errors;
pub mod models;
