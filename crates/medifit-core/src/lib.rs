//! # MediFit-Core
//!
//! Core types and utilities shared by the MediFit exercise tracking crates:
//! pose landmarks as delivered by the external pose estimator, identifiers,
//! timestamps, and the joint-angle geometry every exercise is measured with.

pub mod error;
pub mod geometry;
pub mod types;

pub use error::{Error, Result};
pub use geometry::*;
pub use types::*;
