//! Arbor Core Types
//!
//! This crate provides the foundational types for the arbor tree layout
//! engine. It includes:
//!
//! - **Geometry**: Basic geometric types ([`geometry`] module) shared by the
//!   layout engine and its consumers.

pub mod geometry;
