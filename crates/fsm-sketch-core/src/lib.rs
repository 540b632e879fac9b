//! FSM Sketch Core Types
//!
//! This crate provides the foundational types shared by the FSM sketch
//! pipelines. It includes:
//!
//! - **Geometry**: points in the 100x100 sketch space ([`geometry`] module)
//! - **Model**: catalogues, FSM descriptions, and transitions ([`model`] module)
//! - **Curve**: deterministic curve synthesis for unrouted transitions ([`curve`] module)

pub mod curve;
pub mod geometry;
pub mod model;
