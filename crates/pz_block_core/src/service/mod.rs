//! Block use-case service and caller-facing result envelope.
//!
//! # Responsibility
//! - Expose the five block operations to the external controller layer.
//! - Convert typed results into the uniform `state/msg/count` envelope.

pub mod block_service;
pub mod envelope;
