//! Domain model for admin-panel content blocks.
//!
//! # Invariants
//! - Every persisted block is identified by a store-assigned `BlockId`.
//! - Deletion is a hard delete; nothing references a block.

pub mod block;
