//! Repository layer for block persistence.
//!
//! # Responsibility
//! - Define the data access contract used by the block service.
//! - Keep SQL details for `pz_block` inside this module.
//!
//! # Invariants
//! - Write paths validate field limits before SQL executes.
//! - Each operation maps to a single statement (paging issues a count and a
//!   select) with no cross-statement transaction.

pub mod block_repo;
