//! In-process SPMD process-group runtime
//!
//! This crate provides the group runtime the harness coordinates through:
//! - ProcessGroup: per-rank handle with group-scoped barrier and split
//! - World: builder for the well-known global group of an SPMD run
//!
//! One OS thread plays one rank. Every collective call (barrier, split) is
//! a rendezvous of exactly the members of the group handle it was issued
//! on; a structural mismatch between ranks therefore blocks forever, which
//! is the hang signature the harness scenarios are designed to surface.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod group;
pub mod world;

pub use group::ProcessGroup;
pub use world::World;
