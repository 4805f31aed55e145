#![forbid(unsafe_code)]

//! Core: the item/group model, run chunking, invariant checks and plans.
//!
//! # Role in tabweave
//! `tabweave-core` holds everything the engines share. The arrangement crate
//! (`tabweave-arrange`) reads [`Snapshot`]s, chunks them with
//! [`chunk::chunk_ranges`], and returns [`Plan`]s; the host store applies those
//! plans to its authoritative sequence.
//!
//! # Primary responsibilities
//! - **Model**: [`Item`], [`Group`], [`Snapshot`], [`Direction`], [`WeakGroup`].
//! - **Chunking**: maximal runs of adjacent equal keys.
//! - **Invariants**: density, pinned precedence, group contiguity, highlight
//!   and active rules, reported as [`InvariantReport`].
//! - **Plans**: changed-field diffs with a reference `apply`.

pub mod chunk;
pub mod error;
pub mod invariant;
pub mod model;
pub mod plan;

pub use chunk::{Run, chunk, chunk_ranges};
pub use error::ArrangeError;
pub use invariant::{InvariantCode, InvariantIssue, InvariantReport};
pub use model::{Direction, Group, GroupId, Item, ItemId, Snapshot, WeakGroup};
pub use plan::{Plan, TransferPlan};
