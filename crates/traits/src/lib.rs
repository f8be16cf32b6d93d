//! Core hashing traits for the b3tree workspace.
//!
//! This crate provides the traits that hash implementations in the workspace
//! conform to. It is `no_std` compatible and has zero dependencies.
//!
//! # Trait Hierarchy
//!
//! | Trait | Purpose | Examples |
//! |-------|---------|----------|
//! | [`Digest`] | Fixed-size cryptographic digests | BLAKE3 (hash mode) |
//! | [`Xof`] | Extendable output streams | BLAKE3 output reader |
//!
//! # Error Types
//!
//! - [`SeekError`] - Rejected reposition of an output stream
//!
//! # Fallibility Discipline
//!
//! This crate denies `unwrap`, `expect`, and indexing in non-test code to ensure
//! all error paths are handled explicitly.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod digest;
pub mod error;
mod xof;

pub use digest::Digest;
pub use error::SeekError;
pub use xof::Xof;
