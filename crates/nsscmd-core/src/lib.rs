//! # nsscmd-core
//!
//! Resolution core for the `command` NSS hosts service: delegate a lookup to
//! an administrator-supplied executable, parse its directive output into a
//! host record, and pack that record into a caller-owned buffer in one of two
//! fixed binary layouts.
//!
//! Everything here is safe Rust over owned values and byte slices. Encoded
//! buffers are self-contained (all cross-references are byte offsets, see
//! [`encode`]); the conversion to real pointers happens in the ABI crate at
//! the process boundary. No `unsafe` code is permitted at the crate level.

#![deny(unsafe_code)]

pub mod encode;
pub mod parse;
pub mod record;
pub mod resolve;
pub mod runner;
pub mod status;
pub mod trust;
