//! # nsscmd-abi
//!
//! ABI boundary for the `command` NSS hosts service. Builds
//! `libnss_command.so`; with `hosts: ... command` in `/etc/nsswitch.conf`,
//! glibc dlopens it and calls the `_nss_command_*` symbols exported here.
//!
//! # Architecture
//!
//! ```text
//! glibc resolver -> entry point (this crate) -> nsscmd-core lookup
//!                 -> offset rebase in the caller's buffer -> nss_status
//! ```
//!
//! The core encodes buffers with self-relative offsets and never touches a
//! pointer; this crate converts those offsets into in-process addresses after
//! a successful lookup, then hands the caller a `hostent` or tuple chain
//! whose pointers all land inside the caller's own buffer.

pub mod hosts_abi;
pub mod netdb;
