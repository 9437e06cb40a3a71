//! Crate regarding load-test 'result' files
//!
//! A result file is line-delimited JSON, one [`record::Record`] per line, as
//! written by HTTP load generators. This crate owns the record shape and the
//! all-or-nothing decoding of a result stream.

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::perf)]
#![deny(clippy::suspicious)]
#![deny(clippy::complexity)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
#![deny(clippy::unwrap_used)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![deny(unreachable_pub)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod decode;
pub mod record;

pub use decode::{Error, parse};
pub use record::Record;
