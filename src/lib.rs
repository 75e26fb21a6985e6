//! A growable byte string that manages its own heap block.
//!
//! [GrowableString] is an owned buffer of raw bytes with an explicitly tracked length and capacity.
//! It doesn't care about encodings, every byte (including zero) is content. What sets it apart from
//! a plain `Vec<u8>`:
//!
//! * Every operation that may allocate is fallible. Running out of memory (or out of the counter
//!   range) is reported as an [Error] and leaves the string untouched, instead of aborting.
//! * There's always room for a zero terminator after the content, so the content is available as
//!   a C-style string at any time.
//! * The capacity follows a fixed, predictable policy, see [DEFAULT_CAPACITY] and
//!   [GROWTH_INCREMENT].
//! * Ranges follow the "zero or past the end means up to the end" convention, so
//!   `remove(start, 0)` truncates.
//!
//! The [nullable] module offers the same operations for operands that may be missing.
//!
//! # Features
//!
//! * `std` (default): `std::io::Write` support, turn off for `no_std` (with `alloc`).
//! * `serde`: (de)serialization as a byte string.
//! * `cli`: the `palindrome` demo binary.
//! * `test-utils`: the [AllocBehaviour] failure injection, for testing code that handles
//!   allocation failures.
//!
//! # Example
//!
//! ```rust
//! # use growable_string::GrowableString;
//! let word = GrowableString::from_bytes(b"racecar").unwrap();
//! let mut reversed = word.try_clone().unwrap();
//! reversed.reverse();
//! assert!(word.strict_equal(&reversed));
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

extern crate alloc;

mod error;
pub mod nullable;
mod raw;
#[cfg(feature = "serde")]
mod serde_impl;
mod string;

pub use error::Error;
#[cfg(any(test, feature = "test-utils"))]
pub use raw::AllocBehaviour;
pub use string::{GrowableString, DEFAULT_CAPACITY, GROWTH_INCREMENT};

#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
