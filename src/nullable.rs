//! Operations on operands that may be absent.
//!
//! The methods of [GrowableString] need a string to work on. These functions accept `None` in its
//! place and apply a fixed policy per operation:
//!
//! * Constructors treat an absent source as empty content.
//! * Mutations of an absent receiver fail with [Error::InvalidOperand] and do nothing else.
//!   [reverse] has nothing to report and simply does nothing.
//! * Queries answer as for an empty string, except [is_empty] and [compare], which can't give an
//!   honest answer and fail with [Error::InvalidOperand].
//! * [strict_equal] is `false` whenever any operand is absent.
//!
//! ```rust
//! # use growable_string::{nullable, Error, GrowableString};
//! let s = nullable::from_bytes(None).unwrap();
//! assert!(s.is_empty());
//!
//! assert_eq!(Err(Error::InvalidOperand), nullable::compare(Some(&s), None));
//! assert!(!nullable::strict_equal(None, None));
//! ```

use core::cmp::Ordering;

use crate::{Error, GrowableString};

/// Creates a string holding a copy of `bytes`, or an empty one.
pub fn from_bytes(bytes: Option<&[u8]>) -> Result<GrowableString, Error> {
    GrowableString::from_bytes(bytes.unwrap_or_default())
}

/// Copies `other`, or creates an empty string.
pub fn from_instance(other: Option<&GrowableString>) -> Result<GrowableString, Error> {
    match other {
        Some(other) => other.try_clone(),
        None => GrowableString::new(),
    }
}

/// The content followed by a zero byte, or just the zero byte.
pub fn as_bytes_with_nul(s: Option<&GrowableString>) -> &[u8] {
    s.map(GrowableString::as_bytes_with_nul).unwrap_or(b"\0".as_slice())
}

/// Length of the content, zero when absent.
pub fn len(s: Option<&GrowableString>) -> usize {
    s.map(GrowableString::len).unwrap_or_default()
}

/// Is the string empty? An absent string is neither.
pub fn is_empty(s: Option<&GrowableString>) -> Result<bool, Error> {
    s.map(GrowableString::is_empty).ok_or(Error::InvalidOperand)
}

/// See [GrowableString::append_byte].
pub fn append_byte(s: Option<&mut GrowableString>, byte: u8) -> Result<(), Error> {
    s.ok_or(Error::InvalidOperand)?.append_byte(byte)
}

/// See [GrowableString::append_bytes].
pub fn append_bytes(s: Option<&mut GrowableString>, bytes: Option<&[u8]>) -> Result<(), Error> {
    match (s, bytes) {
        (Some(s), Some(bytes)) => s.append_bytes(bytes),
        _ => Err(Error::InvalidOperand),
    }
}

/// See [GrowableString::append].
pub fn append(s: Option<&mut GrowableString>, other: Option<&GrowableString>) -> Result<(), Error> {
    match (s, other) {
        (Some(s), Some(other)) => s.append(other),
        _ => Err(Error::InvalidOperand),
    }
}

/// See [GrowableString::clear].
pub fn clear(s: Option<&mut GrowableString>) -> Result<(), Error> {
    s.ok_or(Error::InvalidOperand)?.clear()
}

/// See [GrowableString::reverse].
pub fn reverse(s: Option<&mut GrowableString>) {
    if let Some(s) = s {
        s.reverse();
    }
}

/// See [GrowableString::remove].
pub fn remove(s: Option<&mut GrowableString>, start: usize, end: usize) -> Result<(), Error> {
    s.ok_or(Error::InvalidOperand)?.remove(start, end)
}

/// See [GrowableString::slice].
pub fn slice(s: Option<&GrowableString>, start: usize, end: usize) -> Result<GrowableString, Error> {
    s.ok_or(Error::InvalidOperand)?.slice(start, end)
}

/// See [GrowableString::compare].
pub fn compare(a: Option<&GrowableString>, b: Option<&GrowableString>) -> Result<Ordering, Error> {
    match (a, b) {
        (Some(a), Some(b)) => Ok(a.compare(b)),
        _ => Err(Error::InvalidOperand),
    }
}

/// See [GrowableString::strict_equal].
pub fn strict_equal(a: Option<&GrowableString>, b: Option<&GrowableString>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.strict_equal(b),
        _ => false,
    }
}
