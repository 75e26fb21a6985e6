use alloc::vec::Vec;
use core::ascii;
use core::borrow::{Borrow, BorrowMut};
use core::cmp::Ordering;
use core::ffi::CStr;
use core::fmt::{Debug, Display, Formatter, Result as FmtResult, Write};
use core::hash::{Hash, Hasher};
use core::ops::{Deref, DerefMut, Range};

use bytes::{Bytes, BytesMut};
use tracing::trace;

#[cfg(any(test, feature = "test-utils"))]
use crate::raw::AllocBehaviour;
use crate::raw::RawBuf;
use crate::Error;

/// Capacity of a freshly created [GrowableString].
pub const DEFAULT_CAPACITY: usize = 8;

/// How much the capacity grows when appending to a full [GrowableString].
pub const GROWTH_INCREMENT: usize = 32;

/// An owned, growable string of raw bytes.
///
/// The content lives in a single heap block that the string manages itself. The block always has
/// one byte more than [capacity][GrowableString::capacity], so there's room for a zero terminator
/// right after the content, which makes [as_bytes_with_nul][GrowableString::as_bytes_with_nul]
/// free.
///
/// Every operation that may need memory is fallible. When one fails, the string is left exactly as
/// it was.
///
/// # Growth
///
/// Capacity doesn't double. Appending to a full string adds [GROWTH_INCREMENT] bytes of capacity
/// (a bulk append adds as many increments as needed at once). Appending another [GrowableString]
/// grows the capacity to exactly fit. Removing bytes shrinks the block to exactly fit the rest.
///
/// # Example
///
/// ```rust
/// # use growable_string::GrowableString;
/// let mut s = GrowableString::from_bytes(b"Hello").unwrap();
/// s.append_bytes(b", world").unwrap();
/// s.remove(5, 0).unwrap();
///
/// assert_eq!(b"Hello", s.as_bytes());
/// assert_eq!(b"Hello\0", s.as_bytes_with_nul());
/// ```
pub struct GrowableString {
    // Invariants: raw.size() > len, bytes 0..=len are initialized and the one at len is zero.
    raw: RawBuf,
    len: usize,
}

impl GrowableString {
    /// Creates an empty string with [DEFAULT_CAPACITY].
    pub fn new() -> Result<Self, Error> {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty string able to hold `capacity` bytes without growing.
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        let size = capacity.checked_add(1).ok_or(Error::CounterOverflow)?;
        let mut raw = RawBuf::with_size(size)?;
        raw.write(0, &[0]);
        Ok(Self { raw, len: 0 })
    }

    /// Creates a string holding a single byte.
    pub fn from_byte(byte: u8) -> Result<Self, Error> {
        let mut s = Self::new()?;
        s.append_byte(byte)?;
        Ok(s)
    }

    /// Creates a string holding a copy of `bytes`.
    ///
    /// Zero bytes are content like any other, the copy doesn't stop at them.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut s = Self::new()?;
        s.append_bytes(bytes)?;
        Ok(s)
    }

    /// Creates an independent copy.
    ///
    /// The copy has the same content, but its capacity is whatever fits a new string grown to that
    /// content, not the capacity of `self`.
    pub fn try_clone(&self) -> Result<Self, Error> {
        self.slice(0, self.len)
    }

    /// Number of bytes of content.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Is there no content at all?
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of bytes the content may take before the string needs to grow.
    pub fn capacity(&self) -> usize {
        self.raw.size() - 1
    }

    /// The content.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: content is initialized.
        unsafe { self.raw.slice(self.len) }
    }

    /// The content, mutably.
    ///
    /// The terminator lies outside of the returned slice, so it can't be clobbered.
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        // SAFETY: content is initialized.
        unsafe { self.raw.slice_mut(self.len) }
    }

    /// The content followed by a single zero byte.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        // SAFETY: content and the terminator after it are initialized.
        unsafe { self.raw.slice(self.len + 1) }
    }

    /// The content up to (not including) the first zero byte, as a C string.
    pub fn as_c_str(&self) -> &CStr {
        CStr::from_bytes_until_nul(self.as_bytes_with_nul()).unwrap_or_default()
    }

    /// Copies the content into a [Bytes].
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_bytes())
    }

    /// Enables injected allocation failures, see [AllocBehaviour].
    #[cfg(any(test, feature = "test-utils"))]
    pub fn change_behaviour(&mut self, behaviour: AllocBehaviour) {
        self.raw.change_behaviour(behaviour);
    }

    fn grow_to(&mut self, capacity: usize) -> Result<(), Error> {
        debug_assert!(capacity > self.capacity());
        let size = capacity.checked_add(1).ok_or(Error::CounterOverflow)?;
        trace!(from = self.capacity(), to = capacity, "Growing string");
        self.raw.resize(size)
    }

    // Capacity for the bytes must have been made already.
    fn put(&mut self, bytes: &[u8]) {
        let len = self.len + bytes.len();
        self.raw.write(self.len, bytes);
        self.raw.write(len, &[0]);
        self.len = len;
    }

    /// Appends a single byte, growing by [GROWTH_INCREMENT] if the string is full.
    pub fn append_byte(&mut self, byte: u8) -> Result<(), Error> {
        if self.len == self.capacity() {
            let capacity = self
                .capacity()
                .checked_add(GROWTH_INCREMENT)
                .ok_or(Error::CounterOverflow)?;
            self.grow_to(capacity)?;
        }
        self.put(&[byte]);
        Ok(())
    }

    /// Appends all the `bytes`.
    ///
    /// The capacity ends up where appending them one by one would leave it, but the string grows
    /// at most once. Either everything is appended or, on failure, nothing.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let len = self
            .len
            .checked_add(bytes.len())
            .ok_or(Error::CounterOverflow)?;
        if len > self.capacity() {
            let steps = (len - self.capacity()).div_ceil(GROWTH_INCREMENT);
            let capacity = steps
                .checked_mul(GROWTH_INCREMENT)
                .and_then(|grow| grow.checked_add(self.capacity()))
                .ok_or(Error::CounterOverflow)?;
            self.grow_to(capacity)?;
        }
        self.put(bytes);
        Ok(())
    }

    /// Appends the content of `other`, growing to fit it exactly if needed.
    pub fn append(&mut self, other: &GrowableString) -> Result<(), Error> {
        let len = self
            .len
            .checked_add(other.len)
            .ok_or(Error::CounterOverflow)?;
        if len > self.capacity() {
            self.grow_to(len)?;
        }
        self.put(other.as_bytes());
        Ok(())
    }

    /// Removes all the content and shrinks the string to fit nothing.
    pub fn clear(&mut self) -> Result<(), Error> {
        self.remove(0, self.len)
    }

    /// Reverses the order of the bytes in place.
    pub fn reverse(&mut self) {
        self.as_mut_bytes().reverse();
    }

    /// Resolves `start..end` against the current content.
    ///
    /// An `end` of zero or past the content means up to the end. Nothing is selected when `start`
    /// lies past the content or past the resolved end.
    fn resolve(&self, start: usize, end: usize) -> Option<Range<usize>> {
        if start > self.len {
            return None;
        }
        let end = if end == 0 || end > self.len {
            self.len
        } else {
            end
        };
        (start <= end).then_some(start..end)
    }

    /// Removes the bytes in `start..end` and shrinks the string to exactly fit the rest.
    ///
    /// An `end` of zero or past the content means up to the end, so `remove(start, 0)` truncates
    /// at `start`. A `start` past the content removes nothing and succeeds.
    ///
    /// ```rust
    /// # use growable_string::GrowableString;
    /// let mut s = GrowableString::from_bytes(b"Good, good, bad, good...").unwrap();
    /// s.remove(12, 17).unwrap();
    /// assert_eq!(b"Good, good, good...", s.as_bytes());
    /// assert_eq!(s.len(), s.capacity());
    /// ```
    pub fn remove(&mut self, start: usize, end: usize) -> Result<(), Error> {
        let Some(range) = self.resolve(start, end) else {
            return Ok(());
        };
        let len = self.len - range.len();
        // SAFETY: content is initialized.
        unsafe { self.raw.remove(self.len, range) }?;
        self.raw.write(len, &[0]);
        self.len = len;
        Ok(())
    }

    /// Copies the bytes in `start..end` into a new string.
    ///
    /// The range is resolved the same way as in [remove][GrowableString::remove]. A `start` past
    /// the content yields an empty string.
    pub fn slice(&self, start: usize, end: usize) -> Result<Self, Error> {
        let mut sliced = Self::new()?;
        if let Some(range) = self.resolve(start, end) {
            sliced.append_bytes(&self.as_bytes()[range])?;
        }
        Ok(sliced)
    }

    /// Compares the strings the way C strings compare.
    ///
    /// Only the content up to the first zero byte takes part, so the strings may compare equal
    /// even though they differ after it. Use `==` (or [strict_equal][Self::strict_equal]) to take
    /// all the content into account.
    ///
    /// ```rust
    /// # use std::cmp::Ordering;
    /// # use growable_string::GrowableString;
    /// let a = GrowableString::from_bytes(b"hello there!\0hidden text!").unwrap();
    /// let b = GrowableString::from_bytes(b"hello there!").unwrap();
    /// assert_eq!(Ordering::Equal, a.compare(&b));
    /// assert!(a != b);
    /// ```
    pub fn compare(&self, other: &GrowableString) -> Ordering {
        self.as_c_str().to_bytes().cmp(other.as_c_str().to_bytes())
    }

    /// Are both the lengths and all the bytes the same?
    pub fn strict_equal(&self, other: &GrowableString) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Deref for GrowableString {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl DerefMut for GrowableString {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.as_mut_bytes()
    }
}

impl AsRef<[u8]> for GrowableString {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsMut<[u8]> for GrowableString {
    fn as_mut(&mut self) -> &mut [u8] {
        self.as_mut_bytes()
    }
}

impl Borrow<[u8]> for GrowableString {
    fn borrow(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl BorrowMut<[u8]> for GrowableString {
    fn borrow_mut(&mut self) -> &mut [u8] {
        self.as_mut_bytes()
    }
}

impl Debug for GrowableString {
    fn fmt(&self, fmt: &mut Formatter) -> FmtResult {
        fmt.write_str("b\"")?;
        for &b in self.as_bytes() {
            Display::fmt(&ascii::escape_default(b), fmt)?;
        }
        fmt.write_char('"')
    }
}

impl Display for GrowableString {
    fn fmt(&self, fmt: &mut Formatter) -> FmtResult {
        for chunk in self.as_bytes().utf8_chunks() {
            fmt.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                fmt.write_char(char::REPLACEMENT_CHARACTER)?;
            }
        }
        Ok(())
    }
}

impl Hash for GrowableString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state)
    }
}

impl PartialEq for GrowableString {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equal(other)
    }
}

impl Eq for GrowableString {}

impl PartialOrd for GrowableString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(Ord::cmp(self, other))
    }
}

/// Orders by all of the content. See [compare][GrowableString::compare] for the C-like order.
impl Ord for GrowableString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

macro_rules! c {
    ($ty: ty) => {
        impl<'a> PartialEq<$ty> for GrowableString {
            fn eq(&self, other: &$ty) -> bool {
                self.as_bytes() == AsRef::<[u8]>::as_ref(other)
            }
        }

        impl<'a> PartialEq<GrowableString> for $ty {
            fn eq(&self, other: &GrowableString) -> bool {
                AsRef::<[u8]>::as_ref(self) == other.as_bytes()
            }
        }
    };
}

c!([u8]);
c!(&'a [u8]);
c!(str);
c!(&'a str);
c!(Vec<u8>);

impl Write for GrowableString {
    fn write_str(&mut self, s: &str) -> FmtResult {
        self.append_bytes(s.as_bytes()).map_err(|_| core::fmt::Error)
    }
}

#[cfg(feature = "std")]
impl std::io::Write for GrowableString {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.append_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl TryFrom<&[u8]> for GrowableString {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_bytes(bytes)
    }
}

impl TryFrom<&str> for GrowableString {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Error> {
        Self::from_bytes(s.as_bytes())
    }
}

impl TryFrom<&CStr> for GrowableString {
    type Error = Error;

    fn try_from(s: &CStr) -> Result<Self, Error> {
        Self::from_bytes(s.to_bytes())
    }
}

impl From<GrowableString> for Bytes {
    fn from(s: GrowableString) -> Self {
        s.to_bytes()
    }
}

impl From<&GrowableString> for BytesMut {
    fn from(s: &GrowableString) -> Self {
        BytesMut::from(s.as_bytes())
    }
}
