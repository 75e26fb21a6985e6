use alloc::alloc::{self as heap, Layout};
use core::ops::Range;
use core::ptr::{self, NonNull};
use core::slice;

use tracing::{debug, trace};

use crate::Error;

/// Failure injection for the allocation paths.
///
/// The behaviour is sticky. Once set on an instance, it stays active until changed, and it is
/// carried over when a removal swaps in a freshly allocated block.
///
/// ```rust
/// # use growable_string::{AllocBehaviour, Error, GrowableString};
/// let mut s = GrowableString::from_bytes(b"12345678").unwrap();
/// s.change_behaviour(AllocBehaviour::FailAtGrow);
///
/// assert_eq!(Err(Error::AllocationFailure { size: 41 }), s.append_byte(b'9'));
/// assert_eq!(b"12345678", s.as_bytes());
/// ```
#[cfg(any(test, feature = "test-utils"))]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum AllocBehaviour {
    /// Normal behaviour, nothing is injected.
    #[default]
    None,
    /// Every request for a larger block fails.
    FailAtGrow,
    /// Every request for a smaller block fails.
    FailAtShrink,
}

fn layout(size: usize) -> Result<Layout, Error> {
    Layout::array::<u8>(size).map_err(|_| Error::CounterOverflow)
}

/// An exclusively owned block of bytes from the global allocator.
///
/// The block tracks its size but not which bytes are initialized. That bookkeeping belongs to the
/// owner, hence the unsafe accessors.
pub(crate) struct RawBuf {
    ptr: NonNull<u8>,
    size: usize,
    #[cfg(any(test, feature = "test-utils"))]
    behaviour: AllocBehaviour,
}

// The block is uniquely owned, shared references only ever read from it.
unsafe impl Send for RawBuf {}
unsafe impl Sync for RawBuf {}

impl RawBuf {
    pub(crate) fn with_size(size: usize) -> Result<Self, Error> {
        assert!(size > 0, "Zero-sized allocation");
        let layout = layout(size)?;
        // SAFETY: the layout has a non-zero size.
        let ptr = unsafe { heap::alloc(layout) };
        let Some(ptr) = NonNull::new(ptr) else {
            debug!(size, "Allocation failed");
            return Err(Error::AllocationFailure { size });
        };
        trace!(size, "Allocated buffer");
        Ok(Self {
            ptr,
            size,
            #[cfg(any(test, feature = "test-utils"))]
            behaviour: AllocBehaviour::None,
        })
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    fn current_layout(&self) -> Layout {
        // SAFETY: the same size and alignment were validated when the block was obtained.
        unsafe { Layout::from_size_align_unchecked(self.size, 1) }
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub(crate) fn change_behaviour(&mut self, behaviour: AllocBehaviour) {
        self.behaviour = behaviour;
    }

    #[cfg(any(test, feature = "test-utils"))]
    fn check(&self, size: usize) -> Result<(), Error> {
        let fail = match self.behaviour {
            AllocBehaviour::None => false,
            AllocBehaviour::FailAtGrow => size > self.size,
            AllocBehaviour::FailAtShrink => size < self.size,
        };
        if fail {
            debug!(size, behaviour = ?self.behaviour, "Injected allocation failure");
            Err(Error::AllocationFailure { size })
        } else {
            Ok(())
        }
    }

    #[cfg(not(any(test, feature = "test-utils")))]
    #[inline(always)]
    fn check(&self, _size: usize) -> Result<(), Error> {
        Ok(())
    }

    /// Moves the block to one of `size` bytes, keeping the common prefix.
    ///
    /// On failure the old block stays in place, untouched.
    pub(crate) fn resize(&mut self, size: usize) -> Result<(), Error> {
        assert!(size > 0, "Zero-sized allocation");
        if size == self.size {
            return Ok(());
        }
        self.check(size)?;
        layout(size)?;
        // SAFETY: the block comes from the global allocator with `current_layout`, the new size
        // is non-zero and was just checked to form a valid layout.
        let ptr = unsafe { heap::realloc(self.ptr.as_ptr(), self.current_layout(), size) };
        let Some(ptr) = NonNull::new(ptr) else {
            debug!(from = self.size, to = size, "Reallocation failed");
            return Err(Error::AllocationFailure { size });
        };
        trace!(from = self.size, to = size, "Resized buffer");
        self.ptr = ptr;
        self.size = size;
        Ok(())
    }

    /// Copies `bytes` into the block, starting at offset `at`.
    pub(crate) fn write(&mut self, at: usize, bytes: &[u8]) {
        assert!(
            at <= self.size && bytes.len() <= self.size - at,
            "Write past the end of buffer"
        );
        // SAFETY: bounds are checked above and `bytes` can't point into a block we hold mutably.
        unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), self.ptr.as_ptr().add(at), bytes.len()) }
    }

    /// # Safety
    ///
    /// The first `len` bytes must have been initialized.
    pub(crate) unsafe fn slice(&self, len: usize) -> &[u8] {
        debug_assert!(len <= self.size);
        // SAFETY: in bounds and initialized per the caller.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), len) }
    }

    /// # Safety
    ///
    /// The first `len` bytes must have been initialized.
    pub(crate) unsafe fn slice_mut(&mut self, len: usize) -> &mut [u8] {
        debug_assert!(len <= self.size);
        // SAFETY: in bounds and initialized per the caller.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), len) }
    }

    /// Cuts `range` out of the first `len` bytes and shrinks the block to hold exactly the rest plus
    /// one more byte.
    ///
    /// Cutting off the tail is an in-place shrink. Anything else is compacted into a fresh block that
    /// replaces this one only once it is fully written, so a failure leaves everything untouched.
    ///
    /// # Safety
    ///
    /// The first `len` bytes must have been initialized.
    pub(crate) unsafe fn remove(&mut self, len: usize, range: Range<usize>) -> Result<(), Error> {
        assert!(range.start <= range.end && range.end <= len && len < self.size);
        let size = len - range.len() + 1;
        if range.end == len {
            return self.resize(size);
        }

        self.check(size)?;
        let mut fresh = Self::with_size(size)?;
        // SAFETY: initialized per the caller.
        let bytes = unsafe { self.slice(len) };
        fresh.write(0, &bytes[..range.start]);
        fresh.write(range.start, &bytes[range.end..]);
        #[cfg(any(test, feature = "test-utils"))]
        fresh.change_behaviour(self.behaviour);
        trace!(from = self.size, to = size, "Compacted buffer");
        *self = fresh;
        Ok(())
    }
}

impl Drop for RawBuf {
    fn drop(&mut self) {
        // SAFETY: the block comes from the global allocator with this layout and nothing else
        // releases it.
        unsafe { heap::dealloc(self.ptr.as_ptr(), self.current_layout()) }
    }
}
