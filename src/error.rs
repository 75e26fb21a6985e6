/// Failures reported by [`GrowableString`][crate::GrowableString] operations.
///
/// None of the operations panic or abort when memory runs out. They return one of these and leave
/// the receiver exactly as it was before the call.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The allocator could not provide a block of the requested size.
    #[error("failed to allocate {size} bytes")]
    AllocationFailure {
        /// Size of the block that was requested, terminator byte included.
        size: usize,
    },

    /// A length or capacity computation would not fit into the counter type.
    #[error("length or capacity computation overflowed")]
    CounterOverflow,

    /// An operand was absent where content was expected.
    #[error("operand is absent")]
    InvalidOperand,
}

#[cfg(feature = "std")]
impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        let kind = match e {
            Error::AllocationFailure { .. } | Error::CounterOverflow => {
                std::io::ErrorKind::OutOfMemory
            }
            Error::InvalidOperand => std::io::ErrorKind::InvalidInput,
        };
        std::io::Error::new(kind, e)
    }
}
