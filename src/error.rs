use core::alloc::Layout;
use core::fmt;

/// The heap allocation backing a buffer could not be obtained.
///
/// Returned by [`SizedBuffer::try_new`](crate::SizedBuffer::try_new) and
/// [`SizedBuffer::try_clone`](crate::SizedBuffer::try_clone). The infallible
/// constructors hand the same layout to [`handle_alloc_error`](alloc::alloc::handle_alloc_error).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocError {
    pub(crate) layout: Layout,
}

impl AllocError {
    /// The layout of the allocation that failed.
    pub fn layout(&self) -> Layout {
        self.layout
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "memory allocation of {} bytes (align {}) failed",
            self.layout.size(),
            self.layout.align()
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AllocError {}

#[cfg(test)]
mod tests {
    use super::AllocError;
    use core::alloc::Layout;

    #[test]
    fn test_display() {
        let layout = Layout::from_size_align(4096, 8).unwrap();
        let err = AllocError { layout };
        assert_eq!(err.layout(), layout);
        assert_eq!(
            err.to_string(),
            "memory allocation of 4096 bytes (align 8) failed"
        );
    }
}
