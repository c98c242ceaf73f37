use core::cmp::Ordering;
use core::fmt;
use core::hash::{self, Hash};
use core::mem::{self, ManuallyDrop, MaybeUninit};
use core::ops;
use core::ptr::{self, NonNull};
use core::slice;

use alloc::alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout};

use crate::error::AllocError;
use crate::space::S32;

/// Alignment unit. Physical sizes are multiples of it and data pointers are aligned to it.
pub const ALIGN: usize = 8;

/// Round `size` up to the next multiple of [`ALIGN`].
///
/// ```
/// use sizedbuf::round_up;
///
/// assert_eq!(round_up(0), 0);
/// assert_eq!(round_up(1), 8);
/// assert_eq!(round_up(16), 16);
/// assert_eq!(round_up(33), 40);
/// ```
///
/// # Panics
///
/// Panics if the rounded size does not fit in `usize`.
pub const fn round_up(size: usize) -> usize {
    match size.checked_add(ALIGN - 1) {
        Some(padded) => padded & !(ALIGN - 1),
        None => panic!("buffer size overflows usize when rounded up"),
    }
}

/// Where the bytes of a [`SizedBuffer`] live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageMode {
    /// Embedded in the buffer value itself.
    Inline,
    /// In a heap allocation owned by the buffer.
    Heap,
}

// Both fields start at offset 0. Which one is live is fixed by `IS_INLINE`.
#[repr(C, align(8))]
union Storage<Space> {
    inline: ManuallyDrop<MaybeUninit<Space>>,
    heap: NonNull<u8>,
}

/// A fixed-size byte buffer stored inline or on the heap depending on its size.
///
/// `N` is the logical size. The buffer physically holds `N` rounded up to a multiple of
/// [`ALIGN`]; the extra bytes are padding. If the physical size fits in `Space`, the bytes are
/// stored inside the value, otherwise in a heap allocation of exactly the physical size.
/// The choice is made per type at compile time and never changes.
///
/// Cloning copies every physical byte into new storage; `clone_from` copies into the storage the
/// target already owns and never allocates.
///
/// # Example
///
/// ```
/// use sizedbuf::SizedBuffer;
/// use sizedbuf::space::S64;
///
/// let small: SizedBuffer<32> = SizedBuffer::new();
/// let large: SizedBuffer<33> = SizedBuffer::new();
/// let custom: SizedBuffer<60, S64> = SizedBuffer::new();
///
/// assert!(small.is_inline());
/// assert!(large.is_heap());
/// assert_eq!(large.physical_size(), 40);
/// assert!(custom.is_inline());
/// ```
pub struct SizedBuffer<const N: usize, Space = S32> {
    storage: Storage<Space>,
}

impl<const N: usize, Space> SizedBuffer<N, Space> {
    /// Logical size in bytes.
    pub const SIZE: usize = N;

    /// Logical size rounded up to a multiple of [`ALIGN`].
    pub const PHYSICAL_SIZE: usize = round_up(N);

    /// Largest physical size stored inline, `size_of::<Space>()`.
    pub const THRESHOLD: usize = mem::size_of::<Space>();

    /// Whether buffers of this type keep their bytes inline.
    pub const IS_INLINE: bool = Self::PHYSICAL_SIZE <= Self::THRESHOLD;

    const LAYOUT: Layout = match Layout::from_size_align(Self::PHYSICAL_SIZE, ALIGN) {
        Ok(layout) => layout,
        Err(_) => panic!("buffer size exceeds isize::MAX"),
    };

    /// Create a zero-filled buffer.
    ///
    /// All physical bytes, padding included, start at zero.
    ///
    /// # Example
    ///
    /// ```
    /// use sizedbuf::SizedBuffer;
    ///
    /// let buf: SizedBuffer<256> = SizedBuffer::new();
    ///
    /// assert!(buf.is_heap());
    /// assert!(buf.iter().all(|&b| b == 0));
    /// ```
    ///
    /// # Aborts
    ///
    /// Heap allocation failure is reported through [`handle_alloc_error`], which aborts by
    /// default. Use [`try_new`](Self::try_new) to observe the failure instead.
    pub fn new() -> Self {
        match Self::try_new() {
            Ok(buffer) => buffer,
            Err(err) => handle_alloc_error(err.layout),
        }
    }

    /// Create a zero-filled buffer, returning an error if the heap allocation fails.
    ///
    /// Inline buffers never fail.
    pub fn try_new() -> Result<Self, AllocError> {
        if Self::IS_INLINE {
            return Ok(SizedBuffer {
                storage: Storage {
                    inline: ManuallyDrop::new(MaybeUninit::zeroed()),
                },
            });
        }

        let layout = Self::LAYOUT;
        // SAFETY: heap buffers have PHYSICAL_SIZE > THRESHOLD, so the layout is not zero sized.
        let ptr = unsafe { alloc_zeroed(layout) };
        Self::from_heap(ptr, layout)
    }

    /// Allocate storage without initializing it.
    ///
    /// # Safety
    ///
    /// All `PHYSICAL_SIZE` bytes must be written before the buffer is read or exposed.
    unsafe fn allocate_uninit() -> Result<Self, AllocError> {
        if Self::IS_INLINE {
            return Ok(SizedBuffer {
                storage: Storage {
                    inline: ManuallyDrop::new(MaybeUninit::uninit()),
                },
            });
        }

        let layout = Self::LAYOUT;
        let ptr = alloc::alloc::alloc(layout);
        Self::from_heap(ptr, layout)
    }

    fn from_heap(ptr: *mut u8, layout: Layout) -> Result<Self, AllocError> {
        match NonNull::new(ptr) {
            Some(heap) => Ok(SizedBuffer {
                storage: Storage { heap },
            }),
            None => Err(AllocError { layout }),
        }
    }

    /// Deep copy, returning an error if the heap allocation fails.
    ///
    /// The copy covers the whole physical region, padding included.
    pub fn try_clone(&self) -> Result<Self, AllocError> {
        // SAFETY: every physical byte of `copy` is written before it is returned, and the two
        // buffers own distinct storage.
        unsafe {
            let mut copy = Self::allocate_uninit()?;
            ptr::copy_nonoverlapping(self.as_ptr(), copy.as_mut_ptr(), Self::PHYSICAL_SIZE);
            Ok(copy)
        }
    }

    #[inline]
    fn heap_ptr(&self) -> *mut u8 {
        debug_assert!(!Self::IS_INLINE);
        // SAFETY: heap buffers are only ever built with the `heap` field set.
        unsafe { self.storage.heap.as_ptr() }
    }

    /// Logical size in bytes.
    #[inline]
    pub const fn size(&self) -> usize {
        N
    }

    /// Physical size in bytes: the logical size rounded up to a multiple of [`ALIGN`].
    #[inline]
    pub const fn physical_size(&self) -> usize {
        Self::PHYSICAL_SIZE
    }

    /// Largest physical size this buffer type stores inline.
    #[inline]
    pub const fn threshold(&self) -> usize {
        Self::THRESHOLD
    }

    /// Returns true if the bytes are embedded in the buffer value.
    #[inline]
    pub const fn is_inline(&self) -> bool {
        Self::IS_INLINE
    }

    /// Returns true if the bytes are heap-allocated.
    #[inline]
    pub const fn is_heap(&self) -> bool {
        !Self::IS_INLINE
    }

    /// Storage strategy of this buffer type.
    #[inline]
    pub const fn storage_mode(&self) -> StorageMode {
        if Self::IS_INLINE {
            StorageMode::Inline
        } else {
            StorageMode::Heap
        }
    }

    /// Pointer to the first byte.
    ///
    /// The pointer is aligned to [`ALIGN`] and valid for reads of
    /// [`physical_size`](Self::physical_size) bytes while the buffer is neither moved nor
    /// mutably borrowed. Moving an inline buffer moves its bytes, so the pointer must be
    /// fetched again after a move.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        if Self::IS_INLINE {
            ptr::addr_of!(self.storage).cast()
        } else {
            self.heap_ptr().cast_const()
        }
    }

    /// Mutable pointer to the first byte, valid for writes of
    /// [`physical_size`](Self::physical_size) bytes.
    ///
    /// This is the hand-off point for routines that take a raw byte pointer and a length.
    ///
    /// ```
    /// use sizedbuf::SizedBuffer;
    ///
    /// let mut buf: SizedBuffer<64> = SizedBuffer::new();
    /// let msg = b"hello\0";
    ///
    /// unsafe { core::ptr::copy_nonoverlapping(msg.as_ptr(), buf.as_mut_ptr(), msg.len()) };
    /// assert!(buf.starts_with(msg));
    /// ```
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        if Self::IS_INLINE {
            ptr::addr_of_mut!(self.storage).cast()
        } else {
            self.heap_ptr()
        }
    }

    /// The logical bytes, `[0, N)`.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: the storage holds PHYSICAL_SIZE >= N initialized bytes owned by `self`.
        unsafe { slice::from_raw_parts(self.as_ptr(), N) }
    }

    /// The logical bytes, `[0, N)`, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: the storage holds PHYSICAL_SIZE >= N initialized bytes owned by `self`.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), N) }
    }

    /// All physical bytes, padding included.
    #[inline]
    pub fn as_padded_slice(&self) -> &[u8] {
        // SAFETY: the storage holds PHYSICAL_SIZE initialized bytes owned by `self`.
        unsafe { slice::from_raw_parts(self.as_ptr(), Self::PHYSICAL_SIZE) }
    }

    /// All physical bytes, padding included, mutably.
    #[inline]
    pub fn as_padded_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: the storage holds PHYSICAL_SIZE initialized bytes owned by `self`.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), Self::PHYSICAL_SIZE) }
    }

    /// Set the logical bytes to `value`. Padding is left untouched.
    ///
    /// ```
    /// use sizedbuf::SizedBuffer;
    ///
    /// let mut buf: SizedBuffer<5> = SizedBuffer::new();
    /// buf.fill(0xAA);
    ///
    /// assert_eq!(buf.as_padded_slice(), &[0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0, 0, 0]);
    /// ```
    #[inline]
    pub fn fill(&mut self, value: u8) {
        self.as_mut_slice().fill(value);
    }

    /// Zero the logical bytes. Padding is left untouched.
    #[inline]
    pub fn clear(&mut self) {
        self.fill(0);
    }

    /// Set every physical byte, padding included, to `value`.
    #[inline]
    pub fn fill_all(&mut self, value: u8) {
        self.as_padded_mut_slice().fill(value);
    }

    /// Zero every physical byte, padding included.
    #[inline]
    pub fn clear_all(&mut self) {
        self.fill_all(0);
    }
}

impl<const N: usize, Space> ops::Drop for SizedBuffer<N, Space> {
    fn drop(&mut self) {
        if !Self::IS_INLINE {
            // SAFETY: heap buffers own an allocation made with `Self::LAYOUT`.
            unsafe { dealloc(self.heap_ptr(), Self::LAYOUT) }
        }
    }
}

impl<const N: usize, Space> Default for SizedBuffer<N, Space> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize, Space> Clone for SizedBuffer<N, Space> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(err) => handle_alloc_error(err.layout),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.as_padded_mut_slice()
            .copy_from_slice(source.as_padded_slice());
    }
}

impl<const N: usize, Space> From<[u8; N]> for SizedBuffer<N, Space> {
    /// Copies `bytes` into the logical region; padding stays zero.
    fn from(bytes: [u8; N]) -> Self {
        let mut buffer = Self::new();
        buffer.as_mut_slice().copy_from_slice(&bytes);
        buffer
    }
}

impl<const N: usize, Space> ops::Deref for SizedBuffer<N, Space> {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl<const N: usize, Space> ops::DerefMut for SizedBuffer<N, Space> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

/// Byte access without a check against the logical size.
///
/// Any index below [`physical_size`](SizedBuffer::physical_size) is accepted, so padding bytes
/// are reachable the way they are through a raw pointer. Indexes past the physical region
/// panic. Use `get` (through `Deref<Target = [u8]>`) for a lookup checked against the logical
/// size.
impl<const N: usize, Space> ops::Index<usize> for SizedBuffer<N, Space> {
    type Output = u8;

    #[inline]
    fn index(&self, index: usize) -> &u8 {
        &self.as_padded_slice()[index]
    }
}

impl<const N: usize, Space> ops::IndexMut<usize> for SizedBuffer<N, Space> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut u8 {
        &mut self.as_padded_mut_slice()[index]
    }
}

impl<const N: usize, Space> AsRef<[u8]> for SizedBuffer<N, Space> {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl<const N: usize, Space> AsMut<[u8]> for SizedBuffer<N, Space> {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl<const N: usize, Space> fmt::Debug for SizedBuffer<N, Space> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<const N: usize, Space> fmt::Pointer for SizedBuffer<N, Space> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.as_ptr(), f)
    }
}

impl<const N: usize, A, B> PartialEq<SizedBuffer<N, B>> for SizedBuffer<N, A> {
    #[inline]
    fn eq(&self, other: &SizedBuffer<N, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<const N: usize, Space> PartialEq<[u8]> for SizedBuffer<N, Space> {
    #[inline]
    fn eq(&self, other: &[u8]) -> bool {
        self.as_slice() == other
    }
}

impl<const N: usize, Space> PartialEq<[u8; N]> for SizedBuffer<N, Space> {
    #[inline]
    fn eq(&self, other: &[u8; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<const N: usize, Space> Eq for SizedBuffer<N, Space> {}

impl<const N: usize, A, B> PartialOrd<SizedBuffer<N, B>> for SizedBuffer<N, A> {
    #[inline]
    fn partial_cmp(&self, other: &SizedBuffer<N, B>) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<const N: usize, Space> Ord for SizedBuffer<N, Space> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<const N: usize, Space> Hash for SizedBuffer<N, Space> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

// SAFETY: the heap allocation is owned by exactly one buffer and `Space` is never instantiated.
unsafe impl<const N: usize, Space> Send for SizedBuffer<N, Space> {}
unsafe impl<const N: usize, Space> Sync for SizedBuffer<N, Space> {}

#[cfg(test)]
mod tests {
    use super::{round_up, SizedBuffer, StorageMode};
    use crate::space::*;

    #[test]
    fn test_basic() {
        let inline: SizedBuffer<16> = SizedBuffer::new();
        assert_eq!(inline.size(), 16);
        assert_eq!(inline.physical_size(), 16);
        assert_eq!(inline.threshold(), 32);
        assert_eq!(inline.storage_mode(), StorageMode::Inline);

        let heap: SizedBuffer<128> = SizedBuffer::new();
        assert_eq!(heap.size(), 128);
        assert_eq!(heap.storage_mode(), StorageMode::Heap);
        assert!(heap.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_round_up() {
        for (size, rounded) in [(0, 0), (1, 8), (7, 8), (8, 8), (9, 16), (33, 40)] {
            assert_eq!(round_up(size), rounded);
        }
        assert_eq!(round_up(usize::MAX - 7), usize::MAX - 7);
    }

    #[test]
    #[should_panic]
    fn test_round_up_overflow() {
        round_up(usize::MAX);
    }

    #[test]
    fn test_oversize() {
        let fit = SizedBuffer::<32, S32>::new();
        let oversize = SizedBuffer::<33, S32>::new();
        assert!(fit.is_inline());
        assert!(oversize.is_heap());
        assert_eq!(oversize.physical_size(), 40);
    }

    #[test]
    fn test_custom_space() {
        // 33 rounds to 40, which fits a 40-byte space but not a 39-byte one.
        assert!(SizedBuffer::<33, [u8; 40]>::IS_INLINE);
        assert!(!SizedBuffer::<33, [u8; 39]>::IS_INLINE);
    }

    #[test]
    fn test_padding_starts_zeroed() {
        let inline: SizedBuffer<5> = SizedBuffer::new();
        assert_eq!(inline.as_padded_slice(), &[0u8; 8]);

        let heap: SizedBuffer<33> = SizedBuffer::new();
        assert_eq!(heap.as_padded_slice(), &[0u8; 40]);
    }

    #[test]
    fn test_clone() {
        let mut heap: SizedBuffer<100> = SizedBuffer::new();
        heap.fill_all(0x5A);
        heap[3] = 1;

        let copy = heap.clone();
        assert_eq!(copy.as_padded_slice(), heap.as_padded_slice());
        assert_ne!(copy.as_ptr(), heap.as_ptr());
    }

    #[test]
    fn test_clone_from_keeps_allocation() {
        let mut source: SizedBuffer<64> = SizedBuffer::new();
        source.fill(7);

        let mut target: SizedBuffer<64> = SizedBuffer::new();
        let before = target.as_ptr();
        target.clone_from(&source);

        assert_eq!(target.as_ptr(), before);
        assert_eq!(target, source);
    }

    #[test]
    fn test_move_keeps_allocation() {
        let mut heap: SizedBuffer<64> = SizedBuffer::new();
        heap[0] = 42;
        let ptr = heap.as_ptr();

        let moved = heap;
        assert_eq!(moved.as_ptr(), ptr);
        assert_eq!(moved[0], 42);
    }

    #[test]
    fn test_index_reaches_padding() {
        let mut buf: SizedBuffer<5> = SizedBuffer::new();
        buf[7] = 9;
        assert_eq!(buf.as_padded_slice()[7], 9);
        assert_eq!(buf.get(7), None);
        assert_eq!(buf.get(4), Some(&0));
    }

    #[test]
    #[should_panic]
    fn test_index_past_physical_size() {
        let buf: SizedBuffer<5> = SizedBuffer::new();
        let _byte = buf[8];
    }

    #[test]
    fn test_alignment() {
        let inline: SizedBuffer<1> = SizedBuffer::new();
        let heap: SizedBuffer<17, S8> = SizedBuffer::new();
        assert!(inline.as_ptr().cast::<u64>().is_aligned());
        assert!(heap.as_ptr().cast::<u64>().is_aligned());
    }

    #[test]
    fn test_footprint() {
        use core::mem::size_of;

        use crate::space::Padded;

        // inline: exactly the space
        assert_eq!(size_of::<SizedBuffer<8>>(), 32);
        assert_eq!(size_of::<SizedBuffer<8, Padded<8>>>(), 8);
        // heap: the pointer shares the space
        assert_eq!(size_of::<SizedBuffer<1000, S0>>(), 8);
        assert_eq!(size_of::<SizedBuffer<1000, S256>>(), 256);
    }

    #[test]
    fn test_dont_drop_space() {
        struct NoDrop(S32);
        impl Drop for NoDrop {
            fn drop(&mut self) {
                unreachable!();
            }
        }

        drop(SizedBuffer::<16, NoDrop>::new());
        drop(SizedBuffer::<64, NoDrop>::new());
    }

    #[test]
    fn test_zst() {
        let empty: SizedBuffer<0> = SizedBuffer::new();
        assert_eq!(empty.physical_size(), 0);
        assert!(empty.is_inline());
        assert!(empty.as_slice().is_empty());

        let empty: SizedBuffer<0, S0> = SizedBuffer::new();
        assert!(empty.is_inline());
        assert_eq!(empty.clone(), empty);
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SizedBuffer<16>>();
        assert_send_sync::<SizedBuffer<4096>>();
    }
}
