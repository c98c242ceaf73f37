//! Common buffer configurations.
//!
//! ```
//! use sizedbuf::{AlwaysHeap, AlwaysInline, SizedBuffer1K, SizedBuffer16, Threshold64};
//!
//! assert!(SizedBuffer16::new().is_inline());
//! assert!(SizedBuffer1K::new().is_heap());
//! assert!(Threshold64::<64>::new().is_inline());
//! assert!(AlwaysHeap::<16>::new().is_heap());
//! assert!(AlwaysInline::<1024>::new().is_inline());
//! ```

use crate::space::{Padded, S0, S128, S256, S64};
use crate::SizedBuffer;

/// 8-byte buffer, inline.
pub type SizedBuffer8 = SizedBuffer<8>;
/// 16-byte buffer, inline.
pub type SizedBuffer16 = SizedBuffer<16>;
/// 32-byte buffer, inline.
pub type SizedBuffer32 = SizedBuffer<32>;
/// 64-byte buffer, heap.
pub type SizedBuffer64 = SizedBuffer<64>;
/// 128-byte buffer, heap.
pub type SizedBuffer128 = SizedBuffer<128>;
/// 256-byte buffer, heap.
pub type SizedBuffer256 = SizedBuffer<256>;
/// 512-byte buffer, heap.
pub type SizedBuffer512 = SizedBuffer<512>;
/// 1 KiB buffer, heap.
pub type SizedBuffer1K = SizedBuffer<1024>;
/// 2 KiB buffer, heap.
pub type SizedBuffer2K = SizedBuffer<2048>;
/// 4 KiB buffer, heap.
pub type SizedBuffer4K = SizedBuffer<4096>;

/// `N`-byte buffer, inline up to 64 bytes.
pub type Threshold64<const N: usize> = SizedBuffer<N, S64>;
/// `N`-byte buffer, inline up to 128 bytes.
pub type Threshold128<const N: usize> = SizedBuffer<N, S128>;
/// `N`-byte buffer, inline up to 256 bytes.
pub type Threshold256<const N: usize> = SizedBuffer<N, S256>;

/// `N`-byte buffer that is heap allocated whenever it holds any bytes.
///
/// A zero-sized buffer has nothing to allocate and stays inline.
pub type AlwaysHeap<const N: usize> = SizedBuffer<N, S0>;

/// `N`-byte buffer that is always inline, whatever its size.
///
/// Its space is exactly the physical size, so [`threshold`](SizedBuffer::threshold) reports the
/// same value as [`physical_size`](SizedBuffer::physical_size): the smallest threshold that keeps
/// `N` bytes inline.
///
/// ```
/// use sizedbuf::AlwaysInline;
///
/// let buf = AlwaysInline::<5>::new();
/// assert_eq!(buf.threshold(), 8);
/// assert_eq!(buf.threshold(), buf.physical_size());
/// ```
pub type AlwaysInline<const N: usize> = SizedBuffer<N, Padded<N>>;
