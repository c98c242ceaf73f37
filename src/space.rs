//! Threshold types.
//!
//! The threshold of a [`SizedBuffer`](crate::SizedBuffer) is the size of its `Space` type:
//! a buffer whose rounded size fits in `size_of::<Space>()` bytes is stored inline, anything
//! larger goes to the heap. A space type is never constructed, it only reserves room.
//!
//! Any sized type works as a custom threshold, e.g. `[u8; 40]` for a 40-byte threshold.

/// Zero-byte space. Every non-empty buffer is heap allocated.
pub type S0 = [u64; 0];

/// 8-byte space.
pub type S8 = [u64; 1];

/// 16-byte space.
pub type S16 = [u64; 2];

/// 32-byte space, the default threshold.
pub type S32 = [u64; 4];

/// 64-byte space.
pub type S64 = [u64; 8];

/// 128-byte space.
pub type S128 = [u64; 16];

/// 256-byte space.
pub type S256 = [u64; 32];

/// 512-byte space.
pub type S512 = [u64; 64];

/// 1024-byte space.
pub type S1K = [u64; 128];

/// A space exactly as large as an `N`-byte buffer after rounding.
///
/// `size_of::<Padded<N>>()` is `N` rounded up to the next multiple of 8, so a
/// `SizedBuffer<N, Padded<N>>` is always stored inline.
///
/// ```
/// use sizedbuf::space::Padded;
///
/// assert_eq!(core::mem::size_of::<Padded<0>>(), 0);
/// assert_eq!(core::mem::size_of::<Padded<5>>(), 8);
/// assert_eq!(core::mem::size_of::<Padded<1024>>(), 1024);
/// ```
#[repr(C, align(8))]
pub struct Padded<const N: usize> {
    _bytes: [u8; N],
}
