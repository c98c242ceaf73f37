//! # SizedBuf: Fixed-Size Byte Buffers Without Small Allocations
//!
//! [`SizedBuffer`] is a fixed-size byte buffer that keeps small buffers inside the value itself
//! and only allocates on the heap when the buffer is larger than a configurable threshold.
//! Callers declare the size they need and get the same interface either way.
//!
//! ## Core Concept
//!
//! A `SizedBuffer<N, Space>` holds `N` logical bytes. The physical size is `N` rounded up to a
//! multiple of 8, so the data pointer is always 8-byte aligned and wide accesses never straddle
//! the end of the storage. If the physical size fits in `size_of::<Space>()` bytes (32 by
//! default) the bytes are stored inline, otherwise in a heap allocation owned by the buffer.
//! The decision is a compile-time constant of the type.
//!
//! ## Quick Start
//!
//! ```rust
//! use sizedbuf::SizedBuffer;
//!
//! // 32 bytes fit the default 32-byte threshold
//! let small: SizedBuffer<32> = SizedBuffer::new();
//! assert!(small.is_inline());
//!
//! // 33 bytes round up to 40, which does not
//! let large: SizedBuffer<33> = SizedBuffer::new();
//! assert!(large.is_heap());
//! assert_eq!(large.physical_size(), 40);
//!
//! // Both start zeroed and read the same way
//! assert!(small.iter().chain(large.iter()).all(|&b| b == 0));
//! ```
//!
//! ## Configuration
//!
//! ### Feature Flags
//!
//! - **`std`** (enabled by default)
//!   - Links to the standard library and implements `std::error::Error` for [`AllocError`]
//!   - Disable for `#![no_std]` environments: `default-features = false`
//!
//! ### Thresholds
//!
//! The threshold is the size of the `Space` type parameter. The [`space`] module provides
//! common sizes, and any sized type works as a custom one:
//!
//! ```rust
//! use sizedbuf::SizedBuffer;
//! use sizedbuf::space::{S0, S128};
//!
//! let wide: SizedBuffer<100, S128> = SizedBuffer::new();
//! assert!(wide.is_inline());
//!
//! // Custom 40-byte threshold
//! let custom: SizedBuffer<33, [u8; 40]> = SizedBuffer::new();
//! assert!(custom.is_inline());
//!
//! // A zero-byte space never stores anything inline
//! let heap: SizedBuffer<8, S0> = SizedBuffer::new();
//! assert!(heap.is_heap());
//! ```
//!
//! Ready-made aliases live in [`presets`].
//!
//! ## Value Semantics
//!
//! Cloning copies every physical byte into independent storage, and
//! [`clone_from`](Clone::clone_from) reuses the target's storage instead of allocating.
//! Moving a heap buffer hands over its allocation without copying.
//!
//! ```rust
//! use sizedbuf::SizedBuffer;
//!
//! let mut a: SizedBuffer<64> = SizedBuffer::new();
//! a.fill(0xAB);
//!
//! let mut b = a.clone();
//! b[0] = 0;
//! assert_eq!(a[0], 0xAB);
//!
//! let ptr = a.as_ptr();
//! let moved = a;
//! assert_eq!(moved.as_ptr(), ptr);
//! ```
//!
//! ## Interoperability
//!
//! Routines that want a byte pointer and a length get [`as_mut_ptr`](SizedBuffer::as_mut_ptr)
//! and [`size`](SizedBuffer::size); everything else can use the slice views.
//!
//! ```rust
//! use std::io::Write;
//! use sizedbuf::SizedBuffer;
//!
//! let mut buf: SizedBuffer<16> = SizedBuffer::new();
//! buf.as_mut_slice().write_all(b"ping").unwrap();
//! assert!(buf.starts_with(b"ping"));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![deny(clippy::as_conversions)]

extern crate alloc;

mod error;
pub mod presets;
mod sized_buffer;
pub mod space;

pub use crate::error::AllocError;
pub use crate::presets::*;
pub use crate::sized_buffer::{round_up, SizedBuffer, StorageMode, ALIGN};
