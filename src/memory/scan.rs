// Sat Oct 17 2026 - Alex

//! Byte-level search over a copied module image. This is the only place
//! that reinterprets raw image bytes as host pointers.

use crate::memory::traits::decode_pointer;

/// Returns the first byte offset in `image` holding a native-endian pointer
/// of `width` bytes equal to `target`. Every offset is tried, aligned or not.
pub fn find_pointer(image: &[u8], target: u64, width: usize) -> Option<usize> {
    if width != 4 && width != 8 {
        return None;
    }
    image
        .windows(width)
        .position(|window| decode_pointer(window) == target)
}
