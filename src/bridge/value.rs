// Sat Oct 17 2026 - Alex

use bytes::{Buf, BufMut};

/// A fixed-size value stored big-endian in guest memory.
pub trait GuestValue: Copy + Sized {
    const SIZE: usize;

    /// Consumes `SIZE` bytes from the front of `buf`.
    fn decode(buf: &mut &[u8]) -> Self;

    fn encode(self, buf: &mut Vec<u8>);
}

macro_rules! guest_value {
    ($ty:ty, $size:expr, $get:ident, $put:ident) => {
        impl GuestValue for $ty {
            const SIZE: usize = $size;

            fn decode(buf: &mut &[u8]) -> Self {
                buf.$get()
            }

            fn encode(self, buf: &mut Vec<u8>) {
                buf.$put(self)
            }
        }
    };
}

guest_value!(u8, 1, get_u8, put_u8);
guest_value!(i8, 1, get_i8, put_i8);
guest_value!(u16, 2, get_u16, put_u16);
guest_value!(i16, 2, get_i16, put_i16);
guest_value!(u32, 4, get_u32, put_u32);
guest_value!(i32, 4, get_i32, put_i32);
guest_value!(u64, 8, get_u64, put_u64);
guest_value!(i64, 8, get_i64, put_i64);
guest_value!(f32, 4, get_f32, put_f32);
guest_value!(f64, 8, get_f64, put_f64);

/// Decodes consecutive elements, swapping each one individually.
pub fn decode_array<T: GuestValue>(bytes: &[u8]) -> Vec<T> {
    let mut cursor = bytes;
    (0..bytes.len() / T::SIZE).map(|_| T::decode(&mut cursor)).collect()
}

pub fn encode_value<T: GuestValue>(value: T) -> Vec<u8> {
    let mut out = Vec::with_capacity(T::SIZE);
    value.encode(&mut out);
    out
}
