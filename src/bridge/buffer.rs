// Sat Oct 17 2026 - Alex

use crate::bridge::value::{decode_array, encode_value, GuestValue};
use crate::bridge::EmulatorBridge;
use crate::memory::MemoryError;
use std::fmt;

/// How strings are laid out when copied into guest buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringEncoding {
    /// One byte per char, anything outside ASCII becomes `?`.
    #[default]
    Ascii,
    Utf8,
}

impl StringEncoding {
    /// Encoded bytes followed by a single NUL terminator.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let mut out: Vec<u8> = match self {
            StringEncoding::Ascii => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
            StringEncoding::Utf8 => text.as_bytes().to_vec(),
        };
        out.push(0);
        out
    }

    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            StringEncoding::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { '?' })
                .collect(),
            StringEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

/// A fixed-capacity guest buffer. Every access is checked against the
/// capacity before anything touches the target process.
#[derive(Clone, Copy)]
pub struct BufferAddress<'a> {
    bridge: &'a EmulatorBridge,
    address: u32,
    size: u32,
}

impl<'a> BufferAddress<'a> {
    pub fn new(bridge: &'a EmulatorBridge, address: u32, size: u32) -> Self {
        Self { bridge, address, size }
    }

    pub fn guest_address(&self) -> u32 {
        self.address
    }

    /// Capacity in bytes.
    pub fn size(&self) -> u32 {
        self.size
    }

    fn check(&self, offset: u32, length: usize) -> Result<(), MemoryError> {
        let overflow = || MemoryError::Overflow {
            offset,
            length: u32::try_from(length).unwrap_or(u32::MAX),
            capacity: self.size,
        };
        let length = u32::try_from(length).map_err(|_| overflow())?;
        match offset.checked_add(length) {
            Some(end) if end <= self.size => Ok(()),
            _ => Err(overflow()),
        }
    }

    fn guest(&self, offset: u32) -> u32 {
        self.address.wrapping_add(offset)
    }

    pub fn read<T: GuestValue>(&self, offset: u32) -> Result<T, MemoryError> {
        self.check(offset, T::SIZE)?;
        let mut raw = [0u8; 8];
        let raw = &mut raw[..T::SIZE];
        self.bridge.read_raw(self.guest(offset), raw)?;
        Ok(T::decode(&mut &raw[..]))
    }

    pub fn read_array<T: GuestValue>(&self, offset: u32, count: usize) -> Result<Vec<T>, MemoryError> {
        let raw = self.read_bytes(offset, count.saturating_mul(T::SIZE))?;
        Ok(decode_array(&raw))
    }

    /// Every whole element that fits in the buffer.
    pub fn read_all<T: GuestValue>(&self) -> Result<Vec<T>, MemoryError> {
        self.read_array(0, self.size as usize / T::SIZE)
    }

    pub fn read_bytes(&self, offset: u32, len: usize) -> Result<Vec<u8>, MemoryError> {
        self.check(offset, len)?;
        let mut raw = vec![0u8; len];
        self.bridge.read_raw(self.guest(offset), &mut raw)?;
        Ok(raw)
    }

    pub fn write<T: GuestValue>(&self, value: T, offset: u32) -> Result<(), MemoryError> {
        self.check(offset, T::SIZE)?;
        self.bridge.write_raw(self.guest(offset), &encode_value(value))
    }

    pub fn write_array<T: GuestValue>(&self, values: &[T], offset: u32) -> Result<(), MemoryError> {
        let mut raw = Vec::with_capacity(values.len() * T::SIZE);
        for value in values {
            value.encode(&mut raw);
        }
        self.write_bytes(&raw, offset)
    }

    pub fn write_bytes(&self, data: &[u8], offset: u32) -> Result<(), MemoryError> {
        self.check(offset, data.len())?;
        self.bridge.write_raw(self.guest(offset), data)
    }

    /// Writes `text` plus its terminator at the start of the buffer.
    pub fn write_str(&self, text: &str, encoding: StringEncoding) -> Result<(), MemoryError> {
        self.write_bytes(&encoding.encode(text), 0)
    }

    /// Reads from `offset` up to the first NUL or the end of the buffer.
    pub fn read_c_string(&self, offset: u32, encoding: StringEncoding) -> Result<String, MemoryError> {
        let remaining = self.size.saturating_sub(offset) as usize;
        let raw = self.read_bytes(offset, remaining)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Ok(encoding.decode(&raw[..end]))
    }

    pub fn clear(&self) -> Result<(), MemoryError> {
        self.write_bytes(&vec![0u8; self.size as usize], 0)
    }
}

impl fmt::Display for BufferAddress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}[{}]", self.address, self.size)
    }
}

impl fmt::Debug for BufferAddress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferAddress")
            .field("address", &format_args!("{:#010x}", self.address))
            .field("size", &self.size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::tests::simulated_bridge;
    use crate::memory::simulated::RAM_BASE;

    #[test]
    fn test_overflow_performs_no_read() {
        let (process, bridge) = simulated_bridge();
        let buffer = bridge.buffer(0x8000_0200, 4);

        let err = buffer.read_bytes(2, 4).unwrap_err();
        assert!(matches!(err, MemoryError::Overflow { offset: 2, length: 4, capacity: 4 }));
        assert_eq!(process.reads(), 0);
        assert_eq!(process.enumerations(), 0);
    }

    #[test]
    fn test_overflow_on_typed_access() {
        let (process, bridge) = simulated_bridge();
        let buffer = bridge.buffer(0x8000_0200, 8);

        assert!(buffer.read::<u32>(4).is_ok());
        let writes = process.writes();
        assert!(matches!(buffer.write(1u64, 4), Err(MemoryError::Overflow { .. })));
        assert!(matches!(buffer.read::<u16>(u32::MAX), Err(MemoryError::Overflow { .. })));
        assert_eq!(process.writes(), writes);
    }

    #[test]
    fn test_array_is_swapped_per_element() {
        let (process, bridge) = simulated_bridge();
        let buffer = bridge.buffer(0x8000_0300, 12);

        buffer.write_array(&[1.0f32, -2.5, 100.0], 0).unwrap();
        assert_eq!(process.peek(RAM_BASE + 0x300, 4), vec![0x3F, 0x80, 0x00, 0x00]);
        assert_eq!(buffer.read_all::<f32>().unwrap(), vec![1.0, -2.5, 100.0]);
        assert_eq!(buffer.read_array::<u16>(0, 2).unwrap(), vec![0x3F80, 0x0000]);
    }

    #[test]
    fn test_read_all_skips_partial_element() {
        let (_, bridge) = simulated_bridge();
        let buffer = bridge.buffer(0x8000_0400, 10);
        buffer.write_array(&[7u32, 9u32], 0).unwrap();
        assert_eq!(buffer.read_all::<u32>().unwrap(), vec![7, 9]);
    }

    #[test]
    fn test_string_round_trip() {
        let (process, bridge) = simulated_bridge();
        let buffer = bridge.buffer(0x8000_0500, 64);

        buffer.write_str("RedBlueGalaxy", StringEncoding::Ascii).unwrap();
        assert_eq!(process.peek(RAM_BASE + 0x500 + 13, 1), vec![0]);
        assert_eq!(buffer.read_c_string(0, StringEncoding::Ascii).unwrap(), "RedBlueGalaxy");
        assert_eq!(buffer.read_c_string(3, StringEncoding::Ascii).unwrap(), "BlueGalaxy");
    }

    #[test]
    fn test_terminator_counts_against_capacity() {
        let (_, bridge) = simulated_bridge();
        let buffer = bridge.buffer(0x8000_0600, 4);

        assert!(buffer.write_str("abc", StringEncoding::Ascii).is_ok());
        assert!(matches!(
            buffer.write_str("abcd", StringEncoding::Ascii),
            Err(MemoryError::Overflow { length: 5, capacity: 4, .. })
        ));
    }

    #[test]
    fn test_ascii_replaces_non_ascii() {
        assert_eq!(StringEncoding::Ascii.encode("né"), vec![b'n', b'?', 0]);
        assert_eq!(StringEncoding::Utf8.encode("é"), vec![0xC3, 0xA9, 0]);
    }
}
