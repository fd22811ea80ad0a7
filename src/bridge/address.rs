// Sat Oct 17 2026 - Alex

use crate::bridge::value::{encode_value, GuestValue};
use crate::bridge::EmulatorBridge;
use crate::memory::{Address, MemoryError};
use std::fmt;

/// A single guest location read and written as big-endian values.
#[derive(Clone, Copy)]
pub struct TypedAddress<'a> {
    bridge: &'a EmulatorBridge,
    address: u32,
}

impl<'a> TypedAddress<'a> {
    pub fn new(bridge: &'a EmulatorBridge, address: u32) -> Self {
        Self { bridge, address }
    }

    pub fn guest_address(&self) -> u32 {
        self.address
    }

    pub fn host_address(&self) -> Result<Address, MemoryError> {
        self.bridge.translate(self.address)
    }

    pub fn offset(&self, delta: u32) -> Self {
        Self::new(self.bridge, self.address.wrapping_add(delta))
    }

    pub fn read<T: GuestValue>(&self) -> Result<T, MemoryError> {
        let mut raw = [0u8; 8];
        let raw = &mut raw[..T::SIZE];
        self.bridge.read_raw(self.address, raw)?;
        Ok(T::decode(&mut &raw[..]))
    }

    pub fn write<T: GuestValue>(&self, value: T) -> Result<(), MemoryError> {
        self.bridge.write_raw(self.address, &encode_value(value))
    }

    pub fn read_u8(&self) -> Result<u8, MemoryError> {
        self.read()
    }

    pub fn read_u16(&self) -> Result<u16, MemoryError> {
        self.read()
    }

    pub fn read_u32(&self) -> Result<u32, MemoryError> {
        self.read()
    }

    pub fn read_f32(&self) -> Result<f32, MemoryError> {
        self.read()
    }

    pub fn write_u32(&self, value: u32) -> Result<(), MemoryError> {
        self.write(value)
    }
}

impl fmt::Display for TypedAddress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.address)
    }
}

impl fmt::Debug for TypedAddress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedAddress").field(&format_args!("{:#010x}", self.address)).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::bridge::tests::simulated_bridge;
    use crate::memory::simulated::RAM_BASE;
    use crate::memory::MemoryError;

    #[test]
    fn test_write_u32_is_big_endian() {
        let (process, bridge) = simulated_bridge();
        bridge.address(0x8000_1000).write_u32(0x0102_0304).unwrap();
        assert_eq!(process.peek(RAM_BASE + 0x1000, 4), vec![0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_round_trip_each_type() {
        let (_, bridge) = simulated_bridge();
        let slot = bridge.address(0x8040_0000);

        slot.write(0xABu8).unwrap();
        assert_eq!(slot.read::<u8>().unwrap(), 0xAB);
        slot.write(-5i8).unwrap();
        assert_eq!(slot.read::<i8>().unwrap(), -5);
        slot.write(0xBEEFu16).unwrap();
        assert_eq!(slot.read::<u16>().unwrap(), 0xBEEF);
        slot.write(-1234i16).unwrap();
        assert_eq!(slot.read::<i16>().unwrap(), -1234);
        slot.write(-7_000_000i32).unwrap();
        assert_eq!(slot.read::<i32>().unwrap(), -7_000_000);
        slot.write(0x0102_0304_0506_0708u64).unwrap();
        assert_eq!(slot.read::<u64>().unwrap(), 0x0102_0304_0506_0708);
        slot.write(i64::MIN).unwrap();
        assert_eq!(slot.read::<i64>().unwrap(), i64::MIN);
        slot.write(1500.25f32).unwrap();
        assert_eq!(slot.read::<f32>().unwrap(), 1500.25);
        slot.write(-0.125f64).unwrap();
        assert_eq!(slot.read::<f64>().unwrap(), -0.125);
    }

    #[test]
    fn test_one_read_per_value() {
        let (process, bridge) = simulated_bridge();
        let slot = bridge.address(0x8000_0040);
        slot.read_u32().unwrap();

        let before = process.reads();
        slot.read::<u64>().unwrap();
        // pointer slot re-read plus the value itself
        assert_eq!(process.reads() - before, 2);
    }

    #[test]
    fn test_last_byte_boundary() {
        let (_, bridge) = simulated_bridge();
        assert!(bridge.address(0x817F_FFFC).read_u32().is_ok());
        assert!(matches!(
            bridge.address(0x817F_FFFE).read_u32(),
            Err(MemoryError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_offset_and_display() {
        let (_, bridge) = simulated_bridge();
        let slot = bridge.address(0x8000_2FF4).offset(8);
        assert_eq!(slot.guest_address(), 0x8000_2FFC);
        assert_eq!(slot.to_string(), "80002FFC");
    }
}
