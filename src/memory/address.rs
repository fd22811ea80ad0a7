// Fri Oct 16 2026 - Alex

use std::fmt;
use std::ops::{Add, Sub};

/// A native address inside the emulator process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address {
    value: u64,
}

impl Address {
    pub const fn new(value: u64) -> Self {
        Self { value }
    }

    pub const fn zero() -> Self {
        Self { value: 0 }
    }

    pub fn as_u64(&self) -> u64 {
        self.value
    }

    pub fn as_usize(&self) -> usize {
        self.value as usize
    }

    pub fn is_null(&self) -> bool {
        self.value == 0
    }

    pub fn checked_add(&self, rhs: u64) -> Option<Self> {
        self.value.checked_add(rhs).map(Self::new)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.value)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.value, f)
    }
}

impl Add<u64> for Address {
    type Output = Self;
    fn add(self, rhs: u64) -> Self::Output {
        Self { value: self.value.wrapping_add(rhs) }
    }
}

impl Sub<Address> for Address {
    type Output = u64;
    fn sub(self, rhs: Address) -> Self::Output {
        self.value.wrapping_sub(rhs.value)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<Address> for u64 {
    fn from(addr: Address) -> Self {
        addr.value
    }
}
