// Sat Oct 17 2026 - Alex

/// Guest address that maps to the first byte of the RAM block.
pub const GUEST_SPACE_ORIGIN: u32 = 0x8000_0000;
/// Last addressable guest byte.
pub const GUEST_SPACE_END: u32 = 0x817F_FFFF;
/// Size of the host mapping that backs guest RAM.
pub const GUEST_RAM_SIZE: u64 = 0x0200_0000;

pub fn is_valid_guest_address(address: u32) -> bool {
    (GUEST_SPACE_ORIGIN..=GUEST_SPACE_END).contains(&address)
}

/// Whether every byte of `[address, address + len)` is addressable.
pub fn is_valid_guest_span(address: u32, len: u32) -> bool {
    if !is_valid_guest_address(address) {
        return false;
    }
    match len {
        0 => true,
        _ => address
            .checked_add(len - 1)
            .is_some_and(is_valid_guest_address),
    }
}

/// Offset of `address` from the start of guest RAM.
pub fn guest_offset(address: u32) -> u64 {
    (address - GUEST_SPACE_ORIGIN) as u64
}
