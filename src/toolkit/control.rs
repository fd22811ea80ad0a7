// Sat Oct 17 2026 - Alex

use crate::bridge::{BufferAddress, EmulatorBridge, TypedAddress};
use crate::memory::guest::is_valid_guest_span;
use crate::toolkit::ToolkitError;

/// Guest word holding the address of the control block.
pub const CONTROL_POINTER_ADDRESS: u32 = 0x8000_2FF4;

/// Guest-allocated record shared with the tool:
/// `{ tool message: u32, game message: u32, buffer: [u8; 64] }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlBlock {
    base: u32,
}

impl ControlBlock {
    pub const TOOL_MESSAGE_OFFSET: u32 = 0;
    pub const GAME_MESSAGE_OFFSET: u32 = 4;
    pub const BUFFER_OFFSET: u32 = 8;
    pub const BUFFER_SIZE: u32 = 64;

    pub fn at(base: u32) -> Result<Self, ToolkitError> {
        if !is_valid_guest_span(base, Self::BUFFER_OFFSET + Self::BUFFER_SIZE) {
            return Err(ToolkitError::InvalidControlBlock(base));
        }
        Ok(Self { base })
    }

    /// Follows the fixed pointer. The guest leaves it zero until its
    /// tool support has started.
    pub fn locate(bridge: &EmulatorBridge) -> Result<Self, ToolkitError> {
        let base = bridge.address(CONTROL_POINTER_ADDRESS).read::<u32>()?;
        if base == 0 {
            return Err(ToolkitError::ControlBlockUnavailable);
        }
        Self::at(base)
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn tool_message<'a>(&self, bridge: &'a EmulatorBridge) -> TypedAddress<'a> {
        bridge.address(self.base + Self::TOOL_MESSAGE_OFFSET)
    }

    pub fn game_message<'a>(&self, bridge: &'a EmulatorBridge) -> TypedAddress<'a> {
        bridge.address(self.base + Self::GAME_MESSAGE_OFFSET)
    }

    pub fn buffer<'a>(&self, bridge: &'a EmulatorBridge) -> BufferAddress<'a> {
        bridge.buffer(self.base + Self::BUFFER_OFFSET, Self::BUFFER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::tests::simulated_bridge;
    use crate::memory::simulated::RAM_BASE;

    #[test]
    fn test_locate_follows_pointer() {
        let (process, bridge) = simulated_bridge();
        process.poke(RAM_BASE + 0x2FF4, &0x8040_0000u32.to_be_bytes());

        let block = ControlBlock::locate(&bridge).unwrap();
        assert_eq!(block.base(), 0x8040_0000);
        assert_eq!(block.game_message(&bridge).guest_address(), 0x8040_0004);
        assert_eq!(block.buffer(&bridge).guest_address(), 0x8040_0008);
        assert_eq!(block.buffer(&bridge).size(), 64);
    }

    #[test]
    fn test_zero_pointer_is_unavailable() {
        let (_, bridge) = simulated_bridge();
        let err = ControlBlock::locate(&bridge).unwrap_err();
        assert!(matches!(err, ToolkitError::ControlBlockUnavailable));
        assert!(err.is_transient());
    }

    #[test]
    fn test_block_must_fit_in_guest_memory() {
        assert!(matches!(ControlBlock::at(0x817F_FFF0), Err(ToolkitError::InvalidControlBlock(_))));
        assert!(matches!(ControlBlock::at(0x1234), Err(ToolkitError::InvalidControlBlock(_))));
    }
}
