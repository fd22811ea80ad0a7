// Sat Oct 17 2026 - Alex

pub mod control;
pub mod error;
pub mod opcode;
pub mod region;

pub use control::ControlBlock;
pub use error::ToolkitError;
pub use opcode::{Opcode, Payload, ToolCommand};
pub use region::Region;

use crate::bridge::{BufferAddress, EmulatorBridge, StringEncoding, TypedAddress};
use crate::memory::MemoryError;

/// Guest byte holding the game's region letter.
pub const REGION_ADDRESS: u32 = 0x8000_0003;

/// A session with the cooperating guest program.
pub struct Toolkit {
    bridge: EmulatorBridge,
    region: Region,
    control: ControlBlock,
}

impl Toolkit {
    /// Identifies the running game, finds the control block and announces
    /// the tool to the guest.
    pub fn new(bridge: EmulatorBridge) -> Result<Self, ToolkitError> {
        let code = bridge
            .address(REGION_ADDRESS)
            .read::<u8>()
            .map_err(|e| match e {
                MemoryError::ProcessClosed => ToolkitError::Memory(e),
                e => ToolkitError::GameNotRunning(e),
            })?;
        let region = Region::from_code(code).ok_or(ToolkitError::UnknownRegion(code))?;
        let control = ControlBlock::locate(&bridge)?;

        let toolkit = Self { bridge, region, control };
        toolkit.post(&ToolCommand::Initialize)?;
        log::info!(
            "Toolkit initialized for {}, control block at {:#010x}",
            region,
            control.base()
        );
        Ok(toolkit)
    }

    pub fn bridge(&self) -> &EmulatorBridge {
        &self.bridge
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn control(&self) -> ControlBlock {
        self.control
    }

    pub fn tool_message(&self) -> TypedAddress<'_> {
        self.control.tool_message(&self.bridge)
    }

    pub fn game_message(&self) -> TypedAddress<'_> {
        self.control.game_message(&self.bridge)
    }

    pub fn buffer(&self) -> BufferAddress<'_> {
        self.control.buffer(&self.bridge)
    }

    /// Fills the shared buffer, then writes the opcode word. No
    /// acknowledgement is awaited.
    pub fn post(&self, command: &ToolCommand) -> Result<(), ToolkitError> {
        match command.payload() {
            Some(Payload::Text(text)) => self.buffer().write_str(&text, StringEncoding::Ascii)?,
            Some(Payload::Vector(v)) => self.buffer().write_array(&v, 0)?,
            None => {}
        }
        self.post_opcode(command.opcode())
    }

    pub fn post_opcode(&self, opcode: Opcode) -> Result<(), ToolkitError> {
        self.tool_message().write(opcode.word())?;
        log::debug!("Posted opcode {}", opcode);
        Ok(())
    }

    pub fn read_game_message(&self) -> Result<u32, ToolkitError> {
        Ok(self.game_message().read::<u32>()?)
    }
}
