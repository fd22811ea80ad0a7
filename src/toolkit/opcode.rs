// Sat Oct 17 2026 - Alex

use crate::toolkit::ToolkitError;
use std::fmt;

/// A tool message word: command code in the low byte, up to three
/// parameter bytes above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Opcode(u32);

impl Opcode {
    pub const MAX_PARAMS: usize = 3;

    pub const fn new(code: u8) -> Self {
        Self(code as u32)
    }

    pub fn with_params(self, params: &[u8]) -> Result<Self, ToolkitError> {
        if params.len() > Self::MAX_PARAMS {
            return Err(ToolkitError::TooManyParams(params.len()));
        }
        Ok(Self(self.0 & 0xFF | pack(params)))
    }

    pub fn word(&self) -> u32 {
        self.0
    }

    pub fn code(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    pub fn param_word(&self) -> u32 {
        self.0 >> 8
    }

    pub fn param(&self, index: usize) -> Option<u8> {
        (index < Self::MAX_PARAMS).then(|| (self.0 >> (8 * (index + 1))) as u8)
    }
}

impl From<u32> for Opcode {
    fn from(word: u32) -> Self {
        Self(word)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

/// Data copied into the shared buffer before the opcode is posted.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Vector([f32; 3]),
}

/// Requests understood by the cooperating guest program.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCommand {
    Initialize,
    /// Reserved by the guest, no handler yet.
    Object,
    Stage { name: String, scenario: i8, star: i8 },
    WarpPosition { x: f32, y: f32, z: f32 },
    WarpGeneralPosition(String),
    Freeze(bool),
    /// Makes the guest raise a null OSReport and crash.
    Crash,
}

impl ToolCommand {
    pub const INITIALIZE: u8 = 1;
    pub const OBJECT: u8 = 2;
    pub const STAGE: u8 = 3;
    pub const WARP: u8 = 4;
    pub const FREEZE: u8 = 0xFE;
    pub const CRASH_WORD: u32 = 0xFFFF_FFFF;

    pub fn opcode(&self) -> Opcode {
        match self {
            ToolCommand::Initialize => Opcode::new(Self::INITIALIZE),
            ToolCommand::Object => Opcode::new(Self::OBJECT),
            ToolCommand::Stage { scenario, star, .. } => {
                let params = [*scenario as u8, *star as u8];
                Opcode::from(Self::STAGE as u32 | pack(&params))
            }
            ToolCommand::WarpPosition { .. } => Opcode::new(Self::WARP),
            ToolCommand::WarpGeneralPosition(_) => Opcode::from(Self::WARP as u32 | 1 << 8),
            ToolCommand::Freeze(freeze) => Opcode::from(Self::FREEZE as u32 | (*freeze as u32) << 8),
            ToolCommand::Crash => Opcode::from(Self::CRASH_WORD),
        }
    }

    pub fn payload(&self) -> Option<Payload> {
        match self {
            ToolCommand::Stage { name, .. } | ToolCommand::WarpGeneralPosition(name) => {
                Some(Payload::Text(name.clone()))
            }
            ToolCommand::WarpPosition { x, y, z } => Some(Payload::Vector([*x, *y, *z])),
            _ => None,
        }
    }
}

fn pack(params: &[u8]) -> u32 {
    params
        .iter()
        .enumerate()
        .fold(0, |word, (i, &p)| word | (p as u32) << (8 * (i + 1)))
}
