// Sat Oct 17 2026 - Alex

pub mod bridge;
pub mod commands;
pub mod config;
pub mod crashlog;
pub mod memory;
pub mod symbol;
pub mod toolkit;
pub mod utils;

pub use bridge::{BufferAddress, EmulatorBridge, TypedAddress};
pub use commands::{CommandManager, CommandResult};
pub use config::Config;
pub use crashlog::CrashLog;
pub use memory::{Address, MemoryError};
pub use symbol::SymbolTable;
pub use toolkit::{Toolkit, ToolkitError};
