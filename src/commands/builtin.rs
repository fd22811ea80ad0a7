// Sat Oct 17 2026 - Alex

use crate::bridge::TypedAddress;
use crate::commands::{CommandContext, CommandResult, ToolkitCommand};
use crate::crashlog::CrashLog;
use crate::memory::MemoryError;
use crate::toolkit::{ToolCommand, ToolkitError};
use crate::utils::{parse_bool, parse_hex_u32};
use std::str::FromStr;

pub struct CrashCommand;

impl ToolkitCommand for CrashCommand {
    fn keyword(&self) -> &'static str {
        "crash"
    }

    fn usage(&self) -> &'static str {
        "crash\n  Crashes the game with a null OSReport message."
    }

    fn execute(&self, ctx: &CommandContext<'_>, _args: &[&str]) -> Result<CommandResult, ToolkitError> {
        ctx.toolkit.post(&ToolCommand::Crash)?;
        Ok(CommandResult::done())
    }
}

pub struct FreezeCommand;

impl ToolkitCommand for FreezeCommand {
    fn keyword(&self) -> &'static str {
        "freeze"
    }

    fn usage(&self) -> &'static str {
        "freeze <Value>\n  Freezes or unfreezes the game.\n  Value: true/false."
    }

    fn execute(&self, ctx: &CommandContext<'_>, args: &[&str]) -> Result<CommandResult, ToolkitError> {
        let Some(freeze) = args.get(1).and_then(|s| parse_bool(s)) else {
            return Ok(self.usage_error());
        };
        ctx.toolkit.post(&ToolCommand::Freeze(freeze))?;
        Ok(CommandResult::done())
    }
}

pub struct LogCommand;

impl ToolkitCommand for LogCommand {
    fn keyword(&self) -> &'static str {
        "log"
    }

    fn usage(&self) -> &'static str {
        "log [Dump]\n  Displays information about a crash.\n  Dump: optional true/false, also write the log to a file."
    }

    fn execute(&self, ctx: &CommandContext<'_>, args: &[&str]) -> Result<CommandResult, ToolkitError> {
        let log = match CrashLog::capture(ctx.toolkit) {
            Ok(log) => log,
            Err(e @ ToolkitError::InvalidContext(_)) => return Ok(CommandResult::fail(e.to_string())),
            Err(e) => return Err(e),
        };

        let mut text = log.render(ctx.symbols);
        if args.get(1).and_then(|s| parse_bool(s)).unwrap_or(false) {
            match log.dump(ctx.symbols, ctx.dump_dir) {
                Ok(path) => text.push_str(&format!("Dumped crash log to {}.\n", path.display())),
                Err(e) => return Ok(CommandResult::fail(format!("Failed to dump crash log: {}", e))),
            }
        }
        Ok(CommandResult::ok(text))
    }
}

pub struct StageCommand;

impl ToolkitCommand for StageCommand {
    fn keyword(&self) -> &'static str {
        "stage"
    }

    fn usage(&self) -> &'static str {
        "stage <StageName> <ScenarioNo> <StarNo>\n  Sends the player to any stage.\n  StageName: internal stage name. ScenarioNo: scenario number. StarNo: star id."
    }

    fn execute(&self, ctx: &CommandContext<'_>, args: &[&str]) -> Result<CommandResult, ToolkitError> {
        let [_, name, scenario, star, ..] = args else {
            return Ok(self.usage_error());
        };
        let Ok(scenario) = scenario.parse::<i8>() else {
            return Ok(CommandResult::fail("Invalid ScenarioNo."));
        };
        let Ok(star) = star.parse::<i8>() else {
            return Ok(CommandResult::fail("Invalid StarNo."));
        };

        ctx.toolkit.post(&ToolCommand::Stage {
            name: name.to_string(),
            scenario,
            star,
        })?;
        Ok(CommandResult::done())
    }
}

pub struct WarpCommand;

impl ToolkitCommand for WarpCommand {
    fn keyword(&self) -> &'static str {
        "warp"
    }

    fn usage(&self) -> &'static str {
        "warp <Type> <Value>\n  Warps the player to any position.\n  Type: Pos or GeneralPos. Value: x,y,z or a general position name."
    }

    fn execute(&self, ctx: &CommandContext<'_>, args: &[&str]) -> Result<CommandResult, ToolkitError> {
        let [_, kind, value, ..] = args else {
            return Ok(self.usage_error());
        };

        let command = match *kind {
            "Pos" => {
                let parts: Vec<&str> = value.splitn(3, ',').collect();
                if parts.len() < 3 {
                    return Ok(CommandResult::fail("Invalid value Vector3."));
                }
                let mut xyz = [0f32; 3];
                for (slot, part) in xyz.iter_mut().zip(&parts) {
                    match part.trim().parse::<f32>() {
                        Ok(v) => *slot = v,
                        Err(_) => {
                            return Ok(CommandResult::fail(format!(
                                "Unable to parse \"{}\" as a float.",
                                part
                            )))
                        }
                    }
                }
                ToolCommand::WarpPosition { x: xyz[0], y: xyz[1], z: xyz[2] }
            }
            "GeneralPos" => ToolCommand::WarpGeneralPosition(value.to_string()),
            other => return Ok(CommandResult::fail(format!("Unknown warp type \"{}\".", other))),
        };

        ctx.toolkit.post(&command)?;
        Ok(CommandResult::done())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    S8,
    U8,
    S16,
    U16,
    S32,
    U32,
    S64,
    U64,
    F32,
    F64,
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s8" => Ok(ValueType::S8),
            "u8" => Ok(ValueType::U8),
            "s16" => Ok(ValueType::S16),
            "u16" => Ok(ValueType::U16),
            "s32" => Ok(ValueType::S32),
            "u32" => Ok(ValueType::U32),
            "s64" => Ok(ValueType::S64),
            "u64" => Ok(ValueType::U64),
            "f32" => Ok(ValueType::F32),
            "f64" => Ok(ValueType::F64),
            _ => Err(format!("Unknown data type \"{}\".", s)),
        }
    }
}

macro_rules! format_int {
    ($address:expr, $ty:ty, $hex:expr) => {{
        let value = $address.read::<$ty>()?;
        if $hex {
            format!("{:X}", value)
        } else {
            value.to_string()
        }
    }};
}

impl ValueType {
    pub fn read(&self, address: &TypedAddress<'_>, hex: bool) -> Result<String, MemoryError> {
        Ok(match self {
            ValueType::S8 => format_int!(address, i8, hex),
            ValueType::U8 => format_int!(address, u8, hex),
            ValueType::S16 => format_int!(address, i16, hex),
            ValueType::U16 => format_int!(address, u16, hex),
            ValueType::S32 => format_int!(address, i32, hex),
            ValueType::U32 => format_int!(address, u32, hex),
            ValueType::S64 => format_int!(address, i64, hex),
            ValueType::U64 => format_int!(address, u64, hex),
            ValueType::F32 => address.read::<f32>()?.to_string(),
            ValueType::F64 => address.read::<f64>()?.to_string(),
        })
    }

    /// `Ok(None)` when `text` does not parse as this type.
    pub fn write(&self, address: &TypedAddress<'_>, text: &str) -> Result<Option<()>, MemoryError> {
        fn put<T: crate::bridge::GuestValue + FromStr>(
            address: &TypedAddress<'_>,
            text: &str,
        ) -> Result<Option<()>, MemoryError> {
            match text.parse::<T>() {
                Ok(value) => address.write(value).map(Some),
                Err(_) => Ok(None),
            }
        }

        match self {
            ValueType::S8 => put::<i8>(address, text),
            ValueType::U8 => put::<u8>(address, text),
            ValueType::S16 => put::<i16>(address, text),
            ValueType::U16 => put::<u16>(address, text),
            ValueType::S32 => put::<i32>(address, text),
            ValueType::U32 => put::<u32>(address, text),
            ValueType::S64 => put::<i64>(address, text),
            ValueType::U64 => put::<u64>(address, text),
            ValueType::F32 => put::<f32>(address, text),
            ValueType::F64 => put::<f64>(address, text),
        }
    }
}

pub struct ReadCommand;

impl ToolkitCommand for ReadCommand {
    fn keyword(&self) -> &'static str {
        "read"
    }

    fn usage(&self) -> &'static str {
        "read <Type> <Address> [Format]\n  Reads a value at an address.\n  Type: s8 u8 s16 u16 s32 u32 s64 u64 f32 f64. Format: x for hexadecimal integers."
    }

    fn execute(&self, ctx: &CommandContext<'_>, args: &[&str]) -> Result<CommandResult, ToolkitError> {
        let [_, ty, address, rest @ ..] = args else {
            return Ok(self.usage_error());
        };
        let ty = match ty.parse::<ValueType>() {
            Ok(ty) => ty,
            Err(e) => return Ok(CommandResult::fail(e)),
        };
        let Some(address) = parse_hex_u32(address) else {
            return Ok(CommandResult::fail(format!("Unable to parse address \"{}\".", address)));
        };
        let hex = rest.first().is_some_and(|f| f.eq_ignore_ascii_case("x"));

        let value = ty.read(&ctx.toolkit.bridge().address(address), hex)?;
        Ok(CommandResult::ok(value))
    }
}

pub struct WriteCommand;

impl ToolkitCommand for WriteCommand {
    fn keyword(&self) -> &'static str {
        "write"
    }

    fn usage(&self) -> &'static str {
        "write <Type> <Address> <Value>\n  Writes a value to an address.\n  Type: s8 u8 s16 u16 s32 u32 s64 u64 f32 f64."
    }

    fn execute(&self, ctx: &CommandContext<'_>, args: &[&str]) -> Result<CommandResult, ToolkitError> {
        let [_, ty, address, value, ..] = args else {
            return Ok(self.usage_error());
        };
        let ty = match ty.parse::<ValueType>() {
            Ok(ty) => ty,
            Err(e) => return Ok(CommandResult::fail(e)),
        };
        let Some(address) = parse_hex_u32(address) else {
            return Ok(CommandResult::fail(format!("Unable to parse address \"{}\".", address)));
        };

        match ty.write(&ctx.toolkit.bridge().address(address), value)? {
            Some(()) => Ok(CommandResult::done()),
            None => Ok(CommandResult::fail(format!("Unable to parse \"{}\" as {:?}.", value, ty))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::run;
    use crate::commands::CommandManager;
    use crate::memory::simulated::RAM_BASE;
    use crate::symbol::SymbolTable;
    use crate::toolkit::tests::{booted_toolkit, CONTROL_HOST};
    use crate::toolkit::Region;
    use std::path::Path;

    #[test]
    fn test_crash_and_freeze() {
        let (process, toolkit) = booted_toolkit();
        assert!(run(&toolkit, "crash").success);
        assert_eq!(process.peek(CONTROL_HOST, 4), vec![0xFF; 4]);

        assert!(run(&toolkit, "freeze true").success);
        assert_eq!(process.peek(CONTROL_HOST, 4), vec![0, 0, 0x01, 0xFE]);
        assert!(run(&toolkit, "freeze 0").success);
        assert_eq!(process.peek(CONTROL_HOST, 4), vec![0, 0, 0, 0xFE]);

        let bad = run(&toolkit, "freeze maybe");
        assert!(!bad.success);
        assert!(bad.message.starts_with("freeze <Value>"));
    }

    #[test]
    fn test_stage() {
        let (process, toolkit) = booted_toolkit();
        assert!(run(&toolkit, "stage RedBlueGalaxy 5 7").success);
        assert_eq!(process.peek(CONTROL_HOST, 4), vec![0x00, 0x07, 0x05, 0x03]);
        assert_eq!(process.peek(CONTROL_HOST + 8, 4), b"RedB".to_vec());

        assert_eq!(run(&toolkit, "stage Foo x 1").message, "Invalid ScenarioNo.");
        assert_eq!(run(&toolkit, "stage Foo 1 300").message, "Invalid StarNo.");
        assert!(!run(&toolkit, "stage Foo").success);
    }

    #[test]
    fn test_warp() {
        let (process, toolkit) = booted_toolkit();
        assert!(run(&toolkit, "warp Pos 1.5,0,-3").success);
        assert_eq!(process.peek(CONTROL_HOST, 4), vec![0, 0, 0, 4]);
        assert_eq!(toolkit.buffer().read_array::<f32>(0, 3).unwrap(), vec![1.5, 0.0, -3.0]);

        assert!(run(&toolkit, "warp GeneralPos Start").success);
        assert_eq!(process.peek(CONTROL_HOST, 4), vec![0, 0, 0x01, 0x04]);

        assert_eq!(run(&toolkit, "warp Pos 1,2").message, "Invalid value Vector3.");
        assert!(run(&toolkit, "warp Pos 1,a,2").message.contains("\"a\""));
        assert!(run(&toolkit, "warp Spin x").message.contains("Unknown warp type"));
    }

    #[test]
    fn test_read_and_write() {
        let (process, toolkit) = booted_toolkit();
        assert!(run(&toolkit, "write u32 0x80001000 305419896").success);
        assert_eq!(process.peek(RAM_BASE + 0x1000, 4), vec![0x12, 0x34, 0x56, 0x78]);

        assert_eq!(run(&toolkit, "read u32 80001000").message, "305419896");
        assert_eq!(run(&toolkit, "read u16 0x80001000 x").message, "1234");
        assert_eq!(run(&toolkit, "read s8 0x80001003").message, "120");

        assert!(run(&toolkit, "write f32 0x80001010 -2.5").success);
        assert_eq!(run(&toolkit, "read f32 0x80001010").message, "-2.5");
    }

    #[test]
    fn test_read_write_errors() {
        let (_, toolkit) = booted_toolkit();
        assert_eq!(run(&toolkit, "read q32 0x80000000").message, "Unknown data type \"q32\".");
        assert!(run(&toolkit, "read u32 nope").message.contains("Unable to parse address"));
        assert!(!run(&toolkit, "write u8 0x80000000 256").success);

        let invalid = run(&toolkit, "read u32 0x90000000");
        assert!(!invalid.success);
        assert!(invalid.message.contains("Invalid"));
    }

    #[test]
    fn test_log_requires_context() {
        let (_, toolkit) = booted_toolkit();
        let result = run(&toolkit, "log");
        assert!(!result.success);
        assert!(result.message.contains("OSContext"));
    }

    #[test]
    fn test_log_renders_with_symbols() {
        let (process, toolkit) = booted_toolkit();
        let context = 0x8050_0000u32;
        process.poke(CONTROL_HOST + 4, &context.to_be_bytes());
        process.poke(RAM_BASE + 0x50_0198, &0x8000_4104u32.to_be_bytes());

        let mut symbols = SymbolTable::new(Region::Usa);
        symbols.load_base("main=0x80004100\n".as_bytes()).unwrap();
        let ctx = CommandContext {
            toolkit: &toolkit,
            symbols: Some(&symbols),
            dump_dir: Path::new("dump"),
        };

        let result = CommandManager::new().execute(&ctx, "log");
        assert!(result.success);
        assert!(result.message.contains("SRR0: 80004104  main + 0x4"));
    }
}
