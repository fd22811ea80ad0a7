// Sat Oct 17 2026 - Alex

use crate::memory::guest::{is_valid_guest_address, is_valid_guest_span};
use crate::symbol::SymbolTable;
use crate::toolkit::{Region, Toolkit, ToolkitError};
use crate::utils::unix_timestamp;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const GPR_OFFSET: u32 = 0x00;
const FPR_OFFSET: u32 = 0x90;
const SRR_OFFSET: u32 = 0x198;
const REGISTER_COUNT: u32 = 32;
const MAX_FRAMES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackFrame {
    pub address: u32,
    pub back_chain: u32,
    pub lr_save: u32,
}

/// Register and stack snapshot of a crashed guest thread.
#[derive(Debug, Clone)]
pub struct CrashLog {
    pub context: u32,
    pub region: Region,
    pub gprs: Vec<u32>,
    pub srr0: u32,
    pub srr1: u32,
    pub fprs: Vec<f64>,
    pub trace: Vec<StackFrame>,
}

impl CrashLog {
    /// Reads the OSContext the guest published in the game message.
    pub fn capture(toolkit: &Toolkit) -> Result<Self, ToolkitError> {
        let context = toolkit.read_game_message()?;
        if !is_valid_guest_address(context) {
            return Err(ToolkitError::InvalidContext(context));
        }

        let bridge = toolkit.bridge();
        let gprs = bridge
            .buffer(context + GPR_OFFSET, REGISTER_COUNT * 4)
            .read_all::<u32>()?;
        let srr = bridge.buffer(context + SRR_OFFSET, 8).read_all::<u32>()?;
        let fprs = bridge
            .buffer(context + FPR_OFFSET, REGISTER_COUNT * 8)
            .read_all::<f64>()?;

        let mut trace = Vec::new();
        let mut frame = gprs[1];
        while trace.len() < MAX_FRAMES && is_valid_guest_span(frame, 8) {
            let words = bridge.buffer(frame, 8).read_all::<u32>()?;
            trace.push(StackFrame {
                address: frame,
                back_chain: words[0],
                lr_save: words[1],
            });
            frame = words[0];
        }
        log::debug!("Captured crash context at {:#010x}, {} frames", context, trace.len());

        Ok(Self {
            context,
            region: toolkit.region(),
            gprs,
            srr0: srr[0],
            srr1: srr[1],
            fprs,
            trace,
        })
    }

    pub fn render(&self, symbols: Option<&SymbolTable>) -> String {
        let mut out = String::new();

        section(&mut out, Some("MAIN"));
        let _ = writeln!(out, "Context: {:08X}  Region: {}", self.context, self.region.code());
        let _ = writeln!(out, "SRR0:    {:08X}  SRR1: {:08X}", self.srr0, self.srr1);

        section(&mut out, Some("GPR"));
        for (i, value) in self.gprs.iter().enumerate() {
            let _ = write!(out, "R{:02}: {:08X}  ", i, value);
            if (i + 1) % 3 == 0 {
                out.push('\n');
            }
        }
        out.push('\n');

        section(&mut out, Some("SRR0MAP"));
        let _ = writeln!(out, "SRR0: {:08X}  {}", self.srr0, describe(symbols, self.srr0));

        section(&mut out, Some("FPR"));
        for (i, value) in self.fprs.iter().enumerate() {
            let _ = write!(out, "F{:02}: {}  ", i, format_float(*value));
            if (i + 1) % 3 == 0 {
                out.push('\n');
            }
        }
        out.push('\n');

        section(&mut out, Some("TRACE"));
        out.push_str("Address:   BackChain  LR Save    Symbol\n");
        for frame in &self.trace {
            let _ = writeln!(
                out,
                "{:08X}:  {:08X}   {:08X}   {}",
                frame.address,
                frame.back_chain,
                frame.lr_save,
                describe(symbols, frame.lr_save)
            );
        }
        section(&mut out, None);
        out
    }

    /// Writes the rendered log to `crash-log-<unix time>.txt` under `dir`.
    pub fn dump(&self, symbols: Option<&SymbolTable>, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("crash-log-{}.txt", unix_timestamp()));
        fs::write(&path, self.render(symbols))?;
        log::info!("Crash log written to {}", path.display());
        Ok(path)
    }
}

fn section(out: &mut String, name: Option<&str>) {
    out.push_str("------------------------------------------------- ");
    out.push_str(name.unwrap_or(""));
    out.push('\n');
}

fn describe(symbols: Option<&SymbolTable>, address: u32) -> String {
    match symbols.and_then(|s| s.try_lookup(address)) {
        Some(hit) => format!("{} + 0x{:X}", hit.name, hit.offset_of(address)),
        None => "???".to_string(),
    }
}

/// Fixed-width scientific notation: `+1.500E+00`, `-2.000E-03`, ` 0.000E+00`.
fn format_float(value: f64) -> String {
    let sign = if value > 0.0 {
        "+"
    } else if value < 0.0 {
        ""
    } else {
        " "
    };
    let formatted = format!("{:.3E}", value);
    let Some((mantissa, exponent)) = formatted.split_once('E') else {
        return formatted;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return formatted;
    };
    let exp_sign = if exponent < 0 { '-' } else { '+' };
    format!("{}{}E{}{:02}", sign, mantissa, exp_sign, exponent.abs())
}
