// Sat Oct 17 2026 - Alex

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use colored::Colorize;
use dolphin_bridge::{
    bridge::EmulatorBridge,
    commands::{CommandContext, CommandManager},
    config::Config,
    symbol::SymbolTable,
    toolkit::Toolkit,
    utils::{parse_hex_u32, LoggingUtils, ProcessUtils},
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Live memory bridge and command console for Dolphin", long_about = None)]
struct Args {
    /// Attach to this process id instead of searching by name
    #[arg(short, long)]
    pid: Option<u32>,

    /// Emulator executable name to search for
    #[arg(long)]
    process: Option<String>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base game symbol file (name=0xADDRESS lines)
    #[arg(short, long)]
    symbols: Option<PathBuf>,

    /// Custom code link map
    #[arg(long)]
    custom_map: Option<PathBuf>,

    /// Load address of the custom code, hex
    #[arg(long, value_parser = parse_guest_address)]
    custom_start: Option<u32>,

    #[arg(short, long)]
    log_level: Option<String>,

    /// Run one command and exit
    #[arg(short, long)]
    exec: Option<String>,

    #[arg(long)]
    no_color: bool,
}

fn parse_guest_address(s: &str) -> Result<u32, String> {
    parse_hex_u32(s).ok_or_else(|| format!("\"{}\" is not a hex address", s))
}

fn main() {
    if let Err(e) = run(Args::parse()) {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    apply_overrides(&mut config, &args);
    config.validate()?;

    if !config.color {
        colored::control::set_override(false);
    }
    LoggingUtils::init(LoggingUtils::level_from_str(&config.log_level), config.color);

    let pid = select_pid(&config)?;
    println!("{} Attaching to process {}", "[*]".blue(), pid);
    let bridge = attach(pid)?;
    let toolkit = Toolkit::new(bridge)?;
    println!(
        "{} Toolkit initialized, {} game, control block at 0x{:08X}",
        "[+]".green(),
        toolkit.region(),
        toolkit.control().base()
    );

    let symbols = load_symbols(&config, &toolkit);
    let manager = CommandManager::new();
    let ctx = CommandContext {
        toolkit: &toolkit,
        symbols: symbols.as_ref(),
        dump_dir: &config.dump_dir,
    };

    if let Some(line) = &args.exec {
        let result = manager.execute(&ctx, line);
        print_result(&result.message, result.success);
        if !result.success {
            bail!("command failed");
        }
        return Ok(());
    }

    interactive(&manager, &ctx)
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(pid) = args.pid {
        config.pid = Some(pid);
    }
    if let Some(name) = &args.process {
        config.process_name = name.clone();
    }
    if let Some(path) = &args.symbols {
        config.base_symbols = Some(path.clone());
    }
    if let Some(path) = &args.custom_map {
        config.custom_map = Some(path.clone());
    }
    if args.custom_start.is_some() {
        config.custom_start = args.custom_start;
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    if args.no_color {
        config.color = false;
    }
}

fn select_pid(config: &Config) -> anyhow::Result<u32> {
    if let Some(pid) = config.pid {
        return Ok(pid);
    }

    let found = ProcessUtils::find_processes_by_name(&config.process_name);
    match found.as_slice() {
        [] => Err(anyhow!("No \"{}\" process found", config.process_name)),
        [only] => Ok(only.pid),
        many => {
            println!("{} Multiple emulator processes found:", "[!]".yellow());
            for process in many {
                println!("    {} {}", process.pid, process.name);
            }
            Err(anyhow!("pick one with --pid"))
        }
    }
}

#[cfg(any(target_os = "linux", windows))]
fn attach(pid: u32) -> anyhow::Result<EmulatorBridge> {
    EmulatorBridge::attach(pid).with_context(|| format!("attaching to process {}", pid))
}

#[cfg(not(any(target_os = "linux", windows)))]
fn attach(_pid: u32) -> anyhow::Result<EmulatorBridge> {
    bail!("process access is not supported on this platform")
}

/// Symbol problems only cost annotations, so they are reported and skipped.
fn load_symbols(config: &Config, toolkit: &Toolkit) -> Option<SymbolTable> {
    let path = config.base_symbols.as_ref()?;
    let mut table = SymbolTable::new(toolkit.region());
    if let Err(e) = table.load_base_file(path) {
        println!("{} Base symbols error: {}", "[!]".red(), e);
        return None;
    }

    match &config.custom_map {
        Some(map) => {
            let started = match config.custom_start {
                Some(start) => table.set_custom_start(start),
                None => {
                    table.use_default_custom_start();
                    Ok(())
                }
            };
            let loaded = started.and_then(|_| table.load_custom_file(map));
            match loaded {
                Ok(_) => {
                    let (start, end) = table.custom_range();
                    println!(
                        "{} All symbols loaded, custom code range 0x{:08X} - 0x{:08X}",
                        "[+]".green(),
                        start,
                        end
                    );
                }
                Err(e) => {
                    table.use_default_custom_start();
                    println!("{} Custom symbols error: {}", "[!]".red(), e);
                }
            }
        }
        None => {
            table.use_default_custom_start();
            println!("{} Base game symbols loaded", "[+]".green());
        }
    }
    Some(table)
}

fn interactive(manager: &CommandManager, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
    println!("{} Type \"help\" for commands, \"quit\" to exit", "[*]".blue());
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }
        if !ctx.toolkit.bridge().is_open() {
            bail!("emulator process is closed");
        }

        let result = manager.execute(ctx, line);
        print_result(&result.message, result.success);
    }
    Ok(())
}

fn print_result(message: &str, success: bool) {
    if success {
        println!("{}", message);
    } else {
        println!("{}", message.red());
    }
}
