// Sat Oct 17 2026 - Alex

pub mod builtin;

use crate::symbol::SymbolTable;
use crate::toolkit::{Toolkit, ToolkitError};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
}

impl CommandResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn done() -> Self {
        Self::ok("Command executed successfully")
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// What a command may touch while it runs.
pub struct CommandContext<'a> {
    pub toolkit: &'a Toolkit,
    pub symbols: Option<&'a SymbolTable>,
    pub dump_dir: &'a Path,
}

pub trait ToolkitCommand: Send + Sync {
    fn keyword(&self) -> &'static str;

    fn usage(&self) -> &'static str;

    /// `args[0]` is the keyword itself.
    fn execute(&self, ctx: &CommandContext<'_>, args: &[&str]) -> Result<CommandResult, ToolkitError>;

    fn usage_error(&self) -> CommandResult {
        CommandResult::fail(self.usage())
    }
}

pub struct CommandManager {
    commands: BTreeMap<&'static str, Box<dyn ToolkitCommand>>,
}

impl CommandManager {
    pub fn new() -> Self {
        let mut manager = Self { commands: BTreeMap::new() };
        manager.register(builtin::CrashCommand);
        manager.register(builtin::FreezeCommand);
        manager.register(builtin::LogCommand);
        manager.register(builtin::StageCommand);
        manager.register(builtin::WarpCommand);
        manager.register(builtin::ReadCommand);
        manager.register(builtin::WriteCommand);
        manager
    }

    pub fn register<C: ToolkitCommand + 'static>(&mut self, command: C) {
        self.commands.insert(command.keyword(), Box::new(command));
    }

    pub fn keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    pub fn execute(&self, ctx: &CommandContext<'_>, input: &str) -> CommandResult {
        let args: Vec<&str> = input.split_whitespace().collect();
        let Some(&keyword) = args.first() else {
            return CommandResult::fail("Command is empty.");
        };

        if keyword == "help" {
            return self.help(args.get(1).copied());
        }

        let Some(command) = self.commands.get(keyword) else {
            return CommandResult::fail(format!("Command \"{}\" not found.", keyword));
        };

        log::debug!("Executing {:?}", args);
        match command.execute(ctx, &args) {
            Ok(result) => result,
            Err(e) => CommandResult::fail(format!(
                "Error while executing command \"{}\": {}",
                keyword, e
            )),
        }
    }

    pub fn help(&self, topic: Option<&str>) -> CommandResult {
        match topic {
            Some(name) => match self.commands.get(name) {
                Some(command) => CommandResult::ok(command.usage()),
                None => CommandResult::fail(format!("Command \"{}\" not found.", name)),
            },
            None => {
                let mut text = String::from("Commands:\n");
                for command in self.commands.values() {
                    text.push_str(command.usage());
                    text.push('\n');
                }
                text.push_str("help [Command]\n  Shows usage for one or all commands.");
                CommandResult::ok(text)
            }
        }
    }
}

impl Default for CommandManager {
    fn default() -> Self {
        Self::new()
    }
}
