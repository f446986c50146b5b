use std::path::PathBuf;

use anyhow::{bail, Result};

pub const USAGE: &str = "\
Usage: persistcache [--file <path>] <command>

Commands:
  get <key>            Print the value stored under <key>
  set <key> <value>    Store <value>; parsed as JSON, otherwise kept as a string
  del <key>            Remove <key>
  list                 List all keys with a preview of their values
  clear                Remove every entry and delete the cache file
  info                 Show cache location and status
  help                 Show this message

Environment:
  PERSISTCACHE_FILE            Cache file (overridden by --file)
  PERSISTCACHE_AUTOSAVE_SECS   Autosave interval in seconds
  PERSISTCACHE_LOG_FILE        Also write logs to this file
  RUST_LOG                     Log filter (default: warn)";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Get(String),
    Set(String, String),
    Del(String),
    List,
    Clear,
    Info,
    Help,
}

impl Command {
    /// Whether running this command changes the cache
    pub fn is_mutating(&self) -> bool {
        matches!(self, Command::Set(..) | Command::Del(_) | Command::Clear)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub file: Option<PathBuf>,
    pub command: Command,
}

pub fn parse_args(args: &[String]) -> Result<Invocation> {
    let mut file = None;
    let mut rest = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--file" | "-f" => match iter.next() {
                Some(path) => file = Some(PathBuf::from(path)),
                None => bail!("--file requires a path"),
            },
            "--help" | "-h" => rest.push("help"),
            other => rest.push(other),
        }
    }

    let command = match rest.as_slice() {
        [] | ["help"] => Command::Help,
        ["get", key] => Command::Get(key.to_string()),
        ["set", key, value] => Command::Set(key.to_string(), value.to_string()),
        ["del", key] => Command::Del(key.to_string()),
        ["list"] => Command::List,
        ["clear"] => Command::Clear,
        ["info"] => Command::Info,
        [cmd, ..] if ["get", "set", "del", "list", "clear", "info"].contains(cmd) => {
            bail!("Wrong number of arguments for '{}'", cmd)
        }
        [cmd, ..] => bail!("Unknown command '{}'", cmd),
    };

    Ok(Invocation { file, command })
}
