use std::io::Write;

use anyhow::{Context, Result};
use persistcache_core::CacheManager;
use serde_json::Value;

use crate::args::Command;
use crate::format::{kind, preview};

/// Width of the value column in `list`
const PREVIEW_WIDTH: usize = 60;

/// Parse a command-line value: valid JSON is stored as-is, anything else as
/// a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub fn run(cache: &CacheManager, command: &Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Get(key) => {
            let value = cache
                .get(key)
                .with_context(|| format!("Key not found: {}", key))?;
            let json = value.to_json().context("Failed to encode value")?;
            writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
        }
        Command::Set(key, raw) => {
            cache.set(key.clone(), parse_value(raw));
        }
        Command::Del(key) => {
            if !cache.contains_key(key) {
                writeln!(out, "Key not found: {}", key)?;
            }
            cache.del(key);
        }
        Command::List => {
            for key in cache.keys() {
                let Some(value) = cache.get(&key) else {
                    continue;
                };
                let json = value.to_json().unwrap_or(Value::Null);
                writeln!(out, "{}\t{}\t{}", key, kind(&json), preview(&json, PREVIEW_WIDTH))?;
            }
        }
        Command::Clear => {
            let count = cache.len();
            cache.clear().context("Failed to clear cache")?;
            writeln!(out, "Cleared {} entries", count)?;
        }
        Command::Info => {
            let stats = cache.stats();
            let path = stats
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(disabled)".to_string());
            let size = stats
                .path
                .as_ref()
                .and_then(|p| std::fs::metadata(p).ok())
                .map(|m| format!("{} bytes", m.len()))
                .unwrap_or_else(|| "no file".to_string());
            writeln!(out, "File:    {}", path)?;
            writeln!(out, "Size:    {}", size)?;
            writeln!(out, "Entries: {}", stats.entries)?;
            writeln!(out, "Dirty:   {}", stats.dirty)?;
        }
        Command::Help => {
            writeln!(out, "{}", crate::args::USAGE)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn run_to_string(cache: &CacheManager, command: Command) -> Result<String> {
        let mut out = Vec::new();
        run(cache, &command, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("{\"a\": true}"), json!({"a": true}));
        assert_eq!(parse_value("hello world"), json!("hello world"));
        assert_eq!(parse_value("\"quoted\""), json!("quoted"));
    }

    #[tokio::test]
    async fn test_set_get_list_persist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let cache = CacheManager::open(&path);
        run_to_string(&cache, Command::Set("name".into(), "Alice".into())).unwrap();
        run_to_string(&cache, Command::Set("age".into(), "30".into())).unwrap();
        cache.close().await;

        let cache = CacheManager::open(&path);
        let got = run_to_string(&cache, Command::Get("name".into())).unwrap();
        assert_eq!(got.trim(), "\"Alice\"");
        assert_eq!(cache.get_int("age"), Some(30));

        let listing = run_to_string(&cache, Command::List).unwrap();
        assert_eq!(listing, "age\tint\t30\nname\tstring\tAlice\n");
        cache.close().await;
    }

    #[tokio::test]
    async fn test_get_missing_is_error() {
        let dir = tempdir().unwrap();
        let cache = CacheManager::open(dir.path().join("cache.json"));
        let err = run_to_string(&cache, Command::Get("nope".into())).unwrap_err();
        assert!(err.to_string().contains("nope"));
        cache.close().await;
    }

    #[tokio::test]
    async fn test_clear_and_info() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let cache = CacheManager::open(&path);
        run_to_string(&cache, Command::Set("k".into(), "v".into())).unwrap();
        cache.save_cache().unwrap();

        let info = run_to_string(&cache, Command::Info).unwrap();
        assert!(info.contains("Entries: 1"));
        assert!(info.contains("Dirty:   false"));

        let cleared = run_to_string(&cache, Command::Clear).unwrap();
        assert_eq!(cleared.trim(), "Cleared 1 entries");
        assert!(!path.exists());

        let info = run_to_string(&cache, Command::Info).unwrap();
        assert!(info.contains("no file"));
        cache.close().await;
    }
}
