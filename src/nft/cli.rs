//! nftables command execution.
//!
//! Runs `nft` and parses the bits of its output we need.

use crate::config::MAX_COMMAND_OUTPUT;
use colored::Colorize;
use itertools::Itertools;
use regex::Regex;
use std::error::Error;
use std::process::Command;
use std::sync::OnceLock;

/// Regex for splitting command strings while preserving quoted substrings.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();

/// Regex matching the `table <family> <name>` lines of `nft list tables`.
static TABLE_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

fn get_table_regex() -> &'static Regex {
    TABLE_REGEX.get_or_init(|| {
        Regex::new(r"(?m)^\s*table\s+(\S+)\s+(\S+)\s*\{?\s*$").expect("Invalid Regex")
    })
}

/// Run a command and return its stdout.
///
/// The command string is split on spaces, with quoted substrings preserved.
pub fn run(cmd: &str) -> Result<String, Box<dyn Error>> {
    run_args(&split_and_strip(cmd))
}

/// Run a program with already separated arguments and return its stdout.
///
/// A non-zero exit status is an error carrying the command's stderr.
pub fn run_args<S: AsRef<str>>(cmds: &[S]) -> Result<String, Box<dyn Error>> {
    let cmds: Vec<&str> = cmds.iter().map(|c| c.as_ref()).collect();
    let cmd = cmds.iter().join(" ");
    log::debug!("run({cmd})", cmd = truncate(&cmd, 200).on_blue());
    log::trace!("cmds={:?}", cmds);

    let (program, args) = cmds
        .split_first()
        .ok_or_else(|| format!("Empty command: {cmd:?}"))?;

    let output = Command::new(program).args(args).output().map_err(|e| {
        log::error!("Command execution failed: {}", e);
        format!("Failed to execute {program}: {e}")
    })?;

    if output.status.success() {
        log::debug!("Success output.stdout.len(): {}", output.stdout.len());
        if output.stdout.len() > MAX_COMMAND_OUTPUT {
            return Err(format!(
                "Response too large: {} bytes for command: {program}",
                output.stdout.len()
            )
            .into());
        }
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = truncate(&cmd, 200).on_blue()
        );
        return Err(format!("ERROR running {program}: {}", stderr.trim()).into());
    }

    let stdout = String::from_utf8(output.stdout).map_err(|e| format!("Invalid UTF-8: {}", e))?;

    Ok(stdout)
}

/// Split a command string on spaces, preserving quoted substrings.
fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .collect()
}

/// Element lists can be huge; keep log lines readable.
fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((i, _)) => format!("{}...", &s[..i]),
        None => s.to_string(),
    }
}

/// A table as listed by `nft list tables`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftTable {
    pub family: String,
    pub name: String,
}

/// Parse the output of `nft list tables`.
pub fn parse_tables(output: &str) -> Vec<NftTable> {
    get_table_regex()
        .captures_iter(output)
        .map(|c| NftTable {
            family: c[1].to_string(),
            name: c[2].to_string(),
        })
        .collect()
}
