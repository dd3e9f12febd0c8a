//! JSONL logger: append-only line-delimited JSON activity records.
//!
//! Each line is a self-contained JSON object assembled in memory and written
//! with a single `write_all`, so a tailing reader never sees a partial line.
//!
//! Fallback chain:
//! 1. Primary file path
//! 2. Fallback path (optional)
//! 3. stderr with `[CALM-JSONL]` prefix
//! 4. Silent discard (logging never takes the UI down)

#![allow(missing_docs)]

use std::fmt;
use std::fs::{self, File, OpenOptions, rename};
use std::io::{self, BufWriter, Write};
use std::mem;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{CalmError, Result};

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Event types of the calmkit activity model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SessionStart,
    SessionStop,
    OverlayOpen,
    OverlayClose,
    ScreenChange,
    ChoiceRouted,
    BodyScan,
    Breathing,
    Grounding,
    WidgetInit,
    QuizProgress,
    Error,
}

/// A single JSONL log entry. Every field is optional except `ts`, `event`, `severity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    /// Screen identifier involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen: Option<String>,
    /// Triage tag or widget name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Sequencer step or quiz question index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
    /// Virtual-clock time of the event, in milliseconds since session start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Freeform details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            severity,
            screen: None,
            subject: None,
            step: None,
            clock_ms: None,
            ok: None,
            error_code: None,
            error_message: None,
            details: None,
        }
    }
}

/// Configuration for the JSONL writer.
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    pub path: PathBuf,
    pub fallback_path: Option<PathBuf>,
    /// Size at which the current file is rotated (bytes).
    pub max_size_bytes: u64,
    /// Rotated files kept beside the live one.
    pub max_rotated_files: u32,
}

impl Default for JsonlConfig {
    fn default() -> Self {
        Self {
            path: std::env::temp_dir().join("calmkit").join("activity.jsonl"),
            fallback_path: None,
            max_size_bytes: 10 * 1024 * 1024,
            max_rotated_files: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Primary,
    Fallback,
}

/// Where lines currently go. A sink only ever degrades downwards.
enum Sink {
    File {
        kind: FileKind,
        path: PathBuf,
        out: BufWriter<File>,
        size: u64,
    },
    Stderr,
    Discard,
}

/// Append-only JSONL writer with size rotation and a degradation chain.
pub struct JsonlWriter {
    config: JsonlConfig,
    sink: Sink,
}

impl JsonlWriter {
    /// Open the primary file, degrading as far as needed.
    pub fn open(config: JsonlConfig) -> Self {
        let sink = match open_sink(FileKind::Primary, &config.path) {
            Ok(sink) => sink,
            Err(cause) => fallback_sink(&config, &cause),
        };
        Self { config, sink }
    }

    pub fn write_entry(&mut self, entry: &LogEntry) {
        match serde_json::to_string(entry) {
            Ok(mut line) => {
                line.push('\n');
                self.write_line(&line);
            }
            Err(e) => note(format_args!("dropping unserialisable entry: {e}")),
        }
    }

    pub fn flush(&mut self) {
        if let Sink::File { out, .. } = &mut self.sink {
            let _ = out.flush();
        }
    }

    /// `normal`, `fallback`, `stderr` or `discard`.
    pub fn state(&self) -> &'static str {
        match &self.sink {
            Sink::File {
                kind: FileKind::Primary,
                ..
            } => "normal",
            Sink::File {
                kind: FileKind::Fallback,
                ..
            } => "fallback",
            Sink::Stderr => "stderr",
            Sink::Discard => "discard",
        }
    }

    /// Size of the live file, zero when not writing to a file.
    pub fn bytes_written(&self) -> u64 {
        match &self.sink {
            Sink::File { size, .. } => *size,
            Sink::Stderr | Sink::Discard => 0,
        }
    }

    fn write_line(&mut self, line: &str) {
        let len = line.len() as u64;
        let full = matches!(
            &self.sink,
            Sink::File { size, .. } if *size + len > self.config.max_size_bytes
        );
        if full {
            self.rotate();
        }

        loop {
            let cause = match &mut self.sink {
                Sink::File {
                    out, size, path, ..
                } => match out.write_all(line.as_bytes()) {
                    Ok(()) => {
                        *size += len;
                        return;
                    }
                    Err(source) => CalmError::io(path.as_path(), source),
                },
                Sink::Stderr => match write!(io::stderr(), "[CALM-JSONL] {line}") {
                    Ok(()) => return,
                    Err(source) => CalmError::io("<stderr>", source),
                },
                Sink::Discard => return,
            };
            self.degrade(&cause);
        }
    }

    fn degrade(&mut self, cause: &CalmError) {
        self.sink = match mem::replace(&mut self.sink, Sink::Discard) {
            Sink::File { kind, .. } => after_failure(&self.config, kind, cause),
            Sink::Stderr | Sink::Discard => Sink::Discard,
        };
    }

    fn rotate(&mut self) {
        let Sink::File {
            kind,
            path,
            mut out,
            ..
        } = mem::replace(&mut self.sink, Sink::Discard)
        else {
            return;
        };
        let _ = out.flush();
        drop(out);

        shift_rotations(&path, self.config.max_rotated_files);
        self.sink = match open_sink(kind, &path) {
            Ok(sink) => sink,
            Err(cause) => after_failure(&self.config, kind, &cause),
        };
    }
}

// ──────────────────────── helpers ────────────────────────

/// Next sink once a file of `kind` stopped accepting writes.
fn after_failure(config: &JsonlConfig, kind: FileKind, cause: &CalmError) -> Sink {
    match kind {
        FileKind::Primary => fallback_sink(config, cause),
        FileKind::Fallback => {
            note(format_args!("{cause}; logging to stderr"));
            Sink::Stderr
        }
    }
}

fn fallback_sink(config: &JsonlConfig, cause: &CalmError) -> Sink {
    let Some(path) = &config.fallback_path else {
        note(format_args!("{cause}; no fallback configured, logging to stderr"));
        return Sink::Stderr;
    };
    match open_sink(FileKind::Fallback, path) {
        Ok(sink) => {
            note(format_args!("{cause}; logging to {}", path.display()));
            sink
        }
        Err(e) => {
            note(format_args!("{e}; logging to stderr"));
            Sink::Stderr
        }
    }
}

/// Open (creating parents) for append, picking up the existing size.
fn open_sink(kind: FileKind, path: &Path) -> Result<Sink> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| CalmError::io(parent, source))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| CalmError::io(path, source))?;
    let size = file.metadata().map_or(0, |m| m.len());
    Ok(Sink::File {
        kind,
        path: path.to_path_buf(),
        out: BufWriter::with_capacity(16 * 1024, file),
        size,
    })
}

/// `a.jsonl` moves to `a.jsonl.1`, `.1` to `.2`, and so on up to `keep`.
fn shift_rotations(base: &Path, keep: u32) {
    let keep = keep.max(1);
    let _ = fs::remove_file(rotated_name(base, keep));
    for i in (1..keep).rev() {
        let _ = rename(rotated_name(base, i), rotated_name(base, i + 1));
    }
    let _ = rename(base, rotated_name(base, 1));
}

fn rotated_name(base: &Path, index: u32) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

fn note(message: fmt::Arguments<'_>) {
    let _ = writeln!(io::stderr(), "[CALM-JSONL] {message}");
}

fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// ──────────────────────── tests ────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn config_at(path: PathBuf, max_size_bytes: u64) -> JsonlConfig {
        JsonlConfig {
            path,
            fallback_path: None,
            max_size_bytes,
            max_rotated_files: 3,
        }
    }

    #[test]
    fn write_entry_produces_valid_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.jsonl");
        let mut writer = JsonlWriter::open(config_at(path.clone(), 1024 * 1024));

        let mut entry = LogEntry::new(EventType::OverlayOpen, Severity::Info);
        entry.screen = Some("sos-screen-1".to_string());
        writer.write_entry(&entry);
        writer.flush();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["event"], "overlay_open");
        assert_eq!(parsed["severity"], "info");
        assert_eq!(parsed["screen"], "sos-screen-1");
    }

    #[test]
    fn rotation_shifts_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rot.jsonl");
        let mut writer = JsonlWriter::open(config_at(path.clone(), 100));

        for _ in 0..10 {
            writer.write_entry(&LogEntry::new(EventType::BodyScan, Severity::Info));
        }
        writer.flush();

        assert!(path.exists());
        assert!(rotated_name(&path, 1).exists());
        assert!(!rotated_name(&path, 5).exists());
    }

    #[test]
    fn fallback_when_primary_dir_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();
        let fallback = dir.path().join("fallback.jsonl");
        let config = JsonlConfig {
            path: blocker.join("primary.jsonl"),
            fallback_path: Some(fallback.clone()),
            max_size_bytes: 1024 * 1024,
            max_rotated_files: 3,
        };
        let mut writer = JsonlWriter::open(config);

        assert_eq!(writer.state(), "fallback");
        writer.write_entry(&LogEntry::new(EventType::Error, Severity::Warning));
        writer.flush();

        let contents = fs::read_to_string(&fallback).unwrap();
        assert!(!contents.is_empty());
    }

    #[test]
    fn unwritable_primary_without_fallback_uses_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();
        let writer = JsonlWriter::open(config_at(blocker.join("a.jsonl"), 1024));
        assert_eq!(writer.state(), "stderr");
        assert_eq!(writer.bytes_written(), 0);
    }

    #[test]
    fn rotation_restarts_size_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("size.jsonl");
        let mut writer = JsonlWriter::open(config_at(path, 200));
        for _ in 0..20 {
            writer.write_entry(&LogEntry::new(EventType::Grounding, Severity::Info));
            assert!(writer.bytes_written() <= 200);
        }
    }

    #[test]
    fn entry_optional_fields_omitted_when_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sparse.jsonl");
        let mut writer = JsonlWriter::open(config_at(path.clone(), 1024 * 1024));

        writer.write_entry(&LogEntry::new(EventType::SessionStart, Severity::Info));
        writer.flush();

        let line = fs::read_to_string(&path).unwrap();
        assert!(!line.contains("\"screen\""));
        assert!(!line.contains("\"step\""));
        assert!(!line.contains("\"error_code\""));
    }
}
