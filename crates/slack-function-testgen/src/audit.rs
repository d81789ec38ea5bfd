// crates/slack-function-testgen/src/audit.rs
// ============================================================================
// Module: Generation Audit Logging
// Description: Structured audit events for test generation runs.
// Purpose: Emit JSON-line records of what was rendered and written.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every call to [`crate::TestGenerator::generate`] records one
//! [`GenerationEvent`] (`testgen_render`). The CLI adds one [`OutputEvent`]
//! (`testgen_output`) per file it writes or checks. Events are JSON lines and
//! never contain rendered source text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Result of rendering one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationOutcome {
    /// Source rendered.
    Rendered,
    /// Record rejected or rendering failed.
    Failed,
}

/// Action taken on an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputAction {
    /// File written.
    Written,
    /// File on disk matches the rendered source.
    Unchanged,
    /// File on disk differs from the rendered source or is missing.
    Drifted,
}

/// Render audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Function callback id (as given, possibly invalid).
    pub callback_id: String,
    /// Render outcome.
    pub outcome: GenerationOutcome,
    /// Number of test declarations rendered.
    pub test_count: usize,
    /// Rendered source size in bytes.
    pub output_bytes: usize,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
}

/// Inputs required to construct a render audit event.
pub struct GenerationEventParams {
    /// Function callback id.
    pub callback_id: String,
    /// Render outcome.
    pub outcome: GenerationOutcome,
    /// Number of test declarations rendered.
    pub test_count: usize,
    /// Rendered source size in bytes.
    pub output_bytes: usize,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
}

impl GenerationEvent {
    /// Creates a new render event with a consistent timestamp.
    #[must_use]
    pub fn new(params: GenerationEventParams) -> Self {
        Self {
            event: "testgen_render",
            timestamp_ms: now_ms(),
            callback_id: params.callback_id,
            outcome: params.outcome,
            test_count: params.test_count,
            output_bytes: params.output_bytes,
            error_kind: params.error_kind,
        }
    }
}

/// Output audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct OutputEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Output path as displayed to the user.
    pub path: String,
    /// Action taken.
    pub action: OutputAction,
    /// Rendered source size in bytes.
    pub bytes: usize,
}

impl OutputEvent {
    /// Creates a new output event with a consistent timestamp.
    #[must_use]
    pub fn new(path: &Path, action: OutputAction, bytes: usize) -> Self {
        Self {
            event: "testgen_output",
            timestamp_ms: now_ms(),
            path: path.display().to_string(),
            action,
            bytes,
        }
    }
}

/// Returns milliseconds since the Unix epoch, or zero if the clock is earlier.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for generation events.
pub trait GenerationSink: Send + Sync {
    /// Records a render event.
    fn record(&self, event: &GenerationEvent);

    /// Records an output event.
    fn record_output(&self, _event: &OutputEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrGenerationSink;

impl GenerationSink for StderrGenerationSink {
    fn record(&self, event: &GenerationEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_output(&self, event: &OutputEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileGenerationSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileGenerationSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized payload.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl GenerationSink for FileGenerationSink {
    fn record(&self, event: &GenerationEvent) {
        self.append(event);
    }

    fn record_output(&self, event: &OutputEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopGenerationSink;

impl GenerationSink for NoopGenerationSink {
    fn record(&self, _event: &GenerationEvent) {}
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use unwraps for clarity."
    )]

    use serde_json::Value;

    use super::*;

    #[test]
    fn file_sink_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let sink = FileGenerationSink::new(&path).unwrap();
        sink.record(&GenerationEvent::new(GenerationEventParams {
            callback_id: "add_pin".to_string(),
            outcome: GenerationOutcome::Rendered,
            test_count: 3,
            output_bytes: 120,
            error_kind: None,
        }));
        sink.record_output(&OutputEvent::new(Path::new("add_pin_test.ts"), OutputAction::Written, 120));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<Value> =
            content.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "testgen_render");
        assert_eq!(lines[0]["outcome"], "rendered");
        assert_eq!(lines[0]["test_count"], 3);
        assert!(lines[0]["error_kind"].is_null());
        assert_eq!(lines[1]["event"], "testgen_output");
        assert_eq!(lines[1]["action"], "written");
        assert_eq!(lines[1]["path"], "add_pin_test.ts");
    }

    #[test]
    fn failed_event_carries_error_kind() {
        let event = GenerationEvent::new(GenerationEventParams {
            callback_id: String::new(),
            outcome: GenerationOutcome::Failed,
            test_count: 0,
            output_bytes: 0,
            error_kind: Some("malformed_record"),
        });
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["outcome"], "failed");
        assert_eq!(value["error_kind"], "malformed_record");
        assert!(value["timestamp_ms"].as_u64().unwrap() > 0);
    }
}
