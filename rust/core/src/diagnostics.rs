// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Process-wide diagnostics sink
//!
//! Geometry operations in this workspace never raise; they return neutral
//! values (empty polygon, `false`, zero) and record *why* through this sink.
//! Callers reset it between logical operations and query the worst severity
//! seen since the last reset.
//!
//! Every record is mirrored to the matching [`tracing`] event, so embedders
//! that install a subscriber get structured logs without extra wiring.

use std::fmt;
use std::sync::{Mutex, OnceLock};

/// Message severity, ordered from least to most severe.
///
/// `Fatal` is reserved for embedding applications; nothing in this
/// workspace records it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        };
        f.write_str(name)
    }
}

/// One accumulated sink entry.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Default)]
struct SinkInner {
    entries: Vec<Diagnostic>,
    worst: Option<Severity>,
}

static SINK: OnceLock<Mutex<SinkInner>> = OnceLock::new();

fn sink() -> &'static Mutex<SinkInner> {
    SINK.get_or_init(|| Mutex::new(SinkInner::default()))
}

/// Record a severity-tagged message.
pub fn record(severity: Severity, message: impl Into<String>) {
    let message = message.into();
    match severity {
        Severity::Debug => tracing::debug!(target: "fenestra", "{message}"),
        Severity::Info => tracing::info!(target: "fenestra", "{message}"),
        Severity::Warn => tracing::warn!(target: "fenestra", "{message}"),
        Severity::Error | Severity::Fatal => {
            tracing::error!(target: "fenestra", "{message}")
        }
    }

    let Ok(mut inner) = sink().lock() else {
        return;
    };
    inner.worst = match inner.worst {
        Some(current) if current >= severity => Some(current),
        _ => Some(severity),
    };
    inner.entries.push(Diagnostic { severity, message });
}

/// Worst severity recorded since the last [`reset`], if any.
pub fn worst() -> Option<Severity> {
    sink().lock().ok().and_then(|inner| inner.worst)
}

/// Clear all accumulated entries and the worst-severity marker.
pub fn reset() {
    if let Ok(mut inner) = sink().lock() {
        inner.entries.clear();
        inner.worst = None;
    }
}

/// Snapshot of the accumulated entries since the last [`reset`].
pub fn entries() -> Vec<Diagnostic> {
    sink()
        .lock()
        .map(|inner| inner.entries.clone())
        .unwrap_or_default()
}

/// Number of entries at exactly the given severity.
pub fn count(severity: Severity) -> usize {
    sink()
        .lock()
        .map(|inner| {
            inner
                .entries
                .iter()
                .filter(|d| d.severity == severity)
                .count()
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // The sink is process-wide; serialize tests that inspect it.
    static GUARD: Mutex<()> = Mutex::new(());

    #[test]
    fn test_worst_tracks_maximum() {
        let _guard = GUARD.lock().unwrap();
        reset();
        record(Severity::Info, "resolving");
        record(Severity::Error, "spec rejected");
        record(Severity::Warn, "sill clamped");
        assert_eq!(worst(), Some(Severity::Error));
        assert_eq!(count(Severity::Error), 1);
        reset();
        assert_eq!(worst(), None);
        assert!(entries().is_empty());
    }

    #[test]
    fn test_severity_ordering() {
        let _guard = GUARD.lock().unwrap();
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }
}
