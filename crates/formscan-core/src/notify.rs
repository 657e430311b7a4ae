//! Completion reporting and the scanning to reviewing mode switch.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::extraction::classifier::Classification;
use crate::models::config::ReviewConfig;
use crate::models::form::{BoundFormData, ExtractionOutput};
use crate::models::record::DocumentDomain;

/// Filled and total declared field counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSummary {
    pub filled_count: usize,
    pub total_count: usize,
}

impl CompletionSummary {
    /// User-facing message.
    pub fn message(&self) -> String {
        match self.filled_count {
            0 => "Aucun champ n'a pu être rempli automatiquement.".to_string(),
            1 => "1 champ a été rempli automatiquement.".to_string(),
            n => format!("{} champs ont été remplis automatiquement.", n),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.filled_count == self.total_count
    }
}

impl fmt::Display for CompletionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.filled_count, self.total_count)
    }
}

impl ExtractionOutput {
    pub fn summary(&self) -> CompletionSummary {
        CompletionSummary {
            filled_count: self.filled_count,
            total_count: self.total_count,
        }
    }
}

/// Count filled declared fields. Auxiliary attributes are not counted.
pub fn summarize(bound: &BoundFormData) -> CompletionSummary {
    CompletionSummary {
        filled_count: bound.fields().filter(|(_, v)| v.is_filled()).count(),
        total_count: bound.field_count(),
    }
}

/// Receives pipeline outcomes in place of broadcast events.
pub trait CompletionHandler {
    /// Fields were bound.
    fn on_complete(&self, output: &ExtractionOutput, summary: &CompletionSummary);

    /// No template was available for the record's domain.
    fn on_no_template(&self, _classification: &Classification) {}

    /// The record belongs to another domain and was dropped.
    fn on_domain_mismatch(&self, _expected: DocumentDomain, _received: DocumentDomain) {}
}

/// Reports outcomes through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogHandler;

impl CompletionHandler for LogHandler {
    fn on_complete(&self, output: &ExtractionOutput, summary: &CompletionSummary) {
        info!(
            "Template {}: {} ({})",
            output.template_id,
            summary.message(),
            summary
        );
    }

    fn on_no_template(&self, _classification: &Classification) {
        warn!("No template available, nothing was filled");
    }

    fn on_domain_mismatch(&self, expected: DocumentDomain, received: DocumentDomain) {
        warn!("Incompatible document type: expected {}, received {}", expected, received);
    }
}

/// Input mode of the consuming layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Scanning,
    Reviewing,
}

const SCANNING: u8 = 0;
const REVIEWING: u8 = 1;

/// Two-state machine with a single `Scanning -> Reviewing` transition.
///
/// Clones share the same state, so a delayed task can hold one while the
/// caller keeps another. Completing twice is harmless.
#[derive(Debug, Clone, Default)]
pub struct ModeSwitch {
    state: Arc<AtomicU8>,
}

impl ModeSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InputMode {
        match self.state.load(Ordering::Acquire) {
            SCANNING => InputMode::Scanning,
            _ => InputMode::Reviewing,
        }
    }

    /// Switch to reviewing. Returns `true` only for the call that switched.
    pub fn complete(&self) -> bool {
        self.state
            .compare_exchange(SCANNING, REVIEWING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Back to scanning, for the next document.
    pub fn reset(&self) {
        self.state.store(SCANNING, Ordering::Release);
    }
}

/// Delayed mode switch requested after a completed extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewTransition {
    pub delay: Duration,
}

impl ReviewTransition {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Apply the switch once the delay has elapsed.
    pub fn fire(&self, switch: &ModeSwitch) -> bool {
        switch.complete()
    }
}

impl From<&ReviewConfig> for ReviewTransition {
    fn from(config: &ReviewConfig) -> Self {
        Self::new(config.delay())
    }
}

impl Default for ReviewTransition {
    fn default() -> Self {
        Self::from(&ReviewConfig::default())
    }
}
