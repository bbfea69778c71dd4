//! Pipeline states and their one-way transitions.

use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};

/// States a pipeline run moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    /// Raw table received from the loader
    Loaded,
    /// Column names normalised
    Sanitized,
    /// Null ratios measured on the pre-augmentation table
    Reported,
    /// Threshold policy applied
    Gated,
    /// Terminal: null flags appended, table handed back
    Accepted,
    /// Terminal: dataset discarded before augmentation
    Rejected,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loaded => "Loaded",
            Self::Sanitized => "Sanitized",
            Self::Reported => "Reported",
            Self::Gated => "Gated",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    /// Transitions are strictly forward, one step at a time, with a single
    /// branch out of `Gated`.
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Loaded, Self::Sanitized)
                | (Self::Sanitized, Self::Reported)
                | (Self::Reported, Self::Gated)
                | (Self::Gated, Self::Accepted | Self::Rejected)
        )
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records the path a single run takes through [`PipelineStage`].
#[derive(Debug, Clone)]
pub struct StageTracker {
    history: Vec<PipelineStage>,
}

impl StageTracker {
    pub fn new() -> Self {
        Self {
            history: vec![PipelineStage::Loaded],
        }
    }

    pub fn current(&self) -> PipelineStage {
        self.history
            .last()
            .copied()
            .unwrap_or(PipelineStage::Loaded)
    }

    /// Move to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed from the current stage.
    pub fn advance(&mut self, target: PipelineStage) -> Result<()> {
        let current = self.current();
        if !current.can_transition_to(target) {
            return Err(PrepError::Other(format!(
                "Invalid pipeline transition {current} -> {target}"
            )));
        }
        tracing::info!("Pipeline stage: {current} -> {target}");
        self.history.push(target);
        Ok(())
    }

    pub fn history(&self) -> &[PipelineStage] {
        &self.history
    }

    pub fn into_history(self) -> Vec<PipelineStage> {
        self.history
    }
}

impl Default for StageTracker {
    fn default() -> Self {
        Self::new()
    }
}
