/*!
 * Per-task translation decisions.
 *
 * Precedence, highest first: manual override, force flag, missing output,
 * incremental mode with a changed source, default skip.
 */

use std::fmt;

/// What to do with one (document, language) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskDecision {
    /// Output was edited by hand; never overwritten
    SkipManualOverride,
    /// Incremental mode, source unchanged, output present
    SkipUnchanged,
    /// Incremental mode off, output present, not forced
    SkipExisting,
    /// Output missing
    Translate,
    /// Incremental mode, source changed, output present
    Retranslate,
    /// Force flag set, output present
    ForceRetranslate,
}

impl TaskDecision {
    /// Whether the task needs a translation call
    pub fn is_actionable(self) -> bool {
        matches!(self, Self::Translate | Self::Retranslate | Self::ForceRetranslate)
    }

    /// Short description used in progress output
    pub fn describe(self) -> &'static str {
        match self {
            Self::SkipManualOverride => "manual translation detected",
            Self::SkipUnchanged => "no changes",
            Self::SkipExisting => "already exists",
            Self::Translate => "full translation",
            Self::Retranslate => "incremental translation",
            Self::ForceRetranslate => "forced re-translation",
        }
    }
}

impl fmt::Display for TaskDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Run-wide switches that influence every decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecisionOptions {
    /// Retranslate regardless of existence or changes
    pub force: bool,
    /// Retranslate changed sources, fill missing outputs
    pub incremental: bool,
}

/// Facts about one (document, language) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskFacts {
    /// Output path is in the manual-override set
    pub manual_override: bool,
    /// Output file already exists
    pub target_exists: bool,
    /// Source differs from the last committed snapshot
    pub source_changed: bool,
}

/// Decide what to do with one task
pub fn decide(facts: TaskFacts, options: DecisionOptions) -> TaskDecision {
    if facts.manual_override {
        return TaskDecision::SkipManualOverride;
    }
    if options.force {
        return if facts.target_exists {
            TaskDecision::ForceRetranslate
        } else {
            TaskDecision::Translate
        };
    }
    if !facts.target_exists {
        return TaskDecision::Translate;
    }
    if !options.incremental {
        return TaskDecision::SkipExisting;
    }
    if facts.source_changed {
        TaskDecision::Retranslate
    } else {
        TaskDecision::SkipUnchanged
    }
}
