//! Runner state and run reports

use crate::plan::RunDirection;
use chrono::{DateTime, Utc};
use mg_core::{MaintenanceStage, TagGroup};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Where the runner is in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerState {
    Idle,
    Loading,
    Filtering,
    Ordering,
    /// Opening the migration's transaction scope
    Beginning,
    Applying,
    Committing,
    RollingBack,
    /// The batch halted on an error
    Faulted,
}

impl fmt::Display for RunnerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunnerState::Idle => "idle",
            RunnerState::Loading => "loading",
            RunnerState::Filtering => "filtering",
            RunnerState::Ordering => "ordering",
            RunnerState::Beginning => "beginning",
            RunnerState::Applying => "applying",
            RunnerState::Committing => "committing",
            RunnerState::RollingBack => "rolling back",
            RunnerState::Faulted => "faulted",
        };
        f.write_str(s)
    }
}

/// How a batch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    /// Stopped at a migration boundary by a cancel request
    Cancelled,
}

/// One executed (or previewed) migration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    /// Position in the batch
    pub sequence: usize,
    pub version: i64,
    pub name: String,
    pub direction: RunDirection,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<MaintenanceStage>,

    /// Statements in execution order; guarded-out expressions contribute none
    pub statements: Vec<String>,

    /// Preview only: statements the dialect's grammar rejects, with the reason
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parse_warnings: Vec<String>,

    pub duration_ms: u64,
}

/// Outcome of one batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique identifier for this run
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub direction: RunDirection,
    pub status: RunStatus,

    /// Statements were generated but not executed
    pub preview: bool,

    pub applied: Vec<StepReport>,
    pub reverted: Vec<StepReport>,
    pub maintenance: Vec<StepReport>,

    /// Selected versions already in the requested state
    pub skipped: Vec<i64>,
}

impl RunReport {
    pub fn new(direction: RunDirection, preview: bool) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string()[..8].to_string(),
            started_at: Utc::now(),
            finished_at: None,
            direction,
            status: RunStatus::Completed,
            preview,
            applied: Vec::new(),
            reverted: Vec::new(),
            maintenance: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Add a finished step to the matching list
    pub fn push(&mut self, step: StepReport) {
        if step.stage.is_some() {
            self.maintenance.push(step);
        } else {
            match step.direction {
                RunDirection::Up => self.applied.push(step),
                RunDirection::Down => self.reverted.push(step),
            }
        }
    }

    pub fn finish(&mut self, status: RunStatus) {
        self.status = status;
        self.finished_at = Some(Utc::now());
    }

    /// Versions applied or reverted, in execution order
    pub fn versions(&self) -> Vec<i64> {
        let steps = match self.direction {
            RunDirection::Up => &self.applied,
            RunDirection::Down => &self.reverted,
        };
        steps.iter().map(|s| s.version).collect()
    }

    /// Every statement of the batch in execution order
    pub fn statements(&self) -> Vec<&str> {
        let mut steps: Vec<&StepReport> = self
            .applied
            .iter()
            .chain(&self.reverted)
            .chain(&self.maintenance)
            .collect();
        steps.sort_by_key(|s| s.sequence);
        steps
            .into_iter()
            .flat_map(|s| s.statements.iter().map(String::as_str))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A loaded migration and its history state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationInfo {
    pub version: i64,
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Own and inherited tag groups
    pub tags: Vec<TagGroup>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub traits: BTreeMap<String, String>,

    pub stage: MaintenanceStage,
    pub reversible: bool,

    /// Passes the configured tag selection
    pub selected: bool,

    pub applied: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_on: Option<String>,
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
