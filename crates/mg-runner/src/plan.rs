//! Selecting and ordering the steps of one run
//!
//! Regular migrations are ordered by version, ascending for forward runs and
//! descending for reverse runs. Maintenance migrations are interleaved by
//! stage: `BeforeAll` once before the first regular step, `BeforeEach` and
//! `AfterEach` around every regular step, `AfterAll` once after the last.
//! Maintenance migrations of one stage follow the batch direction as well.
//! Tags select regular migrations only; maintenance runs whenever the batch
//! has at least one regular step.

use crate::error::{MigrationError, MigrationResult};
use crate::loader::{LoadedMigration, MigrationCatalog};
use mg_core::MaintenanceStage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Direction of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunDirection {
    Up,
    Down,
}

impl fmt::Display for RunDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunDirection::Up => f.write_str("up"),
            RunDirection::Down => f.write_str("down"),
        }
    }
}

/// What a run should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunRequest {
    /// Apply pending migrations up to and including `target` (all when `None`)
    Up { target: Option<i64> },
    /// Revert applied migrations above `target`
    Down { target: i64 },
    /// Revert the last `steps` applied migrations
    Rollback { steps: usize },
}

impl RunRequest {
    pub fn direction(&self) -> RunDirection {
        match self {
            RunRequest::Up { .. } => RunDirection::Up,
            RunRequest::Down { .. } | RunRequest::Rollback { .. } => RunDirection::Down,
        }
    }
}

/// One migration to run
#[derive(Debug, Clone, Copy)]
pub struct PlanStep<'a> {
    pub migration: &'a LoadedMigration,
}

impl<'a> PlanStep<'a> {
    /// Maintenance steps always run their up producer and are never recorded
    pub fn is_maintenance(&self) -> bool {
        self.migration.is_maintenance()
    }

    /// The direction this step's expressions are produced for
    pub fn direction(&self, batch: RunDirection) -> RunDirection {
        if self.is_maintenance() {
            RunDirection::Up
        } else {
            batch
        }
    }
}

/// Ordered steps of one run
#[derive(Debug, Clone)]
pub struct MigrationPlan<'a> {
    pub direction: RunDirection,
    pub steps: Vec<PlanStep<'a>>,

    /// Selected versions whose history already matches the requested end state
    pub skipped: Vec<i64>,
}

impl<'a> MigrationPlan<'a> {
    /// Build the plan for a request against the applied versions
    pub fn build<S: AsRef<str>>(
        catalog: &'a MigrationCatalog,
        request: RunRequest,
        requested_tags: &[S],
        applied: &BTreeSet<i64>,
    ) -> MigrationResult<Self> {
        let direction = request.direction();
        let selected: Vec<&LoadedMigration> = catalog
            .regular()
            .filter(|m| m.is_selected(requested_tags))
            .collect();

        let (regular, skipped): (Vec<&LoadedMigration>, Vec<i64>) = match request {
            RunRequest::Up { target } => {
                let in_range: Vec<&LoadedMigration> = selected
                    .into_iter()
                    .filter(|m| target.map_or(true, |t| m.version() <= t))
                    .collect();
                let skipped = in_range
                    .iter()
                    .filter(|m| applied.contains(&m.version()))
                    .map(|m| m.version())
                    .collect();
                let pending = in_range
                    .into_iter()
                    .filter(|m| !applied.contains(&m.version()))
                    .collect();
                (pending, skipped)
            }
            RunRequest::Down { target } => {
                let reverting = applied.iter().rev().filter(|v| **v > target).copied();
                let regular = reverted_migrations(catalog, &selected, reverting)?;
                let skipped = selected
                    .iter()
                    .filter(|m| m.version() > target && !applied.contains(&m.version()))
                    .map(|m| m.version())
                    .rev()
                    .collect();
                (regular, skipped)
            }
            RunRequest::Rollback { steps } => {
                let selected_versions: BTreeSet<i64> =
                    selected.iter().map(|m| m.version()).collect();
                let reverting = applied
                    .iter()
                    .rev()
                    .filter(|v| selected_versions.contains(*v) || catalog.get(**v).is_none())
                    .take(steps)
                    .copied();
                (reverted_migrations(catalog, &selected, reverting)?, Vec::new())
            }
        };

        let steps = interleave(catalog, direction, &regular);
        log::debug!(
            "Planned {} {} step(s), {} already in the requested state",
            steps.len(),
            direction,
            skipped.len()
        );
        Ok(Self {
            direction,
            steps,
            skipped,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Versions of the regular steps in execution order
    pub fn versions(&self) -> Vec<i64> {
        self.steps
            .iter()
            .filter(|s| !s.is_maintenance())
            .map(|s| s.migration.version())
            .collect()
    }
}

/// Map applied versions (newest first) to selected migrations; applied
/// versions filtered out by tags are left alone
fn reverted_migrations<'a>(
    catalog: &'a MigrationCatalog,
    selected: &[&'a LoadedMigration],
    versions: impl Iterator<Item = i64>,
) -> MigrationResult<Vec<&'a LoadedMigration>> {
    let mut reverted = Vec::new();
    for version in versions {
        match selected.iter().find(|m| m.version() == version) {
            Some(migration) => reverted.push(*migration),
            None if catalog.get(version).is_none() => {
                return Err(MigrationError::MissingMigration { version })
            }
            None => {}
        }
    }
    Ok(reverted)
}

fn interleave<'a>(
    catalog: &'a MigrationCatalog,
    direction: RunDirection,
    regular: &[&'a LoadedMigration],
) -> Vec<PlanStep<'a>> {
    if regular.is_empty() {
        return Vec::new();
    }

    let stage_steps = |stage: MaintenanceStage| -> Vec<PlanStep<'a>> {
        let mut steps: Vec<PlanStep<'a>> = catalog
            .maintenance(stage)
            .map(|migration| PlanStep { migration })
            .collect();
        if direction == RunDirection::Down {
            steps.reverse();
        }
        steps
    };

    let before_each = stage_steps(MaintenanceStage::BeforeEach);
    let after_each = stage_steps(MaintenanceStage::AfterEach);

    let mut steps = stage_steps(MaintenanceStage::BeforeAll);
    for &migration in regular {
        steps.extend(before_each.iter().copied());
        steps.push(PlanStep { migration });
        steps.extend(after_each.iter().copied());
    }
    steps.extend(stage_steps(MaintenanceStage::AfterAll));
    steps
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
