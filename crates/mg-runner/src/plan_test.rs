use super::*;
use crate::loader::MigrationRegistry;
use mg_core::{MigrationDefinition, TagGroup};

const NO_TAGS: [&str; 0] = [];

fn noop(version: i64, name: &str) -> MigrationDefinition {
    MigrationDefinition::new(version, name, |_| {})
}

fn catalog(registry: MigrationRegistry) -> MigrationCatalog {
    MigrationCatalog::load(&registry).unwrap()
}

fn names(plan: &MigrationPlan<'_>) -> Vec<String> {
    plan.steps
        .iter()
        .map(|s| s.migration.name().to_string())
        .collect()
}

fn applied(versions: &[i64]) -> BTreeSet<i64> {
    versions.iter().copied().collect()
}

fn three() -> MigrationCatalog {
    catalog(
        MigrationRegistry::new()
            .with(noop(1, "One"))
            .with(noop(2, "Two"))
            .with(noop(3, "Three")),
    )
}

#[test]
fn test_up_skips_applied_and_respects_target() {
    let catalog = three();
    let plan = MigrationPlan::build(
        &catalog,
        RunRequest::Up { target: Some(2) },
        &NO_TAGS,
        &applied(&[1]),
    )
    .unwrap();
    assert_eq!(plan.direction, RunDirection::Up);
    assert_eq!(plan.versions(), vec![2]);
    assert_eq!(plan.skipped, vec![1]);
}

#[test]
fn test_up_to_latest_fills_gaps_in_order() {
    let catalog = three();
    let plan = MigrationPlan::build(
        &catalog,
        RunRequest::Up { target: None },
        &NO_TAGS,
        &applied(&[2]),
    )
    .unwrap();
    assert_eq!(plan.versions(), vec![1, 3]);
}

#[test]
fn test_down_reverts_descending_above_target() {
    let catalog = three();
    let plan = MigrationPlan::build(
        &catalog,
        RunRequest::Down { target: 1 },
        &NO_TAGS,
        &applied(&[1, 2, 3]),
    )
    .unwrap();
    assert_eq!(plan.direction, RunDirection::Down);
    assert_eq!(plan.versions(), vec![3, 2]);
    assert!(plan.skipped.is_empty());
}

#[test]
fn test_down_reports_unapplied_as_skipped() {
    let catalog = three();
    let plan = MigrationPlan::build(
        &catalog,
        RunRequest::Down { target: 0 },
        &NO_TAGS,
        &applied(&[1]),
    )
    .unwrap();
    assert_eq!(plan.versions(), vec![1]);
    assert_eq!(plan.skipped, vec![3, 2]);
}

#[test]
fn test_rollback_takes_latest_applied() {
    let catalog = three();
    let plan = MigrationPlan::build(
        &catalog,
        RunRequest::Rollback { steps: 2 },
        &NO_TAGS,
        &applied(&[1, 2, 3]),
    )
    .unwrap();
    assert_eq!(plan.versions(), vec![3, 2]);

    let plan = MigrationPlan::build(
        &catalog,
        RunRequest::Rollback { steps: 0 },
        &NO_TAGS,
        &applied(&[1, 2, 3]),
    )
    .unwrap();
    assert!(plan.is_empty());
}

#[test]
fn test_applied_version_without_migration_fails() {
    let catalog = three();
    let result = MigrationPlan::build(
        &catalog,
        RunRequest::Rollback { steps: 1 },
        &NO_TAGS,
        &applied(&[1, 2, 3, 7]),
    );
    assert!(matches!(
        result,
        Err(MigrationError::MissingMigration { version: 7 })
    ));
}

#[test]
fn test_tag_filter_applies_to_selection() {
    let catalog = catalog(
        MigrationRegistry::new()
            .with(noop(1, "Untagged"))
            .with(noop(2, "Uk").with_tags(TagGroup::require_all(["UK"])))
            .with(noop(3, "Ie").with_tags(TagGroup::require_all(["IE"]))),
    );
    let plan = MigrationPlan::build(
        &catalog,
        RunRequest::Up { target: None },
        &["UK"],
        &BTreeSet::new(),
    )
    .unwrap();
    assert_eq!(plan.versions(), vec![1, 2]);

    let plan = MigrationPlan::build(
        &catalog,
        RunRequest::Up { target: None },
        &NO_TAGS,
        &BTreeSet::new(),
    )
    .unwrap();
    assert_eq!(plan.versions(), vec![1]);
}

#[test]
fn test_rollback_leaves_tag_excluded_versions() {
    let catalog = catalog(
        MigrationRegistry::new()
            .with(noop(1, "Untagged"))
            .with(noop(2, "Uk").with_tags(TagGroup::require_all(["UK"]))),
    );
    let plan = MigrationPlan::build(
        &catalog,
        RunRequest::Rollback { steps: 1 },
        &NO_TAGS,
        &applied(&[1, 2]),
    )
    .unwrap();
    assert_eq!(plan.versions(), vec![1]);
}

fn with_maintenance() -> MigrationCatalog {
    catalog(
        MigrationRegistry::new()
            .with(noop(1, "One"))
            .with(noop(2, "Two"))
            .with(noop(900, "AfterAll").maintenance(MaintenanceStage::AfterAll))
            .with(noop(800, "AfterEach").maintenance(MaintenanceStage::AfterEach))
            .with(noop(700, "BeforeEach").maintenance(MaintenanceStage::BeforeEach))
            .with(noop(600, "BeforeAllB").maintenance(MaintenanceStage::BeforeAll))
            .with(noop(500, "BeforeAllA").maintenance(MaintenanceStage::BeforeAll)),
    )
}

#[test]
fn test_maintenance_interleaving_up() {
    let catalog = with_maintenance();
    let plan = MigrationPlan::build(
        &catalog,
        RunRequest::Up { target: None },
        &NO_TAGS,
        &BTreeSet::new(),
    )
    .unwrap();
    assert_eq!(
        names(&plan),
        vec![
            "BeforeAllA",
            "BeforeAllB",
            "BeforeEach",
            "One",
            "AfterEach",
            "BeforeEach",
            "Two",
            "AfterEach",
            "AfterAll",
        ]
    );
    assert_eq!(plan.versions(), vec![1, 2]);
}

#[test]
fn test_maintenance_interleaving_down_reverses_stage_order() {
    let catalog = with_maintenance();
    let plan = MigrationPlan::build(
        &catalog,
        RunRequest::Down { target: 1 },
        &NO_TAGS,
        &applied(&[1, 2]),
    )
    .unwrap();
    assert_eq!(
        names(&plan),
        vec!["BeforeAllB", "BeforeAllA", "BeforeEach", "Two", "AfterEach", "AfterAll"]
    );
    let maintenance = plan.steps[0];
    assert!(maintenance.is_maintenance());
    assert_eq!(maintenance.direction(plan.direction), RunDirection::Up);
    assert_eq!(plan.steps[3].direction(plan.direction), RunDirection::Down);
}

#[test]
fn test_no_pending_runs_nothing() {
    let catalog = with_maintenance();
    let plan = MigrationPlan::build(
        &catalog,
        RunRequest::Up { target: None },
        &NO_TAGS,
        &applied(&[1, 2]),
    )
    .unwrap();
    assert!(plan.is_empty());
    assert_eq!(plan.skipped, vec![1, 2]);
}

#[test]
fn test_tagged_maintenance_runs_in_untagged_batch() {
    let catalog = catalog(
        MigrationRegistry::new()
            .with(noop(1, "One"))
            .with(
                noop(500, "UkOnly")
                    .maintenance(MaintenanceStage::BeforeAll)
                    .with_tags(TagGroup::require_all(["UK"])),
            ),
    );
    let plan = MigrationPlan::build(
        &catalog,
        RunRequest::Up { target: None },
        &NO_TAGS,
        &BTreeSet::new(),
    )
    .unwrap();
    assert_eq!(names(&plan), vec!["UkOnly", "One"]);
    assert_eq!(plan.versions(), vec![1]);
}

#[test]
fn test_maintenance_ignores_requested_tags() {
    let catalog = catalog(
        MigrationRegistry::new()
            .with(noop(1, "Uk").with_tags(TagGroup::require_all(["UK"])))
            .with(
                noop(800, "IeOnly")
                    .maintenance(MaintenanceStage::AfterEach)
                    .with_tags(TagGroup::require_all(["IE"])),
            ),
    );
    let plan = MigrationPlan::build(
        &catalog,
        RunRequest::Up { target: None },
        &["UK"],
        &BTreeSet::new(),
    )
    .unwrap();
    assert_eq!(names(&plan), vec!["Uk", "IeOnly"]);
}
