//! Migration discovery and the loaded catalog
//!
//! Definitions come from a [`MigrationSource`]. Loading checks versions for
//! uniqueness and flattens each definition's tag groups with those of its
//! base chain, so selection never walks ancestry again.

use crate::error::{MigrationError, MigrationResult};
use mg_core::{is_selected, MaintenanceStage, MigrationBase, MigrationDefinition, TagGroup};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Where migration definitions come from
pub trait MigrationSource: Send + Sync {
    /// Named tag carriers definitions may derive from
    fn bases(&self) -> Vec<MigrationBase>;

    fn definitions(&self) -> Vec<MigrationDefinition>;
}

/// Definitions and bases registered in code
#[derive(Debug, Clone, Default)]
pub struct MigrationRegistry {
    bases: Vec<MigrationBase>,
    definitions: Vec<MigrationDefinition>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(mut self, base: MigrationBase) -> Self {
        self.bases.push(base);
        self
    }

    pub fn with(mut self, definition: MigrationDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    pub fn register(&mut self, definition: MigrationDefinition) {
        self.definitions.push(definition);
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl MigrationSource for MigrationRegistry {
    fn bases(&self) -> Vec<MigrationBase> {
        self.bases.clone()
    }

    fn definitions(&self) -> Vec<MigrationDefinition> {
        self.definitions.clone()
    }
}

/// A definition with its flattened tag groups
#[derive(Debug, Clone)]
pub struct LoadedMigration {
    pub definition: MigrationDefinition,

    /// Own groups first, then the base chain nearest first
    pub tags: Vec<TagGroup>,
}

impl LoadedMigration {
    pub fn version(&self) -> i64 {
        self.definition.version
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn stage(&self) -> MaintenanceStage {
        self.definition.maintenance_stage
    }

    pub fn is_maintenance(&self) -> bool {
        self.definition.is_maintenance()
    }

    pub fn is_selected<S: AsRef<str>>(&self, requested: &[S]) -> bool {
        is_selected(&self.tags, requested)
    }
}

/// Every loaded migration keyed by version
#[derive(Debug, Clone, Default)]
pub struct MigrationCatalog {
    migrations: BTreeMap<i64, LoadedMigration>,
}

impl MigrationCatalog {
    /// Load and check all definitions of a source
    pub fn load(source: &dyn MigrationSource) -> MigrationResult<Self> {
        let bases: HashMap<String, MigrationBase> = source
            .bases()
            .into_iter()
            .map(|b| (b.name.clone(), b))
            .collect();

        let mut migrations: BTreeMap<i64, LoadedMigration> = BTreeMap::new();
        for definition in source.definitions() {
            let version = definition.version;
            if let Some(existing) = migrations.get(&version) {
                return Err(MigrationError::VersionConflict {
                    version,
                    first: existing.name().to_string(),
                    second: definition.name.clone(),
                });
            }
            let tags = flatten_tags(&definition, &bases)?;
            migrations.insert(version, LoadedMigration { definition, tags });
        }

        log::debug!("Loaded {} migration(s)", migrations.len());
        Ok(Self { migrations })
    }

    pub fn get(&self, version: i64) -> Option<&LoadedMigration> {
        self.migrations.get(&version)
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// All migrations in ascending version order
    pub fn iter(&self) -> impl Iterator<Item = &LoadedMigration> {
        self.migrations.values()
    }

    /// Regular migrations in ascending version order
    pub fn regular(&self) -> impl Iterator<Item = &LoadedMigration> {
        self.iter().filter(|m| !m.is_maintenance())
    }

    /// Maintenance migrations of one stage in ascending version order
    pub fn maintenance(&self, stage: MaintenanceStage) -> impl Iterator<Item = &LoadedMigration> {
        self.iter().filter(move |m| m.stage() == stage)
    }
}

fn flatten_tags(
    definition: &MigrationDefinition,
    bases: &HashMap<String, MigrationBase>,
) -> MigrationResult<Vec<TagGroup>> {
    let mut tags = definition.tags.clone();
    let mut seen = HashSet::new();
    let mut child = definition.name.as_str();
    let mut next = definition.base.as_deref();

    while let Some(name) = next {
        if !seen.insert(name) {
            return Err(MigrationError::CircularBase {
                base: name.to_string(),
            });
        }
        let base = bases.get(name).ok_or_else(|| MigrationError::UnknownBase {
            name: child.to_string(),
            base: name.to_string(),
        })?;
        tags.extend(base.tags.iter().cloned());
        child = base.name.as_str();
        next = base.parent.as_deref();
    }
    Ok(tags)
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
