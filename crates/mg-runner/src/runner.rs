//! Versioned migration runner
//!
//! A batch moves through `Loading`, `Filtering` and `Ordering`, validates
//! every step it is about to run, then executes the steps one at a time.
//! Each migration gets its own transaction scope; the first failure rolls
//! that migration back and halts the batch, leaving earlier migrations
//! committed and recorded.

use crate::error::{MigrationError, MigrationResult};
use crate::history::SchemaHistory;
use crate::loader::{LoadedMigration, MigrationCatalog, MigrationSource};
use crate::plan::{MigrationPlan, PlanStep, RunDirection, RunRequest};
use crate::state::{MigrationInfo, RunReport, RunStatus, RunnerState, StepReport};
use crate::transaction::TransactionScope;
use mg_core::expression::AutoScriptExpression;
use mg_core::{
    auto_name_candidates, Config, ConventionSet, DirectoryScripts, Expression, Guard,
    HistoryConfig, InMemoryScripts, MaintenanceStage, ScriptProvider, TransactionBehavior,
};
use mg_db::{Database, DbResult, DuckDbBackend};
use mg_sql::{split_statements, DialectRegistry, SqlDialect, SqlError};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Settings for one runner
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Dialect identity or alias
    pub dialect: String,
    pub default_schema: Option<String>,
    pub tags: Vec<String>,
    pub history: HistoryConfig,
    pub preview: bool,
}

impl RunnerOptions {
    pub fn from_config(config: &Config) -> MigrationResult<Self> {
        config.validate()?;
        Ok(Self {
            dialect: config.dialect.clone(),
            default_schema: config.default_schema.clone(),
            tags: config.tags.clone(),
            history: config.history.clone(),
            preview: config.preview,
        })
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for RunnerOptions {
    fn default() -> Self {
        let config = Config::default();
        Self {
            dialect: config.dialect,
            default_schema: config.default_schema,
            tags: config.tags,
            history: config.history,
            preview: config.preview,
        }
    }
}

/// Requests a running batch to stop before its next migration
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A step with its resolved, validated expressions
struct PreparedStep<'a> {
    step: PlanStep<'a>,
    direction: RunDirection,
    expressions: Vec<Expression>,
}

impl PreparedStep<'_> {
    fn migration(&self) -> &LoadedMigration {
        self.step.migration
    }

    fn stage(&self) -> Option<MaintenanceStage> {
        self.step.is_maintenance().then(|| self.migration().stage())
    }
}

pub struct MigrationRunner {
    db: Arc<dyn Database>,
    source: Arc<dyn MigrationSource>,
    dialect: Arc<dyn SqlDialect>,
    conventions: ConventionSet,
    scripts: Arc<dyn ScriptProvider>,
    history: SchemaHistory,
    tags: Vec<String>,
    preview: bool,
    state: RunnerState,
    cancel: CancelHandle,
}

impl MigrationRunner {
    /// Create a runner; fails when the dialect is unknown
    pub fn new(
        db: Arc<dyn Database>,
        source: Arc<dyn MigrationSource>,
        options: RunnerOptions,
    ) -> MigrationResult<Self> {
        let dialect = DialectRegistry::with_defaults().get(&options.dialect)?;
        let aliases = dialect.aliases().iter().map(|a| a.to_string()).collect();
        let conventions = ConventionSet::new(
            options.default_schema.clone(),
            Some(dialect.name().to_string()),
            aliases,
        );
        let history = SchemaHistory::new(&options.history, Arc::clone(&dialect));
        log::debug!(
            "Runner targeting {} ({}) with history table {}",
            dialect.name(),
            db.db_type(),
            options.history.table
        );

        Ok(Self {
            db,
            source,
            dialect,
            conventions,
            scripts: Arc::new(InMemoryScripts::new()),
            history,
            tags: options.tags,
            preview: options.preview,
            state: RunnerState::Idle,
            cancel: CancelHandle::new(),
        })
    }

    /// Runner for a loaded configuration
    ///
    /// Opens the configured DuckDB database (relative paths resolve against
    /// `root`) and reads auto-script migrations from `scripts_path` when set.
    pub fn from_config(
        config: &Config,
        root: &Path,
        source: Arc<dyn MigrationSource>,
    ) -> MigrationResult<Self> {
        let options = RunnerOptions::from_config(config)?;
        let db = match config.database.path.as_str() {
            ":memory:" => DuckDbBackend::in_memory()?,
            path => DuckDbBackend::from_path(&root.join(path))?,
        };
        let runner = Self::new(Arc::new(db), source, options)?;
        Ok(match config.scripts_path_absolute(root) {
            Some(scripts) => {
                log::debug!("Reading migration scripts from {}", scripts.display());
                runner.with_scripts(Arc::new(DirectoryScripts::new(scripts)))
            }
            None => runner,
        })
    }

    /// Use a different script provider for auto-script migrations
    pub fn with_scripts(mut self, scripts: Arc<dyn ScriptProvider>) -> Self {
        self.scripts = scripts;
        self
    }

    /// Share an existing cancel handle with this runner
    pub fn with_cancel_handle(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    /// Replace the default conventions
    pub fn with_conventions(mut self, conventions: ConventionSet) -> Self {
        self.conventions = conventions;
        self
    }

    pub fn dialect(&self) -> &dyn SqlDialect {
        self.dialect.as_ref()
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn history(&self) -> &SchemaHistory {
        &self.history
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn set_preview(&mut self, preview: bool) {
        self.preview = preview;
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    /// Apply pending migrations up to `target`, or all of them
    pub async fn migrate_up(&mut self, target: Option<i64>) -> MigrationResult<RunReport> {
        self.run(RunRequest::Up { target }).await
    }

    /// Revert applied migrations with a version above `target`
    pub async fn migrate_down(&mut self, target: i64) -> MigrationResult<RunReport> {
        self.run(RunRequest::Down { target }).await
    }

    /// Revert the last `steps` applied migrations
    pub async fn rollback(&mut self, steps: usize) -> MigrationResult<RunReport> {
        self.run(RunRequest::Rollback { steps }).await
    }

    /// Every loaded migration with its selection and history state
    pub async fn list_migrations(&self) -> MigrationResult<Vec<MigrationInfo>> {
        let catalog = MigrationCatalog::load(self.source.as_ref())?;
        let records: HashMap<i64, Option<String>> = self
            .history
            .records(self.db.as_ref())
            .await?
            .into_iter()
            .map(|r| (r.version, r.applied_on))
            .collect();

        Ok(catalog
            .iter()
            .map(|m| {
                let definition = &m.definition;
                MigrationInfo {
                    version: m.version(),
                    name: m.name().to_string(),
                    description: definition.description.clone(),
                    tags: m.tags.clone(),
                    traits: definition.traits.clone(),
                    stage: m.stage(),
                    reversible: definition.is_reversible(),
                    selected: m.is_selected(self.tags.as_slice()),
                    applied: records.contains_key(&m.version()),
                    applied_on: records.get(&m.version()).cloned().flatten(),
                }
            })
            .collect())
    }

    fn transition(&mut self, state: RunnerState) {
        log::debug!("Runner state {} -> {}", self.state, state);
        self.state = state;
    }

    async fn run(&mut self, request: RunRequest) -> MigrationResult<RunReport> {
        match self.run_batch(request).await {
            Ok(report) => {
                self.transition(RunnerState::Idle);
                Ok(report)
            }
            Err(e) => {
                self.transition(RunnerState::Faulted);
                Err(e)
            }
        }
    }

    async fn run_batch(&mut self, request: RunRequest) -> MigrationResult<RunReport> {
        let direction = request.direction();
        let mut report = RunReport::new(direction, self.preview);
        log::debug!("Starting {} run {}", direction, report.run_id);

        self.transition(RunnerState::Loading);
        let catalog = MigrationCatalog::load(self.source.as_ref())?;

        self.transition(RunnerState::Filtering);
        if !self.preview {
            self.history.ensure(self.db.as_ref()).await?;
        }
        let applied = self.history.applied_versions(self.db.as_ref()).await?;

        self.transition(RunnerState::Ordering);
        let plan = MigrationPlan::build(&catalog, request, self.tags.as_slice(), &applied)?;
        report.skipped = plan.skipped.clone();

        let prepared = self.prepare(&plan)?;
        for (sequence, step) in prepared.iter().enumerate() {
            if self.cancel.is_cancelled() {
                log::info!(
                    "Run {} cancelled before migration {} '{}'",
                    report.run_id,
                    step.migration().version(),
                    step.migration().name()
                );
                self.cancel.reset();
                report.finish(RunStatus::Cancelled);
                return Ok(report);
            }
            let step_report = self.execute_step(step, sequence).await?;
            report.push(step_report);
        }

        report.finish(RunStatus::Completed);
        log::debug!(
            "Run {} finished: {} migration(s) {}",
            report.run_id,
            report.versions().len(),
            if direction == RunDirection::Up { "applied" } else { "reverted" }
        );
        Ok(report)
    }

    /// Produce, resolve and validate every step before anything executes
    fn prepare<'a>(&self, plan: &MigrationPlan<'a>) -> MigrationResult<Vec<PreparedStep<'a>>> {
        let mut prepared = Vec::with_capacity(plan.steps.len());
        let mut failures = Vec::new();

        for &step in &plan.steps {
            let migration = step.migration;
            let direction = step.direction(plan.direction);
            let produced = match direction {
                RunDirection::Up => migration.definition.up_expressions(),
                RunDirection::Down => migration.definition.down_expressions().ok_or_else(|| {
                    MigrationError::Irreversible {
                        version: migration.version(),
                        name: migration.name().to_string(),
                    }
                })?,
            };

            let expressions: Vec<Expression> = produced
                .into_iter()
                .map(|e| e.resolve(&self.conventions))
                .collect();
            for error in expressions.iter().flat_map(Expression::validate) {
                failures.push(format!(
                    "{} {}: {}",
                    migration.version(),
                    migration.name(),
                    error
                ));
            }

            prepared.push(PreparedStep {
                step,
                direction,
                expressions,
            });
        }

        if failures.is_empty() {
            Ok(prepared)
        } else {
            Err(MigrationError::Validation { failures })
        }
    }

    async fn execute_step(
        &mut self,
        prepared: &PreparedStep<'_>,
        sequence: usize,
    ) -> MigrationResult<StepReport> {
        let migration = prepared.migration();
        let started = Instant::now();
        let db = Arc::clone(&self.db);

        self.transition(RunnerState::Beginning);
        let behavior = if self.preview {
            TransactionBehavior::None
        } else {
            migration.definition.transaction_behavior
        };
        let scope = TransactionScope::begin(db.as_ref(), behavior)
            .await
            .map_err(|source| MigrationError::Transaction {
                version: migration.version(),
                name: migration.name().to_string(),
                source,
            })?;

        self.transition(RunnerState::Applying);
        let statements = match self.apply_expressions(migration, &prepared.expressions).await {
            Ok(statements) => statements,
            Err(e) => {
                self.transition(RunnerState::RollingBack);
                if let Err(rollback_err) = scope.rollback().await {
                    log::warn!(
                        "Rollback of migration {} failed: {}",
                        migration.version(),
                        rollback_err
                    );
                }
                return Err(e);
            }
        };

        self.transition(RunnerState::Committing);
        scope
            .commit()
            .await
            .map_err(|source| MigrationError::Transaction {
                version: migration.version(),
                name: migration.name().to_string(),
                source,
            })?;
        if !self.preview && !prepared.step.is_maintenance() {
            self.record(migration, prepared.direction).await?;
        }

        let parse_warnings = if self.preview {
            self.parse_warnings(migration, &statements)
        } else {
            Vec::new()
        };

        let verb = match (self.preview, prepared.direction) {
            (true, _) => "Previewed",
            (false, RunDirection::Up) => "Applied",
            (false, RunDirection::Down) => "Reverted",
        };
        log::info!(
            "{} migration {} '{}' ({} statement(s))",
            verb,
            migration.version(),
            migration.name(),
            statements.len()
        );

        Ok(StepReport {
            sequence,
            version: migration.version(),
            name: migration.name().to_string(),
            direction: prepared.direction,
            stage: prepared.stage(),
            statements,
            parse_warnings,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Statements the dialect's parser rejects; preview reports them instead of failing
    fn parse_warnings(&self, migration: &LoadedMigration, statements: &[String]) -> Vec<String> {
        statements
            .iter()
            .filter_map(|statement| {
                let err = self.dialect.parse(statement).err()?;
                log::warn!(
                    "Migration {}: previewed statement does not parse: {}",
                    migration.version(),
                    err
                );
                Some(format!("{}: {}", statement, err))
            })
            .collect()
    }

    /// Generate and (outside preview) execute every expression in order
    async fn apply_expressions(
        &self,
        migration: &LoadedMigration,
        expressions: &[Expression],
    ) -> MigrationResult<Vec<String>> {
        let mut executed = Vec::new();
        for expression in expressions {
            for statement in self.statements_for(migration, expression).await? {
                if !self.preview {
                    log::debug!("Executing: {}", statement);
                    self.db.execute(&statement).await.map_err(|source| {
                        MigrationError::Execution {
                            version: migration.version(),
                            name: migration.name().to_string(),
                            statement: statement.clone(),
                            source,
                        }
                    })?;
                }
                executed.push(statement);
            }
        }
        Ok(executed)
    }

    /// SQL for one expression; a failed guard yields no statements
    async fn statements_for(
        &self,
        migration: &LoadedMigration,
        expression: &Expression,
    ) -> MigrationResult<Vec<String>> {
        let mut current = expression;
        while let Expression::Guarded(guarded) = current {
            let passes = self.guard_passes(&guarded.guard).await.map_err(|source| {
                MigrationError::GuardCheck {
                    version: migration.version(),
                    name: migration.name().to_string(),
                    source,
                }
            })?;
            if !passes {
                log::warn!(
                    "Migration {}: skipping {}, guard {:?} not met",
                    migration.version(),
                    guarded.expression.describe(),
                    guarded.guard
                );
                return Ok(Vec::new());
            }
            current = guarded.expression.as_ref();
        }

        match current {
            Expression::AutoScript(script) => self.script_statements(migration, script),
            other => self
                .dialect
                .generate(other)
                .map_err(|e| generation_error(migration, e)),
        }
    }

    async fn guard_passes(&self, guard: &Guard) -> DbResult<bool> {
        let db = self.db.as_ref();
        let passes = match guard {
            Guard::Dialects(names) => names.iter().any(|n| self.targets_dialect(n)),
            Guard::TableExists {
                schema_name,
                table_name,
            } => db.table_exists(schema_name.as_deref(), table_name).await?,
            Guard::TableMissing {
                schema_name,
                table_name,
            } => !db.table_exists(schema_name.as_deref(), table_name).await?,
            Guard::ColumnExists {
                schema_name,
                table_name,
                column_name,
            } => {
                db.column_exists(schema_name.as_deref(), table_name, column_name)
                    .await?
            }
            Guard::ColumnMissing {
                schema_name,
                table_name,
                column_name,
            } => {
                !db.column_exists(schema_name.as_deref(), table_name, column_name)
                    .await?
            }
        };
        Ok(passes)
    }

    fn targets_dialect(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(self.dialect.name())
            || self
                .dialect
                .aliases()
                .iter()
                .any(|alias| name.eq_ignore_ascii_case(alias))
    }

    /// Locate the script for an auto-script step and split it into statements
    fn script_statements(
        &self,
        migration: &LoadedMigration,
        script: &AutoScriptExpression,
    ) -> MigrationResult<Vec<String>> {
        let candidates = match &script.auto_names {
            Some(names) if !names.is_empty() => names.clone(),
            _ => {
                let aliases: Vec<String> =
                    self.dialect.aliases().iter().map(|a| a.to_string()).collect();
                auto_name_candidates(
                    script.direction,
                    script.version,
                    &script.migration_name,
                    Some(self.dialect.name()),
                    &aliases,
                )
            }
        };

        let script_error = |message: String| MigrationError::Script {
            version: migration.version(),
            name: migration.name().to_string(),
            message,
        };

        let resource = self
            .scripts
            .find(&candidates)
            .map_err(|e| script_error(e.to_string()))?
            .ok_or_else(|| MigrationError::MissingScriptResource {
                version: migration.version(),
                name: migration.name().to_string(),
                candidates: candidates.clone(),
            })?;
        log::debug!(
            "Migration {} uses script {}",
            migration.version(),
            resource.name
        );

        split_statements(self.dialect.as_ref(), &resource.text)
            .map_err(|e| script_error(format!("{}: {}", resource.name, e)))
    }

    /// Insert or delete the history row after a committed regular migration
    async fn record(
        &self,
        migration: &LoadedMigration,
        direction: RunDirection,
    ) -> MigrationResult<()> {
        let statements = match direction {
            RunDirection::Up => self
                .history
                .record_statements(migration.version(), migration.definition.history_description())?,
            RunDirection::Down => self.history.remove_statements(migration.version())?,
        };
        for statement in statements {
            self.db
                .execute(&statement)
                .await
                .map_err(|source| MigrationError::HistoryWrite {
                    version: migration.version(),
                    name: migration.name().to_string(),
                    source,
                })?;
        }
        Ok(())
    }
}

fn generation_error(migration: &LoadedMigration, source: SqlError) -> MigrationError {
    let version = migration.version();
    let name = migration.name().to_string();
    match source {
        unsupported @ SqlError::UnsupportedOperation { .. } => MigrationError::UnsupportedOperation {
            version,
            name,
            source: unsupported,
        },
        other => MigrationError::Generation {
            version,
            name,
            source: other,
        },
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
