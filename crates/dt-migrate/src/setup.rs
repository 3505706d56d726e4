//! Module install and uninstall: runs a migration and its pending version
//! hooks in one transaction, then records the module version.

use crate::error::{MigrateError, MigrateResult};
use crate::migration::run_meta_migrations;
use crate::module_version::{MigrationKind, ModuleVersionStore};
use crate::registry::MigrationRegistry;
use crate::schema::Schema;
use dt_core::{
    compare_versions, extract_version_methods, method_name_for_version, run_version_methods,
    HookRunSummary, MethodCatalog, ModuleVersion, VersionMethods,
};
use dt_db::{with_transaction, DuckDbBackend};
use serde::Serialize;
use std::cmp::Ordering;

/// What is known about the module being installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleContext {
    pub module: String,
    /// Version recorded before this run; `None` on first install.
    pub installed_version: Option<String>,
    /// Version of the code being installed.
    pub target_version: String,
}

/// Handed to migrations and hooks while they run.
pub struct SetupContext<'a> {
    db: &'a DuckDbBackend,
    schema: Schema<'a>,
    module: ModuleContext,
}

impl<'a> SetupContext<'a> {
    fn new(db: &'a DuckDbBackend, table_prefix: Option<&str>, module: ModuleContext) -> Self {
        Self {
            db,
            schema: Schema::new(db, table_prefix),
            module,
        }
    }

    pub fn db(&self) -> &'a DuckDbBackend {
        self.db
    }

    pub fn schema(&self) -> &Schema<'a> {
        &self.schema
    }

    pub fn module(&self) -> &ModuleContext {
        &self.module
    }

    /// Prefixed table name.
    pub fn table_name(&self, name: &str) -> String {
        self.schema.table_name(name)
    }
}

/// Hook body: receives the migration itself and the running context.
pub type HookHandler<M> = fn(&mut M, &mut SetupContext<'_>) -> MigrateResult<()>;

/// One versioned hook of a migration, registered by method name.
///
/// The name encodes the target version (`__v1_4_0` targets `1.4.0`); names
/// without the marker are never run.
pub struct VersionHook<M> {
    method: String,
    handler: HookHandler<M>,
}

impl<M> VersionHook<M> {
    pub fn new(method: impl Into<String>, handler: HookHandler<M>) -> Self {
        Self {
            method: method.into(),
            handler,
        }
    }

    /// Hook targeting `version`, named `__v<version with dots as underscores>`.
    pub fn for_version(version: &str, handler: HookHandler<M>) -> Self {
        Self::new(method_name_for_version(version), handler)
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

impl<M> Clone for VersionHook<M> {
    fn clone(&self) -> Self {
        Self {
            method: self.method.clone(),
            handler: self.handler,
        }
    }
}

impl<M> std::fmt::Debug for VersionHook<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionHook")
            .field("method", &self.method)
            .finish()
    }
}

/// An install migration for one module.
pub trait Migration {
    /// Name hooks are reported under and the registry is keyed by.
    fn class_name(&self) -> &str;

    /// Module whose version this migration maintains.
    fn module_name(&self) -> &str;

    /// Version of the module code; recorded after a successful install.
    fn module_version(&self) -> &str;

    fn kind(&self) -> MigrationKind {
        MigrationKind::Schema
    }

    /// Runs on every install, before any version hook.
    fn execute(&mut self, setup: &mut SetupContext<'_>) -> MigrateResult<()>;

    fn version_hooks(&self) -> Vec<VersionHook<Self>>
    where
        Self: Sized,
    {
        Vec::new()
    }
}

/// Removes what a module installed.
pub trait UninstallMigration {
    fn class_name(&self) -> &str;

    fn module_name(&self) -> &str;

    fn execute(&mut self, setup: &mut SetupContext<'_>) -> MigrateResult<()>;
}

/// Outcome of one install.
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub class_name: String,
    pub module: String,
    pub kind: MigrationKind,
    pub previous_version: Option<String>,
    pub version: String,
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
}

impl InstallReport {
    fn new(
        class_name: &str,
        module: &ModuleContext,
        kind: MigrationKind,
        summary: &HookRunSummary,
    ) -> Self {
        Self {
            class_name: class_name.to_string(),
            module: module.module.clone(),
            kind,
            previous_version: module.installed_version.clone(),
            version: module.target_version.clone(),
            applied: summary.applied.iter().map(|m| m.method().to_string()).collect(),
            skipped: summary.skipped.iter().map(|m| m.method().to_string()).collect(),
        }
    }
}

/// Runs migrations against one database.
pub struct Installer<'a> {
    db: &'a DuckDbBackend,
    table_prefix: Option<String>,
}

impl<'a> Installer<'a> {
    /// Create the installer, bringing the metadata tables up to date.
    pub fn new(db: &'a DuckDbBackend) -> MigrateResult<Self> {
        db.with_conn(run_meta_migrations)?;
        Ok(Self {
            db,
            table_prefix: None,
        })
    }

    pub fn with_table_prefix(mut self, prefix: Option<String>) -> Self {
        self.table_prefix = prefix.filter(|p| !p.is_empty());
        self
    }

    pub fn versions(&self) -> ModuleVersionStore<'a> {
        ModuleVersionStore::new(self.db)
    }

    /// Context for `module` as it would be seen by an install of `target`.
    pub fn module_context(
        &self,
        module: &str,
        kind: MigrationKind,
        target: &str,
    ) -> MigrateResult<ModuleContext> {
        Ok(ModuleContext {
            module: module.to_string(),
            installed_version: self.versions().installed_version(module, kind)?,
            target_version: target.to_string(),
        })
    }

    /// Hooks of `migration` that an install would run, in run order.
    pub fn plan<M: Migration>(&self, migration: &M) -> MigrateResult<VersionMethods> {
        let methods = declared_hooks(migration, &migration.version_hooks())?;
        let installed = self
            .versions()
            .installed_version(migration.module_name(), migration.kind())?;
        let pending: Vec<String> = methods
            .pending(installed.as_deref())
            .map(|m| m.method().to_string())
            .collect();
        Ok(VersionMethods::from_method_names(
            migration.class_name(),
            pending,
        ))
    }

    /// Install `migration`: `execute`, then every hook newer than the
    /// installed version, then record the new version. Any failure rolls the
    /// whole install back.
    pub fn install<M: Migration>(&self, migration: &mut M) -> MigrateResult<InstallReport> {
        let hooks = migration.version_hooks();
        let methods = declared_hooks(migration, &hooks)?;
        self.install_with(migration, &hooks, &methods)
    }

    /// Install the registered migration `class_name`, resolving its hooks
    /// through `registry`.
    pub fn install_registered(
        &self,
        registry: &mut MigrationRegistry,
        class_name: &str,
    ) -> MigrateResult<InstallReport> {
        let methods = extract_version_methods(&*registry, class_name)?;
        registry.install_one(self, class_name, &methods)
    }

    /// Install every registered migration in registration order, stopping at
    /// the first failure.
    pub fn install_all(&self, registry: &mut MigrationRegistry) -> MigrateResult<Vec<InstallReport>> {
        let mut reports = Vec::new();
        for class_name in registry.class_names() {
            reports.push(self.install_registered(registry, &class_name)?);
        }
        Ok(reports)
    }

    pub(crate) fn install_with<M: Migration>(
        &self,
        migration: &mut M,
        hooks: &[VersionHook<M>],
        methods: &VersionMethods,
    ) -> MigrateResult<InstallReport> {
        let class_name = migration.class_name().to_string();
        let kind = migration.kind();
        let module = self.module_context(
            migration.module_name(),
            kind,
            migration.module_version(),
        )?;
        let target = ModuleVersion::parse(&module.target_version);

        if let Some(installed) = module.installed_version.as_deref() {
            if compare_versions(installed, &module.target_version) == Ordering::Greater {
                return Err(MigrateError::VersionDowngrade {
                    module: module.module.clone(),
                    installed: installed.to_string(),
                    code: module.target_version.clone(),
                });
            }
        }
        for method in methods {
            if ModuleVersion::parse(method.version()) > target {
                log::warn!(
                    "{class_name}::{} targets {} which is newer than module version {}; it will run on every install",
                    method.method(),
                    method.version(),
                    module.target_version
                );
            }
        }

        log::info!(
            "Installing {} ({kind}) {} -> {}",
            module.module,
            module.installed_version.as_deref().unwrap_or("none"),
            module.target_version
        );

        let summary = with_transaction(self.db, || -> MigrateResult<HookRunSummary> {
            let mut setup =
                SetupContext::new(self.db, self.table_prefix.as_deref(), module.clone());
            migration.execute(&mut setup)?;

            let summary = run_version_methods(
                module.installed_version.as_deref(),
                methods,
                |method| -> MigrateResult<()> {
                    let hook = hooks
                        .iter()
                        .find(|h| h.method() == method.method())
                        .ok_or_else(|| {
                            MigrateError::InvalidDefinition(format!(
                                "{class_name} has no handler for {}",
                                method.method()
                            ))
                        })?;
                    (hook.handler)(migration, &mut setup)
                },
            )?;

            self.versions()
                .set_version(&module.module, kind, &module.target_version)?;
            Ok(summary)
        })?;

        log::info!(
            "Installed {} {}: {} hook(s) applied, {} skipped",
            module.module,
            module.target_version,
            summary.applied.len(),
            summary.skipped.len()
        );
        Ok(InstallReport::new(&class_name, &module, kind, &summary))
    }

    /// Run `migration` and forget the module's recorded versions.
    pub fn uninstall<U: UninstallMigration>(&self, migration: &mut U) -> MigrateResult<()> {
        let module = self.module_context(migration.module_name(), MigrationKind::Schema, "")?;
        log::info!("Uninstalling {}", module.module);

        with_transaction(self.db, || -> MigrateResult<()> {
            let mut setup =
                SetupContext::new(self.db, self.table_prefix.as_deref(), module.clone());
            migration.execute(&mut setup)?;
            self.versions().remove(&module.module)?;
            Ok(())
        })
    }
}

/// Version hooks of `migration`, resolved through the extractor so the
/// naming convention decides which entries run and in what order.
fn declared_hooks<M: Migration>(
    migration: &M,
    hooks: &[VersionHook<M>],
) -> MigrateResult<VersionMethods> {
    check_hooks(migration.class_name(), hooks)?;
    let mut catalog = MethodCatalog::new();
    catalog.register(migration.class_name(), hooks.iter().map(|h| h.method()));
    Ok(extract_version_methods(&catalog, migration.class_name())?)
}

/// Reject duplicate hook names; each name must map to exactly one handler.
pub(crate) fn check_hooks<M>(class_name: &str, hooks: &[VersionHook<M>]) -> MigrateResult<()> {
    let mut seen = std::collections::HashSet::new();
    for hook in hooks {
        if !seen.insert(hook.method()) {
            return Err(MigrateError::InvalidDefinition(format!(
                "{class_name} registers version hook '{}' more than once",
                hook.method()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "setup_test.rs"]
mod tests;
