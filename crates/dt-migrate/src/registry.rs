//! Caller-owned list of install migrations, keyed by class name.

use crate::error::{MigrateError, MigrateResult};
use crate::setup::{check_hooks, InstallReport, Installer, Migration};
use dt_core::{MethodSource, VersionMethods};

/// Object-safe view of a [`Migration`], so differently typed migrations can
/// share one registry.
pub(crate) trait RegisteredMigration {
    fn class_name(&self) -> &str;

    fn hook_methods(&self) -> Vec<String>;

    /// Install with `methods`, the hooks the extractor resolved for this
    /// class.
    fn install_with(
        &mut self,
        installer: &Installer<'_>,
        methods: &VersionMethods,
    ) -> MigrateResult<InstallReport>;
}

impl<M: Migration> RegisteredMigration for M {
    fn class_name(&self) -> &str {
        Migration::class_name(self)
    }

    fn hook_methods(&self) -> Vec<String> {
        self.version_hooks()
            .iter()
            .map(|h| h.method().to_string())
            .collect()
    }

    fn install_with(
        &mut self,
        installer: &Installer<'_>,
        methods: &VersionMethods,
    ) -> MigrateResult<InstallReport> {
        let hooks = self.version_hooks();
        check_hooks(Migration::class_name(self), &hooks)?;
        installer.install_with(self, &hooks, methods)
    }
}

/// Migrations known to the application, in registration order.
#[derive(Default)]
pub struct MigrationRegistry {
    migrations: Vec<Box<dyn RegisteredMigration>>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `migration`. Class names must be unique.
    pub fn register<M: Migration + 'static>(&mut self, migration: M) -> MigrateResult<&mut Self> {
        let class_name = Migration::class_name(&migration);
        if self.contains(class_name) {
            return Err(MigrateError::InvalidDefinition(format!(
                "migration '{class_name}' is already registered"
            )));
        }
        log::debug!("Registered migration {class_name}");
        self.migrations.push(Box::new(migration));
        Ok(self)
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.migrations.iter().any(|m| m.class_name() == class_name)
    }

    pub fn class_names(&self) -> Vec<String> {
        self.migrations
            .iter()
            .map(|m| m.class_name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    pub(crate) fn install_one(
        &mut self,
        installer: &Installer<'_>,
        class_name: &str,
        methods: &VersionMethods,
    ) -> MigrateResult<InstallReport> {
        let migration = self
            .migrations
            .iter_mut()
            .find(|m| m.class_name() == class_name)
            .ok_or_else(|| {
                MigrateError::Core(dt_core::CoreError::UnresolvedClass {
                    class_name: class_name.to_string(),
                })
            })?;
        migration.install_with(installer, methods)
    }
}

impl MethodSource for MigrationRegistry {
    fn declared_methods(&self, class_name: &str) -> Option<Vec<String>> {
        self.migrations
            .iter()
            .find(|m| m.class_name() == class_name)
            .map(|m| m.hook_methods())
    }
}

impl std::fmt::Debug for MigrationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationRegistry")
            .field("migrations", &self.class_names())
            .finish()
    }
}
