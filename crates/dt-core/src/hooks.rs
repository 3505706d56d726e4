//! Version-gated migration hooks.
//!
//! A migration class declares hooks whose method names contain the
//! [`VERSION_METHOD_MARKER`]. [`extract_version_methods`] resolves a class
//! through a [`MethodSource`] and returns its hooks sorted by target version;
//! [`run_version_methods`] then invokes every hook newer than the installed
//! module version, oldest first, and stops at the first failure.

use crate::error::{CoreError, CoreResult, HookSource};
use crate::version::{compare_versions, is_applied, version_from_method_name};
use serde::Serialize;
use std::collections::HashMap;

/// Substring that marks a method as a version hook.
pub const VERSION_METHOD_MARKER: &str = "__v";

/// One version-gated hook of a migration class.
///
/// The target version is always derived from the method name; there is no
/// way to set it independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionMethod {
    class_name: String,
    method: String,
    version: String,
}

impl VersionMethod {
    /// Build a record for `method`, or `None` if the name carries no marker.
    pub fn new(class_name: impl Into<String>, method: impl Into<String>) -> Option<Self> {
        let method = method.into();
        let version = version_from_method_name(&method)?;
        Some(Self {
            class_name: class_name.into(),
            method,
            version,
        })
    }

    /// Fully-qualified name of the owning migration class.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Hook method name.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Target version derived from the method name.
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// The hooks of one migration class, sorted ascending by target version.
///
/// Hooks with equal versions keep their declaration order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VersionMethods {
    class_name: String,
    methods: Vec<VersionMethod>,
}

impl VersionMethods {
    /// Select and sort the hooks among `names`, ignoring unmarked methods.
    pub fn from_method_names<I, S>(class_name: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut methods: Vec<VersionMethod> = names
            .into_iter()
            .filter_map(|name| VersionMethod::new(class_name, name))
            .collect();
        methods.sort_by(|a, b| compare_versions(&a.version, &b.version));
        Self {
            class_name: class_name.to_string(),
            methods,
        }
    }

    /// Class the hooks belong to.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// All hooks in ascending version order.
    pub fn methods(&self) -> &[VersionMethod] {
        &self.methods
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VersionMethod> {
        self.methods.iter()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Hooks that have not been applied at `installed`, in run order.
    pub fn pending<'a>(
        &'a self,
        installed: Option<&'a str>,
    ) -> impl Iterator<Item = &'a VersionMethod> + 'a {
        self.methods
            .iter()
            .filter(move |m| !is_applied(installed, &m.version))
    }
}

impl<'a> IntoIterator for &'a VersionMethods {
    type Item = &'a VersionMethod;
    type IntoIter = std::slice::Iter<'a, VersionMethod>;

    fn into_iter(self) -> Self::IntoIter {
        self.methods.iter()
    }
}

/// Something that can list the declared method names of a class.
pub trait MethodSource {
    /// Declared method names of `class_name`, or `None` if the class is
    /// unknown.
    fn declared_methods(&self, class_name: &str) -> Option<Vec<String>>;
}

/// Explicit class → method-name table.
#[derive(Debug, Clone, Default)]
pub struct MethodCatalog {
    classes: HashMap<String, Vec<String>>,
}

impl MethodCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the method list of a class.
    pub fn register<I, S>(&mut self, class_name: impl Into<String>, methods: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes.insert(
            class_name.into(),
            methods.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }
}

impl MethodSource for MethodCatalog {
    fn declared_methods(&self, class_name: &str) -> Option<Vec<String>> {
        self.classes.get(class_name).cloned()
    }
}

/// Resolve `class_name` and collect its version hooks.
pub fn extract_version_methods<S>(source: &S, class_name: &str) -> CoreResult<VersionMethods>
where
    S: MethodSource + ?Sized,
{
    let declared =
        source
            .declared_methods(class_name)
            .ok_or_else(|| CoreError::UnresolvedClass {
                class_name: class_name.to_string(),
            })?;
    let methods = VersionMethods::from_method_names(class_name, declared);
    log::debug!(
        "Found {} version hook(s) on {}",
        methods.len(),
        class_name
    );
    Ok(methods)
}

/// Hooks applied and skipped by one completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HookRunSummary {
    /// Hooks that were invoked, in invocation order.
    pub applied: Vec<VersionMethod>,
    /// Hooks already covered by the installed version.
    pub skipped: Vec<VersionMethod>,
}

impl HookRunSummary {
    /// Target version of the last applied hook, if any ran.
    pub fn last_applied_version(&self) -> Option<&str> {
        self.applied.last().map(VersionMethod::version)
    }
}

/// Invoke every hook in `methods` newer than `installed`, oldest first.
///
/// A hook is skipped when `installed >= target`. The first hook error stops
/// the run: later hooks are never invoked and the error is returned as
/// [`CoreError::HookFailed`]. Rolling back earlier hooks is the caller's job.
pub fn run_version_methods<F, E>(
    installed: Option<&str>,
    methods: &VersionMethods,
    mut invoke: F,
) -> CoreResult<HookRunSummary>
where
    F: FnMut(&VersionMethod) -> Result<(), E>,
    E: Into<HookSource>,
{
    let mut summary = HookRunSummary::default();

    for method in methods {
        if is_applied(installed, method.version()) {
            summary.skipped.push(method.clone());
            continue;
        }

        log::debug!(
            "Applying version hook {}::{} (target {})",
            method.class_name(),
            method.method(),
            method.version()
        );
        invoke(method).map_err(|e| CoreError::HookFailed {
            class_name: method.class_name().to_string(),
            method: method.method().to_string(),
            version: method.version().to_string(),
            source: e.into(),
        })?;
        summary.applied.push(method.clone());
    }

    Ok(summary)
}

#[cfg(test)]
#[path = "hooks_test.rs"]
mod tests;
