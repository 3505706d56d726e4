//! File-based template engine configured from `template:` in devtools.yml

use crate::error::{TemplateError, TemplateResult};
use crate::functions::{make_dump_fn, make_helper_fn, prettify, trans, Helpers};
use dt_core::{RunMode, TemplateConfig};
use minijinja::{path_loader, Environment, UndefinedBehavior, Value};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The only output charset templates can be rendered in.
pub const SUPPORTED_CHARSET: &str = "UTF-8";

/// Template engine rooted at a directory
pub struct TemplateEngine {
    env: Environment<'static>,
    root: PathBuf,
    reload: bool,
}

impl TemplateEngine {
    /// Build an engine for `root` from `config`.
    ///
    /// `auto_reload` is ignored outside developer mode.
    pub fn new(
        config: &TemplateConfig,
        mode: RunMode,
        root: impl Into<PathBuf>,
        helpers: Helpers,
    ) -> TemplateResult<Self> {
        if !config.charset.eq_ignore_ascii_case(SUPPORTED_CHARSET)
            && !config.charset.eq_ignore_ascii_case("UTF8")
        {
            return Err(TemplateError::UnsupportedCharset(config.charset.clone()));
        }

        let root = root.into();
        let mut env = Environment::new();
        env.set_loader(path_loader(&root));
        env.set_debug(config.debug);
        env.set_undefined_behavior(if config.strict_variables {
            UndefinedBehavior::Strict
        } else {
            UndefinedBehavior::Chainable
        });

        env.add_function("helper", make_helper_fn(Arc::new(helpers)));
        env.add_function("dump", make_dump_fn(config.debug));
        env.add_filter("trans", trans);
        env.add_filter("prettify", prettify);

        let reload = config.effective_auto_reload(mode) || !config.cache;
        log::debug!(
            "Template engine rooted at {} (debug={}, strict={}, reload={})",
            root.display(),
            config.debug,
            config.strict_variables,
            reload
        );

        Ok(Self { env, root, reload })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether templates are re-read from disk on every render.
    pub fn reloads(&self) -> bool {
        self.reload
    }

    /// Template name for `file_name`: the root directory prefix is
    /// stripped, so absolute paths under the root work as well.
    pub fn template_name(&self, file_name: &str) -> String {
        let path = Path::new(file_name);
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .to_string_lossy()
            .trim_start_matches('/')
            .replace('\\', "/")
    }

    /// Render `file_name` with `context`; `block` is exposed as `block`.
    pub fn render<C: Serialize>(
        &mut self,
        file_name: &str,
        context: &C,
        block: Option<serde_json::Value>,
    ) -> TemplateResult<String> {
        if self.reload {
            self.env.clear_templates();
        }

        let name = self.template_name(file_name);
        let mut ctx = match serde_json::to_value(context) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(serde_json::Value::Null) => serde_json::Map::new(),
            Ok(other) => return Err(TemplateError::InvalidContext(json_kind(&other).to_string())),
            Err(e) => return Err(TemplateError::RenderError(e.to_string())),
        };
        if let Some(block) = block {
            ctx.insert("block".to_string(), block);
        }
        let root_ctx = Value::from_serialize(&ctx);

        let template = self.env.get_template(&name).map_err(|e| match e.kind() {
            minijinja::ErrorKind::TemplateNotFound => TemplateError::NotFound { name: name.clone() },
            _ => TemplateError::from(e),
        })?;
        template.render(root_ctx).map_err(|e| {
            log::debug!("{e:#?}");
            TemplateError::from(e)
        })
    }

    /// Render a template string with the same functions and filters.
    pub fn render_str<C: Serialize>(&self, source: &str, context: &C) -> TemplateResult<String> {
        Ok(self.env.render_str(source, Value::from_serialize(context))?)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
