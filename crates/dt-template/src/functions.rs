//! Template functions and filters: helper(), dump(), trans and prettify.

use minijinja::value::{Rest, Value};
use minijinja::{Error, ErrorKind, State};
use std::collections::HashMap;
use std::sync::Arc;

/// Named values exposed to templates through `helper(name)`.
///
/// Helpers are injected by the caller when the engine is built; templates
/// cannot reach anything that was not registered here.
#[derive(Debug, Clone, Default)]
pub struct Helpers {
    values: HashMap<String, Value>,
}

impl Helpers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` under `name`, replacing any previous helper.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Register anything serializable under `name`.
    pub fn insert_serialize<T: serde::Serialize>(
        &mut self,
        name: impl Into<String>,
        value: &T,
    ) -> &mut Self {
        self.insert(name, Value::from_serialize(value))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Create the helper() function
///
/// Usage in templates:
/// ```jinja
/// {{ helper('store').name }}
/// ```
pub(crate) fn make_helper_fn(
    helpers: Arc<Helpers>,
) -> impl Fn(&str) -> Result<Value, Error> + Send + Sync + Clone + 'static {
    move |name: &str| {
        helpers.get(name).cloned().ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidOperation,
                format!(
                    "unknown helper '{name}'; registered helpers: [{}]",
                    helpers.names().join(", ")
                ),
            )
        })
    }
}

/// Create the dump() function
///
/// With arguments it dumps each one; without, the whole render context.
/// Renders nothing unless debug is enabled.
pub(crate) fn make_dump_fn(
    debug: bool,
) -> impl Fn(&State, Rest<Value>) -> String + Send + Sync + Clone + 'static {
    move |state: &State, args: Rest<Value>| {
        if !debug {
            return String::new();
        }
        if args.is_empty() {
            return format!("{state:#?}");
        }
        args.iter()
            .map(|value| format!("{value:#?}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// `trans` filter: replace `%1`, `%2`, ... with the positional arguments.
///
/// ```jinja
/// {{ 'Order %1 shipped to %2'|trans(order.id, order.city) }}
/// ```
///
/// Substitution is a single left-to-right pass: inserted arguments are not
/// scanned again. A digit run after `%` takes the longest prefix that names
/// an existing argument, so with two arguments `%12` reads as `%1` then `2`.
pub(crate) fn trans(text: &str, args: Rest<Value>) -> String {
    if args.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let digits = after.len() - after.trim_start_matches(|c: char| c.is_ascii_digit()).len();

        let placeholder = (1..=digits).rev().find_map(|len| {
            let index: usize = after[..len].parse().ok()?;
            let arg = args.get(index.checked_sub(1)?)?;
            Some((len, arg))
        });
        match placeholder {
            Some((len, arg)) => {
                out.push_str(&arg.to_string());
                rest = &after[len..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// `prettify` filter: turn an identifier into words.
///
/// `order_status-code` becomes `Order Status Code`, `firstName` becomes
/// `First Name`.
pub fn prettify(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut at_word_start = true;
    let mut prev: Option<char> = None;

    for ch in text.chars() {
        let is_delimiter = matches!(
            ch,
            '_' | '-' | ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c'
        );
        let mapped = if at_word_start && !is_delimiter {
            ch.to_ascii_uppercase()
        } else {
            ch
        };
        if let Some(p) = prev {
            if p.is_ascii_lowercase() && mapped.is_ascii_uppercase() {
                out.push(' ');
            }
        }
        out.push(match mapped {
            '_' | '-' => ' ',
            other => other,
        });
        at_word_start = is_delimiter;
        prev = Some(mapped);
    }
    out
}

#[cfg(test)]
#[path = "functions_test.rs"]
mod tests;
