//! Resolution of referenced class names to their fully qualified form.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::model::LABEL;

lazy_static! {
    static ref NAME_TOKEN: Regex = Regex::new(&format!(r"\\?{label}(?:\\{label})*", label = LABEL))
        .expect("name token pattern is valid");
}

/// Type keywords that never refer to a class.
const BUILTIN_TYPES: &[&str] = &[
    "array", "bool", "callable", "false", "float", "int", "iterable", "mixed", "never", "null",
    "object", "parent", "self", "static", "string", "true", "void",
];

/// Tracks the current namespace and its class imports while a file is
/// lowered, and qualifies names the way PHP does.
#[derive(Debug, Clone, Default)]
pub struct NameResolver {
    /// Current namespace without leading backslash; empty for global code.
    namespace: String,
    /// Lowercased alias -> qualified name (without leading backslash).
    aliases: HashMap<String, String>,
}

impl NameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Start a new namespace block. Imports do not carry over.
    pub fn enter_namespace(&mut self, name: Option<&str>) {
        self.namespace = name.unwrap_or("").trim_matches('\\').to_string();
        self.aliases.clear();
    }

    /// Register `use Name [as Alias];`.
    pub fn add_import(&mut self, name: &str, alias: Option<&str>) {
        let name = name.trim_start_matches('\\').to_string();
        let alias = match alias {
            Some(alias) => alias.to_string(),
            None => name.rsplit('\\').next().unwrap_or(&name).to_string(),
        };
        self.aliases.insert(alias.to_lowercase(), name);
    }

    /// Qualify a class reference: `Foo`, `Sub\Foo`, `\Foo`, `namespace\Foo`.
    pub fn resolve_class(&self, name: &str) -> String {
        if let Some(absolute) = name.strip_prefix('\\') {
            return format!("\\{}", absolute);
        }

        let lower = name.to_lowercase();
        if BUILTIN_TYPES.contains(&lower.as_str()) {
            return name.to_string();
        }
        if let Some(rest) = lower.strip_prefix("namespace\\") {
            let rest = &name[name.len() - rest.len()..];
            return self.qualify(rest);
        }

        let (head, tail) = match name.split_once('\\') {
            Some((head, tail)) => (head, Some(tail)),
            None => (name, None),
        };
        match self.aliases.get(&head.to_lowercase()) {
            Some(target) => match tail {
                Some(tail) => format!("\\{}\\{}", target, tail),
                None => format!("\\{}", target),
            },
            None => self.qualify(name),
        }
    }

    /// Qualify every class reference inside a type declaration such as
    /// `?Foo`, `Foo|Bar\Baz|null` or `(A&B)|null`, leaving keywords alone.
    pub fn resolve_type(&self, hint: &str) -> String {
        NAME_TOKEN
            .replace_all(hint, |caps: &Captures| self.resolve_class(&caps[0]))
            .into_owned()
    }

    fn qualify(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            format!("\\{}", name)
        } else {
            format!("\\{}\\{}", self.namespace, name)
        }
    }
}
