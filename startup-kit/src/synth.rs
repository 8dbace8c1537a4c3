//! Build context for one stack's resource declarations.
//!
//! Assemblers own a [`Stack`] and composers register declarations into it.
//! The stack preserves insertion order so that synthesizing the same
//! configuration twice yields byte-identical templates, and rejects duplicate
//! logical ids up front rather than letting a later declaration silently
//! shadow an earlier one.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::errors::{Error, Result};

/// One declarative resource: a construct kind plus its property document.
/// Cross-resource references inside `properties` are logical-id strings,
/// resolved by the downstream deployment engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub kind: String,
    pub properties: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    name: String,
    description: Option<String>,
    resources: IndexMap<String, Declaration>,
    tags: IndexMap<String, String>,
}

impl Stack {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            resources: IndexMap::new(),
            tags: IndexMap::new(),
        }
    }

    pub fn with_description(name: &str, description: &str) -> Self {
        let mut stack = Self::new(name);
        stack.description = Some(description.to_string());
        stack
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_tag(&mut self, key: &str, value: &str) {
        self.tags.insert(key.to_string(), value.to_string());
    }

    /// Registers a declaration under `logical_id`. Ids must be non-empty and
    /// unique within the stack.
    pub fn add_resource(&mut self, logical_id: &str, kind: &str, properties: Value) -> Result<()> {
        if logical_id.is_empty() {
            return Err(Error::Composition(format!(
                "a `{}` declaration in stack `{}` has an empty logical id",
                kind, self.name
            )));
        }

        if self.resources.contains_key(logical_id) {
            return Err(Error::Composition(format!(
                "duplicate logical id `{}` in stack `{}`",
                logical_id, self.name
            )));
        }

        self.resources.insert(
            logical_id.to_string(),
            Declaration {
                kind: kind.to_string(),
                properties,
            },
        );

        Ok(())
    }

    pub fn get(&self, logical_id: &str) -> Option<&Declaration> {
        self.resources.get(logical_id)
    }

    pub fn logical_ids(&self) -> impl Iterator<Item = &String> {
        self.resources.keys()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Renders the accumulated declarations as a template document in
    /// insertion order.
    pub fn template(&self) -> Value {
        let mut root = Map::new();

        if let Some(description) = &self.description {
            root.insert(
                "Description".to_string(),
                Value::String(description.clone()),
            );
        }

        let mut resources = Map::new();
        for (logical_id, declaration) in &self.resources {
            let mut entry = Map::new();
            entry.insert(
                "Type".to_string(),
                Value::String(declaration.kind.clone()),
            );
            entry.insert("Properties".to_string(), declaration.properties.clone());
            resources.insert(logical_id.clone(), Value::Object(entry));
        }
        root.insert("Resources".to_string(), Value::Object(resources));

        if !self.tags.is_empty() {
            let mut tags = Map::new();
            for (key, value) in &self.tags {
                tags.insert(key.clone(), Value::String(value.clone()));
            }
            root.insert("Tags".to_string(), Value::Object(tags));
        }

        Value::Object(root)
    }

    pub fn template_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.template())?)
    }
}

#[cfg(test)]
#[path = "synth_tests.rs"]
mod synth_tests;
