//! Engine configuration.
//!
//! [`EngineOptions`] holds the typed engine-wide settings (camelCase on the wire). Layout options
//! stay schemaless: [`NamedOptions`] is an opaque JSON object handed to the solver, with a `name`
//! key selecting the algorithm.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedOptions(Value);

impl Default for NamedOptions {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl NamedOptions {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Options object with only `name` set.
    pub fn named(name: &str) -> Self {
        let mut out = Self::empty_object();
        out.set_value("name", Value::String(name.to_string()));
        out
    }

    /// Builder form of [`NamedOptions::set_value`].
    pub fn with(mut self, dotted_path: &str, value: impl Into<Value>) -> Self {
        self.set_value(dotted_path, value.into());
        self
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    fn lookup(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.lookup(dotted_path)?.as_str()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.lookup(dotted_path)?.as_f64()
    }

    pub fn get_u64(&self, dotted_path: &str) -> Option<u64> {
        self.lookup(dotted_path)?.as_u64()
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        // `from_value` accepts any JSON; anything that is not an object is replaced.
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EngineOptions {
    /// Padding added around the children of a container when measuring it.
    pub compound_padding: f64,
    /// Layout run after each mutating operation; `None` leaves positions alone.
    pub layout_by: Option<NamedOptions>,
    /// After collapsing nodes, aggregate their parallel edges that share a label.
    pub group_edges_of_same_type_on_collapse: bool,
    /// Let an aggregate edge become an original of another aggregate.
    pub allow_nested_edge_collapse: bool,
    /// Run the rank-separation pass after rank-based (`layered`/`dagre`) layouts.
    pub adjust_dagre_separation: bool,
    pub cue_enabled: bool,
    pub undoable: bool,
    /// Classes checked in order when picking the style class of a cluster representative.
    pub cluster_class_priority: Vec<String>,
    /// Keep one representative edge per distinct label instead of one per node pair.
    pub cluster_allow_unique_edges: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            compound_padding: 10.0,
            layout_by: None,
            group_edges_of_same_type_on_collapse: false,
            allow_nested_edge_collapse: true,
            adjust_dagre_separation: true,
            cue_enabled: true,
            undoable: true,
            cluster_class_priority: Vec::new(),
            cluster_allow_unique_edges: true,
        }
    }
}

impl EngineOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        let opts: Self = serde_json::from_str(text).map_err(|e| Error::InvalidOptions {
            message: e.to_string(),
        })?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.compound_padding.is_finite() || self.compound_padding < 0.0 {
            return Err(Error::InvalidOptions {
                message: format!(
                    "compoundPadding must be a non-negative number, got {}",
                    self.compound_padding
                ),
            });
        }
        Ok(())
    }
}

/// Per-call overrides for a single operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationOptions {
    /// Replaces [`EngineOptions::layout_by`] for this call.
    pub layout: Option<NamedOptions>,
    pub group_edges_of_same_type: Option<bool>,
}

impl OperationOptions {
    pub fn with_layout(layout: NamedOptions) -> Self {
        Self {
            layout: Some(layout),
            ..Self::default()
        }
    }
}
