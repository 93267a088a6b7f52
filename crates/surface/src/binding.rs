//! Binding resolution against a long-lived data model.
//!
//! Paths are dot-separated; a segment may carry one or more array indices
//! (`rows[2]`, `grid[0][1]`). A missing key or out-of-range index resolves to
//! `None`, never an error.

use serde_json::{Map, Value};

const LITERAL_KEYS: [&str; 4] = ["literalString", "literalNumber", "literalBoolean", "literal"];

/// A value reference inside component properties.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// `{"path": "form.name"}`
    Path(String),
    /// `{"literalString": "Hi"}` and friends, unwrapped.
    Literal(Value),
    /// Neither shape; treated as an already-resolved value.
    Raw(Value),
}

impl Binding {
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Binding::Raw(value.clone());
        };
        if obj.len() == 1 {
            if let Some(Value::String(path)) = obj.get("path") {
                return Binding::Path(path.clone());
            }
            if let Some(literal) = LITERAL_KEYS.iter().find_map(|k| obj.get(*k)) {
                return Binding::Literal(literal.clone());
            }
        }
        Binding::Raw(value.clone())
    }

    pub fn path(path: impl Into<String>) -> Self {
        Binding::Path(path.into())
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Binding::Literal(value.into())
    }
}

/// Resolve `binding` against `model`.
pub fn resolve(binding: &Binding, model: &Value) -> Option<Value> {
    match binding {
        Binding::Path(path) => resolve_path(path, model).cloned(),
        Binding::Literal(value) | Binding::Raw(value) => Some(value.clone()),
    }
}

/// Walk `model` along a dotted path.
pub fn resolve_path<'a>(path: &str, model: &'a Value) -> Option<&'a Value> {
    let steps = parse_path(path)?;
    steps.iter().try_fold(model, |node, step| match step {
        Step::Key(key) => node.as_object()?.get(*key),
        Step::Index(i) => node.as_array()?.get(*i),
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step<'a> {
    Key(&'a str),
    Index(usize),
}

fn parse_path(path: &str) -> Option<Vec<Step<'_>>> {
    let mut steps = Vec::new();
    if path.is_empty() {
        return Some(steps);
    }
    for segment in path.split('.') {
        let (name, mut rest) = match segment.find('[') {
            Some(open) => segment.split_at(open),
            None => (segment, ""),
        };
        if name.is_empty() && rest.is_empty() {
            return None;
        }
        if !name.is_empty() {
            steps.push(Step::Key(name));
        }
        while !rest.is_empty() {
            let inner = rest.strip_prefix('[')?;
            let close = inner.find(']')?;
            steps.push(Step::Index(inner[..close].trim().parse().ok()?));
            rest = &inner[close + 1..];
        }
    }
    Some(steps)
}

/// The nested map bindings resolve against. Outlives any single surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataModel {
    root: Value,
}

impl DataModel {
    pub fn new() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn resolve(&self, binding: &Binding) -> Option<Value> {
        resolve(binding, &self.root)
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        resolve_path(path, &self.root)
    }

    /// Write `value` at `path`, creating intermediate objects for missing
    /// keys. Array indices must already exist, or equal the length (append).
    /// Returns false when the path crosses a scalar or is malformed.
    pub fn set(&mut self, path: &str, value: Value) -> bool {
        let Some(steps) = parse_path(path) else {
            return false;
        };
        let Some((last, parents)) = steps.split_last() else {
            self.root = value;
            return true;
        };

        if self.root.is_null() {
            self.root = Value::Object(Map::new());
        }
        let mut node = &mut self.root;
        for (i, step) in parents.iter().enumerate() {
            let fresh = match steps[i + 1] {
                Step::Key(_) => Value::Object(Map::new()),
                Step::Index(_) => Value::Array(Vec::new()),
            };
            node = match slot(node, *step, fresh) {
                Some(next) => next,
                None => return false,
            };
        }

        match (node, last) {
            (Value::Object(map), Step::Key(key)) => {
                map.insert((*key).to_string(), value);
                true
            }
            (Value::Array(items), Step::Index(i)) if *i < items.len() => {
                items[*i] = value;
                true
            }
            (Value::Array(items), Step::Index(i)) if *i == items.len() => {
                items.push(value);
                true
            }
            _ => false,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }
}

/// Child slot for `step`, inserting `fresh` when absent.
fn slot<'a>(node: &'a mut Value, step: Step<'_>, fresh: Value) -> Option<&'a mut Value> {
    match (node, step) {
        (Value::Object(map), Step::Key(key)) => {
            let entry = map.entry(key.to_string()).or_insert(Value::Null);
            if entry.is_null() {
                *entry = fresh;
            }
            Some(entry)
        }
        (Value::Array(items), Step::Index(i)) => {
            if i == items.len() {
                items.push(fresh);
            }
            items.get_mut(i)
        }
        _ => None,
    }
}
