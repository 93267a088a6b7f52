//! The component whitelist: the only kinds a surface may instantiate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the seven whitelisted component kinds.
///
/// The wire tag is the variant name verbatim (`"TextInput"`, `"Button"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    TextInput,
    Select,
    Checkbox,
    Text,
    Alert,
    Table,
    Button,
}

/// Required and optional property names for a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyContract {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

const TEXT_INPUT: PropertyContract = PropertyContract {
    required: &[],
    optional: &["value", "placeholder", "label", "required"],
};
const SELECT: PropertyContract = PropertyContract {
    required: &["options"],
    optional: &["value", "label", "required"],
};
const CHECKBOX: PropertyContract = PropertyContract {
    required: &[],
    optional: &["value", "label"],
};
const TEXT: PropertyContract = PropertyContract {
    required: &["text"],
    optional: &["usageHint"],
};
const ALERT: PropertyContract = PropertyContract {
    required: &["type", "message"],
    optional: &["title"],
};
const TABLE: PropertyContract = PropertyContract {
    required: &["columns"],
    optional: &["data"],
};
const BUTTON: PropertyContract = PropertyContract {
    required: &["action"],
    optional: &["child", "variant"],
};

impl ComponentKind {
    pub const ALL: [ComponentKind; 7] = [
        ComponentKind::TextInput,
        ComponentKind::Select,
        ComponentKind::Checkbox,
        ComponentKind::Text,
        ComponentKind::Alert,
        ComponentKind::Table,
        ComponentKind::Button,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::TextInput => "TextInput",
            ComponentKind::Select => "Select",
            ComponentKind::Checkbox => "Checkbox",
            ComponentKind::Text => "Text",
            ComponentKind::Alert => "Alert",
            ComponentKind::Table => "Table",
            ComponentKind::Button => "Button",
        }
    }

    /// Exact, case-sensitive tag lookup.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }

    /// The property contract for this kind.
    ///
    /// Contracts describe the kind to the model through [`ComponentWhitelist::catalog`].
    /// The structure validator does not enforce them: a surface missing a
    /// required property still validates, and the renderer falls back.
    pub fn contract(&self) -> &'static PropertyContract {
        match self {
            ComponentKind::TextInput => &TEXT_INPUT,
            ComponentKind::Select => &SELECT,
            ComponentKind::Checkbox => &CHECKBOX,
            ComponentKind::Text => &TEXT,
            ComponentKind::Alert => &ALERT,
            ComponentKind::Table => &TABLE,
            ComponentKind::Button => &BUTTON,
        }
    }

    /// Properties whose value is the id of another component in the surface.
    pub fn reference_fields(&self) -> &'static [&'static str] {
        match self {
            ComponentKind::Button => &["child"],
            _ => &[],
        }
    }

    /// Closed value sets for enumerated properties.
    pub fn allowed_values(&self, property: &str) -> Option<&'static [&'static str]> {
        match (self, property) {
            (ComponentKind::Text, "usageHint") => Some(&["h1", "h2", "h3", "p", "span"]),
            (ComponentKind::Alert, "type") => Some(&["success", "error", "warning", "info"]),
            (ComponentKind::Button, "variant") => Some(&["primary", "secondary", "destructive"]),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unknown component kind '{s}'"))
    }
}

/// Static registry of allowed component kinds and their property contracts.
pub struct ComponentWhitelist;

impl ComponentWhitelist {
    pub fn is_allowed(kind: &str) -> bool {
        ComponentKind::from_tag(kind).is_some()
    }

    pub fn contract_for(kind: &str) -> Option<&'static PropertyContract> {
        ComponentKind::from_tag(kind).map(|k| k.contract())
    }

    /// All allowed tags, in declaration order.
    pub fn allowed_kinds() -> Vec<&'static str> {
        ComponentKind::ALL.iter().map(|k| k.as_str()).collect()
    }

    /// A plain-text description of every kind, for embedding in prompts.
    pub fn catalog() -> String {
        let mut out = String::new();
        for kind in ComponentKind::ALL {
            let contract = kind.contract();
            out.push_str(&format!("- {kind}:"));
            if !contract.required.is_empty() {
                out.push_str(&format!(" required [{}]", contract.required.join(", ")));
            }
            if !contract.optional.is_empty() {
                out.push_str(&format!(" optional [{}]", contract.optional.join(", ")));
            }
            for prop in contract.required.iter().chain(contract.optional) {
                if let Some(values) = kind.allowed_values(prop) {
                    out.push_str(&format!("; {prop} one of {}", values.join("|")));
                }
            }
            for field in kind.reference_fields() {
                out.push_str(&format!("; {field} is the id of another component"));
            }
            out.push('\n');
        }
        out
    }
}
