//! Declarative UI surfaces: the security boundary between model output and
//! the renderer.
//!
//! Model-produced JSON enters through [`StructureValidator`] and leaves as a
//! [`SurfaceDescription`]: a flat, ordered list of components drawn from a
//! fixed whitelist of seven kinds, with every cross-reference resolved and no
//! executable-looking content anywhere in the tree.
//!
//! # Pipeline
//!
//! ```text
//!  raw text ──▶ decode ──▶ shape ──▶ security scan ──▶ collect ids ──▶ resolve refs
//!                 │          │            │                 │               │
//!            JSON_SYNTAX  SCHEMA_    SECURITY_       SCHEMA_INVALID /  INVALID_
//!                         INVALID    VIOLATION      UNKNOWN_COMPONENT  REFERENCE
//! ```
//!
//! The first failing pass wins; errors are never aggregated.
//!
//! # Wire format
//!
//! ```json
//! { "surfaceUpdate": { "surfaceId": "s1",
//!     "components": [ { "id": "title", "component": { "Text": { "text": { "literalString": "Hi" } } } } ] } }
//! ```

mod binding;
mod error;
mod model;
mod render;
mod security;
mod serializer;
mod validator;
mod whitelist;

pub use binding::{Binding, DataModel, resolve, resolve_path};
pub use error::ValidationError;
pub use model::{ComponentNode, SurfaceDescription};
pub use render::{RenderEntry, RenderPlan};
pub use security::{DangerousPattern, find_dangerous, patterns};
pub use serializer::{canonicalize, print, to_value};
pub use validator::{DEFAULT_MAX_DEPTH, StructureValidator};
pub use whitelist::{ComponentKind, ComponentWhitelist, PropertyContract};
