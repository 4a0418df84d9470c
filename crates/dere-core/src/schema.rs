//! Task schema: the type system annotations are checked against.
//!
//! A schema declares named span types and frame types; each frame type owns a
//! set of slot types, and each slot type lists the span or frame types that
//! may fill it. The corpus reader only ever talks to a schema through the
//! [`TaskSchema`] trait, so callers can plug in their own registry.
//! [`TaskSpec`] is the registry shipped with this crate.
//!
//! # Example
//!
//! ```
//! use dere_core::schema::{TaskSchema, TaskSpec, TypeDef};
//!
//! let spec = TaskSpec::builder()
//!     .span("Protein")
//!     .frame("Activation", [("Theme", ["Protein"])])
//!     .build()
//!     .unwrap();
//!
//! assert!(matches!(spec.type_lookup("span:Protein"), Some(TypeDef::Span(_))));
//! assert!(matches!(spec.type_lookup("frame:Activation"), Some(TypeDef::Frame(_))));
//! assert!(spec.type_lookup("span:Activation").is_none());
//! ```

use std::{collections::HashSet, fmt, sync::Arc};

use indexmap::{IndexMap, map::Entry};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::identifier::Id;

/// Qualifier prepended to span type names before lookup.
pub const SPAN_PREFIX: &str = "span";

/// Qualifier prepended to frame type names before lookup.
pub const FRAME_PREFIX: &str = "frame";

/// Read-only type registry consumed by the corpus reader.
///
/// Names are qualified as `"span:<Name>"` or `"frame:<Name>"`. A lookup that
/// returns a kind other than the one the caller expected is treated by the
/// reader as an out-of-schema reference.
pub trait TaskSchema: Send + Sync {
    /// Look up a qualified type name.
    fn type_lookup(&self, qualified_name: &str) -> Option<TypeDef>;
}

/// A resolved schema type: either a span type or a frame type.
#[derive(Debug, Clone)]
pub enum TypeDef {
    Span(Arc<SpanType>),
    Frame(Arc<FrameType>),
}

/// Reference to a schema type by kind and name.
///
/// This is the unit slot constraints are expressed in, and the runtime type
/// of a slot filler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Span(Id),
    Frame(Id),
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Span(name) => write!(f, "{SPAN_PREFIX}:{name}"),
            TypeRef::Frame(name) => write!(f, "{FRAME_PREFIX}:{name}"),
        }
    }
}

/// A named span type.
#[derive(Debug, PartialEq, Eq)]
pub struct SpanType {
    name: Id,
}

impl SpanType {
    pub fn new(name: Id) -> Self {
        Self { name }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn type_ref(&self) -> TypeRef {
        TypeRef::Span(self.name)
    }
}

/// A named frame type with its declared slots.
#[derive(Debug, PartialEq, Eq)]
pub struct FrameType {
    name: Id,
    slots: IndexMap<Id, SlotType>,
}

impl FrameType {
    pub fn name(&self) -> Id {
        self.name
    }

    pub fn type_ref(&self) -> TypeRef {
        TypeRef::Frame(self.name)
    }

    /// Look up a slot declared on this frame type.
    pub fn slot_type_lookup(&self, name: &str) -> Option<&SlotType> {
        Id::lookup(name).and_then(|id| self.slots.get(&id))
    }

    /// Declared slots, in declaration order.
    pub fn slot_types(&self) -> impl Iterator<Item = &SlotType> {
        self.slots.values()
    }
}

/// A named, type-constrained attachment point on a frame type.
#[derive(Debug, PartialEq, Eq)]
pub struct SlotType {
    name: Id,
    allowed: Vec<TypeRef>,
}

impl SlotType {
    pub fn name(&self) -> Id {
        self.name
    }

    /// Types that may fill this slot.
    pub fn allowed(&self) -> &[TypeRef] {
        &self.allowed
    }

    /// Returns `true` if a filler of type `type_ref` may occupy this slot.
    pub fn allows(&self, type_ref: TypeRef) -> bool {
        self.allowed.contains(&type_ref)
    }
}

/// Errors raised while assembling a [`TaskSpec`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("span type `{0}` is declared more than once")]
    DuplicateSpanType(String),

    #[error("frame type `{0}` is declared more than once")]
    DuplicateFrameType(String),

    #[error("slot `{slot}` is declared more than once on frame type `{frame}`")]
    DuplicateSlot { frame: String, slot: String },

    #[error("slot `{frame}.{slot}` allows undeclared type `{name}`")]
    UnknownFillerType {
        frame: String,
        slot: String,
        name: String,
    },

    #[error("slot `{frame}.{slot}` allows `{name}`, which names both a span and a frame type")]
    AmbiguousFillerType {
        frame: String,
        slot: String,
        name: String,
    },
}

/// Declarative form of a schema, as read from a schema file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDecl {
    #[serde(default, rename = "span")]
    pub spans: Vec<SpanDecl>,

    #[serde(default, rename = "frame")]
    pub frames: Vec<FrameDecl>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpanDecl {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameDecl {
    pub name: String,

    #[serde(default, rename = "slot")]
    pub slots: Vec<SlotDecl>,
}

/// A slot declaration.
///
/// Each entry of `types` is either a bare type name, resolved against span
/// types and then frame types, or a qualified `span:`/`frame:` name.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotDecl {
    pub name: String,

    #[serde(default)]
    pub types: Vec<String>,
}

/// In-memory schema registry.
#[derive(Debug, Default)]
pub struct TaskSpec {
    span_types: IndexMap<Id, Arc<SpanType>>,
    frame_types: IndexMap<Id, Arc<FrameType>>,
}

impl TaskSpec {
    pub fn builder() -> TaskSpecBuilder {
        TaskSpecBuilder::default()
    }

    /// Build a registry from its declarative form.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] for duplicate names or slot constraints that
    /// reference undeclared or ambiguous types.
    pub fn from_decl(decl: SchemaDecl) -> Result<Self, SchemaError> {
        let mut span_types = IndexMap::new();
        for span in &decl.spans {
            let name = Id::new(&span.name);
            match span_types.entry(name) {
                Entry::Occupied(_) => {
                    return Err(SchemaError::DuplicateSpanType(span.name.clone()));
                }
                Entry::Vacant(entry) => {
                    entry.insert(Arc::new(SpanType::new(name)));
                }
            }
        }

        // Frame names are collected first so slots may reference any frame
        // type, including ones declared later in the file.
        let mut frame_names = HashSet::new();
        for frame in &decl.frames {
            if !frame_names.insert(Id::new(&frame.name)) {
                return Err(SchemaError::DuplicateFrameType(frame.name.clone()));
            }
        }

        let mut frame_types = IndexMap::new();
        for frame in &decl.frames {
            let mut slots = IndexMap::new();
            for slot in &frame.slots {
                let allowed = slot
                    .types
                    .iter()
                    .map(|name| resolve_filler_type(name, &span_types, &frame_names, frame, slot))
                    .collect::<Result<Vec<_>, _>>()?;

                let slot_name = Id::new(&slot.name);
                let slot_type = SlotType {
                    name: slot_name,
                    allowed,
                };
                if slots.insert(slot_name, slot_type).is_some() {
                    return Err(SchemaError::DuplicateSlot {
                        frame: frame.name.clone(),
                        slot: slot.name.clone(),
                    });
                }
            }

            let name = Id::new(&frame.name);
            frame_types.insert(name, Arc::new(FrameType { name, slots }));
        }

        debug!(
            span_types = span_types.len(),
            frame_types = frame_types.len();
            "Built task schema"
        );
        Ok(Self {
            span_types,
            frame_types,
        })
    }

    pub fn span_type(&self, name: &str) -> Option<&Arc<SpanType>> {
        Id::lookup(name).and_then(|id| self.span_types.get(&id))
    }

    pub fn frame_type(&self, name: &str) -> Option<&Arc<FrameType>> {
        Id::lookup(name).and_then(|id| self.frame_types.get(&id))
    }

    pub fn span_types(&self) -> impl Iterator<Item = &Arc<SpanType>> {
        self.span_types.values()
    }

    pub fn frame_types(&self) -> impl Iterator<Item = &Arc<FrameType>> {
        self.frame_types.values()
    }
}

impl TaskSchema for TaskSpec {
    fn type_lookup(&self, qualified_name: &str) -> Option<TypeDef> {
        match qualified_name.split_once(':')? {
            (SPAN_PREFIX, name) => self.span_type(name).cloned().map(TypeDef::Span),
            (FRAME_PREFIX, name) => self.frame_type(name).cloned().map(TypeDef::Frame),
            _ => None,
        }
    }
}

fn resolve_filler_type(
    name: &str,
    span_types: &IndexMap<Id, Arc<SpanType>>,
    frame_names: &HashSet<Id>,
    frame: &FrameDecl,
    slot: &SlotDecl,
) -> Result<TypeRef, SchemaError> {
    let (qualifier, bare) = match name.split_once(':') {
        Some((q @ (SPAN_PREFIX | FRAME_PREFIX), bare)) => (Some(q), bare),
        _ => (None, name),
    };

    let id = Id::new(bare);
    let is_span = span_types.contains_key(&id);
    let is_frame = frame_names.contains(&id);

    match (qualifier, is_span, is_frame) {
        (Some(SPAN_PREFIX), true, _) => Ok(TypeRef::Span(id)),
        (Some(FRAME_PREFIX), _, true) => Ok(TypeRef::Frame(id)),
        (None, true, false) => Ok(TypeRef::Span(id)),
        (None, false, true) => Ok(TypeRef::Frame(id)),
        (None, true, true) => Err(SchemaError::AmbiguousFillerType {
            frame: frame.name.clone(),
            slot: slot.name.clone(),
            name: name.to_string(),
        }),
        _ => Err(SchemaError::UnknownFillerType {
            frame: frame.name.clone(),
            slot: slot.name.clone(),
            name: name.to_string(),
        }),
    }
}

/// Incremental construction of a [`TaskSpec`], mostly for tests and
/// programmatic schemas.
#[derive(Debug, Default)]
pub struct TaskSpecBuilder {
    decl: SchemaDecl,
}

impl TaskSpecBuilder {
    /// Declare a span type.
    pub fn span(mut self, name: &str) -> Self {
        self.decl.spans.push(SpanDecl {
            name: name.to_string(),
        });
        self
    }

    /// Declare a frame type with `(slot name, allowed filler types)` pairs.
    pub fn frame<'a, S, T>(mut self, name: &str, slots: S) -> Self
    where
        S: IntoIterator<Item = (&'a str, T)>,
        T: IntoIterator<Item = &'a str>,
    {
        let slots = slots
            .into_iter()
            .map(|(slot, types)| SlotDecl {
                name: slot.to_string(),
                types: types.into_iter().map(str::to_string).collect(),
            })
            .collect();
        self.decl.frames.push(FrameDecl {
            name: name.to_string(),
            slots,
        });
        self
    }

    pub fn build(self) -> Result<TaskSpec, SchemaError> {
        TaskSpec::from_decl(self.decl)
    }
}
