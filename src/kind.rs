//! Identities of effects and type-erased requests

use super::Effect;

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LABEL: AtomicU64 = AtomicU64::new(0);

/// An opaque token distinguishing effects of the same shape
///
/// Each call of [`Label::fresh`] returns a label that is different from every other label
/// created in this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(u64);

impl Label {
    /// Mint a new label
    pub fn fresh() -> Self {
        Label(NEXT_LABEL.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The identity used for matching a request against a handler
///
/// Two kinds are equal when they have the same request type and the same label.
/// The type name is only kept for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct Kind {
    id: TypeId,
    label: Option<Label>,
    name: &'static str,
}

impl Kind {
    /// The unlabeled kind of the effect type `E`
    pub fn of<E: Effect>() -> Self {
        Kind {
            id: TypeId::of::<E>(),
            label: None,
            name: type_name::<E>(),
        }
    }

    /// The kind of the effect type `E` under `label`
    pub fn labeled<E: Effect>(label: Label) -> Self {
        Kind {
            label: Some(label),
            ..Kind::of::<E>()
        }
    }

    /// The kind of a concrete request
    pub fn of_request<E: Effect>(request: &E) -> Self {
        Kind {
            label: request.label(),
            ..Kind::of::<E>()
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn label(&self) -> Option<Label> {
        self.label
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.label == other.label
    }
}

impl Eq for Kind {}

impl Hash for Kind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.label.hash(state);
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.label {
            Some(label) => write!(f, "{}{}", self.name, label),
            None => f.write_str(self.name),
        }
    }
}

/// A request with its concrete type erased
pub(crate) trait Request {
    fn kind(&self) -> Kind;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<E: Effect> Request for E {
    fn kind(&self) -> Kind {
        Kind::of_request(self)
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
