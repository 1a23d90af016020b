use kifu_board::Color;

use crate::PropIdx;
use crate::properties::{PropId, ValueKind};

/// Which property a value belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropRef {
    Known(PropId),
    Unknown(Box<str>),
}

impl PropRef {
    pub fn ident(&self) -> &str {
        match self {
            Self::Known(id) => id.name(),
            Self::Unknown(ident) => ident,
        }
    }

    pub fn known(&self) -> Option<PropId> {
        match self {
            Self::Known(id) => Some(*id),
            Self::Unknown(_) => None,
        }
    }
}

/// A property as stored in a game tree: the raw value text as it appeared
/// between brackets (escapes kept), tagged with the shape it was read as.
#[derive(Clone, Debug)]
pub struct PropertyValue {
    prop: PropRef,
    kind: ValueKind,
    text: Box<str>,
    pub(crate) next: PropIdx,
}

impl PropertyValue {
    pub fn new(prop: PropId, kind: ValueKind, text: impl Into<Box<str>>) -> Self {
        Self { prop: PropRef::Known(prop), kind, text: text.into(), next: PropIdx::new(0) }
    }

    pub fn unknown(ident: &str, text: impl Into<Box<str>>) -> Self {
        Self {
            prop: PropRef::Unknown(ident.into()),
            kind: ValueKind::Unknown,
            text: text.into(),
            next: PropIdx::new(0),
        }
    }

    pub fn prop(&self) -> &PropRef {
        &self.prop
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is(&self, id: PropId) -> bool {
        self.prop == PropRef::Known(id)
    }

    /// The mover, when this is a `B` or `W` property.
    pub fn move_color(&self) -> Option<Color> {
        match self.prop.known()? {
            PropId::B => Some(Color::Black),
            PropId::W => Some(Color::White),
            _ => None,
        }
    }
}
