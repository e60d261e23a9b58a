use std::fmt;

use serde::{Deserialize, Serialize};

/// Type of the analytical object an [`ObjRef`] points to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectType {
    Attribute,
    DisplayForm,
    Measure,
    Fact,
    DataSet,
    Tag,
    Insight,
    AnalyticalDashboard,
    Variable,
}

/// Reference to an analytical object.
///
/// Backend objects are referenced by URI, by identifier, or by both (when the reference was
/// resolved against metadata). Items inside a single execution are referenced by their local
/// identifier.
///
/// The JSON form is the plain object shape: `{"uri": ..}`, `{"identifier": .., "type": ..}` or
/// `{"localIdentifier": ..}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjRef {
    UriAndIdentifier {
        uri: String,
        identifier: String,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        object_type: Option<ObjectType>,
    },
    Identifier {
        identifier: String,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        object_type: Option<ObjectType>,
    },
    Uri {
        uri: String,
    },
    LocalId {
        #[serde(rename = "localIdentifier")]
        local_identifier: String,
    },
}

pub fn uri_ref(uri: impl Into<String>) -> ObjRef {
    ObjRef::Uri { uri: uri.into() }
}

pub fn id_ref(identifier: impl Into<String>, object_type: Option<ObjectType>) -> ObjRef {
    ObjRef::Identifier {
        identifier: identifier.into(),
        object_type,
    }
}

pub fn local_id_ref(local_identifier: impl Into<String>) -> ObjRef {
    ObjRef::LocalId {
        local_identifier: local_identifier.into(),
    }
}

impl ObjRef {
    pub fn uri(&self) -> Option<&str> {
        match self {
            ObjRef::Uri { uri } | ObjRef::UriAndIdentifier { uri, .. } => Some(uri),
            _ => None,
        }
    }

    pub fn identifier(&self) -> Option<&str> {
        match self {
            ObjRef::Identifier { identifier, .. } | ObjRef::UriAndIdentifier { identifier, .. } => {
                Some(identifier)
            }
            _ => None,
        }
    }

    pub fn local_identifier(&self) -> Option<&str> {
        match self {
            ObjRef::LocalId { local_identifier } => Some(local_identifier),
            _ => None,
        }
    }

    pub fn object_type(&self) -> Option<ObjectType> {
        match self {
            ObjRef::Identifier { object_type, .. } | ObjRef::UriAndIdentifier { object_type, .. } => {
                *object_type
            }
            _ => None,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ObjRef::LocalId { .. })
    }

    /// Tolerant equality used across the model.
    ///
    /// Identifier refs match when identifiers are equal and the types do not conflict (a missing
    /// type matches any type). Uri refs match on uri. A ref carrying both matches a partial ref on
    /// whichever field they share. Local-id refs only match other local-id refs.
    pub fn matches(&self, other: &ObjRef) -> bool {
        if self.is_local() || other.is_local() {
            return self.local_identifier() == other.local_identifier();
        }

        if let (Some(a), Some(b)) = (self.identifier(), other.identifier()) {
            let types_compatible = match (self.object_type(), other.object_type()) {
                (Some(ta), Some(tb)) => ta == tb,
                _ => true,
            };
            if a == b && types_compatible {
                return true;
            }
        }

        matches!((self.uri(), other.uri()), (Some(a), Some(b)) if a == b)
    }
}

/// Null-tolerant ref comparison: two missing refs are equal, a missing ref never equals a present
/// one.
pub fn are_obj_refs_equal(a: Option<&ObjRef>, b: Option<&ObjRef>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.matches(b),
        _ => false,
    }
}

/// String form of a ref for diagnostics and generated identifiers.
pub fn obj_ref_to_string(obj_ref: &ObjRef) -> String {
    obj_ref.to_string()
}

impl fmt::Display for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjRef::Uri { uri } | ObjRef::UriAndIdentifier { uri, .. } => write!(f, "[{uri}]"),
            ObjRef::Identifier { identifier, .. } => f.write_str(identifier),
            ObjRef::LocalId { local_identifier } => write!(f, "local_id({local_identifier})"),
        }
    }
}

impl From<&str> for ObjRef {
    fn from(value: &str) -> Self {
        id_ref(value, None)
    }
}

impl From<String> for ObjRef {
    fn from(value: String) -> Self {
        id_ref(value, None)
    }
}
