use serde::{Deserialize, Serialize};

use crate::objref::ObjRef;

/// Attribute placed into an execution, identified by the display form used to render its
/// elements.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    /// Unique within one execution. Left unset by the builders; bucket conversion assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_identifier: Option<String>,
    pub display_form: ObjRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "crate::serde_defaults::is_false")]
    pub show_all_values: bool,
}

pub fn new_attribute(display_form: impl Into<ObjRef>) -> Attribute {
    Attribute {
        local_identifier: None,
        display_form: display_form.into(),
        alias: None,
        show_all_values: false,
    }
}

impl Attribute {
    pub fn local_id(mut self, local_id: impl Into<String>) -> Self {
        self.local_identifier = Some(local_id.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn show_all_values(mut self, show_all_values: bool) -> Self {
        self.show_all_values = show_all_values;
        self
    }

    pub fn local_identifier(&self) -> Option<&str> {
        self.local_identifier.as_deref()
    }
}
