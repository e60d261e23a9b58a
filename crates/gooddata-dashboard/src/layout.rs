//! Dashboard layout tree.
//!
//! Section and item lists sit behind [`Arc`] so that copies of a layout share every list they do
//! not change. Nothing here mutates a list in place; see [`crate::DashboardLayoutBuilder`].

use std::sync::Arc;

use gooddata_model::ObjRef;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSize {
    pub grid_width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_as_ratio: Option<f64>,
}

/// Item size per responsive screen; `xl` is mandatory, smaller screens fall back to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemSizeByScreen {
    pub xl: ItemSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lg: Option<ItemSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md: Option<ItemSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sm: Option<ItemSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xs: Option<ItemSize>,
}

impl ItemSizeByScreen {
    pub fn xl(grid_width: u32) -> Self {
        Self {
            xl: ItemSize {
                grid_width,
                grid_height: None,
                height_as_ratio: None,
            },
            lg: None,
            md: None,
            sm: None,
            xs: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiWidget {
    pub identifier: String,
    pub title: String,
    pub measure: ObjRef,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightWidget {
    pub identifier: String,
    pub title: String,
    pub insight: ObjRef,
}

/// Widget rendered by application code; everything but the type is opaque to the layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomWidget {
    pub custom_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayoutWidget {
    #[serde(rename = "kpi")]
    Kpi(KpiWidget),
    #[serde(rename = "insight")]
    Insight(InsightWidget),
    #[serde(rename = "IDashboardLayout")]
    Layout(DashboardLayout),
    #[serde(rename = "customWidget")]
    Custom(CustomWidget),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardLayoutItem {
    pub size: ItemSizeByScreen,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<LayoutWidget>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardLayoutSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<SectionHeader>,
    #[serde(default)]
    pub items: Arc<Vec<DashboardLayoutItem>>,
}

impl DashboardLayoutSection {
    pub fn new(items: Vec<DashboardLayoutItem>) -> Self {
        Self {
            header: None,
            items: Arc::new(items),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ItemSizeByScreen>,
    #[serde(default)]
    pub sections: Arc<Vec<DashboardLayoutSection>>,
}

/// Top-level persisted form, which carries the same type tag as nested layouts.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type")]
enum PersistedLayout {
    #[serde(rename = "IDashboardLayout")]
    Layout(DashboardLayout),
}

impl DashboardLayout {
    pub fn new(sections: Vec<DashboardLayoutSection>) -> Self {
        Self {
            size: None,
            sections: Arc::new(sections),
        }
    }

    /// Persisted JSON: `{"type": "IDashboardLayout", "sections": [...]}`.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(PersistedLayout::Layout(self.clone()))?)
    }

    pub fn from_json(value: Value) -> Result<Self> {
        let PersistedLayout::Layout(layout) = serde_json::from_value(value)?;
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gooddata_model::{id_ref, ObjectType};
    use serde_json::json;

    #[test]
    fn persisted_shape_nests_layouts_by_type() {
        let nested = DashboardLayout::new(vec![DashboardLayoutSection::new(vec![
            DashboardLayoutItem {
                size: ItemSizeByScreen::xl(6),
                widget: Some(LayoutWidget::Kpi(KpiWidget {
                    identifier: "kpi1".to_string(),
                    title: "Revenue".to_string(),
                    measure: id_ref("m.revenue", Some(ObjectType::Measure)),
                })),
            },
        ])]);
        let layout = DashboardLayout::new(vec![DashboardLayoutSection::new(vec![
            DashboardLayoutItem {
                size: ItemSizeByScreen::xl(12),
                widget: Some(LayoutWidget::Layout(nested)),
            },
        ])]);

        let value = layout.to_json().unwrap();
        assert_eq!(
            value,
            json!({
                "type": "IDashboardLayout",
                "sections": [{
                    "items": [{
                        "size": {"xl": {"gridWidth": 12}},
                        "widget": {
                            "type": "IDashboardLayout",
                            "sections": [{
                                "items": [{
                                    "size": {"xl": {"gridWidth": 6}},
                                    "widget": {
                                        "type": "kpi",
                                        "identifier": "kpi1",
                                        "title": "Revenue",
                                        "measure": {"identifier": "m.revenue", "type": "measure"}
                                    }
                                }]
                            }]
                        }
                    }]
                }]
            })
        );
        assert_eq!(DashboardLayout::from_json(value).unwrap(), layout);
    }

    #[test]
    fn custom_widgets_keep_unknown_fields() {
        let value = json!({
            "type": "IDashboardLayout",
            "sections": [{"items": [{
                "size": {"xl": {"gridWidth": 4}},
                "widget": {"type": "customWidget", "customType": "banner", "text": "hello"}
            }]}]
        });
        let layout = DashboardLayout::from_json(value.clone()).unwrap();
        let Some(LayoutWidget::Custom(widget)) = &layout.sections[0].items[0].widget else {
            panic!("expected custom widget");
        };
        assert_eq!(widget.custom_type, "banner");
        assert_eq!(widget.extra["text"], json!("hello"));
        assert_eq!(layout.to_json().unwrap(), value);
    }

    #[test]
    fn top_level_type_is_checked() {
        let err = DashboardLayout::from_json(json!({"type": "other", "sections": []})).unwrap_err();
        assert!(matches!(err, crate::LayoutError::Persisted(_)));
    }
}
