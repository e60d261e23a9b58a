use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sort attribute elements by an aggregation of the measures instead of by element value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortAggregation {
    Sum,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSortItemBody {
    pub attribute_identifier: String,
    pub direction: SortDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<SortAggregation>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeLocatorBody {
    pub attribute_identifier: String,
    pub element: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureLocatorBody {
    pub measure_identifier: String,
}

/// Locates one data column of the result: attribute elements on the path and the measure.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocatorItem {
    AttributeLocatorItem(AttributeLocatorBody),
    MeasureLocatorItem(MeasureLocatorBody),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureSortItemBody {
    pub direction: SortDirection,
    pub locators: Vec<LocatorItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortItem {
    AttributeSortItem(AttributeSortItemBody),
    MeasureSortItem(MeasureSortItemBody),
}

impl SortItem {
    /// Local identifiers of the attributes this sort refers to.
    pub fn attribute_identifiers(&self) -> Vec<&str> {
        match self {
            SortItem::AttributeSortItem(body) => vec![body.attribute_identifier.as_str()],
            SortItem::MeasureSortItem(body) => body
                .locators
                .iter()
                .filter_map(|locator| match locator {
                    LocatorItem::AttributeLocatorItem(l) => Some(l.attribute_identifier.as_str()),
                    LocatorItem::MeasureLocatorItem(_) => None,
                })
                .collect(),
        }
    }

    pub fn measure_identifiers(&self) -> Vec<&str> {
        match self {
            SortItem::AttributeSortItem(_) => Vec::new(),
            SortItem::MeasureSortItem(body) => body
                .locators
                .iter()
                .filter_map(|locator| match locator {
                    LocatorItem::MeasureLocatorItem(l) => Some(l.measure_identifier.as_str()),
                    LocatorItem::AttributeLocatorItem(_) => None,
                })
                .collect(),
        }
    }

    pub fn direction(&self) -> SortDirection {
        match self {
            SortItem::AttributeSortItem(body) => body.direction,
            SortItem::MeasureSortItem(body) => body.direction,
        }
    }
}

pub fn new_attribute_sort(
    attribute_identifier: impl Into<String>,
    direction: SortDirection,
    aggregation: Option<SortAggregation>,
) -> SortItem {
    SortItem::AttributeSortItem(AttributeSortItemBody {
        attribute_identifier: attribute_identifier.into(),
        direction,
        aggregation,
    })
}

pub fn new_attribute_locator(
    attribute_identifier: impl Into<String>,
    element: impl Into<String>,
) -> LocatorItem {
    LocatorItem::AttributeLocatorItem(AttributeLocatorBody {
        attribute_identifier: attribute_identifier.into(),
        element: element.into(),
    })
}

/// Sort by a measure column. The measure locator is appended after the attribute locators.
pub fn new_measure_sort(
    measure_identifier: impl Into<String>,
    direction: SortDirection,
    attribute_locators: Vec<LocatorItem>,
) -> SortItem {
    let mut locators = attribute_locators;
    locators.push(LocatorItem::MeasureLocatorItem(MeasureLocatorBody {
        measure_identifier: measure_identifier.into(),
    }));
    SortItem::MeasureSortItem(MeasureSortItemBody {
        direction,
        locators,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn measure_sort_shape() {
        let sort = new_measure_sort(
            "m1",
            SortDirection::Desc,
            vec![new_attribute_locator("a1", "/obj/1/elements?id=3")],
        );

        assert_eq!(
            serde_json::to_value(&sort).unwrap(),
            json!({
                "measureSortItem": {
                    "direction": "desc",
                    "locators": [
                        {"attributeLocatorItem": {"attributeIdentifier": "a1", "element": "/obj/1/elements?id=3"}},
                        {"measureLocatorItem": {"measureIdentifier": "m1"}}
                    ]
                }
            })
        );
        assert_eq!(sort.attribute_identifiers(), vec!["a1"]);
        assert_eq!(sort.measure_identifiers(), vec!["m1"]);
    }
}
