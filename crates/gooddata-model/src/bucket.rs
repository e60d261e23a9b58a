use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;
use crate::measure::{measure_disable_compute_ratio, Measure};
use crate::totals::Total;

/// Item placed into a bucket.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeOrMeasure {
    Attribute(Attribute),
    Measure(Measure),
}

impl AttributeOrMeasure {
    pub fn local_identifier(&self) -> Option<&str> {
        match self {
            AttributeOrMeasure::Attribute(attribute) => attribute.local_identifier(),
            AttributeOrMeasure::Measure(measure) => measure.local_identifier(),
        }
    }

    pub fn as_attribute(&self) -> Option<&Attribute> {
        match self {
            AttributeOrMeasure::Attribute(attribute) => Some(attribute),
            AttributeOrMeasure::Measure(_) => None,
        }
    }

    pub fn as_measure(&self) -> Option<&Measure> {
        match self {
            AttributeOrMeasure::Measure(measure) => Some(measure),
            AttributeOrMeasure::Attribute(_) => None,
        }
    }
}

impl From<Attribute> for AttributeOrMeasure {
    fn from(value: Attribute) -> Self {
        AttributeOrMeasure::Attribute(value)
    }
}

impl From<Measure> for AttributeOrMeasure {
    fn from(value: Measure) -> Self {
        AttributeOrMeasure::Measure(value)
    }
}

/// Named group of items as authored in a chart configuration (`measures`, `view`, `columns`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub local_identifier: String,
    #[serde(default)]
    pub items: Vec<AttributeOrMeasure>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub totals: Vec<Total>,
}

pub fn new_bucket(
    local_identifier: impl Into<String>,
    items: impl IntoIterator<Item = AttributeOrMeasure>,
) -> Bucket {
    Bucket {
        local_identifier: local_identifier.into(),
        items: items.into_iter().collect(),
        totals: Vec::new(),
    }
}

pub fn bucket_is_empty(bucket: &Bucket) -> bool {
    bucket.items.is_empty()
}

pub fn bucket_attributes(bucket: &Bucket) -> impl Iterator<Item = &Attribute> {
    bucket.items.iter().filter_map(AttributeOrMeasure::as_attribute)
}

pub fn bucket_measures(bucket: &Bucket) -> impl Iterator<Item = &Measure> {
    bucket.items.iter().filter_map(AttributeOrMeasure::as_measure)
}

/// Returns a copy of the bucket with its totals replaced.
pub fn bucket_set_totals(bucket: &Bucket, totals: Vec<Total>) -> Bucket {
    Bucket {
        totals,
        ..bucket.clone()
    }
}

/// Returns a copy of the bucket with every item passed through `modify`.
pub fn bucket_modify_items(
    bucket: &Bucket,
    modify: impl FnMut(&AttributeOrMeasure) -> AttributeOrMeasure,
) -> Bucket {
    Bucket {
        items: bucket.items.iter().map(modify).collect(),
        ..bucket.clone()
    }
}

/// How compute-ratio flags on bucket measures are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComputeRatioRule {
    /// Ratio is disabled on every measure.
    Never,
    /// Ratio is kept only when the items hold exactly one measure.
    SingleMeasureOnly,
    #[default]
    AnyMeasure,
}

pub fn apply_ratio_rule(
    items: &[AttributeOrMeasure],
    rule: ComputeRatioRule,
) -> Vec<AttributeOrMeasure> {
    let measure_count = items.iter().filter(|item| item.as_measure().is_some()).count();
    let disable = match rule {
        ComputeRatioRule::Never => true,
        ComputeRatioRule::SingleMeasureOnly => measure_count > 1,
        ComputeRatioRule::AnyMeasure => false,
    };

    items
        .iter()
        .map(|item| match item {
            AttributeOrMeasure::Measure(measure) if disable => {
                AttributeOrMeasure::Measure(measure_disable_compute_ratio(measure))
            }
            other => other.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::new_attribute;
    use crate::measure::{measure_does_compute_ratio, new_measure};
    use crate::totals::{new_total, TotalType};
    use serde_json::json;

    fn ratio_items(count: usize) -> Vec<AttributeOrMeasure> {
        let mut items = vec![new_attribute("label.region").into()];
        for i in 0..count {
            items.push(new_measure(format!("m.{i}")).ratio().build().into());
        }
        items
    }

    fn ratios(items: &[AttributeOrMeasure]) -> Vec<bool> {
        items
            .iter()
            .filter_map(AttributeOrMeasure::as_measure)
            .map(measure_does_compute_ratio)
            .collect()
    }

    #[test]
    fn ratio_rules() {
        assert_eq!(ratios(&apply_ratio_rule(&ratio_items(1), ComputeRatioRule::Never)), vec![false]);
        assert_eq!(
            ratios(&apply_ratio_rule(&ratio_items(1), ComputeRatioRule::SingleMeasureOnly)),
            vec![true]
        );
        assert_eq!(
            ratios(&apply_ratio_rule(&ratio_items(2), ComputeRatioRule::SingleMeasureOnly)),
            vec![false, false]
        );
        assert_eq!(
            ratios(&apply_ratio_rule(&ratio_items(2), ComputeRatioRule::AnyMeasure)),
            vec![true, true]
        );
    }

    #[test]
    fn empty_totals_are_omitted() {
        let bucket = new_bucket("view", [new_attribute("label.region").local_id("a1").into()]);
        let value = serde_json::to_value(&bucket).unwrap();
        assert!(value.get("totals").is_none());
        assert_eq!(
            value["items"][0],
            json!({"attribute": {"localIdentifier": "a1", "displayForm": {"identifier": "label.region"}}})
        );

        let with_totals = bucket_set_totals(&bucket, vec![new_total(TotalType::Sum, "m1", "a1")]);
        assert_eq!(with_totals.totals.len(), 1);
        assert!(bucket.totals.is_empty());
        assert_eq!(bucket_attributes(&with_totals).count(), 1);
        assert_eq!(bucket_measures(&with_totals).count(), 0);
    }
}
