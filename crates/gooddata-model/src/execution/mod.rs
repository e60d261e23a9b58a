//! Execution definitions: the backend-agnostic description of one computation.

use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;
use crate::bucket::{new_bucket, AttributeOrMeasure, Bucket};
use crate::date_format::DateFormat;
use crate::dimension::{dimension_set_totals, Dimension};
use crate::error::Result;
use crate::filter::Filter;
use crate::measure::Measure;
use crate::sort::SortItem;
use crate::totals::Total;

mod convert;
mod fingerprint;
mod ratio;
mod validation;

pub use convert::{convert_buckets, BucketConverter, ConversionOptions, COLUMNS_BUCKET};
pub use fingerprint::def_fingerprint;
pub use ratio::{convert_afm_filters, AfmFilters};
pub use validation::validate_execution_definition;

/// Post-processing applied to the computed result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostProcessing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<DateFormat>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionDefinition {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub workspace: String,
    /// Buckets the definition was converted from, kept for consumers that render by bucket.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buckets: Vec<Bucket>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub measures: Vec<Measure>,
    /// Measures computed only to evaluate filters; never part of the result.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aux_measures: Vec<Measure>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub sort_by: Vec<SortItem>,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_processing: Option<PostProcessing>,
}

impl ExecutionDefinition {
    pub fn attribute(&self, local_id: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.local_identifier() == Some(local_id))
    }

    /// Looks the measure up among both regular and auxiliary measures.
    pub fn measure(&self, local_id: &str) -> Option<&Measure> {
        self.measures
            .iter()
            .chain(self.aux_measures.iter())
            .find(|measure| measure.local_identifier() == Some(local_id))
    }

    /// Every total of every dimension.
    pub fn totals(&self) -> impl Iterator<Item = &Total> {
        self.dimensions.iter().flat_map(|dimension| dimension.totals.iter())
    }
}

/// Definition computing the given items in the default layout.
pub fn new_def_for_items(
    workspace: impl Into<String>,
    items: impl IntoIterator<Item = AttributeOrMeasure>,
    filters: &[Filter],
) -> Result<ExecutionDefinition> {
    let bucket = new_bucket("items", items);
    let mut def = new_def_for_buckets(workspace, &[bucket], filters)?;
    def.buckets.clear();
    Ok(def)
}

pub fn new_def_for_buckets(
    workspace: impl Into<String>,
    buckets: &[Bucket],
    filters: &[Filter],
) -> Result<ExecutionDefinition> {
    let options = ConversionOptions {
        workspace: workspace.into(),
        ..ConversionOptions::default()
    };
    BucketConverter::new(options).convert(buckets, filters, &[])
}

pub fn def_with_dimensions(
    def: &ExecutionDefinition,
    dimensions: Vec<Dimension>,
) -> Result<ExecutionDefinition> {
    let updated = ExecutionDefinition {
        dimensions,
        ..def.clone()
    };
    validate_execution_definition(&updated)?;
    Ok(updated)
}

pub fn def_with_sorting(
    def: &ExecutionDefinition,
    sort_by: Vec<SortItem>,
) -> Result<ExecutionDefinition> {
    let updated = ExecutionDefinition {
        sort_by,
        ..def.clone()
    };
    validate_execution_definition(&updated)?;
    Ok(updated)
}

/// Sets the date format of the result post-processing. The format must be one of [`DateFormat`].
pub fn def_with_date_format(def: &ExecutionDefinition, date_format: &str) -> Result<ExecutionDefinition> {
    let date_format = date_format.parse::<DateFormat>()?;
    Ok(ExecutionDefinition {
        post_processing: Some(PostProcessing {
            date_format: Some(date_format),
        }),
        ..def.clone()
    })
}

/// Replaces every dimension's totals. Each total goes to the first dimension containing its
/// attribute; totals whose attribute is in no dimension are dropped.
pub fn def_set_totals(def: &ExecutionDefinition, totals: Vec<Total>) -> ExecutionDefinition {
    let mut per_dimension: Vec<Vec<Total>> = vec![Vec::new(); def.dimensions.len()];
    for total in totals {
        match def
            .dimensions
            .iter()
            .position(|dimension| dimension.contains(&total.attribute_identifier))
        {
            Some(idx) => per_dimension[idx].push(total),
            None => log::warn!(
                "dropping {:?} total of '{}': attribute '{}' is not in any dimension",
                total.total_type,
                total.measure_identifier,
                total.attribute_identifier
            ),
        }
    }

    let dimensions = def
        .dimensions
        .iter()
        .zip(per_dimension)
        .map(|(dimension, totals)| dimension_set_totals(dimension, totals))
        .collect();

    ExecutionDefinition {
        dimensions,
        ..def.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::new_attribute;
    use crate::dimension::{new_dimension, MEASURE_GROUP_IDENTIFIER};
    use crate::error::ModelError;
    use crate::measure::new_measure;
    use crate::totals::{new_total, TotalType};
    use pretty_assertions::assert_eq;

    fn sample_def() -> ExecutionDefinition {
        new_def_for_items(
            "ws",
            [
                new_attribute("label.region").local_id("a1").into(),
                new_attribute("label.product").local_id("a2").into(),
                new_measure("m.revenue").local_id("m1").build().into(),
            ],
            &[],
        )
        .unwrap()
    }

    #[test]
    fn items_definition_has_default_layout() {
        let def = sample_def();
        assert!(def.buckets.is_empty());
        assert_eq!(
            def.dimensions,
            vec![
                new_dimension(["a1", "a2"], vec![]),
                new_dimension([MEASURE_GROUP_IDENTIFIER], vec![]),
            ]
        );
    }

    #[test]
    fn set_totals_places_by_attribute_and_drops_unknown() {
        let def = def_set_totals(
            &sample_def(),
            vec![
                new_total(TotalType::Sum, "m1", "a2"),
                new_total(TotalType::Max, "m1", "unknown"),
            ],
        );
        assert_eq!(def.dimensions[0].totals, vec![new_total(TotalType::Sum, "m1", "a2")]);
        assert!(def.dimensions[1].totals.is_empty());

        let cleared = def_set_totals(&def, vec![]);
        assert_eq!(cleared.totals().count(), 0);
    }

    #[test]
    fn date_format_must_be_supported() {
        let def = def_with_date_format(&sample_def(), "dd.MM.yyyy").unwrap();
        assert_eq!(
            def.post_processing.unwrap().date_format,
            Some(DateFormat::DayMonthYearDots)
        );

        let err = def_with_date_format(&sample_def(), "yyyy/dd/MM").unwrap_err();
        assert_eq!(err, ModelError::UnsupportedFormat("yyyy/dd/MM".to_string()));
    }

    #[test]
    fn dimensions_are_validated() {
        let err = def_with_dimensions(
            &sample_def(),
            vec![
                new_dimension(["a1", MEASURE_GROUP_IDENTIFIER], vec![]),
                new_dimension(["a2", MEASURE_GROUP_IDENTIFIER], vec![]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidInput(_)));
    }
}
