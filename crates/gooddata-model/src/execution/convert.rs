//! Bucket to execution definition conversion.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::ratio::convert_afm_filters;
use super::validation::validate_execution_definition;
use super::ExecutionDefinition;
use crate::attribute::Attribute;
use crate::bucket::{apply_ratio_rule, AttributeOrMeasure, Bucket, ComputeRatioRule};
use crate::dimension::{assemble, MEASURE_GROUP_IDENTIFIER};
use crate::error::{ModelError, Result};
use crate::filter::Filter;
use crate::measure::Measure;
use crate::sort::SortItem;
use crate::totals::Total;

/// Attributes of buckets with this local identifier are laid out next to the measure group.
pub const COLUMNS_BUCKET: &str = "columns";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversionOptions {
    pub workspace: String,
    /// Keep negative attribute filters that exclude nothing.
    pub keep_empty_attribute_filters: bool,
    pub ratio_rule: ComputeRatioRule,
}

#[derive(Clone, Debug, Default)]
pub struct BucketConverter {
    options: ConversionOptions,
}

/// Per-call state of one conversion.
struct ConversionContext {
    explicit_ids: HashSet<String>,
    items_by_id: HashMap<String, AttributeOrMeasure>,
    next_attribute: usize,
    next_measure: usize,
    generated: usize,
}

impl ConversionContext {
    fn new<'a>(items: impl Iterator<Item = &'a AttributeOrMeasure>) -> Self {
        Self {
            explicit_ids: items
                .filter_map(AttributeOrMeasure::local_identifier)
                .map(str::to_string)
                .collect(),
            items_by_id: HashMap::new(),
            next_attribute: 0,
            next_measure: 0,
            generated: 0,
        }
    }

    fn next_id(&mut self, is_measure: bool) -> String {
        loop {
            let (prefix, counter) = if is_measure {
                ("m", &mut self.next_measure)
            } else {
                ("a", &mut self.next_attribute)
            };
            let candidate = format!("{prefix}_{counter}");
            *counter += 1;
            if !self.explicit_ids.contains(&candidate)
                && !self.items_by_id.contains_key(&candidate)
            {
                self.generated += 1;
                return candidate;
            }
        }
    }

    /// Gives the item its local identifier. Returns `None` when an identical item with the same
    /// explicit identifier was registered before.
    fn register(&mut self, item: AttributeOrMeasure) -> Result<Option<(String, AttributeOrMeasure)>> {
        let (local_id, item) = match item.local_identifier() {
            Some(id) => (id.to_string(), item),
            None => {
                let id = self.next_id(item.as_measure().is_some());
                (id.clone(), with_local_id(item, id))
            }
        };

        if let Some(existing) = self.items_by_id.get(&local_id) {
            if *existing == item {
                return Ok(None);
            }
            return Err(ModelError::invalid(format!(
                "local identifier '{local_id}' is used by two different items"
            )));
        }

        self.items_by_id.insert(local_id.clone(), item.clone());
        Ok(Some((local_id, item)))
    }
}

fn with_local_id(item: AttributeOrMeasure, local_id: String) -> AttributeOrMeasure {
    match item {
        AttributeOrMeasure::Attribute(attribute) => {
            AttributeOrMeasure::Attribute(Attribute {
                local_identifier: Some(local_id),
                ..attribute
            })
        }
        AttributeOrMeasure::Measure(measure) => AttributeOrMeasure::Measure(Measure {
            local_identifier: Some(local_id),
            ..measure
        }),
    }
}

impl BucketConverter {
    pub fn new(options: ConversionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    pub fn convert(
        &self,
        buckets: &[Bucket],
        filters: &[Filter],
        sorts: &[SortItem],
    ) -> Result<ExecutionDefinition> {
        let bucket_items: Vec<Vec<AttributeOrMeasure>> = buckets
            .iter()
            .map(|bucket| apply_ratio_rule(&bucket.items, self.options.ratio_rule))
            .collect();

        let mut ctx = ConversionContext::new(bucket_items.iter().flatten());
        let mut attributes = Vec::new();
        let mut measures = Vec::new();
        let mut rows: Vec<String> = Vec::new();
        let mut columns: Vec<String> = Vec::new();
        let mut totals: Vec<&Total> = Vec::new();

        for (bucket, items) in buckets.iter().zip(bucket_items) {
            let is_columns = bucket.local_identifier == COLUMNS_BUCKET;
            for item in items {
                // Deduplicated items still occupy their place in the layout.
                let local_id = item.local_identifier().map(str::to_string);
                let registered = ctx.register(item)?;
                let (local_id, is_attribute) = match registered {
                    Some((local_id, AttributeOrMeasure::Attribute(attribute))) => {
                        attributes.push(attribute);
                        (local_id, true)
                    }
                    Some((_, AttributeOrMeasure::Measure(measure))) => {
                        measures.push(measure);
                        continue;
                    }
                    None => {
                        let local_id = local_id.unwrap_or_default();
                        let is_attribute = matches!(
                            ctx.items_by_id.get(&local_id),
                            Some(AttributeOrMeasure::Attribute(_))
                        );
                        (local_id, is_attribute)
                    }
                };
                if !is_attribute {
                    continue;
                }
                if is_columns {
                    columns.push(local_id);
                } else {
                    rows.push(local_id);
                }
            }
            totals.extend(bucket.totals.iter());
        }

        let mut groups = vec![rows];
        if !measures.is_empty() {
            columns.push(MEASURE_GROUP_IDENTIFIER.to_string());
        }
        if !columns.is_empty() {
            groups.push(columns);
        }

        let mut totals_groups: Vec<Vec<Total>> = vec![Vec::new(); groups.len()];
        for total in totals {
            let idx = groups
                .iter()
                .position(|group| group.contains(&total.attribute_identifier))
                .unwrap_or(0);
            totals_groups[idx].push(total.clone());
        }
        let dimensions = assemble(&groups, &totals_groups)?;

        let afm = convert_afm_filters(
            &measures,
            filters,
            self.options.keep_empty_attribute_filters,
        );

        let def = ExecutionDefinition {
            workspace: self.options.workspace.clone(),
            buckets: buckets.to_vec(),
            attributes,
            measures,
            aux_measures: afm.aux_measures,
            filters: afm.filters,
            sort_by: sorts.to_vec(),
            dimensions,
            post_processing: None,
        };
        validate_execution_definition(&def)?;

        log::debug!(
            "converted {} buckets into {} attributes, {} measures ({} generated ids), {} aux measures, {} dimensions",
            buckets.len(),
            def.attributes.len(),
            def.measures.len(),
            ctx.generated,
            def.aux_measures.len(),
            def.dimensions.len()
        );
        Ok(def)
    }
}

/// Converts buckets with the default [`ConversionOptions`].
pub fn convert_buckets(
    buckets: &[Bucket],
    filters: &[Filter],
    sorts: &[SortItem],
) -> Result<ExecutionDefinition> {
    BucketConverter::default().convert(buckets, filters, sorts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::new_attribute;
    use crate::bucket::new_bucket;
    use crate::measure::new_measure;

    #[test]
    fn generated_ids_skip_explicit_ones() {
        let buckets = [new_bucket(
            "measures",
            [
                new_measure("m.a").local_id("m_0").build().into(),
                new_measure("m.b").build().into(),
                new_measure("m.c").build().into(),
            ],
        )];
        let def = convert_buckets(&buckets, &[], &[]).unwrap();
        let ids: Vec<_> = def
            .measures
            .iter()
            .map(|m| m.local_identifier().unwrap())
            .collect();
        assert_eq!(ids, vec!["m_0", "m_1", "m_2"]);
    }

    #[test]
    fn counter_is_scoped_to_one_call() {
        let buckets = [new_bucket("view", [new_attribute("label.region").into()])];
        let first = convert_buckets(&buckets, &[], &[]).unwrap();
        let second = convert_buckets(&buckets, &[], &[]).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.attributes[0].local_identifier(), Some("a_0"));
    }
}
