//! Execution definition fingerprints.
//!
//! Equal fingerprints mean the backend computes the same thing. Different fingerprints do not
//! prove the computations differ: the fingerprint ignores local identifiers and filter order but
//! nothing else.

use std::collections::{HashMap, HashSet};

use md5::{Digest, Md5};
use serde::Serialize;
use serde_json::Value;

use super::ExecutionDefinition;
use crate::attribute::Attribute;
use crate::dimension::{Dimension, MEASURE_GROUP_IDENTIFIER};
use crate::error::{ModelError, Result};
use crate::filter::{is_no_op_filter, Filter};
use crate::measure::{Measure, MeasureDefinition};
use crate::objref::local_id_ref;
use crate::sort::{AttributeLocatorBody, LocatorItem, MeasureLocatorBody, SortItem};

pub fn def_fingerprint(def: &ExecutionDefinition) -> Result<String> {
    let canonical = Fingerprinter::new(def).compute()?;
    Ok(format!("{:x}", Md5::digest(canonical.as_bytes())))
}

/// Attributes and measures are looked up by local id in separate namespaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum ItemKind {
    Attribute,
    Measure,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ItemKind::Attribute => "attribute",
            ItemKind::Measure => "measure",
        })
    }
}

type ItemKey<'a> = (ItemKind, &'a str);

struct Fingerprinter<'a> {
    def: &'a ExecutionDefinition,
    cache: HashMap<ItemKey<'a>, String>,
    requested: HashSet<ItemKey<'a>>,
}

fn serialize<T: Serialize>(value: &T) -> Result<String> {
    // serde_json maps are ordered by key, so equal values serialize identically.
    let value = serde_json::to_value(value)?;
    Ok(value.to_string())
}

fn inconsistent(message: String) -> ModelError {
    ModelError::invalid(format!("inconsistent execution definition: {message}"))
}

impl<'a> Fingerprinter<'a> {
    fn new(def: &'a ExecutionDefinition) -> Self {
        Self {
            def,
            cache: HashMap::new(),
            requested: HashSet::new(),
        }
    }

    fn compute(mut self) -> Result<String> {
        let def = self.def;
        let mut filters = def
            .filters
            .iter()
            .map(|filter| self.filter(filter))
            .collect::<Result<Vec<_>>>()?;
        filters.sort();

        let mut parts = vec![def.workspace.clone()];
        parts.extend(filters);
        for attribute in &def.attributes {
            parts.push(self.attribute(attribute)?);
        }
        for measure in &def.measures {
            parts.push(self.measure(measure)?);
        }
        for sort in &def.sort_by {
            parts.push(self.sort(sort)?);
        }
        for dimension in &def.dimensions {
            parts.push(self.dimension(dimension)?);
        }
        if let Some(post_processing) = &def.post_processing {
            parts.push(serialize(post_processing)?);
        }

        parts.retain(|part| !part.is_empty());
        Ok(parts.join("_"))
    }

    /// Items are memoized by local id, so an item without one cannot be fingerprinted.
    fn key(kind: ItemKind, local_id: Option<&'a str>) -> Result<ItemKey<'a>> {
        match local_id {
            Some(local_id) if !local_id.is_empty() => Ok((kind, local_id)),
            _ => Err(inconsistent(format!("{kind} without a local identifier"))),
        }
    }

    fn guard(&mut self, key: ItemKey<'a>) -> Result<Option<String>> {
        if let Some(hit) = self.cache.get(&key) {
            return Ok(Some(hit.clone()));
        }
        if !self.requested.insert(key) {
            return Err(inconsistent(format!("cycle detected at '{}'", key.1)));
        }
        Ok(None)
    }

    fn store(&mut self, key: ItemKey<'a>, fingerprint: String) -> String {
        self.cache.insert(key, fingerprint.clone());
        fingerprint
    }

    fn attribute(&mut self, attribute: &'a Attribute) -> Result<String> {
        let key = Self::key(ItemKind::Attribute, attribute.local_identifier())?;
        if let Some(hit) = self.guard(key)? {
            return Ok(hit);
        }
        let anonymous = Attribute {
            local_identifier: None,
            ..attribute.clone()
        };
        let fingerprint = serialize(&anonymous)?;
        Ok(self.store(key, fingerprint))
    }

    fn attribute_by_id(&mut self, local_id: &str) -> Result<String> {
        let def = self.def;
        let attribute = def
            .attribute(local_id)
            .ok_or_else(|| inconsistent(format!("attribute '{local_id}' not found")))?;
        self.attribute(attribute)
    }

    fn measure(&mut self, measure: &'a Measure) -> Result<String> {
        let key = Self::key(ItemKind::Measure, measure.local_identifier())?;
        if let Some(hit) = self.guard(key)? {
            return Ok(hit);
        }

        let definition = match &measure.definition {
            MeasureDefinition::Simple(_) => measure.definition.clone(),
            MeasureDefinition::Arithmetic(def) => {
                let mut resolved = def.clone();
                resolved.measure_identifiers = def
                    .measure_identifiers
                    .iter()
                    .map(|operand| self.measure_by_id(operand))
                    .collect::<Result<Vec<_>>>()?;
                MeasureDefinition::Arithmetic(resolved)
            }
            MeasureDefinition::PoP(def) => {
                let mut resolved = def.clone();
                resolved.measure_identifier = self.measure_by_id(&def.measure_identifier)?;
                MeasureDefinition::PoP(resolved)
            }
            MeasureDefinition::PreviousPeriod(def) => {
                let mut resolved = def.clone();
                resolved.measure_identifier = self.measure_by_id(&def.measure_identifier)?;
                MeasureDefinition::PreviousPeriod(resolved)
            }
        };

        let anonymous = Measure {
            local_identifier: None,
            definition,
            ..measure.clone()
        };
        let fingerprint = serialize(&anonymous)?;
        Ok(self.store(key, fingerprint))
    }

    fn measure_by_id(&mut self, local_id: &str) -> Result<String> {
        let def = self.def;
        let measure = def
            .measure(local_id)
            .ok_or_else(|| inconsistent(format!("measure '{local_id}' not found")))?;
        self.measure(measure)
    }

    fn filter(&mut self, filter: &Filter) -> Result<String> {
        // Filters that restrict nothing do not change the computation.
        if is_no_op_filter(filter) {
            return Ok(String::new());
        }

        let mut resolved = filter.clone();
        let measure_ref = match &mut resolved {
            Filter::MeasureValueFilter(body) => Some(&mut body.measure),
            Filter::RankingFilter(body) => Some(&mut body.measure),
            _ => None,
        };
        if let Some(measure_ref) = measure_ref {
            if let Some(local_id) = measure_ref.local_identifier() {
                let fingerprint = self.measure_by_id(local_id)?;
                *measure_ref = local_id_ref(fingerprint);
            }
        }
        serialize(&resolved)
    }

    fn sort(&mut self, sort: &SortItem) -> Result<String> {
        let resolved = match sort {
            SortItem::AttributeSortItem(body) => {
                let mut body = body.clone();
                body.attribute_identifier = self.attribute_by_id(&body.attribute_identifier)?;
                SortItem::AttributeSortItem(body)
            }
            SortItem::MeasureSortItem(body) => {
                let mut body = body.clone();
                body.locators = body
                    .locators
                    .iter()
                    .map(|locator| self.locator(locator))
                    .collect::<Result<Vec<_>>>()?;
                SortItem::MeasureSortItem(body)
            }
        };
        serialize(&resolved)
    }

    fn locator(&mut self, locator: &LocatorItem) -> Result<LocatorItem> {
        Ok(match locator {
            LocatorItem::AttributeLocatorItem(l) => {
                LocatorItem::AttributeLocatorItem(AttributeLocatorBody {
                    attribute_identifier: self.attribute_by_id(&l.attribute_identifier)?,
                    element: l.element.clone(),
                })
            }
            LocatorItem::MeasureLocatorItem(l) => LocatorItem::MeasureLocatorItem(MeasureLocatorBody {
                measure_identifier: self.measure_by_id(&l.measure_identifier)?,
            }),
        })
    }

    fn dimension(&mut self, dimension: &Dimension) -> Result<String> {
        let mut items = Vec::with_capacity(dimension.item_identifiers.len());
        for item in &dimension.item_identifiers {
            if item == MEASURE_GROUP_IDENTIFIER {
                items.push(Value::String(item.clone()));
            } else {
                items.push(Value::String(self.attribute_by_id(item)?));
            }
        }

        let mut totals = Vec::with_capacity(dimension.totals.len());
        for total in &dimension.totals {
            let mut resolved = total.clone();
            resolved.attribute_identifier = self.attribute_by_id(&total.attribute_identifier)?;
            resolved.measure_identifier = self.measure_by_id(&total.measure_identifier)?;
            totals.push(serde_json::to_value(resolved)?);
        }

        let mut object = serde_json::Map::new();
        object.insert("itemIdentifiers".to_string(), Value::Array(items));
        if !totals.is_empty() {
            object.insert("totals".to_string(), Value::Array(totals));
        }
        Ok(Value::Object(object).to_string())
    }
}
