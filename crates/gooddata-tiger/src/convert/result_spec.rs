use std::collections::BTreeMap;

use gooddata_model::{
    Dimension, ExecutionDefinition, LocatorItem, SortAggregation, SortDirection, SortItem,
    TotalType, MEASURE_GROUP_IDENTIFIER,
};

use crate::afm::{
    AttributeSortKey, AttributeSortType, SortDirection as TigerSortDirection, SortKey,
    TigerDimension, TigerResultSpec, TigerTotal, TotalDimension, TotalFunction, ValueSortKey,
};
use crate::error::{Result, TigerError};

/// Local identifier Tiger uses for the dimension at `index`.
pub fn dimension_local_identifier(index: usize) -> String {
    format!("dim_{index}")
}

pub(super) fn convert_result_spec(def: &ExecutionDefinition) -> Result<TigerResultSpec> {
    let mut dimensions: Vec<TigerDimension> = def
        .dimensions
        .iter()
        .enumerate()
        .map(|(index, dimension)| TigerDimension {
            local_identifier: dimension_local_identifier(index),
            item_identifiers: dimension.item_identifiers.clone(),
            sorting: Vec::new(),
        })
        .collect();

    for sort in &def.sort_by {
        let (index, key) = convert_sort(&def.dimensions, sort)?;
        dimensions[index].sorting.push(key);
    }

    Ok(TigerResultSpec {
        dimensions,
        totals: convert_totals(&def.dimensions)?,
    })
}

fn direction(direction: SortDirection) -> TigerSortDirection {
    match direction {
        SortDirection::Asc => TigerSortDirection::Asc,
        SortDirection::Desc => TigerSortDirection::Desc,
    }
}

/// Returns the index of the dimension the sort orders, with the converted key.
///
/// Attribute sorts order the dimension holding the attribute. Value sorts order the first
/// dimension without the measure group by the data column their locators point at.
fn convert_sort(dimensions: &[Dimension], sort: &SortItem) -> Result<(usize, SortKey)> {
    match sort {
        SortItem::AttributeSortItem(body) => {
            let index = dimensions
                .iter()
                .position(|dimension| dimension.contains(&body.attribute_identifier))
                .ok_or_else(|| {
                    TigerError::Unsupported(format!(
                        "sort on attribute {} outside of all dimensions",
                        body.attribute_identifier
                    ))
                })?;
            let sort_type = body.aggregation.map(|aggregation| match aggregation {
                SortAggregation::Sum => AttributeSortType::Area,
            });
            Ok((
                index,
                SortKey::Attribute(AttributeSortKey {
                    attribute_identifier: body.attribute_identifier.clone(),
                    direction: direction(body.direction),
                    sort_type,
                }),
            ))
        }
        SortItem::MeasureSortItem(body) => {
            let measure_dimension = dimensions
                .iter()
                .position(Dimension::has_measure_group)
                .ok_or_else(|| {
                    TigerError::Unsupported("measure sort without a measure group".to_string())
                })?;
            let sorted = (0..dimensions.len())
                .find(|index| *index != measure_dimension)
                .unwrap_or(measure_dimension);

            let column: BTreeMap<String, String> = body
                .locators
                .iter()
                .map(|locator| match locator {
                    LocatorItem::AttributeLocatorItem(l) => {
                        (l.attribute_identifier.clone(), l.element.clone())
                    }
                    LocatorItem::MeasureLocatorItem(l) => (
                        MEASURE_GROUP_IDENTIFIER.to_string(),
                        l.measure_identifier.clone(),
                    ),
                })
                .collect();
            let mut data_column_locators = BTreeMap::new();
            data_column_locators.insert(dimension_local_identifier(measure_dimension), column);

            Ok((
                sorted,
                SortKey::Value(ValueSortKey {
                    data_column_locators,
                    direction: direction(body.direction),
                }),
            ))
        }
    }
}

fn total_function(total_type: TotalType) -> Result<TotalFunction> {
    Ok(match total_type {
        TotalType::Sum => TotalFunction::Sum,
        TotalType::Avg => TotalFunction::Avg,
        TotalType::Max => TotalFunction::Max,
        TotalType::Min => TotalFunction::Min,
        TotalType::Med => TotalFunction::Med,
        TotalType::Nat => {
            return Err(TigerError::Unsupported("native totals".to_string()));
        }
    })
}

/// Each total rolls up its own dimension from its attribute onwards and keeps every other
/// dimension whole. The preceding items of its own dimension stay as subtotal grouping.
fn convert_totals(dimensions: &[Dimension]) -> Result<Vec<TigerTotal>> {
    let mut totals = Vec::new();
    for (own_index, dimension) in dimensions.iter().enumerate() {
        for total in &dimension.totals {
            let attribute_index = dimension
                .item_identifiers
                .iter()
                .position(|item| *item == total.attribute_identifier)
                .unwrap_or(0);

            let mut total_dimensions: Vec<TotalDimension> = dimensions
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != own_index)
                .map(|(index, other)| TotalDimension {
                    dimension_identifier: dimension_local_identifier(index),
                    total_dimension_items: other.item_identifiers.clone(),
                })
                .collect();
            if attribute_index > 0 {
                total_dimensions.push(TotalDimension {
                    dimension_identifier: dimension_local_identifier(own_index),
                    total_dimension_items: dimension.item_identifiers[..attribute_index].to_vec(),
                });
            }

            totals.push(TigerTotal {
                local_identifier: format!("total_{}", totals.len()),
                function: total_function(total.total_type)?,
                metric: total.measure_identifier.clone(),
                total_dimensions,
            });
        }
    }
    Ok(totals)
}
