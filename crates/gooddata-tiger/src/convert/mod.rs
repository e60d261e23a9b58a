//! Execution definition → Tiger execution request.

mod filters;
mod result_spec;

use gooddata_model::{
    validate_execution_definition, ArithmeticMeasureOperator, Attribute, ExecutionDefinition,
    Measure, MeasureAggregation, MeasureDefinition, ObjRef, ObjectType,
};

use crate::afm::{
    AfmExecution, Aggregation, ArithmeticMeasure, ArithmeticOperator, AttributeItem,
    DateAttributeShift, DatasetShift, IdentifierRef, LocalIdRef,
    MeasureDefinition as TigerMeasureDefinition, MeasureItem, OverPeriodMeasure,
    PreviousPeriodMeasure, SimpleMeasure, TigerExecution, TigerObjectType,
};
use crate::error::{Result, TigerError};

pub use result_spec::dimension_local_identifier;

/// Builds the Tiger execution request for a definition.
///
/// Filters that restrict nothing (all-time date filters, negative attribute filters with no
/// elements, measure value filters without a condition) are left out. Every metadata reference
/// must carry an identifier.
pub fn to_tiger_execution(def: &ExecutionDefinition) -> Result<TigerExecution> {
    validate_execution_definition(def)?;
    if def.post_processing.is_some() {
        log::debug!("ignoring result post-processing, tiger returns raw dates");
    }

    let execution = AfmExecution {
        attributes: def
            .attributes
            .iter()
            .map(convert_attribute)
            .collect::<Result<Vec<_>>>()?,
        measures: def
            .measures
            .iter()
            .map(convert_measure)
            .collect::<Result<Vec<_>>>()?,
        filters: filters::convert_filters(&def.filters)?,
        aux_measures: def
            .aux_measures
            .iter()
            .map(convert_measure)
            .collect::<Result<Vec<_>>>()?,
    };
    let result_spec = result_spec::convert_result_spec(def)?;

    log::debug!(
        "tiger execution: {} attributes, {} measures ({} aux), {} filters, {} totals",
        execution.attributes.len(),
        execution.measures.len(),
        execution.aux_measures.len(),
        execution.filters.len(),
        result_spec.totals.len()
    );

    Ok(TigerExecution {
        execution,
        result_spec,
    })
}

/// Identifier reference for a metadata object. The object type recorded on the ref wins over
/// `default_type`.
pub(crate) fn identifier_ref(
    obj_ref: &ObjRef,
    default_type: TigerObjectType,
) -> Result<IdentifierRef> {
    let Some(id) = obj_ref.identifier() else {
        return Err(TigerError::UnsupportedRef(obj_ref.to_string()));
    };
    let object_type = match obj_ref.object_type() {
        Some(ObjectType::Attribute) => TigerObjectType::Attribute,
        Some(ObjectType::DisplayForm) => TigerObjectType::Label,
        Some(ObjectType::Measure) => TigerObjectType::Metric,
        Some(ObjectType::Fact) => TigerObjectType::Fact,
        Some(ObjectType::DataSet) => TigerObjectType::Dataset,
        Some(other) => {
            return Err(TigerError::UnsupportedRef(format!(
                "{obj_ref} of type {other:?}"
            )))
        }
        None => default_type,
    };
    Ok(IdentifierRef::new(id, object_type))
}

fn local_id(local_identifier: Option<&str>) -> String {
    // Validation guarantees every item has one.
    local_identifier.unwrap_or_default().to_string()
}

fn convert_attribute(attribute: &Attribute) -> Result<AttributeItem> {
    Ok(AttributeItem {
        local_identifier: local_id(attribute.local_identifier()),
        label: identifier_ref(&attribute.display_form, TigerObjectType::Label)?,
        show_all_values: attribute.show_all_values,
    })
}

fn aggregation(aggregation: MeasureAggregation) -> Aggregation {
    match aggregation {
        MeasureAggregation::Sum => Aggregation::Sum,
        MeasureAggregation::Count => Aggregation::Count,
        MeasureAggregation::Avg => Aggregation::Avg,
        MeasureAggregation::Min => Aggregation::Min,
        MeasureAggregation::Max => Aggregation::Max,
        MeasureAggregation::Median => Aggregation::Median,
        MeasureAggregation::Runsum => Aggregation::Runsum,
    }
}

fn arithmetic_operator(operator: ArithmeticMeasureOperator) -> ArithmeticOperator {
    match operator {
        ArithmeticMeasureOperator::Sum => ArithmeticOperator::Sum,
        ArithmeticMeasureOperator::Difference => ArithmeticOperator::Difference,
        ArithmeticMeasureOperator::Multiplication => ArithmeticOperator::Multiplication,
        ArithmeticMeasureOperator::Ratio => ArithmeticOperator::Ratio,
        ArithmeticMeasureOperator::Change => ArithmeticOperator::Change,
    }
}

fn convert_measure(measure: &Measure) -> Result<MeasureItem> {
    let definition = match &measure.definition {
        MeasureDefinition::Simple(def) => TigerMeasureDefinition::Measure(SimpleMeasure {
            item: identifier_ref(&def.item, TigerObjectType::Metric)?,
            aggregation: def.aggregation.map(aggregation),
            compute_ratio: def.compute_ratio,
            filters: filters::convert_measure_filters(&def.filters)?,
        }),
        MeasureDefinition::Arithmetic(def) => {
            TigerMeasureDefinition::ArithmeticMeasure(ArithmeticMeasure {
                measure_identifiers: def
                    .measure_identifiers
                    .iter()
                    .map(LocalIdRef::new)
                    .collect(),
                operator: arithmetic_operator(def.operator),
            })
        }
        MeasureDefinition::PoP(def) => {
            TigerMeasureDefinition::OverPeriodMeasure(OverPeriodMeasure {
                measure_identifier: LocalIdRef::new(&def.measure_identifier),
                date_attributes: vec![DateAttributeShift {
                    attribute: identifier_ref(&def.pop_attribute, TigerObjectType::Attribute)?,
                    periods_ago: 1,
                }],
            })
        }
        MeasureDefinition::PreviousPeriod(def) => {
            TigerMeasureDefinition::PreviousPeriodMeasure(PreviousPeriodMeasure {
                measure_identifier: LocalIdRef::new(&def.measure_identifier),
                date_datasets: def
                    .date_data_sets
                    .iter()
                    .map(|shift| {
                        Ok(DatasetShift {
                            dataset: identifier_ref(&shift.data_set, TigerObjectType::Dataset)?,
                            periods_ago: shift.periods_ago,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
            })
        }
    };

    Ok(MeasureItem {
        local_identifier: local_id(measure.local_identifier()),
        definition,
        alias: measure.alias.clone(),
        format: measure.format.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gooddata_model::{id_ref, new_measure, new_pop_measure, uri_ref};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn identifier_refs_take_the_recorded_type() {
        assert_eq!(
            identifier_ref(&id_ref("revenue", Some(ObjectType::Fact)), TigerObjectType::Metric)
                .unwrap(),
            IdentifierRef::new("revenue", TigerObjectType::Fact)
        );
        assert_eq!(
            identifier_ref(&"revenue".into(), TigerObjectType::Metric).unwrap(),
            IdentifierRef::new("revenue", TigerObjectType::Metric)
        );
    }

    #[test]
    fn uri_refs_are_rejected() {
        assert_eq!(
            identifier_ref(&uri_ref("/gdc/md/obj/1"), TigerObjectType::Metric),
            Err(TigerError::UnsupportedRef(uri_ref("/gdc/md/obj/1").to_string()))
        );
    }

    #[test]
    fn pop_measure_becomes_over_period_measure() {
        let master = new_measure("revenue").local_id("m1").build();
        let pop = new_pop_measure(&master, "year.attr")
            .unwrap()
            .local_id("m1_pop")
            .build();

        let converted = serde_json::to_value(convert_measure(&pop).unwrap()).unwrap();
        assert_eq!(
            converted,
            json!({
                "localIdentifier": "m1_pop",
                "definition": {"overPeriodMeasure": {
                    "measureIdentifier": {"localIdentifier": "m1"},
                    "dateAttributes": [{
                        "attribute": {"identifier": {"id": "year.attr", "type": "attribute"}},
                        "periodsAgo": 1
                    }]
                }}
            })
        );
    }
}
