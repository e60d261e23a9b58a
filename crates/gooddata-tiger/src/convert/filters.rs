use gooddata_model::{
    is_no_op_filter, AttributeElements, DateGranularity, Filter, MeasureFilter,
    MeasureValueFilterBody, MeasureValueFilterCondition, ObjRef,
};

use super::identifier_ref;
use crate::afm::{
    AbsoluteDateFilter, AfmIdentifier, AttributeFilterElements, ComparisonMeasureValueFilter,
    CompoundMeasureValueFilter, FilterDefinition, Granularity, LocalIdRef,
    NegativeAttributeFilter, PositiveAttributeFilter, RangeMeasureValueFilter, RankingFilter,
    RelativeDateFilter, TigerObjectType, ValueCondition,
};
use crate::error::{Result, TigerError};

pub(super) fn convert_filters(filters: &[Filter]) -> Result<Vec<FilterDefinition>> {
    let mut converted = Vec::with_capacity(filters.len());
    for filter in filters {
        if is_no_op_filter(filter) {
            log::debug!("dropping filter that restricts nothing: {filter:?}");
            continue;
        }
        converted.push(convert_filter(filter)?);
    }
    Ok(converted)
}

pub(super) fn convert_measure_filters(filters: &[MeasureFilter]) -> Result<Vec<FilterDefinition>> {
    let filters: Vec<Filter> = filters.iter().cloned().map(Filter::from).collect();
    convert_filters(&filters)
}

fn granularity(granularity: DateGranularity) -> Result<Granularity> {
    Ok(match granularity {
        DateGranularity::Minute => Granularity::Minute,
        DateGranularity::Hour => Granularity::Hour,
        DateGranularity::Date => Granularity::Day,
        DateGranularity::Week => Granularity::Week,
        DateGranularity::Month => Granularity::Month,
        DateGranularity::Quarter => Granularity::Quarter,
        DateGranularity::Year => Granularity::Year,
        DateGranularity::AllTime => {
            return Err(TigerError::Unsupported(
                "all-time granularity outside an all-time filter".to_string(),
            ))
        }
    })
}

fn elements(elements: &AttributeElements) -> AttributeFilterElements {
    AttributeFilterElements {
        values: elements.items().to_vec(),
    }
}

/// Local identifiers stay local; anything else must be an identifier of `default_type`.
fn afm_identifier(obj_ref: &ObjRef, default_type: TigerObjectType) -> Result<AfmIdentifier> {
    match obj_ref.local_identifier() {
        Some(local_id) => Ok(AfmIdentifier::Local(LocalIdRef::new(local_id))),
        None => Ok(AfmIdentifier::Identifier(identifier_ref(obj_ref, default_type)?)),
    }
}

fn afm_identifiers(refs: &[ObjRef], default_type: TigerObjectType) -> Result<Vec<AfmIdentifier>> {
    refs.iter()
        .map(|obj_ref| afm_identifier(obj_ref, default_type))
        .collect()
}

fn convert_filter(filter: &Filter) -> Result<FilterDefinition> {
    Ok(match filter {
        Filter::PositiveAttributeFilter(body) => {
            FilterDefinition::PositiveAttributeFilter(PositiveAttributeFilter {
                label: identifier_ref(&body.display_form, TigerObjectType::Label)?,
                in_elements: elements(&body.in_elements),
            })
        }
        Filter::NegativeAttributeFilter(body) => {
            FilterDefinition::NegativeAttributeFilter(NegativeAttributeFilter {
                label: identifier_ref(&body.display_form, TigerObjectType::Label)?,
                not_in: elements(&body.not_in),
            })
        }
        Filter::AbsoluteDateFilter(body) => {
            FilterDefinition::AbsoluteDateFilter(AbsoluteDateFilter {
                dataset: identifier_ref(&body.data_set, TigerObjectType::Dataset)?,
                from: body.from.clone(),
                to: body.to.clone(),
            })
        }
        Filter::RelativeDateFilter(body) => {
            FilterDefinition::RelativeDateFilter(RelativeDateFilter {
                dataset: identifier_ref(&body.data_set, TigerObjectType::Dataset)?,
                granularity: granularity(body.granularity)?,
                from: body.from,
                to: body.to,
            })
        }
        Filter::MeasureValueFilter(body) => convert_measure_value_filter(body)?,
        Filter::RankingFilter(body) => FilterDefinition::RankingFilter(RankingFilter {
            measures: vec![afm_identifier(&body.measure, TigerObjectType::Metric)?],
            dimensionality: afm_identifiers(&body.attributes, TigerObjectType::Label)?,
            operator: body.operator,
            value: body.value,
            apply_on_result: body.apply_on_result,
        }),
    })
}

fn convert_measure_value_filter(body: &MeasureValueFilterBody) -> Result<FilterDefinition> {
    let measure = afm_identifier(&body.measure, TigerObjectType::Metric)?;
    let dimensionality = afm_identifiers(&body.dimensionality, TigerObjectType::Label)?;
    let apply_on_result = body.apply_on_result;

    let Some(condition) = &body.condition else {
        // No-op filters are dropped before conversion.
        return Err(TigerError::Unsupported(
            "measure value filter without a condition".to_string(),
        ));
    };

    Ok(match condition {
        MeasureValueFilterCondition::Comparison(comparison) => {
            FilterDefinition::ComparisonMeasureValueFilter(ComparisonMeasureValueFilter {
                measure,
                operator: comparison.operator,
                value: comparison.value,
                treat_null_values_as: comparison.treat_null_values_as,
                dimensionality,
                apply_on_result,
            })
        }
        MeasureValueFilterCondition::Range(range) => {
            FilterDefinition::RangeMeasureValueFilter(RangeMeasureValueFilter {
                measure,
                operator: range.operator,
                from: range.from,
                to: range.to,
                treat_null_values_as: range.treat_null_values_as,
                dimensionality,
                apply_on_result,
            })
        }
        MeasureValueFilterCondition::Compound(compound) => {
            let conditions = compound
                .conditions
                .iter()
                .map(|condition| match condition {
                    MeasureValueFilterCondition::Comparison(c) => {
                        Ok(ValueCondition::Comparison(c.clone()))
                    }
                    MeasureValueFilterCondition::Range(r) => Ok(ValueCondition::Range(r.clone())),
                    MeasureValueFilterCondition::Compound(_) => Err(TigerError::Unsupported(
                        "nested compound measure value conditions".to_string(),
                    )),
                })
                .collect::<Result<Vec<_>>>()?;
            FilterDefinition::CompoundMeasureValueFilter(CompoundMeasureValueFilter {
                measure,
                conditions,
                dimensionality,
                apply_on_result,
            })
        }
    })
}
