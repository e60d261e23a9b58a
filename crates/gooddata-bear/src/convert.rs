use gooddata_model::{
    is_no_op_filter, validate_execution_definition, Attribute, Dimension, ExecutionDefinition,
    Filter, Measure, MeasureDefinition, MeasureFilter, MeasureValueFilterCondition, ObjRef,
    MEASURE_GROUP_IDENTIFIER,
};

use crate::afm::{
    AbsoluteDateFilter, Afm, AfmAttribute, AfmFilter, AfmMeasure, AfmMeasureDefinition,
    ArithmeticMeasure, BearExecution, ExecutionBody, MeasureValueFilter, NativeTotal,
    NegativeAttributeFilter, ObjQualifier, PopMeasure, PositiveAttributeFilter,
    PreviousPeriodDateDataSet, PreviousPeriodMeasure, Qualifier, RankingFilter,
    RelativeDateFilter, ResultSpec, SimpleMeasure,
};
use crate::error::{BearError, Result};

/// Builds the Bear execution request for a definition.
///
/// The definition is validated first. Auxiliary measures, compound measure value conditions and
/// more than two dimensions cannot be expressed and fail with [`BearError::Unsupported`].
pub fn to_bear_execution(def: &ExecutionDefinition) -> Result<BearExecution> {
    validate_execution_definition(def)?;

    if !def.aux_measures.is_empty() {
        return Err(BearError::Unsupported(format!(
            "{} auxiliary measures",
            def.aux_measures.len()
        )));
    }
    if def.dimensions.is_empty() || def.dimensions.len() > 2 {
        return Err(BearError::Unsupported(format!(
            "{} dimensions; only 1 or 2 dimensions are supported",
            def.dimensions.len()
        )));
    }
    if def.post_processing.is_some() {
        log::debug!("ignoring result post-processing, bear formats dates on its own");
    }

    let attributes = def
        .attributes
        .iter()
        .map(convert_attribute)
        .collect::<Result<Vec<_>>>()?;
    let measures = def
        .measures
        .iter()
        .map(convert_measure)
        .collect::<Result<Vec<_>>>()?;

    let mut filters = Vec::with_capacity(def.filters.len());
    for filter in &def.filters {
        if is_no_op_filter(filter) {
            log::debug!("dropping filter that restricts nothing: {filter:?}");
            continue;
        }
        filters.push(convert_filter(filter)?);
    }

    Ok(BearExecution {
        execution: ExecutionBody {
            afm: Afm {
                attributes,
                measures,
                filters,
                native_totals: native_totals(&def.dimensions),
            },
            result_spec: ResultSpec {
                dimensions: def.dimensions.clone(),
                sorts: def.sort_by.clone(),
            },
        },
    })
}

fn qualifier(obj_ref: &ObjRef) -> Result<Qualifier> {
    if let Some(uri) = obj_ref.uri() {
        return Ok(Qualifier::Uri {
            uri: uri.to_string(),
        });
    }
    if let Some(identifier) = obj_ref.identifier() {
        return Ok(Qualifier::Identifier {
            identifier: identifier.to_string(),
        });
    }
    Err(BearError::Unsupported(format!(
        "{obj_ref} cannot reference a metadata object"
    )))
}

fn obj_qualifier(obj_ref: &ObjRef) -> Result<ObjQualifier> {
    match obj_ref.local_identifier() {
        Some(local_id) => Ok(ObjQualifier::LocalIdentifier {
            local_identifier: local_id.to_string(),
        }),
        None => Ok(ObjQualifier::Qualifier(qualifier(obj_ref)?)),
    }
}

fn local_id(local_identifier: Option<&str>) -> String {
    // Validation guarantees every item has one.
    local_identifier.unwrap_or_default().to_string()
}

fn convert_attribute(attribute: &Attribute) -> Result<AfmAttribute> {
    if attribute.show_all_values {
        log::warn!(
            "bear ignores show_all_values on attribute {}",
            attribute.display_form
        );
    }
    Ok(AfmAttribute {
        local_identifier: local_id(attribute.local_identifier()),
        display_form: qualifier(&attribute.display_form)?,
        alias: attribute.alias.clone(),
    })
}

fn convert_measure(measure: &Measure) -> Result<AfmMeasure> {
    let definition = match &measure.definition {
        MeasureDefinition::Simple(def) => AfmMeasureDefinition::Measure(SimpleMeasure {
            item: qualifier(&def.item)?,
            aggregation: def.aggregation,
            filters: def
                .filters
                .iter()
                .filter(|filter| !is_no_op_measure_filter(filter))
                .map(|filter| convert_filter(&Filter::from(filter.clone())))
                .collect::<Result<Vec<_>>>()?,
            compute_ratio: def.compute_ratio,
        }),
        MeasureDefinition::Arithmetic(def) => {
            AfmMeasureDefinition::ArithmeticMeasure(ArithmeticMeasure {
                measure_identifiers: def.measure_identifiers.clone(),
                operator: def.operator,
            })
        }
        MeasureDefinition::PoP(def) => AfmMeasureDefinition::PopMeasure(PopMeasure {
            measure_identifier: def.measure_identifier.clone(),
            pop_attribute: qualifier(&def.pop_attribute)?,
        }),
        MeasureDefinition::PreviousPeriod(def) => {
            AfmMeasureDefinition::PreviousPeriodMeasure(PreviousPeriodMeasure {
                measure_identifier: def.measure_identifier.clone(),
                date_data_sets: def
                    .date_data_sets
                    .iter()
                    .map(|ds| {
                        Ok(PreviousPeriodDateDataSet {
                            data_set: qualifier(&ds.data_set)?,
                            periods_ago: ds.periods_ago,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
            })
        }
    };

    Ok(AfmMeasure {
        local_identifier: local_id(measure.local_identifier()),
        definition,
        alias: measure.alias.clone(),
        format: measure.format.clone(),
    })
}

fn is_no_op_measure_filter(filter: &MeasureFilter) -> bool {
    is_no_op_filter(&Filter::from(filter.clone()))
}

fn convert_filter(filter: &Filter) -> Result<AfmFilter> {
    Ok(match filter {
        Filter::PositiveAttributeFilter(body) => {
            AfmFilter::PositiveAttributeFilter(PositiveAttributeFilter {
                display_form: qualifier(&body.display_form)?,
                in_elements: body.in_elements.clone(),
            })
        }
        Filter::NegativeAttributeFilter(body) => {
            AfmFilter::NegativeAttributeFilter(NegativeAttributeFilter {
                display_form: qualifier(&body.display_form)?,
                not_in: body.not_in.clone(),
            })
        }
        Filter::AbsoluteDateFilter(body) => AfmFilter::AbsoluteDateFilter(AbsoluteDateFilter {
            data_set: qualifier(&body.data_set)?,
            from: body.from.clone(),
            to: body.to.clone(),
        }),
        Filter::RelativeDateFilter(body) => AfmFilter::RelativeDateFilter(RelativeDateFilter {
            data_set: qualifier(&body.data_set)?,
            granularity: body.granularity,
            from: body.from,
            to: body.to,
        }),
        Filter::MeasureValueFilter(body) => {
            if let Some(MeasureValueFilterCondition::Compound(_)) = body.condition {
                return Err(BearError::Unsupported(
                    "compound measure value filter conditions".to_string(),
                ));
            }
            if !body.dimensionality.is_empty() || body.apply_on_result.is_some() {
                log::warn!(
                    "bear ignores dimensionality and apply_on_result of the filter on {}",
                    body.measure
                );
            }
            AfmFilter::MeasureValueFilter(MeasureValueFilter {
                measure: obj_qualifier(&body.measure)?,
                condition: body.condition.clone(),
            })
        }
        Filter::RankingFilter(body) => {
            if body.apply_on_result.is_some() {
                log::warn!("bear ignores apply_on_result of the ranking filter on {}", body.measure);
            }
            AfmFilter::RankingFilter(RankingFilter {
                measures: vec![obj_qualifier(&body.measure)?],
                attributes: body
                    .attributes
                    .iter()
                    .map(obj_qualifier)
                    .collect::<Result<Vec<_>>>()?,
                operator: body.operator,
                value: body.value,
            })
        }
    })
}

/// One entry per native total of every dimension, rolled up at the level of the dimension items
/// preceding the total's attribute. Equal entries from different dimensions are all kept.
fn native_totals(dimensions: &[Dimension]) -> Vec<NativeTotal> {
    let mut result: Vec<NativeTotal> = Vec::new();
    for dimension in dimensions {
        for total in dimension.totals.iter().filter(|total| total.is_native()) {
            let attribute_identifiers = dimension
                .item_identifiers
                .iter()
                .take_while(|item| **item != total.attribute_identifier)
                .filter(|item| item.as_str() != MEASURE_GROUP_IDENTIFIER)
                .cloned()
                .collect();
            result.push(NativeTotal {
                measure_identifier: total.measure_identifier.clone(),
                attribute_identifiers,
            });
        }
    }
    result
}
