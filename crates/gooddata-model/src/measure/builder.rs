//! Fluent construction of measures.
//!
//! Every measure kind is built through the same [`MeasureBuilder`]: the envelope methods
//! (`local_id`, `alias`, `format`, `title`) apply to any measure, the simple-measure methods
//! (`aggregation`, `ratio`, `filters`) are ignored for arithmetic and derived measures.
//!
//! Builders never invent local identifiers. Measures built without one get an identifier when
//! they are converted as part of an execution (see [`crate::execution::BucketConverter`]).

use super::{
    ArithmeticMeasureDefinition, ArithmeticMeasureOperator, Measure, MeasureAggregation,
    MeasureDefinition, PopMeasureDefinition, PreviousPeriodDateDataSet,
    PreviousPeriodMeasureDefinition, SimpleMeasureDefinition,
};
use crate::error::{ModelError, Result};
use crate::filter::MeasureFilter;
use crate::objref::{id_ref, ObjRef, ObjectType};

/// Operand of an arithmetic or derived measure: either the measure itself or its local
/// identifier.
#[derive(Clone, Copy, Debug)]
pub enum MeasureOrLocalId<'a> {
    Measure(&'a Measure),
    LocalId(&'a str),
}

impl<'a> MeasureOrLocalId<'a> {
    fn resolve(self) -> Result<String> {
        match self {
            MeasureOrLocalId::LocalId(id) => Ok(id.to_string()),
            MeasureOrLocalId::Measure(measure) => {
                measure.local_identifier().map(str::to_string).ok_or_else(|| {
                    ModelError::invalid(
                        "measure used as an operand must have a local identifier",
                    )
                })
            }
        }
    }
}

impl<'a> From<&'a Measure> for MeasureOrLocalId<'a> {
    fn from(value: &'a Measure) -> Self {
        MeasureOrLocalId::Measure(value)
    }
}

impl<'a> From<&'a str> for MeasureOrLocalId<'a> {
    fn from(value: &'a str) -> Self {
        MeasureOrLocalId::LocalId(value)
    }
}

impl<'a> From<&'a String> for MeasureOrLocalId<'a> {
    fn from(value: &'a String) -> Self {
        MeasureOrLocalId::LocalId(value.as_str())
    }
}

/// Previous-period data set given by its identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviousPeriodDateDataSetSimple {
    pub data_set: String,
    pub periods_ago: i32,
}

#[derive(Clone, Debug)]
pub struct MeasureBuilder {
    measure: Measure,
}

impl MeasureBuilder {
    fn from_definition(definition: MeasureDefinition) -> Self {
        Self {
            measure: Measure {
                local_identifier: None,
                definition,
                alias: None,
                format: None,
                title: None,
            },
        }
    }

    pub fn local_id(mut self, local_id: impl Into<String>) -> Self {
        let local_id = local_id.into();
        // Empty ids are treated as unset so the converter assigns one.
        self.measure.local_identifier = if local_id.is_empty() {
            None
        } else {
            Some(local_id)
        };
        self
    }

    pub fn no_local_id(mut self) -> Self {
        self.measure.local_identifier = None;
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.measure.alias = Some(alias.into());
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.measure.format = Some(format.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.measure.title = Some(title.into());
        self
    }

    pub fn aggregation(self, aggregation: MeasureAggregation) -> Self {
        self.with_simple(|def| def.aggregation = Some(aggregation))
    }

    pub fn no_aggregation(self) -> Self {
        self.with_simple(|def| def.aggregation = None)
    }

    pub fn ratio(self) -> Self {
        self.with_simple(|def| def.compute_ratio = true)
    }

    pub fn no_ratio(self) -> Self {
        self.with_simple(|def| def.compute_ratio = false)
    }

    pub fn filters(self, filters: Vec<MeasureFilter>) -> Self {
        self.with_simple(move |def| def.filters = filters)
    }

    pub fn build(self) -> Measure {
        self.measure
    }

    fn with_simple(mut self, update: impl FnOnce(&mut SimpleMeasureDefinition)) -> Self {
        match &mut self.measure.definition {
            MeasureDefinition::Simple(def) => update(def),
            _ => log::debug!(
                "ignoring simple-measure modification on non-simple measure {:?}",
                self.measure.local_identifier
            ),
        }
        self
    }
}

/// Starts a simple measure computed from a metric or fact.
pub fn new_measure(item: impl Into<ObjRef>) -> MeasureBuilder {
    MeasureBuilder::from_definition(MeasureDefinition::Simple(SimpleMeasureDefinition {
        item: item.into(),
        aggregation: None,
        filters: Vec::new(),
        compute_ratio: false,
    }))
}

pub fn new_arithmetic_measure(
    operands: &[MeasureOrLocalId<'_>],
    operator: ArithmeticMeasureOperator,
) -> Result<MeasureBuilder> {
    let measure_identifiers = operands
        .iter()
        .map(|operand| operand.resolve())
        .collect::<Result<Vec<_>>>()?;

    Ok(MeasureBuilder::from_definition(
        MeasureDefinition::Arithmetic(ArithmeticMeasureDefinition {
            measure_identifiers,
            operator,
        }),
    ))
}

pub fn new_pop_measure<'a>(
    master: impl Into<MeasureOrLocalId<'a>>,
    pop_attribute: impl Into<ObjRef>,
) -> Result<MeasureBuilder> {
    let measure_identifier = master.into().resolve()?;

    Ok(MeasureBuilder::from_definition(MeasureDefinition::PoP(
        PopMeasureDefinition {
            measure_identifier,
            pop_attribute: pop_attribute.into(),
        },
    )))
}

pub fn new_previous_period_measure<'a>(
    master: impl Into<MeasureOrLocalId<'a>>,
    date_data_sets: &[PreviousPeriodDateDataSetSimple],
) -> Result<MeasureBuilder> {
    let measure_identifier = master.into().resolve()?;
    let date_data_sets = date_data_sets
        .iter()
        .map(|d| PreviousPeriodDateDataSet {
            data_set: id_ref(d.data_set.clone(), Some(ObjectType::DataSet)),
            periods_ago: d.periods_ago,
        })
        .collect();

    Ok(MeasureBuilder::from_definition(
        MeasureDefinition::PreviousPeriod(PreviousPeriodMeasureDefinition {
            measure_identifier,
            date_data_sets,
        }),
    ))
}

/// Re-opens an existing measure for modification. The input measure is left intact.
pub fn modify_measure(measure: &Measure) -> MeasureBuilder {
    MeasureBuilder {
        measure: measure.clone(),
    }
}

pub fn with_aggregation(measure: &Measure, aggregation: MeasureAggregation) -> Measure {
    modify_measure(measure).aggregation(aggregation).build()
}

pub fn with_ratio(measure: &Measure, compute_ratio: bool) -> Measure {
    let builder = modify_measure(measure);
    if compute_ratio {
        builder.ratio().build()
    } else {
        builder.no_ratio().build()
    }
}

pub fn with_filters(measure: &Measure, filters: Vec<MeasureFilter>) -> Measure {
    modify_measure(measure).filters(filters).build()
}

/// Returns the measure with compute ratio turned off; measures without ratio are returned as-is.
pub fn measure_disable_compute_ratio(measure: &Measure) -> Measure {
    with_ratio(measure, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::measure_does_compute_ratio;
    use pretty_assertions::assert_eq;

    #[test]
    fn operand_measure_without_local_id_is_rejected() {
        let unnamed = new_measure("m.revenue").build();
        let err = new_pop_measure(&unnamed, "date.year").unwrap_err();
        assert!(matches!(err, ModelError::InvalidInput(_)));
    }

    #[test]
    fn modify_measure_leaves_input_untouched() {
        let original = new_measure("m.revenue").local_id("m1").ratio().build();
        let modified = measure_disable_compute_ratio(&original);

        assert!(measure_does_compute_ratio(&original));
        assert!(!measure_does_compute_ratio(&modified));
        assert_eq!(modified.local_identifier(), Some("m1"));
    }

    #[test]
    fn simple_only_modifications_are_ignored_on_arithmetic() {
        let arithmetic =
            new_arithmetic_measure(&["m1".into(), "m2".into()], ArithmeticMeasureOperator::Ratio)
                .unwrap()
                .local_id("m3")
                .build();
        let ratio = with_ratio(&arithmetic, true);
        assert_eq!(ratio, arithmetic);
    }

    #[test]
    fn previous_period_uses_data_set_identifiers() {
        let measure = new_previous_period_measure(
            "m1",
            &[PreviousPeriodDateDataSetSimple {
                data_set: "date.dataset".to_string(),
                periods_ago: 1,
            }],
        )
        .unwrap()
        .build();

        let MeasureDefinition::PreviousPeriod(def) = &measure.definition else {
            panic!("expected previous period measure");
        };
        assert_eq!(def.measure_identifier, "m1");
        assert_eq!(
            def.date_data_sets[0].data_set,
            id_ref("date.dataset", Some(ObjectType::DataSet))
        );
    }
}
