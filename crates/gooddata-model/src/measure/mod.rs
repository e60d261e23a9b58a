use serde::{Deserialize, Serialize};

use crate::filter::MeasureFilter;
use crate::objref::ObjRef;

mod builder;

pub use builder::{
    measure_disable_compute_ratio, modify_measure, new_arithmetic_measure, new_measure,
    new_pop_measure, new_previous_period_measure, with_aggregation, with_filters, with_ratio,
    MeasureBuilder, MeasureOrLocalId, PreviousPeriodDateDataSetSimple,
};

/// Aggregation applied when a simple measure is computed from a fact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureAggregation {
    Sum,
    Count,
    Avg,
    Min,
    Max,
    Median,
    Runsum,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArithmeticMeasureOperator {
    Sum,
    Difference,
    Multiplication,
    Ratio,
    Change,
}

/// Measure backed by a metric or a fact.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleMeasureDefinition {
    pub item: ObjRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<MeasureAggregation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<MeasureFilter>,
    /// Compute the value as a share of the total instead of the absolute value.
    #[serde(default, skip_serializing_if = "crate::serde_defaults::is_false")]
    pub compute_ratio: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArithmeticMeasureDefinition {
    pub measure_identifiers: Vec<String>,
    pub operator: ArithmeticMeasureOperator,
}

/// Period-over-period measure: the master measure computed for the previous period of the date
/// attribute.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopMeasureDefinition {
    pub measure_identifier: String,
    pub pop_attribute: ObjRef,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousPeriodDateDataSet {
    pub data_set: ObjRef,
    pub periods_ago: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousPeriodMeasureDefinition {
    pub measure_identifier: String,
    pub date_data_sets: Vec<PreviousPeriodDateDataSet>,
}

/// Measure definition variants, serialized under their historical wrapper keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasureDefinition {
    #[serde(rename = "measureDefinition")]
    Simple(SimpleMeasureDefinition),
    #[serde(rename = "arithmeticMeasure")]
    Arithmetic(ArithmeticMeasureDefinition),
    #[serde(rename = "popMeasureDefinition")]
    PoP(PopMeasureDefinition),
    #[serde(rename = "previousPeriodMeasure")]
    PreviousPeriod(PreviousPeriodMeasureDefinition),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_identifier: Option<String>,
    pub definition: MeasureDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Measure {
    pub fn local_identifier(&self) -> Option<&str> {
        self.local_identifier.as_deref()
    }

    pub fn simple_definition(&self) -> Option<&SimpleMeasureDefinition> {
        match &self.definition {
            MeasureDefinition::Simple(def) => Some(def),
            _ => None,
        }
    }

    pub fn is_simple(&self) -> bool {
        matches!(self.definition, MeasureDefinition::Simple(_))
    }

    pub fn is_derived(&self) -> bool {
        matches!(
            self.definition,
            MeasureDefinition::PoP(_) | MeasureDefinition::PreviousPeriod(_)
        )
    }
}

pub fn measure_local_id(measure: &Measure) -> Option<&str> {
    measure.local_identifier()
}

/// Backend object the simple measure is computed from.
pub fn measure_item(measure: &Measure) -> Option<&ObjRef> {
    measure.simple_definition().map(|def| &def.item)
}

pub fn measure_does_compute_ratio(measure: &Measure) -> bool {
    measure
        .simple_definition()
        .is_some_and(|def| def.compute_ratio)
}

/// Local identifier of the master measure of a PoP or previous-period measure.
pub fn measure_master_identifier(measure: &Measure) -> Option<&str> {
    match &measure.definition {
        MeasureDefinition::PoP(def) => Some(&def.measure_identifier),
        MeasureDefinition::PreviousPeriod(def) => Some(&def.measure_identifier),
        _ => None,
    }
}

pub fn measure_arithmetic_operands(measure: &Measure) -> Option<&[String]> {
    match &measure.definition {
        MeasureDefinition::Arithmetic(def) => Some(&def.measure_identifiers),
        _ => None,
    }
}

/// Local identifiers of every measure this measure is computed from.
pub fn measure_dependencies(measure: &Measure) -> Vec<&str> {
    match &measure.definition {
        MeasureDefinition::Simple(_) => Vec::new(),
        MeasureDefinition::Arithmetic(def) => {
            def.measure_identifiers.iter().map(String::as_str).collect()
        }
        MeasureDefinition::PoP(def) => vec![def.measure_identifier.as_str()],
        MeasureDefinition::PreviousPeriod(def) => vec![def.measure_identifier.as_str()],
    }
}
