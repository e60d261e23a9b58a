//! Bear execution request payload.
//!
//! Shapes shared with the backend-agnostic model (attribute elements, conditions, sorts,
//! dimensions) reuse the model types directly.

use gooddata_model::{
    ArithmeticMeasureOperator, AttributeElements, DateGranularity, Dimension, MeasureAggregation,
    MeasureValueFilterCondition, RankingFilterOperator, SortItem,
};
use serde::{Deserialize, Serialize};

/// Reference to a metadata object.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Qualifier {
    Uri { uri: String },
    Identifier { identifier: String },
}

/// Reference to a metadata object or to an item of the same execution.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjQualifier {
    Qualifier(Qualifier),
    LocalIdentifier {
        #[serde(rename = "localIdentifier")]
        local_identifier: String,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AfmAttribute {
    pub local_identifier: String,
    pub display_form: Qualifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleMeasure {
    pub item: Qualifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<MeasureAggregation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<AfmFilter>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub compute_ratio: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopMeasure {
    pub measure_identifier: String,
    pub pop_attribute: Qualifier,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousPeriodDateDataSet {
    pub data_set: Qualifier,
    pub periods_ago: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousPeriodMeasure {
    pub measure_identifier: String,
    pub date_data_sets: Vec<PreviousPeriodDateDataSet>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArithmeticMeasure {
    pub measure_identifiers: Vec<String>,
    pub operator: ArithmeticMeasureOperator,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AfmMeasureDefinition {
    Measure(SimpleMeasure),
    PopMeasure(PopMeasure),
    PreviousPeriodMeasure(PreviousPeriodMeasure),
    ArithmeticMeasure(ArithmeticMeasure),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AfmMeasure {
    pub local_identifier: String,
    pub definition: AfmMeasureDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositiveAttributeFilter {
    pub display_form: Qualifier,
    #[serde(rename = "in")]
    pub in_elements: AttributeElements,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegativeAttributeFilter {
    pub display_form: Qualifier,
    pub not_in: AttributeElements,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsoluteDateFilter {
    pub data_set: Qualifier,
    pub from: String,
    pub to: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeDateFilter {
    pub data_set: Qualifier,
    pub granularity: DateGranularity,
    pub from: i32,
    pub to: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureValueFilter {
    pub measure: ObjQualifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<MeasureValueFilterCondition>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingFilter {
    pub measures: Vec<ObjQualifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<ObjQualifier>,
    pub operator: RankingFilterOperator,
    pub value: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AfmFilter {
    PositiveAttributeFilter(PositiveAttributeFilter),
    NegativeAttributeFilter(NegativeAttributeFilter),
    AbsoluteDateFilter(AbsoluteDateFilter),
    RelativeDateFilter(RelativeDateFilter),
    MeasureValueFilter(MeasureValueFilter),
    RankingFilter(RankingFilter),
}

/// Total the backend rolls up natively, at the level of the listed attributes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeTotal {
    pub measure_identifier: String,
    pub attribute_identifiers: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Afm {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AfmAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub measures: Vec<AfmMeasure>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<AfmFilter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub native_totals: Vec<NativeTotal>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSpec {
    pub dimensions: Vec<Dimension>,
    #[serde(default)]
    pub sorts: Vec<SortItem>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionBody {
    pub afm: Afm,
    pub result_spec: ResultSpec,
}

/// `{"execution": {"afm": .., "resultSpec": ..}}`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BearExecution {
    pub execution: ExecutionBody,
}
