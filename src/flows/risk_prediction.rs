//! Disease risk prediction flow
//!
//! Predicts heart disease, diabetes, stroke and kidney disease risk scores
//! from patient health metrics, with AI-powered lifestyle suggestions.

use serde::{Deserialize, Serialize};

use crate::error::{DefinitionResult, FlowResult};
use crate::flow::{FlowDefinition, FlowExecutor};
use crate::invoker::ModelInvoker;
use crate::schema::{Field, Schema};

pub const FLOW_NAME: &str = "disease-risk-prediction";

const TEMPLATE: &str = "\
You are an AI assistant that predicts disease risks and provides suggestions.

Based on the following patient data, predict the risk scores for heart disease, diabetes, stroke, and kidney disease (between 0 and 1).
Also, provide AI-powered suggestions based on the risk scores.

Patient Data:
Age: {{{age}}}
Gender: {{{gender}}}
BMI: {{{bmi}}}
Systolic Blood Pressure: {{{systolicBloodPressure}}}
Diastolic Blood Pressure: {{{diastolicBloodPressure}}}
Cholesterol: {{{cholesterol}}}
Smoking: {{{smoking}}}
Activity Level: {{{activityLevel}}}
Family History: {{{familyHistory}}}

Output the risk scores as floating point numbers between 0 and 1. Output the suggestions as a paragraph.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Low,
    Moderate,
    High,
}

/// Patient health metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseRiskInput {
    pub age: u32,
    pub gender: Gender,
    pub bmi: f64,
    pub systolic_blood_pressure: u32,
    pub diastolic_blood_pressure: u32,
    pub cholesterol: u32,
    pub smoking: bool,
    pub activity_level: ActivityLevel,
    pub family_history: bool,
}

/// Predicted risk scores, each between 0 and 1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseRiskOutput {
    pub heart_disease_risk: f64,
    pub diabetes_risk: f64,
    pub stroke_risk: f64,
    pub kidney_disease_risk: f64,
    pub suggestions: String,
}

/// Flow definition for disease risk prediction
pub fn definition() -> DefinitionResult<FlowDefinition> {
    let input_schema = Schema::new(vec![
        Field::number("age", "The age of the patient."),
        Field::choice("gender", &["male", "female"], "The gender of the patient."),
        Field::number("bmi", "The body mass index of the patient."),
        Field::number(
            "systolicBloodPressure",
            "The systolic blood pressure of the patient.",
        ),
        Field::number(
            "diastolicBloodPressure",
            "The diastolic blood pressure of the patient.",
        ),
        Field::number("cholesterol", "The cholesterol level of the patient."),
        Field::boolean("smoking", "Whether the patient is a smoker."),
        Field::choice(
            "activityLevel",
            &["low", "moderate", "high"],
            "The activity level of the patient.",
        ),
        Field::boolean(
            "familyHistory",
            "Whether the patient has a family history of the disease.",
        ),
    ])?;

    let output_schema = Schema::new(vec![
        Field::number("heartDiseaseRisk", "The risk score for heart disease (0-1)."),
        Field::number("diabetesRisk", "The risk score for diabetes (0-1)."),
        Field::number("strokeRisk", "The risk score for stroke (0-1)."),
        Field::number("kidneyDiseaseRisk", "The risk score for kidney disease (0-1)."),
        Field::text("suggestions", "AI-powered suggestions based on the risk scores."),
    ])?;

    FlowDefinition::new(
        FLOW_NAME,
        "Predicts disease risk scores from patient health data and suggests lifestyle improvements.",
        input_schema,
        output_schema,
        TEMPLATE,
    )
}

/// Predict disease risks for one patient.
pub async fn predict_disease_risk<C: ModelInvoker>(
    executor: &FlowExecutor<C>,
    input: &DiseaseRiskInput,
) -> FlowResult<DiseaseRiskOutput> {
    executor.invoke_typed(FLOW_NAME, input).await
}
