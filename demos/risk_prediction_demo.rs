//! Disease Risk Prediction Demo
//!
//! This example demonstrates the complete flow execution pipeline:
//! 1. List the registered hospital flows
//! 2. Preview the rendered prompt for a sample patient
//! 3. Run the disease risk prediction flow end to end
//! 4. Run two triage invocations concurrently
//!
//! Usage:
//! export GEMINI_API_KEY="your-api-key"
//! cargo run --example risk_prediction_demo

use std::env;

use async_trait::async_trait;
use serde_json::{json, Value};

use medisys_ai::error::InvokeResult;
use medisys_ai::flow::FlowExecutor;
use medisys_ai::flows::{self, risk_prediction, triage};
use medisys_ai::flows::risk_prediction::{ActivityLevel, DiseaseRiskInput, Gender};
use medisys_ai::invoker::{GeminiInvoker, ModelInvoker};
use medisys_ai::render::PromptRenderer;
use medisys_ai::schema::Schema;

/// Stand-in model for running the demo without an API key. Picks a canned
/// response by looking at which fields the flow expects back.
struct SimulatedInvoker;

#[async_trait]
impl ModelInvoker for SimulatedInvoker {
    async fn invoke(&self, _prompt: &str, output_schema: &Schema) -> InvokeResult<Value> {
        if output_schema.field("heartDiseaseRisk").is_some() {
            Ok(json!({
                "heartDiseaseRisk": 0.3,
                "diabetesRisk": 0.2,
                "strokeRisk": 0.1,
                "kidneyDiseaseRisk": 0.15,
                "suggestions": "Maintain a balanced diet, keep up moderate activity, and schedule an annual blood pressure check."
            }))
        } else if output_schema.field("suggestedPriority").is_some() {
            Ok(json!({
                "suggestedDoctor": "Dr. Patel (General Medicine)",
                "suggestedPriority": "medium",
                "suggestedTests": "CBC, basic metabolic panel"
            }))
        } else {
            Ok(json!({ "response": "This is a simulated response." }))
        }
    }

    fn model_name(&self) -> &str {
        "simulated"
    }
}

fn sample_patient() -> DiseaseRiskInput {
    DiseaseRiskInput {
        age: 45,
        gender: Gender::Male,
        bmi: 25.0,
        systolic_blood_pressure: 120,
        diastolic_blood_pressure: 80,
        cholesterol: 200,
        smoking: false,
        activity_level: ActivityLevel::Moderate,
        family_history: false,
    }
}

async fn run_flows<C: ModelInvoker>(executor: &FlowExecutor<C>) -> Result<(), Box<dyn std::error::Error>> {
    // Demo 3: disease risk prediction, typed end to end
    println!("\n🩺 Demo 3: Disease Risk Prediction");
    println!("{}", "-".repeat(40));

    let output = risk_prediction::predict_disease_risk(executor, &sample_patient()).await?;
    println!("   Heart disease risk:  {:.2}", output.heart_disease_risk);
    println!("   Diabetes risk:       {:.2}", output.diabetes_risk);
    println!("   Stroke risk:         {:.2}", output.stroke_risk);
    println!("   Kidney disease risk: {:.2}", output.kidney_disease_risk);
    println!("   Suggestions: {}", output.suggestions);

    // Demo 4: two triage requests in flight at once
    println!("\n🚑 Demo 4: Concurrent Triage Suggestions");
    println!("{}", "-".repeat(40));

    let first = executor.invoke(
        triage::FLOW_NAME,
        json!({"symptoms": "fever", "vitals": "BP 140/90"}),
    );
    let second = executor.invoke(
        triage::FLOW_NAME,
        json!({"symptoms": "cough", "vitals": "BP 120/80"}),
    );
    let (first, second) = tokio::join!(first, second);

    for invocation in [first?, second?] {
        println!(
            "   [{}] priority={} doctor={}",
            invocation.invocation_id,
            invocation.output["suggestedPriority"],
            invocation.output["suggestedDoctor"]
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("🏥 MediSys AI Flow Demo");
    println!("{}", "=".repeat(60));
    println!("Typed prompt flows: validate input, render, invoke, validate output");

    let registry = flows::registry()?;

    // Demo 1: registered flows
    println!("\n📋 Demo 1: Registered Flows");
    println!("{}", "-".repeat(40));
    for name in registry.names() {
        let definition = registry.get(name).expect("registered flow");
        println!("   {} - {}", name, definition.description());
    }

    // Demo 2: prompt preview for the sample patient
    println!("\n📝 Demo 2: Rendered Prompt Preview");
    println!("{}", "-".repeat(40));
    let renderer = PromptRenderer::new();
    let definition = registry
        .get(risk_prediction::FLOW_NAME)
        .expect("risk flow is registered");
    let input_value = serde_json::to_value(sample_patient())?;
    let prompt = renderer.render(definition.template(), &input_value)?;
    for line in prompt.lines().take(8) {
        println!("   {}", line);
    }
    println!("   ...");

    // Demo 3/4: run with the real model when a key is present
    match env::var("GEMINI_API_KEY") {
        Ok(_) => {
            println!("\n✅ GEMINI_API_KEY found - using the Gemini API");
            let invoker = GeminiInvoker::from_env()?;
            let executor = FlowExecutor::new(registry, invoker);
            run_flows(&executor).await?;
        }
        Err(_) => {
            println!("\n🎭 GEMINI_API_KEY not set - running in simulation mode");
            let executor = FlowExecutor::new(registry, SimulatedInvoker);
            run_flows(&executor).await?;
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("✅ Demo complete");
    Ok(())
}
