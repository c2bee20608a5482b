//! One-off rent prediction from terminal prompts.

use dialoguer::{Input, Select};
use rent_predictor_inference::{InferenceError, predict_rent};
use rent_predictor_model::ModelHandle;
use rent_predictor_property::{FormInput, RawPropertyForm, form_fields};
use rent_predictor_server::ServerConfig;
use rent_predictor_server_models::ApiPrediction;
use serde_json::{Map, Value};

/// Prompts for every form field, keyed by schema column.
fn prompt_form() -> Result<RawPropertyForm, Box<dyn std::error::Error>> {
    let mut answers = Map::new();

    for field in form_fields() {
        let prompt = format!("{} ({})", field.caption, field.caption_en);
        let answer = match &field.input {
            FormInput::Text => Input::<String>::new().with_prompt(prompt).interact_text()?,
            FormInput::Number { default, .. } => Input::new()
                .with_prompt(prompt)
                .default(default.to_string())
                .interact_text()?,
            FormInput::Select { options, default } => {
                let labels: Vec<&str> = options.iter().map(|o| o.label).collect();
                let selected = options
                    .iter()
                    .position(|o| o.value == *default)
                    .unwrap_or(0);
                let idx = Select::new()
                    .with_prompt(prompt)
                    .items(&labels)
                    .default(selected)
                    .interact()?;
                options[idx].value.to_string()
            }
        };
        answers.insert(field.column.to_string(), Value::String(answer));
    }

    Ok(serde_json::from_value(Value::Object(answers))?)
}

/// Loads the model, prompts for a property and prints its predicted rent.
///
/// Invalid answers are reported without failing.
pub fn run(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let model = ModelHandle::load(&config.model_path)?;
    let form = prompt_form()?;
    log::debug!("Submitting {form:?}");

    match predict_rent(&model, &form) {
        Ok(prediction) => {
            println!();
            println!("{}", ApiPrediction::from(prediction).message);
        }
        Err(InferenceError::Validation(e)) => {
            println!();
            println!("Invalid input: {e}");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
