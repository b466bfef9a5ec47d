use serde::Serialize;
use tracing::{debug, warn};
use ureq::Agent;

use super::ApiFailure;
use super::response::{build_prompt, parse_generated_answer, parse_species_label};
use crate::config::{ApiConfig, GenerationParams};

/// JSON body for the text generation endpoint.
#[derive(Debug, Serialize)]
struct GenerationRequest {
    inputs: String,
    parameters: GenerationParams,
}

/// Blocking client for the image classification and text generation
/// endpoints.
///
/// HTTP error statuses are returned as responses rather than transport
/// errors so the body can be reported back to the caller. No timeout and no
/// retries are configured.
pub struct InferenceClient {
    agent: Agent,
    config: ApiConfig,
    params: GenerationParams,
}

impl InferenceClient {
    pub fn new(config: ApiConfig) -> Self {
        let agent_config = Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: Agent::new_with_config(agent_config),
            config,
            params: GenerationParams::default(),
        }
    }

    #[must_use]
    pub fn with_generation_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Send raw image bytes to the classifier and return the top label.
    pub fn identify_species(&self, image: &[u8]) -> Result<String, ApiFailure> {
        debug!(
            url = %self.config.image_model_url,
            image_len = image.len(),
            "Identifying species"
        );

        let result = self
            .agent
            .post(&self.config.image_model_url)
            .header("Authorization", &self.bearer())
            .header("Content-Type", "application/octet-stream")
            .send(image);

        let body = read_success_body(result)?;
        parse_species_label(&body).ok_or_else(|| malformed(body))
    }

    /// Ask the text generation model `query` with `context` prepended and
    /// return the generated answer.
    pub fn answer_question(&self, query: &str, context: &str) -> Result<String, ApiFailure> {
        let request = GenerationRequest {
            inputs: build_prompt(query, context),
            parameters: self.params,
        };
        debug!(
            url = %self.config.text_model_url,
            prompt_len = request.inputs.len(),
            max_new_tokens = self.params.max_new_tokens,
            temperature = self.params.temperature,
            "Querying text generation model"
        );

        let result = self
            .agent
            .post(&self.config.text_model_url)
            .header("Authorization", &self.bearer())
            .send_json(&request);

        let body = read_success_body(result)?;
        parse_generated_answer(&body).ok_or_else(|| malformed(body))
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.config.api_key)
    }
}

/// Body of a 200 response; anything else becomes an [`ApiFailure`].
fn read_success_body(
    result: Result<ureq::http::Response<ureq::Body>, ureq::Error>,
) -> Result<String, ApiFailure> {
    let mut response = result.map_err(|err| {
        warn!(error = %err, "Inference request failed");
        ApiFailure {
            status: None,
            detail: err.to_string(),
        }
    })?;

    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|err| ApiFailure {
            status: Some(status),
            detail: err.to_string(),
        })?;

    if status != 200 {
        warn!(status = status, body = %body, "Inference endpoint returned an error");
        return Err(ApiFailure {
            status: Some(status),
            detail: body,
        });
    }
    Ok(body)
}

fn malformed(body: String) -> ApiFailure {
    warn!(body = %body, "Unexpected inference response shape");
    ApiFailure {
        status: Some(200),
        detail: body,
    }
}
