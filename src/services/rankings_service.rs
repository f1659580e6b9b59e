use crate::config::AppConfig;
use crate::models::questionnaire::Questionnaire;
use crate::utils::error::AppError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub text: Option<String>,
}

/// The single prompt sent to the completion API.
pub fn build_prompt(response: &Questionnaire) -> String {
    format!(
        "Given that a student prefers a {} university and wants to major in {}, what are the top 10 college recommendations?",
        response.preference, response.major
    )
}

/// Pulls the first completion's text out of the API response.
pub fn extract_rankings(response: CompletionResponse) -> Result<String, AppError> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.text)
        .map(|text| text.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(AppError::Upstream(
            "Completion response contained no text".to_string(),
        ));
    }

    Ok(text)
}

/// Forwards the validated questionnaire to the completion API and returns
/// the ranked college list. One POST per call; no caching, no retry.
pub async fn get_college_rankings(
    http: &reqwest::Client,
    config: &AppConfig,
    response: &Questionnaire,
) -> Result<String, AppError> {
    response.validate()?;

    let prompt = build_prompt(response);
    log::info!("🎓 Requesting college rankings for major: {}", response.major);

    let payload = CompletionRequest {
        model: &config.openai_model,
        prompt: &prompt,
        max_tokens: config.openai_max_tokens,
    };

    let api_response = http
        .post(&config.openai_completions_url)
        .header("Authorization", format!("Bearer {}", config.openai_api_key))
        .json(&payload)
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to reach completion API: {}", e)))?;

    if !api_response.status().is_success() {
        return Err(AppError::Upstream(format!(
            "Completion API returned {}",
            api_response.status()
        )));
    }

    let completion: CompletionResponse = api_response
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to parse completion response: {}", e)))?;

    extract_rankings(completion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_preference_and_major() {
        let questionnaire = Questionnaire {
            major: "Computer Science".to_string(),
            preference: "public".to_string(),
        };
        assert_eq!(
            build_prompt(&questionnaire),
            "Given that a student prefers a public university and wants to major in Computer Science, what are the top 10 college recommendations?"
        );
    }

    #[test]
    fn test_extract_first_choice_trimmed() {
        let completion: CompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [
                { "text": "\n1. UC Berkeley\n2. UCLA\n" },
                { "text": "ignored second choice" }
            ]
        }))
        .unwrap();

        assert_eq!(
            extract_rankings(completion).unwrap(),
            "1. UC Berkeley\n2. UCLA"
        );
    }

    #[test]
    fn test_missing_choices_is_a_server_error_not_a_panic() {
        let completion: CompletionResponse =
            serde_json::from_value(serde_json::json!({ "id": "cmpl-123" })).unwrap();
        assert!(matches!(
            extract_rankings(completion),
            Err(AppError::Upstream(_))
        ));
    }

    #[test]
    fn test_empty_choices_and_empty_text_are_errors() {
        let completion: CompletionResponse =
            serde_json::from_value(serde_json::json!({ "choices": [] })).unwrap();
        assert!(extract_rankings(completion).is_err());

        let completion: CompletionResponse =
            serde_json::from_value(serde_json::json!({ "choices": [{ "text": "   " }] })).unwrap();
        assert!(extract_rankings(completion).is_err());

        let completion: CompletionResponse =
            serde_json::from_value(serde_json::json!({ "choices": [{}] })).unwrap();
        assert!(extract_rankings(completion).is_err());
    }
}
