use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use base64ct::{Base64, Encoding};
use bytes::Bytes;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{parse::parse_payload, AnalysisError};
use crate::config::AnalysisConfig;
use crate::nutrition::NutritionPayload;

/// Turns a meal photo into a nutrition breakdown.
#[async_trait]
pub trait NutritionAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        image: Bytes,
        content_type: &str,
    ) -> Result<NutritionPayload, AnalysisError>;
}

const PROMPT: &str = "You are a nutrition analysis assistant. I will provide you with a photo of a meal. \
Your task is to:\n\n\
1. Identify the food items in the photo.\n\
2. Estimate the total calories for the meal.\n\
3. Provide a detailed macronutrient breakdown:\n\
- Carbohydrates (g)\n\
- Protein (g)\n\
- Fat (g)\n\
4. Estimate the approximate weight (in grams) of the meal or each major food item.\n\
5. Calculate a simple \"health index\" for the meal on a scale of 1 to 10, \
where 1 = unhealthy (very high sugar/fat, low nutrition) and 10 = very healthy (balanced macros, nutrient dense).\n\
6. Return the output strictly in **structured JSON format** as follows:\n\n\
```json\n\
{\n  \"meal_items\": [\n    {\n      \"name\": \"string\",\n      \"estimated_weight_g\": number,\n      \
\"calories\": number,\n      \"macronutrients\": {\n        \"carbohydrates_g\": number,\n        \
\"protein_g\": number,\n        \"fat_g\": number\n      }\n    }\n  ],\n  \"total\": {\n    \
\"estimated_weight_g\": number,\n    \"calories\": number,\n    \"carbohydrates_g\": number,\n    \
\"protein_g\": number,\n    \"fat_g\": number\n  },\n  \"health_index\": number\n}\n\
```";

/// Chat-completions client for OpenAI-compatible vision models.
pub struct OpenAiAnalyzer {
    client: Client,
    config: AnalysisConfig,
}

impl OpenAiAnalyzer {
    pub fn new(config: AnalysisConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("build analysis http client")?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request_body(&self, image: &[u8], content_type: &str) -> Value {
        let data_url = format!(
            "data:{};base64,{}",
            content_type,
            Base64::encode_string(image)
        );
        json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": PROMPT },
                    { "type": "image_url", "image_url": {
                        "url": data_url,
                        "detail": self.config.image_detail,
                    }},
                ],
            }],
        })
    }
}

/// Upstream error bodies stay in the logs; callers only see the status.
fn rejected(status: reqwest::StatusCode) -> AnalysisError {
    AnalysisError::Unavailable(format!("analysis service returned {status}"))
}

/// `choices[0].message.content` of a chat-completions response.
fn message_content(response: &Value) -> Option<&str> {
    response["choices"][0]["message"]["content"].as_str()
}

#[async_trait]
impl NutritionAnalyzer for OpenAiAnalyzer {
    async fn analyze(
        &self,
        image: Bytes,
        content_type: &str,
    ) -> Result<NutritionPayload, AnalysisError> {
        let body = self.request_body(&image, content_type);
        debug!(model = %self.config.model, bytes = image.len(), "sending analysis request");

        let res = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::Unavailable(format!("analysis request failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            warn!(%status, body = %text, "analysis request rejected");
            return Err(rejected(status));
        }

        let json: Value = res
            .json()
            .await
            .map_err(|e| AnalysisError::Unavailable(format!("unreadable analysis response: {e}")))?;
        let content = message_content(&json).ok_or_else(|| {
            AnalysisError::Unavailable("no message content in analysis response".into())
        })?;

        parse_payload(content).inspect_err(|e| {
            warn!(error = %e, raw_len = content.len(), "analysis parse failed");
        })
    }
}
