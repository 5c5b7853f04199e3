//! # Nutrition Facts Client
//!
//! Client for the Nutritionix natural-language nutrients endpoint. One request
//! carries the whole recipe as a comma-separated query and the service answers
//! with one food record per recognized item.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::analysis_config::NutritionServiceConfig;
use crate::analysis_errors::{AnalysisError, Result};

/// A service that resolves a natural-language food query into food records
#[async_trait]
pub trait NutritionSource: Send + Sync {
    /// Return the matched foods, in query order
    async fn foods(&self, query: &str) -> Result<Vec<FoodRecord>>;
}

/// Nutrition facts for one matched food, per serving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    /// Name of the food the service matched
    pub food_name: String,
    #[serde(default)]
    pub serving_qty: Option<f64>,
    #[serde(default)]
    pub serving_unit: Option<String>,
    /// Weight of one serving in grams
    #[serde(default)]
    pub serving_weight_grams: Option<f64>,
    /// Carbohydrates in one serving, in grams
    #[serde(default)]
    pub nf_total_carbohydrate: Option<f64>,
}

impl FoodRecord {
    pub fn new(food_name: &str, serving_weight_grams: f64, total_carbohydrate: f64) -> Self {
        Self {
            food_name: food_name.to_string(),
            serving_qty: None,
            serving_unit: None,
            serving_weight_grams: Some(serving_weight_grams),
            nf_total_carbohydrate: Some(total_carbohydrate),
        }
    }

    /// Carbohydrate grams per gram of food.
    ///
    /// A missing, zero, negative or non-finite serving weight gives `0.0`;
    /// a missing carbohydrate figure counts as `0.0`.
    pub fn carbs_per_gram(&self) -> f64 {
        let carbs = self.nf_total_carbohydrate.unwrap_or(0.0);
        match self.serving_weight_grams {
            Some(weight) if weight.is_finite() && weight > 0.0 => {
                let ratio = carbs / weight;
                if ratio.is_finite() && ratio > 0.0 {
                    ratio
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }
}

#[derive(Debug, Serialize)]
struct NutrientsRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct NutrientsResponse {
    foods: Vec<FoodRecord>,
}

/// Nutritionix API client
pub struct NutritionixClient {
    http_client: Client,
    config: NutritionServiceConfig,
}

impl NutritionixClient {
    /// Create a client whose requests time out after `config.timeout_secs`
    pub fn new(config: NutritionServiceConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AnalysisError::NutritionServiceFailure(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }
}

#[async_trait]
impl NutritionSource for NutritionixClient {
    async fn foods(&self, query: &str) -> Result<Vec<FoodRecord>> {
        let url = format!(
            "{}/v2/natural/nutrients",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .http_client
            .post(&url)
            .header("x-app-id", &self.config.app_id)
            .header("x-app-key", &self.config.api_key)
            .json(&NutrientsRequest { query })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Nutrition request failed");
                AnalysisError::NutritionServiceFailure(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(status = %status, body = %error_body, "Nutrition service returned an error status");
            return Err(AnalysisError::NutritionServiceFailure(format!(
                "HTTP {status}: {error_body}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::NutritionServiceFailure(e.to_string()))?;

        let foods = parse_nutrients_response(&body)?;
        debug!(foods_count = foods.len(), "Nutrition service response parsed");
        Ok(foods)
    }
}

/// Decode a natural-nutrients response body
pub fn parse_nutrients_response(body: &str) -> Result<Vec<FoodRecord>> {
    serde_json::from_str::<NutrientsResponse>(body)
        .map(|response| response.foods)
        .map_err(|e| {
            error!(error = %e, body = %body, "Failed to decode nutrition response");
            AnalysisError::MalformedResponse(format!("nutrition response: {e}"))
        })
}
