use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Candidate food item returned by the image-analysis collaborator. The
/// shape doubles as the initial values for new food-item records; no
/// validation is applied beyond the usual numeric defaulting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizedFood {
    pub name: String,
    pub quantity: String,
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vitamins: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minerals: Option<BTreeMap<String, f64>>,
}

/// External food-recognition service. The core only consumes the candidate
/// list; what happens to the image is the collaborator's business.
#[async_trait]
pub trait FoodRecognizer: Send + Sync {
    async fn analyze(&self, image: Bytes, content_type: &str)
        -> anyhow::Result<Vec<RecognizedFood>>;
}

/// Stand-in recognizer used when no real service is configured. Returns a
/// fixed candidate list so clients can exercise the flow end to end.
pub struct MockRecognizer;

#[async_trait]
impl FoodRecognizer for MockRecognizer {
    async fn analyze(
        &self,
        _image: Bytes,
        _content_type: &str,
    ) -> anyhow::Result<Vec<RecognizedFood>> {
        tracing::debug!("no recognition service configured, returning mock candidates");
        Ok(vec![
            RecognizedFood {
                name: "Mock Analyzed Apple".into(),
                quantity: "1 medium".into(),
                calories: 95.0,
                protein: 0.5,
                carbs: 25.0,
                fat: 0.3,
                vitamins: None,
                minerals: None,
            },
            RecognizedFood {
                name: "Mock Analyzed Banana".into(),
                quantity: "1 large".into(),
                calories: 121.0,
                protein: 1.5,
                carbs: 31.0,
                fat: 0.4,
                vitamins: None,
                minerals: None,
            },
        ])
    }
}
