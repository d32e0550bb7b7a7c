use crate::models::Language;
use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const TRANSLATION_MODEL: &str = "facebook/nllb-200-distilled-600M";
pub const TRANSLATION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("HTTP error: {0}")] Http(String),
    #[error("Parse error: {0}")] Parse(String),
}

const HINDI_PHRASES: &[(&str, &str)] = &[
    ("This beautiful handcrafted", "यह सुंदर हस्तनिर्मित"),
    ("traditional techniques", "पारंपरिक तकनीकों"),
    ("Indian artisans", "भारतीय कारीगरों"),
    ("cultural heritage", "सांस्कृतिक विरासत"),
    ("authentic touch", "प्रामाणिक स्पर्श"),
    ("Perfect for festivals", "त्योहारों के लिए एकदम सही"),
];

const GUJARATI_PHRASES: &[(&str, &str)] = &[
    ("This beautiful handcrafted", "આ સુંદર હસ્તનિર્મિત"),
    ("traditional techniques", "પરંપરાગત તકનીકો"),
    ("Indian artisans", "ભારતીય કારીગરો"),
    ("cultural heritage", "સાંસ્કૃતિક વારસો"),
    ("authentic touch", "અધિકૃત સ્પર્શ"),
    ("Perfect for festivals", "તહેવારો માટે સંપૂર્ણ"),
];

const HINDI_PRODUCT_NAMES: &[(&str, &str)] = &[
    ("दिया", "Diya"),
    ("कटोरा", "Bowl"),
    ("मूर्ति", "Sculpture"),
    ("गहने", "Jewelry"),
    ("कपड़ा", "Fabric"),
    ("चादर", "Sheet"),
    ("तकिया", "Pillow"),
    ("बैग", "Bag"),
    ("जूते", "Shoes"),
    ("थाली", "Plate"),
    ("लैंप", "Lamp"),
    ("फूलदान", "Vase"),
];

const GUJARATI_PRODUCT_NAMES: &[(&str, &str)] = &[
    ("દિવો", "Diya"),
    ("બાઉલ", "Bowl"),
    ("મૂર્તિ", "Sculpture"),
    ("દાગીના", "Jewelry"),
    ("કપડું", "Fabric"),
    ("ચાદર", "Sheet"),
    ("ઓશીકું", "Pillow"),
    ("બેગ", "Bag"),
    ("જૂતા", "Shoes"),
    ("થાળી", "Plate"),
    ("લેમ્પ", "Lamp"),
    ("ફૂલદાની", "Vase"),
];

/// Offline translation: literal phrase replacement, everything else passes through.
pub fn phrase_translate(text: &str, target: Language) -> String {
    let table = match target {
        Language::Hi => HINDI_PHRASES,
        Language::Gu => GUJARATI_PHRASES,
        Language::En => return text.to_string(),
    };
    table
        .iter()
        .fold(text.to_string(), |acc, (en, native)| acc.replace(en, native))
}

/// English name for a product written in `source`. The first glossary word found in the
/// name decides; unknown names are returned as given.
pub fn product_name_to_english(name: &str, source: Language) -> String {
    let glossary = match source {
        Language::Hi => HINDI_PRODUCT_NAMES,
        Language::Gu => GUJARATI_PRODUCT_NAMES,
        Language::En => return name.to_string(),
    };
    glossary
        .iter()
        .find(|(native, _)| name.contains(native))
        .map(|(_, english)| english.to_string())
        .unwrap_or_else(|| name.to_string())
}

pub struct TranslationClient {
    client: Client,
    api_token: Option<String>,
    base_url: String,
}

impl TranslationClient {
    pub fn new(api_token: Option<String>, base_url: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(TRANSLATION_TIMEOUT)
            .build()
            .context("failed to build translation HTTP client")?;
        Ok(Self {
            client,
            api_token: api_token.filter(|t| !t.is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn is_online(&self) -> bool {
        self.api_token.is_some()
    }

    async fn perform_api_call(&self, token: &str, text: &str, target: Language) -> Result<String, TranslateError> {
        let url = format!("{}/models/{}", self.base_url, TRANSLATION_MODEL);
        let request_body = json!({
            "inputs": text,
            "parameters": {
                "src_lang": Language::En.nllb_code(),
                "tgt_lang": target.nllb_code(),
            }
        });

        let response = self.client
            .post(&url)
            .bearer_auth(token)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| TranslateError::Http(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::Http(format!("status={} body={}", status, body)));
        }

        let parsed: TranslationResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::Parse(e.to_string()))?;
        parsed
            .into_text()
            .ok_or_else(|| TranslateError::Parse("no translation_text in response".into()))
    }

    /// Best-effort translation of English `text`. Never fails: without a token, or when the
    /// hosted model misbehaves, the phrase dictionary is used instead.
    pub async fn translate(&self, text: &str, target: Language) -> String {
        if target == Language::En {
            return text.to_string();
        }
        let Some(token) = self.api_token.as_deref() else {
            return phrase_translate(text, target);
        };

        match self.perform_api_call(token, text, target).await {
            Ok(translated) => {
                info!("🌐 Translated {} chars to {:?}", text.len(), target);
                translated
            }
            Err(e) => {
                warn!("⚠️ Translation to {:?} failed, using phrase dictionary: {}", target, e);
                phrase_translate(text, target)
            }
        }
    }
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TranslationResponse {
    Single(Translation),
    Batch(Vec<Translation>),
}

#[derive(Debug, Deserialize)]
struct Translation { translation_text: String }

impl TranslationResponse {
    fn into_text(self) -> Option<String> {
        match self {
            TranslationResponse::Single(t) => Some(t.translation_text),
            TranslationResponse::Batch(v) => v.into_iter().next().map(|t| t.translation_text),
        }
    }
}
