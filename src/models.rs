use serde::{Serialize, Deserialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Gu,
}

impl Language {
    /// Language code understood by the NLLB translation model.
    pub fn nllb_code(self) -> &'static str {
        match self {
            Language::En => "eng_Latn",
            Language::Hi => "hin_Deva",
            Language::Gu => "guj_Gujr",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProductRequest {
    pub product_name: String,
    #[serde(default)]
    pub materials: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub handmade_hours: Option<f64>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub language: Language,
}

impl ProductRequest {
    pub fn materials(&self) -> Option<&str> { non_empty(&self.materials) }
    pub fn dimensions(&self) -> Option<&str> { non_empty(&self.dimensions) }
    pub fn style(&self) -> Option<&str> { non_empty(&self.style) }
    pub fn notes(&self) -> Option<&str> { non_empty(&self.notes) }

    /// Labour hours that actually count towards price and copy; zero is treated as absent.
    pub fn hours(&self) -> Option<f64> {
        self.handmade_hours.filter(|h| *h != 0.0)
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductListing {
    pub title: String,
    pub price_inr: u32,
    pub description_en: String,
    pub description_hi: String,
    pub description_gu: String,
    pub hashtags: Vec<String>,
    pub instagram_caption_en: String,
    pub instagram_caption_hi: String,
    pub instagram_caption_gu: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PhotoEnhancement {
    pub original: String,
    pub enhanced: String,
    pub instagram_square: String,
    pub instagram_story: String,
    pub whatsapp_status: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub features: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Health {
    pub status: String,
    pub service: String,
    pub version: String,
}
