use indexmap::IndexSet;
use tracing::info;

use crate::{
    models::{Language, ProductListing, ProductRequest},
    pricing::calculate_price,
    translate::{product_name_to_english, TranslationClient},
};

pub const MAX_HASHTAGS: usize = 15;

const BASE_HASHTAGS: &[&str] = &[
    "#HandmadeInIndia", "#IndianCrafts", "#ArtisanMade",
    "#TraditionalArt", "#MadeInIndia", "#SupportLocal",
    "#HandcraftedWithLove", "#AuthenticIndian",
];
const HINDI_HASHTAGS: &[&str] = &["#हस्तनिर्मित", "#भारतीयकला", "#पारंपरिकशिल्प"];
const GUJARATI_HASHTAGS: &[&str] = &["#હસ્તનિર્મિત", "#ગુજરાતીકલા", "#પરંપરાગતશિલ્પ"];

pub fn english_name(product: &ProductRequest) -> String {
    product_name_to_english(&product.product_name, product.language)
}

/// Marketplace titles are always English.
pub fn build_title(product: &ProductRequest) -> String {
    match product.style() {
        Some(style) => format!("Handcrafted {} {}", style, english_name(product)),
        None => format!("Handcrafted {}", english_name(product)),
    }
}

/// Renders hours the way a float literal reads: `2.0`, `2.5`, and `1e-05` / `1e+20`
/// outside `1e-4..1e16`.
fn format_hours(hours: f64) -> String {
    let magnitude = hours.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let sci = format!("{:e}", hours);
        return match sci.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exp),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => sci,
        };
    }
    if hours.fract() == 0.0 {
        format!("{:.1}", hours)
    } else {
        hours.to_string()
    }
}

pub fn build_description(product: &ProductRequest) -> String {
    let mut description = format!("This beautiful handcrafted {} ", english_name(product).to_lowercase());

    match product.materials() {
        Some(materials) => description.push_str(&format!("is made with premium {} using traditional techniques. ", materials)),
        None => description.push_str("is crafted using traditional Indian techniques. "),
    }
    if let Some(style) = product.style() {
        description.push_str(&format!("Featuring {} style craftsmanship, ", style.to_lowercase()));
    }
    if let Some(dimensions) = product.dimensions() {
        description.push_str(&format!("measuring {}, ", dimensions));
    }
    description.push_str("this piece represents the rich cultural heritage of Indian artisans. ");
    if let Some(hours) = product.hours() {
        description.push_str(&format!("Carefully crafted over {} hours, ", format_hours(hours)));
    }
    description.push_str("each piece is unique and perfect for adding an authentic touch to your home. ");
    match product.notes() {
        Some(notes) => description.push_str(notes),
        None => description.push_str("Perfect for festivals, gifting, or everyday use."),
    }
    description
}

fn to_tag(word: &str) -> String {
    format!("#{}", word.replace(' ', ""))
}

/// Base tags, then language tags, then product-derived tags; first occurrence wins and
/// the list is capped at [`MAX_HASHTAGS`].
pub fn build_hashtags(product: &ProductRequest) -> Vec<String> {
    let mut tags: IndexSet<String> = BASE_HASHTAGS.iter().map(|t| t.to_string()).collect();

    let language_tags = match product.language {
        Language::Hi => HINDI_HASHTAGS,
        Language::Gu => GUJARATI_HASHTAGS,
        Language::En => &[],
    };
    tags.extend(language_tags.iter().map(|t| t.to_string()));

    tags.insert(to_tag(&product.product_name));
    if let Some(materials) = product.materials() {
        tags.extend(
            materials
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(to_tag),
        );
    }
    if let Some(style) = product.style() {
        tags.insert(to_tag(style));
    }

    tags.into_iter().take(MAX_HASHTAGS).collect()
}

pub fn build_caption(product: &ProductRequest, price: u32, lang: Language) -> String {
    let mut caption = String::new();
    match lang {
        Language::Hi => {
            caption.push_str(&format!("✨ हस्तनिर्मित {} की सुंदरता को खोजें! 🎨\n\n", product.product_name));
            if let Some(materials) = product.materials() {
                caption.push_str(&format!("पारंपरिक तकनीकों और प्रीमियम {} के साथ प्रेम से बनाया गया। ", materials));
            }
            caption.push_str("हर टुकड़ा हमारी समृद्ध सांस्कृतिक विरासत की कहानी कहता है। 🇮🇳\n\n");
            if let Some(style) = product.style() {
                caption.push_str(&format!("शैली: {}\n", style));
            }
            if let Some(dimensions) = product.dimensions() {
                caption.push_str(&format!("आकार: {}\n", dimensions));
            }
            caption.push_str(&format!("मूल्य: ₹{}\n\n", price));
            caption.push_str("स्थानीय कारीगरों का समर्थन करें! 🙏\n\n#हस्तनिर्मित #भारतीयकला #स्थानीयसमर्थन");
        }
        Language::Gu => {
            caption.push_str(&format!("✨ હસ્તનિર્મિત {} ની સુંદરતા શોધો! 🎨\n\n", product.product_name));
            if let Some(materials) = product.materials() {
                caption.push_str(&format!("પરંપરાગત તકનીકો અને પ્રીમિયમ {} સાથે પ્રેમથી બનાવવામાં આવ્યું। ", materials));
            }
            caption.push_str("દરેક ટુકડો આપણી સમૃદ્ધ સાંસ્કૃતિક વારસાની વાર્તા કહે છે। 🇮🇳\n\n");
            if let Some(style) = product.style() {
                caption.push_str(&format!("શૈલી: {}\n", style));
            }
            if let Some(dimensions) = product.dimensions() {
                caption.push_str(&format!("માપ: {}\n", dimensions));
            }
            caption.push_str(&format!("કિંમત: ₹{}\n\n", price));
            caption.push_str("સ્થાનિક કારીગરોને ટેકો આપો! 🙏\n\n#હસ્તનિર્મિત #ગુજરાતીકલા #સ્થાનિકસમર્થન");
        }
        Language::En => {
            caption.push_str(&format!("✨ Discover the beauty of handcrafted {}! 🎨\n\n", english_name(product)));
            if let Some(materials) = product.materials() {
                caption.push_str(&format!("Made with love using traditional techniques and premium {}. ", materials));
            }
            caption.push_str("Each piece tells a story of our rich cultural heritage. 🇮🇳\n\n");
            if let Some(style) = product.style() {
                caption.push_str(&format!("Style: {}\n", style));
            }
            if let Some(dimensions) = product.dimensions() {
                caption.push_str(&format!("Size: {}\n", dimensions));
            }
            caption.push_str(&format!("Price: ₹{}\n\n", price));
            caption.push_str("Support local artisans and bring home a piece of authentic Indian craftsmanship! 🙏\n\n#HandmadeInIndia #IndianCrafts #SupportLocal");
        }
    }
    caption
}

pub async fn generate_listing(product: &ProductRequest, translator: &TranslationClient) -> ProductListing {
    let price_inr = calculate_price(product);
    let title = build_title(product);
    let description_en = build_description(product);

    let (description_hi, description_gu) = tokio::join!(
        translator.translate(&description_en, Language::Hi),
        translator.translate(&description_en, Language::Gu)
    );

    let hashtags = build_hashtags(product);
    info!("🏷️ Listing '{}' priced at ₹{} with {} hashtags", title, price_inr, hashtags.len());

    ProductListing {
        instagram_caption_en: build_caption(product, price_inr, Language::En),
        instagram_caption_hi: build_caption(product, price_inr, Language::Hi),
        instagram_caption_gu: build_caption(product, price_inr, Language::Gu),
        title,
        price_inr,
        description_en,
        description_hi,
        description_gu,
        hashtags,
    }
}
