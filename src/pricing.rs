use crate::models::ProductRequest;

pub const BASE_PRICE_INR: u32 = 100;
pub const HOURLY_RATE_INR: f64 = 50.0;

/// Material surcharges in priority order. Only the first matching group applies.
const MATERIAL_GROUPS: &[(&[&str], u32)] = &[
    (&["silk", "रेशम", "રેશમ"], 200),
    (&["cotton", "कपास", "કપાસ"], 100),
    (&["wood", "लकड़ी", "લાકડું"], 150),
    (&["metal", "brass", "धातु", "ધાતુ"], 180),
    (&["clay", "ceramic", "मिट्टी", "માટી"], 120),
    (&["leather", "चमड़ा", "ચામડું"], 160),
];

pub fn material_surcharge(materials: &str) -> u32 {
    let materials = materials.to_lowercase();
    MATERIAL_GROUPS
        .iter()
        .find(|(terms, _)| terms.iter().any(|t| materials.contains(t)))
        .map(|(_, inc)| *inc)
        .unwrap_or(0)
}

/// Fair price in INR from materials and labour hours.
pub fn calculate_price(product: &ProductRequest) -> u32 {
    let mut price = BASE_PRICE_INR;
    if let Some(materials) = product.materials() {
        price += material_surcharge(materials);
    }
    if let Some(hours) = product.hours() {
        // float-to-int `as` truncates toward zero and saturates
        price = price.saturating_add((hours * HOURLY_RATE_INR) as u32);
    }
    price
}
