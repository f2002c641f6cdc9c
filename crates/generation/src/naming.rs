//! Ad group naming: applies a learned or requested naming convention to a
//! product and sanitizes the result for the ad platform.

use adforge_core::types::Product;
use url::Url;

const MAX_NAME_LEN: usize = 255;

/// Characters the ad platform rejects in ad group names.
fn is_forbidden(c: char) -> bool {
    matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`' | '[' | ']')
}

fn sanitize_name(name: &str) -> String {
    let mut sanitized: String = name.chars().filter(|c| !is_forbidden(*c)).collect();
    sanitized = sanitized.trim().to_string();
    if sanitized.chars().count() > MAX_NAME_LEN {
        sanitized = sanitized.chars().take(MAX_NAME_LEN - 3).collect::<String>() + "...";
    }
    sanitized
}

/// Split a product name into a leading brand token and the remaining model.
fn split_brand_model(name: &str) -> (String, String) {
    let parts: Vec<&str> = name
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|p| !p.is_empty())
        .collect();
    match parts.as_slice() {
        [] => (String::new(), String::new()),
        [brand] => (brand.to_string(), String::new()),
        [brand, model @ ..] => (brand.to_string(), model.join(" ")),
    }
}

fn brand_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.trim_start_matches("www.").to_string();
    let domain = host.split('.').next()?;
    let mut chars = domain.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().collect::<String>() + chars.as_str())
}

/// Generate an ad group name for a product.
///
/// Recognized conventions: `Product Name` (default), `Brand + Model`,
/// `Product + Category`, `Brand + Type`, or a custom pattern with
/// `{product_name}`, `{brand}`, `{category}`, `{model}` placeholders.
pub fn generate_ad_group_name(product: &Product, naming_pattern: Option<&str>) -> String {
    let product_name = product.name.as_str();
    let category = product.category.as_deref().unwrap_or("");

    let (mut brand, model) = split_brand_model(product_name);
    if brand.is_empty() {
        if let Some(url_brand) = brand_from_url(&product.url) {
            brand = url_brand;
        }
    }

    let pattern = naming_pattern.unwrap_or("Product Name");
    let name = match pattern {
        "Product Name" => product_name.to_string(),
        "Brand + Model" => {
            let combined = format!("{} {}", brand, model).trim().to_string();
            if combined.is_empty() {
                product_name.to_string()
            } else {
                combined
            }
        }
        "Product + Category" => {
            if category.is_empty() {
                product_name.to_string()
            } else {
                format!("{} - {}", product_name, category)
            }
        }
        "Brand + Type" => {
            if category.is_empty() {
                product_name.to_string()
            } else {
                format!("{} {}", brand, category).trim().to_string()
            }
        }
        custom => {
            let substituted = custom
                .replace("{product_name}", product_name)
                .replace("{brand}", &brand)
                .replace("{category}", category)
                .replace("{model}", &model);
            // A pattern with no recognized placeholder is not a convention.
            if substituted == custom {
                product_name.to_string()
            } else {
                substituted
            }
        }
    };

    let sanitized = sanitize_name(&name);
    if sanitized.is_empty() {
        let prefix: String = product.id.chars().take(8).collect();
        return format!("Product {}", prefix);
    }
    sanitized
}
