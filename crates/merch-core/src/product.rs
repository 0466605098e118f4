use serde::{Deserialize, Serialize};

/// Literal category value that also names the certificate pseudo-category.
pub const CERTIFICATE_CATEGORY: &str = "certificate";

const FALLBACK_TITLE: &str = "Товар";

/// Catalog key of a product. The catalog stores ids as strings, but numeric
/// ids are accepted and normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Front and back shots of a product, as remote URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImages {
    pub front: Option<String>,
    pub back: Option<String>,
}

/// One catalog entry. Every field is optional on the wire; malformed values
/// degrade to `None` instead of failing the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<ProductId>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub badge: Option<String>,
    /// Usually one of `tshirt`, `hoodie`, `shorts`, `longsleeve`,
    /// `certificate`, but free text is allowed.
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        serialize_with = "lenient::serialize_number"
    )]
    pub price_current: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        serialize_with = "lenient::serialize_number"
    )]
    pub price_old: Option<f64>,
    #[serde(default, deserialize_with = "lenient::images")]
    pub images: ProductImages,
}

impl Product {
    /// Returns `true` for gift certificates, regardless of the literal
    /// `category` field: category `certificate`, SKU `gift` (any case), or a
    /// title mentioning "сертификат" (any case).
    #[must_use]
    pub fn is_certificate(&self) -> bool {
        if self.category.as_deref() == Some(CERTIFICATE_CATEGORY) {
            return true;
        }
        if self
            .sku
            .as_deref()
            .is_some_and(|sku| sku.to_lowercase() == "gift")
        {
            return true;
        }
        self.title
            .as_deref()
            .is_some_and(|title| title.to_lowercase().contains("сертификат"))
    }

    /// Title shown on cards and in the modal: title, then SKU, then a generic
    /// placeholder.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.sku.as_deref())
            .unwrap_or(FALLBACK_TITLE)
    }

    #[must_use]
    pub fn category_label(&self) -> &str {
        self.category.as_deref().map_or("", category_label)
    }

    #[must_use]
    pub fn front_image(&self) -> Option<&str> {
        self.images.front.as_deref()
    }

    #[must_use]
    pub fn back_image(&self) -> Option<&str> {
        self.images.back.as_deref()
    }
}

/// Human label for a category id; unknown categories are shown verbatim.
#[must_use]
pub fn category_label(category: &str) -> &str {
    match category {
        "tshirt" => "Футболки",
        "hoodie" => "Худи",
        "shorts" => "Шорты",
        "longsleeve" => "Лонгсливы",
        CERTIFICATE_CATEGORY => "Сертификат",
        other => other,
    }
}

mod lenient {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use super::{ProductId, ProductImages};

    pub(super) fn id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ProductId>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) if !s.is_empty() => Some(ProductId(s)),
            Value::Number(n) => Some(ProductId(n.to_string())),
            _ => None,
        })
    }

    pub(super) fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(non_empty_string(Value::deserialize(d)?))
    }

    pub(super) fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(Value::deserialize(d)?.as_f64())
    }

    /// Whole prices are written as integers (`2990`, not `2990.0`).
    #[allow(clippy::trivially_copy_pass_by_ref, clippy::cast_possible_truncation)]
    pub(super) fn serialize_number<S: Serializer>(
        value: &Option<f64>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match *value {
            Some(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
                s.serialize_i64(v as i64)
            }
            Some(v) => s.serialize_f64(v),
            None => s.serialize_none(),
        }
    }

    pub(super) fn images<'de, D: Deserializer<'de>>(d: D) -> Result<ProductImages, D::Error> {
        let Value::Object(mut map) = Value::deserialize(d)? else {
            return Ok(ProductImages::default());
        };
        Ok(ProductImages {
            front: map.remove("front").and_then(non_empty_string),
            back: map.remove("back").and_then(non_empty_string),
        })
    }

    fn non_empty_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(category: Option<&str>, sku: Option<&str>, title: Option<&str>) -> Product {
        Product {
            id: Some(ProductId::from("1")),
            title: title.map(str::to_owned),
            sku: sku.map(str::to_owned),
            category: category.map(str::to_owned),
            ..Product::default()
        }
    }

    #[test]
    fn certificate_by_literal_category() {
        assert!(product(Some("certificate"), None, None).is_certificate());
    }

    #[test]
    fn certificate_by_gift_sku_any_case() {
        assert!(product(Some("tshirt"), Some("GIFT"), Some("Something")).is_certificate());
        assert!(product(None, Some("Gift"), None).is_certificate());
    }

    #[test]
    fn certificate_by_title_substring_any_case() {
        assert!(product(Some("tshirt"), None, Some("Подарочный СЕРТИФИКАТ 3000")).is_certificate());
    }

    #[test]
    fn sku_must_equal_gift_exactly() {
        assert!(!product(Some("hoodie"), Some("gift-box"), Some("Hoodie")).is_certificate());
    }

    #[test]
    fn plain_product_is_not_certificate() {
        assert!(!product(Some("hoodie"), Some("HD-01"), Some("Zip Hoodie")).is_certificate());
        assert!(!product(None, None, None).is_certificate());
    }

    #[test]
    fn display_title_falls_back_to_sku_then_placeholder() {
        assert_eq!(product(None, Some("SKU-1"), Some("Tee")).display_title(), "Tee");
        assert_eq!(product(None, Some("SKU-1"), None).display_title(), "SKU-1");
        assert_eq!(product(None, None, None).display_title(), "Товар");
    }

    #[test]
    fn category_labels_known_and_unknown() {
        assert_eq!(category_label("hoodie"), "Худи");
        assert_eq!(category_label("certificate"), "Сертификат");
        assert_eq!(category_label("socks"), "socks");
        assert_eq!(product(None, None, None).category_label(), "");
    }

    #[test]
    fn deserializes_full_product() {
        let json = r#"{
            "id": "812345",
            "title": "Zip Hoodie Black",
            "sku": "ZH-BLK",
            "badge": "NEW",
            "category": "hoodie",
            "price_current": 2990,
            "price_old": 3490,
            "images": {
                "front": "https://static.tildacdn.com/tild1/front.jpg",
                "back": "https://static.tildacdn.com/tild1/back.jpg"
            }
        }"#;
        let p: Product = serde_json::from_str(json).expect("valid product");
        assert_eq!(p.id, Some(ProductId::from("812345")));
        assert_eq!(p.badge.as_deref(), Some("NEW"));
        assert_eq!(p.price_current, Some(2990.0));
        assert_eq!(p.price_old, Some(3490.0));
        assert_eq!(
            p.back_image(),
            Some("https://static.tildacdn.com/tild1/back.jpg")
        );
    }

    #[test]
    fn numeric_id_is_normalized_to_string() {
        let p: Product = serde_json::from_str(r#"{"id": 42}"#).expect("valid product");
        assert_eq!(p.id.as_ref().map(ProductId::as_str), Some("42"));
    }

    #[test]
    fn malformed_optional_fields_degrade_to_none() {
        let json = r#"{
            "id": "",
            "title": null,
            "sku": 17,
            "price_current": "2190",
            "price_old": null,
            "images": "front.jpg"
        }"#;
        let p: Product = serde_json::from_str(json).expect("lenient product");
        assert!(p.id.is_none());
        assert!(p.title.is_none());
        assert!(p.sku.is_none());
        assert!(p.price_current.is_none());
        assert!(p.price_old.is_none());
        assert_eq!(p.images, ProductImages::default());
    }

    #[test]
    fn empty_image_urls_are_absent() {
        let p: Product =
            serde_json::from_str(r#"{"images": {"front": "", "back": null}}"#).expect("product");
        assert!(p.front_image().is_none());
        assert!(p.back_image().is_none());
    }

    #[test]
    fn serializes_absent_fields_as_null() {
        let p = product(Some("hoodie"), None, Some("Hoodie"));
        let value = serde_json::to_value(&p).expect("serialize");
        assert_eq!(value["id"], "1");
        assert!(value["badge"].is_null());
        assert!(value["images"]["front"].is_null());
    }

    #[test]
    fn whole_prices_serialize_as_integers() {
        let p = Product {
            price_current: Some(2990.0),
            price_old: Some(2190.5),
            ..Product::default()
        };
        let json = serde_json::to_string(&p).expect("serialize");
        assert!(json.contains(r#""price_current":2990,"#), "{json}");
        assert!(json.contains(r#""price_old":2190.5"#), "{json}");
    }
}
