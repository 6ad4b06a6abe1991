//! Catalog records and request-scoped inputs.
//!
//! The catalog is the read-only reference data loaded once at startup:
//! FAQ entries, the two product payloads, the onboarding option lists,
//! and the contact/fallback text. [`Catalog::from_json`] validates the
//! document shape up front so that a bad catalog fails at load time,
//! never at first access.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CatalogError;

/// Prompt appended to every fallback answer when the catalog does not
/// override it.
pub const DEFAULT_CONTACT_ACTION: &str = "Would you like to be connected?";

/// A single curated question/answer pair.
///
/// Identity is positional: the index within [`Catalog::faqs`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// Product payload returned verbatim with a recommendation.
///
/// The known fields are typed; anything else in the catalog entry is kept
/// in `extra` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub description: String,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub pricing: String,
    #[serde(default)]
    pub demo_link: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The two products the scorer chooses between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductKind {
    /// CRM / lead-management product.
    Sales,
    /// Conversational / automation product.
    Flow,
}

impl ProductKind {
    /// Key under which the product is stored in the catalog's `products` map.
    pub fn catalog_name(self) -> &'static str {
        match self {
            ProductKind::Sales => "OMX Sales",
            ProductKind::Flow => "OMX Flow",
        }
    }
}

/// Option lists offered by the onboarding form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnboardingOptions {
    #[serde(default)]
    pub business_types: Vec<String>,
    #[serde(default)]
    pub business_sizes: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
}

/// Contact metadata and the pool of fallback messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub support_email: String,
    pub phone: String,
    pub fallback_messages: Vec<String>,
    #[serde(default = "default_action")]
    pub action: String,
}

fn default_action() -> String {
    DEFAULT_CONTACT_ACTION.to_string()
}

/// Deserialize a field, reading an explicit JSON `null` as the default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A visitor's stated goals. Request-scoped, never persisted.
///
/// Every field defaults, and `null` counts as absent, so a partial request
/// body still produces a usable profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub goals: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub business_type: String,
    #[serde(default)]
    pub business_size: Option<String>,
}

/// On-disk catalog document, before validation.
#[derive(Deserialize)]
struct CatalogDocument {
    faqs: Vec<FaqEntry>,
    products: HashMap<String, ProductDetails>,
    onboarding: OnboardingOptions,
    contact: ContactInfo,
}

/// Validated, immutable reference data.
#[derive(Debug, Clone)]
pub struct Catalog {
    faqs: Vec<FaqEntry>,
    sales: ProductDetails,
    flow: ProductDetails,
    onboarding: OnboardingOptions,
    contact: ContactInfo,
}

impl Catalog {
    /// Parse and validate a catalog JSON document.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the document does not parse, has no
    /// FAQ entries, has a blank FAQ question, is missing either product,
    /// or has no fallback messages.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_str(text)?;
        Self::from_parts(doc.faqs, doc.products, doc.onboarding, doc.contact)
    }

    /// Build a catalog from already-deserialized parts, applying the same
    /// validation as [`Catalog::from_json`].
    pub fn from_parts(
        faqs: Vec<FaqEntry>,
        mut products: HashMap<String, ProductDetails>,
        onboarding: OnboardingOptions,
        contact: ContactInfo,
    ) -> Result<Self, CatalogError> {
        if faqs.is_empty() {
            return Err(CatalogError::NoFaqs);
        }
        if let Some(i) = faqs.iter().position(|f| f.question.trim().is_empty()) {
            return Err(CatalogError::BlankQuestion(i));
        }
        if contact.fallback_messages.is_empty() {
            return Err(CatalogError::NoFallbackMessages);
        }

        let mut take = |kind: ProductKind| {
            products
                .remove(kind.catalog_name())
                .ok_or_else(|| CatalogError::MissingProduct(kind.catalog_name().to_string()))
        };
        let sales = take(ProductKind::Sales)?;
        let flow = take(ProductKind::Flow)?;

        Ok(Self {
            faqs,
            sales,
            flow,
            onboarding,
            contact,
        })
    }

    pub fn faqs(&self) -> &[FaqEntry] {
        &self.faqs
    }

    pub fn product(&self, kind: ProductKind) -> &ProductDetails {
        match kind {
            ProductKind::Sales => &self.sales,
            ProductKind::Flow => &self.flow,
        }
    }

    pub fn onboarding(&self) -> &OnboardingOptions {
        &self.onboarding
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_parse_valid_catalog() {
        let catalog = catalog();
        assert_eq!(catalog.faqs().len(), 3);
        assert_eq!(catalog.faqs()[1].question, "Does OMX Flow support WhatsApp?");
        assert_eq!(catalog.product(ProductKind::Sales).description, "Sales CRM");
        assert_eq!(catalog.product(ProductKind::Flow).pricing, "$49/month");
        assert_eq!(catalog.onboarding().business_sizes.len(), 3);
        assert_eq!(catalog.contact().action, DEFAULT_CONTACT_ACTION);
    }

    #[test]
    fn test_product_extra_fields_preserved() {
        let catalog = catalog();
        let json = serde_json::to_value(catalog.product(ProductKind::Sales)).unwrap();
        assert_eq!(json["tier"], "pro");
        assert_eq!(json["key_features"][0], "Lead tracking");
    }

    #[test]
    fn test_missing_product_rejected() {
        let text = CATALOG_JSON.replace("\"OMX Flow\"", "\"OMX Other\"");
        match Catalog::from_json(&text) {
            Err(CatalogError::MissingProduct(name)) => assert_eq!(name, "OMX Flow"),
            other => panic!("expected MissingProduct, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_faqs_rejected() {
        let mut doc: serde_json::Value = serde_json::from_str(CATALOG_JSON).unwrap();
        doc["faqs"] = serde_json::json!([]);
        let err = Catalog::from_json(&doc.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::NoFaqs));
    }

    #[test]
    fn test_blank_question_rejected() {
        let mut doc: serde_json::Value = serde_json::from_str(CATALOG_JSON).unwrap();
        doc["faqs"][2]["question"] = serde_json::json!("   ");
        let err = Catalog::from_json(&doc.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::BlankQuestion(2)));
    }

    #[test]
    fn test_no_fallback_messages_rejected() {
        let mut doc: serde_json::Value = serde_json::from_str(CATALOG_JSON).unwrap();
        doc["contact"]["fallback_messages"] = serde_json::json!([]);
        let err = Catalog::from_json(&doc.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::NoFallbackMessages));
    }

    #[test]
    fn test_wrong_shape_rejected() {
        let err = Catalog::from_json(r#"{"faqs": "nope"}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_user_profile_defaults() {
        let profile: UserProfile = serde_json::from_str("{}").unwrap();
        assert!(profile.goals.is_empty());
        assert_eq!(profile.business_type, "");
        assert_eq!(profile.business_size, None);
    }

    #[test]
    fn test_user_profile_null_fields_are_empty() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"goals": ["bulk whatsapp", "chatbot"], "business_type": null, "business_size": null}"#,
        )
        .unwrap();
        assert_eq!(profile.goals, vec!["bulk whatsapp", "chatbot"]);
        assert_eq!(profile.business_type, "");
        assert_eq!(profile.business_size, None);

        let profile: UserProfile =
            serde_json::from_str(r#"{"goals": null, "business_type": "Retail"}"#).unwrap();
        assert!(profile.goals.is_empty());
        assert_eq!(profile.business_type, "Retail");
    }
}
