//! Catalog Store loader.
//!
//! Reads the catalog JSON document from disk once at startup. Shape
//! validation lives in [`Catalog::from_json`]; this module only adds file
//! I/O and error context.

use anyhow::{Context, Result};
use std::path::Path;

use product_advisor_core::models::Catalog;

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

    let catalog = Catalog::from_json(&content)
        .with_context(|| format!("Invalid catalog: {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        faqs = catalog.faqs().len(),
        fallback_messages = catalog.contact().fallback_messages.len(),
        "catalog loaded"
    );

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CATALOG: &str = r#"{
        "faqs": [{"question": "Q1?", "answer": "A1"}],
        "products": {
            "OMX Sales": {"description": "Sales"},
            "OMX Flow": {"description": "Flow"}
        },
        "onboarding": {"business_types": ["Retail"], "business_sizes": [], "goals": []},
        "contact": {"support_email": "s@x.io", "phone": "1", "fallback_messages": ["m"]}
    }"#;

    #[test]
    fn test_load_catalog() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("catalog.json");
        fs::write(&path, CATALOG).unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.faqs()[0].answer, "A1");
        assert_eq!(catalog.onboarding().business_types, vec!["Retail"]);
    }

    #[test]
    fn test_invalid_catalog_has_context() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("catalog.json");
        fs::write(&path, CATALOG.replace("OMX Sales", "Other")).unwrap();

        let err = load_catalog(&path).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("Invalid catalog"));
        assert!(msg.contains("missing product: OMX Sales"));
    }

    #[test]
    fn test_missing_catalog_file() {
        let err = load_catalog(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read catalog file"));
    }
}
