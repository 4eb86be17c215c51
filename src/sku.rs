use crate::errors::ServiceError;

/// Normalizes a SKU for uniqueness comparison: surrounding whitespace is
/// stripped and the remainder upper-cased. The normalized form is both the
/// lookup key and the value persisted, so two SKUs differing only by case or
/// padding resolve to the same product identity.
pub fn normalize_sku(raw: &str) -> Result<String, ServiceError> {
    let normalized = raw.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(ServiceError::InvalidInput(
            "SKU must not be empty".to_string(),
        ));
    }
    Ok(normalized)
}
