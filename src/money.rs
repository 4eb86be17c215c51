use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::ServiceError;

/// Scale for monetary values (2 fractional digits)
const PRICE_SCALE: u32 = 2;

/// Parses a raw price string as a base-10 decimal and quantizes it to exactly
/// two fractional digits using round-half-to-even. The value never passes
/// through binary floating point; callers hand in the literal decimal text
/// (the JSON layer preserves number literals verbatim).
///
/// Rejects unparsable or negative input with `InvalidInput`.
pub fn quantize_price(raw: &str) -> Result<Decimal, ServiceError> {
    let parsed = Decimal::from_str_exact(raw.trim()).map_err(|_| {
        ServiceError::InvalidInput(format!("price must be a decimal value, got {:?}", raw))
    })?;

    if parsed.is_sign_negative() && !parsed.is_zero() {
        return Err(ServiceError::InvalidInput(format!(
            "price must be non-negative, got {}",
            parsed
        )));
    }

    let mut quantized =
        parsed.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointNearestEven);
    // rescale pads integers like "10" out to 10.00 so the stored scale is uniform
    quantized.rescale(PRICE_SCALE);
    Ok(quantized)
}
