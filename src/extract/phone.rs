// src/extract/phone.rs
// =============================================================================
// Phone number cleanup.
//
// Registry pages write phones in many ways:
//   "Teléfono: 9 1234 5678"
//   "telefono: (56) 2 2345 6789"
//   "+56 9 8765 4321"
//
// We strip the label, keep digits, '+' and spaces, and add the Chilean country
// code when the number obviously lacks it.
// =============================================================================

// Labels that sometimes survive after the colon split ("Teléfono Teléfono: ...")
const PHONE_LABELS: [&str; 2] = ["Teléfono", "telefono"];

// Cleans a raw phone line into a normalized number
//
// Returns None when no digit is left, so callers can tell "label without a
// number" apart from a real phone.
//
// Examples:
//   "Teléfono: 9 1234 5678" -> Some("+569 1234 5678")
//   "56 2 2345 6789"        -> Some("+56 2 2345 6789")
//   "Teléfono: 2 2345 6789" -> Some("2 2345 6789")
//   "no digits here"        -> None
pub fn clean_phone(raw: &str) -> Option<String> {
    // Only the part after the first colon holds the number
    let mut phone = match raw.split_once(':') {
        Some((_, rest)) => rest.to_string(),
        None => raw.to_string(),
    };

    for label in PHONE_LABELS {
        phone = phone.replace(label, "");
    }

    let kept: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+' || *c == ' ')
        .collect();
    let cleaned = kept.trim();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = if cleaned.starts_with("56") {
        format!("+{}", cleaned)
    } else if cleaned.starts_with('9') {
        format!("+56{}", cleaned)
    } else {
        cleaned.to_string()
    };

    Some(normalized)
}
