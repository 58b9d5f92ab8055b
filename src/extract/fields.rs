// src/extract/fields.rs
// =============================================================================
// Line classification for detail pages.
//
// Each line of paragraph text is tested against an ordered table of rules.
// The first rule whose predicate matches consumes the line and writes into the
// record builder; later rules never see it. Lines no rule matches are ignored.
//
// Matching is done on a lower-cased copy of the line, values are taken from
// the original so accents and capitalisation survive.
// =============================================================================

use super::phone::clean_phone;
use crate::record::GuideRecordBuilder;

// Labels that mark a line as location or phone data, never an email
const NON_EMAIL_LABELS: [&str; 5] = ["comuna:", "localidad:", "región:", "teléfono:", "telefono:"];

const PHONE_MARKERS: [&str; 4] = ["teléfono:", "telefono:", "(56)", "+56"];

// A trimmed, non-empty line plus its lower-cased form
pub struct Line<'a> {
    text: &'a str,
    lower: String,
}

impl<'a> Line<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            lower: text.to_lowercase(),
        }
    }

    fn has(&self, needle: &str) -> bool {
        self.lower.contains(needle)
    }

    fn has_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.has(n))
    }

    // Text after the first colon, trimmed; None when it is missing or empty
    fn value_after_colon(&self) -> Option<String> {
        let (_, value) = self.text.split_once(':')?;
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}

// One entry of the classification table
pub struct Rule {
    pub name: &'static str,
    matches: fn(&Line, &GuideRecordBuilder) -> bool,
    apply: fn(&Line, &mut GuideRecordBuilder),
}

pub const RULES: &[Rule] = &[
    Rule {
        name: "comuna",
        matches: |line, _| line.has("comuna:"),
        apply: |line, record| {
            if let Some(value) = line.value_after_colon() {
                record.comuna(value);
            }
        },
    },
    Rule {
        name: "localidad",
        matches: |line, _| line.has("localidad:"),
        apply: |line, record| {
            if let Some(value) = line.value_after_colon() {
                record.localidad(value);
            }
        },
    },
    Rule {
        name: "region",
        matches: |line, _| line.has("región:"),
        apply: |line, record| {
            if let Some(value) = line.value_after_colon() {
                record.region(value);
            }
        },
    },
    Rule {
        // Once a phone is known, further phone lines fall through to the
        // rules below
        name: "phone",
        matches: |line, record| line.has_any(&PHONE_MARKERS) && !record.is_phone_set(),
        apply: |line, record| {
            if let Some(phone) = clean_phone(line.text) {
                record.phone(phone);
            }
        },
    },
    Rule {
        name: "email",
        matches: |line, _| line.text.contains('@') && !line.has_any(&NON_EMAIL_LABELS),
        apply: |line, record| {
            if !record.is_email_set() {
                record.email(line.text.to_string());
            }
        },
    },
    Rule {
        name: "status",
        matches: |line, _| line.has("registro vigente"),
        apply: |_, record| record.status("VIGENTE"),
    },
    Rule {
        name: "specialty",
        matches: |line, _| line.has("especializado en"),
        apply: |line, record| {
            // The value follows the first literal "en" of the original line
            if let Some((_, rest)) = line.text.split_once("en") {
                let specialty = rest.trim();
                if !specialty.is_empty() {
                    record.specialty(specialty.to_string());
                }
            }
        },
    },
    Rule {
        name: "registration_type",
        matches: |line, _| line.has("general") && line.text.chars().count() < 10,
        apply: |_, record| record.registration_type("General"),
    },
];

// Runs one line through the rule table
//
// Returns the name of the rule that consumed the line, or None if the line
// was ignored.
pub fn classify_line(text: &str, record: &mut GuideRecordBuilder) -> Option<&'static str> {
    let line = Line::new(text);
    let rule = RULES.iter().find(|rule| (rule.matches)(&line, record))?;
    (rule.apply)(&line, record);
    Some(rule.name)
}

// Splits a paragraph into trimmed, non-empty lines
pub fn paragraph_lines(paragraph: &str) -> impl Iterator<Item = &str> {
    paragraph.split('\n').map(str::trim).filter(|line| !line.is_empty())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a table of rules instead of one big if/else chain?
//    - The order of RULES is the precedence, easy to read top to bottom
//    - Adding a field means adding one entry, not another nested branch
//
// 2. What is `fn(&Line, &GuideRecordBuilder) -> bool`?
//    - A plain function pointer type
//    - Closures that capture nothing (like ours) convert to it automatically,
//      which is why they can live in a `const`
//
// 3. Why lower-case a copy of the line?
//    - "Comuna:", "COMUNA:" and "comuna:" should all match
//    - to_lowercase() handles accented letters ("REGIÓN" -> "región")
//    - We still take the value from the original text to keep its casing
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::GuideRecord;

    fn classify_all(lines: &[&str]) -> GuideRecord {
        let mut builder = GuideRecordBuilder::new();
        for line in lines {
            classify_line(line, &mut builder);
        }
        builder.build("https://example.com/detalle")
    }

    #[test]
    fn test_location_lines() {
        let record = classify_all(&[
            "Comuna: Santiago",
            "Localidad:  Barrio Lastarria ",
            "Región: Metropolitana de Santiago",
        ]);
        assert_eq!(record.location.comuna.as_deref(), Some("Santiago"));
        assert_eq!(record.location.localidad.as_deref(), Some("Barrio Lastarria"));
        assert_eq!(record.location.region.as_deref(), Some("Metropolitana de Santiago"));
    }

    #[test]
    fn test_value_keeps_text_after_first_colon_only() {
        let record = classify_all(&["Comuna: Santiago: Centro"]);
        assert_eq!(record.location.comuna.as_deref(), Some("Santiago: Centro"));
    }

    #[test]
    fn test_label_without_value_stays_absent() {
        let record = classify_all(&["Comuna:   "]);
        assert_eq!(record.location.comuna, None);
    }

    #[test]
    fn test_first_phone_wins() {
        let record = classify_all(&["Teléfono: 9 1111 2222", "Teléfono: 9 3333 4444"]);
        assert_eq!(record.personal_info.phone.as_deref(), Some("+569 1111 2222"));
    }

    #[test]
    fn test_phone_label_without_digits_does_not_block_later_phone() {
        let record = classify_all(&["Teléfono: no informado", "+56 9 3333 4444"]);
        assert_eq!(record.personal_info.phone.as_deref(), Some("+56 9 3333 4444"));
    }

    #[test]
    fn test_first_email_wins() {
        let record = classify_all(&["guia@example.com", "otro@example.com"]);
        assert_eq!(record.personal_info.email.as_deref(), Some("guia@example.com"));
    }

    #[test]
    fn test_label_line_with_at_sign_is_not_an_email() {
        let record = classify_all(&["Comuna: Providencia @ centro"]);
        assert_eq!(record.personal_info.email, None);
        assert_eq!(record.location.comuna.as_deref(), Some("Providencia @ centro"));
    }

    #[test]
    fn test_phone_line_after_phone_is_set_is_not_an_email() {
        let record = classify_all(&["Teléfono: 9 1111 2222", "Teléfono: contacto@example.com"]);
        assert_eq!(record.personal_info.email, None);
    }

    #[test]
    fn test_status() {
        let record = classify_all(&["Registro Vigente"]);
        assert_eq!(record.registration.status.as_deref(), Some("VIGENTE"));
    }

    #[test]
    fn test_specialties_are_deduplicated() {
        let record = classify_all(&[
            "Especializado en Turismo Aventura",
            "Especializado en Turismo Aventura",
            "Especializado en Patrimonio",
        ]);
        assert_eq!(
            record.registration.specialties,
            vec!["Turismo Aventura", "Patrimonio"]
        );
    }

    #[test]
    fn test_specialty_without_literal_en_is_a_miss() {
        let record = classify_all(&["ESPECIALIZADO EN MONTAÑA"]);
        assert!(record.registration.specialties.is_empty());
    }

    #[test]
    fn test_general_only_on_short_lines() {
        let short = classify_all(&["General"]);
        assert_eq!(short.registration.kind.as_deref(), Some("General"));

        let long = classify_all(&["Información general del guía"]);
        assert_eq!(long.registration.kind, None);
    }

    #[test]
    fn test_classify_reports_consuming_rule() {
        let mut builder = GuideRecordBuilder::new();
        assert_eq!(classify_line("Comuna: Santiago", &mut builder), Some("comuna"));
        assert_eq!(classify_line("Bienvenidos", &mut builder), None);
    }

    #[test]
    fn test_paragraph_lines_skip_blanks() {
        let lines: Vec<_> = paragraph_lines("  uno \n\n   \n dos").collect();
        assert_eq!(lines, vec!["uno", "dos"]);
    }
}
