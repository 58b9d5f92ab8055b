// src/record.rs
// =============================================================================
// The data we pull out of one guide's detail page.
//
// A GuideRecord is built once per detail page through GuideRecordBuilder and
// never changes afterwards. Every field we could not find stays None; we never
// store empty strings.
//
// Rust concepts:
// - Option<T>: "found" vs "not found" for each field
// - Builder pattern: collect values while scanning, freeze them at the end
// - serde: The nested shape is what --json prints
// =============================================================================

use serde::Serialize;

/// One extracted registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuideRecord {
    /// Page the record was extracted from (unique within a run)
    pub detail_url: String,
    pub personal_info: PersonalInfo,
    pub location: Location,
    pub registration: Registration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonalInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Cleaned phone, `+56`-prefixed when we could recognise a Chilean number
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    pub comuna: Option<String>,
    pub localidad: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// "General" when the page declares a general registration
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// "VIGENTE" when the registration is current
    pub status: Option<String>,
    /// In order of first appearance, no duplicates
    pub specialties: Vec<String>,
}

// Collects field values while the extractor walks a page.
//
// The setters mirror the classification rules in extract::fields. Fields that
// allow only one value (phone, email) expose is_*_set so the rules can decide
// whether a later line is still a candidate.
#[derive(Debug, Default)]
pub struct GuideRecordBuilder {
    personal_info: PersonalInfo,
    location: Location,
    registration: Registration,
}

impl GuideRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&mut self, name: String) {
        self.personal_info.name = Some(name);
    }

    pub fn email(&mut self, email: String) {
        self.personal_info.email = Some(email);
    }

    pub fn is_email_set(&self) -> bool {
        self.personal_info.email.is_some()
    }

    pub fn phone(&mut self, phone: String) {
        self.personal_info.phone = Some(phone);
    }

    pub fn is_phone_set(&self) -> bool {
        self.personal_info.phone.is_some()
    }

    pub fn comuna(&mut self, comuna: String) {
        self.location.comuna = Some(comuna);
    }

    pub fn localidad(&mut self, localidad: String) {
        self.location.localidad = Some(localidad);
    }

    pub fn region(&mut self, region: String) {
        self.location.region = Some(region);
    }

    pub fn registration_type(&mut self, kind: &str) {
        self.registration.kind = Some(kind.to_string());
    }

    pub fn status(&mut self, status: &str) {
        self.registration.status = Some(status.to_string());
    }

    // Appends a specialty unless we already have it
    pub fn specialty(&mut self, specialty: String) {
        if !self.registration.specialties.contains(&specialty) {
            self.registration.specialties.push(specialty);
        }
    }

    /// Freezes the collected values into a record for `detail_url`.
    pub fn build(self, detail_url: impl Into<String>) -> GuideRecord {
        GuideRecord {
            detail_url: detail_url.into(),
            personal_info: self.personal_info,
            location: self.location,
            registration: self.registration,
        }
    }
}
