use super::errors::{DomainError, DomainResult, SubmissionError};
use std::fmt;
use std::str::FromStr;

pub const EMPLOYEE_OPTIONS: &[&str] = &["1-10", "11-50", "50-200", "200+"];

pub const INDUSTRY_OPTIONS: &[&str] = &[
    "Zakelijke dienstverlening",
    "Zorg",
    "Bouw",
    "Handel",
    "Productie",
    "Anders",
];

pub const CHATGPT_POLICY_OPTIONS: &[&str] = &[
    "Weet ik niet",
    "Ja, alles mag",
    "Nee, streng verboden",
    "Alleen via Copilot (EDP)",
];

pub const PREFERENCE_OPTIONS: &[&str] = &["ideas", "inspiration"];

pub const MIN_AI_EXPERIENCE: u8 = 1;
pub const MAX_AI_EXPERIENCE: u8 = 10;

/// How an intake field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line free text
    Text,
    /// Multi-line free text
    LongText,
    /// One value out of a fixed option list
    Choice,
    /// Integer slider between 1 and 10
    Range,
    /// Two-valued radio choice between "ideas" and "inspiration"
    Preference,
}

/// Every field of the intake form, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CompanyName,
    Url,
    Employees,
    Industry,
    AiExperience,
    ChatgptPolicy,
    UseCasePreference,
    UseCaseText,
    Email,
    Name,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::CompanyName,
        Field::Url,
        Field::Employees,
        Field::Industry,
        Field::AiExperience,
        Field::ChatgptPolicy,
        Field::UseCasePreference,
        Field::UseCaseText,
        Field::Email,
        Field::Name,
    ];

    /// Fields that must be filled in before a submission is accepted.
    pub const MANDATORY: [Field; 4] = [Field::CompanyName, Field::Url, Field::Name, Field::Email];

    /// The key used for this field on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Field::CompanyName => "company_name",
            Field::Url => "url",
            Field::Employees => "employees",
            Field::Industry => "industry",
            Field::AiExperience => "ai_experience",
            Field::ChatgptPolicy => "chatgpt_policy",
            Field::UseCasePreference => "use_case_preference",
            Field::UseCaseText => "use_case_text",
            Field::Email => "email",
            Field::Name => "name",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.name() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::CompanyName => "Bedrijfsnaam",
            Field::Url => "Website URL (Cruciaal voor analyse)",
            Field::Employees => "Aantal Medewerkers",
            Field::Industry => "Branche",
            Field::AiExperience => "Hoe ervaren is jouw organisatie met AI? (1-10)",
            Field::ChatgptPolicy => "Mag je ChatGPT gebruiken?",
            Field::UseCasePreference => "Heb je al use cases die je met AI wil aanpakken?",
            Field::UseCaseText => "Beschrijf kort je use cases:",
            Field::Email => "Zakelijk E-mailadres",
            Field::Name => "Je Naam",
        }
    }

    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            Field::CompanyName => Some("Bijv. Symbis"),
            Field::Url => Some("https://www.jouwbedrijf.nl"),
            Field::UseCaseText => {
                Some("Bijv. Ik wil offertes automatisch genereren uit emails...")
            }
            Field::Email => Some("naam@bedrijf.nl"),
            Field::Name => Some("Voornaam Achternaam"),
            _ => None,
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::CompanyName | Field::Url | Field::Email | Field::Name => FieldKind::Text,
            Field::UseCaseText => FieldKind::LongText,
            Field::Employees | Field::Industry | Field::ChatgptPolicy => FieldKind::Choice,
            Field::AiExperience => FieldKind::Range,
            Field::UseCasePreference => FieldKind::Preference,
        }
    }

    /// Option list for choice-like fields, empty for free text.
    pub fn options(self) -> &'static [&'static str] {
        match self {
            Field::Employees => EMPLOYEE_OPTIONS,
            Field::Industry => INDUSTRY_OPTIONS,
            Field::ChatgptPolicy => CHATGPT_POLICY_OPTIONS,
            Field::UseCasePreference => PREFERENCE_OPTIONS,
            _ => &[],
        }
    }

    pub fn is_editable_text(self) -> bool {
        matches!(self.kind(), FieldKind::Text | FieldKind::LongText)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Answer to the step 3 question whether the user already has use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseCasePreference {
    /// The user has concrete ideas and may describe them
    Ideas,
    /// The user wants inspiration instead
    Inspiration,
}

impl UseCasePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            UseCasePreference::Ideas => "ideas",
            UseCasePreference::Inspiration => "inspiration",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ideas" => Some(UseCasePreference::Ideas),
            "inspiration" => Some(UseCasePreference::Inspiration),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UseCasePreference::Ideas => "Ja, ik heb concrete ideeën",
            UseCasePreference::Inspiration => "Nee, ik wil inspiratie",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UseCasePreference::Ideas => UseCasePreference::Inspiration,
            UseCasePreference::Inspiration => UseCasePreference::Ideas,
        }
    }
}

/// The accumulated intake data. Every value is kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeRecord {
    pub company_name: String,
    pub url: String,
    pub employees: String,
    pub industry: String,
    pub ai_experience: String,
    pub chatgpt_policy: String,
    pub use_case_preference: String,
    pub use_case_text: String,
    pub email: String,
    pub name: String,
}

impl IntakeRecord {
    /// A record holding the values the form starts out with.
    pub fn with_form_defaults() -> Self {
        Self {
            employees: EMPLOYEE_OPTIONS[0].to_string(),
            industry: INDUSTRY_OPTIONS[0].to_string(),
            ai_experience: "3".to_string(),
            chatgpt_policy: CHATGPT_POLICY_OPTIONS[0].to_string(),
            ..Self::default()
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::CompanyName => &self.company_name,
            Field::Url => &self.url,
            Field::Employees => &self.employees,
            Field::Industry => &self.industry,
            Field::AiExperience => &self.ai_experience,
            Field::ChatgptPolicy => &self.chatgpt_policy,
            Field::UseCasePreference => &self.use_case_preference,
            Field::UseCaseText => &self.use_case_text,
            Field::Email => &self.email,
            Field::Name => &self.name,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::CompanyName => &mut self.company_name,
            Field::Url => &mut self.url,
            Field::Employees => &mut self.employees,
            Field::Industry => &mut self.industry,
            Field::AiExperience => &mut self.ai_experience,
            Field::ChatgptPolicy => &mut self.chatgpt_policy,
            Field::UseCasePreference => &mut self.use_case_preference,
            Field::UseCaseText => &mut self.use_case_text,
            Field::Email => &mut self.email,
            Field::Name => &mut self.name,
        }
    }

    pub fn is_blank(&self, field: Field) -> bool {
        self.get(field).trim().is_empty()
    }

    /// Mandatory fields that are still blank.
    pub fn missing_mandatory(&self) -> Vec<Field> {
        Field::MANDATORY
            .into_iter()
            .filter(|field| self.is_blank(*field))
            .collect()
    }

    pub fn use_case_preference(&self) -> Option<UseCasePreference> {
        UseCasePreference::parse(&self.use_case_preference)
    }
}

/// Holds the live values of the intake form while the user edits it.
///
/// Only coerces values, it never decides whether a field is required.
///
/// # Examples
///
/// ```
/// use symbis_scan::domain::{Field, FieldStore};
///
/// let mut store = FieldStore::default();
/// store.set(Field::CompanyName, "Acme");
/// assert_eq!(store.snapshot().company_name, "Acme");
/// assert_eq!(store.get(Field::Employees), "1-10");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStore {
    record: IntakeRecord,
}

impl Default for FieldStore {
    fn default() -> Self {
        Self {
            record: IntakeRecord::with_form_defaults(),
        }
    }
}

impl FieldStore {
    pub fn from_record(record: IntakeRecord) -> Self {
        Self { record }
    }

    pub fn get(&self, field: Field) -> &str {
        self.record.get(field)
    }

    /// Stores a value, coercing the experience slider into its range.
    ///
    /// Non-numeric experience input leaves the previous value in place.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        let value = match field {
            Field::AiExperience => match coerce_experience(&value) {
                Some(coerced) => coerced,
                None => return,
            },
            _ => value,
        };
        *self.record.slot_mut(field) = value;
        if self.record.use_case_preference() == Some(UseCasePreference::Inspiration) {
            self.record.use_case_text.clear();
        }
    }

    /// Stores a value by its wire name.
    pub fn set_by_name(&mut self, name: &str, value: impl Into<String>) -> DomainResult<()> {
        let field =
            Field::from_name(name).ok_or_else(|| DomainError::UnknownField(name.to_string()))?;
        self.set(field, value);
        Ok(())
    }

    /// Mutable access to a free text field for in-place editing.
    pub fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        if field.is_editable_text() {
            Some(self.record.slot_mut(field))
        } else {
            None
        }
    }

    /// Moves a choice field to the next or previous option, wrapping around.
    pub fn cycle(&mut self, field: Field, forward: bool) {
        match field.kind() {
            FieldKind::Choice => {
                let options = field.options();
                let current = options
                    .iter()
                    .position(|option| *option == self.get(field));
                let next = match (current, forward) {
                    (Some(index), true) => (index + 1) % options.len(),
                    (Some(index), false) => (index + options.len() - 1) % options.len(),
                    (None, true) => 0,
                    (None, false) => options.len() - 1,
                };
                self.set(field, options[next]);
            }
            FieldKind::Range => self.adjust_experience(if forward { 1 } else { -1 }),
            FieldKind::Preference => {
                let next = match self.record.use_case_preference() {
                    Some(preference) => preference.toggled(),
                    None if forward => UseCasePreference::Ideas,
                    None => UseCasePreference::Inspiration,
                };
                self.choose_use_case(next);
            }
            FieldKind::Text | FieldKind::LongText => {}
        }
    }

    pub fn adjust_experience(&mut self, delta: i8) {
        let current = self
            .record
            .ai_experience
            .parse::<i16>()
            .unwrap_or(MIN_AI_EXPERIENCE as i16);
        let next = (current + delta as i16).clamp(MIN_AI_EXPERIENCE as i16, MAX_AI_EXPERIENCE as i16);
        self.record.ai_experience = next.to_string();
    }

    /// Records the step 3 answer. Choosing inspiration discards any
    /// use case description typed earlier.
    pub fn choose_use_case(&mut self, preference: UseCasePreference) {
        self.record.use_case_preference = preference.as_str().to_string();
        if preference == UseCasePreference::Inspiration {
            self.record.use_case_text.clear();
        }
    }

    pub fn use_case_preference(&self) -> Option<UseCasePreference> {
        self.record.use_case_preference()
    }

    pub fn record(&self) -> &IntakeRecord {
        &self.record
    }

    /// Freezes the current values into an independent copy.
    pub fn snapshot(&self) -> IntakeRecord {
        self.record.clone()
    }
}

fn coerce_experience(value: &str) -> Option<String> {
    let parsed = value.trim().parse::<i64>().ok()?;
    Some(
        parsed
            .clamp(MIN_AI_EXPERIENCE as i64, MAX_AI_EXPERIENCE as i64)
            .to_string(),
    )
}

/// Which kind of response the report endpoint sends back on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// JSON acknowledgement; the report itself is mailed
    #[default]
    Informational,
    /// The report document itself, for download
    Document,
}

impl ResponseMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseMode::Informational => "informational",
            ResponseMode::Document => "document",
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "informational" | "json" => Ok(ResponseMode::Informational),
            "document" | "pdf" => Ok(ResponseMode::Document),
            other => Err(format!(
                "unknown response mode '{}', expected 'informational' or 'document'",
                other
            )),
        }
    }
}

/// Company name and email as entered by the user, plus the values the
/// report service echoed back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactEcho {
    pub submitted_company_name: String,
    pub submitted_email: String,
    pub confirmed_company_name: Option<String>,
    pub confirmed_email: Option<String>,
}

impl ContactEcho {
    pub fn submitted(record: &IntakeRecord) -> Self {
        Self {
            submitted_company_name: record.company_name.clone(),
            submitted_email: record.email.clone(),
            confirmed_company_name: None,
            confirmed_email: None,
        }
    }

    /// Applies the server echo. Empty values do not count as confirmation.
    pub fn confirm(mut self, company_name: Option<String>, email: Option<String>) -> Self {
        self.confirmed_company_name = company_name.filter(|value| !value.is_empty());
        self.confirmed_email = email.filter(|value| !value.is_empty());
        self
    }

    pub fn company_name(&self) -> &str {
        self.confirmed_company_name
            .as_deref()
            .unwrap_or(&self.submitted_company_name)
    }

    pub fn email(&self) -> &str {
        self.confirmed_email.as_deref().unwrap_or(&self.submitted_email)
    }
}

/// What a successful submission produced, before it is paired with the
/// submitted contact data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acknowledgement {
    Informational {
        message: String,
        company_name: Option<String>,
        email: Option<String>,
    },
    Document {
        document: Vec<u8>,
        company_name: String,
    },
}

/// Classified result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success(Acknowledgement),
    Failure(SubmissionError),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success(_))
    }
}

/// Data shown once the report request succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPayload {
    Informational { message: String, contact: ContactEcho },
    Document { document: Vec<u8>, company_name: String },
}

impl ResultPayload {
    pub fn company_name(&self) -> &str {
        match self {
            ResultPayload::Informational { contact, .. } => contact.company_name(),
            ResultPayload::Document { company_name, .. } => company_name,
        }
    }
}
