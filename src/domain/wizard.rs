//! Step sequencing for the four-step intake wizard.
//!
//! The wizard moves strictly one step at a time. Moving forward is gated on
//! the required fields of the current step, moving back is always allowed
//! except from the first step.

use super::errors::{DomainError, DomainResult};
use super::models::{Field, FieldStore, UseCasePreference};

/// One page of the intake wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Company identity
    Company,
    /// AI maturity signals
    Maturity,
    /// Use case preference, optionally with a description
    UseCases,
    /// Contact details; the form is submitted from here
    Contact,
}

impl Step {
    pub const COUNT: usize = 4;

    pub fn number(self) -> usize {
        match self {
            Step::Company => 1,
            Step::Maturity => 2,
            Step::UseCases => 3,
            Step::Contact => 4,
        }
    }

    pub fn from_number(number: usize) -> Option<Step> {
        match number {
            1 => Some(Step::Company),
            2 => Some(Step::Maturity),
            3 => Some(Step::UseCases),
            4 => Some(Step::Contact),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Step> {
        Step::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Step> {
        Step::from_number(self.number() - 1)
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Company => "Start jouw AI Scan",
            Step::Maturity => "Huidige Situatie",
            Step::UseCases => "Jouw Ideëen",
            Step::Contact => "Jouw Rapport is bijna klaar",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Step::Company => "Laten we kennismaken met je bedrijf.",
            Step::Maturity => "Waar staan jullie nu?",
            Step::UseCases => "Heb je al use cases die je met AI wil aanpakken?",
            Step::Contact => "We sturen het rapport ook naar je mail.",
        }
    }

    /// All fields that belong to this step, visible or not.
    pub fn fields(self) -> &'static [Field] {
        match self {
            Step::Company => &[
                Field::CompanyName,
                Field::Url,
                Field::Employees,
                Field::Industry,
            ],
            Step::Maturity => &[Field::AiExperience, Field::ChatgptPolicy],
            Step::UseCases => &[Field::UseCasePreference, Field::UseCaseText],
            Step::Contact => &[Field::Name, Field::Email],
        }
    }

    /// Fields that block advancing while blank.
    pub fn required(self) -> &'static [Field] {
        match self {
            Step::Company => &[Field::CompanyName, Field::Url],
            Step::Maturity | Step::UseCases => &[],
            Step::Contact => &[Field::Name, Field::Email],
        }
    }
}

/// Tracks the current wizard step and enforces the navigation rules.
///
/// # Examples
///
/// ```
/// use symbis_scan::domain::{Field, FieldStore, Step, StepSequencer};
///
/// let mut store = FieldStore::default();
/// let mut wizard = StepSequencer::default();
/// assert!(wizard.advance(&store).is_err());
///
/// store.set(Field::CompanyName, "Acme");
/// store.set(Field::Url, "https://acme.nl");
/// assert_eq!(wizard.advance(&store), Ok(Step::Maturity));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSequencer {
    step: Step,
}

impl Default for StepSequencer {
    fn default() -> Self {
        Self {
            step: Step::Company,
        }
    }
}

impl StepSequencer {
    pub fn at(step: Step) -> Self {
        Self { step }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn is_last(&self) -> bool {
        self.step.is_last()
    }

    /// Moves forward one step when the current step is complete.
    ///
    /// On the last step nothing changes and the current step is returned.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ValidationGap`] when a required field of the
    /// current step is blank. The step is left unchanged.
    pub fn advance(&mut self, store: &FieldStore) -> DomainResult<Step> {
        let missing = self.missing_required(store);
        if !missing.is_empty() {
            return Err(DomainError::ValidationGap {
                step: self.step,
                missing,
            });
        }
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Moves back one step. Returns `false` on the first step.
    pub fn retreat(&mut self) -> bool {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                true
            }
            None => false,
        }
    }

    /// Fraction of the wizard reached, `step / 4`.
    pub fn progress(&self) -> f64 {
        self.step.number() as f64 / Step::COUNT as f64
    }

    pub fn progress_percent(&self) -> u16 {
        (self.step.number() * 100 / Step::COUNT) as u16
    }

    pub fn missing_required(&self, store: &FieldStore) -> Vec<Field> {
        self.step
            .required()
            .iter()
            .copied()
            .filter(|field| store.get(*field).trim().is_empty())
            .collect()
    }

    /// Fields shown on the current step, in display order.
    ///
    /// The use case description only appears once "ideas" is chosen.
    pub fn visible_fields(&self, store: &FieldStore) -> Vec<Field> {
        let ideas = store.use_case_preference() == Some(UseCasePreference::Ideas);
        self.step
            .fields()
            .iter()
            .copied()
            .filter(|field| *field != Field::UseCaseText || ideas)
            .collect()
    }
}
