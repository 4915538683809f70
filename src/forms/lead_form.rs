use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::format::is_valid_phone;
use crate::models::{Horizon, InvestmentGoal, LeadSubmission, StatusCategory};

/// Source tag of submissions from the Polish landing page
pub const LANDING_PAGE_SOURCE: &str = "landing_page_pl";

/// Contact form as filled in by a visitor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeadForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub budget: String,
    pub goal: Option<InvestmentGoal>,
    pub horizon: Option<Horizon>,
    pub preferred_category: Option<StatusCategory>,
    /// Data-processing consent, mandatory
    pub rodo_consent: bool,
    pub marketing_consent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LeadField {
    Name,
    Phone,
    RodoConsent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LeadFieldError {
    #[error("Imię i nazwisko jest wymagane")]
    NameRequired,
    #[error("Numer telefonu jest wymagany")]
    PhoneRequired,
    #[error("Proszę podać prawidłowy numer telefonu")]
    PhoneInvalid,
    #[error("Zgoda jest wymagana")]
    ConsentRequired,
}

fn join_messages(errors: &BTreeMap<LeadField, LeadFieldError>) -> String {
    let messages: Vec<String> = errors.values().map(ToString::to_string).collect();
    messages.join("; ")
}

/// Every failing field with the message shown next to it
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_messages(.0))]
pub struct LeadFormErrors(BTreeMap<LeadField, LeadFieldError>);

impl LeadFormErrors {
    pub fn get(&self, field: LeadField) -> Option<LeadFieldError> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LeadField, LeadFieldError)> + '_ {
        self.0.iter().map(|(f, e)| (*f, *e))
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl LeadForm {
    pub fn validate(&self) -> Result<(), LeadFormErrors> {
        let mut errors = BTreeMap::new();

        if self.name.trim().is_empty() {
            errors.insert(LeadField::Name, LeadFieldError::NameRequired);
        }

        if self.phone.trim().is_empty() {
            errors.insert(LeadField::Phone, LeadFieldError::PhoneRequired);
        } else if !is_valid_phone(self.phone.trim()) {
            errors.insert(LeadField::Phone, LeadFieldError::PhoneInvalid);
        }

        if !self.rodo_consent {
            errors.insert(LeadField::RodoConsent, LeadFieldError::ConsentRequired);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LeadFormErrors(errors))
        }
    }

    /// Validate and build the stored payload
    pub fn to_submission(&self) -> Result<LeadSubmission, LeadFormErrors> {
        self.validate()?;

        Ok(LeadSubmission {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: non_empty(&self.email),
            budget: non_empty(&self.budget),
            goal: self.goal,
            horizon: self.horizon,
            preferred_category: self.preferred_category,
            risk_profile: None,
            dsgvo_consent: self.rodo_consent,
            marketing_consent: self.marketing_consent,
            source: LANDING_PAGE_SOURCE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> LeadForm {
        LeadForm {
            name: " Anna Nowak ".to_string(),
            phone: "+48 601 234 567".to_string(),
            email: "".to_string(),
            budget: "500-800 tys. PLN".to_string(),
            goal: Some(InvestmentGoal::CapitalGrowth),
            horizon: Some(Horizon::ThreeToFive),
            preferred_category: Some(StatusCategory::Ready),
            rodo_consent: true,
            marketing_consent: false,
        }
    }

    #[test]
    fn test_valid_form() {
        let submission = filled().to_submission().unwrap();

        assert_eq!(submission.name, "Anna Nowak");
        assert_eq!(submission.email, None);
        assert_eq!(submission.budget.as_deref(), Some("500-800 tys. PLN"));
        assert!(submission.dsgvo_consent);
        assert_eq!(submission.source, LANDING_PAGE_SOURCE);
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = LeadForm::default().validate().unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get(LeadField::Name), Some(LeadFieldError::NameRequired));
        assert_eq!(errors.get(LeadField::Phone), Some(LeadFieldError::PhoneRequired));
        assert_eq!(
            errors.get(LeadField::RodoConsent),
            Some(LeadFieldError::ConsentRequired)
        );
    }

    #[test]
    fn test_consent_is_mandatory() {
        let form = LeadForm {
            rodo_consent: false,
            ..filled()
        };

        let errors = form.to_submission().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.to_string(), "Zgoda jest wymagana");
    }

    #[test]
    fn test_bad_phone() {
        let form = LeadForm {
            phone: "123".to_string(),
            ..filled()
        };

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(LeadField::Phone), Some(LeadFieldError::PhoneInvalid));
    }

    #[test]
    fn test_email_is_stored_as_typed() {
        let form = LeadForm {
            email: " jan@example ".to_string(),
            ..filled()
        };

        let submission = form.to_submission().unwrap();
        assert_eq!(submission.email.as_deref(), Some("jan@example"));
    }

    #[test]
    fn test_messages_joined() {
        let errors = LeadForm {
            name: String::new(),
            rodo_consent: false,
            ..filled()
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            errors.to_string(),
            "Imię i nazwisko jest wymagane; Zgoda jest wymagana"
        );
    }
}
