use serde::{Deserialize, Serialize};

use crate::format::{nice_eur_from_thb, parse_completion};
use crate::models::{Listing, OwnershipType, Property, PropertyType, StatusCategory};

/// Validation failures of the admin editor, in the console's language
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DraftError {
    #[error("Projektname ist erforderlich")]
    ProjectNameRequired,
    #[error("Lage/Area ist erforderlich")]
    AreaRequired,
    #[error("Preis (THB) ist erforderlich")]
    PriceRequired,
    #[error("Mindestens 1 Bild-URL ist erforderlich")]
    ImageRequired,
    #[error("Größe von ({from}) ist größer als Größe bis ({to})")]
    SizeRangeInverted { from: f64, to: f64 },
    #[error("Fertigstellung muss das Format JJJJ-MM haben: {0}")]
    InvalidCompletion(String),
}

/// Editor state of the admin property form.
///
/// Highlights and image URLs are edited as one entry per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertyDraft {
    pub status_category: StatusCategory,
    pub project_name: String,
    pub area: String,
    pub property_type: PropertyType,
    pub ownership: OwnershipType,
    pub completion: Option<String>,
    pub size_sqm_from: f64,
    pub size_sqm_to: f64,
    #[serde(rename = "priceFromTHB")]
    pub price_from_thb: f64,
    pub highlights_text: String,
    pub images_text: String,
    pub is_published: bool,
    pub order: i64,
}

impl Default for PropertyDraft {
    fn default() -> Self {
        Self {
            status_category: StatusCategory::Ready,
            project_name: String::new(),
            area: String::new(),
            property_type: PropertyType::Condo,
            ownership: OwnershipType::Leasehold,
            completion: None,
            size_sqm_from: 0.0,
            size_sqm_to: 0.0,
            price_from_thb: 0.0,
            highlights_text: String::new(),
            images_text: String::new(),
            is_published: false,
            order: 0,
        }
    }
}

impl From<&Property> for PropertyDraft {
    fn from(property: &Property) -> Self {
        let listing = &property.listing;
        Self {
            status_category: listing.status_category,
            project_name: listing.project_name.clone(),
            area: listing.area.clone(),
            property_type: listing.property_type,
            ownership: listing.ownership,
            completion: listing.completion.clone(),
            size_sqm_from: listing.size_sqm_from,
            size_sqm_to: listing.size_sqm_to,
            price_from_thb: listing.price_from_thb,
            highlights_text: listing.highlights.join("\n"),
            images_text: listing.images.join("\n"),
            is_published: listing.is_published,
            order: listing.order,
        }
    }
}

fn lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

impl PropertyDraft {
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.project_name.trim().is_empty() {
            return Err(DraftError::ProjectNameRequired);
        }
        if self.area.trim().is_empty() {
            return Err(DraftError::AreaRequired);
        }
        // NaN fails this comparison as well
        if !(self.price_from_thb > 0.0) {
            return Err(DraftError::PriceRequired);
        }
        if lines(&self.images_text).is_empty() {
            return Err(DraftError::ImageRequired);
        }
        if self.size_sqm_from > self.size_sqm_to {
            return Err(DraftError::SizeRangeInverted {
                from: self.size_sqm_from,
                to: self.size_sqm_to,
            });
        }
        if let Some(completion) = self.completion.as_deref().filter(|c| !c.is_empty()) {
            if parse_completion(completion).is_none() {
                return Err(DraftError::InvalidCompletion(completion.to_string()));
            }
        }
        Ok(())
    }

    /// Validate and build the listing to persist.
    ///
    /// When editing, `base` is the stored listing; fields the form does not
    /// cover (unit types, documents, cost transparency, description,
    /// location, operator model) are carried over from it.
    pub fn to_listing(&self, base: Option<&Listing>) -> Result<Listing, DraftError> {
        self.validate()?;

        Ok(Listing {
            status_category: self.status_category,
            project_name: self.project_name.trim().to_string(),
            area: self.area.trim().to_string(),
            property_type: self.property_type,
            unit_types: base.map(|b| b.unit_types.clone()).unwrap_or_default(),
            size_sqm_from: self.size_sqm_from,
            size_sqm_to: self.size_sqm_to,
            price_from_thb: self.price_from_thb,
            price_from_eur: nice_eur_from_thb(self.price_from_thb),
            ownership: self.ownership,
            completion: self.completion.clone().filter(|c| !c.is_empty()),
            highlights: lines(&self.highlights_text),
            transparency: base.and_then(|b| b.transparency.clone()),
            operator_model: base.and_then(|b| b.operator_model.clone()),
            docs: base.map(|b| b.docs.clone()).unwrap_or_default(),
            images: lines(&self.images_text),
            description: base.and_then(|b| b.description.clone()),
            location: base.and_then(|b| b.location),
            is_published: self.is_published,
            order: self.order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentLink, TransparencyInfo};

    fn draft() -> PropertyDraft {
        PropertyDraft {
            status_category: StatusCategory::Y2027,
            project_name: "  Laguna Lakeside ".to_string(),
            area: "Bang Tao".to_string(),
            size_sqm_from: 35.0,
            size_sqm_to: 80.0,
            price_from_thb: 4_200_000.0,
            highlights_text: "Widok na lagunę\n\n  Basen na dachu  \n".to_string(),
            images_text: "https://img.example/1.jpg\nhttps://img.example/2.jpg".to_string(),
            completion: Some("2027-06".to_string()),
            ..PropertyDraft::default()
        }
    }

    #[test]
    fn test_new_listing() {
        let listing = draft().to_listing(None).unwrap();

        assert_eq!(listing.project_name, "Laguna Lakeside");
        assert_eq!(listing.highlights, vec!["Widok na lagunę", "Basen na dachu"]);
        assert_eq!(listing.images.len(), 2);
        // 4 200 000 THB = 115 500 EUR
        assert_eq!(listing.price_from_eur, 116_000.0);
        assert!(listing.docs.is_empty());
        assert!(!listing.is_published);
    }

    #[test]
    fn test_required_fields_in_order() {
        let empty = PropertyDraft::default();
        assert_eq!(empty.validate(), Err(DraftError::ProjectNameRequired));

        let no_area = PropertyDraft {
            area: " ".to_string(),
            ..draft()
        };
        assert_eq!(no_area.validate(), Err(DraftError::AreaRequired));

        let no_price = PropertyDraft {
            price_from_thb: 0.0,
            ..draft()
        };
        assert_eq!(no_price.validate(), Err(DraftError::PriceRequired));

        let no_images = PropertyDraft {
            images_text: "\n  \n".to_string(),
            ..draft()
        };
        assert_eq!(no_images.validate(), Err(DraftError::ImageRequired));
    }

    #[test]
    fn test_size_range_and_completion() {
        let inverted = PropertyDraft {
            size_sqm_from: 90.0,
            size_sqm_to: 40.0,
            ..draft()
        };
        assert!(matches!(
            inverted.validate(),
            Err(DraftError::SizeRangeInverted { .. })
        ));

        let bad_completion = PropertyDraft {
            completion: Some("Q3 2027".to_string()),
            ..draft()
        };
        assert_eq!(
            bad_completion.validate(),
            Err(DraftError::InvalidCompletion("Q3 2027".to_string()))
        );
    }

    #[test]
    fn test_edit_keeps_fields_outside_the_form() {
        let mut base = draft().to_listing(None).unwrap();
        base.docs = vec![DocumentLink {
            title: "Cennik".to_string(),
            url: "https://docs.example/cennik.pdf".to_string(),
        }];
        base.transparency = Some(TransparencyInfo {
            cam_per_sqm: Some(65.0),
            ..TransparencyInfo::default()
        });

        let edited = PropertyDraft {
            is_published: true,
            ..draft()
        };
        let listing = edited.to_listing(Some(&base)).unwrap();

        assert!(listing.is_published);
        assert_eq!(listing.docs, base.docs);
        assert_eq!(listing.transparency, base.transparency);
    }
}
