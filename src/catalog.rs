use serde::Serialize;

use crate::models::{Property, StatusCategory};

/// Listings split into the three landing-page sections
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertiesByCategory {
    #[serde(rename = "READY")]
    pub ready: Vec<Property>,
    #[serde(rename = "2026")]
    pub y2026: Vec<Property>,
    #[serde(rename = "2027")]
    pub y2027: Vec<Property>,
}

impl PropertiesByCategory {
    pub fn get(&self, category: StatusCategory) -> &[Property] {
        match category {
            StatusCategory::Ready => &self.ready,
            StatusCategory::Y2026 => &self.y2026,
            StatusCategory::Y2027 => &self.y2027,
        }
    }

    fn bucket_mut(&mut self, category: StatusCategory) -> &mut Vec<Property> {
        match category {
            StatusCategory::Ready => &mut self.ready,
            StatusCategory::Y2026 => &mut self.y2026,
            StatusCategory::Y2027 => &mut self.y2027,
        }
    }

    /// Buckets in display order
    pub fn iter(&self) -> impl Iterator<Item = (StatusCategory, &[Property])> {
        StatusCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// All listings in display order
    pub fn flatten(&self) -> Vec<Property> {
        self.iter().flat_map(|(_, bucket)| bucket.iter().cloned()).collect()
    }

    pub fn len(&self) -> usize {
        self.ready.len() + self.y2026.len() + self.y2027.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Group listings by category, each bucket ascending by `order`.
///
/// Listings sharing an `order` keep their input order.
pub fn group_by_category(properties: &[Property]) -> PropertiesByCategory {
    let mut grouped = PropertiesByCategory::default();

    for property in properties {
        grouped.bucket_mut(property.category()).push(property.clone());
    }
    for category in StatusCategory::ALL {
        grouped.bucket_mut(category).sort_by_key(Property::order);
    }

    grouped
}

/// Listings visible to anonymous visitors
pub fn published(properties: &[Property]) -> Vec<Property> {
    properties.iter().filter(|p| p.is_published()).cloned().collect()
}

/// New `order` values for a category after a drag-and-drop reorder:
/// each id takes its position in the list.
pub fn reorder_positions(ordered_ids: &[String]) -> Vec<(&str, i64)> {
    ordered_ids
        .iter()
        .enumerate()
        .map(|(index, id)| (id.as_str(), index as i64))
        .collect()
}
