use chrono::{SecondsFormat, TimeZone, Utc};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::MemoryAuth;
use crate::mapping::listing_fields;
use crate::models::{
    DocumentLink, Listing, OwnershipType, PropertyType, StatusCategory, TransparencyInfo, UnitType,
};
use crate::store::{Document, MemoryStore, ADMINS, PROPERTIES};
use crate::Result;

pub const DEMO_ADMIN_EMAIL: &str = "admin@demo.local";
pub const DEMO_ADMIN_PASSWORD: &str = "demo-password";
const DEMO_ADMIN_UID: &str = "demo-admin";

fn timestamp(year: i32, month: u32, day: u32) -> Value {
    let stamp = Utc
        .with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Micros, true));
    json!(stamp)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Sample Phuket projects across all three categories
pub fn demo_listings() -> Vec<(String, Listing)> {
    vec![
        (
            "ever-prime-karon".to_string(),
            Listing {
                status_category: StatusCategory::Y2026,
                project_name: "Ever Prime".to_string(),
                area: "Karon".to_string(),
                property_type: PropertyType::Condo,
                unit_types: vec![UnitType {
                    name: "Apartament 1-pokojowy".to_string(),
                    size_sqm_from: 32.0,
                    size_sqm_to: 35.0,
                    price_from_thb: 3_946_800.0,
                    price_from_eur: 109_000.0,
                }],
                size_sqm_from: 32.0,
                size_sqm_to: 35.0,
                price_from_thb: 3_946_800.0,
                price_from_eur: 109_000.0,
                ownership: OwnershipType::Leasehold,
                completion: Some("2026-12".to_string()),
                highlights: strings(&[
                    "Centrum Karon, spacer do plaży",
                    "Pakiet mebli w cenie",
                    "Model operatorski z pulą najmu",
                ]),
                transparency: Some(TransparencyInfo {
                    cam_per_sqm: Some(65.0),
                    sinking_fund: Some(500.0),
                    transfer_fee: Some("1,1% (Leasehold)".to_string()),
                    management_fee: Some("Wliczone w pulę najmu".to_string()),
                    notes: None,
                }),
                operator_model: Some("Profesjonalny operator hotelowy z opcją puli najmu".to_string()),
                docs: vec![DocumentLink {
                    title: "Cennik".to_string(),
                    url: "#".to_string(),
                }],
                images: strings(&["https://images.unsplash.com/photo-1582268611958-ebfd161ef9cf?w=800&q=80"]),
                description: Some("Miejski komfort z atmosferą resortu w sercu Karon.".to_string()),
                location: None,
                is_published: true,
                order: 1,
            },
        ),
        (
            "trees-residence-bangtao".to_string(),
            Listing {
                status_category: StatusCategory::Y2026,
                project_name: "The Trees Residence".to_string(),
                area: "Bang Tao".to_string(),
                property_type: PropertyType::Condo,
                unit_types: vec![],
                size_sqm_from: 37.0,
                size_sqm_to: 42.0,
                price_from_thb: 4_026_240.0,
                price_from_eur: 111_000.0,
                ownership: OwnershipType::Leasehold,
                completion: Some("2027-03".to_string()),
                highlights: strings(&[
                    "Lokalizacja premium Bang Tao",
                    "Ekologiczna koncepcja resortu",
                    "Licencja hotelowa",
                ]),
                transparency: Some(TransparencyInfo {
                    cam_per_sqm: Some(70.0),
                    sinking_fund: Some(550.0),
                    transfer_fee: Some("1,1% (Leasehold)".to_string()),
                    ..TransparencyInfo::default()
                }),
                operator_model: Some("Koncepcja hotelowa z profesjonalnym zarządzaniem".to_string()),
                docs: vec![],
                images: strings(&["https://images.unsplash.com/photo-1600596542815-ffad4c1539a9?w=800&q=80"]),
                description: None,
                location: None,
                is_published: true,
                order: 2,
            },
        ),
        (
            "rawai-beachfront".to_string(),
            Listing {
                status_category: StatusCategory::Ready,
                project_name: "Rawai Beachfront Residences".to_string(),
                area: "Rawai".to_string(),
                property_type: PropertyType::Condo,
                unit_types: vec![],
                size_sqm_from: 45.0,
                size_sqm_to: 55.0,
                price_from_thb: 5_500_000.0,
                price_from_eur: 151_000.0,
                ownership: OwnershipType::Freehold,
                completion: None,
                highlights: strings(&["Pierwsza linia brzegowa", "Gotowe do odbioru"]),
                transparency: Some(TransparencyInfo {
                    cam_per_sqm: Some(60.0),
                    sinking_fund: Some(400.0),
                    transfer_fee: Some("6,3% (Freehold)".to_string()),
                    ..TransparencyInfo::default()
                }),
                operator_model: Some("Agencja wynajmu na miejscu".to_string()),
                docs: vec![],
                images: strings(&["https://images.unsplash.com/photo-1600607687939-ce8a6c25118c?w=800&q=80"]),
                description: None,
                location: None,
                is_published: true,
                order: 1,
            },
        ),
        (
            "layan-pool-villas".to_string(),
            Listing {
                status_category: StatusCategory::Y2027,
                project_name: "Layan Pool Villas".to_string(),
                area: "Layan".to_string(),
                property_type: PropertyType::Villa,
                unit_types: vec![],
                size_sqm_from: 180.0,
                size_sqm_to: 260.0,
                price_from_thb: 20_000_000.0,
                price_from_eur: 550_000.0,
                ownership: OwnershipType::Mixed,
                completion: Some("2027-09".to_string()),
                highlights: strings(&["Prywatny basen", "Widok na góry"]),
                transparency: None,
                operator_model: None,
                docs: vec![],
                images: strings(&["https://images.unsplash.com/photo-1613490493576-7fde63acd811?w=800&q=80"]),
                description: None,
                location: None,
                is_published: false,
                order: 1,
            },
        ),
    ]
}

/// In-memory store seeded with the demo listings and one admin record
pub fn demo_store() -> Result<MemoryStore> {
    info!("📋 Seeding demo catalog");

    let mut docs = Vec::new();
    for (id, listing) in demo_listings() {
        let mut fields = listing_fields(&listing)?;
        fields.insert("createdAt".to_string(), timestamp(2025, 1, 15));
        fields.insert("updatedAt".to_string(), timestamp(2026, 1, 1));
        docs.push(Document::new(id, fields));
    }

    let mut admin = crate::store::Fields::new();
    admin.insert("role".to_string(), json!("admin"));

    Ok(MemoryStore::new()
        .with_documents(PROPERTIES, docs)
        .with_documents(ADMINS, vec![Document::new(DEMO_ADMIN_UID, admin)]))
}

/// Sign-in provider knowing the demo admin account
pub fn demo_auth() -> MemoryAuth {
    MemoryAuth::new().with_account(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD, DEMO_ADMIN_UID)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::group_by_category;
    use crate::mapping::decode_properties;
    use crate::store::{DocumentStore, Query};

    #[tokio::test]
    async fn test_demo_store_decodes_cleanly() {
        let store = demo_store().unwrap();
        let docs = store.run_query(&Query::collection(PROPERTIES)).await.unwrap();

        let decoded = decode_properties(&docs);
        assert!(decoded.rejected.is_empty());

        let grouped = group_by_category(&decoded.records);
        assert_eq!(grouped.ready.len(), 1);
        assert_eq!(grouped.y2026.len(), 2);
        assert_eq!(grouped.y2027.len(), 1);
    }
}
