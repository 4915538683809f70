use std::sync::Arc;
use std::time::Duration;

use phuket_invest::demo::{demo_auth, demo_store, DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD};
use phuket_invest::forms::{LeadForm, PropertyDraft};
use phuket_invest::models::{Horizon, StatusCategory};
use phuket_invest::service::{Audience, FeedState};
use phuket_invest::{DataService, Error};

fn service() -> DataService {
    DataService::new(
        Arc::new(demo_store().unwrap()),
        Arc::new(demo_auth()),
        Duration::from_secs(60),
    )
}

#[tokio::test]
async fn admin_edits_show_up_in_the_public_feed() {
    let service = service();
    let mut feed = service.watch_properties(Audience::Public).unwrap();

    let initial = feed.ready().await;
    assert_eq!(initial.records().len(), 3);
    assert!(initial.by_category().y2027.is_empty());

    service
        .login(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD)
        .await
        .unwrap();

    let draft = PropertyDraft {
        status_category: StatusCategory::Y2027,
        project_name: "Laguna Lakeside".to_string(),
        area: "Bang Tao".to_string(),
        size_sqm_from: 35.0,
        size_sqm_to: 80.0,
        price_from_thb: 4_200_000.0,
        images_text: "https://img.example/1.jpg".to_string(),
        completion: Some("2027-06".to_string()),
        is_published: true,
        order: 5,
        ..PropertyDraft::default()
    };
    let id = service
        .add_property(&draft.to_listing(None).unwrap())
        .await
        .unwrap();

    assert!(feed.changed().await);
    let state = feed.current();
    let grouped = state.by_category();
    assert_eq!(grouped.y2027.len(), 1);
    assert_eq!(grouped.y2027[0].id, id);
    assert_eq!(grouped.y2027[0].listing.price_from_eur, 116_000.0);

    service.delete_property(&id).await.unwrap();
    assert!(feed.changed().await);
    assert!(feed.current().by_category().y2027.is_empty());
}

#[tokio::test]
async fn editing_keeps_documents_and_transparency() {
    let service = service();
    service
        .login(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD)
        .await
        .unwrap();

    let stored = service.get_property("ever-prime-karon").await.unwrap();
    let mut draft = PropertyDraft::from(&stored);
    draft.area = "Karon Beach".to_string();

    let listing = draft.to_listing(Some(&stored.listing)).unwrap();
    service
        .update_property(&stored.id, &listing)
        .await
        .unwrap();

    let updated = service.get_property("ever-prime-karon").await.unwrap();
    assert_eq!(updated.listing.area, "Karon Beach");
    assert_eq!(updated.listing.docs, stored.listing.docs);
    assert_eq!(updated.listing.transparency, stored.listing.transparency);
    assert!(updated.updated_at > stored.updated_at);
}

#[tokio::test]
async fn leads_are_visible_to_admins_only() {
    let service = service();

    let form = LeadForm {
        name: "Anna Kowalska".to_string(),
        phone: "+48 600 123 456".to_string(),
        email: "anna@example.pl".to_string(),
        horizon: Some(Horizon::FiveToTen),
        preferred_category: Some(StatusCategory::Ready),
        rodo_consent: true,
        ..LeadForm::default()
    };
    let id = service.submit_lead(&form).await.unwrap();

    assert!(matches!(service.fetch_leads().await, Err(Error::NotAuthorized)));
    assert!(matches!(service.watch_leads(), Err(Error::NotAuthorized)));

    service
        .login(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD)
        .await
        .unwrap();
    let mut feed = service.watch_leads().unwrap();

    match feed.ready().await {
        FeedState::Ready(leads) => {
            assert_eq!(leads.records.len(), 1);
            let lead = &leads.records[0];
            assert_eq!(lead.id, id);
            assert_eq!(lead.submission.source, "landing_page_pl");
            assert!(lead.submission.dsgvo_consent);
        }
        other => panic!("unexpected lead feed state: {:?}", other),
    }
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let service = service();

    assert!(matches!(
        service.login(DEMO_ADMIN_EMAIL, "nope").await,
        Err(Error::InvalidCredentials)
    ));
    assert!(service.current_user().is_none());
}
