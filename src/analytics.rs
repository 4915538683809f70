use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

/// Funnel events recorded by the landing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnalyticsEvent {
    #[serde(rename = "CTA_click")]
    CtaClick,
    #[serde(rename = "whatsapp_click")]
    WhatsappClick,
    #[serde(rename = "form_start")]
    FormStart,
    #[serde(rename = "form_submit")]
    FormSubmit,
    #[serde(rename = "object_open")]
    ObjectOpen,
    #[serde(rename = "calculator_use")]
    CalculatorUse,
    #[serde(rename = "faq_expand")]
    FaqExpand,
    #[serde(rename = "document_download")]
    DocumentDownload,
    #[serde(rename = "tab_switch")]
    TabSwitch,
}

impl AnalyticsEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CtaClick => "CTA_click",
            Self::WhatsappClick => "whatsapp_click",
            Self::FormStart => "form_start",
            Self::FormSubmit => "form_submit",
            Self::ObjectOpen => "object_open",
            Self::CalculatorUse => "calculator_use",
            Self::FaqExpand => "faq_expand",
            Self::DocumentDownload => "document_download",
            Self::TabSwitch => "tab_switch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsPayload {
    pub event: AnalyticsEvent,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

/// Record an event on the `analytics` tracing target
pub fn track(event: AnalyticsEvent, properties: Map<String, Value>) -> AnalyticsPayload {
    let payload = AnalyticsPayload {
        event,
        properties,
        timestamp: Utc::now(),
    };

    let properties = Value::Object(payload.properties.clone());
    info!(
        target: "analytics",
        event = event.as_str(),
        properties = %properties,
        "analytics event"
    );

    payload
}
