use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PastEvent {
    pub id: String,
    pub title: String,
    pub category: EventCategory,
    pub image_url: String,
    pub caption: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventCategory {
    Wedding,
    Corporate,
    Cultural,
    Birthday,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Wedding => "Wedding",
            EventCategory::Corporate => "Corporate",
            EventCategory::Cultural => "Cultural",
            EventCategory::Birthday => "Birthday",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Wedding" => Some(EventCategory::Wedding),
            "Corporate" => Some(EventCategory::Corporate),
            "Cultural" => Some(EventCategory::Cultural),
            "Birthday" => Some(EventCategory::Birthday),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: String,
    pub name: String,
    pub event_type: String,
    pub quote: String,
    pub avatar_url: String,
}
