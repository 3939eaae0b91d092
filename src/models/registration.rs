use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StallRegistration {
    pub id: String,
    pub vendor_name: String,
    pub stall_size: StallSize,
    pub category: String,
    pub payment_status: PaymentStatus,
    /// Absent until a stall has been assigned.
    pub stall_number: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampRegistration {
    pub id: String,
    pub child_name: String,
    pub age: u32,
    pub activity: String,
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StallSize {
    Small,
    Medium,
    Large,
}

impl StallSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            StallSize::Small => "Small",
            StallSize::Medium => "Medium",
            StallSize::Large => "Large",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Small" => Some(StallSize::Small),
            "Medium" => Some(StallSize::Medium),
            "Large" => Some(StallSize::Large),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Unpaid => "Unpaid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Paid" => Some(PaymentStatus::Paid),
            "Unpaid" => Some(PaymentStatus::Unpaid),
            _ => None,
        }
    }
}
