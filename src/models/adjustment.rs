use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::media::ImageData;

/// Direction of a single adjustment line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum AdjustmentType {
    Add,
    Remove,
}

/// Lifecycle of a stock adjustment.
///
/// `Draft` is an authoring state; this engine collapses it to `Pending` on
/// submission. `Approved` and `Rejected` are terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum AdjustmentStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl AdjustmentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AdjustmentStatus::Approved | AdjustmentStatus::Rejected)
    }
}

/// Reason code for the "Other" catalog entry, which requires free-text
/// detail on the line.
pub const REASON_OTHER: &str = "OTHER";

/// A catalog reason a reviewer can attach to an adjustment line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AdjustmentReason {
    pub id: Uuid,
    pub code: &'static str,
    pub description: &'static str,
    pub is_active: bool,
}

/// The static reason catalog. Ids are stable so submitted adjustments stay
/// resolvable across process restarts.
pub static ADJUSTMENT_REASONS: Lazy<Vec<AdjustmentReason>> = Lazy::new(|| {
    vec![
        AdjustmentReason {
            id: Uuid::from_u128(0xA001),
            code: "DAMAGED",
            description: "Damaged",
            is_active: true,
        },
        AdjustmentReason {
            id: Uuid::from_u128(0xA002),
            code: "STOLEN",
            description: "Stolen",
            is_active: true,
        },
        AdjustmentReason {
            id: Uuid::from_u128(0xA003),
            code: "STOCK_TAKING_ERROR",
            description: "Stock-taking Error",
            is_active: true,
        },
        AdjustmentReason {
            id: Uuid::from_u128(0xA004),
            code: REASON_OTHER,
            description: "Other",
            is_active: true,
        },
    ]
});

pub fn reason_by_id(id: Uuid) -> Option<&'static AdjustmentReason> {
    ADJUSTMENT_REASONS.iter().find(|r| r.id == id)
}

pub fn reason_by_code(code: &str) -> Option<&'static AdjustmentReason> {
    ADJUSTMENT_REASONS.iter().find(|r| r.code == code)
}

/// One product's delta inside a stock adjustment.
///
/// Product fields are denormalized at submission time so the document stays
/// readable even if the catalog entry later changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentLine {
    pub product_id: Uuid,
    pub product_name: String,
    pub product_image: Option<ImageData>,
    pub category: String,
    pub adjustment_type: AdjustmentType,
    /// Magnitude of the change, always non-negative.
    pub quantity: i32,
    pub previous_quantity: i32,
    pub new_quantity: i32,
    pub reason_id: Uuid,
    pub custom_reason: Option<String>,
    pub proof: Option<ImageData>,
}

impl AdjustmentLine {
    /// The signed stock delta this line applies on approval.
    pub fn signed_delta(&self) -> i32 {
        match self.adjustment_type {
            AdjustmentType::Add => self.quantity,
            AdjustmentType::Remove => -self.quantity,
        }
    }
}

/// A stock adjustment document moving through the approval workflow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub id: Uuid,
    pub location_id: Uuid,
    pub location_name: String,
    pub lines: Vec<AdjustmentLine>,
    pub status: AdjustmentStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<String>,
    pub rejected_at: Option<DateTime<Utc>>,
}
