use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Request de exportación a PDF, discriminada por `kind`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentRequest {
    TestDriveAgreement { test_drive_id: Uuid },
    CustomerProfile { customer_id: Uuid },
    CostReport,
}

impl DocumentRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentRequest::TestDriveAgreement { .. } => "test_drive_agreement",
            DocumentRequest::CustomerProfile { .. } => "customer_profile",
            DocumentRequest::CostReport => "cost_report",
        }
    }
}
