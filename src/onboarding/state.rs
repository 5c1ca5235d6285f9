//! Wizard state — the single mutable record owned by the controller.

use serde::{Deserialize, Serialize};

use crate::templates::TemplateData;

/// Availability status of a domain input.
///
/// `None → Pending → {Accepted, Rejected}`; any edit goes back to `Pending`
/// (or `None` when the input is cleared).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainCheckStatus {
    #[default]
    None,
    Pending,
    Accepted,
    Rejected,
}

impl std::fmt::Display for DomainCheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        };
        write!(f, "{s}")
    }
}

/// Direction of the last step change. Only drives transition presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn from_delta(delta: isize) -> Self {
        if delta < 0 {
            Self::Backward
        } else {
            Self::Forward
        }
    }
}

/// Status of the host's DAO creation transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaoCreationStatus {
    #[default]
    None,
    Pending,
    Success,
    Error,
}

impl std::fmt::Display for DaoCreationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for DaoCreationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            other => Err(format!("Unknown DAO creation status: {other}")),
        }
    }
}

/// Everything the wizard remembers between handler calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WizardState {
    /// Selected template id.
    pub template: Option<String>,
    /// Configuration fields of the selected template.
    pub template_data: TemplateData,
    /// Normalized name of the organization being created.
    pub domain: String,
    pub domain_check_status: DomainCheckStatus,
    /// Normalized name of an existing organization to open.
    pub domain_to_open: String,
    pub domain_to_open_check_status: DomainCheckStatus,
    pub step_index: usize,
    pub direction: Direction,
}
