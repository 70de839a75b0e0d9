//! Case models.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A case as needed by report generation and download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    pub id: Uuid,
    pub case_number: String,
    pub transition_aged_youth: bool,
    pub court_date: Option<NaiveDate>,
}

impl CaseRecord {
    /// Whether the youth has aged out of the program.
    pub fn has_transitioned(&self) -> bool {
        self.transition_aged_youth
    }

    pub fn template_variant(&self) -> TemplateVariant {
        if self.has_transitioned() {
            TemplateVariant::Transition
        } else {
            TemplateVariant::NonTransition
        }
    }

    /// Filename the rendered report is attached under.
    pub fn report_filename(&self) -> String {
        format!("{}.docx", self.case_number)
    }
}

impl From<crate::entity::casa_case::Model> for CaseRecord {
    fn from(m: crate::entity::casa_case::Model) -> Self {
        Self {
            id: m.id,
            case_number: m.case_number,
            transition_aged_youth: m.transition_aged_youth,
            court_date: m.court_date,
        }
    }
}

/// Listing projection of a case assigned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AssignedCase {
    pub id: Uuid,
    pub case_number: String,
    pub transition_aged_youth: bool,
}

/// The two court report templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TemplateVariant {
    Transition,
    NonTransition,
}

impl TemplateVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transition => "transition",
            Self::NonTransition => "non_transition",
        }
    }

    /// Path of the template file for this variant under `template_dir`.
    pub fn template_path(&self, template_dir: &Path) -> PathBuf {
        template_dir.join(format!("report_template_{}.docx", self.as_str()))
    }
}

impl std::fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
