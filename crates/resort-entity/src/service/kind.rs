//! Service type and category enumerations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Broad kind of a bookable service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "service_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceType {
    /// Spa treatment (massage, sauna, facial).
    Spa,
    /// Guided or hosted experience (tasting, hike, class).
    Experience,
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spa => write!(f, "SPA"),
            Self::Experience => write!(f, "EXPERIENCE"),
        }
    }
}

/// Domain-specific subtype used for filtering and dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "service_category", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceCategory {
    Wellness,
    Beauty,
    Fitness,
    Culinary,
    Nature,
    Culture,
    Adventure,
}

impl ServiceCategory {
    /// Uppercase code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wellness => "WELLNESS",
            Self::Beauty => "BEAUTY",
            Self::Fitness => "FITNESS",
            Self::Culinary => "CULINARY",
            Self::Nature => "NATURE",
            Self::Culture => "CULTURE",
            Self::Adventure => "ADVENTURE",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
