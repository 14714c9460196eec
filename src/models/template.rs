use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Business,
    Creative,
    Minimal,
}

impl std::str::FromStr for TemplateCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "business" => Ok(TemplateCategory::Business),
            "creative" => Ok(TemplateCategory::Creative),
            "minimal" => Ok(TemplateCategory::Minimal),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemplateResponse {
    pub id: String,
    pub name: String,
    pub category: TemplateCategory,
    pub preview: String,
    pub is_premium: bool,
    pub rating: f32,
    pub views: u32,
    /// primary, secondary, accent, background
    pub colors: Vec<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TemplateQuery {
    /// `all` (default) or one of `business`, `creative`, `minimal`.
    pub category: Option<String>,
}
