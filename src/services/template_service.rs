use crate::entities::CardColors;
use crate::error::{AppError, AppResult};
use crate::models::{TemplateCategory, TemplateResponse};

/// Template used when a card is saved without one.
pub const DEFAULT_TEMPLATE_ID: &str = "professional-navy";

#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub category: TemplateCategory,
    pub preview: &'static str,
    pub is_premium: bool,
    pub rating: f32,
    pub views: u32,
    /// primary, secondary, accent, background
    pub palette: [&'static str; 4],
}

impl Template {
    pub fn default_colors(&self) -> CardColors {
        let [primary, secondary, accent, background] = self.palette;
        CardColors {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            accent: accent.to_string(),
            background: background.to_string(),
        }
    }
}

impl From<&Template> for TemplateResponse {
    fn from(t: &Template) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name.to_string(),
            category: t.category,
            preview: t.preview.to_string(),
            is_premium: t.is_premium,
            rating: t.rating,
            views: t.views,
            colors: t.palette.iter().map(|c| c.to_string()).collect(),
        }
    }
}

pub static TEMPLATES: [Template; 6] = [
    Template {
        id: "modern-geometric",
        name: "Modern Geometric",
        category: TemplateCategory::Creative,
        preview: "modern-geo",
        is_premium: false,
        rating: 4.8,
        views: 1240,
        palette: ["#F59E0B", "#10B981", "#3B82F6", "#EF4444"],
    },
    Template {
        id: "professional-navy",
        name: "Professional Navy",
        category: TemplateCategory::Business,
        preview: "prof-navy",
        is_premium: true,
        rating: 4.9,
        views: 2130,
        palette: ["#1E293B", "#0F172A", "#64748B", "#CBD5E1"],
    },
    Template {
        id: "vibrant-coral",
        name: "Vibrant Coral",
        category: TemplateCategory::Creative,
        preview: "vibrant-coral",
        is_premium: false,
        rating: 4.7,
        views: 890,
        palette: ["#EF4444", "#F97316", "#FEF3C7", "#FFFFFF"],
    },
    Template {
        id: "minimalist-teal",
        name: "Minimalist Teal",
        category: TemplateCategory::Minimal,
        preview: "minimal-teal",
        is_premium: true,
        rating: 4.9,
        views: 1560,
        palette: ["#0D9488", "#14B8A6", "#F0FDFA", "#FFFFFF"],
    },
    Template {
        id: "gradient-purple",
        name: "Gradient Purple",
        category: TemplateCategory::Creative,
        preview: "gradient-purple",
        is_premium: false,
        rating: 4.6,
        views: 720,
        palette: ["#8B5CF6", "#A855F7", "#DDD6FE", "#FFFFFF"],
    },
    Template {
        id: "corporate-blue",
        name: "Corporate Blue",
        category: TemplateCategory::Business,
        preview: "corporate-blue",
        is_premium: true,
        rating: 4.8,
        views: 1890,
        palette: ["#1E40AF", "#3B82F6", "#DBEAFE", "#FFFFFF"],
    },
];

/// Read-only view over the built-in template catalog.
#[derive(Clone, Default)]
pub struct TemplateService;

impl TemplateService {
    pub fn new() -> Self {
        Self
    }

    /// `None` or `"all"` lists everything; otherwise filters by category.
    pub fn list_templates(&self, category: Option<&str>) -> AppResult<Vec<TemplateResponse>> {
        let filter = match category {
            None | Some("all") | Some("") => None,
            Some(raw) => Some(raw.parse::<TemplateCategory>().map_err(|_| {
                AppError::ValidationError(format!("Unknown template category '{raw}'"))
            })?),
        };

        Ok(TEMPLATES
            .iter()
            .filter(|t| filter.is_none_or(|c| t.category == c))
            .map(TemplateResponse::from)
            .collect())
    }

    pub fn get_template(&self, id: &str) -> AppResult<TemplateResponse> {
        find_template(id)
            .map(TemplateResponse::from)
            .ok_or_else(|| AppError::NotFound("Template not found".to_string()))
    }
}

pub fn find_template(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}
