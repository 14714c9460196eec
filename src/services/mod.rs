pub mod auth_service;
pub mod card_service;
pub mod entitlement;
pub mod public_card_service;
pub mod subscription_service;
pub mod template_service;
pub mod trial_expiry_service;

pub use auth_service::*;
pub use card_service::CardService;
pub use public_card_service::*;
pub use subscription_service::*;
pub use template_service::TemplateService;
pub use trial_expiry_service::*;
