pub mod jwt;
pub mod password;
pub mod qr;
pub mod slug;
pub mod validation;

pub use jwt::*;
pub use password::*;
pub use qr::{build_card_url, build_qr_code_url, resolve_qr_size};
pub use slug::{MAX_SLUG_ATTEMPTS, slug_candidate, slugify};
pub use validation::*;
