pub mod card;
pub mod common;
pub mod subscription;
pub mod template;
pub mod user;

pub use card::*;
pub use common::*;
pub use subscription::*;
pub use template::*;
pub use user::*;
