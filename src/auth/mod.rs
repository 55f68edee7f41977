//! Authentication: password hashing, bearer tokens and role gating.

mod extractor;
mod jwt;
pub mod password;

pub use extractor::{AuthUser, MaybeAuthUser};
pub use jwt::{Claims, TokenService, extract_bearer};
