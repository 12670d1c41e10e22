pub mod current_user;
pub mod token_claims;

pub use current_user::CurrentUser;
pub use token_claims::TokenClaims;
