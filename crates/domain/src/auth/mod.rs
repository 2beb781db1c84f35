//! Authentication wire types and single-use tokens.

mod types;

pub use types::{Credentials, GrantUser, IssuedToken, RegisterForm, ScratchToken, TokenGrant};
