//! Stores: auth flows and recipe list/detail state.

mod auth;
mod recipes;

pub use auth::AuthStore;
pub use recipes::{Filters, ListArgs, RecipeListState, RecipeStore};
