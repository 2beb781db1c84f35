//! Recipe records and submission forms.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A recipe record as served by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Server-assigned board number identifying the record.
    pub board_no: u64,
    /// Recipe title.
    pub title: String,
    /// Recipe body text.
    #[serde(default)]
    pub content: String,
    /// Category the recipe is filed under.
    #[serde(default)]
    pub category_no: Option<u64>,
    /// Display name of the author.
    #[serde(default)]
    pub writer: Option<String>,
}

/// Reference to a recipe returned by create/update confirmations.
///
/// Decodes from either a bare `{ "boardNo": … }` reply or a full record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRef {
    /// Board number of the confirmed record.
    pub board_no: u64,
}

/// Fields submitted when creating or updating a recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeForm {
    /// Recipe title; required.
    pub title: String,
    /// Recipe body text; required.
    pub content: String,
    /// Optional category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_no: Option<u64>,
}

impl RecipeForm {
    /// Validates the form before dispatch.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] when a required field is empty or the
    /// category number is zero.
    pub fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::MissingField("title"));
        }
        if self.content.trim().is_empty() {
            return Err(DomainError::MissingField("content"));
        }
        if let Some(category) = self.category_no
            && category == 0
        {
            return Err(DomainError::InvalidIdentifier(
                "categoryNo must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Validates a board number before it is interpolated into a path.
///
/// # Errors
///
/// Returns [`DomainError::InvalidIdentifier`] for zero.
pub fn validate_board_no(board_no: u64) -> DomainResult<u64> {
    if board_no == 0 {
        return Err(DomainError::InvalidIdentifier(
            "boardNo must be positive".to_string(),
        ));
    }
    Ok(board_no)
}
