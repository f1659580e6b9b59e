use crate::utils::error::AppError;
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

pub const PREFERENCE_PUBLIC: &str = "public";
pub const PREFERENCE_PRIVATE: &str = "private";

/// A user's questionnaire answers: intended major plus the kind of
/// institution they prefer.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct Questionnaire {
    /// Free-text major, no format constraint
    pub major: String,
    /// Must be exactly "public" or "private" (case-sensitive, no trimming)
    pub preference: String,
}

impl Questionnaire {
    /// Checks the closed set on `preference`. Must pass before any
    /// persistence or outbound call happens.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.preference != PREFERENCE_PUBLIC && self.preference != PREFERENCE_PRIVATE {
            return Err(AppError::Validation(
                "Preference must be either \"public\" or \"private\"".to_string(),
            ));
        }
        Ok(())
    }

    /// The document shape persisted in the responses collection.
    pub fn to_document(&self) -> Document {
        doc! {
            "major": &self.major,
            "preference": &self.preference,
        }
    }
}
