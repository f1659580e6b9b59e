use crate::database::{MongoDB, RESPONSES_COLLECTION};
use crate::models::questionnaire::Questionnaire;
use crate::utils::error::AppError;
use mongodb::bson::{Bson, Document};

/// Persists one questionnaire submission. Every call inserts a fresh
/// document, so identical resubmissions create duplicates.
pub async fn save_response(db: &MongoDB, response: &Questionnaire) -> Result<(), AppError> {
    response.validate()?;

    let collection = db.collection::<Document>(RESPONSES_COLLECTION);

    let result = collection
        .insert_one(response.to_document())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if result.inserted_id == Bson::Null {
        return Err(AppError::Database(
            "Insert was not acknowledged".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Persistence paths need a live MongoDB; the validation gate is the
    // part checked here (no side effect may precede it).
    #[test]
    fn test_invalid_preference_is_rejected_before_insert() {
        let bad = Questionnaire {
            major: "Biology".to_string(),
            preference: "montessori".to_string(),
        };
        assert!(matches!(bad.validate(), Err(AppError::Validation(_))));
    }
}
