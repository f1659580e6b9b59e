use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Local-account user document. OAuth identities live only in the session
/// and are never written to this collection.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub user_id: String,
    pub email: String,
    /// bcrypt hash, never the plaintext
    pub password: String,
    pub created_at: Option<BsonDateTime>,
}
