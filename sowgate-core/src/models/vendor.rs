use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A supplier company a SOW may be contracted with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub email: Option<String>,
}
