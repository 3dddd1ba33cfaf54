use serde::{Deserialize, Serialize};

/// Body accepted by the create endpoints, from the HTML form or as JSON.
///
/// `expires_in` stays a raw string here: an empty or malformed value means
/// the paste never expires, it is not a validation error.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaste {
    pub title: Option<String>,
    pub content: String,
    pub expires_in: Option<String>,
}

#[derive(Serialize)]
pub struct CreatedPaste {
    pub id: String,
    pub url: String,
}
