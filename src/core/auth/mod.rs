use serde::{Deserialize, Serialize};

/// Credentials handed over by the auth provider. Already validated; this
/// engine only trims surrounding whitespace before use.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    pub display_name: String,
    pub uuid: String,
    pub access_token: String,
}

impl AuthContext {
    pub fn new(display_name: &str, uuid: &str, access_token: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            uuid: uuid.to_string(),
            access_token: access_token.to_string(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.display_name.trim()
    }

    pub fn uuid(&self) -> &str {
        self.uuid.trim()
    }

    pub fn access_token(&self) -> &str {
        self.access_token.trim()
    }
}
