use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::Language;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub language: Option<Language>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none() && self.state.is_none() && self.language.is_none()
    }
}
