use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppError, models::Address};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAddressRequest {
    pub name: String,
    pub city: String,
    pub quartier: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl CreateAddressRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("name", &self.name),
            ("city", &self.city),
            ("quartier", &self.quartier),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::BadRequest(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateAddressRequest {
    pub name: Option<String>,
    pub city: Option<String>,
    pub quartier: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    /// `false` on the current default is rejected; make another address the default instead.
    pub is_default: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct AddressList {
    #[schema(value_type = Vec<Address>)]
    pub items: Vec<Address>,
}
