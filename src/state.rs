use crate::{
    config::{AppConfig, AuthSettings},
    db::OrmConn,
};

#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    pub auth: AuthSettings,
}

impl AppState {
    pub fn new(orm: OrmConn, config: &AppConfig) -> Self {
        Self {
            orm,
            auth: config.auth_settings(),
        }
    }
}
