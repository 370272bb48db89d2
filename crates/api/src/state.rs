use sqlx::SqlitePool;

use crate::auth::{AuthConfig, JwtService};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    auth_config: AuthConfig,
    jwt_service: JwtService,
}

impl AppState {
    pub fn new(db: SqlitePool) -> anyhow::Result<Self> {
        let auth_config = AuthConfig::from_env()?;
        let jwt_service = JwtService::new(&auth_config);

        Ok(Self {
            db,
            auth_config,
            jwt_service,
        })
    }

    pub fn auth_config(&self) -> &AuthConfig {
        &self.auth_config
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}
