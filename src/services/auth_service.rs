use crate::api::error::AppError;
use crate::config::AppConfig;
use crate::entities::{prelude::*, *};
use crate::utils::auth::{create_jwt, verify_password};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

pub struct LoginOutcome {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub username: String,
}

pub struct AuthService;

impl AuthService {
    pub async fn login(
        db: &DatabaseConnection,
        config: &AppConfig,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, AppError> {
        let user = AdminUsers::find()
            .filter(admin_users::Column::Username.eq(username))
            .one(db)
            .await?;

        let Some(user) = user.filter(|u| u.is_active) else {
            tracing::warn!("Login failed for {}: user not found or inactive", username);
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::warn!("Login failed for {}: invalid password", username);
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let username = user.username.clone();
        let user_id = user.id.clone();

        let mut model: admin_users::ActiveModel = user.into();
        model.last_login_at = Set(Some(Utc::now()));
        model.update(db).await?;

        let token = create_jwt(&user_id, &config.jwt_secret, config.jwt_expiry_minutes)?;
        let expires_at = Utc::now() + Duration::minutes(config.jwt_expiry_minutes);

        Ok(LoginOutcome {
            token,
            expires_at,
            username,
        })
    }
}
