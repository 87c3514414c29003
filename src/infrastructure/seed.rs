use crate::config::AppConfig;
use crate::entities::{admin_users, prelude::*};
use crate::utils::auth::hash_password;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use tracing::info;
use uuid::Uuid;

/// Create the default admin account when the table is empty.
pub async fn seed_admin_user(db: &DatabaseConnection, config: &AppConfig) -> anyhow::Result<()> {
    if AdminUsers::find().count(db).await? > 0 {
        return Ok(());
    }

    let admin = admin_users::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        username: Set(config.default_admin_username.clone()),
        password_hash: Set(hash_password(&config.default_admin_password)?),
        last_login_at: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    };
    admin.insert(db).await?;

    info!(
        "Default admin user created with username {}",
        config.default_admin_username
    );
    Ok(())
}
