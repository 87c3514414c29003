use crate::entities::{admin_users, play_logs, qr_codes, scan_logs, videos};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::env;
use std::time::Duration;
use tracing::info;

pub async fn setup_database() -> anyhow::Result<DatabaseConnection> {
    let db_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());

    info!("Database: {}", db_url);

    let mut opt = ConnectOptions::new(&db_url);
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;

    info!("Database connected");

    run_migrations(&db, &db_url).await?;

    Ok(db)
}

pub async fn run_migrations(db: &DatabaseConnection, db_url: &str) -> anyhow::Result<()> {
    if db_url.starts_with("postgres://") || db_url.starts_with("postgresql://") {
        info!("Running SQLx migrations for PostgreSQL...");
        let pool = sqlx::PgPool::connect(db_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
    } else {
        info!("Running SeaORM auto-migrations for SQLite...");
        let builder = db.get_database_backend();
        let schema = Schema::new(builder);

        let stmts = vec![
            schema
                .create_table_from_entity(videos::Entity)
                .if_not_exists()
                .to_owned(),
            schema
                .create_table_from_entity(qr_codes::Entity)
                .if_not_exists()
                .to_owned(),
            schema
                .create_table_from_entity(scan_logs::Entity)
                .if_not_exists()
                .to_owned(),
            schema
                .create_table_from_entity(play_logs::Entity)
                .if_not_exists()
                .to_owned(),
            schema
                .create_table_from_entity(admin_users::Entity)
                .if_not_exists()
                .to_owned(),
        ];

        for stmt in stmts {
            let stmt = builder.build(&stmt);
            db.execute(stmt).await?;
        }
    }

    Ok(())
}
