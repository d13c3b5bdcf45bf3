//! Seeds the access universe and the super admin role
//! Run with: cargo run --bin seed
//!
//! Optional `SEED_ADMIN_USER_ID` assigns the super admin role to that user.

use access_control::{Access, AccessSet};
use marketplace_api::{db::Database, Config};
use uuid::Uuid;

const SUPER_ADMIN_ROLE: &str = "super_admin";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info,marketplace_api=info".into()),
        )
        .init();

    let config = Config::load()?;
    let db = Database::connect(&config.database).await?;
    db.run_migrations().await?;

    let mut tx = db.pg.begin().await?;

    for access in Access::ALL {
        sqlx::query(
            r#"
            INSERT INTO accesses (token, label) VALUES ($1, $2)
            ON CONFLICT (token) DO UPDATE SET label = EXCLUDED.label
            "#,
        )
        .bind(access.as_str())
        .bind(access.label())
        .execute(&mut *tx)
        .await?;
    }
    tracing::info!(count = Access::ALL.len(), "Access tokens seeded");

    let role_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO roles (id, name, description, created_at, updated_at)
        VALUES ($1, $2, 'Every access in the marketplace admin', NOW(), NOW())
        ON CONFLICT (name) DO UPDATE SET updated_at = NOW()
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(SUPER_ADMIN_ROLE)
    .fetch_one(&mut *tx)
    .await?;

    let tokens: Vec<String> = AccessSet::all()
        .iter()
        .map(|a| a.as_str().to_string())
        .collect();
    sqlx::query(
        r#"
        INSERT INTO role_accesses (role_id, access)
        SELECT $1, UNNEST($2::TEXT[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(role_id)
    .bind(tokens)
    .execute(&mut *tx)
    .await?;
    tracing::info!(%role_id, "Super admin role ready");

    if let Ok(raw) = std::env::var("SEED_ADMIN_USER_ID") {
        let user_id: Uuid = raw
            .parse()
            .map_err(|e| anyhow::anyhow!("SEED_ADMIN_USER_ID is not a UUID: {}", e))?;

        sqlx::query(
            r#"
            INSERT INTO users (id, role_id) VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET role_id = EXCLUDED.role_id
            "#,
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&mut *tx)
        .await?;
        tracing::info!(%user_id, "Super admin role assigned");
    }

    tx.commit().await?;
    tracing::info!("Seed completed");

    Ok(())
}
