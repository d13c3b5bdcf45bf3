use access_control::AccessSet;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{foreign_key_violation_as_conflict, unique_violation_as_conflict, RoleRepository};
use crate::error::{AppError, Result};
use crate::models::{CreateRole, Role, UpdateRole};

const ROLE_COLUMNS: &str = r#"
    r.id, r.name, r.description, r.created_at, r.updated_at,
    COALESCE(
        array_agg(ra.access::TEXT ORDER BY ra.access) FILTER (WHERE ra.access IS NOT NULL),
        '{}'::TEXT[]
    ) AS accesses
"#;

#[derive(FromRow)]
struct RoleRow {
    id: Uuid,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    accesses: Vec<String>,
}

impl TryFrom<RoleRow> for Role {
    type Error = AppError;

    fn try_from(row: RoleRow) -> Result<Self> {
        let accesses = AccessSet::parse_all(&row.accesses).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("role {} holds {}", row.id, e))
        })?;

        Ok(Role {
            id: row.id,
            name: row.name,
            description: row.description,
            accesses,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn replace_accesses(
        tx: &mut Transaction<'_, Postgres>,
        role_id: Uuid,
        accesses: &AccessSet,
    ) -> Result<()> {
        sqlx::query("DELETE FROM role_accesses WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut **tx)
            .await?;

        let tokens: Vec<String> = accesses.iter().map(|a| a.as_str().to_string()).collect();
        sqlx::query(
            r#"
            INSERT INTO role_accesses (role_id, access)
            SELECT $1, UNNEST($2::TEXT[])
            "#,
        )
        .bind(role_id)
        .bind(tokens)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>> {
        let query = format!(
            r#"
            SELECT {ROLE_COLUMNS}
            FROM roles r
            LEFT JOIN role_accesses ra ON ra.role_id = r.id
            WHERE r.id = $1
            GROUP BY r.id
            "#
        );

        let row: Option<RoleRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Role::try_from).transpose()
    }

    async fn find_for_user(&self, user_id: Uuid) -> Result<Option<Role>> {
        let query = format!(
            r#"
            SELECT {ROLE_COLUMNS}
            FROM users u
            JOIN roles r ON r.id = u.role_id
            LEFT JOIN role_accesses ra ON ra.role_id = r.id
            WHERE u.id = $1
            GROUP BY r.id
            "#
        );

        let row: Option<RoleRow> = sqlx::query_as(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Role::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Role>> {
        let query = format!(
            r#"
            SELECT {ROLE_COLUMNS}
            FROM roles r
            LEFT JOIN role_accesses ra ON ra.role_id = r.id
            GROUP BY r.id
            ORDER BY r.name
            "#
        );

        let rows: Vec<RoleRow> = sqlx::query_as(&query).fetch_all(&self.pool).await?;

        rows.into_iter().map(Role::try_from).collect()
    }

    async fn create(&self, input: CreateRole) -> Result<Role> {
        let mut tx = self.pool.begin().await?;
        let id = Uuid::new_v4();

        let (created_at, updated_at): (DateTime<Utc>, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO roles (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            unique_violation_as_conflict(e, format!("Role name '{}' is already taken", input.name))
        })?;

        Self::replace_accesses(&mut tx, id, &input.accesses).await?;
        tx.commit().await?;

        Ok(Role {
            id,
            name: input.name,
            description: input.description,
            accesses: input.accesses,
            created_at,
            updated_at,
        })
    }

    async fn update(&self, id: Uuid, input: UpdateRole) -> Result<Option<Role>> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE roles
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(input.name.as_deref())
        .bind(input.description.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(|e| unique_violation_as_conflict(e, "Role name is already taken"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        if let Some(accesses) = &input.accesses {
            Self::replace_accesses(&mut tx, id, accesses).await?;
        }

        tx.commit().await?;

        self.find_by_id(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| foreign_key_violation_as_conflict(e, "Role is still assigned to users"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_members(&self, id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
