//! Repositorio genérico de usuarios
//!
//! Un único repositorio cubre los cuatro roles (admin, driver, conductor,
//! passenger); el rol es un dato del registro, no un módulo duplicado.
//! El teléfono es único a través de todos los roles.

use chrono::Utc;
use sqlx::PgPool;

use crate::models::user::{Role, User};
use crate::utils::errors::{AppError, AppResult};

const PHONE_CONSTRAINT: &str = "users_phone_key";

#[derive(Debug, Clone)]
pub struct NewUser {
    pub role: Role,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub license_number: Option<String>,
    pub image: Option<String>,
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: NewUser) -> AppResult<User> {
        let stored = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (role, name, phone, email, license_number, image, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user.role)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.email)
        .bind(&user.license_number)
        .bind(&user.image)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_phone_conflict(e, &user.phone))?;

        Ok(stored)
    }

    pub async fn find_by_id(&self, id: i64, role: Role) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND role = $2")
            .bind(id)
            .bind(role)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn list_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        let users =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE role = $1 ORDER BY id ASC")
                .bind(role)
                .fetch_all(&self.pool)
                .await?;
        Ok(users)
    }

    pub async fn update(&self, user: User) -> AppResult<User> {
        let phone = user.phone.clone();
        let stored = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, phone = $3, email = $4, license_number = $5, image = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.email)
        .bind(&user.license_number)
        .bind(&user.image)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_phone_conflict(e, &phone))?
        .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", user.id)))?;

        Ok(stored)
    }

    pub async fn delete(&self, id: i64, role: Role) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = $2")
            .bind(id)
            .bind(role)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Unicidad de teléfono a través de todos los tipos de usuario
    pub async fn phone_exists(&self, phone: &str, exclude_user: Option<i64>) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE phone = $1 AND ($2::bigint IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(phone)
        .bind(exclude_user)
        .fetch_one(&self.pool)
        .await?;
        Ok(result.0)
    }
}

fn map_phone_conflict(error: sqlx::Error, phone: &str) -> AppError {
    if super::is_unique_violation(&error, PHONE_CONSTRAINT) {
        return AppError::Conflict(format!("User with phone '{}' already exists", phone));
    }
    AppError::Database(error)
}
