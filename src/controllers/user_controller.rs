//! Controller genérico de usuarios
//!
//! Un solo camino de código para los cuatro roles; los requisitos por rol
//! se expresan como datos (Role::requires_license), no como módulos
//! duplicados por tipo de usuario.

use sqlx::PgPool;
use validator::Validate;

use crate::dto::user_dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::models::user::Role;
use crate::repositories::user_repository::{NewUser, PgUserRepository};
use crate::utils::errors::{AppError, AppResult};

pub struct UserController {
    repository: PgUserRepository,
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgUserRepository::new(pool),
        }
    }

    pub async fn create(&self, role: Role, request: CreateUserRequest) -> AppResult<UserResponse> {
        request.validate()?;
        validate_role_fields(role, request.license_number.as_deref())?;

        // Pre-chequeo de teléfono; la constraint UNIQUE decide bajo carrera
        if self.repository.phone_exists(&request.phone, None).await? {
            return Err(AppError::Conflict(format!(
                "User with phone '{}' already exists",
                request.phone
            )));
        }

        let user = self
            .repository
            .create(NewUser {
                role,
                name: request.name,
                phone: request.phone,
                email: request.email,
                license_number: request.license_number,
                image: request.image,
            })
            .await?;

        Ok(user.into())
    }

    pub async fn get_by_id(&self, role: Role, id: i64) -> AppResult<UserResponse> {
        let user = self
            .repository
            .find_by_id(id, role)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} with id '{}' not found", role, id)))?;
        Ok(user.into())
    }

    pub async fn list(&self, role: Role) -> AppResult<Vec<UserResponse>> {
        let users = self.repository.list_by_role(role).await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    pub async fn update(
        &self,
        role: Role,
        id: i64,
        request: UpdateUserRequest,
    ) -> AppResult<UserResponse> {
        request.validate()?;

        let current = self
            .repository
            .find_by_id(id, role)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} with id '{}' not found", role, id)))?;

        let phone = request.phone.unwrap_or_else(|| current.phone.clone());
        if self.repository.phone_exists(&phone, Some(id)).await? {
            return Err(AppError::Conflict(format!(
                "User with phone '{}' already exists",
                phone
            )));
        }

        let license_number = request.license_number.or_else(|| current.license_number.clone());
        validate_role_fields(role, license_number.as_deref())?;

        let user = self
            .repository
            .update(crate::models::user::User {
                id: current.id,
                role: current.role,
                name: request.name.unwrap_or(current.name),
                phone,
                email: request.email.or(current.email),
                license_number,
                image: request.image.or(current.image),
                created_at: current.created_at,
            })
            .await?;

        Ok(user.into())
    }

    pub async fn delete(&self, role: Role, id: i64) -> AppResult<()> {
        if !self.repository.delete(id, role).await? {
            return Err(AppError::NotFound(format!(
                "{} with id '{}' not found",
                role, id
            )));
        }
        Ok(())
    }
}

/// Requisitos de campos por rol: licencia obligatoria para choferes,
/// rechazada para el resto
fn validate_role_fields(role: Role, license_number: Option<&str>) -> AppResult<()> {
    if role.requires_license() && license_number.is_none() {
        return Err(AppError::Validation(
            "license_number is required for drivers".to_string(),
        ));
    }
    if !role.requires_license() && license_number.is_some() {
        return Err(AppError::Validation(format!(
            "license_number does not apply to role '{}'",
            role
        )));
    }
    Ok(())
}
