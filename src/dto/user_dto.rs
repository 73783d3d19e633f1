use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::{Role, User};

/// Request para crear un usuario de cualquier rol. Los requisitos por rol
/// (licencia para choferes) se verifican en el controller, no en tipos
/// duplicados por rol.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(length(min = 5, max = 20))]
    pub phone: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 3, max = 50))]
    pub license_number: Option<String>,

    pub image: Option<String>,
}

/// Request para actualizar un usuario existente
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 5, max = 20))]
    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 3, max = 50))]
    pub license_number: Option<String>,

    pub image: Option<String>,
}

/// Response de usuario para la API
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub role: Role,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub license_number: Option<String>,
    pub image: Option<String>,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            name: user.name,
            phone: user.phone,
            email: user.email,
            license_number: user.license_number,
            image: user.image,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}
