use serde::Serialize;

use crate::services::AccountInfo;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// The non-secret subset of an account returned from the public endpoints.
/// Deliberately excludes the id and every privilege flag.
#[derive(Debug, Serialize)]
pub struct ProfileDto {
    pub email: String,
    pub name: String,
}

impl From<AccountInfo> for ProfileDto {
    fn from(info: AccountInfo) -> Self {
        Self {
            email: info.email,
            name: info.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenDto {
    pub token: String,
}

/// Full account row for the admin surface (still no password material).
#[derive(Debug, Serialize)]
pub struct AccountDto {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<AccountInfo> for AccountDto {
    fn from(info: AccountInfo) -> Self {
        Self {
            id: info.id,
            email: info.email,
            name: info.name,
            is_active: info.is_active,
            is_staff: info.is_staff,
            is_superuser: info.is_superuser,
            created_at: info.created_at,
            updated_at: info.updated_at,
        }
    }
}
