use anyhow::anyhow;
use tracing::instrument;
use uuid::Uuid;

use foodhub_core::AppError;

use crate::modules::users::directory::UserDirectory;
use crate::modules::users::model::{Address, CreateAddressDto, UpdateProfileDto, User};

pub struct UserService;

impl UserService {
    #[instrument(skip(users))]
    pub async fn get_profile(users: &dyn UserDirectory, user_id: Uuid) -> Result<User, AppError> {
        users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User with id {} not found", user_id)))
    }

    #[instrument(skip(users, dto))]
    pub async fn update_profile(
        users: &dyn UserDirectory,
        user_id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<User, AppError> {
        if dto.name.is_none() && dto.phone.is_none() {
            return Err(AppError::bad_request(anyhow!(
                "At least one of name or phone is required"
            )));
        }

        users.update_profile(user_id, dto.name, dto.phone).await
    }

    #[instrument(skip(users, dto))]
    pub async fn add_address(
        users: &dyn UserDirectory,
        user_id: Uuid,
        dto: CreateAddressDto,
    ) -> Result<Address, AppError> {
        let address = users.add_address(user_id, dto.into()).await?;
        tracing::info!(address_id = %address.id, is_default = address.is_default, "Address added");
        Ok(address)
    }

    #[instrument(skip(users))]
    pub async fn list_addresses(
        users: &dyn UserDirectory,
        user_id: Uuid,
    ) -> Result<Vec<Address>, AppError> {
        users.list_addresses(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::directory::InMemoryUserDirectory;
    use crate::modules::users::model::NewUser;
    use foodhub_auth::Role;

    async fn seeded() -> (InMemoryUserDirectory, User) {
        let directory = InMemoryUserDirectory::new();
        let user = directory
            .create_user(NewUser {
                email: "svc@example.com".to_string(),
                password_hash: "hash".to_string(),
                name: "Sam".to_string(),
                phone: "5550100".to_string(),
                role: Role::Customer,
            })
            .await
            .unwrap();
        (directory, user)
    }

    #[tokio::test]
    async fn test_get_profile_unknown_user_is_not_found() {
        let (directory, _) = seeded().await;
        let err = UserService::get_profile(&directory, Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
    }

    #[tokio::test]
    async fn test_empty_profile_update_is_bad_request() {
        let (directory, user) = seeded().await;
        let dto = UpdateProfileDto {
            name: None,
            phone: None,
        };
        let err = UserService::update_profile(&directory, user.id, dto)
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
    }

    #[tokio::test]
    async fn test_update_profile_changes_name() {
        let (directory, user) = seeded().await;
        let dto = UpdateProfileDto {
            name: Some("Samira".to_string()),
            phone: None,
        };
        let updated = UserService::update_profile(&directory, user.id, dto)
            .await
            .unwrap();
        assert_eq!(updated.name, "Samira");
        assert_eq!(updated.email, user.email);
    }
}
