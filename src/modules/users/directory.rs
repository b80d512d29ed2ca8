//! User directory: account and address storage behind one async trait.
//!
//! Handlers never talk to the database directly; they go through
//! [`UserDirectory`], so the backing store can be PostgreSQL
//! ([`PgUserDirectory`]) or a remote user service without touching the
//! auth flow. Tests use [`InMemoryUserDirectory`].

use std::fmt::Debug;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use foodhub_auth::Role;
use foodhub_core::AppError;

use crate::modules::users::model::{Address, NewAddress, NewUser, User, UserCredentials};

#[async_trait]
pub trait UserDirectory: Send + Sync + Debug {
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    /// Fails with 409 when the email is already registered.
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Applies whichever of `name`/`phone` is `Some`. Fails with 404 for an
    /// unknown user.
    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        phone: Option<String>,
    ) -> Result<User, AppError>;

    /// Adding a default address clears the flag on the user's other addresses.
    async fn add_address(&self, user_id: Uuid, address: NewAddress) -> Result<Address, AppError>;

    /// Default address first, then newest first.
    async fn list_addresses(&self, user_id: Uuid) -> Result<Vec<Address>, AppError>;
}

fn duplicate_email() -> AppError {
    AppError::conflict(anyhow!("Email already registered"))
}

fn user_not_found(id: Uuid) -> AppError {
    AppError::not_found(anyhow!("User with id {} not found", id))
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    phone: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .with_context(|| format!("Stored role for user {} is invalid", row.id))?;

        Ok(User {
            id: row.id,
            email: row.email,
            name: row.name,
            phone: row.phone,
            role,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

#[derive(FromRow)]
struct AddressRow {
    id: Uuid,
    user_id: Uuid,
    street: String,
    city: String,
    postal_code: String,
    latitude: f64,
    longitude: f64,
    is_default: bool,
    created_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Address {
            id: row.id,
            user_id: row.user_id,
            street: row.street,
            city: row.city,
            postal_code: row.postal_code,
            latitude: row.latitude,
            longitude: row.longitude,
            is_default: row.is_default,
            created_at: row.created_at,
        }
    }
}

const USER_COLUMNS: &str = "id, email, name, phone, role, created_at";
const ADDRESS_COLUMNS: &str =
    "id, user_id, street, city, postal_code, latitude, longitude, is_default, created_at";

/// PostgreSQL-backed directory.
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    db: PgPool,
}

impl PgUserDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.db)
                .await
                .context("Failed to check email")?;

        Ok(exists)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (id, email, password_hash, name, phone, role) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(&new_user.name)
            .bind(&new_user.phone)
            .bind(new_user.role.as_str())
            .fetch_one(&self.db)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    duplicate_email()
                }
                other => AppError::internal(anyhow::Error::new(other).context("Failed to insert user")),
            })?;

        row.try_into()
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1");

        let row = sqlx::query_as::<_, CredentialsRow>(&sql)
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .context("Failed to fetch user credentials")?;

        row.map(|row| -> Result<UserCredentials, AppError> {
            Ok(UserCredentials {
                user: row.user.try_into()?,
                password_hash: row.password_hash,
            })
        })
        .transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("Failed to fetch user by ID")?
            .map(User::try_from)
            .transpose()
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        phone: Option<String>,
    ) -> Result<User, AppError> {
        let sql = format!(
            "UPDATE users SET name = COALESCE($2, name), phone = COALESCE($3, phone), \
             updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(name)
            .bind(phone)
            .fetch_optional(&self.db)
            .await
            .context("Failed to update profile")?
            .ok_or_else(|| user_not_found(id))?
            .try_into()
    }

    async fn add_address(&self, user_id: Uuid, address: NewAddress) -> Result<Address, AppError> {
        let mut tx = self.db.begin().await.context("Failed to begin transaction")?;

        if address.is_default {
            sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .context("Failed to reset default address")?;
        }

        let sql = format!(
            "INSERT INTO addresses (id, user_id, street, city, postal_code, latitude, longitude, is_default) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {ADDRESS_COLUMNS}"
        );

        let row = sqlx::query_as::<_, AddressRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&address.street)
            .bind(&address.city)
            .bind(&address.postal_code)
            .bind(address.latitude)
            .bind(address.longitude)
            .bind(address.is_default)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    user_not_found(user_id)
                }
                other => AppError::internal(anyhow::Error::new(other).context("Failed to insert address")),
            })?;

        tx.commit().await.context("Failed to commit address")?;

        Ok(row.into())
    }

    async fn list_addresses(&self, user_id: Uuid) -> Result<Vec<Address>, AppError> {
        let sql = format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE user_id = $1 \
             ORDER BY is_default DESC, created_at DESC"
        );

        let rows = sqlx::query_as::<_, AddressRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.db)
            .await
            .context("Failed to fetch addresses")?;

        Ok(rows.into_iter().map(Address::from).collect())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryUserDirectory;

#[cfg(any(test, feature = "test-utils"))]
mod memory {
    use std::collections::HashMap;

    use tokio::sync::RwLock;

    use super::*;

    #[derive(Debug, Default)]
    struct Store {
        users: HashMap<Uuid, UserCredentials>,
        addresses: Vec<Address>,
    }

    /// Process-local directory for tests and local runs.
    #[derive(Debug, Default)]
    pub struct InMemoryUserDirectory {
        store: RwLock<Store>,
    }

    impl InMemoryUserDirectory {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl UserDirectory for InMemoryUserDirectory {
        async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
            let store = self.store.read().await;
            Ok(store.users.values().any(|c| c.user.email == email))
        }

        async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
            let mut store = self.store.write().await;
            if store.users.values().any(|c| c.user.email == new_user.email) {
                return Err(duplicate_email());
            }

            let user = User {
                id: Uuid::new_v4(),
                email: new_user.email,
                name: new_user.name,
                phone: new_user.phone,
                role: new_user.role,
                created_at: Utc::now(),
            };
            store.users.insert(
                user.id,
                UserCredentials {
                    user: user.clone(),
                    password_hash: new_user.password_hash,
                },
            );

            Ok(user)
        }

        async fn find_credentials_by_email(
            &self,
            email: &str,
        ) -> Result<Option<UserCredentials>, AppError> {
            let store = self.store.read().await;
            Ok(store.users.values().find(|c| c.user.email == email).cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
            let store = self.store.read().await;
            Ok(store.users.get(&id).map(|c| c.user.clone()))
        }

        async fn update_profile(
            &self,
            id: Uuid,
            name: Option<String>,
            phone: Option<String>,
        ) -> Result<User, AppError> {
            let mut store = self.store.write().await;
            let credentials = store.users.get_mut(&id).ok_or_else(|| user_not_found(id))?;

            if let Some(name) = name {
                credentials.user.name = name;
            }
            if let Some(phone) = phone {
                credentials.user.phone = phone;
            }

            Ok(credentials.user.clone())
        }

        async fn add_address(
            &self,
            user_id: Uuid,
            address: NewAddress,
        ) -> Result<Address, AppError> {
            let mut store = self.store.write().await;
            if !store.users.contains_key(&user_id) {
                return Err(user_not_found(user_id));
            }

            if address.is_default {
                store
                    .addresses
                    .iter_mut()
                    .filter(|a| a.user_id == user_id)
                    .for_each(|a| a.is_default = false);
            }

            let address = Address {
                id: Uuid::new_v4(),
                user_id,
                street: address.street,
                city: address.city,
                postal_code: address.postal_code,
                latitude: address.latitude,
                longitude: address.longitude,
                is_default: address.is_default,
                created_at: Utc::now(),
            };
            store.addresses.push(address.clone());

            Ok(address)
        }

        async fn list_addresses(&self, user_id: Uuid) -> Result<Vec<Address>, AppError> {
            let store = self.store.read().await;
            let mut addresses: Vec<Address> = store
                .addresses
                .iter()
                .rev()
                .filter(|a| a.user_id == user_id)
                .cloned()
                .collect();
            addresses.sort_by_key(|a| !a.is_default);
            Ok(addresses)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: "Dana".to_string(),
            phone: "5550100".to_string(),
            role: Role::Customer,
        }
    }

    fn new_address(street: &str, is_default: bool) -> NewAddress {
        NewAddress {
            street: street.to_string(),
            city: "Lagos".to_string(),
            postal_code: "100001".to_string(),
            latitude: 6.5244,
            longitude: 3.3792,
            is_default,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let directory = InMemoryUserDirectory::new();
        let user = directory.create_user(new_user("dana@example.com")).await.unwrap();

        assert!(directory.email_exists("dana@example.com").await.unwrap());
        assert_eq!(directory.find_by_id(user.id).await.unwrap(), Some(user.clone()));

        let credentials = directory
            .find_credentials_by_email("dana@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(credentials.user, user);
        assert_eq!(credentials.password_hash, "hash");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let directory = InMemoryUserDirectory::new();
        directory.create_user(new_user("dup@example.com")).await.unwrap();

        let err = directory
            .create_user(new_user("dup@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 409);
    }

    #[tokio::test]
    async fn test_update_profile_keeps_omitted_fields() {
        let directory = InMemoryUserDirectory::new();
        let user = directory.create_user(new_user("p@example.com")).await.unwrap();

        let updated = directory
            .update_profile(user.id, None, Some("5550199".to_string()))
            .await
            .unwrap();
        assert_eq!(updated.name, "Dana");
        assert_eq!(updated.phone, "5550199");

        let err = directory
            .update_profile(Uuid::new_v4(), Some("X".to_string()), None)
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
    }

    #[tokio::test]
    async fn test_new_default_address_replaces_previous_default() {
        let directory = InMemoryUserDirectory::new();
        let user = directory.create_user(new_user("addr@example.com")).await.unwrap();

        directory
            .add_address(user.id, new_address("1 First Ave", true))
            .await
            .unwrap();
        directory
            .add_address(user.id, new_address("2 Second Ave", true))
            .await
            .unwrap();

        let addresses = directory.list_addresses(user.id).await.unwrap();
        assert_eq!(addresses.len(), 2);
        assert_eq!(addresses[0].street, "2 Second Ave");
        assert_eq!(addresses.iter().filter(|a| a.is_default).count(), 1);
        assert!(addresses[0].is_default);
    }

    #[tokio::test]
    async fn test_addresses_are_scoped_to_owner() {
        let directory = InMemoryUserDirectory::new();
        let alice = directory.create_user(new_user("alice@example.com")).await.unwrap();
        let bob = directory.create_user(new_user("bob@example.com")).await.unwrap();

        directory
            .add_address(alice.id, new_address("Alice St", false))
            .await
            .unwrap();

        assert!(directory.list_addresses(bob.id).await.unwrap().is_empty());
        assert_eq!(directory.list_addresses(alice.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_address_for_unknown_user_is_not_found() {
        let directory = InMemoryUserDirectory::new();
        let err = directory
            .add_address(Uuid::new_v4(), new_address("Nowhere", false))
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
    }

    #[tokio::test]
    async fn test_default_address_listed_first() {
        let directory = InMemoryUserDirectory::new();
        let user = directory.create_user(new_user("order@example.com")).await.unwrap();

        directory
            .add_address(user.id, new_address("Home", true))
            .await
            .unwrap();
        directory
            .add_address(user.id, new_address("Office", false))
            .await
            .unwrap();
        directory
            .add_address(user.id, new_address("Gym", false))
            .await
            .unwrap();

        let streets: Vec<String> = directory
            .list_addresses(user.id)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.street)
            .collect();
        assert_eq!(streets, ["Home", "Gym", "Office"]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_pg_create_user_assigns_id(pool: PgPool) {
        let directory = PgUserDirectory::new(pool);

        let user = directory.create_user(new_user("pg@example.com")).await.unwrap();
        assert_eq!(user.email, "pg@example.com");
        assert_eq!(user.role, Role::Customer);
        assert!(directory.email_exists("pg@example.com").await.unwrap());
        assert_eq!(directory.find_by_id(user.id).await.unwrap(), Some(user));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_pg_duplicate_email_is_conflict(pool: PgPool) {
        let directory = PgUserDirectory::new(pool);
        directory.create_user(new_user("pgdup@example.com")).await.unwrap();

        let err = directory
            .create_user(new_user("pgdup@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 409);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_pg_find_credentials_by_email(pool: PgPool) {
        let directory = PgUserDirectory::new(pool);
        let user = directory.create_user(new_user("creds@example.com")).await.unwrap();

        let credentials = directory
            .find_credentials_by_email("creds@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(credentials.user, user);
        assert_eq!(credentials.password_hash, "hash");

        assert!(
            directory
                .find_credentials_by_email("missing@example.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_pg_update_profile(pool: PgPool) {
        let directory = PgUserDirectory::new(pool);
        let user = directory.create_user(new_user("pgp@example.com")).await.unwrap();

        let updated = directory
            .update_profile(user.id, Some("Renamed".to_string()), None)
            .await
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.phone, "5550100");

        let err = directory
            .update_profile(Uuid::new_v4(), None, Some("1".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_pg_addresses_default_flag_and_order(pool: PgPool) {
        let directory = PgUserDirectory::new(pool);
        let user = directory.create_user(new_user("pga@example.com")).await.unwrap();

        let first = directory
            .add_address(user.id, new_address("1 First Ave", true))
            .await
            .unwrap();
        assert_eq!(first.user_id, user.id);
        assert!(first.is_default);

        directory
            .add_address(user.id, new_address("2 Second Ave", false))
            .await
            .unwrap();
        directory
            .add_address(user.id, new_address("3 Third Ave", true))
            .await
            .unwrap();

        let addresses = directory.list_addresses(user.id).await.unwrap();
        let streets: Vec<&str> = addresses.iter().map(|a| a.street.as_str()).collect();
        assert_eq!(streets, ["3 Third Ave", "2 Second Ave", "1 First Ave"]);
        assert_eq!(addresses.iter().filter(|a| a.is_default).count(), 1);
        assert!(addresses[0].is_default);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_pg_add_address_for_unknown_user_is_not_found(pool: PgPool) {
        let directory = PgUserDirectory::new(pool);
        let err = directory
            .add_address(Uuid::new_v4(), new_address("Nowhere", false))
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
    }
}
