//! Users service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::users::{
        UsersServiceError,
        data::NewUser,
        records::{UserRecord, UserUuid},
        repository::PgUsersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    #[tracing::instrument(
        name = "users.service.create_user",
        skip(self, user),
        fields(user_uuid = %user.uuid, username = %user.username),
        err
    )]
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self
            .repository
            .create_user(&mut tx, user, Timestamp::now())
            .await?;

        tx.commit().await?;

        info!(user_uuid = %record.uuid, "registered user");

        Ok(record)
    }

    #[tracing::instrument(
        name = "users.service.get_user",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(name = "users.service.get_user_by_username", skip(self), err)]
    async fn get_user_by_username(&self, username: &str) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self
            .repository
            .get_user_by_username(&mut tx, username)
            .await?;

        tx.commit().await?;

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Register a user profile.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    /// Retrieve a single user.
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;

    /// Retrieve a user by their unique username.
    async fn get_user_by_username(&self, username: &str) -> Result<UserRecord, UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::new_user};

    use super::*;

    #[tokio::test]
    async fn create_user_stores_the_profile() -> TestResult {
        let ctx = TestContext::new().await;

        let user = ctx.users.create_user(new_user("rahim")).await?;

        assert_eq!(user.username, "rahim");
        assert_eq!(user.full_name(), "Rahim Uddin");
        assert!(user.bio.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.users.create_user(new_user("karim")).await?;

        let result = ctx.users.create_user(new_user("karim")).await;

        assert!(
            matches!(result, Err(UsersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn overlong_bio_is_invalid() -> TestResult {
        let ctx = TestContext::new().await;

        let mut user = new_user("nadia");
        user.bio = Some("x".repeat(201));

        let result = ctx.users.create_user(user).await;

        assert!(
            matches!(result, Err(UsersServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn lookup_by_uuid_and_username() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx.users.create_user(new_user("salma")).await?;

        let by_uuid = ctx.users.get_user(created.uuid).await?;
        let by_name = ctx.users.get_user_by_username("salma").await?;

        assert_eq!(by_uuid.uuid, created.uuid);
        assert_eq!(by_name.uuid, created.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.users.get_user(UserUuid::new()).await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
