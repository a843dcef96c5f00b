use async_trait::async_trait;

use super::User;
use crate::shared::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user. Fails with `Conflict` if the username is taken.
    async fn insert(&self, user: User) -> DomainResult<()>;

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;
}
