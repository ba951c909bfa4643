mod errors;
mod memory;
mod sqlite;
mod types;

pub use errors::UserError;
pub use memory::MemoryUserDirectory;
pub use sqlite::SqliteUserDirectory;
pub use types::User;

use async_trait::async_trait;

/// Persistent directory of users known to this deployment.
///
/// `upsert_user` is keyed on `(provider, external_id)`: the first call for a
/// pair creates the user with a newly minted internal id, later calls return
/// the same id and refresh the email. The whole operation is atomic, so
/// concurrent logins for the same pair converge on one user.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    async fn upsert_user(
        &self,
        provider: &str,
        external_id: &str,
        email: &str,
    ) -> Result<User, UserError>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, UserError>;
}
