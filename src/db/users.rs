//! Database operations for users.

use sea_orm::*;

use crate::entity::user;
use crate::error::AppResult;

impl super::DbPool {
    /// Find a user by email. Emails are stored lowercased.
    pub async fn find_user_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.connection())
            .await?;

        Ok(result)
    }
}
