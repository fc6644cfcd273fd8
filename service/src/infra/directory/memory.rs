//! [`Memory`] [`Directory`] implementation.

use std::{convert::Infallible, sync::Arc};

use common::operations::{By, Select};

use crate::domain::{user, User};

use super::Directory;

/// Read-only [`Directory`] holding the known [`User`]s in memory.
///
/// The list is provided once on startup and never changes afterwards.
/// Cloning a [`Memory`] is cheap.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Known [`User`]s.
    users: Arc<[User]>,
}

impl Memory {
    /// Creates a new [`Memory`] [`Directory`] of the provided [`User`]s.
    #[must_use]
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().collect(),
        }
    }

    /// Returns the number of known [`User`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Indicates whether there are no known [`User`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl<'l> Directory<Select<By<Option<User>, &'l user::Identity>>> for Memory {
    type Ok = Option<User>;
    type Err = Infallible;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'l user::Identity>>,
    ) -> Result<Self::Ok, Self::Err> {
        let identity = by.into_inner();
        Ok(self
            .users
            .iter()
            .find(|u| u.is_identified_by(identity))
            .cloned())
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        Handler as _,
    };
    use secrecy::SecretBox;

    use crate::domain::{user, User};

    use super::Memory;

    fn user(id: &str, email: &str) -> User {
        User {
            id: user::Id::new(id).unwrap(),
            email: user::Email::new(email).unwrap(),
            name: user::Name::new("Someone").unwrap(),
            role: user::Role::Admin,
            password: SecretBox::new(Box::new(
                user::Password::new("secret").unwrap(),
            )),
        }
    }

    async fn select(dir: &Memory, identity: &str) -> Option<User> {
        let identity = user::Identity::new(identity).unwrap();
        dir.execute(Select(By::new(&identity))).await.unwrap()
    }

    #[tokio::test]
    async fn finds_user_by_id_or_email() {
        let dir = Memory::new([
            user("1", "first@institute.test"),
            user("2", "second@institute.test"),
        ]);

        assert_eq!(select(&dir, "2").await.unwrap().id.as_ref(), "2");
        assert_eq!(
            select(&dir, "first@institute.test").await.unwrap().id.as_ref(),
            "1",
        );
        assert!(select(&dir, "3").await.is_none());
        assert_eq!(dir.len(), 2);
    }

    #[tokio::test]
    async fn empty_directory_knows_nobody() {
        let dir = Memory::default();

        assert!(dir.is_empty());
        assert!(select(&dir, "1").await.is_none());
    }
}
