//! Acting-user identity resolved by the external session collaborator.

use serde::{Deserialize, Serialize};

use crate::models::{Fixture, UserId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Organizer,
    User,
}

/// The resolved acting user for a mutating call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn admin(user_id: UserId) -> Self {
        Self { user_id, role: Role::Admin }
    }

    pub fn organizer(user_id: UserId) -> Self {
        Self { user_id, role: Role::Organizer }
    }

    pub fn user(user_id: UserId) -> Self {
        Self { user_id, role: Role::User }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins manage every match; anyone else only the matches they organize.
    pub fn can_manage(&self, fixture: &Fixture) -> bool {
        self.is_admin() || fixture.organizer_id == self.user_id
    }
}
