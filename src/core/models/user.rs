use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Identifier issued by the external identity provider.
    pub auth_id: String,
    pub name: String,
}

/// Outcome of a lookup-or-register call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Registration {
    Found(User),
    Created(User),
}

impl Registration {
    pub fn user(&self) -> &User {
        match self {
            Registration::Found(user) | Registration::Created(user) => user,
        }
    }

    pub fn into_user(self) -> User {
        match self {
            Registration::Found(user) | Registration::Created(user) => user,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Registration::Created(_))
    }
}
