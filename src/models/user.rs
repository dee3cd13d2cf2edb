use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::middleware::auth::Claims;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Patient,
    Oncologist,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("PATIENT") {
            Ok(Role::Patient)
        } else if s.eq_ignore_ascii_case("ONCOLOGIST") {
            Ok(Role::Oncologist)
        } else {
            Err(format!("unknown role {s:?}"))
        }
    }
}

/// Authenticated identity handed to the services by the auth middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
}

impl Caller {
    pub fn patient(user_id: Uuid) -> Self {
        Self { user_id, role: Role::Patient }
    }

    pub fn oncologist(user_id: Uuid) -> Self {
        Self { user_id, role: Role::Oncologist }
    }

    /// `sub` must be a user UUID and `role` one of the known roles.
    pub fn from_claims(claims: &Claims) -> Result<Self> {
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| Error::Unauthorized("token subject is not a user id".to_string()))?;
        let role = claims
            .role
            .as_deref()
            .ok_or_else(|| Error::Forbidden("token carries no role".to_string()))?
            .parse::<Role>()
            .map_err(Error::Forbidden)?;
        Ok(Self { user_id, role })
    }

    pub fn require_patient(&self) -> Result<()> {
        match self.role {
            Role::Patient => Ok(()),
            Role::Oncologist => Err(Error::Forbidden(
                "Only patients can perform this action".to_string(),
            )),
        }
    }

    pub fn require_oncologist(&self) -> Result<()> {
        match self.role {
            Role::Oncologist => Ok(()),
            Role::Patient => Err(Error::Forbidden(
                "Only oncologists can perform this action".to_string(),
            )),
        }
    }
}
