//! Three-tier authorization: self-service for any signed-in user, plus the
//! `driver` and `admin` elevated roles. Each route declares the capability it
//! needs and checks it against the caller's role.

use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::order_status::Actor;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[sea_orm(string_value = "client")]
    Client,
    #[sea_orm(string_value = "driver")]
    Driver,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UserRole::Client => "client",
            UserRole::Driver => "driver",
            UserRole::Admin => "admin",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Acting on the caller's own cart, orders, addresses and profile.
    SelfService,
    Driver,
    Admin,
}

impl UserRole {
    pub fn grants(self, capability: Capability) -> bool {
        match capability {
            Capability::SelfService => true,
            Capability::Driver => self == UserRole::Driver,
            Capability::Admin => self == UserRole::Admin,
        }
    }
}

/// Resolve who may drive an order's status forward.
///
/// Admins act on any order; a driver only on orders currently assigned to
/// them. `None` means the caller has no say over this order at all.
pub fn transition_actor(role: UserRole, caller: Uuid, assigned_driver: Option<Uuid>) -> Option<Actor> {
    match role {
        UserRole::Admin => Some(Actor::Admin),
        UserRole::Driver if assigned_driver == Some(caller) => Some(Actor::AssignedDriver),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everyone_gets_self_service() {
        for role in [UserRole::Client, UserRole::Driver, UserRole::Admin] {
            assert!(role.grants(Capability::SelfService));
        }
    }

    #[test]
    fn elevated_capabilities_are_role_exact() {
        assert!(UserRole::Admin.grants(Capability::Admin));
        assert!(!UserRole::Admin.grants(Capability::Driver));
        assert!(UserRole::Driver.grants(Capability::Driver));
        assert!(!UserRole::Driver.grants(Capability::Admin));
        assert!(!UserRole::Client.grants(Capability::Driver));
        assert!(!UserRole::Client.grants(Capability::Admin));
    }

    #[test]
    fn only_the_assigned_driver_acts_on_an_order() {
        let driver = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert_eq!(
            transition_actor(UserRole::Driver, driver, Some(driver)),
            Some(Actor::AssignedDriver)
        );
        assert_eq!(transition_actor(UserRole::Driver, other, Some(driver)), None);
        assert_eq!(transition_actor(UserRole::Driver, driver, None), None);
    }

    #[test]
    fn admins_act_on_any_order_and_clients_on_none() {
        let id = Uuid::new_v4();
        assert_eq!(transition_actor(UserRole::Admin, id, None), Some(Actor::Admin));
        assert_eq!(transition_actor(UserRole::Client, id, Some(id)), None);
    }
}
