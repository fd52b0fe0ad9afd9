//! Order status state machine.
//!
//! Orders move forward one step at a time along
//! `en_attente -> en_preparation -> en_livraison -> {livree | echouee}`.
//! Administrators may additionally cancel an order that has not left the
//! shop yet. Every move is checked against [`TRANSITIONS`]; anything not
//! listed there is rejected.

use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::failure_reason::FailureReason;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[sea_orm(string_value = "en_attente")]
    EnAttente,
    #[sea_orm(string_value = "en_preparation")]
    EnPreparation,
    #[sea_orm(string_value = "en_livraison")]
    EnLivraison,
    #[sea_orm(string_value = "livree")]
    Livree,
    #[sea_orm(string_value = "annulee")]
    Annulee,
    #[sea_orm(string_value = "echouee")]
    Echouee,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::EnAttente => "en_attente",
            OrderStatus::EnPreparation => "en_preparation",
            OrderStatus::EnLivraison => "en_livraison",
            OrderStatus::Livree => "livree",
            OrderStatus::Annulee => "annulee",
            OrderStatus::Echouee => "echouee",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Livree | OrderStatus::Annulee | OrderStatus::Echouee
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The party requesting a status change, as resolved by the authorization policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Actor {
    Admin,
    AssignedDriver,
}

struct Transition {
    from: OrderStatus,
    to: OrderStatus,
    admin_only: bool,
}

const TRANSITIONS: &[Transition] = &[
    Transition {
        from: OrderStatus::EnAttente,
        to: OrderStatus::EnPreparation,
        admin_only: false,
    },
    Transition {
        from: OrderStatus::EnPreparation,
        to: OrderStatus::EnLivraison,
        admin_only: false,
    },
    Transition {
        from: OrderStatus::EnLivraison,
        to: OrderStatus::Livree,
        admin_only: false,
    },
    Transition {
        from: OrderStatus::EnLivraison,
        to: OrderStatus::Echouee,
        admin_only: false,
    },
    Transition {
        from: OrderStatus::EnAttente,
        to: OrderStatus::Annulee,
        admin_only: true,
    },
    Transition {
        from: OrderStatus::EnPreparation,
        to: OrderStatus::Annulee,
        admin_only: true,
    },
];

/// Whether `actor` may move an order from `from` to `to`.
pub fn is_allowed(actor: Actor, from: OrderStatus, to: OrderStatus) -> bool {
    TRANSITIONS
        .iter()
        .find(|t| t.from == from && t.to == to)
        .is_some_and(|t| !t.admin_only || actor == Actor::Admin)
}

/// Statuses `actor` can move an order to from `from`.
pub fn next_statuses(actor: Actor, from: OrderStatus) -> Vec<OrderStatus> {
    TRANSITIONS
        .iter()
        .filter(|t| t.from == from && (!t.admin_only || actor == Actor::Admin))
        .map(|t| t.to)
        .collect()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid status transition from {from} to {to}")]
    Invalid { from: OrderStatus, to: OrderStatus },

    #[error("A failure reason is required to mark an order as echouee")]
    MissingFailureReason,

    #[error("A failure reason is only accepted when marking an order as echouee")]
    UnexpectedFailureReason,

    #[error("Order is {0} and can no longer be assigned")]
    Closed(OrderStatus),
}

/// A validated status write, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub failure_reason: Option<FailureReason>,
    pub failure_details: Option<String>,
}

/// Validate a requested transition and the failure information that goes with it.
pub fn plan_transition(
    actor: Actor,
    current: OrderStatus,
    requested: OrderStatus,
    failure_reason: Option<FailureReason>,
    failure_details: Option<String>,
) -> Result<StatusChange, TransitionError> {
    if !is_allowed(actor, current, requested) {
        return Err(TransitionError::Invalid {
            from: current,
            to: requested,
        });
    }

    let failure_details = failure_details
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    if requested == OrderStatus::Echouee {
        if failure_reason.is_none() {
            return Err(TransitionError::MissingFailureReason);
        }
    } else if failure_reason.is_some() || failure_details.is_some() {
        return Err(TransitionError::UnexpectedFailureReason);
    }

    Ok(StatusChange {
        from: current,
        to: requested,
        failure_reason,
        failure_details,
    })
}

/// Drivers can be (re)assigned or cleared on any order that is still open.
pub fn ensure_assignable(status: OrderStatus) -> Result<(), TransitionError> {
    if status.is_terminal() {
        return Err(TransitionError::Closed(status));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn forward_chain_is_allowed_for_drivers() {
        let chain = [
            OrderStatus::EnAttente,
            OrderStatus::EnPreparation,
            OrderStatus::EnLivraison,
            OrderStatus::Livree,
        ];
        for pair in chain.windows(2) {
            assert!(
                is_allowed(Actor::AssignedDriver, pair[0], pair[1]),
                "{} -> {} should be allowed",
                pair[0],
                pair[1]
            );
        }
        assert!(is_allowed(
            Actor::AssignedDriver,
            OrderStatus::EnLivraison,
            OrderStatus::Echouee
        ));
    }

    #[test]
    fn skipping_steps_is_rejected() {
        let err = plan_transition(
            Actor::AssignedDriver,
            OrderStatus::EnAttente,
            OrderStatus::Livree,
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            TransitionError::Invalid {
                from: OrderStatus::EnAttente,
                to: OrderStatus::Livree
            }
        );
        assert!(!is_allowed(
            Actor::Admin,
            OrderStatus::EnAttente,
            OrderStatus::EnLivraison
        ));
        assert!(!is_allowed(
            Actor::Admin,
            OrderStatus::EnPreparation,
            OrderStatus::Echouee
        ));
    }

    #[test]
    fn going_backwards_or_staying_put_is_rejected() {
        for status in OrderStatus::iter() {
            assert!(!is_allowed(Actor::Admin, status, status));
        }
        assert!(!is_allowed(
            Actor::Admin,
            OrderStatus::EnLivraison,
            OrderStatus::EnPreparation
        ));
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for from in OrderStatus::iter().filter(|s| s.is_terminal()) {
            for to in OrderStatus::iter() {
                assert!(!is_allowed(Actor::Admin, from, to));
                assert!(!is_allowed(Actor::AssignedDriver, from, to));
            }
            assert!(next_statuses(Actor::Admin, from).is_empty());
        }
    }

    #[test]
    fn only_admins_cancel() {
        assert!(is_allowed(
            Actor::Admin,
            OrderStatus::EnAttente,
            OrderStatus::Annulee
        ));
        assert!(is_allowed(
            Actor::Admin,
            OrderStatus::EnPreparation,
            OrderStatus::Annulee
        ));
        assert!(!is_allowed(
            Actor::AssignedDriver,
            OrderStatus::EnAttente,
            OrderStatus::Annulee
        ));
        assert!(!is_allowed(
            Actor::Admin,
            OrderStatus::EnLivraison,
            OrderStatus::Annulee
        ));
    }

    #[test]
    fn next_statuses_follow_the_table() {
        assert_eq!(
            next_statuses(Actor::AssignedDriver, OrderStatus::EnLivraison),
            vec![OrderStatus::Livree, OrderStatus::Echouee]
        );
        assert_eq!(
            next_statuses(Actor::AssignedDriver, OrderStatus::EnAttente),
            vec![OrderStatus::EnPreparation]
        );
        assert_eq!(
            next_statuses(Actor::Admin, OrderStatus::EnAttente),
            vec![OrderStatus::EnPreparation, OrderStatus::Annulee]
        );
    }

    #[test]
    fn failing_requires_a_reason() {
        let err = plan_transition(
            Actor::AssignedDriver,
            OrderStatus::EnLivraison,
            OrderStatus::Echouee,
            None,
            Some("nobody home".into()),
        )
        .unwrap_err();
        assert_eq!(err, TransitionError::MissingFailureReason);

        let change = plan_transition(
            Actor::AssignedDriver,
            OrderStatus::EnLivraison,
            OrderStatus::Echouee,
            Some(FailureReason::ClientAbsent),
            Some("  ".into()),
        )
        .unwrap();
        assert_eq!(change.to, OrderStatus::Echouee);
        assert_eq!(change.failure_reason, Some(FailureReason::ClientAbsent));
        assert_eq!(change.failure_details, None);
    }

    #[test]
    fn reason_outside_failure_is_rejected() {
        let err = plan_transition(
            Actor::AssignedDriver,
            OrderStatus::EnLivraison,
            OrderStatus::Livree,
            Some(FailureReason::Autre),
            None,
        )
        .unwrap_err();
        assert_eq!(err, TransitionError::UnexpectedFailureReason);
    }

    #[test]
    fn failure_details_are_trimmed() {
        let change = plan_transition(
            Actor::Admin,
            OrderStatus::EnLivraison,
            OrderStatus::Echouee,
            Some(FailureReason::Autre),
            Some("  portail fermé ".into()),
        )
        .unwrap();
        assert_eq!(change.failure_details.as_deref(), Some("portail fermé"));
        assert_eq!(change.from, OrderStatus::EnLivraison);
    }

    #[test]
    fn assignment_is_closed_on_terminal_orders() {
        assert!(ensure_assignable(OrderStatus::EnAttente).is_ok());
        assert!(ensure_assignable(OrderStatus::EnLivraison).is_ok());
        assert_eq!(
            ensure_assignable(OrderStatus::Livree),
            Err(TransitionError::Closed(OrderStatus::Livree))
        );
        assert!(ensure_assignable(OrderStatus::Echouee).is_err());
        assert!(ensure_assignable(OrderStatus::Annulee).is_err());
    }

    #[test]
    fn status_serializes_as_wire_code() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::EnPreparation).unwrap(),
            "\"en_preparation\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"echouee\"").unwrap();
        assert_eq!(parsed, OrderStatus::Echouee);
        assert_eq!(OrderStatus::Livree.to_string(), "livree");
    }
}
