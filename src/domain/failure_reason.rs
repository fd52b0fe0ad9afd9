use sea_orm::{Iterable, entity::prelude::*};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Why a delivery could not be completed.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    #[sea_orm(string_value = "client_absent")]
    ClientAbsent,
    #[sea_orm(string_value = "adresse_introuvable")]
    AdresseIntrouvable,
    #[sea_orm(string_value = "client_injoignable")]
    ClientInjoignable,
    #[sea_orm(string_value = "refus_client")]
    RefusClient,
    #[sea_orm(string_value = "probleme_paiement")]
    ProblemePaiement,
    #[sea_orm(string_value = "autre")]
    Autre,
}

impl FailureReason {
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::ClientAbsent => "client_absent",
            FailureReason::AdresseIntrouvable => "adresse_introuvable",
            FailureReason::ClientInjoignable => "client_injoignable",
            FailureReason::RefusClient => "refus_client",
            FailureReason::ProblemePaiement => "probleme_paiement",
            FailureReason::Autre => "autre",
        }
    }

    pub fn label_fr(&self) -> &'static str {
        match self {
            FailureReason::ClientAbsent => "Client absent",
            FailureReason::AdresseIntrouvable => "Adresse introuvable",
            FailureReason::ClientInjoignable => "Client injoignable",
            FailureReason::RefusClient => "Commande refusée par le client",
            FailureReason::ProblemePaiement => "Problème de paiement",
            FailureReason::Autre => "Autre",
        }
    }

    pub fn label_en(&self) -> &'static str {
        match self {
            FailureReason::ClientAbsent => "Customer not present",
            FailureReason::AdresseIntrouvable => "Address not found",
            FailureReason::ClientInjoignable => "Customer unreachable",
            FailureReason::RefusClient => "Order refused by customer",
            FailureReason::ProblemePaiement => "Payment problem",
            FailureReason::Autre => "Other",
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FailureReasonInfo {
    pub code: FailureReason,
    pub fr: String,
    pub en: String,
}

impl From<FailureReason> for FailureReasonInfo {
    fn from(reason: FailureReason) -> Self {
        Self {
            code: reason,
            fr: reason.label_fr().to_string(),
            en: reason.label_en().to_string(),
        }
    }
}

/// Every reason code with its display text, in presentation order.
pub fn catalog() -> Vec<FailureReasonInfo> {
    FailureReason::iter().map(FailureReasonInfo::from).collect()
}
