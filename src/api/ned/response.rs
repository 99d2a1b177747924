use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnError, DisplayFromStr, PickFirst, VecSkipError, serde_as};

use crate::quantity::intensity::KilogramsPerKilowattHour;

/// Response body: either a Hydra collection or a bare array of items.
#[serde_as]
#[derive(Deserialize)]
#[serde(untagged)]
pub enum Collection {
    Hydra {
        #[serde_as(as = "VecSkipError<_>")]
        #[serde(rename = "hydra:member")]
        members: Vec<RawItem>,
    },

    Bare(#[serde_as(as = "VecSkipError<_>")] Vec<RawItem>),
}

impl Collection {
    pub fn into_items(self) -> Vec<RawItem> {
        match self {
            Self::Hydra { members } => members,
            Self::Bare(items) => items,
        }
    }
}

/// Opaque item identifier.
#[derive(Clone, Debug, Eq, PartialEq, Display, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ItemId {
    #[display("{_0}")]
    Number(i64),

    #[display("{_0}")]
    Text(String),
}

/// Single `utilizations` item as received.
///
/// Every field is optional and a malformed field is treated as absent.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawItem {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub id: Option<ItemId>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(default, rename = "validfrom")]
    pub valid_from: Option<String>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(default, rename = "validto")]
    pub valid_to: Option<String>,

    /// Kilograms CO₂ per kilowatt-hour, numeric strings are accepted too.
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default, rename = "emissionfactor")]
    pub emission_factor: Option<KilogramsPerKilowattHour>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(default, rename = "lastupdate")]
    pub last_update: Option<String>,
}
