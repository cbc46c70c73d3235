use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// What kind of site a location is. Sub-locations carry their own kind so a
/// warehouse can, for example, own a retail-facing pickup counter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum LocationKind {
    Warehouse,
    Store,
}

/// A second-level location nested under exactly one main [`Location`].
///
/// The tree is two levels deep by construction: sub-locations never own
/// further sub-locations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct SubLocation {
    pub id: Uuid,
    pub parent_id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub kind: LocationKind,
}

/// A main location (warehouse or store) with its sub-locations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct Location {
    pub id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub kind: LocationKind,
    #[validate]
    pub sub_locations: Vec<SubLocation>,
}

impl Location {
    /// True when `id` is this location itself or one of its sub-locations.
    pub fn owns(&self, id: Uuid) -> bool {
        self.id == id || self.sub_locations.iter().any(|s| s.id == id)
    }

    pub fn sub_location(&self, id: Uuid) -> Option<&SubLocation> {
        self.sub_locations.iter().find(|s| s.id == id)
    }
}
