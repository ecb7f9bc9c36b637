//! State source port: the coordinator's cached view of the installation.

use multiclimate_domain::component::{Room, Zone};
use multiclimate_domain::id::{RoomId, ZoneId};

/// Read-only access to the latest device state fetched by the coordinator.
///
/// Returned records are snapshots; callers look components up again on
/// every read instead of holding on to them.
pub trait StateSource: Send + Sync {
    /// All zones, or an empty list when nothing has been fetched yet.
    fn zones(&self) -> Vec<Zone>;

    /// All rooms, or an empty list when the installation has none.
    fn rooms(&self) -> Vec<Room>;

    /// Whether a ventilation unit is part of the installation.
    fn has_ventilation(&self) -> bool;

    fn find_room(&self, id: &RoomId) -> Option<Room> {
        self.rooms().into_iter().find(|room| &room.id == id)
    }

    fn find_zone(&self, id: &ZoneId) -> Option<Zone> {
        self.zones().into_iter().find(|zone| &zone.id == id)
    }
}
