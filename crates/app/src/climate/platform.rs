//! Climate platform setup and entity-service routing.

use std::collections::HashSet;
use std::sync::Arc;

use multiclimate_domain::climate::{HvacMode, Preset};
use multiclimate_domain::error::{MultiClimateError, NotFoundError, ValidationError};
use multiclimate_domain::service::{
    ATTR_DURATION, ATTR_ENTITY_ID, ATTR_TEMPERATURE, ServiceData, ServiceName,
};
use multiclimate_domain::system::SystemApplication;

use super::entity::ClimateSnapshot;
use super::room::RoomClimate;
use super::zone::ZoneClimate;
use crate::ports::{HeatingApi, StateSource};

/// Entity services registered once at least one climate exists.
const CLIMATE_ENTITY_SERVICES: [ServiceName; 2] =
    [ServiceName::SetQuickVeto, ServiceName::RemoveQuickVeto];

/// Either climate variant.
pub enum Climate<A, S> {
    Room(RoomClimate<A, S>),
    Zone(ZoneClimate<A, S>),
}

impl<A: HeatingApi, S: StateSource> Climate<A, S> {
    #[must_use]
    pub fn unique_id(&self) -> &str {
        match self {
            Self::Room(c) => c.unique_id(),
            Self::Zone(c) => c.unique_id(),
        }
    }

    #[must_use]
    pub fn available(&self) -> bool {
        match self {
            Self::Room(c) => c.available(),
            Self::Zone(c) => c.available(),
        }
    }

    #[must_use]
    pub fn hvac_mode(&self) -> Option<HvacMode> {
        match self {
            Self::Room(c) => c.hvac_mode(),
            Self::Zone(c) => c.hvac_mode(),
        }
    }

    #[must_use]
    pub fn preset_mode(&self) -> Option<Preset> {
        match self {
            Self::Room(c) => c.preset_mode(),
            Self::Zone(c) => c.preset_mode(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> ClimateSnapshot {
        match self {
            Self::Room(c) => c.snapshot(),
            Self::Zone(c) => c.snapshot(),
        }
    }

    /// # Errors
    ///
    /// Propagates the vendor API error unchanged.
    pub async fn set_temperature(&self, temperature: f64) -> Result<(), MultiClimateError> {
        match self {
            Self::Room(c) => c.set_temperature(temperature).await,
            Self::Zone(c) => c.set_temperature(temperature).await,
        }
    }

    /// # Errors
    ///
    /// See [`RoomClimate::set_hvac_mode`] and [`ZoneClimate::set_hvac_mode`].
    pub async fn set_hvac_mode(&self, hvac_mode: HvacMode) -> Result<(), MultiClimateError> {
        match self {
            Self::Room(c) => c.set_hvac_mode(hvac_mode).await,
            Self::Zone(c) => c.set_hvac_mode(hvac_mode).await,
        }
    }

    /// # Errors
    ///
    /// See [`RoomClimate::set_preset_mode`] and [`ZoneClimate::set_preset_mode`].
    pub async fn set_preset_mode(&self, preset: Preset) -> Result<(), MultiClimateError> {
        match self {
            Self::Room(c) => c.set_preset_mode(preset).await,
            Self::Zone(c) => c.set_preset_mode(preset).await,
        }
    }

    /// # Errors
    ///
    /// Propagates the vendor API error unchanged.
    pub async fn set_quick_veto(
        &self,
        temperature: f64,
        duration: Option<u16>,
    ) -> Result<(), MultiClimateError> {
        match self {
            Self::Room(c) => c.base().set_quick_veto(temperature, duration).await,
            Self::Zone(c) => c.base().set_quick_veto(temperature, duration).await,
        }
    }

    /// # Errors
    ///
    /// Propagates the vendor API error unchanged.
    pub async fn remove_quick_veto(&self) -> Result<(), MultiClimateError> {
        match self {
            Self::Room(c) => c.base().remove_quick_veto().await,
            Self::Zone(c) => c.base().remove_quick_veto().await,
        }
    }
}

/// Every climate entity of one installation.
pub struct ClimatePlatform<A, S> {
    climates: Vec<Climate<A, S>>,
    entity_services: Vec<ServiceName>,
}

impl<A: HeatingApi, S: StateSource> ClimatePlatform<A, S> {
    /// Create one climate per enabled zone that is not rbr, and one per room.
    ///
    /// Rooms are linked to the first rbr zone, which tells whether they are
    /// being heated. A climate whose entity id is already taken is skipped.
    pub fn setup(api: &Arc<A>, state: &Arc<S>, application: SystemApplication) -> Self {
        let zones = state.zones();
        let rooms = state.rooms();

        let mut climates: Vec<Climate<A, S>> = zones
            .iter()
            .filter(|zone| zone.enabled && !zone.rbr)
            .map(|zone| {
                Climate::Zone(ZoneClimate::new(
                    Arc::clone(api),
                    Arc::clone(state),
                    zone,
                    application,
                ))
            })
            .collect();

        let rbr_zone = zones.iter().find(|zone| zone.rbr);
        climates.extend(rooms.iter().map(|room| {
            Climate::Room(RoomClimate::new(
                Arc::clone(api),
                Arc::clone(state),
                room,
                rbr_zone,
            ))
        }));

        let mut seen = HashSet::new();
        climates.retain(|climate| {
            let unique = seen.insert(climate.unique_id().to_string());
            if !unique {
                tracing::warn!(
                    entity_id = climate.unique_id(),
                    "skipping climate with an already registered entity id"
                );
            }
            unique
        });

        tracing::info!(%application, "Adding {} climate entities", climates.len());

        let entity_services = if climates.is_empty() {
            Vec::new()
        } else {
            tracing::debug!("registering quick veto entity services");
            CLIMATE_ENTITY_SERVICES.to_vec()
        };

        Self {
            climates,
            entity_services,
        }
    }

    #[must_use]
    pub fn climates(&self) -> &[Climate<A, S>] {
        &self.climates
    }

    #[must_use]
    pub fn get(&self, entity_id: &str) -> Option<&Climate<A, S>> {
        self.climates.iter().find(|c| c.unique_id() == entity_id)
    }

    /// Entity services currently registered.
    #[must_use]
    pub fn entity_services(&self) -> &[ServiceName] {
        &self.entity_services
    }

    #[must_use]
    pub fn snapshots(&self) -> Vec<ClimateSnapshot> {
        self.climates.iter().map(Climate::snapshot).collect()
    }

    /// Route a validated entity-service call to the entity it names.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownService`] when `service` is not
    /// registered, [`MultiClimateError::NotFound`] when no climate has the
    /// given entity id, otherwise the result of the call.
    #[tracing::instrument(skip(self, data), fields(service = %service))]
    pub async fn call_entity_service(
        &self,
        service: ServiceName,
        data: &ServiceData,
    ) -> Result<(), MultiClimateError> {
        if !self.entity_services.contains(&service) {
            return Err(ValidationError::UnknownService(service.as_str().to_string()).into());
        }
        let entity_id = data.require_str(ATTR_ENTITY_ID)?;
        let climate = self.get(entity_id).ok_or_else(|| NotFoundError {
            entity: "climate",
            id: entity_id.to_string(),
        })?;

        match service {
            ServiceName::SetQuickVeto => {
                let temperature = data.require_float(ATTR_TEMPERATURE)?;
                let duration = data
                    .int(ATTR_DURATION)
                    .map(u16::try_from)
                    .transpose()
                    .map_err(|_| ValidationError::WrongType {
                        field: ATTR_DURATION,
                        expected: "duration in minutes",
                    })?;
                climate.set_quick_veto(temperature, duration).await
            }
            ServiceName::RemoveQuickVeto => climate.remove_quick_veto().await,
            other => Err(ValidationError::UnknownService(other.as_str().to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use multiclimate_domain::component::{ComponentRef, Room, Zone};
    use multiclimate_domain::id::{RoomId, ZoneId};
    use multiclimate_domain::service::ServiceCall;
    use serde_json::json;

    use super::*;
    use crate::testing::{Call, FixedState, RecordingApi};

    fn zone(id: &str, enabled: bool, rbr: bool) -> Zone {
        Zone::builder()
            .id(id)
            .name(id)
            .enabled(enabled)
            .rbr(rbr)
            .build()
            .unwrap()
    }

    fn room(id: &str, name: &str) -> Room {
        Room::builder().id(id).name(name).build().unwrap()
    }

    fn platform(state: FixedState) -> ClimatePlatform<RecordingApi, FixedState> {
        ClimatePlatform::setup(
            &Arc::new(RecordingApi::default()),
            &Arc::new(state),
            SystemApplication::Multimatic,
        )
    }

    fn data(service: ServiceName, value: serde_json::Value) -> ServiceData {
        ServiceCall::new(service, value).validate().unwrap().1
    }

    fn api_of(platform: &ClimatePlatform<RecordingApi, FixedState>) -> Vec<Call> {
        match &platform.climates()[0] {
            Climate::Room(c) => c.base().api().calls(),
            Climate::Zone(c) => c.base().api().calls(),
        }
    }

    #[test]
    fn should_create_zone_climates_for_enabled_non_rbr_zones() {
        let platform = platform(FixedState {
            zones: vec![
                zone("Z1", true, false),
                zone("Z2", false, false),
                zone("Z3", true, true),
            ],
            ..FixedState::default()
        });

        let ids: Vec<&str> = platform.climates().iter().map(Climate::unique_id).collect();
        assert_eq!(ids, vec!["climate.z1"]);
        assert_eq!(platform.entity_services(), &CLIMATE_ENTITY_SERVICES);
    }

    #[test]
    fn should_create_room_climates_linked_to_first_rbr_zone() {
        let platform = platform(FixedState {
            zones: vec![zone("Z1", true, true), zone("Z2", true, true)],
            rooms: vec![room("1", "Kitchen"), room("2", "Bedroom")],
            ventilation: false,
        });

        assert_eq!(platform.climates().len(), 2);
        for climate in platform.climates() {
            let Climate::Room(room) = climate else {
                panic!("expected a room climate");
            };
            assert_eq!(room.zone().unwrap().id, ZoneId::new("Z1").unwrap());
        }
        assert!(platform.get("climate.kitchen").is_some());
        assert!(platform.get("climate.bedroom").is_some());
    }

    #[tokio::test]
    async fn should_skip_rooms_with_duplicated_entity_id() {
        let platform = platform(FixedState {
            rooms: vec![room("1", "Bathroom"), room("2", "Bathroom"), room("3", "Office")],
            ..FixedState::default()
        });

        let ids: Vec<&str> = platform.climates().iter().map(Climate::unique_id).collect();
        assert_eq!(ids, vec!["climate.bathroom", "climate.office"]);

        platform
            .call_entity_service(
                ServiceName::RemoveQuickVeto,
                &data(
                    ServiceName::RemoveQuickVeto,
                    json!({"entity_id": "climate.bathroom"}),
                ),
            )
            .await
            .unwrap();
        assert_eq!(
            api_of(&platform),
            vec![Call::RemoveQuickVeto(ComponentRef::Room(
                RoomId::new("1").unwrap()
            ))]
        );
    }

    #[test]
    fn should_skip_room_colliding_with_zone_entity_id() {
        let platform = platform(FixedState {
            zones: vec![zone("Z1", true, false), zone("Z2", true, true)],
            rooms: vec![room("1", "Z1 "), room("2", "Kitchen")],
            ventilation: false,
        });

        let ids: Vec<&str> = platform.climates().iter().map(Climate::unique_id).collect();
        assert_eq!(ids, vec!["climate.z1", "climate.kitchen"]);
    }

    #[test]
    fn should_not_register_entity_services_without_climates() {
        let platform = platform(FixedState {
            zones: vec![zone("Z1", false, false)],
            ..FixedState::default()
        });
        assert!(platform.climates().is_empty());
        assert!(platform.entity_services().is_empty());
    }

    #[tokio::test]
    async fn should_route_quick_veto_to_entity() {
        let platform = platform(FixedState {
            rooms: vec![room("1", "Kitchen")],
            ..FixedState::default()
        });
        platform
            .call_entity_service(
                ServiceName::SetQuickVeto,
                &data(
                    ServiceName::SetQuickVeto,
                    json!({"entity_id": "climate.kitchen", "temperature": 23}),
                ),
            )
            .await
            .unwrap();
        platform
            .call_entity_service(
                ServiceName::RemoveQuickVeto,
                &data(
                    ServiceName::RemoveQuickVeto,
                    json!({"entity_id": "climate.kitchen"}),
                ),
            )
            .await
            .unwrap();

        let target = ComponentRef::Room(RoomId::new("1").unwrap());
        assert_eq!(
            api_of(&platform),
            vec![
                Call::SetQuickVeto(target.clone(), 23.0, 180),
                Call::RemoveQuickVeto(target),
            ]
        );
    }

    #[tokio::test]
    async fn should_pass_quick_veto_duration() {
        let platform = platform(FixedState {
            zones: vec![zone("Z1", true, false)],
            ..FixedState::default()
        });
        platform
            .call_entity_service(
                ServiceName::SetQuickVeto,
                &data(
                    ServiceName::SetQuickVeto,
                    json!({"entity_id": "climate.z1", "temperature": 19.5, "duration": 60}),
                ),
            )
            .await
            .unwrap();

        assert_eq!(
            api_of(&platform),
            vec![Call::SetQuickVeto(
                ComponentRef::Zone(ZoneId::new("Z1").unwrap()),
                19.5,
                60
            )]
        );
    }

    #[tokio::test]
    async fn should_fail_for_unknown_entity() {
        let platform = platform(FixedState {
            rooms: vec![room("1", "Kitchen")],
            ..FixedState::default()
        });
        let err = platform
            .call_entity_service(
                ServiceName::RemoveQuickVeto,
                &data(
                    ServiceName::RemoveQuickVeto,
                    json!({"entity_id": "climate.garage"}),
                ),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MultiClimateError::NotFound(_)));
    }

    #[tokio::test]
    async fn should_reject_unregistered_entity_service() {
        let platform = platform(FixedState::default());
        let err = platform
            .call_entity_service(
                ServiceName::RemoveQuickVeto,
                &data(
                    ServiceName::RemoveQuickVeto,
                    json!({"entity_id": "climate.kitchen"}),
                ),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MultiClimateError::Validation(ValidationError::UnknownService(_))
        ));
    }
}
