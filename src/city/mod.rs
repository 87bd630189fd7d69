//! City state and the actions that change it.
//!
//! This module owns the entity collections. Geometry and rendering borrow them
//! read-only each frame; the only way to change them is [`apply`].

use crate::config::CityConfig;
use crate::geometry;
use crate::model::{Building, BuildingID, IdGenerator, Road, RoadID, Unit, UnitID};
use egui::{Pos2, Vec2};
use std::fmt;

// ---------------------------------------------------------------------------
// Actions & events
// ---------------------------------------------------------------------------

/// Every possible state-mutating action.
#[derive(Debug, Clone, PartialEq)]
pub enum CityAction {
    /// Place a building from the named blueprint, centred under `cursor`.
    PlaceBuilding { blueprint: String, cursor: Pos2 },
    /// Connect two existing buildings with a road.
    ConnectRoad { start: BuildingID, end: BuildingID },
}

/// Events emitted by [`apply`] so the shell knows what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityEvent {
    BuildingPlaced { id: BuildingID },
    SettlerSpawned { id: UnitID, home: BuildingID },
    RoadBuilt { id: RoadID },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityError {
    BlueprintNotFound(String),
    BuildingNotFound(BuildingID),
    /// A road must join two different buildings.
    SelfConnection(BuildingID),
    /// Every id has been handed out.
    IdsExhausted,
}

impl fmt::Display for CityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlueprintNotFound(name) => write!(f, "blueprint not found: {name}"),
            Self::BuildingNotFound(id) => write!(f, "building not found: {}", id.0),
            Self::SelfConnection(id) => write!(f, "cannot connect building {} to itself", id.0),
            Self::IdsExhausted => write!(f, "no ids left"),
        }
    }
}

impl std::error::Error for CityError {}

// ---------------------------------------------------------------------------
// City state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityState {
    pub ids: IdGenerator,
    pub buildings: Vec<Building>,
    pub roads: Vec<Road>,
    pub units: Vec<Unit>,
}

impl CityState {
    pub fn building(&self, id: BuildingID) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }
}

// ---------------------------------------------------------------------------
// Pure apply function
// ---------------------------------------------------------------------------

/// Apply a single [`CityAction`] and return the resulting events.
///
/// # Errors
///
/// Fails if the blueprint or a road endpoint does not exist, a road would
/// join a building to itself, or ids have run out. On error the state is left
/// untouched.
pub fn apply(
    state: &mut CityState,
    config: &CityConfig,
    action: &CityAction,
) -> Result<Vec<CityEvent>, CityError> {
    log::debug!("Applying {action:?}");
    match action {
        CityAction::PlaceBuilding { blueprint, cursor } => {
            place_building(state, config, blueprint, *cursor)
        }
        CityAction::ConnectRoad { start, end } => {
            let id = connect_road(state, config, *start, *end)?;
            Ok(vec![CityEvent::RoadBuilt { id }])
        }
    }
}

/// Place a building snapped to the grid under `cursor`.
///
/// Blueprints flagged `new_settler` also spawn a unit in the middle of the
/// new building.
///
/// # Errors
///
/// [`CityError::BlueprintNotFound`] if `blueprint` is not in the catalogue,
/// [`CityError::IdsExhausted`] if the building or its settler gets no id.
pub fn place_building(
    state: &mut CityState,
    config: &CityConfig,
    blueprint: &str,
    cursor: Pos2,
) -> Result<Vec<CityEvent>, CityError> {
    let bp = config
        .blueprint(blueprint)
        .ok_or_else(|| CityError::BlueprintNotFound(blueprint.to_owned()))?;

    // Ids are committed only once every allocation has succeeded.
    let mut ids = state.ids;
    let id = ids.building().ok_or(CityError::IdsExhausted)?;
    let building = Building {
        id,
        name: bp.name.clone(),
        pos: geometry::placement_origin(cursor, bp.size, config.tile_size),
        size: bp.size,
        color: bp.color,
    };
    let mut events = vec![CityEvent::BuildingPlaced { id }];

    let settler = if bp.new_settler {
        let unit = ids.unit().ok_or(CityError::IdsExhausted)?;
        events.push(CityEvent::SettlerSpawned { id: unit, home: id });
        Some(make_settler(config, unit, &building))
    } else {
        None
    };

    state.ids = ids;
    state.buildings.push(building);
    state.units.extend(settler);
    Ok(events)
}

fn make_settler(config: &CityConfig, id: UnitID, home: &Building) -> Unit {
    Unit {
        id,
        name: format!("settler {}", id.0),
        pos: home.center() - Vec2::splat(config.unit_size / 2.0),
        size: config.unit_size,
        color: config.unit_color,
        speed: config.settler_speed,
        carry: false,
        destination: None,
        owner: home.id,
    }
}

/// Join two existing buildings with a road of the configured width.
///
/// # Errors
///
/// [`CityError::SelfConnection`] when `start == end`, or
/// [`CityError::BuildingNotFound`] when either endpoint is missing, or
/// [`CityError::IdsExhausted`].
pub fn connect_road(
    state: &mut CityState,
    config: &CityConfig,
    start: BuildingID,
    end: BuildingID,
) -> Result<RoadID, CityError> {
    if start == end {
        return Err(CityError::SelfConnection(start));
    }
    for id in [start, end] {
        if state.building(id).is_none() {
            return Err(CityError::BuildingNotFound(id));
        }
    }

    let id = state.ids.road().ok_or(CityError::IdsExhausted)?;
    state.roads.push(Road {
        id,
        start_id: start,
        end_id: end,
        width: config.road_width,
        color: config.road_color,
    });
    Ok(id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn place(
        state: &mut CityState,
        config: &CityConfig,
        name: &str,
        x: f32,
        y: f32,
    ) -> BuildingID {
        let events = apply(
            state,
            config,
            &CityAction::PlaceBuilding {
                blueprint: name.into(),
                cursor: Pos2::new(x, y),
            },
        )
        .expect("placement succeeds");
        match events.first() {
            Some(CityEvent::BuildingPlaced { id }) => *id,
            other => panic!("expected BuildingPlaced, got {other:?}"),
        }
    }

    // -- place_building ------------------------------------------------------

    #[test]
    fn placement_snaps_like_the_preview() {
        let config = CityConfig::default();
        let mut state = CityState::default();
        let id = place(&mut state, &config, "farm", 107.0, 93.0);

        let farm = state.building(id).expect("placed");
        let expected = geometry::placement_origin(Pos2::new(107.0, 93.0), 60.0, 20.0);
        assert_eq!(farm.pos, expected);
        assert_eq!(farm.pos, Pos2::new(80.0, 60.0));
        assert_eq!(farm.size, 60.0);
        assert_eq!(farm.name, "farm");
    }

    #[test]
    fn settler_blueprint_spawns_unit_in_building() {
        let config = CityConfig::default();
        let mut state = CityState::default();
        let events = apply(
            &mut state,
            &config,
            &CityAction::PlaceBuilding {
                blueprint: "house".into(),
                cursor: Pos2::new(50.0, 50.0),
            },
        )
        .expect("placement succeeds");

        assert_eq!(events.len(), 2);
        let home = state.buildings[0].id;
        assert_eq!(
            events[1],
            CityEvent::SettlerSpawned {
                id: state.units[0].id,
                home
            }
        );
        let unit = &state.units[0];
        assert_eq!(unit.owner, home);
        assert!(!unit.carry);
        assert!(unit.destination.is_none());
        assert!(state.buildings[0].rect().contains_rect(unit.rect()));
    }

    #[test]
    fn plain_blueprint_spawns_no_unit() {
        let config = CityConfig::default();
        let mut state = CityState::default();
        place(&mut state, &config, "warehouse", 200.0, 200.0);
        assert!(state.units.is_empty());
    }

    #[test]
    fn unknown_blueprint_leaves_state_untouched() {
        let config = CityConfig::default();
        let mut state = CityState::default();
        let before = state.clone();
        let err = apply(
            &mut state,
            &config,
            &CityAction::PlaceBuilding {
                blueprint: "castle".into(),
                cursor: Pos2::ZERO,
            },
        )
        .expect_err("unknown blueprint");
        assert_eq!(err, CityError::BlueprintNotFound("castle".into()));
        assert_eq!(state, before);
    }

    #[test]
    fn settler_without_id_rolls_back_placement() {
        let config = CityConfig::default();
        let mut state = CityState {
            ids: IdGenerator::after(u32::MAX - 1),
            ..CityState::default()
        };
        let before = state.clone();
        // One id left: enough for the house, not for its settler.
        let err = place_building(&mut state, &config, "house", Pos2::ZERO).expect_err("no ids");
        assert_eq!(err, CityError::IdsExhausted);
        assert_eq!(state, before);

        place_building(&mut state, &config, "farm", Pos2::ZERO).expect("last id");
        assert_eq!(state.buildings[0].id, BuildingID(u32::MAX));
    }

    // -- connect_road --------------------------------------------------------

    #[test]
    fn connect_road_uses_configured_style() {
        let config = CityConfig::default();
        let mut state = CityState::default();
        let a = place(&mut state, &config, "farm", 50.0, 50.0);
        let b = place(&mut state, &config, "farm", 300.0, 50.0);

        let events = apply(&mut state, &config, &CityAction::ConnectRoad { start: a, end: b })
            .expect("both exist");
        let road = &state.roads[0];
        assert_eq!(events, vec![CityEvent::RoadBuilt { id: road.id }]);
        assert_eq!((road.start_id, road.end_id), (a, b));
        assert_eq!(road.width, config.road_width);
        assert_eq!(geometry::road_paths(&state.roads, &state.buildings).len(), 1);
    }

    #[test]
    fn connect_road_rejects_missing_and_self() {
        let config = CityConfig::default();
        let mut state = CityState::default();
        let a = place(&mut state, &config, "farm", 50.0, 50.0);

        assert_eq!(
            connect_road(&mut state, &config, a, BuildingID(999)),
            Err(CityError::BuildingNotFound(BuildingID(999)))
        );
        assert_eq!(
            connect_road(&mut state, &config, a, a),
            Err(CityError::SelfConnection(a))
        );
        assert!(state.roads.is_empty());
    }

    #[test]
    fn ids_are_unique_across_entities() {
        let config = CityConfig::default();
        let mut state = CityState::default();
        let a = place(&mut state, &config, "house", 50.0, 50.0);
        let b = place(&mut state, &config, "house", 300.0, 50.0);
        let road = connect_road(&mut state, &config, a, b).expect("both exist");

        let mut raw: Vec<u32> = vec![a.0, b.0, road.0];
        raw.extend(state.units.iter().map(|u| u.id.0));
        let len = raw.len();
        raw.sort_unstable();
        raw.dedup();
        assert_eq!(raw.len(), len);
    }

    #[test]
    fn identical_action_sequences_produce_identical_states() {
        let config = CityConfig::default();
        let actions = vec![
            CityAction::PlaceBuilding {
                blueprint: "house".into(),
                cursor: Pos2::new(40.0, 40.0),
            },
            CityAction::PlaceBuilding {
                blueprint: "warehouse".into(),
                cursor: Pos2::new(300.0, 200.0),
            },
            CityAction::ConnectRoad {
                start: BuildingID(1),
                end: BuildingID(3),
            },
        ];

        let mut state_a = CityState::default();
        let mut state_b = CityState::default();
        for action in &actions {
            apply(&mut state_a, &config, action).expect("valid");
            apply(&mut state_b, &config, action).expect("valid");
        }
        assert_eq!(state_a, state_b);
        assert_eq!(state_a.roads.len(), 1);
    }

    #[test]
    fn city_error_display() {
        let msg = CityError::BlueprintNotFound("castle".into()).to_string();
        assert!(msg.contains("castle"), "got: {msg}");
        let msg = CityError::BuildingNotFound(BuildingID(4)).to_string();
        assert!(msg.contains('4'), "got: {msg}");
    }
}
