//! Map geometry: grid snapping, hit tests and road-path derivation.
//!
//! Everything here is pure. Given identical inputs every function returns the
//! same output, so the renderer can call them freshly every frame.

use crate::model::{Building, BuildingID, Button, Road, RoadID, RoadPath};
use egui::{Pos2, Rect, Vec2};
use rustc_hash::FxHashMap;

/// Lookup table from building id to building.
pub type BuildingIndex<'a> = FxHashMap<BuildingID, &'a Building>;

/// Index buildings by id. When ids collide the first building wins.
pub fn build_building_index(buildings: &[Building]) -> BuildingIndex<'_> {
    let mut index = BuildingIndex::default();
    for building in buildings {
        index.entry(building.id).or_insert(building);
    }
    index
}

pub type RoadIndex<'a> = FxHashMap<RoadID, &'a Road>;

/// Index roads by id. When ids collide the first road wins.
pub fn build_road_index(roads: &[Road]) -> RoadIndex<'_> {
    let mut index = RoadIndex::default();
    for road in roads {
        index.entry(road.id).or_insert(road);
    }
    index
}

// ---------------------------------------------------------------------------
// Grid snapping
// ---------------------------------------------------------------------------

/// Round `value` to the nearest multiple of `tile_size`, halves rounding up.
pub fn snap_to_grid(value: f32, tile_size: f32) -> f32 {
    (value / tile_size + 0.5).floor() * tile_size
}

/// Top-left corner for a footprint of edge `size` centred under `cursor`.
///
/// The placement preview and real placement both go through here so they
/// always land on the same cell.
pub fn placement_origin(cursor: Pos2, size: f32, tile_size: f32) -> Pos2 {
    let half = size / 2.0;
    Pos2::new(
        snap_to_grid(cursor.x - half, tile_size),
        snap_to_grid(cursor.y - half, tile_size),
    )
}

pub fn placement_rect(cursor: Pos2, size: f32, tile_size: f32) -> Rect {
    Rect::from_min_size(placement_origin(cursor, size, tile_size), Vec2::splat(size))
}

// ---------------------------------------------------------------------------
// Hit tests
// ---------------------------------------------------------------------------

/// True if `(m_x, m_y)` lies inside the box, edges included.
pub fn is_clicked(x: f32, y: f32, w: f32, h: f32, m_x: f32, m_y: f32) -> bool {
    (m_x >= x && m_x <= x + w) && (m_y >= y && m_y <= y + h)
}

pub fn is_clicked_rect(rect: Rect, pos: Pos2) -> bool {
    is_clicked(rect.min.x, rect.min.y, rect.width(), rect.height(), pos.x, pos.y)
}

/// First button under `pos`, if any.
pub fn button_at(buttons: &[Button], pos: Pos2) -> Option<&Button> {
    buttons.iter().find(|b| is_clicked_rect(b.rect(), pos))
}

/// Topmost building whose footprint contains `pos`.
pub fn building_at(buildings: &[Building], pos: Pos2) -> Option<&Building> {
    buildings.iter().rev().find(|b| b.contains(pos))
}

/// Whether the tile at `point` sits on any road.
///
/// The probe is the tile centre (`point` offset by half a tile). It hits a
/// path when it is within half the road's width of either leg.
pub fn is_on_road(roads: &[Road], road_paths: &[RoadPath], tile_size: f32, point: Pos2) -> bool {
    let index = build_road_index(roads);
    let probe = point + Vec2::splat(tile_size / 2.0);

    road_paths.iter().any(|path| {
        let Some(road) = index.get(&path.road) else {
            return false;
        };
        let half_width = road.width / 2.0;

        let near_horizontal = within(probe.y, path.y1 - half_width, path.y1 + half_width);
        let near_vertical = within(probe.x, path.x2 - half_width, path.x2 + half_width);

        (near_horizontal && between(probe.x, path.x1, path.x2))
            || (near_vertical && between(probe.y, path.y1, path.y2))
    })
}

fn within(v: f32, lo: f32, hi: f32) -> bool {
    v >= lo && v <= hi
}

/// Inclusive range test that does not care which end is larger.
fn between(v: f32, a: f32, b: f32) -> bool {
    within(v, a.min(b), a.max(b))
}

// ---------------------------------------------------------------------------
// Road paths
// ---------------------------------------------------------------------------

/// Derive one [`RoadPath`] per road whose endpoints both exist.
///
/// Roads pointing at a missing building are skipped; they never affect the
/// paths of other roads.
pub fn road_paths(roads: &[Road], buildings: &[Building]) -> Vec<RoadPath> {
    let index = build_building_index(buildings);
    roads
        .iter()
        .filter_map(|road| {
            let start = index.get(&road.start_id)?;
            let end = index.get(&road.end_id)?;
            Some(connect(road.id, start, end))
        })
        .collect()
}

fn connect(road: RoadID, start: &Building, end: &Building) -> RoadPath {
    let start_is_left = start.pos.x + start.size <= end.pos.x;
    let start_is_above = start.pos.y + start.size <= end.pos.y;

    RoadPath {
        road,
        x1: if start_is_left {
            start.pos.x + start.size
        } else {
            start.pos.x
        },
        y1: start.pos.y + start.size / 2.0,
        x2: end.pos.x + end.size / 2.0,
        y2: if start_is_above {
            end.pos.y
        } else {
            end.pos.y + end.size
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
