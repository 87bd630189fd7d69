//! Plain data records for everything that lives on the map.
//!
//! Nothing in here knows about drawing or input. Geometry and rendering only
//! ever read these values; [`crate::city`] is the one place that creates them.

use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildingID(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoadID(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitID(pub u32);

/// Monotonically increasing source of ids, shared by all entity kinds.
///
/// Returns `None` once `u32::MAX` has been handed out; ids are never reused.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IdGenerator(u32);

impl IdGenerator {
    /// Generator whose next id is `last + 1`.
    #[cfg(test)]
    pub(crate) fn after(last: u32) -> Self {
        Self(last)
    }

    fn bump(&mut self) -> Option<u32> {
        self.0 = self.0.checked_add(1)?;
        Some(self.0)
    }

    pub fn building(&mut self) -> Option<BuildingID> {
        self.bump().map(BuildingID)
    }

    pub fn road(&mut self) -> Option<RoadID> {
        self.bump().map(RoadID)
    }

    pub fn unit(&mut self) -> Option<UnitID> {
        self.bump().map(UnitID)
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A placed building with a square footprint of edge `size`.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub id: BuildingID,
    pub name: String,
    pub pos: Pos2,
    pub size: f32,
    pub color: Color32,
}

impl Building {
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.pos, Vec2::splat(self.size))
    }

    pub fn center(&self) -> Pos2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    /// Inclusive footprint test.
    pub fn contains(&self, point: Pos2) -> bool {
        point.x >= self.pos.x
            && point.x <= self.pos.x + self.size
            && point.y >= self.pos.y
            && point.y <= self.pos.y + self.size
    }
}

/// Undirected logical connection between two buildings.
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    pub id: RoadID,
    pub start_id: BuildingID,
    pub end_id: BuildingID,
    pub width: f32,
    pub color: Color32,
}

/// L-shaped connector derived from a [`Road`]: a horizontal leg from
/// `(x1, y1)` to `(x2, y1)`, then a vertical leg down (or up) to `(x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadPath {
    pub road: RoadID,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl RoadPath {
    pub fn start(&self) -> Pos2 {
        Pos2::new(self.x1, self.y1)
    }

    pub fn corner(&self) -> Pos2 {
        Pos2::new(self.x2, self.y1)
    }

    pub fn end(&self) -> Pos2 {
        Pos2::new(self.x2, self.y2)
    }
}

/// A settler marker. Units are spawned and drawn but never moved.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub id: UnitID,
    pub name: String,
    pub pos: Pos2,
    pub size: f32,
    pub color: Color32,
    pub speed: f32,
    pub carry: bool,
    /// Warehouse the unit would deliver to, if one has been assigned.
    pub destination: Option<BuildingID>,
    /// Building that spawned the unit.
    pub owner: BuildingID,
}

impl Unit {
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.pos, Vec2::splat(self.size))
    }
}

/// Template for a building type that has not been placed yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub name: String,
    pub size: f32,
    pub color: Color32,
    /// Placing this blueprint also spawns a settler.
    #[serde(default)]
    pub new_settler: bool,
}

/// Rectangular HUD hit region.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: String,
    pub pos: Pos2,
    pub w: f32,
    pub h: f32,
}

impl Button {
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.pos, Vec2::new(self.w, self.h))
    }
}
