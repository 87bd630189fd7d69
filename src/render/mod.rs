//! Draw routines.
//!
//! Each function paints one collection onto a [`Surface`] and keeps nothing
//! between calls: every frame is redrawn from the inputs it is given. Stacking
//! is left to the caller; [`draw_scene`] does roads, buildings, units, the
//! placement preview and finally the HUD.

use crate::config::CityConfig;
use crate::geometry;
use crate::model::{Blueprint, Building, Button, Road, RoadPath, Unit};
use crate::surface::{AlphaScope, Surface};
use egui::{FontFamily, FontId, Pos2, Rect, Vec2};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The selected blueprint name is not in the catalogue.
    BlueprintNotFound { name: String },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlueprintNotFound { name } => write!(f, "blueprint not found: {name}"),
        }
    }
}

impl std::error::Error for RenderError {}

// ---------------------------------------------------------------------------
// HUD
// ---------------------------------------------------------------------------

/// Lay out one button per label, left to right inside the HUD bar.
pub fn layout_hud_buttons(
    config: &CityConfig,
    surface_size: Vec2,
    labels: &[&str],
) -> Vec<Button> {
    let pad = config.hud_padding;
    let top = surface_size.y - config.hud_height + pad;
    let h = (config.hud_height - 2.0 * pad).max(0.0);

    labels
        .iter()
        .enumerate()
        .map(|(i, label)| Button {
            label: (*label).to_owned(),
            pos: Pos2::new(pad + i as f32 * (config.button_width + pad), top),
            w: config.button_width,
            h,
        })
        .collect()
}

/// Paint the bottom bar, then each button and its label.
///
/// The button whose label equals `selected` gets an outline.
pub fn draw_hud(
    surface: &mut dyn Surface,
    config: &CityConfig,
    buttons: &[Button],
    selected: Option<&str>,
) {
    let size = surface.size();
    let hud_height = config.hud_height;
    let padding = config.hud_padding;

    surface.set_fill(config.hud_color);
    surface.fill_rect(Rect::from_min_size(
        Pos2::new(0.0, size.y - hud_height),
        Vec2::new(size.x, hud_height),
    ));

    for button in buttons {
        surface.set_fill(config.button_color);
        surface.fill_rect(button.rect());

        surface.set_fill(config.label_color);
        surface.set_font(FontId::new(config.label_font_size, FontFamily::Proportional));
        surface.fill_text(
            &button.label,
            Pos2::new(button.pos.x + padding, size.y - hud_height / 1.35 + padding),
        );

        if selected == Some(button.label.as_str()) {
            surface.set_stroke(config.selected_outline);
            surface.set_line_width(2.0);
            surface.stroke_rect(button.rect());
        }
    }
}

// ---------------------------------------------------------------------------
// Map layers
// ---------------------------------------------------------------------------

/// Stroke each road path as a single polyline in its road's width and colour.
/// Paths whose road is not in `roads` are skipped.
pub fn draw_roads(surface: &mut dyn Surface, roads: &[Road], road_paths: &[RoadPath]) {
    let by_id = geometry::build_road_index(roads);

    for path in road_paths {
        let Some(road) = by_id.get(&path.road) else {
            continue;
        };
        surface.set_stroke(road.color);
        surface.set_line_width(road.width);
        surface.stroke_path(&[path.start(), path.corner(), path.end()]);
    }
}

pub fn draw_buildings(surface: &mut dyn Surface, buildings: &[Building]) {
    for building in buildings {
        surface.set_fill(building.color);
        surface.fill_rect(building.rect());
    }
}

pub fn draw_units(surface: &mut dyn Surface, units: &[Unit]) {
    for unit in units {
        surface.set_fill(unit.color);
        surface.fill_rect(unit.rect());
    }
}

/// Draw a translucent placement preview for `selected` under `cursor`.
///
/// Returns the snapped rectangle the building would occupy. Global alpha is
/// restored before returning.
///
/// # Errors
///
/// [`RenderError::BlueprintNotFound`] if no blueprint is named `selected`.
/// Nothing is drawn in that case.
pub fn draw_building_shadow(
    surface: &mut dyn Surface,
    config: &CityConfig,
    blueprints: &[Blueprint],
    selected: &str,
    cursor: Pos2,
) -> Result<Rect, RenderError> {
    let Some(blueprint) = blueprints.iter().find(|b| b.name == selected) else {
        log::warn!("No blueprint named {selected:?}");
        return Err(RenderError::BlueprintNotFound {
            name: selected.to_owned(),
        });
    };

    let rect = geometry::placement_rect(cursor, blueprint.size, config.tile_size);

    let mut shadow = AlphaScope::new(surface, config.shadow_alpha);
    shadow.set_fill(blueprint.color);
    shadow.fill_rect(rect);
    shadow.set_stroke(config.shadow_outline);
    shadow.set_line_width(config.shadow_outline_width);
    shadow.stroke_rect(rect);

    Ok(rect)
}

// ---------------------------------------------------------------------------
// Whole frame
// ---------------------------------------------------------------------------

/// Everything needed to paint one frame.
pub struct Scene<'a> {
    pub buildings: &'a [Building],
    pub roads: &'a [Road],
    pub road_paths: &'a [RoadPath],
    pub units: &'a [Unit],
    pub buttons: &'a [Button],
    /// Label of the HUD button to highlight.
    pub selected: Option<&'a str>,
    /// Blueprint name and cursor position for the placement preview.
    pub preview: Option<(&'a str, Pos2)>,
}

/// Paint a full frame in stacking order.
///
/// A bad preview blueprint does not stop the HUD from being drawn; the error
/// is returned once the frame is complete.
///
/// # Errors
///
/// Whatever [`draw_building_shadow`] returns for the preview.
pub fn draw_scene(
    surface: &mut dyn Surface,
    config: &CityConfig,
    scene: &Scene<'_>,
) -> Result<(), RenderError> {
    let size = surface.size();
    surface.set_fill(config.background);
    surface.fill_rect(Rect::from_min_size(Pos2::ZERO, size));

    draw_roads(surface, scene.roads, scene.road_paths);
    draw_buildings(surface, scene.buildings);
    draw_units(surface, scene.units);

    let preview = match scene.preview {
        Some((name, cursor)) => {
            draw_building_shadow(surface, config, &config.blueprints, name, cursor).map(|_| ())
        }
        None => Ok(()),
    };

    draw_hud(surface, config, scene.buttons, scene.selected);

    preview
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
