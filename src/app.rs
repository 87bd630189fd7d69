//! Application shell: wires input, city state, geometry and rendering together.

use crate::city::{self, CityAction, CityState};
use crate::config::CityConfig;
use crate::geometry;
use crate::model::{BuildingID, Button};
use crate::render::{self, Scene};
use crate::surface::{PainterSurface, Surface as _};

use egui::{Pos2, Vec2};

/// HUD label of the road tool. Every other button is a blueprint name.
const ROAD_TOOL: &str = "road";

/// What a click on the map does.
#[derive(Debug, Clone, PartialEq)]
enum Tool {
    Build(String),
    /// Click two buildings in turn to connect them.
    Road { from: Option<BuildingID> },
}

impl Tool {
    fn label(&self) -> &str {
        match self {
            Self::Build(name) => name.as_str(),
            Self::Road { .. } => ROAD_TOOL,
        }
    }
}

pub struct TownshipApp {
    config: CityConfig,
    city: CityState,
    tool: Option<Tool>,
}

impl Default for TownshipApp {
    fn default() -> Self {
        Self::with_config(CityConfig::default())
    }
}

impl TownshipApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_config(CityConfig::from_env())
    }

    pub fn with_config(config: CityConfig) -> Self {
        Self {
            config,
            city: CityState::default(),
            tool: None,
        }
    }

    fn tool_labels(&self) -> Vec<&str> {
        self.config
            .blueprints
            .iter()
            .map(|b| b.name.as_str())
            .chain(std::iter::once(ROAD_TOOL))
            .collect()
    }

    fn select_tool(&mut self, label: &str) {
        let tool = if label == ROAD_TOOL {
            Tool::Road { from: None }
        } else {
            Tool::Build(label.to_owned())
        };
        // Clicking the active tool again puts it away.
        if self.tool.as_ref().map(Tool::label) == Some(label) {
            self.tool = None;
        } else {
            self.tool = Some(tool);
        }
    }

    /// Handle a click at `pos` in surface coordinates.
    fn click(&mut self, pos: Pos2, buttons: &[Button], surface_size: Vec2) {
        if pos.y >= surface_size.y - self.config.hud_height {
            if let Some(button) = geometry::button_at(buttons, pos) {
                let label = button.label.clone();
                self.select_tool(&label);
            }
            return;
        }

        if let Some(Tool::Build(name)) = &self.tool
            && self.footprint_on_road(name, pos)
        {
            log::info!("Not placing {name} on a road");
            return;
        }

        let action = match &mut self.tool {
            None => return,
            Some(Tool::Build(name)) => CityAction::PlaceBuilding {
                blueprint: name.clone(),
                cursor: pos,
            },
            Some(Tool::Road { from }) => {
                let hit = geometry::building_at(&self.city.buildings, pos).map(|b| b.id);
                match (*from, hit) {
                    (Some(start), Some(end)) => {
                        *from = None;
                        CityAction::ConnectRoad { start, end }
                    }
                    (_, hit) => {
                        *from = hit;
                        return;
                    }
                }
            }
        };

        match city::apply(&mut self.city, &self.config, &action) {
            Ok(events) => log::debug!("{events:?}"),
            Err(e) => log::warn!("Rejected {action:?}: {e}"),
        }
    }

    /// Whether any tile of the footprint `blueprint` would take under `cursor`
    /// lies on a road.
    fn footprint_on_road(&self, blueprint: &str, cursor: Pos2) -> bool {
        let Some(bp) = self.config.blueprint(blueprint) else {
            return false;
        };
        let tile = self.config.tile_size;
        let footprint = geometry::placement_rect(cursor, bp.size, tile);
        let road_paths = geometry::road_paths(&self.city.roads, &self.city.buildings);

        let mut y = footprint.min.y;
        while y < footprint.max.y {
            let mut x = footprint.min.x;
            while x < footprint.max.x {
                if geometry::is_on_road(&self.city.roads, &road_paths, tile, Pos2::new(x, y)) {
                    return true;
                }
                x += tile;
            }
            y += tile;
        }
        false
    }

    fn city_screen(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click());
        let mut surface = PainterSurface::new(&painter);
        let size = surface.size();

        let labels = self.tool_labels();
        let buttons = render::layout_hud_buttons(&self.config, size, &labels);

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let pos = surface.to_surface(pos);
                self.click(pos, &buttons, size);
            }
        }
        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.tool = None;
        }

        let map_bottom = size.y - self.config.hud_height;
        let hover = response
            .hover_pos()
            .map(|p| surface.to_surface(p))
            .filter(|p| p.y < map_bottom);
        let preview = match (&self.tool, hover) {
            (Some(Tool::Build(name)), Some(cursor)) => Some((name.as_str(), cursor)),
            _ => None,
        };

        let road_paths = geometry::road_paths(&self.city.roads, &self.city.buildings);
        let scene = Scene {
            buildings: &self.city.buildings,
            roads: &self.city.roads,
            road_paths: &road_paths,
            units: &self.city.units,
            buttons: &buttons,
            selected: self.tool.as_ref().map(Tool::label),
            preview,
        };

        if let Err(e) = render::draw_scene(&mut surface, &self.config, &scene) {
            log::warn!("Frame drawn with errors: {e}");
        }
    }
}

impl eframe::App for TownshipApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.city_screen(ui));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Vec2 = Vec2::new(800.0, 600.0);

    fn app_with_buttons() -> (TownshipApp, Vec<Button>) {
        let app = TownshipApp::default();
        let buttons = render::layout_hud_buttons(&app.config, SIZE, &app.tool_labels());
        (app, buttons)
    }

    fn press(app: &mut TownshipApp, buttons: &[Button], label: &str) {
        let button = buttons
            .iter()
            .find(|b| b.label == label)
            .expect("button exists");
        app.click(button.rect().center(), buttons, SIZE);
    }

    #[test]
    fn hud_has_one_button_per_blueprint_plus_road() {
        let (app, buttons) = app_with_buttons();
        assert_eq!(buttons.len(), app.config.blueprints.len() + 1);
        assert_eq!(buttons.last().map(|b| b.label.as_str()), Some(ROAD_TOOL));
    }

    #[test]
    fn hud_click_selects_and_reclick_deselects() {
        let (mut app, buttons) = app_with_buttons();
        press(&mut app, &buttons, "farm");
        assert_eq!(app.tool, Some(Tool::Build("farm".into())));
        press(&mut app, &buttons, "farm");
        assert_eq!(app.tool, None);
    }

    #[test]
    fn map_click_without_tool_does_nothing() {
        let (mut app, buttons) = app_with_buttons();
        app.click(Pos2::new(100.0, 100.0), &buttons, SIZE);
        assert!(app.city.buildings.is_empty());
    }

    #[test]
    fn map_click_with_build_tool_places_building() {
        let (mut app, buttons) = app_with_buttons();
        press(&mut app, &buttons, "house");
        app.click(Pos2::new(100.0, 100.0), &buttons, SIZE);
        assert_eq!(app.city.buildings.len(), 1);
        assert_eq!(app.city.units.len(), 1);
        // Tool stays active for repeated placement.
        assert_eq!(app.tool, Some(Tool::Build("house".into())));
    }

    #[test]
    fn road_tool_connects_two_clicked_buildings() {
        let (mut app, buttons) = app_with_buttons();
        press(&mut app, &buttons, "farm");
        app.click(Pos2::new(100.0, 100.0), &buttons, SIZE);
        app.click(Pos2::new(400.0, 300.0), &buttons, SIZE);
        let a = app.city.buildings[0].center();
        let b = app.city.buildings[1].center();

        press(&mut app, &buttons, ROAD_TOOL);
        app.click(a, &buttons, SIZE);
        assert!(app.city.roads.is_empty());
        app.click(b, &buttons, SIZE);

        assert_eq!(app.city.roads.len(), 1);
        assert_eq!(app.tool, Some(Tool::Road { from: None }));
        assert_eq!(geometry::road_paths(&app.city.roads, &app.city.buildings).len(), 1);
    }

    #[test]
    fn road_tool_click_on_empty_ground_resets_start() {
        let (mut app, buttons) = app_with_buttons();
        press(&mut app, &buttons, "farm");
        app.click(Pos2::new(100.0, 100.0), &buttons, SIZE);
        let a = app.city.buildings[0].center();

        press(&mut app, &buttons, ROAD_TOOL);
        app.click(a, &buttons, SIZE);
        app.click(Pos2::new(500.0, 50.0), &buttons, SIZE);
        assert_eq!(app.tool, Some(Tool::Road { from: None }));
    }

    #[test]
    fn build_tool_refuses_footprint_on_a_road() {
        let (mut app, buttons) = app_with_buttons();
        press(&mut app, &buttons, "farm");
        // Farms at (20, 20) and (280, 20); their road runs along y = 50.
        app.click(Pos2::new(50.0, 50.0), &buttons, SIZE);
        app.click(Pos2::new(300.0, 50.0), &buttons, SIZE);
        let (a, b) = (app.city.buildings[0].id, app.city.buildings[1].id);
        city::apply(&mut app.city, &app.config, &CityAction::ConnectRoad { start: a, end: b })
            .expect("both exist");

        press(&mut app, &buttons, "house");
        // House at (160, 40) straddles the road.
        app.click(Pos2::new(180.0, 50.0), &buttons, SIZE);
        assert_eq!(app.city.buildings.len(), 2);
        assert!(app.city.units.is_empty());

        // Clear of the road it is placed as usual.
        app.click(Pos2::new(180.0, 200.0), &buttons, SIZE);
        assert_eq!(app.city.buildings.len(), 3);
    }

    #[test]
    fn road_to_same_building_is_rejected() {
        let (mut app, buttons) = app_with_buttons();
        press(&mut app, &buttons, "farm");
        app.click(Pos2::new(100.0, 100.0), &buttons, SIZE);
        let a = app.city.buildings[0].center();

        press(&mut app, &buttons, ROAD_TOOL);
        app.click(a, &buttons, SIZE);
        app.click(a, &buttons, SIZE);
        assert!(app.city.roads.is_empty());
    }
}
