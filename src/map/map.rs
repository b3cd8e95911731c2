use egui::emath::lerp;
use egui::epaint::{Color32, Pos2, Shape, Stroke};
use egui::{Rangef, Response, Sense, Ui, Vec2, Widget};
use serde::{Deserialize, Serialize};

use crate::data::geometry::RegionCollection;
use crate::map::layer::RegionLayer;
use crate::map::projection::{lonlat_to_world, world_to_lonlat, WorldTransform};

/// Approximate center of the contiguous US, the initial camera position.
const US_CENTER_LONLAT: (f64, f64) = (-98.5795, 39.8283);
const DEFAULT_ZOOM: f32 = 3.0;

#[derive(Clone, Serialize, Deserialize)]
pub struct MapState {
    /// Camera center in world space.
    center: (f64, f64),
    zoom: f32,
    dragging: bool,
    drag_start: Option<Pos2>,
}

impl Default for MapState {
    fn default() -> Self {
        Self {
            center: lonlat_to_world(US_CENTER_LONLAT.0, US_CENTER_LONLAT.1),
            zoom: DEFAULT_ZOOM,
            dragging: false,
            drag_start: None,
        }
    }
}

impl MapState {
    pub fn load(ctx: &egui::Context, id: egui::Id) -> Self {
        ctx.data_mut(|d| d.get_persisted::<Self>(id).unwrap_or_default())
    }

    pub fn store(self, ctx: &egui::Context, id: egui::Id) {
        ctx.data_mut(|d| d.insert_persisted(id, self));
    }
}

/// Interactive region map: pans on drag, zooms on scroll or pinch, paints the
/// current [`RegionLayer`], and reports the clicked region through
/// `clicked_region` so the caller can open a popup without the widget holding
/// any app state.
pub struct Map<'a> {
    id: egui::Id,
    layer: &'a RegionLayer,
    regions: &'a RegionCollection,
    clicked_region: &'a mut Option<String>,
    viewport_size: Vec2,
}

impl<'a> Widget for Map<'a> {
    fn ui(self, ui: &mut Ui) -> Response {
        let mut state = MapState::load(ui.ctx(), self.id);

        let (rect, response) =
            ui.allocate_exact_size(self.viewport_size, Sense::click_and_drag());

        ui.painter().rect(
            rect,
            0.0,
            Color32::from_rgb(18, 26, 40),
            Stroke::new(1.0, Color32::WHITE),
        );
        let map_painter = ui.painter().with_clip_rect(rect);

        // Handle drag panning
        if response.dragged() {
            if !state.dragging {
                state.drag_start = response.hover_pos();
                state.dragging = true;
            }
            if let (Some(current_pos), Some(start_pos)) =
                (response.hover_pos(), state.drag_start)
            {
                let delta = current_pos - start_pos;
                let scale = WorldTransform::new(state.center, state.zoom, rect).scale();
                state.center.0 -= delta.x as f64 / scale;
                state.center.1 -= delta.y as f64 / scale;
                state.drag_start = Some(current_pos);
            }
        } else if state.dragging {
            state.dragging = false;
            state.drag_start = None;
        }

        let mut zoomed = false;
        // Handle zoom for pinch / touch
        let zoom_delta = ui.input(|i| i.zoom_delta()) - 1.0;
        if zoom_delta.abs() > f32::EPSILON {
            let zoom_new = lerp(Rangef::new(0.0, 1.0), zoom_delta.abs()) * zoom_delta.signum();
            state.zoom = (state.zoom + zoom_new).clamp(0.0, 20.0);
            zoomed = true;
        }

        // Handle zoom for scroll
        let mut scroll = ui.input(|i| i.smooth_scroll_delta).y;
        if (scroll - 0.0).abs() > f32::EPSILON && !zoomed && response.hovered() {
            // Normalize scroll further using tanh
            scroll = (scroll / 10.0).tanh();
            state.zoom = (state.zoom + scroll).clamp(0.0, 20.0);
        }

        let transform = WorldTransform::new(state.center, state.zoom, rect);
        for shape in self.layer.shapes() {
            for ring in &shape.rings {
                let points: Vec<Pos2> = ring
                    .iter()
                    .map(|&(x, y)| transform.world_to_screen(x, y))
                    .collect();
                if points.len() < 3 {
                    continue;
                }
                map_painter.add(Shape::convex_polygon(
                    points,
                    shape.fill.gamma_multiply(0.75),
                    Stroke::new(1.0, Color32::BLACK),
                ));
            }
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = transform.screen_to_world(pos);
                let (lon, lat) = world_to_lonlat(x, y);
                *self.clicked_region = self
                    .layer
                    .hit_test(self.regions, lon, lat)
                    .map(str::to_string);
            }
        }

        state.store(ui.ctx(), self.id);

        response
    }
}

impl<'a> Map<'a> {
    pub fn new(
        id_source: impl std::hash::Hash,
        layer: &'a RegionLayer,
        regions: &'a RegionCollection,
        clicked_region: &'a mut Option<String>,
    ) -> Self {
        Self {
            id: egui::Id::new(id_source),
            layer,
            regions,
            clicked_region,
            viewport_size: Vec2::new(1024.0, 1024.0),
        }
    }

    pub fn viewport_size(mut self, size: Vec2) -> Self {
        self.viewport_size = size;
        self
    }
}
