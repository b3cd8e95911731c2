use egui::{Pos2, Rect};

/// Pixel width of the whole world at zoom 0. Zooming doubles it per level.
pub const WORLD_BASE_PX: f64 = 512.0;

/// Projects a longitude/latitude to Web Mercator unit world space, where the
/// whole world maps to [0, 1] on both axes and y grows southward.
pub fn lonlat_to_world(lon: f64, lat: f64) -> (f64, f64) {
    let lat_rad = lat.to_radians();
    let x = (lon + 180.0) / 360.0;
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0;
    (x, y)
}

/// Inverse of [`lonlat_to_world`].
pub fn world_to_lonlat(x: f64, y: f64) -> (f64, f64) {
    let lon = x * 360.0 - 180.0;
    let lat = (std::f64::consts::PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
    (lon, lat)
}

/// Affine map between world space and a screen viewport for a given camera
/// center and zoom. Rebuilt every frame from the live map state; all shapes
/// stay in world space.
#[derive(Clone, Copy, Debug)]
pub struct WorldTransform {
    center: (f64, f64),
    scale: f64,
    viewport: Rect,
}

impl WorldTransform {
    pub fn new(center: (f64, f64), zoom: f32, viewport: Rect) -> Self {
        Self {
            center,
            scale: WORLD_BASE_PX * 2.0_f64.powf(zoom as f64),
            viewport,
        }
    }

    /// Pixels per world unit at the current zoom.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn world_to_screen(&self, x: f64, y: f64) -> Pos2 {
        let center = self.viewport.center();
        Pos2 {
            x: center.x + ((x - self.center.0) * self.scale) as f32,
            y: center.y + ((y - self.center.1) * self.scale) as f32,
        }
    }

    pub fn screen_to_world(&self, pos: Pos2) -> (f64, f64) {
        let center = self.viewport.center();
        (
            self.center.0 + (pos.x - center.x) as f64 / self.scale,
            self.center.1 + (pos.y - center.y) as f64 / self.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn equator_meridian_is_world_center() {
        let (x, y) = lonlat_to_world(0.0, 0.0);
        assert_relative_eq!(x, 0.5);
        assert_relative_eq!(y, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn projection_round_trips() {
        for &(lon, lat) in &[(-98.5795, 39.8283), (-106.0, 26.0), (151.2, -33.8)] {
            let (x, y) = lonlat_to_world(lon, lat);
            let (lon2, lat2) = world_to_lonlat(x, y);
            assert_relative_eq!(lon, lon2, epsilon = 1e-9);
            assert_relative_eq!(lat, lat2, epsilon = 1e-9);
        }
    }

    #[test]
    fn transform_round_trips() {
        let viewport = Rect::from_min_max(Pos2::new(10.0, 10.0), Pos2::new(790.0, 790.0));
        let center = lonlat_to_world(-98.5795, 39.8283);
        let transform = WorldTransform::new(center, 4.0, viewport);

        let screen = transform.world_to_screen(center.0 + 0.01, center.1 - 0.02);
        let (x, y) = transform.screen_to_world(screen);
        assert_relative_eq!(x, center.0 + 0.01, epsilon = 1e-6);
        assert_relative_eq!(y, center.1 - 0.02, epsilon = 1e-6);
    }

    #[test]
    fn camera_center_lands_on_viewport_center() {
        let viewport = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(100.0, 100.0));
        let transform = WorldTransform::new((0.3, 0.4), 2.0, viewport);
        let screen = transform.world_to_screen(0.3, 0.4);
        assert_relative_eq!(screen.x, 50.0);
        assert_relative_eq!(screen.y, 50.0);
    }
}
