use std::f64::consts::PI;

/// Web Mercator loses meaning past this latitude
const MAX_LAT: f64 = 85.0511;

/// Visible map area: a Web Mercator window centred on a lon/lat
#[derive(Clone, Debug)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-85 to 85)
    pub center_lat: f64,
    /// World widths per canvas width (1.0 shows the whole world)
    pub zoom: f64,
    /// Canvas width in dots
    pub width: usize,
    /// Canvas height in dots
    pub height: usize,
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat: center_lat.clamp(-MAX_LAT, MAX_LAT),
            zoom,
            width,
            height,
        }
    }

    /// Viewport for a web-map zoom level, where each level doubles the scale
    pub fn at_level(center_lon: f64, center_lat: f64, level: f64, width: usize, height: usize) -> Self {
        Self::new(center_lon, center_lat, 2f64.powf(level), width, height)
    }

    /// Project a geographic coordinate (lon, lat) to dot coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let scale = self.zoom * self.width as f64;
        let x = (mercator_x(lon) - mercator_x(self.center_lon)) * scale + self.width as f64 / 2.0;
        let y = (mercator_y(lat) - mercator_y(self.center_lat)) * scale + self.height as f64 / 2.0;
        (x.floor() as i32, y.floor() as i32)
    }

    /// Rough bounding-box test for a segment
    pub fn line_might_be_visible(&self, a: (i32, i32), b: (i32, i32)) -> bool {
        a.0.max(b.0) >= 0
            && a.0.min(b.0) < self.width as i32
            && a.1.max(b.1) >= 0
            && a.1.min(b.1) < self.height as i32
    }
}

/// Longitude to [0, 1] across the world
#[inline(always)]
fn mercator_x(lon: f64) -> f64 {
    (lon + 180.0) / 360.0
}

/// Latitude to [0, 1], north at 0
#[inline(always)]
fn mercator_y(lat: f64) -> f64 {
    let rad = lat.clamp(-MAX_LAT, MAX_LAT).to_radians();
    (1.0 - (rad.tan() + 1.0 / rad.cos()).ln() / PI) / 2.0
}
