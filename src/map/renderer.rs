use crate::braille::BrailleCanvas;
use crate::chart::MapChart;
use crate::map::projection::Viewport;
use ratatui::style::Color;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Level of detail for basemap data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lod {
    Low,    // 110m - world view
    Medium, // 50m - continental
    High,   // 10m - regional
}

impl Lod {
    /// Select LOD from viewport zoom (world widths per canvas)
    pub fn from_zoom(zoom: f64) -> Self {
        if zoom < 2.0 {
            Lod::Low
        } else if zoom < 8.0 {
            Lod::Medium
        } else {
            Lod::High
        }
    }
}

/// Glyphs by marker size, smallest first
const MARKER_GLYPHS: [char; 4] = ['·', '•', '●', '◉'];

/// An incident marker placed on a character cell
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerCell {
    pub col: u16,
    pub row: u16,
    pub glyph: char,
    pub color: Color,
}

/// Drawable layers for one map frame
pub struct MapLayers {
    pub coastlines: BrailleCanvas,
    pub borders: BrailleCanvas,
    pub markers: Vec<MarkerCell>,
    /// Cell of the map center, if on screen
    pub center: Option<(u16, u16)>,
}

/// Coastline and border outlines drawn under the incident markers
#[derive(Default)]
pub struct BaseMap {
    coastlines_low: Vec<LineString>,
    coastlines_medium: Vec<LineString>,
    coastlines_high: Vec<LineString>,
    borders_medium: Vec<LineString>,
    borders_high: Vec<LineString>,
}

impl BaseMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coastlines for a LOD, falling back to coarser data
    fn coastlines(&self, lod: Lod) -> &[LineString] {
        let candidates = match lod {
            Lod::High => [&self.coastlines_high, &self.coastlines_medium, &self.coastlines_low],
            Lod::Medium => [&self.coastlines_medium, &self.coastlines_low, &self.coastlines_low],
            Lod::Low => [&self.coastlines_low, &self.coastlines_medium, &self.coastlines_high],
        };
        candidates
            .into_iter()
            .find(|c| !c.is_empty())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn borders(&self, lod: Lod) -> &[LineString] {
        if lod == Lod::High && !self.borders_high.is_empty() {
            &self.borders_high
        } else {
            &self.borders_medium
        }
    }

    /// Draw the basemap and the chart's markers onto a `cols` x `rows` cell area
    pub fn render(&self, chart: &MapChart, cols: usize, rows: usize) -> MapLayers {
        let mut coastlines = BrailleCanvas::new(cols, rows);
        let mut borders = BrailleCanvas::new(cols, rows);
        let (width, height) = coastlines.dots();
        let viewport = Viewport::at_level(chart.center.lon, chart.center.lat, chart.zoom, width, height);
        let lod = Lod::from_zoom(viewport.zoom);

        for line in self.coastlines(lod) {
            draw_linestring(&mut coastlines, line, &viewport);
        }
        for line in self.borders(lod) {
            draw_linestring(&mut borders, line, &viewport);
        }

        let to_cell = |px: i32, py: i32| -> Option<(u16, u16)> {
            if px < 0 || py < 0 {
                return None;
            }
            let (col, row) = ((px / 2) as usize, (py / 4) as usize);
            (col < cols && row < rows).then_some((col as u16, row as u16))
        };

        // Small markers first so larger ones stay visible where they overlap
        let mut order: Vec<usize> = (0..chart.markers.len()).collect();
        order.sort_by(|&a, &b| chart.markers[a].size.total_cmp(&chart.markers[b].size));

        let markers = order
            .into_iter()
            .filter_map(|i| {
                let marker = &chart.markers[i];
                let (px, py) = viewport.project(marker.lon, marker.lat);
                let (col, row) = to_cell(px, py)?;
                Some(MarkerCell {
                    col,
                    row,
                    glyph: marker_glyph(marker.size),
                    color: marker.color,
                })
            })
            .collect();

        let (cx, cy) = viewport.project(chart.center.lon, chart.center.lat);

        MapLayers {
            coastlines,
            borders,
            markers,
            center: to_cell(cx, cy),
        }
    }

    /// Add coastline data at a specific LOD
    pub fn add_coastline(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::Low => self.coastlines_low.push(line),
            Lod::Medium => self.coastlines_medium.push(line),
            Lod::High => self.coastlines_high.push(line),
        }
    }

    /// Add border data at a specific LOD (low resolution shares medium)
    pub fn add_border(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::High => self.borders_high.push(line),
            Lod::Low | Lod::Medium => self.borders_medium.push(line),
        }
    }

    /// Check if any coastline data is loaded
    pub fn has_data(&self) -> bool {
        !self.coastlines_low.is_empty()
            || !self.coastlines_medium.is_empty()
            || !self.coastlines_high.is_empty()
    }
}

fn marker_glyph(size: f64) -> char {
    let idx = (size.clamp(0.0, 1.0) * (MARKER_GLYPHS.len() - 1) as f64).round() as usize;
    MARKER_GLYPHS[idx]
}

/// Draw a linestring, skipping segments that are off screen or wrap the antimeridian
fn draw_linestring(canvas: &mut BrailleCanvas, line: &LineString, viewport: &Viewport) {
    let mut prev: Option<(i32, i32)> = None;
    for &(lon, lat) in line {
        let p = viewport.project(lon, lat);
        if let Some(q) = prev {
            let span = ((p.0 - q.0).abs() + (p.1 - q.1).abs()) as usize;
            if span < viewport.width && viewport.line_might_be_visible(q, p) {
                canvas.line(q, p);
            }
        }
        prev = Some(p);
    }
}
