use crate::aggregate::MapRow;
use crate::location::LatLon;
use ratatui::style::Color;

/// Web-map zoom level the incident map is shown at. Each step doubles
/// the scale; 0 fits the whole world.
pub const MAP_ZOOM: f64 = 3.0;

/// A scatter marker
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    /// Relative size in [0, 1]; area is proportional to wounds
    pub size: f64,
    pub color: Color,
}

/// Scatter map of incident locations
#[derive(Debug, Clone, PartialEq)]
pub struct MapChart {
    pub center: LatLon,
    pub zoom: f64,
    pub markers: Vec<Marker>,
}

/// One marker per map-view row, centered on the selected country
pub fn render(rows: &[MapRow], center: LatLon) -> MapChart {
    let min_wounds = rows.iter().map(|r| r.wounds).min().unwrap_or(0);
    let max_wounds = rows.iter().map(|r| r.wounds).max().unwrap_or(0);

    let markers = rows
        .iter()
        .map(|row| {
            let size = if max_wounds == 0 {
                0.0
            } else {
                (row.wounds as f64 / max_wounds as f64).sqrt()
            };
            let t = if max_wounds > min_wounds {
                (row.wounds - min_wounds) as f64 / (max_wounds - min_wounds) as f64
            } else {
                0.0
            };
            Marker {
                lat: row.lat,
                lon: row.lon,
                size,
                color: hsv_scale(t),
            }
        })
        .collect();

    MapChart {
        center,
        zoom: MAP_ZOOM,
        markers,
    }
}

/// Cyclic hue scale: red at both ends of [0, 1], through yellow, green,
/// cyan, blue and magenta
pub fn hsv_scale(t: f64) -> Color {
    let hue = t.clamp(0.0, 1.0) * 6.0;
    let sector = hue.floor() as u8;
    let f = hue - hue.floor();
    let rise = (f * 255.0).round() as u8;
    let fall = 255 - rise;

    let (r, g, b) = match sector {
        0 => (255, rise, 0),
        1 => (fall, 255, 0),
        2 => (0, 255, rise),
        3 => (0, fall, 255),
        4 => (rise, 0, 255),
        5 => (255, 0, fall),
        _ => (255, 0, 0),
    };
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(city: &str, wounds: u64) -> MapRow {
        MapRow {
            region: "South Asia".into(),
            country: "Pakistan".into(),
            provstate: String::new(),
            city: city.into(),
            year: 2012,
            lat: 30.0,
            lon: 70.0,
            kills: 1,
            wounds,
        }
    }

    const CENTER: LatLon = LatLon { lat: 31.5, lon: 74.3 };

    #[test]
    fn test_one_marker_per_row() {
        let rows = vec![row("a", 0), row("b", 4), row("c", 16)];
        let chart = render(&rows, CENTER);
        assert_eq!(chart.markers.len(), 3);
        assert_eq!(chart.center, CENTER);
        assert_eq!(chart.zoom, MAP_ZOOM);
    }

    #[test]
    fn test_size_scales_with_wounds() {
        let rows = vec![row("a", 0), row("b", 4), row("c", 16)];
        let chart = render(&rows, CENTER);
        let sizes: Vec<f64> = chart.markers.iter().map(|m| m.size).collect();
        assert_eq!(sizes, vec![0.0, 0.5, 1.0]);
        assert_eq!(chart.markers[0].color, Color::Rgb(255, 0, 0));
        assert_ne!(chart.markers[1].color, chart.markers[0].color);
    }

    #[test]
    fn test_no_wounds() {
        let chart = render(&[row("a", 0), row("b", 0)], CENTER);
        assert!(chart.markers.iter().all(|m| m.size == 0.0));
    }

    #[test]
    fn test_zoom_independent_of_spread() {
        let mut far = row("far", 3);
        far.lon = -120.0;
        let chart = render(&[row("a", 1), far], CENTER);
        assert_eq!(chart.zoom, MAP_ZOOM);
    }

    #[test]
    fn test_hsv_scale() {
        assert_eq!(hsv_scale(0.0), Color::Rgb(255, 0, 0));
        assert_eq!(hsv_scale(1.0), Color::Rgb(255, 0, 0));
        assert_eq!(hsv_scale(0.25), Color::Rgb(127, 255, 0));
        assert_eq!(hsv_scale(0.5), Color::Rgb(0, 255, 255));
    }
}
