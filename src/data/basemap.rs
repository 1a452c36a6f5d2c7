//! Natural Earth GeoJSON outlines for the map background.

use crate::map::{BaseMap, LineString, Lod};
use anyhow::{Context, Result};
use geojson::{GeoJson, Geometry, Value};
use std::fs;
use std::path::Path;

/// Coastline files by resolution, coarse to fine
const COASTLINE_FILES: [(&str, Lod); 3] = [
    ("ne_110m_coastline.json", Lod::Low),
    ("ne_50m_coastline.json", Lod::Medium),
    ("ne_10m_coastline.json", Lod::High),
];

const BORDER_FILES: [(&str, Lod); 2] = [
    ("ne_50m_borders.json", Lod::Medium),
    ("ne_10m_borders.json", Lod::High),
];

/// Load every outline file present in `dir`. Missing files are fine;
/// unreadable ones are logged and skipped. Returns the number loaded.
pub fn load_dir(basemap: &mut BaseMap, dir: &Path) -> usize {
    let mut loaded = 0;

    for (filename, lod) in COASTLINE_FILES {
        let path = dir.join(filename);
        if !path.exists() {
            continue;
        }
        match read_lines(&path) {
            Ok(lines) => {
                lines.into_iter().for_each(|l| basemap.add_coastline(l, lod));
                loaded += 1;
            }
            Err(e) => log::warn!("Failed to load {}: {:#}", filename, e),
        }
    }

    for (filename, lod) in BORDER_FILES {
        let path = dir.join(filename);
        if !path.exists() {
            continue;
        }
        match read_lines(&path) {
            Ok(lines) => {
                lines.into_iter().for_each(|l| basemap.add_border(l, lod));
                loaded += 1;
            }
            Err(e) => log::warn!("Failed to load {}: {:#}", filename, e),
        }
    }

    log::info!("Loaded {} basemap files from {}", loaded, dir.display());
    loaded
}

/// Parse a GeoJSON file into its line features
fn read_lines(path: &Path) -> Result<Vec<LineString>> {
    let mut bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let geojson: GeoJson = simd_json::serde::from_slice(&mut bytes)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(extract_lines(&geojson))
}

/// Flatten every line-like geometry; polygons contribute their exterior ring
pub fn extract_lines(geojson: &GeoJson) -> Vec<LineString> {
    let mut out = Vec::new();
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for geometry in fc.features.iter().filter_map(|f| f.geometry.as_ref()) {
                collect_geometry(geometry, &mut out);
            }
        }
        GeoJson::Feature(f) => {
            if let Some(geometry) = &f.geometry {
                collect_geometry(geometry, &mut out);
            }
        }
        GeoJson::Geometry(geometry) => collect_geometry(geometry, &mut out),
    }
    out
}

fn collect_geometry(geometry: &Geometry, out: &mut Vec<LineString>) {
    let to_line = |coords: &Vec<Vec<f64>>| -> LineString {
        coords
            .iter()
            .filter(|c| c.len() >= 2)
            .map(|c| (c[0], c[1]))
            .collect()
    };

    match &geometry.value {
        Value::LineString(coords) => out.push(to_line(coords)),
        Value::MultiLineString(lines) => out.extend(lines.iter().map(to_line)),
        Value::Polygon(rings) => out.extend(rings.first().map(to_line)),
        Value::MultiPolygon(polygons) => {
            out.extend(polygons.iter().filter_map(|rings| rings.first()).map(to_line))
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_geometry(g, out);
            }
        }
        _ => {}
    }
}

/// Coarse continent outlines for when no GeoJSON is available
pub fn generate_simple_world(basemap: &mut BaseMap) {
    let outlines: [&[(f64, f64)]; 7] = [
        // North and Central America
        &[
            (-165.0, 64.0), (-150.0, 59.0), (-135.0, 57.0), (-124.0, 47.0),
            (-120.0, 34.0), (-110.0, 23.0), (-105.0, 19.0), (-92.0, 15.0),
            (-84.0, 9.0), (-78.0, 8.0), (-83.0, 15.0), (-88.0, 21.0),
            (-97.0, 22.0), (-97.0, 27.0), (-90.0, 29.5), (-82.0, 25.0),
            (-81.0, 30.0), (-76.0, 35.0), (-71.0, 41.5), (-66.0, 44.5),
            (-60.0, 47.0), (-56.0, 52.0), (-62.0, 58.0), (-78.0, 62.0),
            (-94.0, 59.0), (-96.0, 68.0), (-125.0, 70.0), (-165.0, 64.0),
        ],
        // South America
        &[
            (-78.0, 8.0), (-72.0, 12.0), (-62.0, 10.5), (-51.0, 4.0),
            (-35.0, -6.0), (-39.0, -14.0), (-41.0, -22.0), (-48.5, -26.0),
            (-57.0, -36.0), (-63.0, -41.0), (-66.0, -47.0), (-69.0, -52.0),
            (-74.0, -50.0), (-73.0, -38.0), (-71.5, -28.0), (-70.3, -18.0),
            (-76.0, -14.0), (-81.0, -5.0), (-80.0, 1.0), (-78.0, 8.0),
        ],
        // Europe
        &[
            (-9.5, 37.0), (-6.0, 36.2), (0.0, 39.0), (3.5, 43.3),
            (9.0, 44.3), (12.5, 44.0), (16.0, 41.0), (18.5, 40.2),
            (19.5, 42.0), (23.0, 36.5), (26.0, 40.8), (29.0, 41.2),
            (28.0, 46.0), (37.0, 47.0), (39.0, 55.0), (31.0, 60.0),
            (29.0, 70.0), (15.0, 68.5), (5.0, 61.0), (8.0, 57.5),
            (8.5, 54.0), (4.0, 51.5), (-1.5, 49.5), (-4.5, 48.0),
            (-1.5, 46.0), (-1.8, 43.4), (-9.0, 43.0), (-9.5, 37.0),
        ],
        // Africa
        &[
            (-17.0, 21.0), (-16.5, 14.0), (-13.0, 8.0), (-7.5, 4.5),
            (1.0, 6.0), (9.5, 4.0), (9.3, -1.0), (12.0, -6.0),
            (13.5, -12.0), (12.0, -18.0), (15.0, -27.0), (18.5, -34.3),
            (25.5, -34.0), (32.5, -28.5), (35.5, -22.0), (40.5, -15.0),
            (39.5, -6.0), (41.5, -1.5), (51.0, 11.0), (43.5, 11.5),
            (38.0, 18.0), (32.5, 30.0), (25.0, 31.7), (20.0, 31.0),
            (10.5, 37.0), (-1.0, 35.5), (-6.0, 35.8), (-10.0, 30.0),
            (-17.0, 21.0),
        ],
        // Southern and eastern Asia, Suez to the Bering Strait
        &[
            (32.5, 30.0), (35.0, 28.0), (39.0, 21.0), (43.0, 13.0),
            (45.0, 12.8), (52.0, 16.0), (57.5, 19.0), (59.8, 22.5),
            (56.5, 26.5), (51.5, 24.5), (48.0, 30.0), (52.0, 27.5),
            (57.0, 25.8), (62.0, 25.2), (67.0, 24.8), (72.5, 21.0),
            (73.0, 17.0), (77.0, 8.0), (80.2, 10.0), (80.3, 15.5),
            (87.0, 21.0), (91.5, 22.5), (94.5, 16.5), (98.0, 9.0),
            (100.3, 3.5), (103.5, 1.5), (103.0, 5.5), (100.0, 13.5),
            (105.0, 9.0), (109.0, 12.0), (106.5, 20.0), (111.0, 21.5),
            (117.0, 23.5), (121.5, 28.0), (122.0, 31.0), (119.0, 35.0),
            (121.5, 40.0), (126.5, 38.0), (129.5, 35.5), (129.5, 42.5),
            (141.0, 52.0), (135.0, 55.0), (143.0, 59.5), (160.0, 61.0),
            (180.0, 66.0),
        ],
        // Northern Eurasia, back from the Pacific to the Black Sea
        &[
            (180.0, 69.0), (140.0, 72.0), (113.0, 73.5), (100.0, 77.0),
            (80.0, 73.0), (68.0, 69.0), (55.0, 68.0), (43.0, 67.5),
            (33.0, 69.0), (29.0, 70.0),
        ],
        // Australia
        &[
            (113.5, -22.0), (114.0, -26.5), (115.0, -34.0), (123.0, -34.0),
            (131.5, -31.5), (137.5, -35.0), (141.0, -38.5), (146.0, -39.0),
            (150.0, -37.5), (153.5, -28.0), (150.0, -22.0), (145.5, -15.0),
            (142.5, -10.7), (141.5, -15.0), (136.0, -12.0), (130.0, -12.5),
            (125.5, -14.5), (122.0, -18.0), (113.5, -22.0),
        ],
    ];

    for outline in outlines {
        basemap.add_coastline(outline.to_vec(), Lod::Low);
    }
}
