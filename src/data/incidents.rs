//! Incident dataset loading.
//!
//! The input is a CSV export of the Global Terrorism Database. Only the
//! columns listed in [`REQUIRED_COLUMNS`] are read; anything else in the
//! file is ignored and column order does not matter.
//!
//! Coercion rules:
//! - `iyear` and `attacktype1` are integers (`2012.0` is accepted, since
//!   dataframe exports write integer columns with missing values as floats)
//! - blank `nkill` / `nwound` mean "unknown" and count as 0
//! - a blank coordinate leaves the record unlocated: it still counts in
//!   every sum but has no map position; any other unparseable value fails
//!   the whole load

use crate::error::{LoadError, Result};
use crate::location::LatLon;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// First year covered by the dataset
pub const FIRST_YEAR: i32 = 1970;
/// Last year covered by the dataset
pub const LAST_YEAR: i32 = 2017;

/// Header names that must be present in the input file
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "region_txt",
    "country_txt",
    "provstate",
    "city",
    "iyear",
    "latitude",
    "longitude",
    "nkill",
    "nwound",
    "attacktype1",
];

/// A single recorded incident
#[derive(Debug, Clone, PartialEq)]
pub struct Incident {
    pub region: String,
    pub country: String,
    pub provstate: String,
    pub city: String,
    pub year: i32,
    /// `None` when the source row has a blank coordinate
    pub position: Option<LatLon>,
    pub kills: u32,
    pub wounds: u32,
    /// Categorical attack-type code (1-9 in the source data)
    pub attack_type: u32,
}

/// Row as it appears in the file, before coercion
#[derive(Deserialize)]
struct RawRecord {
    region_txt: String,
    country_txt: String,
    provstate: String,
    city: String,
    iyear: String,
    latitude: String,
    longitude: String,
    nkill: String,
    nwound: String,
    attacktype1: String,
}

/// In-memory incident table. Read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Incident>,
}

impl Dataset {
    /// Load the dataset from a CSV file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_reader(file)?;
        log::info!(
            "Loaded {} incidents from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parse a dataset from any CSV byte stream
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = rdr.headers().map_err(LoadError::from)?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(LoadError::MissingColumn(column).into());
            }
        }

        let mut records = Vec::new();
        let mut unlocated = 0usize;
        let mut row = csv::StringRecord::new();

        while rdr.read_record(&mut row).map_err(LoadError::from)? {
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            let raw: RawRecord = row
                .deserialize(Some(&headers))
                .map_err(LoadError::from)?;

            let incident = coerce(raw, line)?;
            if incident.position.is_none() {
                unlocated += 1;
            }
            records.push(incident);
        }

        if unlocated > 0 {
            log::warn!("{} incidents have no coordinates and stay off the map", unlocated);
        }

        if records.is_empty() {
            return Err(LoadError::Empty.into());
        }

        Ok(Self { records })
    }

    /// Build a dataset from already-typed records
    pub fn from_records(records: Vec<Incident>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Incident] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct regions in order of first appearance
    pub fn regions(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.region.as_str()))
    }

    /// Distinct countries of a region in order of first appearance
    pub fn countries_in(&self, region: &str) -> Vec<String> {
        distinct(
            self.records
                .iter()
                .filter(|r| r.region == region)
                .map(|r| r.country.as_str()),
        )
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Coerce a raw row into an incident
fn coerce(raw: RawRecord, line: u64) -> Result<Incident> {
    let position = match (
        parse_coord(&raw.latitude, "latitude", line)?,
        parse_coord(&raw.longitude, "longitude", line)?,
    ) {
        (Some(lat), Some(lon)) => Some(LatLon { lat, lon }),
        _ => None,
    };

    let year = parse_int(&raw.iyear, "iyear", line)?;
    if !(FIRST_YEAR as i64..=LAST_YEAR as i64).contains(&year) {
        return Err(invalid(line, "iyear", &raw.iyear));
    }

    let attack_type = parse_int(&raw.attacktype1, "attacktype1", line)?;
    let attack_type =
        u32::try_from(attack_type).map_err(|_| invalid(line, "attacktype1", &raw.attacktype1))?;

    Ok(Incident {
        region: raw.region_txt.trim().to_string(),
        country: raw.country_txt.trim().to_string(),
        provstate: raw.provstate.trim().to_string(),
        city: raw.city.trim().to_string(),
        year: year as i32,
        position,
        kills: parse_count(&raw.nkill, "nkill", line)?,
        wounds: parse_count(&raw.nwound, "nwound", line)?,
        attack_type,
    })
}

fn invalid(line: u64, column: &'static str, value: &str) -> crate::error::DashboardError {
    LoadError::InvalidValue {
        line,
        column,
        value: value.to_string(),
    }
    .into()
}

/// Integer, tolerating a zero fractional part ("3.0")
fn parse_int(value: &str, column: &'static str, line: u64) -> Result<i64> {
    let trimmed = value.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Ok(v);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
        _ => Err(invalid(line, column, value)),
    }
}

/// Non-negative count; blank is 0
fn parse_count(value: &str, column: &'static str, line: u64) -> Result<u32> {
    if value.trim().is_empty() {
        return Ok(0);
    }
    let v = parse_int(value, column, line)?;
    u32::try_from(v).map_err(|_| invalid(line, column, value))
}

/// Coordinate in degrees; blank is `None`
fn parse_coord(value: &str, column: &'static str, line: u64) -> Result<Option<f64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(invalid(line, column, value)),
    }
}

/// Small GTD-shaped extract shared by unit tests across the crate.
/// South Asia is the fifth region in first-appearance order.
#[cfg(test)]
pub(crate) const FIXTURE_CSV: &str = "\
eventid,iyear,imonth,country_txt,region_txt,provstate,city,latitude,longitude,attacktype1,nkill,nwound
1,1970,7,Dominican Republic,Central America & Caribbean,National,Santo Domingo,18.456792,-69.951164,1,1.0,0.0
2,1970,1,United States,North America,Illinois,Cairo,37.005105,-89.176269,2,0.0,0.0
3,1971,1,Philippines,Southeast Asia,Tarlac,Unknown,15.478598,120.599741,1,1.0,0.0
4,1972,2,Greece,Western Europe,Attica,Athens,37.99749,23.762728,3,,
5,2012,3,Pakistan,South Asia,Sindh,Karachi,24.891115,67.143311,2,3.0,5.0
6,2012,3,Pakistan,South Asia,Sindh,Karachi,24.891115,67.143311,3,1.0,2.0
7,2014,6,Pakistan,South Asia,Khyber Pakhtunkhwa,Peshawar,34.006004,71.53743,3,10.0,20.0
8,2009,5,Pakistan,South Asia,Balochistan,Quetta,30.2095,67.0182,6,2.0,1.0
9,2016,8,India,South Asia,Jammu and Kashmir,Srinagar,34.083656,74.797371,1,0.0,4.0
10,2017,2,Pakistan,South Asia,Punjab,Lahore,31.549721,74.343613,7,0.0,
11,2015,1,Iraq,Middle East & North Africa,Baghdad,Baghdad,33.303566,44.371773,3,8.0,12.0
12,2011,4,Afghanistan,South Asia,Kabul,Kabul,34.516895,69.147011,2,5.0,
";

/// Rows with blank coordinates: Maldives has no located record at all,
/// India has one located and one unlocated.
#[cfg(test)]
pub(crate) const UNLOCATED_CSV: &str = "\
region_txt,country_txt,provstate,city,iyear,latitude,longitude,nkill,nwound,attacktype1
South Asia,India,Delhi,New Delhi,2010,28.6,77.2,1,2,3
South Asia,Maldives,Kaafu,Male,2012,,,0,1,2
South Asia,India,Punjab,Amritsar,2011,,,7,0,1
";

#[cfg(test)]
pub(crate) fn fixture() -> Dataset {
    Dataset::from_reader(FIXTURE_CSV.as_bytes()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;

    fn load_err(csv: &str) -> LoadError {
        match Dataset::from_reader(csv.as_bytes()) {
            Err(DashboardError::Load(e)) => e,
            other => panic!("expected load error, got {:?}", other),
        }
    }

    #[test]
    fn test_loads_fixture() {
        let ds = fixture();
        assert_eq!(ds.len(), 12);

        let first = &ds.records()[0];
        assert_eq!(first.country, "Dominican Republic");
        assert_eq!(first.year, 1970);
        assert_eq!(first.kills, 1);
        assert_eq!(first.attack_type, 1);
    }

    #[test]
    fn test_blank_counts_are_zero() {
        let ds = fixture();
        let athens = ds.records().iter().find(|r| r.city == "Athens").unwrap();
        assert_eq!(athens.kills, 0);
        assert_eq!(athens.wounds, 0);
    }

    #[test]
    fn test_regions_in_first_appearance_order() {
        let ds = fixture();
        assert_eq!(
            ds.regions(),
            vec![
                "Central America & Caribbean",
                "North America",
                "Southeast Asia",
                "Western Europe",
                "South Asia",
                "Middle East & North Africa",
            ]
        );
        assert_eq!(
            ds.countries_in("South Asia"),
            vec!["Pakistan", "India", "Afghanistan"]
        );
        assert!(ds.countries_in("Atlantis").is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = Dataset::load(Path::new("/nonexistent/incidents.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::Load(LoadError::Io { .. })));
    }

    #[test]
    fn test_missing_column() {
        let csv = "region_txt,country_txt,provstate,city,iyear,latitude,longitude,nkill,nwound\n";
        assert!(matches!(load_err(csv), LoadError::MissingColumn("attacktype1")));
    }

    #[test]
    fn test_invalid_year() {
        let csv = "region_txt,country_txt,provstate,city,iyear,latitude,longitude,nkill,nwound,attacktype1\n\
                   South Asia,India,Delhi,New Delhi,nineteen,28.6,77.2,1,0,2\n";
        match load_err(csv) {
            LoadError::InvalidValue { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, "iyear");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_year_outside_coverage() {
        let csv = "region_txt,country_txt,provstate,city,iyear,latitude,longitude,nkill,nwound,attacktype1\n\
                   South Asia,India,Delhi,New Delhi,2019,28.6,77.2,1,0,2\n";
        assert!(matches!(
            load_err(csv),
            LoadError::InvalidValue { column: "iyear", .. }
        ));
    }

    #[test]
    fn test_negative_and_fractional_counts() {
        let csv = "region_txt,country_txt,provstate,city,iyear,latitude,longitude,nkill,nwound,attacktype1\n\
                   South Asia,India,Delhi,New Delhi,2010,28.6,77.2,-1,0,2\n";
        assert!(matches!(
            load_err(csv),
            LoadError::InvalidValue { column: "nkill", .. }
        ));

        let csv = "region_txt,country_txt,provstate,city,iyear,latitude,longitude,nkill,nwound,attacktype1\n\
                   South Asia,India,Delhi,New Delhi,2010,28.6,77.2,1,2.5,2\n";
        assert!(matches!(
            load_err(csv),
            LoadError::InvalidValue { column: "nwound", .. }
        ));
    }

    #[test]
    fn test_blank_coordinates_kept_unlocated() {
        let ds = Dataset::from_reader(UNLOCATED_CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records()[1].position, None);
        assert_eq!(ds.records()[2].position, None);
        assert_eq!(ds.records()[2].kills, 7);
        assert_eq!(
            ds.records()[0].position,
            Some(LatLon { lat: 28.6, lon: 77.2 })
        );
        assert_eq!(ds.countries_in("South Asia"), vec!["India", "Maldives"]);
    }

    #[test]
    fn test_padded_header_names() {
        let csv = "region_txt, country_txt, provstate, city, iyear, latitude, longitude, nkill, nwound, attacktype1\n\
                   South Asia,India,Delhi,New Delhi,2010,28.6,77.2,1,0,2\n";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.records()[0].country, "India");
        assert_eq!(ds.records()[0].attack_type, 2);
    }

    #[test]
    fn test_header_only_is_empty() {
        let csv = "region_txt,country_txt,provstate,city,iyear,latitude,longitude,nkill,nwound,attacktype1\n";
        assert!(matches!(load_err(csv), LoadError::Empty));
    }
}
