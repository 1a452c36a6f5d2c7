//! Group-by / sum over the filtered incident table.
//!
//! Records without coordinates are left out of the map view only; they
//! still count in the trend and totals.
//!
//! Each view is keyed the way the charts consume it and emitted in sorted
//! key order, so the same dataset and filter always produce the same
//! tables. Nothing here is cached: callers re-run [`aggregate`] whenever the
//! filter changes.

use crate::data::{Dataset, Incident};
use crate::error::{DashboardError, Result};
use crate::filter::Filter;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// One map marker's worth of incidents: same place, same year
#[derive(Debug, Clone, PartialEq)]
pub struct MapRow {
    pub region: String,
    pub country: String,
    pub provstate: String,
    pub city: String,
    pub year: i32,
    pub lat: f64,
    pub lon: f64,
    pub kills: u64,
    pub wounds: u64,
}

/// Per-year sums for the trend chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendRow {
    pub region: String,
    pub country: String,
    pub year: i32,
    pub kills: u64,
    /// Sum of attack-type codes. This adds categorical codes together and
    /// is not a count of attacks; kept as the dashboard has always shown it.
    pub attack_metric: u64,
    pub wounds: u64,
}

/// Scalar sums for the pie chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub kills: u64,
    pub wounds: u64,
    pub attack_metric: u64,
}

/// All views derived from one filter
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    pub map: Vec<MapRow>,
    pub trend: Vec<TrendRow>,
    pub totals: Totals,
}

/// Coordinate usable as an ordered map key
#[derive(Debug, Clone, Copy)]
struct Coord(f64);

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Coord {}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

type MapKey<'a> = (&'a str, &'a str, &'a str, &'a str, i32, Coord, Coord);
type TrendKey<'a> = (&'a str, &'a str, i32);

/// Check a record against the full filter
#[inline(always)]
pub fn matches(record: &Incident, filter: &Filter) -> bool {
    record.region == filter.region
        && record.country == filter.country
        && filter.years.contains(record.year)
}

/// Build the map, trend and totals views for a filter.
///
/// Returns [`DashboardError::EmptyResult`] when no record matches.
pub fn aggregate(dataset: &Dataset, filter: &Filter) -> Result<Aggregates> {
    let mut map: BTreeMap<MapKey, (u64, u64)> = BTreeMap::new();
    let mut trend: BTreeMap<TrendKey, Totals> = BTreeMap::new();
    let mut totals = Totals::default();
    let mut matched = 0usize;

    for r in dataset.records().iter().filter(|r| matches(r, filter)) {
        matched += 1;

        let kills = u64::from(r.kills);
        let wounds = u64::from(r.wounds);
        let attack = u64::from(r.attack_type);

        // Unlocated records count everywhere except the map
        if let Some(pos) = r.position {
            let key = (
                r.region.as_str(),
                r.country.as_str(),
                r.provstate.as_str(),
                r.city.as_str(),
                r.year,
                Coord(pos.lat),
                Coord(pos.lon),
            );
            let cell = map.entry(key).or_insert((0, 0));
            cell.0 += kills;
            cell.1 += wounds;
        }

        let year = trend
            .entry((r.region.as_str(), r.country.as_str(), r.year))
            .or_default();
        year.kills += kills;
        year.wounds += wounds;
        year.attack_metric += attack;

        totals.kills += kills;
        totals.wounds += wounds;
        totals.attack_metric += attack;
    }

    if matched == 0 {
        return Err(DashboardError::EmptyResult);
    }

    let map = map
        .into_iter()
        .map(
            |((region, country, provstate, city, year, lat, lon), (kills, wounds))| MapRow {
                region: region.to_string(),
                country: country.to_string(),
                provstate: provstate.to_string(),
                city: city.to_string(),
                year,
                lat: lat.0,
                lon: lon.0,
                kills,
                wounds,
            },
        )
        .collect();

    let trend = trend
        .into_iter()
        .map(|((region, country, year), sums)| TrendRow {
            region: region.to_string(),
            country: country.to_string(),
            year,
            kills: sums.kills,
            attack_metric: sums.attack_metric,
            wounds: sums.wounds,
        })
        .collect();

    Ok(Aggregates { map, trend, totals })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::incidents::{fixture, UNLOCATED_CSV};
    use crate::filter::{FilterController, YearRange};

    fn filter(region: &str, country: &str, from: i32, to: i32) -> Filter {
        Filter {
            region: region.into(),
            country: country.into(),
            years: YearRange::new(from, to).unwrap(),
        }
    }

    #[test]
    fn test_default_selection() {
        let ds = fixture();
        let f = FilterController::new(&ds).unwrap().filter();
        let agg = aggregate(&ds, &f).unwrap();

        // Karachi 2012 has two incidents at the same spot: one marker
        assert_eq!(agg.map.len(), 3);
        let karachi = agg.map.iter().find(|r| r.city == "Karachi").unwrap();
        assert_eq!((karachi.kills, karachi.wounds), (4, 7));

        assert_eq!(
            agg.totals,
            Totals {
                kills: 14,
                wounds: 27,
                attack_metric: 15
            }
        );

        let years: Vec<_> = agg
            .trend
            .iter()
            .map(|t| (t.year, t.kills, t.attack_metric, t.wounds))
            .collect();
        assert_eq!(years, vec![(2012, 4, 5, 7), (2014, 10, 3, 20), (2017, 0, 7, 0)]);
    }

    #[test]
    fn test_rows_respect_filter() {
        let ds = fixture();
        let mut fc = FilterController::new(&ds).unwrap();
        for region in fc.regions().to_vec() {
            fc.set_region(&region).unwrap();
            for country in fc.countries().to_vec() {
                fc.set_country(&country).unwrap();
                for (from, to) in [(1970, 2017), (2010, 2017), (2012, 2014), (1970, 1970)] {
                    fc.set_year_range(from, to).unwrap();
                    let f = fc.filter();
                    let Ok(agg) = aggregate(&ds, &f) else { continue };
                    for row in &agg.map {
                        assert_eq!(row.region, f.region);
                        assert_eq!(row.country, f.country);
                        assert!(f.years.contains(row.year));
                    }
                    for row in &agg.trend {
                        assert_eq!(row.region, f.region);
                        assert_eq!(row.country, f.country);
                        assert!(f.years.contains(row.year));
                    }
                }
            }
        }
    }

    #[test]
    fn test_totals_match_map_view() {
        let ds = fixture();
        for f in [
            filter("South Asia", "Pakistan", 1970, 2017),
            filter("South Asia", "India", 2010, 2017),
            filter("Middle East & North Africa", "Iraq", 2015, 2015),
            filter("Western Europe", "Greece", 1970, 1980),
        ] {
            let agg = aggregate(&ds, &f).unwrap();
            let kills: u64 = agg.map.iter().map(|r| r.kills).sum();
            let wounds: u64 = agg.map.iter().map(|r| r.wounds).sum();
            assert_eq!(agg.totals.kills, kills);
            assert_eq!(agg.totals.wounds, wounds);

            let attack: u64 = agg.trend.iter().map(|r| r.attack_metric).sum();
            assert_eq!(agg.totals.attack_metric, attack);
        }
    }

    #[test]
    fn test_unlocated_rows_count_outside_the_map() {
        let ds = Dataset::from_reader(UNLOCATED_CSV.as_bytes()).unwrap();

        let india = aggregate(&ds, &filter("South Asia", "India", 2010, 2017)).unwrap();
        assert_eq!(india.map.len(), 1);
        assert_eq!(india.totals.kills, 8);
        let years: Vec<_> = india.trend.iter().map(|t| (t.year, t.kills)).collect();
        assert_eq!(years, vec![(2010, 1), (2011, 7)]);

        let maldives = aggregate(&ds, &filter("South Asia", "Maldives", 2010, 2017)).unwrap();
        assert!(maldives.map.is_empty());
        assert_eq!(maldives.totals.wounds, 1);
    }

    #[test]
    fn test_narrowing_years_never_increases_totals() {
        let ds = fixture();
        let wide = aggregate(&ds, &filter("South Asia", "Pakistan", 1970, 2017)).unwrap();
        for (from, to) in [(2009, 2017), (2010, 2017), (2012, 2014), (2014, 2014)] {
            let narrow = aggregate(&ds, &filter("South Asia", "Pakistan", from, to)).unwrap();
            assert!(narrow.totals.kills <= wide.totals.kills);
            assert!(narrow.totals.wounds <= wide.totals.wounds);
            assert!(narrow.totals.attack_metric <= wide.totals.attack_metric);
        }
    }

    #[test]
    fn test_empty_result() {
        let ds = fixture();
        let f = filter("South Asia", "India", 2010, 2015);
        assert!(matches!(aggregate(&ds, &f), Err(DashboardError::EmptyResult)));
    }

    #[test]
    fn test_deterministic() {
        let ds = fixture();
        let f = filter("South Asia", "Pakistan", 1970, 2017);
        let a = aggregate(&ds, &f).unwrap();
        let b = aggregate(&ds, &f).unwrap();
        assert_eq!(a, b);
        assert_eq!(format!("{:?}", a), format!("{:?}", b));
    }

    #[test]
    fn test_map_rows_sorted_by_key() {
        let ds = fixture();
        let agg = aggregate(&ds, &filter("South Asia", "Pakistan", 1970, 2017)).unwrap();
        let cities: Vec<_> = agg.map.iter().map(|r| r.provstate.as_str()).collect();
        assert_eq!(cities, vec!["Balochistan", "Khyber Pakhtunkhwa", "Punjab", "Sindh"]);
    }
}
