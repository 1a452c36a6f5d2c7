use crate::data::incidents::{FIRST_YEAR, LAST_YEAR};
use crate::data::Dataset;
use crate::error::{LoadError, Result, SelectionError};
use std::collections::HashMap;

/// Lowest selectable year
pub const MIN_YEAR: i32 = FIRST_YEAR;
/// Highest selectable year
pub const MAX_YEAR: i32 = LAST_YEAR;
/// Year range selected at startup
pub const DEFAULT_YEARS: YearRange = YearRange { from: 2010, to: 2017 };
/// Region selected at startup, by position in the dataset's region order
pub const DEFAULT_REGION_INDEX: usize = 4;

/// Inclusive year range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub from: i32,
    pub to: i32,
}

impl YearRange {
    /// Validated constructor
    pub fn new(from: i32, to: i32) -> std::result::Result<Self, SelectionError> {
        if from > to {
            return Err(SelectionError::InvertedYears { from, to });
        }
        if from < MIN_YEAR || to > MAX_YEAR {
            return Err(SelectionError::YearOutOfBounds {
                from,
                to,
                min: MIN_YEAR,
                max: MAX_YEAR,
            });
        }
        Ok(Self { from, to })
    }

    #[inline(always)]
    pub fn contains(&self, year: i32) -> bool {
        self.from <= year && year <= self.to
    }
}

/// The (region, country, year-range) triple narrowing the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub region: String,
    pub country: String,
    pub years: YearRange,
}

/// Current filter selection plus the choices it may take.
///
/// Every successful mutation bumps [`FilterController::revision`];
/// anything computed for an older revision must be rebuilt. Failed
/// mutations leave the selection untouched.
pub struct FilterController {
    regions: Vec<String>,
    countries_by_region: HashMap<String, Vec<String>>,
    region_idx: usize,
    country_idx: usize,
    years: YearRange,
    revision: u64,
}

impl FilterController {
    pub fn new(dataset: &Dataset) -> Result<Self> {
        let regions = dataset.regions();
        if regions.is_empty() {
            return Err(LoadError::Empty.into());
        }

        let countries_by_region = regions
            .iter()
            .map(|r| (r.clone(), dataset.countries_in(r)))
            .collect();

        Ok(Self {
            region_idx: DEFAULT_REGION_INDEX.min(regions.len() - 1),
            country_idx: 0,
            years: DEFAULT_YEARS,
            regions,
            countries_by_region,
            revision: 0,
        })
    }

    /// Snapshot of the current selection
    pub fn filter(&self) -> Filter {
        Filter {
            region: self.regions[self.region_idx].clone(),
            country: self.countries()[self.country_idx].clone(),
            years: self.years,
        }
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Countries of the currently selected region
    pub fn countries(&self) -> &[String] {
        self.countries_by_region
            .get(&self.regions[self.region_idx])
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn region_index(&self) -> usize {
        self.region_idx
    }

    pub fn country_index(&self) -> usize {
        self.country_idx
    }

    pub fn years(&self) -> YearRange {
        self.years
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Select a region; the country resets to the region's first one
    pub fn set_region(&mut self, region: &str) -> std::result::Result<(), SelectionError> {
        let idx = self
            .regions
            .iter()
            .position(|r| r == region)
            .ok_or_else(|| SelectionError::UnknownRegion(region.to_string()))?;
        self.select_region_at(idx)
    }

    pub fn set_country(&mut self, country: &str) -> std::result::Result<(), SelectionError> {
        let idx = self
            .countries()
            .iter()
            .position(|c| c == country)
            .ok_or_else(|| SelectionError::CountryNotInRegion {
                country: country.to_string(),
                region: self.regions[self.region_idx].clone(),
            })?;
        self.select_country_at(idx)
    }

    pub fn set_year_range(&mut self, from: i32, to: i32) -> std::result::Result<(), SelectionError> {
        self.years = YearRange::new(from, to)?;
        self.bump();
        Ok(())
    }

    pub fn select_region_at(&mut self, idx: usize) -> std::result::Result<(), SelectionError> {
        if idx >= self.regions.len() {
            return Err(SelectionError::NoSuchChoice(idx));
        }
        self.region_idx = idx;
        self.country_idx = 0;
        self.bump();
        Ok(())
    }

    pub fn select_country_at(&mut self, idx: usize) -> std::result::Result<(), SelectionError> {
        if idx >= self.countries().len() {
            return Err(SelectionError::NoSuchChoice(idx));
        }
        self.country_idx = idx;
        self.bump();
        Ok(())
    }

    /// Back to the startup selection
    pub fn reset(&mut self) {
        self.region_idx = DEFAULT_REGION_INDEX.min(self.regions.len() - 1);
        self.country_idx = 0;
        self.years = DEFAULT_YEARS;
        self.bump();
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::incidents::fixture;

    fn controller() -> FilterController {
        FilterController::new(&fixture()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let fc = controller();
        let f = fc.filter();
        assert_eq!(f.region, "South Asia");
        assert_eq!(f.country, "Pakistan");
        assert_eq!(f.years, YearRange { from: 2010, to: 2017 });
        assert_eq!(fc.revision(), 0);
    }

    #[test]
    fn test_default_region_clamped_for_small_datasets() {
        let ds = Dataset::from_reader(
            "region_txt,country_txt,provstate,city,iyear,latitude,longitude,nkill,nwound,attacktype1\n\
             Western Europe,France,Paris,Paris,2015,48.85,2.35,1,1,2\n"
                .as_bytes(),
        )
        .unwrap();
        let fc = FilterController::new(&ds).unwrap();
        assert_eq!(fc.filter().region, "Western Europe");
    }

    #[test]
    fn test_every_region_has_countries() {
        let mut fc = controller();
        let regions = fc.regions().to_vec();
        for region in &regions {
            fc.set_region(region).unwrap();
            assert!(!fc.countries().is_empty());
            let f = fc.filter();
            assert_eq!(&f.region, region);
            assert!(fc.countries().contains(&f.country));
            assert_eq!(fc.country_index(), 0);
        }
    }

    #[test]
    fn test_set_region_resets_country() {
        let mut fc = controller();
        fc.set_country("India").unwrap();
        fc.set_region("Middle East & North Africa").unwrap();
        fc.set_region("South Asia").unwrap();
        assert_eq!(fc.filter().country, "Pakistan");
    }

    #[test]
    fn test_unknown_region_rejected() {
        let mut fc = controller();
        let before = fc.revision();
        assert_eq!(
            fc.set_region("Atlantis"),
            Err(SelectionError::UnknownRegion("Atlantis".into()))
        );
        assert_eq!(fc.revision(), before);
        assert_eq!(fc.filter().region, "South Asia");
    }

    #[test]
    fn test_country_must_belong_to_region() {
        let mut fc = controller();
        assert!(matches!(
            fc.set_country("Iraq"),
            Err(SelectionError::CountryNotInRegion { .. })
        ));
        fc.set_country("Afghanistan").unwrap();
        assert_eq!(fc.filter().country, "Afghanistan");
    }

    #[test]
    fn test_inverted_years_rejected() {
        let mut fc = controller();
        let before = fc.revision();
        assert_eq!(
            fc.set_year_range(2015, 2012),
            Err(SelectionError::InvertedYears { from: 2015, to: 2012 })
        );
        assert_eq!(fc.years(), DEFAULT_YEARS);
        assert_eq!(fc.revision(), before);
    }

    #[test]
    fn test_years_out_of_bounds_rejected() {
        let mut fc = controller();
        assert!(matches!(
            fc.set_year_range(1969, 2000),
            Err(SelectionError::YearOutOfBounds { .. })
        ));
        assert!(matches!(
            fc.set_year_range(2000, 2018),
            Err(SelectionError::YearOutOfBounds { .. })
        ));
        fc.set_year_range(1970, 2017).unwrap();
        fc.set_year_range(1999, 1999).unwrap();
        assert_eq!(fc.years(), YearRange { from: 1999, to: 1999 });
    }

    #[test]
    fn test_mutations_bump_revision() {
        let mut fc = controller();
        fc.set_year_range(2011, 2016).unwrap();
        fc.set_country("India").unwrap();
        fc.set_region("North America").unwrap();
        assert_eq!(fc.revision(), 3);
        fc.reset();
        assert_eq!(fc.revision(), 4);
        assert_eq!(fc.filter().country, "Pakistan");
    }

    #[test]
    fn test_select_at_bounds() {
        let mut fc = controller();
        assert_eq!(fc.select_country_at(3), Err(SelectionError::NoSuchChoice(3)));
        fc.select_country_at(2).unwrap();
        assert_eq!(fc.filter().country, "Afghanistan");
        assert_eq!(fc.select_region_at(6), Err(SelectionError::NoSuchChoice(6)));
    }
}
