use crate::data::Dataset;
use crate::error::Result;
use crate::filter::FilterController;
use crate::location::{LatLon, LocationIndex};

/// Everything a render pass needs: the read-only dataset, the location
/// index built from it, and the current filter selection
pub struct Dashboard {
    dataset: Dataset,
    locations: LocationIndex,
    filter: FilterController,
}

impl Dashboard {
    pub fn new(dataset: Dataset) -> Result<Self> {
        let locations = LocationIndex::build(&dataset);
        let filter = FilterController::new(&dataset)?;
        log::info!(
            "Indexed {} countries across {} regions",
            locations.len(),
            filter.regions().len()
        );
        Ok(Self {
            dataset,
            locations,
            filter,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn locations(&self) -> &LocationIndex {
        &self.locations
    }

    pub fn filter(&self) -> &FilterController {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut FilterController {
        &mut self.filter
    }

    /// Map center for the selected country
    pub fn centroid(&self) -> Result<LatLon> {
        let filter = self.filter.filter();
        self.locations.get(&filter.country)
    }
}
