//! Page model: what the dashboard shows for the current selection.

use crate::aggregate::aggregate;
use crate::chart::{self, MapChart, PieChart, TrendChart};
use crate::dashboard::Dashboard;
use crate::error::{DashboardError, Result};
use crate::filter::{Filter, YearRange, MAX_YEAR, MIN_YEAR};

pub const HEADING: &str = "Global Terrorism Database (1970 - 2017)";
pub const SUBTITLE: &str = "Visualizing terrorism incidents around the world.";
pub const NO_DATA: &str = "No data found for the selected filters.";

/// Sidebar controls and their current values
#[derive(Debug, Clone, PartialEq)]
pub struct Sidebar {
    pub regions: Vec<String>,
    pub region_idx: usize,
    pub countries: Vec<String>,
    pub country_idx: usize,
    pub years: YearRange,
    pub year_bounds: (i32, i32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Charts {
    pub map: MapChart,
    pub trend: TrendChart,
    pub pie: PieChart,
}

/// Main panel: either all three charts or a single notice
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Charts(Box<Charts>),
    NoData(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub filter: Filter,
    /// Filter revision this page was built for
    pub revision: u64,
    pub sidebar: Sidebar,
    pub body: Body,
}

impl Page {
    pub fn charts(&self) -> Option<&Charts> {
        match &self.body {
            Body::Charts(charts) => Some(charts),
            Body::NoData(_) => None,
        }
    }
}

/// Aggregate and chart the current selection.
///
/// An empty selection, or a country with no located incident to center
/// the map on, becomes a [`Body::NoData`] page; any other failure aborts
/// the pass.
pub fn compose(dashboard: &Dashboard) -> Result<Page> {
    let controller = dashboard.filter();
    let filter = controller.filter();

    let sidebar = Sidebar {
        regions: controller.regions().to_vec(),
        region_idx: controller.region_index(),
        countries: controller.countries().to_vec(),
        country_idx: controller.country_index(),
        years: controller.years(),
        year_bounds: (MIN_YEAR, MAX_YEAR),
    };

    let charts = aggregate(dashboard.dataset(), &filter).and_then(|agg| {
        let center = dashboard.centroid()?;
        Ok(Charts {
            map: chart::map::render(&agg.map, center),
            trend: chart::trend::render(&agg.trend, &filter),
            pie: chart::pie::render(&agg.totals, &filter),
        })
    });

    let body = match charts {
        Ok(charts) => Body::Charts(Box::new(charts)),
        Err(DashboardError::EmptyResult) => Body::NoData(NO_DATA),
        Err(DashboardError::NotFound(country)) => {
            log::warn!("No located incident for {}, nothing to map", country);
            Body::NoData(NO_DATA)
        }
        Err(e) => return Err(e),
    };

    Ok(Page {
        revision: controller.revision(),
        filter,
        sidebar,
        body,
    })
}
