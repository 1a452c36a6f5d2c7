use crate::dashboard::Dashboard;
use crate::error::{Result, SelectionError};
use crate::filter::{MAX_YEAR, MIN_YEAR};
use crate::map::BaseMap;
use crate::view::{self, Page};

/// Sidebar control receiving keyboard input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Region,
    Country,
    From,
    To,
}

impl Focus {
    const ORDER: [Focus; 4] = [Focus::Region, Focus::Country, Focus::From, Focus::To];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|&f| f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Application state
pub struct App {
    pub dashboard: Dashboard,
    pub basemap: BaseMap,
    /// Page for the filter revision it records
    pub page: Page,
    pub focus: Focus,
    /// Last rejected selection or failed render pass
    pub notice: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(dashboard: Dashboard, basemap: BaseMap) -> Result<Self> {
        let page = view::compose(&dashboard)?;
        Ok(Self {
            dashboard,
            basemap,
            page,
            focus: Focus::Region,
            notice: None,
            should_quit: false,
        })
    }

    /// Rebuild the page if the filter changed since it was composed.
    /// A failed pass keeps the previous page and reports the error.
    pub fn refresh(&mut self) {
        let revision = self.dashboard.filter().revision();
        if revision == self.page.revision {
            return;
        }
        match view::compose(&self.dashboard) {
            Ok(page) => {
                log::debug!("Recomputed page for revision {}", revision);
                self.page = page;
            }
            Err(e) => {
                log::error!("Render pass failed: {}", e);
                self.notice = Some(e.to_string());
            }
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Move the focused control by `delta` steps (items or years).
    /// Steps stop at the list ends, the year bounds and the other handle.
    pub fn adjust(&mut self, delta: i32) {
        let filter = self.dashboard.filter_mut();
        let result = match self.focus {
            Focus::Region => {
                let target = step_index(filter.region_index(), delta, filter.regions().len());
                if target == filter.region_index() {
                    return;
                }
                filter.select_region_at(target)
            }
            Focus::Country => {
                let target = step_index(filter.country_index(), delta, filter.countries().len());
                if target == filter.country_index() {
                    return;
                }
                filter.select_country_at(target)
            }
            Focus::From => {
                let years = filter.years();
                let from = (years.from + delta).clamp(MIN_YEAR, years.to);
                if from == years.from {
                    return;
                }
                filter.set_year_range(from, years.to)
            }
            Focus::To => {
                let years = filter.years();
                let to = (years.to + delta).clamp(years.from, MAX_YEAR);
                if to == years.to {
                    return;
                }
                filter.set_year_range(years.from, to)
            }
        };
        self.apply(result);
    }

    /// Back to the startup selection
    pub fn reset(&mut self) {
        self.dashboard.filter_mut().reset();
        self.apply(Ok(()));
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    fn apply(&mut self, result: std::result::Result<(), SelectionError>) {
        match result {
            Ok(()) => {
                self.notice = None;
                self.refresh();
            }
            Err(e) => {
                log::debug!("Rejected selection: {}", e);
                self.notice = Some(e.to_string());
            }
        }
    }
}

/// Clamp-step an index within `len` items
fn step_index(current: usize, delta: i32, len: usize) -> usize {
    let max = len.saturating_sub(1) as i64;
    (current as i64 + delta as i64).clamp(0, max) as usize
}
