use super::{title, ATTACK_COLOR, DEATH_COLOR, WOUNDED_COLOR};
use crate::aggregate::Totals;
use crate::filter::Filter;
use ratatui::style::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: &'static str,
    pub value: u64,
    pub color: Color,
}

/// Totals split into deaths, wounded and attack metric, always in that order
#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    pub slices: [Slice; 3],
}

impl PieChart {
    pub fn total(&self) -> u64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Fraction of the whole taken by a slice; 0 for an empty pie
    pub fn share(&self, idx: usize) -> f64 {
        let total = self.total();
        match self.slices.get(idx) {
            Some(slice) if total > 0 => slice.value as f64 / total as f64,
            _ => 0.0,
        }
    }
}

pub fn render(totals: &Totals, filter: &Filter) -> PieChart {
    PieChart {
        title: title("Total Casualties", filter),
        slices: [
            Slice {
                label: "Total Death",
                value: totals.kills,
                color: DEATH_COLOR,
            },
            Slice {
                label: "Total Wounded",
                value: totals.wounds,
                color: WOUNDED_COLOR,
            },
            Slice {
                label: "Total Attack",
                value: totals.attack_metric,
                color: ATTACK_COLOR,
            },
        ],
    }
}
