use super::{format_si, title, ATTACK_COLOR, DEATH_COLOR, WOUNDED_COLOR};
use crate::aggregate::TrendRow;
use crate::filter::Filter;
use ratatui::style::Color;

/// A named per-year series
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: &'static str,
    pub color: Color,
    pub values: Vec<u64>,
}

impl Series {
    /// SI-formatted value labels, one per year
    pub fn labels(&self) -> Vec<String> {
        self.values.iter().map(|&v| format_si(v)).collect()
    }
}

/// Deaths as a line over stacked attack/wounded bars, one shared year axis
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChart {
    pub title: String,
    pub years: Vec<i32>,
    pub line: Series,
    /// Bottom to top
    pub stacked: [Series; 2],
}

impl TrendChart {
    /// Height of the stacked bar at a year index
    pub fn stack_height(&self, idx: usize) -> u64 {
        self.stacked
            .iter()
            .map(|s| s.values.get(idx).copied().unwrap_or(0))
            .sum()
    }

    /// Largest value the y axis has to show
    pub fn y_max(&self) -> u64 {
        let line_max = self.line.values.iter().copied().max().unwrap_or(0);
        let bar_max = (0..self.years.len())
            .map(|i| self.stack_height(i))
            .max()
            .unwrap_or(0);
        line_max.max(bar_max)
    }
}

pub fn render(rows: &[TrendRow], filter: &Filter) -> TrendChart {
    TrendChart {
        title: title("Attack and Death", filter),
        years: rows.iter().map(|r| r.year).collect(),
        line: Series {
            name: "Death",
            color: DEATH_COLOR,
            values: rows.iter().map(|r| r.kills).collect(),
        },
        stacked: [
            Series {
                name: "Attack",
                color: ATTACK_COLOR,
                values: rows.iter().map(|r| r.attack_metric).collect(),
            },
            Series {
                name: "Wounded",
                color: WOUNDED_COLOR,
                values: rows.iter().map(|r| r.wounds).collect(),
            },
        ],
    }
}
