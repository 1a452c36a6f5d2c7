//! Chart descriptions built from aggregated views.
//!
//! Renderers here are pure: they take already-aggregated rows and decide
//! what to draw (series, colors, sizes, titles). Drawing to the terminal
//! happens in `ui`.

pub mod map;
pub mod pie;
pub mod trend;

use crate::filter::Filter;
use ratatui::style::Color;

pub use map::{MapChart, Marker, MAP_ZOOM};
pub use pie::{PieChart, Slice};
pub use trend::{Series, TrendChart};

/// Deaths: magenta
pub const DEATH_COLOR: Color = Color::Rgb(0xFF, 0x00, 0xFF);
/// Wounded: dark crimson
pub const WOUNDED_COLOR: Color = Color::Rgb(0x9C, 0x0C, 0x38);
/// Attack metric: orange
pub const ATTACK_COLOR: Color = Color::Rgb(0xFF, 0xA5, 0x00);

/// "<prefix>: <country>  <from> - <to>"
pub fn title(prefix: &str, filter: &Filter) -> String {
    format!(
        "{}: {}  {} - {}",
        prefix, filter.country, filter.years.from, filter.years.to
    )
}

/// Two significant digits with an SI suffix: 4 -> "4.0", 1234 -> "1.2k"
pub fn format_si(value: u64) -> String {
    const PREFIXES: [&str; 7] = ["", "k", "M", "G", "T", "P", "E"];

    if value == 0 {
        return "0".to_string();
    }

    let digits = decimal_digits(value);
    let rounded = if digits > 2 {
        let p = 10u64.pow(digits - 2);
        (value.saturating_add(p / 2) / p) * p
    } else {
        value
    };

    let digits = decimal_digits(rounded);
    let group = (digits - 1) / 3;
    let int_digits = digits - group * 3;
    let scaled = rounded as f64 / 1000f64.powi(group as i32);
    let decimals = 2u32.saturating_sub(int_digits) as usize;

    format!("{:.*}{}", decimals, scaled, PREFIXES[group as usize])
}

#[inline(always)]
fn decimal_digits(value: u64) -> u32 {
    value.checked_ilog10().map_or(1, |d| d + 1)
}
