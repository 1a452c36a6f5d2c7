//! Terminal dashboard over the Global Terrorism Database: a region, country
//! and year-range filter driving an incident map, a yearly trend chart and a
//! casualty breakdown.

pub mod aggregate;
pub mod app;
pub mod braille;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod filter;
pub mod location;
pub mod map;
pub mod ui;
pub mod view;
