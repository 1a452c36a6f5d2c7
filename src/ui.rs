use crate::app::{App, Focus};
use crate::braille::BrailleCanvas;
use crate::chart::{format_si, PieChart, TrendChart};
use crate::map::MapLayers;
use crate::view::{self, Body, Charts, Sidebar};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Block, Borders, Paragraph, Widget, Wrap,
    },
    Frame,
};
use std::f64::consts::TAU;

const BACKGROUND: Color = Color::Rgb(0x01, 0x09, 0x15);
const SIDEBAR_WIDTH: u16 = 32;

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(BACKGROUND)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Heading
            Constraint::Min(10),   // Sidebar + charts
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_heading(frame, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(chunks[1]);

    render_sidebar(frame, &app.page.sidebar, app.focus, body[0]);

    match &app.page.body {
        Body::Charts(charts) => render_charts(frame, app, charts, body[1]),
        Body::NoData(message) => render_warning(frame, message, body[1]),
    }

    render_status_bar(frame, app, chunks[2]);
}

fn render_heading(frame: &mut Frame, area: Rect) {
    let heading = Paragraph::new(vec![
        Line::from(Span::styled(
            view::HEADING,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(view::SUBTITLE, Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(heading, area);
}

fn render_sidebar(frame: &mut Frame, sidebar: &Sidebar, focus: Focus, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Filters ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50), // Regions
            Constraint::Min(4),         // Countries
            Constraint::Length(5),      // Years
        ])
        .split(inner);

    render_choices(
        frame,
        "Select Region",
        &sidebar.regions,
        sidebar.region_idx,
        focus == Focus::Region,
        chunks[0],
    );
    render_choices(
        frame,
        "Select Country",
        &sidebar.countries,
        sidebar.country_idx,
        focus == Focus::Country,
        chunks[1],
    );
    render_years(frame, sidebar, focus, chunks[2]);
}

fn control_block(title: &str, focused: bool) -> Block<'_> {
    let color = if focused { Color::Yellow } else { Color::DarkGray };
    Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(color))
        .title(Span::styled(title, Style::default().fg(color)))
}

/// Selector list, scrolled so the selection stays visible
fn render_choices(
    frame: &mut Frame,
    title: &str,
    choices: &[String],
    selected: usize,
    focused: bool,
    area: Rect,
) {
    let block = control_block(title, focused);
    let visible = block.inner(area).height as usize;
    let first = selected.saturating_sub(visible.saturating_sub(1) / 2);
    let first = first.min(choices.len().saturating_sub(visible));

    let lines: Vec<Line> = choices
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .map(|(i, choice)| {
            if i == selected {
                let style = Style::default()
                    .fg(Color::Black)
                    .bg(if focused { Color::Yellow } else { Color::Gray });
                Line::from(Span::styled(format!("▸ {}", choice), style))
            } else {
                Line::from(Span::styled(format!("  {}", choice), Style::default().fg(Color::White)))
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Range slider: the track spans the year bounds, handles mark the selection
fn render_years(frame: &mut Frame, sidebar: &Sidebar, focus: Focus, area: Rect) {
    let focused = matches!(focus, Focus::From | Focus::To);
    let block = control_block("Select Years", focused);
    let width = block.inner(area).width.saturating_sub(2).max(2) as usize;

    let (lo, hi) = sidebar.year_bounds;
    let span = (hi - lo).max(1) as f64;
    let pos = |year: i32| (((year - lo) as f64 / span) * (width - 1) as f64).round() as usize;
    let (from_pos, to_pos) = (pos(sidebar.years.from), pos(sidebar.years.to));

    let track: Vec<Span> = (0..width)
        .map(|i| {
            if i == from_pos || i == to_pos {
                Span::styled("●", Style::default().fg(Color::Yellow))
            } else if i > from_pos && i < to_pos {
                Span::styled("━", Style::default().fg(Color::Red))
            } else {
                Span::styled("─", Style::default().fg(Color::DarkGray))
            }
        })
        .collect();

    let handle = |label: &'static str, year: i32, active: bool| {
        let style = if active {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        Span::styled(format!("{} {}", label, year), style)
    };

    let lines = vec![
        Line::from(vec![
            handle("from", sidebar.years.from, focus == Focus::From),
            Span::raw("  "),
            handle("to", sidebar.years.to, focus == Focus::To),
        ]),
        Line::from(track),
        Line::from(vec![
            Span::styled(lo.to_string(), Style::default().fg(Color::DarkGray)),
            Span::raw(" ".repeat(width.saturating_sub(8))),
            Span::styled(hi.to_string(), Style::default().fg(Color::DarkGray)),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_warning(frame: &mut Frame, message: &str, area: Rect) {
    let warning = Paragraph::new(Line::from(Span::styled(
        format!("⚠ {}", message),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    )
    .wrap(Wrap { trim: true });

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    frame.render_widget(warning, rows[0]);
}

fn render_charts(frame: &mut Frame, app: &App, charts: &Charts, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45), // Map
            Constraint::Percentage(33), // Trend / bars
            Constraint::Min(6),         // Pie
        ])
        .split(area);

    render_map(frame, app, charts, chunks[0]);
    render_trend(frame, &charts.trend, chunks[1]);
    render_pie(frame, &charts.pie, chunks[2]);
}

fn titled_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
}

fn render_map(frame: &mut Frame, app: &App, charts: &Charts, area: Rect) {
    let block = titled_block("Map of Terrorism Incidents".to_string()).title_bottom(Line::from(
        Span::styled(
            format!(" {} locations ", charts.map.markers.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layers = app
        .basemap
        .render(&charts.map, inner.width as usize, inner.height as usize);
    frame.render_widget(MapWidget { layers }, inner);
}

/// Braille basemap with incident markers overlaid
struct MapWidget {
    layers: MapLayers,
}

impl MapWidget {
    /// Render a braille canvas layer with a specific color
    fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                if let Some(ch) = canvas.glyph(col as usize, row as usize) {
                    buf[(area.x + col, area.y + row)].set_char(ch).set_fg(color);
                }
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Self::render_layer(&self.layers.coastlines, Color::Cyan, area, buf);
        Self::render_layer(&self.layers.borders, Color::DarkGray, area, buf);

        if let Some((cx, cy)) = self.layers.center {
            if cx < area.width && cy < area.height {
                buf[(area.x + cx, area.y + cy)].set_char('+').set_fg(Color::White);
            }
        }

        for marker in &self.layers.markers {
            if marker.col < area.width && marker.row < area.height {
                buf[(area.x + marker.col, area.y + marker.row)]
                    .set_char(marker.glyph)
                    .set_fg(marker.color);
            }
        }
    }
}

fn legend_span(symbol: &str, name: &str, color: Color) -> [Span<'static>; 2] {
    [
        Span::styled(format!(" {}", symbol), Style::default().fg(color)),
        Span::styled(format!(" {} ", name), Style::default().fg(Color::White)),
    ]
}

fn render_trend(frame: &mut Frame, trend: &TrendChart, area: Rect) {
    let mut legend = Vec::new();
    legend.extend(legend_span("━", trend.line.name, trend.line.color));
    for series in &trend.stacked {
        legend.extend(legend_span("█", series.name, series.color));
    }
    let block = titled_block(trend.title.clone()).title_bottom(Line::from(legend));

    let (Some(&first), Some(&last)) = (trend.years.first(), trend.years.last()) else {
        frame.render_widget(block, area);
        return;
    };

    let y_max = trend.y_max().max(1) as f64;
    let label_y = -y_max * 0.12;
    let bar_labels: Vec<Vec<String>> = trend.stacked.iter().map(|s| s.labels()).collect();

    let canvas = Canvas::default()
        .block(block)
        .background_color(BACKGROUND)
        .marker(Marker::Braille)
        .x_bounds([first as f64 - 0.6, last as f64 + 0.6])
        .y_bounds([label_y * 1.2, y_max * 1.15])
        .paint(move |ctx| {
            // Stacked bars, bottom series first
            for (i, &year) in trend.years.iter().enumerate() {
                let x = year as f64;
                let mut base = 0.0;
                for series in &trend.stacked {
                    let top = base + series.values[i] as f64;
                    if top > base {
                        for step in 0..=8 {
                            let bx = x - 0.3 + step as f64 * 0.075;
                            ctx.draw(&CanvasLine {
                                x1: bx,
                                y1: base,
                                x2: bx,
                                y2: top,
                                color: series.color,
                            });
                        }
                    }
                    base = top;
                }
            }

            ctx.layer();

            // Death line over the bars
            let points: Vec<(f64, f64)> = trend
                .years
                .iter()
                .zip(&trend.line.values)
                .map(|(&year, &v)| (year as f64, v as f64))
                .collect();
            for pair in points.windows(2) {
                ctx.draw(&CanvasLine {
                    x1: pair[0].0,
                    y1: pair[0].1,
                    x2: pair[1].0,
                    y2: pair[1].1,
                    color: trend.line.color,
                });
            }
            ctx.draw(&Points {
                coords: &points,
                color: Color::White,
            });

            for (i, &year) in trend.years.iter().enumerate() {
                let x = year as f64;
                ctx.print(
                    x - 0.3,
                    label_y,
                    Span::styled(year.to_string(), Style::default().fg(Color::White)),
                );
                let total = trend.stack_height(i);
                if total > 0 {
                    let label = format!("{}/{}", bar_labels[0][i], bar_labels[1][i]);
                    ctx.print(
                        x - 0.3,
                        total as f64 + y_max * 0.08,
                        Span::styled(label, Style::default().fg(Color::Gray)),
                    );
                }
            }

            ctx.print(
                first as f64 - 0.6,
                y_max,
                Span::styled(format_si(y_max as u64), Style::default().fg(Color::DarkGray)),
            );
        });

    frame.render_widget(canvas, area);
}

/// Wedge fill points for each slice, in slice order
fn pie_points(pie: &PieChart, radial_steps: usize) -> Vec<Vec<(f64, f64)>> {
    let total = pie.total();
    let mut start = TAU / 4.0;
    let mut out = Vec::with_capacity(pie.slices.len());

    for idx in 0..pie.slices.len() {
        let sweep = pie.share(idx) * TAU;
        let mut coords = Vec::new();
        if total > 0 && sweep > 0.0 {
            for r_step in 1..=radial_steps {
                let r = r_step as f64 / radial_steps as f64;
                let arc_steps = ((sweep * r * radial_steps as f64 * 2.0).ceil() as usize).max(1);
                for a_step in 0..=arc_steps {
                    // Clockwise from 12 o'clock
                    let angle = start - sweep * a_step as f64 / arc_steps as f64;
                    coords.push((r * angle.cos(), r * angle.sin()));
                }
            }
        }
        start -= sweep;
        out.push(coords);
    }
    out
}

fn render_pie(frame: &mut Frame, pie: &PieChart, area: Rect) {
    let block = titled_block(pie.title.clone());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(inner.height * 2 + 2), Constraint::Min(10)])
        .split(inner);

    // Braille dots are roughly square; widen x bounds to match the area
    let dots_w = (chunks[0].width as f64 * 2.0).max(1.0);
    let dots_h = (chunks[0].height as f64 * 4.0).max(1.0);
    let aspect = dots_w / dots_h;
    let wedges = pie_points(pie, (dots_h as usize / 2).max(4));

    let canvas = Canvas::default()
        .background_color(BACKGROUND)
        .marker(Marker::Braille)
        .x_bounds([-1.05 * aspect, 1.05 * aspect])
        .y_bounds([-1.05, 1.05])
        .paint(move |ctx| {
            for (slice, coords) in pie.slices.iter().zip(&wedges) {
                ctx.draw(&Points {
                    coords,
                    color: slice.color,
                });
                ctx.layer();
            }
        });
    frame.render_widget(canvas, chunks[0]);

    let mut lines = Vec::new();
    for (idx, slice) in pie.slices.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled("■ ", Style::default().fg(slice.color)),
            Span::styled(
                format!("{:<14}", slice.label),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!("{:>8}", slice.value),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {:5.1}%", pie.share(idx) * 100.0),
                Style::default().fg(Color::Gray),
            ),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), chunks[1]);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let focus = match app.focus {
        Focus::Region => "region",
        Focus::Country => "country",
        Focus::From => "from-year",
        Focus::To => "to-year",
    };

    let mut spans = vec![
        Span::styled(" Focus: ", Style::default().fg(Color::DarkGray)),
        Span::styled(focus, Style::default().fg(Color::Yellow)),
        Span::styled(
            " | Tab:focus ↑↓/jk/←→/hl:change r:reset q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(notice) = &app.notice {
        spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(notice.clone(), Style::default().fg(Color::Red)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Totals;
    use crate::chart::pie;
    use crate::data::incidents::fixture;
    use crate::dashboard::Dashboard;
    use crate::filter::{Filter, YearRange};
    use crate::map::BaseMap;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 48)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        App::new(Dashboard::new(fixture()).unwrap(), BaseMap::new()).unwrap()
    }

    #[test]
    fn test_renders_all_three_charts() {
        let text = screen(&app());
        assert!(text.contains(view::HEADING));
        assert!(text.contains("Map of Terrorism Incidents"));
        assert!(text.contains("Attack and Death: Pakistan"));
        assert!(text.contains("Total Casualties: Pakistan"));
        assert!(text.contains("Total Wounded"));
        assert!(!text.contains(view::NO_DATA));
    }

    #[test]
    fn test_no_data_hides_charts() {
        let mut app = app();
        app.focus = Focus::Country;
        app.adjust(1);
        app.focus = Focus::To;
        app.adjust(-2);

        let text = screen(&app);
        assert!(text.contains(view::NO_DATA));
        assert!(!text.contains("Map of Terrorism Incidents"));
        assert!(!text.contains("Total Casualties"));
        assert!(text.contains("Select Region"));
    }

    #[test]
    fn test_pie_wedges_follow_shares() {
        let filter = Filter {
            region: "South Asia".into(),
            country: "Pakistan".into(),
            years: YearRange { from: 2010, to: 2017 },
        };
        let pie = pie::render(
            &Totals {
                kills: 0,
                wounds: 3,
                attack_metric: 1,
            },
            &filter,
        );
        let wedges = pie_points(&pie, 10);
        assert!(wedges[0].is_empty());
        assert!(wedges[1].len() > wedges[2].len());
        assert!(wedges.iter().flatten().all(|(x, y)| x * x + y * y <= 1.0 + 1e-9));
    }
}
