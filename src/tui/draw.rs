use crate::analysis::alerts::AlertKind;
use crate::analysis::status::{EdgeStatus, PathStatus};
use crate::tui::app::App;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::Color::White;
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Padding, Paragraph, Row, Table};

pub fn draw_app(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length((app.snapshot.paths.len() + 3) as u16),
            Constraint::Min(5),
            Constraint::Length((app.snapshot.alerts.len().max(1) + 2) as u16),
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[3]);

    frame.render_widget(build_header(app), chunks[0]);
    frame.render_widget(build_metrics(app), chunks[1]);
    frame.render_widget(build_path_table(app), chunks[2]);
    frame.render_widget(build_edge_table(app), body[0]);
    frame.render_widget(build_path_detail(app), body[1]);
    frame.render_widget(build_alerts(app), chunks[4]);
}

fn util_style(utilization: f64) -> Style {
    if utilization < 0.8 {
        Style::default().fg(Color::Green)
    } else if utilization <= 1.0 {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Red)
    }
}

fn path_status_style(status: PathStatus) -> Style {
    match status {
        PathStatus::Low => Style::default().add_modifier(Modifier::DIM),
        PathStatus::Normal => Style::default().green(),
        PathStatus::High => Style::default().yellow(),
        PathStatus::Saturated => Style::default().light_red(),
        PathStatus::Blocked => Style::default().red().bold(),
    }
}

fn edge_status_style(status: EdgeStatus) -> Style {
    match status {
        EdgeStatus::Low => Style::default().add_modifier(Modifier::DIM),
        EdgeStatus::Normal => Style::default().green(),
        EdgeStatus::High => Style::default().yellow(),
        EdgeStatus::Overload => Style::default().red().bold(),
        EdgeStatus::Disabled => Style::default().dark_gray(),
    }
}

fn build_header(app: &'_ App) -> Block<'_> {
    Block::new()
        .title(Line::from(vec![
            Span::raw(" Flowgraph ").style(Style::default().bold().cyan()),
            Span::raw("·").style(Style::default().add_modifier(Modifier::DIM)),
            Span::raw(format!(" {} → {} ", app.snapshot.source, app.snapshot.sink))
                .style(Style::default().bold()),
            Span::raw("· q quit, ↑/↓ select path ")
                .style(Style::default().add_modifier(Modifier::DIM)),
        ]))
        .title_alignment(Alignment::Center)
}

fn build_metrics(app: &'_ App) -> Paragraph<'_> {
    let m = &app.snapshot.metrics;
    Paragraph::new(Line::from(vec![
        Span::raw(" Throughput ").style(Style::default().add_modifier(Modifier::DIM)),
        Span::raw(format!("{:.2}", m.total_throughput)).style(Style::default().bold()),
        Span::raw("  Max flow ").style(Style::default().add_modifier(Modifier::DIM)),
        Span::raw(format!("{:.2}", m.theoretical_max_flow)).style(Style::default().bold()),
        Span::raw("  Efficiency ").style(Style::default().add_modifier(Modifier::DIM)),
        Span::raw(format!("{:.0}%", m.network_efficiency * 100.0))
            .style(util_style(m.network_efficiency)),
        Span::raw("  Edges up/down ").style(Style::default().add_modifier(Modifier::DIM)),
        Span::raw(format!("{}/{}", m.operational_edges, m.failed_edges)),
        Span::raw("  Min cut ").style(Style::default().add_modifier(Modifier::DIM)),
        Span::raw(m.min_cut.join(", ")),
    ]))
}

fn build_path_table(app: &'_ App) -> Table<'_> {
    Table::new(
        app.snapshot.paths.iter().enumerate().map(|(i, path)| {
            let row = Row::new(vec![
                Cell::from(path.path_id.clone()),
                Cell::from(path.route.clone()),
                Cell::from(format!("{:>7.2}", path.current_flow)),
                Cell::from(format!("{:>7.2}", path.max_safe_flow)),
                Cell::from(format!("{:>6.2}", path.utilization)).style(util_style(path.utilization)),
                Cell::from(path.bottleneck_edge.clone()),
                Cell::from(path.status.to_string()).style(path_status_style(path.status)),
            ]);
            if i == app.selected() {
                row.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                row
            }
        }),
        [
            Constraint::Length(6),
            Constraint::Length(24),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new([
            Cell::from("Path"),
            Cell::from("Route"),
            Cell::from("   Flow"),
            Cell::from("   Safe"),
            Cell::from("  Util"),
            Cell::from("Limit"),
            Cell::from("Status"),
        ])
        .style(Style::default().bg(Color::DarkGray).fg(White)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(vec![Span::from(" Paths ").style(Style::default().bold())]))
            .padding(Padding::horizontal(1)),
    )
}

fn build_edge_table(app: &'_ App) -> Table<'_> {
    let mut edges = app.snapshot.edges.iter().collect::<Vec<_>>();
    edges.sort_by(|a, b| b.utilization.total_cmp(&a.utilization));

    Table::new(
        edges.into_iter().map(|edge| {
            Row::new(vec![
                Cell::from(edge.edge_id.clone()),
                Cell::from(format!("{} → {}", edge.from, edge.to)),
                Cell::from(format!("{:>6.1}", edge.flow)),
                Cell::from(format!("{:>6.1}", edge.capacity)),
                Cell::from(format!("{:>6.2}", edge.utilization)).style(util_style(edge.utilization)),
                Cell::from(edge.status.to_string()).style(edge_status_style(edge.status)),
            ])
        }),
        [
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new([
            Cell::from("Edge"),
            Cell::from("Link"),
            Cell::from("  Flow"),
            Cell::from("   Cap"),
            Cell::from("  Util"),
            Cell::from("Status"),
        ])
        .style(Style::default().bg(Color::DarkGray).fg(White)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(vec![Span::from(" Edges ").style(Style::default().bold())]))
            .padding(Padding::horizontal(1)),
    )
}

fn build_path_detail(app: &'_ App) -> Paragraph<'_> {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let lines = match app.selected_path() {
        Some(path) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::raw("Available ").style(dim),
                    Span::raw(format!("{:.2}", path.available_capacity)).bold(),
                ]),
                Line::from(vec![
                    Span::raw("Shares edges with ").style(dim),
                    Span::raw(if path.shared_paths.is_empty() {
                        "-".to_string()
                    } else {
                        path.shared_paths.join(", ")
                    }),
                ]),
                Line::from(""),
            ];
            lines.extend(path.edge_details.iter().map(|e| {
                let marker = if e.is_bottleneck { "▶ " } else { "  " };
                Line::from(vec![
                    Span::raw(marker).red(),
                    Span::raw(format!("{:<8}", e.edge_id)),
                    Span::raw(format!("{:>6.1}/{:<6.1}", e.flow, e.capacity))
                        .style(util_style(e.utilization)),
                    Span::raw(if e.disabled { " disabled" } else { "" }).red(),
                ])
            }));
            lines
        }
        None => vec![Line::from("no paths").style(dim)],
    };

    let title = app
        .selected_path()
        .map_or(" Path ".to_string(), |p| format!(" Path {} ", p.path_id));
    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(vec![Span::from(title).style(Style::default().bold())]))
            .padding(Padding::horizontal(1)),
    )
}

fn build_alerts(app: &'_ App) -> Paragraph<'_> {
    let lines = if app.snapshot.alerts.is_empty() {
        vec![Line::from("no alerts").style(Style::default().add_modifier(Modifier::DIM))]
    } else {
        app.snapshot
            .alerts
            .iter()
            .map(|alert| {
                let label = match alert.kind {
                    AlertKind::Overload => Span::raw("OVERLOAD ").red().bold(),
                    AlertKind::Failure => Span::raw("FAILURE  ").light_red(),
                };
                Line::from(vec![label, Span::raw(alert.description.clone())])
            })
            .collect()
    };

    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(vec![Span::from(" Alerts ").style(Style::default().bold())]))
            .padding(Padding::horizontal(1)),
    )
}
