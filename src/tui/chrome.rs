// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Draws the visible part of the grid; one glyph marks each cell's top-left corner.
struct GridView<'a> {
    editor: &'a Editor,
    overlay: &'a PathOverlay,
    viewport: Viewport,
    theme: &'a TuiTheme,
}

impl Widget for GridView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let grid = self.editor.grid();
        let points = self.editor.points();
        for y in 0..area.height {
            for x in 0..area.width {
                let Some(pos) = self.viewport.cell_at(x, y) else {
                    continue;
                };
                let mark = cell_mark(grid, points, self.overlay, pos);
                let glyph =
                    if self.viewport.cell_origin(pos) == Some((x, y)) { mark.glyph() } else { ' ' };
                buf.get_mut(area.x + x, area.y + y)
                    .set_char(glyph)
                    .set_style(self.theme.cell_style(mark));
            }
        }
    }
}

fn mode_color(mode: EditMode) -> Color {
    match mode {
        EditMode::None => Color::Gray,
        EditMode::SetStart => Color::Green,
        EditMode::SetEnd => Color::Red,
        EditMode::SetPickup => Color::Blue,
        EditMode::PaintObstacle => Color::Yellow,
        EditMode::PaintClear => Color::Cyan,
    }
}

fn speed_label(speed: RenderSpeed) -> &'static str {
    match speed {
        RenderSpeed::Instant => "instant",
        RenderSpeed::Animated => "animated",
    }
}

fn grid_title(app: &App) -> String {
    let grid = app.editor.grid();
    format!(
        " {}x{} | {} | {:.0}% ",
        grid.rows(),
        grid.columns(),
        app.editor.mode(),
        app.layout.zoom() * 100.0
    )
}

fn format_cell(pos: Option<CellPos>) -> String {
    pos.map_or_else(|| "-".to_owned(), |pos| pos.to_string())
}

fn sidebar_lines(app: &App) -> Vec<Line<'static>> {
    let label = Style::default().fg(FOOTER_LABEL_COLOR);
    let row = |name: &str, value: String| {
        Line::from(vec![Span::styled(format!("{name:<10}"), label), Span::raw(value)])
    };

    let editor = &app.editor;
    let grid = editor.grid();
    let stats = editor.stats();
    let extent = grid.extent();
    let (cell_w, cell_l) = crate::model::CoordinateMapper::for_grid(grid).cell_size_real();
    let settings = app.layout.settings();

    let mut lines = vec![
        row("Mode", editor.mode().to_string()),
        row("Grid", format!("{} x {}", stats.rows, stats.columns)),
        row("Area", format!("{:.1} x {:.1} m", extent.width_m(), extent.length_m())),
        row("Cell", format!("{cell_w:.2} x {cell_l:.2} m")),
        row(
            "Stored",
            match (editor.grid_id(), stats.dirty) {
                (Some(id), false) => truncate_with_ellipsis(id, 20),
                (Some(id), true) => format!("{} *", truncate_with_ellipsis(id, 18)),
                (None, _) => "unsaved".to_owned(),
            },
        ),
        row("Obstacles", stats.obstacles.to_string()),
        row("Walkable", stats.walkable.to_string()),
        Line::from(""),
        row("Start", format_cell(editor.points().start())),
        row("End", format_cell(editor.points().end())),
        row("Pickups", format!("{}/{}", stats.pickups, editor.config().max_pickup_points)),
    ];

    lines.push(Line::from(""));
    match editor.path() {
        Some(path) => {
            lines.push(row("Path", format!("{} cells", stats.path_cells)));
            lines.push(row("Distance", format!("{:.1} m", stats.path_distance_m)));
            let metrics = path.metrics();
            if let Some(algorithm) = metrics.algorithm_used.as_deref() {
                lines.push(row("Algorithm", truncate_with_ellipsis(algorithm, 20)));
            }
            if let Some(seconds) = metrics.computation_time {
                lines.push(row("Computed", format!("{:.1} ms", seconds * 1000.0)));
            }
            if app.overlay.is_animating() {
                lines.push(row("Drawing", format!("{} batches left", app.overlay.pending_batches())));
            }
        }
        None => lines.push(row("Path", "-".to_owned())),
    }

    lines.push(Line::from(""));
    let mut cell_px = format!("{} px", settings.cell_size());
    if settings.degraded() {
        cell_px.push_str(" (no size)");
    }
    lines.push(row("Zoom", format!("{:.0}%, {cell_px}", settings.zoom() * 100.0)));
    lines.push(row("Render", speed_label(app.overlay.speed()).to_owned()));
    if let Some(image_id) = grid.image_id() {
        let value = match &app.plan_size {
            Some((id, width, height)) if id == image_id => format!("{width}x{height} px"),
            _ => truncate_with_ellipsis(image_id, 20),
        };
        lines.push(row("Plan size", value));
    }

    let pending = [
        Endpoint::SaveGrid,
        Endpoint::ListGrids,
        Endpoint::LoadGrid,
        Endpoint::DeleteGrid,
        Endpoint::UploadImage,
        Endpoint::FetchImage,
        Endpoint::FindPath,
        Endpoint::SaveProduct,
    ]
    .into_iter()
    .filter(|&endpoint| app.dispatcher.is_pending(endpoint))
    .map(|endpoint| endpoint.to_string())
    .collect::<Vec<_>>();
    if !pending.is_empty() {
        lines.push(row("Busy", pending.join(", ")));
    }

    lines.push(Line::from(""));
    let legend = [
        CellMark::Start,
        CellMark::End,
        CellMark::Pickup,
        CellMark::Path,
        CellMark::Obstacle,
        CellMark::Walkable,
    ]
    .into_iter()
    .flat_map(|mark| {
        [
            Span::styled(mark.glyph().to_string(), app.theme.cell_style(mark)),
            Span::raw(" "),
        ]
    })
    .collect::<Vec<_>>();
    lines.push(Line::from(legend));
    lines
}

fn prompt_line(prompt: &Prompt) -> Line<'static> {
    let label = match prompt.kind {
        PromptKind::NewGrid => "New grid (rows columns [width_m length_m]): ".to_owned(),
        PromptKind::ImportImage => "Floor plan image path: ".to_owned(),
        PromptKind::Product { pos } => {
            format!("Product at {pos} (name, id, weight, height, width, length): ")
        }
    };
    Line::from(vec![
        Span::styled(label, Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD)),
        Span::raw(prompt.input.clone()),
    ])
}

fn footer_help_line(app: &App, toast_suffix: &str) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    push_footer_entry(&mut spans, "MODE", "s/e/p/o/c");
    push_footer_entry(&mut spans, "ROUTE", "⏎");
    push_footer_entry(&mut spans, "SAVE", "w");
    push_footer_entry(&mut spans, "LOAD", "l");
    push_footer_entry(&mut spans, "NEW", "n/i");
    push_footer_entry(&mut spans, "ZOOM", "+/-/0");
    let fullscreen = match app.layout.mode() {
        LayoutMode::Normal => "f◻",
        LayoutMode::Fullscreen => "f◼",
    };
    push_footer_entry(&mut spans, "FULL", fullscreen);
    push_footer_entry(&mut spans, "HELP", "?");
    push_footer_entry(&mut spans, "QUIT", "q");
    if !toast_suffix.is_empty() {
        spans.push(Span::styled(
            toast_suffix.to_owned(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    if !spans.is_empty() {
        spans.push(Span::styled(" | ".to_owned(), Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    spans.push(Span::styled(format!("{}:", footer_label_ucfirst(label)), Style::default().fg(FOOTER_LABEL_COLOR)));
    spans.push(Span::styled(
        value.to_owned(),
        Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD),
    ));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}

fn footer_brand_line() -> Line<'static> {
    Line::from(vec![Span::styled(FOOTER_BRAND.to_owned(), Style::default().fg(Color::White))])
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn render_picker(frame: &mut Frame<'_>, picker: &mut GridPicker, main_area: Rect) {
    let area = centered_rect(76, 70, main_area);
    frame.render_widget(Clear, area);

    let items = picker
        .grids
        .iter()
        .map(|grid| {
            let when = grid.timestamp.as_deref().unwrap_or("-");
            ListItem::new(format!(
                "{}  {}x{}  {:.1}x{:.1} m  {}",
                truncate_with_ellipsis(&grid.id, 24),
                grid.rows,
                grid.columns,
                grid.actual_width,
                grid.actual_length,
                truncate_with_ellipsis(when, 19)
            ))
        })
        .collect::<Vec<_>>();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Saved grids (⏎ load, d delete, Esc close) "),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD));
    frame.render_stateful_widget(list, area, &mut picker.state);
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

fn render_help(frame: &mut Frame<'_>, main_area: Rect) {
    let area = centered_rect(70, 80, main_area);
    frame.render_widget(Clear, area);

    let key_style = Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD);
    let header_style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let sections: [(&str, &[(&str, &str)]); 3] = [
        (
            "Editing",
            &[
                ("s / e", "Place start / end (click a cell)"),
                ("p", "Toggle pickup points"),
                ("o / c", "Paint / erase obstacles (drag)"),
                ("Esc", "Back to view mode"),
                ("x / X", "Clear points / clear obstacles"),
                ("a", "Attach a product to the last clicked cell"),
            ],
        ),
        (
            "Service",
            &[
                ("Enter", "Find path (saves first when needed)"),
                ("w", "Save grid"),
                ("l", "Saved grids: load or delete"),
                ("n", "New blank grid"),
                ("i", "Grid from a floor plan image"),
            ],
        ),
        (
            "View",
            &[
                ("+ / - / 0", "Zoom in / out / fit"),
                ("f", "Toggle fullscreen"),
                ("r", "Instant or animated path drawing"),
                ("arrows", "Scroll"),
                ("? / q", "Help / quit"),
            ],
        ),
    ];
    let key_width = sections
        .iter()
        .flat_map(|(_, entries)| entries.iter().map(|(key, _)| key.chars().count()))
        .max()
        .unwrap_or(0);

    let mut lines = Vec::<Line<'static>>::new();
    for (title, entries) in sections {
        lines.push(Line::from(Span::styled(format!("--- {title} ---"), header_style)));
        lines.extend(entries.iter().map(|(key, desc)| help_kv(key, desc, key_width, key_style)));
        lines.push(Line::from(""));
    }

    let help = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Help "));
    frame.render_widget(help, area);
}
