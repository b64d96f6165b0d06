//! UI rendering

use super::app::{App, Mode, Screen};
use super::keymap::status_hint;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

pub(crate) const INPUT_BAR_HEIGHT: u16 = 3;
pub(crate) const BODY_MIN_HEIGHT: u16 = 6;
pub(crate) const STATUS_BAR_HEIGHT: u16 = 1;
pub(crate) const ROW_HEADER_WIDTH: u16 = 6;
pub(crate) const GRID_COLUMN_SPACING: u16 = 1;

pub(crate) fn split_main_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(INPUT_BAR_HEIGHT),
            Constraint::Min(BODY_MIN_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Draw the application UI
pub fn draw(f: &mut Frame, app: &mut App) {
    let [input_area, body_area, status_area] = split_main_chunks(f.area());

    // header + borders
    app.visible_rows = body_area.height.saturating_sub(3).max(1) as usize;
    let available_width = body_area.width.saturating_sub(ROW_HEADER_WIDTH + 2) as usize;
    app.visible_cols = (available_width / (app.col_width + GRID_COLUMN_SPACING as usize)).max(1);
    app.update_viewport();

    draw_input_bar(f, app, input_area);
    match app.screen {
        Screen::List => draw_list(f, app, body_area),
        Screen::Editor => draw_grid(f, app, body_area),
    }
    draw_status_bar(f, app, status_area);
}

fn draw_input_bar(f: &mut Frame, app: &App, area: Rect) {
    let (title, content, color) = match (app.mode, app.prompt) {
        (Mode::Prompt, Some(kind)) => {
            let (before, after) = app.input_buffer.split_at(app.input_cursor);
            (
                format!(" {} ", kind.label()),
                format!("{}│{}", before, after),
                Color::Yellow,
            )
        }
        _ => match app.screen {
            Screen::List => (
                " Sheets ".to_string(),
                format!("{} stored", app.list.records().len()),
                Color::White,
            ),
            Screen::Editor => {
                let modified_indicator = if app.editor.modified { " [+]" } else { "" };
                let title = if app.editor.title.is_empty() {
                    format!("(untitled){}", modified_indicator)
                } else {
                    format!("{}{}", app.editor.title, modified_indicator)
                };
                let cell = app
                    .editor
                    .table()
                    .and_then(|t| {
                        let name = t.column_names().get(app.cursor_col)?;
                        let value = t.cell(app.cursor_row, app.cursor_col)?;
                        Some(format!("{}[{}]: {}", name, app.cursor_row + 1, value))
                    })
                    .unwrap_or_default();
                (" Editor ".to_string(), format!("{}  {}", title, cell), Color::Cyan)
            }
        },
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(color));
    f.render_widget(Paragraph::new(content).block(block), area);
}

fn draw_list(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Stored sheets ");

    if app.list.is_loading() {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(loading, area);
        return;
    }
    if app.list.records().is_empty() {
        let empty = Paragraph::new("No sheets stored. Press n to create one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("File").style(Style::default().fg(Color::DarkGray)),
        Cell::from("URL").style(Style::default().fg(Color::DarkGray)),
    ]);

    let skip = app
        .list_cursor
        .saturating_sub(app.visible_rows.saturating_sub(1));
    let rows: Vec<Row> = app
        .list
        .records()
        .iter()
        .enumerate()
        .skip(skip)
        .take(app.visible_rows)
        .map(|(i, record)| {
            let style = if i == app.list_cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(record.filename.clone()),
                Cell::from(record.url.clone()),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Percentage(40), Constraint::Percentage(60)])
        .header(header)
        .block(block)
        .column_spacing(GRID_COLUMN_SPACING);
    f.render_widget(table, area);
}

fn draw_grid(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Sheet ");
    let Some(table) = app.editor.table() else {
        let hint = Paragraph::new("No sheet imported. Press o to import a file.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(hint, area);
        return;
    };

    let col_end = (app.viewport_col + app.visible_cols).min(table.column_count());
    let row_end = (app.viewport_row + app.visible_rows).min(table.row_count());

    // Header row: column names, selected columns marked
    let mut header_cells = vec![Cell::from(" ")];
    for col in app.viewport_col..col_end {
        let name = &table.column_names()[col];
        let selected = app.editor.is_column_selected(col);
        let label = if selected {
            format!("*{}", name)
        } else {
            name.clone()
        };
        let style = if col == app.cursor_col {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else if selected {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        header_cells.push(Cell::from(label).style(style));
    }
    let header = Row::new(header_cells).height(1);

    let mut rows = Vec::new();
    for row in app.viewport_row..row_end {
        let row_selected = app.editor.is_row_selected(row);
        let mut cells = Vec::new();

        let marker = if row_selected { "*" } else { " " };
        let row_style = if row == app.cursor_row {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else if row_selected {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        cells.push(Cell::from(format!("{}{}", marker, row + 1)).style(row_style));

        for col in app.viewport_col..col_end {
            let display = table
                .cell(row, col)
                .map(|v| v.to_string())
                .unwrap_or_default();
            let is_cursor = row == app.cursor_row && col == app.cursor_col;
            let marked = row_selected || app.editor.is_column_selected(col);

            let style = if is_cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if marked {
                Style::default().fg(Color::White).bg(Color::Red)
            } else {
                Style::default()
            };
            cells.push(Cell::from(display).style(style));
        }
        rows.push(Row::new(cells));
    }

    let mut widths = vec![Constraint::Length(ROW_HEADER_WIDTH)];
    for _ in app.viewport_col..col_end {
        widths.push(Constraint::Length(app.col_width as u16));
    }

    let grid = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(GRID_COLUMN_SPACING);
    f.render_widget(grid, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status = if !app.status_message.is_empty() {
        app.status_message.clone()
    } else {
        let selection = app.editor.selection();
        if app.screen == Screen::Editor && !selection.is_empty() {
            format!(
                "{} rows, {} columns selected  |  {}",
                selection.rows.len(),
                selection.columns.len(),
                status_hint(app.screen)
            )
        } else {
            status_hint(app.screen).to_string()
        }
    };

    let style = if app.status_message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else if !app.status_message.is_empty() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    f.render_widget(Paragraph::new(Line::from(vec![Span::styled(status, style)])), area);
}
