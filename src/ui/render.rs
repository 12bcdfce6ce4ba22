use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::controller::{
    DashboardController, DetailController, EditController, FieldValue, ListBody, ListController,
    ProfileController, SignInController, SignInField,
};
use crate::controller::detail::{FieldRow, RelatedView};
use crate::controller::intermediaries::{PanelView, RowDetail, RowKind};
use crate::ui::app::{App, Screen};
use crate::ui::footer::Footer;
use crate::ui::header::Header;
use crate::ui::layout::{centered_rect_by_size, layout_regions};
use crate::ui::notice::NoticeLevel;
use crate::ui::theme::{
    ACCENT, ACTIVE_HIGHLIGHT, GLOBAL_BORDER, HEADER_TEXT, MUTED_TEXT, POPUP_BORDER, SKELETON,
    STATUS_ERROR, STATUS_INFO, STATUS_OK,
};

const SKELETON_CELL: &str = "░░░░░░░░";

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();
    let (header, body, footer) = layout_regions(area);

    frame.render_widget(Header::new(app.route(), app.session()).widget(), header);
    frame.render_widget(Clear, body);
    match app.screen() {
        Screen::SignIn(form) => draw_sign_in(frame, body, form),
        Screen::Dashboard(dashboard) => draw_dashboard(frame, body, dashboard),
        Screen::Profile(profile) => draw_profile(frame, body, profile),
        Screen::List(list) => draw_list(frame, body, list, app.search_active()),
        Screen::Detail(detail) => draw_detail(frame, body, detail),
        Screen::NotFound(path) => draw_not_found(frame, body, path),
    }
    frame.render_widget(Footer::widget(app, footer), footer);

    if let Some(edit) = app.edit() {
        draw_edit(frame, body, edit);
    }
    if let Some(prompt) = app.confirm() {
        let lines = vec![
            Line::from(prompt.message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "[y] Yes    [n] No",
                Style::default().fg(MUTED_TEXT),
            )),
        ];
        draw_popup(frame, body, &prompt.title, lines, 40);
    }
    draw_notices(frame, body, app);
}

fn section_block(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .title(Span::styled(
            format!(" {} ", title.into()),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(GLOBAL_BORDER))
}

fn error_lines(message: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            "Something went wrong",
            Style::default().fg(STATUS_ERROR).add_modifier(Modifier::BOLD),
        )),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press R to retry or Esc to go back.",
            Style::default().fg(MUTED_TEXT),
        )),
    ]
}

fn draw_sign_in(frame: &mut Frame<'_>, body: Rect, form: &SignInController) {
    let area = centered_rect_by_size(body, 50, 10);
    let label = |field: SignInField, text: &'static str| {
        let style = if form.focus() == field {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(MUTED_TEXT)
        };
        Span::styled(text, style)
    };

    let mut lines = vec![
        Line::from(vec![
            label(SignInField::Email, "Email     "),
            Span::styled(form.email().to_string(), Style::default().fg(HEADER_TEXT)),
        ]),
        Line::from(vec![
            label(SignInField::Password, "Password  "),
            Span::styled("•".repeat(form.password_len()), Style::default().fg(HEADER_TEXT)),
        ]),
        Line::from(""),
    ];
    if form.is_submitting() {
        lines.push(Line::from(Span::styled(
            "Signing in…",
            Style::default().fg(STATUS_INFO),
        )));
    } else if let Some(error) = form.error() {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(STATUS_ERROR),
        )));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(section_block("Sign in")),
        area,
    );
}

fn draw_dashboard(frame: &mut Frame<'_>, body: Rect, dashboard: &DashboardController) {
    let view = dashboard.view();
    let block = section_block(format!("Dashboard · {}", view.range_label));
    let inner = block.inner(body);
    frame.render_widget(block, body);

    if let Some(error) = &view.error {
        frame.render_widget(Paragraph::new(error_lines(error)), inner);
        return;
    }

    let per_row = 3usize;
    let tile_rows = view.tiles.chunks(per_row).count().max(1) as u16;
    let [tiles_area, panel_area] =
        Layout::vertical([Constraint::Length(tile_rows * 4), Constraint::Min(3)]).areas(inner);

    if view.loading && view.tiles.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(SKELETON_CELL, Style::default().fg(SKELETON))),
            tiles_area,
        );
    } else {
        let rows = Layout::vertical(vec![Constraint::Length(4); tile_rows as usize]).split(tiles_area);
        for (chunk, row_area) in view.tiles.chunks(per_row).zip(rows.iter()) {
            let cells = Layout::horizontal(vec![Constraint::Ratio(1, per_row as u32); per_row])
                .split(*row_area);
            for (tile, cell) in chunk.iter().zip(cells.iter()) {
                let hint = tile
                    .link
                    .map(|resource| format!("see {}", resource.plural()))
                    .unwrap_or_default();
                let lines = vec![
                    Line::from(Span::styled(
                        tile.value.clone(),
                        Style::default().fg(HEADER_TEXT).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(hint, Style::default().fg(MUTED_TEXT))),
                ];
                frame.render_widget(Paragraph::new(lines).block(section_block(&tile.label)), *cell);
            }
        }
    }

    draw_intermediaries(frame, panel_area, &view.intermediaries);
}

fn quote_summary(detail: &RowDetail) -> Span<'static> {
    match detail {
        RowDetail::Loading => Span::styled(SKELETON_CELL, Style::default().fg(SKELETON)),
        RowDetail::Failed(message) => {
            Span::styled(message.clone(), Style::default().fg(STATUS_ERROR))
        }
        RowDetail::Counts(counts) => Span::styled(
            format!(
                "quotes {} · new {} · pending {} · closed {}",
                counts.total, counts.new, counts.pending, counts.closed
            ),
            Style::default().fg(MUTED_TEXT),
        ),
    }
}

fn draw_intermediaries(frame: &mut Frame<'_>, area: Rect, view: &PanelView) {
    let block = section_block("Intermediaries and their clients");
    let lines: Vec<Line<'static>> = if let Some(error) = &view.error {
        error_lines(error)
    } else if view.loading {
        vec![Line::from(Span::styled(SKELETON_CELL, Style::default().fg(SKELETON)))]
    } else if view.rows.is_empty() {
        vec![Line::from(Span::styled(
            "No intermediaries yet.",
            Style::default().fg(MUTED_TEXT),
        ))]
    } else {
        view.rows
            .iter()
            .map(|row| {
                let marker = if row.expanded { "▾ " } else { "▸ " };
                let (indent, role) = match row.kind {
                    RowKind::Intermediary => ("", "Intermediary"),
                    RowKind::Client => ("    ", "Client"),
                };
                let name_style = if row.selected {
                    Style::default()
                        .fg(HEADER_TEXT)
                        .bg(ACTIVE_HIGHLIGHT)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(HEADER_TEXT)
                };
                let mut spans = vec![
                    Span::raw(indent),
                    Span::styled(marker, Style::default().fg(ACCENT)),
                    Span::styled(format!("{} - ", role), Style::default().fg(MUTED_TEXT)),
                    Span::styled(row.name.clone(), name_style),
                ];
                if let Some(detail) = &row.detail {
                    spans.push(Span::raw("   "));
                    spans.push(quote_summary(detail));
                }
                Line::from(spans)
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_lines(rows: &[FieldRow]) -> Vec<Line<'static>> {
    rows.iter()
        .map(|row| {
            let value = match &row.value {
                FieldValue::Skeleton => Span::styled(SKELETON_CELL, Style::default().fg(SKELETON)),
                FieldValue::Text(text) => {
                    Span::styled(text.clone(), Style::default().fg(HEADER_TEXT))
                }
            };
            Line::from(vec![
                Span::styled(format!("{:<22}", row.label), Style::default().fg(MUTED_TEXT)),
                value,
            ])
        })
        .collect()
}

fn draw_profile(frame: &mut Frame<'_>, body: Rect, profile: &ProfileController) {
    let view = profile.view();
    let lines = match &view.error {
        Some(error) => error_lines(error),
        None => field_lines(&view.rows),
    };
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(section_block("My Profile")),
        body,
    );
}

fn draw_list(frame: &mut Frame<'_>, body: Rect, list: &ListController, search_active: bool) {
    let view = list.view();
    let title = match view.badge {
        Some(count) => format!("{} ({})", view.title, count),
        None => view.title.to_string(),
    };
    let block = section_block(title);
    let inner = block.inner(body);
    frame.render_widget(block, body);

    let [toolbar, table_area, pager] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let search = if search_active {
        Span::styled(
            format!("Search: {}▏", view.search_draft),
            Style::default().fg(ACCENT),
        )
    } else if view.keyword.is_empty() {
        Span::styled("Search: /", Style::default().fg(MUTED_TEXT))
    } else {
        Span::styled(
            format!("Search: {}", view.keyword),
            Style::default().fg(HEADER_TEXT),
        )
    };
    let mut spans = vec![search];
    for filter in &view.filters {
        spans.push(Span::styled(
            format!("   {}: {}", filter.label, filter.value),
            Style::default().fg(MUTED_TEXT),
        ));
    }
    spans.push(Span::styled(
        format!("   Rows: {}", view.page_size.as_u32()),
        Style::default().fg(MUTED_TEXT),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), toolbar);

    let mut headers = vec!["#"];
    headers.extend(view.headers.iter().copied());
    let mut widths: Vec<Constraint> = std::iter::once(Constraint::Length(4))
        .chain(view.headers.iter().map(|_| Constraint::Fill(1)))
        .collect();
    if view.row_action.is_some() {
        headers.push("Action");
        widths.push(Constraint::Length(12));
    }
    let column_count = headers.len();
    let header_row = Row::new(headers.into_iter().map(Cell::from))
        .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));

    match &view.body {
        ListBody::Error(message) => {
            frame.render_widget(Paragraph::new(error_lines(message)), table_area);
        }
        ListBody::Empty => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("No {} found.", view.title.to_lowercase()),
                    Style::default().fg(MUTED_TEXT),
                )),
                table_area,
            );
        }
        ListBody::Skeleton(count) => {
            let rows = (0..*count).map(|_| {
                Row::new(vec![Cell::from(SKELETON_CELL); column_count])
                    .style(Style::default().fg(SKELETON))
            });
            frame.render_widget(Table::new(rows, widths).header(header_row), table_area);
        }
        ListBody::Rows(rows) => {
            let rows = rows.iter().map(|row| {
                let mut cells = vec![Cell::from(row.number.to_string())];
                cells.extend(row.cells.iter().map(|cell| Cell::from(cell.clone())));
                if let Some(action) = view.row_action {
                    cells.push(if row.actionable {
                        Cell::from(format!("[u] {}", action)).style(Style::default().fg(STATUS_INFO))
                    } else {
                        Cell::from("")
                    });
                }
                Row::new(cells).style(Style::default().fg(HEADER_TEXT))
            });
            let table = Table::new(rows, widths)
                .header(header_row)
                .row_highlight_style(Style::default().bg(ACTIVE_HIGHLIGHT));
            let mut state = TableState::default().with_selected(view.selected);
            frame.render_stateful_widget(table, table_area, &mut state);
        }
    }

    let busy = if view.deleting {
        Some("Deleting…")
    } else if view.unlocking {
        Some("Unlocking…")
    } else {
        None
    };
    if view.show_pager {
        let mut text = format!("Page {} of {}", view.page, view.total_pages);
        if let Some(busy) = busy {
            text.push_str("   ");
            text.push_str(busy);
        }
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(MUTED_TEXT))),
            pager,
        );
    } else if let Some(busy) = busy {
        frame.render_widget(
            Paragraph::new(Span::styled(busy, Style::default().fg(STATUS_INFO))),
            pager,
        );
    }
}

fn related_table(related: &RelatedView) -> Table<'static> {
    let widths: Vec<Constraint> = related.headers.iter().map(|_| Constraint::Fill(1)).collect();
    let header = Row::new(related.headers.iter().map(|h| Cell::from(*h)))
        .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    let rows: Vec<Row<'static>> = match &related.rows {
        Some(rows) if !rows.is_empty() => rows
            .iter()
            .map(|row| Row::new(row.iter().map(|cell| Cell::from(cell.clone()))))
            .collect(),
        Some(_) => vec![Row::new(vec![Cell::from(related.empty)])
            .style(Style::default().fg(MUTED_TEXT))],
        None => vec![Row::new(vec![Cell::from(SKELETON_CELL); related.headers.len()])
            .style(Style::default().fg(SKELETON))],
    };
    Table::new(rows, widths)
        .header(header)
        .block(section_block(related.title))
}

fn draw_detail(frame: &mut Frame<'_>, body: Rect, detail: &DetailController) {
    let view = detail.view();
    let block = section_block(view.title.clone());
    let inner = block.inner(body);
    frame.render_widget(block, body);

    if let Some(error) = &view.error {
        frame.render_widget(Paragraph::new(error_lines(error)), inner);
        return;
    }

    let mut lines = Vec::new();
    for section in &view.sections {
        lines.push(Line::from(Span::styled(
            section.title,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )));
        lines.extend(field_lines(&section.rows));
        lines.push(Line::from(""));
    }
    if !view.actions.is_empty() {
        let spans: Vec<Span<'static>> = view
            .actions
            .iter()
            .map(|action| {
                let text = if action.busy {
                    format!("[{}…]  ", action.label)
                } else {
                    format!("[{}]  ", action.label)
                };
                Span::styled(text, Style::default().fg(STATUS_INFO))
            })
            .collect();
        lines.push(Line::from(spans));
    }

    let related_height = view.related.len() as u16 * 8;
    let [fields_area, related_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(related_height)]).areas(inner);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        fields_area,
    );

    let slots = Layout::vertical(vec![Constraint::Length(8); view.related.len()]).split(related_area);
    for (related, slot) in view.related.iter().zip(slots.iter()) {
        frame.render_widget(related_table(related), *slot);
    }
}

fn draw_not_found(frame: &mut Frame<'_>, body: Rect, path: &str) {
    let lines = vec![
        Line::from(Span::styled(
            "404",
            Style::default().fg(STATUS_ERROR).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Nothing lives at {}", path)),
    ];
    let area = centered_rect_by_size(body, 40, 4);
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_edit(frame: &mut Frame<'_>, body: Rect, edit: &EditController) {
    let view = edit.view();
    let mut lines = Vec::new();
    if let Some(error) = &view.error {
        lines.extend(error_lines(error));
    } else if view.loading {
        lines.push(Line::from(Span::styled(
            "Loading…",
            Style::default().fg(STATUS_INFO),
        )));
    } else {
        for field in &view.fields {
            let marker = if field.required { "*" } else { " " };
            let label_style = if field.focused {
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(MUTED_TEXT)
            };
            let value = match field.options {
                Some(_) => format!("‹ {} ›", field.value),
                None if field.focused => format!("{}▏", field.value),
                None => field.value.clone(),
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{}{:<22}", marker, field.label), label_style),
                Span::styled(value, Style::default().fg(HEADER_TEXT)),
            ]));
        }
        if view.saving {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Saving…",
                Style::default().fg(STATUS_INFO),
            )));
        }
    }
    draw_popup(frame, body, &view.title, lines, 60);
}

fn draw_popup(frame: &mut Frame<'_>, body: Rect, title: &str, lines: Vec<Line<'static>>, min_width: u16) {
    let content_width = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
    let popup_width = content_width.saturating_add(4).max(min_width);
    let popup_height = lines.len().saturating_add(2) as u16;
    let area = centered_rect_by_size(body, popup_width, popup_height);

    frame.render_widget(Clear, area);
    let popup = Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(ACCENT),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(POPUP_BORDER));
    frame.render_widget(Paragraph::new(lines).block(popup), area);
}

/// Stack notices in the bottom-right corner of the body, newest last.
fn draw_notices(frame: &mut Frame<'_>, body: Rect, app: &App) {
    let notices: Vec<_> = app.notices().visible().collect();
    if notices.is_empty() || body.height < 3 {
        return;
    }
    let width = notices
        .iter()
        .map(|notice| notice.text.chars().count() as u16 + 4)
        .max()
        .unwrap_or(0)
        .min(body.width);
    let height = (notices.len() as u16 * 3).min(body.height);
    let area = Rect {
        x: body.x + body.width.saturating_sub(width),
        y: body.y + body.height.saturating_sub(height),
        width,
        height,
    };
    let slots = Layout::vertical(vec![Constraint::Length(3); notices.len()]).split(area);
    for (notice, slot) in notices.iter().zip(slots.iter()) {
        let color = match notice.level {
            NoticeLevel::Success => STATUS_OK,
            NoticeLevel::Error => STATUS_ERROR,
            NoticeLevel::Info => STATUS_INFO,
        };
        frame.render_widget(Clear, *slot);
        frame.render_widget(
            Paragraph::new(Span::styled(notice.text.clone(), Style::default().fg(color))).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
            *slot,
        );
    }
}
