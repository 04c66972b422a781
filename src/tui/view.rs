use crate::model::ItemType;
use crate::model::display::strip_control;
use crate::tui::state::{AppState, FormField, InputMode};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(v_chunks[0]);

    draw_sidebar(f, state, h_chunks[0]);

    if state.mode == InputMode::Reporting {
        draw_form(f, state, h_chunks[1]);
    } else {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(h_chunks[1]);
        draw_list(f, state, main_chunks[0]);
        draw_details(f, state, main_chunks[1]);
    }

    draw_footer(f, state, v_chunks[1]);
}

fn draw_sidebar(f: &mut Frame, state: &AppState, area: Rect) {
    let stats = state.stats();
    let search = if state.filter.search.is_empty() {
        "-".to_string()
    } else {
        strip_control(&state.filter.search).into_owned()
    };
    let lines = vec![
        Line::from(Span::styled(
            "Filters",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(" Search:   {}", search)),
        Line::from(format!(" Type:     {}", state.filter.kind.label())),
        Line::from(format!(" Category: {}", state.filter.category.label())),
        Line::from(""),
        Line::from(Span::styled(
            "Board",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(" Active:   {}", stats.active)),
        Line::from(Span::styled(
            format!(" Lost:     {}", stats.lost),
            Style::default().fg(Color::Red),
        )),
        Line::from(Span::styled(
            format!(" Found:    {}", stats.found),
            Style::default().fg(Color::Green),
        )),
        Line::from(format!(" Resolved: {}", stats.resolved)),
    ];
    let sidebar = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Lost & Found "),
    );
    f.render_widget(sidebar, area);
}

fn draw_list(f: &mut Frame, state: &mut AppState, area: Rect) {
    let listing = state.listing();
    let rows: Vec<ListItem> = listing
        .cards
        .iter()
        .map(|card| {
            let badge_style = match card.kind {
                ItemType::Lost => Style::default().fg(Color::Red),
                ItemType::Found => Style::default().fg(Color::Green),
            };
            let image = if card.has_image { " [img]" } else { "" };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<6}", card.badge), badge_style),
                Span::raw(format!("{}{}", card.title, image)),
                Span::styled(
                    format!("  {} | {} | {}", card.category, card.location, card.date),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let title = if state.loading {
        " Items (Loading...) ".to_string()
    } else {
        format!(" {} ", listing.count_label)
    };
    let list = List::new(rows)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        );
    f.render_stateful_widget(list, area, &mut state.list_state);
}

fn draw_details(f: &mut Frame, state: &AppState, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    if let Some(item) = state.selected_item() {
        lines.push(Line::from(strip_control(&item.description).into_owned()));
        lines.push(Line::from(""));
        lines.push(Line::from(format!(
            "Reported by {}",
            strip_control(&item.contact_name)
        )));
        if let Some(card) = &state.contact {
            lines.push(Line::from(Span::styled(
                format!("Email: {}", strip_control(&card.mail_action)),
                Style::default().fg(Color::Cyan),
            )));
            if let Some(tel) = &card.phone_action {
                lines.push(Line::from(Span::styled(
                    format!("Phone: {}", strip_control(tel)),
                    Style::default().fg(Color::Cyan),
                )));
            }
        } else {
            lines.push(Line::from(Span::styled(
                "m: show contact",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    let details = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Details "));
    f.render_widget(details, area);
}

fn draw_form(f: &mut Frame, state: &AppState, area: Rect) {
    let mut lines = Vec::new();
    for field in FormField::ALL {
        let focused = field == state.form_field;
        let value = if focused {
            state.input_buffer.clone()
        } else {
            state.form_value(field)
        };
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let hint = match field {
            FormField::Type | FormField::Category if focused => "  (<-/-> to choose)",
            _ => "",
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<14}", field.label()), label_style),
            Span::raw(value),
            Span::styled(hint, Style::default().fg(Color::DarkGray)),
        ]));
    }
    let title = if state.submitting {
        " Report an item (submitting...) "
    } else {
        " Report an item "
    };
    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(form, area);

    let row = FormField::ALL
        .iter()
        .position(|field| *field == state.form_field)
        .unwrap_or(0) as u16;
    f.set_cursor_position((
        area.x + 1 + 14 + state.cursor_position as u16,
        area.y + 1 + row,
    ));
}

fn draw_footer(f: &mut Frame, state: &AppState, area: Rect) {
    match state.mode {
        InputMode::Searching => {
            let prefix = "/ ";
            let input = Paragraph::new(format!("{}{}", prefix, state.input_buffer))
                .style(Style::default().fg(Color::Green))
                .block(Block::default().borders(Borders::ALL).title(" Search "));
            f.render_widget(input, area);
            let cursor_x =
                area.x + 1 + prefix.chars().count() as u16 + state.cursor_position as u16;
            f.set_cursor_position((cursor_x, area.y + 1));
        }
        InputMode::Normal | InputMode::Reporting => {
            let f_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(area);
            let status_color = if state.message.starts_with("Error") {
                Color::Red
            } else {
                Color::Cyan
            };
            let status = Paragraph::new(state.message.clone())
                .style(Style::default().fg(status_color))
                .block(
                    Block::default()
                        .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
                        .title(" Status "),
                );
            let help_text = if state.mode == InputMode::Reporting {
                "Tab/Enter:Next | Shift-Tab:Prev | Enter on last:Submit | Esc:Back"
            } else {
                "/:Find | t:Type | c:Cat | x:Reset | a:Report | r:Resolve | m:Contact | q:Quit"
            };
            let help = Paragraph::new(help_text)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Right)
                .block(
                    Block::default()
                        .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                        .title(" Actions "),
                );
            f.render_widget(status, f_chunks[0]);
            f.render_widget(help, f_chunks[1]);
        }
    }
}
