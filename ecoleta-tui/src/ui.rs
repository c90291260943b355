use std::iter;

use ecoleta_core::{
    form::{LoadState, SubmitState},
    model::ContactField,
};
use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{
        Block, Borders, List, ListItem, ListState, Paragraph, Wrap,
        canvas::{Canvas, Map, MapResolution},
    },
};

use crate::app::{App, CreatePointScreen, Focus, Screen};

/// Where each section of the create-point screen is drawn.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CreatePointAreas {
    pub name: Rect,
    pub email: Rect,
    pub whatsapp: Rect,
    pub map: Rect,
    pub state: Rect,
    pub city: Rect,
    pub items: Rect,
    pub submit: Rect,
}

impl CreatePointAreas {
    pub(crate) fn field(&self, field: ContactField) -> Rect {
        match field {
            ContactField::Name => self.name,
            ContactField::Email => self.email,
            ContactField::Whatsapp => self.whatsapp,
        }
    }
}

/// Outer layout: title, main content, status line.
fn frame_areas(area: Rect) -> Option<(Rect, Rect, Rect)> {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let [header_area, content_area, status_area] = layout_chunks.as_ref() else {
        return None;
    };
    Some((*header_area, *content_area, *status_area))
}

pub(crate) fn create_point_areas(area: Rect) -> Option<CreatePointAreas> {
    let (_, content_area, _) = frame_areas(area)?;

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(content_area);
    let [left, right] = columns.as_ref() else {
        return None;
    };

    let left_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // name
            Constraint::Length(3), // email + whatsapp
            Constraint::Min(6),    // state + city
            Constraint::Length(3), // submit
        ])
        .split(*left);
    let [name, contact_row, region_row, submit] = left_rows.as_ref() else {
        return None;
    };

    let contact_columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(*contact_row);
    let [email, whatsapp] = contact_columns.as_ref() else {
        return None;
    };

    let region_columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(14), Constraint::Min(0)])
        .split(*region_row);
    let [state, city] = region_columns.as_ref() else {
        return None;
    };

    let right_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(*right);
    let [map, items] = right_rows.as_ref() else {
        return None;
    };

    Some(CreatePointAreas {
        name: *name,
        email: *email,
        whatsapp: *whatsapp,
        map: *map,
        state: *state,
        city: *city,
        items: *items,
        submit: *submit,
    })
}

/// Drawable part of a bordered block.
pub(crate) fn inner(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let Some((header_area, content_area, status_area)) = frame_areas(frame.area()) else {
        return;
    };

    // Title / header
    let header = Paragraph::new("ecoleta – register a waste collection point")
        .block(Block::default().borders(Borders::ALL).title("Ecoleta"));
    frame.render_widget(header, header_area);

    // Main screen
    match app.screen {
        Screen::Home => draw_home(frame, app, content_area),
        Screen::CreatePoint => {
            if let Some(areas) = create_point_areas(frame.area()) {
                draw_create_point(frame, &app.create, &areas);
            }
        }
    }

    // Status bar
    let (status_text, status_style) = status_line(app);
    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, status_area);
}

/// Status bar text and colour. A fresh validation message wins over an older
/// create failure.
pub(crate) fn status_line(app: &App) -> (String, Style) {
    let nav_hint = match app.screen {
        Screen::Home => "Enter register a collection point · q/Ctrl-C quit",
        Screen::CreatePoint => focus_hint(app.create.focus),
    };

    let submit_state = match app.screen {
        Screen::CreatePoint => Some(app.create.form.submit_state()),
        Screen::Home => None,
    };

    match (submit_state, &app.error_message, &app.notice) {
        (Some(SubmitState::Submitting), _, _) => (
            format!("Registering… · {nav_hint}"),
            Style::default().fg(Color::Yellow),
        ),
        (_, Some(msg), _) => (
            format!("{msg} · {nav_hint}"),
            Style::default().fg(Color::Red),
        ),
        (Some(SubmitState::Failed(err)), None, _) => (
            format!("Registration failed: {err} · {nav_hint}"),
            Style::default().fg(Color::Red),
        ),
        (_, None, Some(msg)) => (
            format!("{msg} · {nav_hint}"),
            Style::default().fg(Color::Green),
        ),
        _ => (nav_hint.to_owned(), Style::default()),
    }
}

fn focus_hint(focus: Focus) -> &'static str {
    match focus {
        Focus::Field(_) => "Type to edit · Tab/Shift-Tab move · Ctrl-S register · Esc home",
        Focus::Map => {
            "Arrows pan · +/- zoom · Enter/click place marker · c recenter · Tab move · Esc home"
        }
        Focus::State | Focus::City => {
            "↑/↓ move · Enter select · r retry · Tab move · Ctrl-S register · Esc home"
        }
        Focus::Items => "↑/↓ move · Space/Enter toggle · r retry · Tab move · Esc home",
        Focus::Submit => "Enter register · Tab move · Esc home",
    }
}

fn draw_home(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from("Your marketplace for waste collection.".bold()),
        Line::from(""),
        Line::from("Ecoleta helps people find collection points efficiently."),
        Line::from("Register an entity that accepts recyclable materials."),
        Line::from(""),
        Line::from("Press Enter to register a collection point.".cyan()),
    ];

    if let Some(notice) = &app.notice {
        lines.push(Line::from(""));
        lines.push(Line::from(notice.as_str().green()));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Home"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn focused_block(title: String, focused: bool) -> Block<'static> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::default().fg(Color::Yellow))
    } else {
        block
    }
}

fn draw_create_point(frame: &mut Frame<'_>, screen: &CreatePointScreen, areas: &CreatePointAreas) {
    for field in ContactField::ALL {
        draw_field(frame, screen, field, areas.field(field));
    }
    draw_map(frame, screen, areas.map);
    draw_states(frame, screen, areas.state);
    draw_cities(frame, screen, areas.city);
    draw_items(frame, screen, areas.items);
    draw_submit(frame, screen, areas.submit);
}

fn draw_field(frame: &mut Frame<'_>, screen: &CreatePointScreen, field: ContactField, area: Rect) {
    let focused = screen.focus == Focus::Field(field);
    let value = screen.form.contact().get(field);
    let text = if focused {
        format!("{value}▏")
    } else {
        value.to_owned()
    };

    let input = Paragraph::new(text).block(focused_block(field.label().to_owned(), focused));
    frame.render_widget(input, area);
}

fn draw_map(frame: &mut Frame<'_>, screen: &CreatePointScreen, area: Rect) {
    let focused = screen.focus == Focus::Map;
    let initial = screen.form.initial_position();
    let center = screen.map_center();
    let selected = screen.form.selected_position();
    let (x_bounds, y_bounds) = screen.map.bounds(initial);

    let title = format!(
        "Address – pick a point · zoom {} · marker {selected}",
        screen.map.zoom()
    );

    let canvas = Canvas::default()
        .block(focused_block(title, focused))
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::Green,
            });
            ctx.layer();
            if focused {
                ctx.print(center.longitude, center.latitude, "+".yellow());
            }
            ctx.print(selected.longitude, selected.latitude, "◉".red().bold());
        });

    frame.render_widget(canvas, area);
}

fn list_title(base: &str, state_loading: bool, error: Option<&str>) -> String {
    if state_loading {
        format!("{base} – loading…")
    } else if let Some(err) = error {
        format!("{base} – failed: {err} (r to retry)")
    } else {
        base.to_owned()
    }
}

fn selector_items<'a>(
    placeholder: &'a str,
    options: &[String],
    selected: &str,
) -> Vec<ListItem<'a>> {
    iter::once(ListItem::new(placeholder))
        .chain(options.iter().map(|option| {
            let marker = if option == selected { "● " } else { "  " };
            ListItem::new(format!("{marker}{option}"))
        }))
        .collect()
}

fn render_selector(
    frame: &mut Frame<'_>,
    items: Vec<ListItem<'_>>,
    block: Block<'_>,
    index: usize,
    area: Rect,
) {
    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    state.select(Some(index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_states(frame: &mut Frame<'_>, screen: &CreatePointScreen, area: Rect) {
    let regions = screen.form.regions();
    let options: Vec<String> = regions
        .as_slice()
        .iter()
        .map(ToString::to_string)
        .collect();
    let items = selector_items("Select", &options, screen.form.selected_region().as_str());
    let title = list_title("State (UF)", regions.is_loading(), regions.error());

    render_selector(
        frame,
        items,
        focused_block(title, screen.focus == Focus::State),
        screen.state_index,
        area,
    );
}

fn draw_cities(frame: &mut Frame<'_>, screen: &CreatePointScreen, area: Rect) {
    let cities = screen.form.sub_regions();
    let options: Vec<String> = cities.as_slice().iter().map(ToString::to_string).collect();
    let placeholder = match cities {
        LoadState::Unloaded => "Select a state first",
        _ => "Select a city",
    };
    let items = selector_items(
        placeholder,
        &options,
        screen.form.selected_sub_region().as_str(),
    );
    let title = list_title("City", cities.is_loading(), cities.error());

    render_selector(
        frame,
        items,
        focused_block(title, screen.focus == Focus::City),
        screen.city_index,
        area,
    );
}

fn draw_items(frame: &mut Frame<'_>, screen: &CreatePointScreen, area: Rect) {
    let categories = screen.form.categories();
    let selection = screen.form.selected_categories();
    let focused = screen.focus == Focus::Items;

    let items: Vec<ListItem<'_>> = if categories.as_slice().is_empty() {
        vec![ListItem::new(match categories {
            LoadState::Loading => "Loading categories…",
            LoadState::Failed(_) => "Categories unavailable.",
            _ => "No categories offered by the backend.",
        })]
    } else {
        categories
            .as_slice()
            .iter()
            .map(|item| {
                let checked = selection.contains(item.id);
                let line = format!("[{}] {}", if checked { "x" } else { " " }, item.title);
                if checked {
                    ListItem::new(line).style(Style::default().fg(Color::Green))
                } else {
                    ListItem::new(line)
                }
            })
            .collect()
    };

    let title = list_title(
        &format!("Collection items ({} selected)", selection.len()),
        categories.is_loading(),
        categories.error(),
    );

    let list = List::new(items)
        .block(focused_block(title, focused))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

    let mut state = ListState::default();
    if focused && !categories.as_slice().is_empty() {
        state.select(Some(screen.item_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_submit(frame: &mut Frame<'_>, screen: &CreatePointScreen, area: Rect) {
    let focused = screen.focus == Focus::Submit;
    let label = match screen.form.submit_state() {
        SubmitState::Submitting => "Registering…",
        _ => "Register collection point",
    };

    let style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };

    let button = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(style)
        .block(focused_block(String::new(), focused));
    frame.render_widget(button, area);
}
