use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ecoleta_core::{
    form::{FormEvent, Resource},
    model::{RegionCode, SubRegionName},
};
use ratatui::layout::Position;

use crate::app::{App, Focus, Screen};
use crate::map::Pan;
use crate::ui;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Enter a fresh create-point screen
    OpenCreatePoint,
    /// Feed the event to the form and carry out its effects
    Form(FormEvent),
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    // Global quit shortcut
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match app.screen {
        Screen::Home => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Enter | KeyCode::Char(' ') => Action::OpenCreatePoint,
            _ => Action::None,
        },
        Screen::CreatePoint => handle_create_point_key(key, app),
    }
}

fn handle_create_point_key(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{BackTab, Backspace, Char, Down, Enter, Esc, Left, Right, Tab, Up};

    app.error_message = None;

    match key.code {
        Esc => {
            app.go_home(None);
            return Action::None;
        }
        Tab => {
            app.create.focus = app.create.focus.next();
            return Action::None;
        }
        BackTab => {
            app.create.focus = app.create.focus.previous();
            return Action::None;
        }
        Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => return try_submit(app),
        _ => {}
    }

    let screen = &mut app.create;

    match screen.focus {
        Focus::Field(field) => match key.code {
            Char(character)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                let mut value = screen.form.contact().get(field).to_owned();
                value.push(character);
                Action::Form(FormEvent::UpdateField(field, value))
            }
            Backspace => {
                let mut value = screen.form.contact().get(field).to_owned();
                if value.pop().is_none() {
                    return Action::None;
                }
                Action::Form(FormEvent::UpdateField(field, value))
            }
            Enter | Down => {
                screen.focus = screen.focus.next();
                Action::None
            }
            Up => {
                screen.focus = screen.focus.previous();
                Action::None
            }
            _ => Action::None,
        },

        Focus::Map => {
            let initial = screen.form.initial_position();
            match key.code {
                Up => screen.map.pan(Pan::North, initial),
                Down => screen.map.pan(Pan::South, initial),
                Left => screen.map.pan(Pan::West, initial),
                Right => screen.map.pan(Pan::East, initial),
                Char('+' | '=') => screen.map.zoom_in(),
                Char('-') => screen.map.zoom_out(),
                Char('c') => screen.map.recenter(),
                Enter | Char(' ') => {
                    return Action::Form(FormEvent::SetMapPoint(screen.map_center()));
                }
                _ => {}
            }
            Action::None
        }

        Focus::State => {
            let options = screen.form.regions().as_slice().len();
            match key.code {
                Up | Down => {
                    screen.state_index = step(screen.state_index, options, key.code == Down);
                    Action::None
                }
                Enter | Char(' ') => {
                    let code = screen
                        .state_index
                        .checked_sub(1)
                        .and_then(|index| screen.form.regions().as_slice().get(index))
                        .cloned()
                        .unwrap_or_else(RegionCode::unselected);
                    screen.city_index = 0;
                    Action::Form(FormEvent::SelectRegion(code))
                }
                Char('r') => Action::Form(FormEvent::Retry(Resource::Regions)),
                _ => Action::None,
            }
        }

        Focus::City => {
            let options = screen.form.sub_regions().as_slice().len();
            match key.code {
                Up | Down => {
                    screen.city_index = step(screen.city_index, options, key.code == Down);
                    Action::None
                }
                Enter | Char(' ') => {
                    let name = screen
                        .city_index
                        .checked_sub(1)
                        .and_then(|index| screen.form.sub_regions().as_slice().get(index))
                        .cloned()
                        .unwrap_or_else(SubRegionName::unselected);
                    Action::Form(FormEvent::SelectSubRegion(name))
                }
                Char('r') => Action::Form(FormEvent::Retry(Resource::SubRegions)),
                _ => Action::None,
            }
        }

        Focus::Items => {
            let categories = screen.form.categories().as_slice();
            match key.code {
                Up => {
                    screen.item_index = screen.item_index.saturating_sub(1);
                    Action::None
                }
                Down => {
                    if screen.item_index + 1 < categories.len() {
                        screen.item_index += 1;
                    }
                    Action::None
                }
                Enter | Char(' ') => categories
                    .get(screen.item_index)
                    .map_or(Action::None, |item| {
                        Action::Form(FormEvent::ToggleCategory(item.id))
                    }),
                Char('r') => Action::Form(FormEvent::Retry(Resource::Categories)),
                _ => Action::None,
            }
        }

        Focus::Submit => match key.code {
            Enter | Char(' ') => try_submit(app),
            _ => Action::None,
        },
    }
}

/// Move a cursor over a list of `options` entries plus the leading placeholder.
fn step(index: usize, options: usize, down: bool) -> usize {
    if down {
        (index + 1).min(options)
    } else {
        index.saturating_sub(1).min(options)
    }
}

/// Submit unless a contact field is missing or malformed, like a browser form would.
fn try_submit(app: &mut App) -> Action {
    if let Some(field) = app.create.form.contact().first_invalid() {
        app.error_message = Some(format!("Please fill in a valid {}", field.label()));
        app.create.focus = Focus::Field(field);
        return Action::None;
    }
    Action::Form(FormEvent::Submit)
}

pub(crate) fn handle_mouse_event(mouse: MouseEvent, app: &mut App) -> Action {
    if app.screen != Screen::CreatePoint {
        return Action::None;
    }
    let Some(areas) = ui::create_point_areas(app.viewport) else {
        return Action::None;
    };

    let canvas = ui::inner(areas.map);
    let position = Position::new(mouse.column, mouse.row);
    if !canvas.contains(position) {
        return Action::None;
    }

    let screen = &mut app.create;
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            screen.focus = Focus::Map;
            screen
                .map
                .point_at(canvas, mouse.column, mouse.row, screen.form.initial_position())
                .map_or(Action::None, |point| {
                    Action::Form(FormEvent::SetMapPoint(point))
                })
        }
        MouseEventKind::ScrollUp => {
            screen.map.zoom_in();
            Action::None
        }
        MouseEventKind::ScrollDown => {
            screen.map.zoom_out();
            Action::None
        }
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ecoleta_core::{
        collaborators::Collaborators,
        form::{Effect, Request},
        model::{CategoryId, CategoryItem, ContactField, GeoPoint},
        service::RegistrationService,
    };
    use ratatui::layout::Rect;
    use reqwest::Client;

    use super::*;

    fn app() -> App {
        let client = Client::new();
        let collaborators = Collaborators::new(
            ecoleta_provider_api::catalog(client.clone(), "http://127.0.0.1:9"),
            ecoleta_provider_ibge::geography(client, "http://127.0.0.1:9"),
            ecoleta_provider_geoip::disabled(),
        );
        let mut app = App::new(RegistrationService::new(Arc::new(collaborators)), 4);
        app.open_create_point();
        app.viewport = Rect::new(0, 0, 120, 40);
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(character: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(character), KeyModifiers::CONTROL)
    }

    fn press(app: &mut App, code: KeyCode) -> Action {
        let action = handle_key_event(key(code), app);
        if let Action::Form(event) = action.clone() {
            app.apply(event);
        }
        action
    }

    fn type_text(app: &mut App, text: &str) {
        for character in text.chars() {
            press(app, KeyCode::Char(character));
        }
    }

    #[test]
    fn opening_requests_every_list() {
        let mut app = app();
        let effects = app.open_create_point();

        assert_eq!(effects.len(), 3);
        assert!(effects.contains(&Effect::Request(Request::FetchRegions)));
    }

    #[test]
    fn typing_edits_only_the_focused_field() {
        let mut app = app();
        type_text(&mut app, "Ong A");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "a@a.com");
        press(&mut app, KeyCode::Backspace);

        assert_eq!(app.create.form.contact().name, "Ong A");
        assert_eq!(app.create.form.contact().email, "a@a.co");
        assert!(app.create.form.contact().whatsapp.is_empty());
    }

    #[test]
    fn submit_is_blocked_until_contact_fields_are_valid() {
        let mut app = app();
        type_text(&mut app, "Ong A");

        let action = handle_key_event(ctrl('s'), &mut app);

        assert_eq!(action, Action::None);
        assert_eq!(app.create.focus, Focus::Field(ContactField::Email));
        assert!(app.error_message.is_some());

        type_text(&mut app, "a@a.com");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "119999");
        assert_eq!(handle_key_event(ctrl('s'), &mut app), Action::Form(FormEvent::Submit));
    }

    #[test]
    fn validation_message_replaces_an_earlier_create_failure() {
        let mut app = app();
        app.apply(FormEvent::Submit);
        app.apply(FormEvent::PointCreated(Err("Unexpected status: 500".to_owned())));
        let (before, _) = ui::status_line(&app);
        assert!(before.starts_with("Registration failed"), "{before}");

        assert_eq!(handle_key_event(ctrl('s'), &mut app), Action::None);

        let (after, _) = ui::status_line(&app);
        assert!(after.starts_with("Please fill in a valid Entity name"), "{after}");
    }

    #[test]
    fn state_list_selects_by_cursor_with_placeholder_first() {
        let mut app = app();
        app.apply(FormEvent::RegionsLoaded(Ok(vec![
            RegionCode::from("RJ"),
            RegionCode::from("SP"),
        ])));
        app.create.focus = Focus::State;

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        let action = handle_key_event(key(KeyCode::Enter), &mut app);
        assert_eq!(
            action,
            Action::Form(FormEvent::SelectRegion(RegionCode::from("SP")))
        );

        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        let action = handle_key_event(key(KeyCode::Enter), &mut app);
        assert_eq!(
            action,
            Action::Form(FormEvent::SelectRegion(RegionCode::unselected()))
        );
    }

    #[test]
    fn items_toggle_under_the_cursor() {
        let mut app = app();
        app.apply(FormEvent::CategoriesLoaded(Ok(vec![
            CategoryItem {
                id: CategoryId(1),
                title: "Lâmpadas".to_owned(),
                image_url: "u1".to_owned(),
            },
            CategoryItem {
                id: CategoryId(2),
                title: "Pilhas e Baterias".to_owned(),
                image_url: "u2".to_owned(),
            },
        ])));
        app.create.focus = Focus::Items;

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.create.form.selected_categories().contains(CategoryId(2)));

        press(&mut app, KeyCode::Enter);
        assert!(app.create.form.selected_categories().is_empty());
    }

    #[test]
    fn map_enter_places_marker_at_the_view_centre() {
        let mut app = app();
        app.apply(FormEvent::LocationResolved(Ok(GeoPoint::new(-23.5, -46.6))));
        app.create.focus = Focus::Map;

        press(&mut app, KeyCode::Enter);

        assert_eq!(app.create.form.selected_position(), GeoPoint::new(-23.5, -46.6));
    }

    #[test]
    fn clicking_the_map_places_a_marker() {
        let mut app = app();
        let areas = ui::create_point_areas(app.viewport).expect("layout fits");
        let canvas = ui::inner(areas.map);

        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: canvas.x + 1,
            row: canvas.y + 1,
            modifiers: KeyModifiers::NONE,
        };
        let action = handle_mouse_event(mouse, &mut app);

        assert!(matches!(action, Action::Form(FormEvent::SetMapPoint(_))));
        assert_eq!(app.create.focus, Focus::Map);
    }

    #[test]
    fn clicks_outside_the_map_are_ignored() {
        let mut app = app();
        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };

        assert_eq!(handle_mouse_event(mouse, &mut app), Action::None);
    }

    #[test]
    fn escape_returns_home_and_drops_late_answers() {
        let mut app = app();
        let generation = app.generation;

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Home);

        let effects = app.receive(generation, FormEvent::PointCreated(Ok(())));
        assert!(effects.is_empty());
    }
}
