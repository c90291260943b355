use ecoleta_core::{
    form::{Effect, FormEvent, RegistrationForm},
    model::{ContactField, GeoPoint},
    service::RegistrationService,
};
use ratatui::layout::Rect;

use crate::map::MapView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Home,
    CreatePoint,
}

/// Section of the create-point screen receiving keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Field(ContactField),
    Map,
    State,
    City,
    Items,
    Submit,
}

impl Focus {
    const ORDER: [Focus; 8] = [
        Focus::Field(ContactField::Name),
        Focus::Field(ContactField::Email),
        Focus::Field(ContactField::Whatsapp),
        Focus::Map,
        Focus::State,
        Focus::City,
        Focus::Items,
        Focus::Submit,
    ];

    fn position(self) -> usize {
        Self::ORDER
            .iter()
            .position(|focus| *focus == self)
            .unwrap_or(0)
    }

    pub(crate) fn next(self) -> Self {
        let index = (self.position() + 1) % Self::ORDER.len();
        Self::ORDER.get(index).copied().unwrap_or(self)
    }

    pub(crate) fn previous(self) -> Self {
        let index = (self.position() + Self::ORDER.len() - 1) % Self::ORDER.len();
        Self::ORDER.get(index).copied().unwrap_or(self)
    }
}

/// Cursor positions and map view of one create-point screen activation.
///
/// Index 0 of the state and city lists is the “nothing selected” entry.
pub(crate) struct CreatePointScreen {
    pub form: RegistrationForm,
    pub focus: Focus,
    pub state_index: usize,
    pub city_index: usize,
    pub item_index: usize,
    pub map: MapView,
}

impl CreatePointScreen {
    fn new(zoom: u8) -> Self {
        Self {
            form: RegistrationForm::new(),
            focus: Focus::Field(ContactField::Name),
            state_index: 0,
            city_index: 0,
            item_index: 0,
            map: MapView::new(zoom),
        }
    }

    pub(crate) fn map_center(&self) -> GeoPoint {
        self.map.center(self.form.initial_position())
    }
}

pub(crate) struct App {
    pub service: RegistrationService,

    pub screen: Screen,
    pub create: CreatePointScreen,
    /// Bumped on every activation so answers for a left screen can be dropped.
    pub generation: u64,
    pub default_zoom: u8,

    /// Terminal area of the last drawn frame, used to resolve mouse clicks.
    pub viewport: Rect,
    pub notice: Option<String>,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(service: RegistrationService, default_zoom: u8) -> Self {
        Self {
            service,
            screen: Screen::Home,
            create: CreatePointScreen::new(default_zoom),
            generation: 0,
            default_zoom,
            viewport: Rect::default(),
            notice: None,
            error_message: None,
        }
    }

    /// Enter a fresh create-point screen and return its start-up effects.
    pub(crate) fn open_create_point(&mut self) -> Vec<Effect> {
        self.generation += 1;
        self.create = CreatePointScreen::new(self.default_zoom);
        self.screen = Screen::CreatePoint;
        self.notice = None;
        self.error_message = None;
        self.create.form.activate()
    }

    pub(crate) fn go_home(&mut self, notice: Option<String>) {
        self.generation += 1;
        self.screen = Screen::Home;
        self.notice = notice;
        self.error_message = None;
    }

    /// Feed a user action to the active form.
    pub(crate) fn apply(&mut self, event: FormEvent) -> Vec<Effect> {
        if self.screen != Screen::CreatePoint {
            return Vec::new();
        }
        self.create.form.apply(event)
    }

    /// Feed a collaborator answer issued under `generation`.
    ///
    /// Answers addressed to an earlier activation are dropped.
    pub(crate) fn receive(&mut self, generation: u64, event: FormEvent) -> Vec<Effect> {
        if generation != self.generation {
            return Vec::new();
        }
        self.apply(event)
    }

    /// Handle the navigation effect emitted after a successful creation.
    pub(crate) fn navigate_home(&mut self) {
        let name = self.create.form.contact().name.trim().to_owned();
        self.go_home(Some(format!("Collection point “{name}” registered")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_cycles_both_ways() {
        let start = Focus::Field(ContactField::Name);
        assert_eq!(start.previous(), Focus::Submit);
        assert_eq!(Focus::Submit.next(), start);
        assert_eq!(Focus::Map.next(), Focus::State);
        assert_eq!(Focus::State.previous(), Focus::Map);
    }
}
