//! State and transitions of the collection point registration screen.
//!
//! [`RegistrationForm`] owns every piece of screen state. User actions and
//! collaborator responses both arrive as [`FormEvent`]s; each transition returns
//! the [`Effect`]s the caller must carry out (outbound requests, navigation).
//! Nothing in here performs I/O.

use tracing::{debug, warn};

use crate::model::{
    CategoryId, CategoryItem, ContactField, ContactFormData, GeoPoint, RegionCode,
    SelectedCategorySet, SubRegionName, SubmissionPayload,
};

#[derive(Debug, Clone, PartialEq, Default)]
/// Progress of one asynchronously loaded value.
pub enum LoadState<T> {
    /// Never requested.
    #[default]
    Unloaded,
    /// Request in flight.
    Loading,
    /// Request succeeded.
    Loaded(T),
    /// Request failed with the given message.
    Failed(String),
}

impl<T> LoadState<T> {
    /// Whether a request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// Loaded value, if any.
    #[must_use]
    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// Failure message, if the last request failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    fn settle(result: Result<T, String>) -> Self {
        result.map_or_else(LoadState::Failed, LoadState::Loaded)
    }
}

impl<T> LoadState<Vec<T>> {
    /// Loaded entries, or an empty slice while nothing is loaded.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.loaded().map_or(&[], Vec::as_slice)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Progress of the point creation request.
pub enum SubmitState {
    /// Nothing submitted, or ready to submit again.
    #[default]
    Idle,
    /// Create request in flight; further submits are ignored.
    Submitting,
    /// Last create request failed with the given message.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Lists that can be re-requested after a failure.
pub enum Resource {
    /// Material categories from the backend.
    Categories,
    /// State codes from the geography service.
    Regions,
    /// Cities of the selected state.
    SubRegions,
}

#[derive(Debug, Clone, PartialEq)]
/// Outbound request the caller must perform and answer with a [`FormEvent`].
pub enum Request {
    /// Resolve the current position; answer with [`FormEvent::LocationResolved`].
    Locate,
    /// List categories; answer with [`FormEvent::CategoriesLoaded`].
    FetchCategories,
    /// List state codes; answer with [`FormEvent::RegionsLoaded`].
    FetchRegions,
    /// List cities of a state; answer with [`FormEvent::SubRegionsLoaded`] carrying the same code.
    FetchSubRegions(RegionCode),
    /// Create the point; answer with [`FormEvent::PointCreated`].
    CreatePoint(SubmissionPayload),
}

#[derive(Debug, Clone, PartialEq)]
/// Side effect requested by a transition.
pub enum Effect {
    /// Perform an outbound request.
    Request(Request),
    /// Leave the screen for the home screen.
    NavigateHome,
}

#[derive(Debug, Clone, PartialEq)]
/// Input to the registration screen: user actions and collaborator answers.
pub enum FormEvent {
    /// User picked a state.
    SelectRegion(RegionCode),
    /// User picked a city.
    SelectSubRegion(SubRegionName),
    /// User clicked the map.
    SetMapPoint(GeoPoint),
    /// User edited a contact field.
    UpdateField(ContactField, String),
    /// User clicked a category.
    ToggleCategory(CategoryId),
    /// User submitted the form.
    Submit,
    /// User asked to reload a list.
    Retry(Resource),
    /// Answer to [`Request::Locate`].
    LocationResolved(Result<GeoPoint, String>),
    /// Answer to [`Request::FetchCategories`].
    CategoriesLoaded(Result<Vec<CategoryItem>, String>),
    /// Answer to [`Request::FetchRegions`].
    RegionsLoaded(Result<Vec<RegionCode>, String>),
    /// Answer to [`Request::FetchSubRegions`].
    SubRegionsLoaded {
        /// State the request was issued for.
        region: RegionCode,
        /// Cities, or the failure message.
        result: Result<Vec<SubRegionName>, String>,
    },
    /// Answer to [`Request::CreatePoint`].
    PointCreated(Result<(), String>),
}

#[derive(Debug, Clone, Default)]
/// Owned state of one registration screen activation.
pub struct RegistrationForm {
    categories: LoadState<Vec<CategoryItem>>,
    regions: LoadState<Vec<RegionCode>>,
    selected_region: RegionCode,
    sub_regions: LoadState<Vec<SubRegionName>>,
    selected_sub_region: SubRegionName,
    initial_position: GeoPoint,
    selected_position: GeoPoint,
    selected_categories: SelectedCategorySet,
    contact: ContactFormData,
    submit: SubmitState,
}

impl RegistrationForm {
    /// Fresh, empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the screen: locate the device and load categories and states.
    ///
    /// The three requests are independent and may be answered in any order.
    pub fn activate(&mut self) -> Vec<Effect> {
        self.categories = LoadState::Loading;
        self.regions = LoadState::Loading;
        vec![
            Effect::Request(Request::Locate),
            Effect::Request(Request::FetchCategories),
            Effect::Request(Request::FetchRegions),
        ]
    }

    /// Apply one event and return the effects it causes.
    pub fn apply(&mut self, event: FormEvent) -> Vec<Effect> {
        match event {
            FormEvent::SelectRegion(code) => self.select_region(code),
            FormEvent::SelectSubRegion(name) => {
                self.selected_sub_region = name;
                Vec::new()
            }
            FormEvent::SetMapPoint(point) => {
                self.selected_position = point;
                Vec::new()
            }
            FormEvent::UpdateField(field, value) => {
                self.contact.set(field, value);
                Vec::new()
            }
            FormEvent::ToggleCategory(id) => {
                self.selected_categories.toggle(id);
                Vec::new()
            }
            FormEvent::Submit => self.submit(),
            FormEvent::Retry(resource) => self.retry(resource),
            FormEvent::LocationResolved(result) => {
                match result {
                    Ok(point) => self.initial_position = point,
                    Err(err) => warn!(error = %err, "could not resolve current position"),
                }
                Vec::new()
            }
            FormEvent::CategoriesLoaded(result) => {
                self.categories = LoadState::settle(result);
                Vec::new()
            }
            FormEvent::RegionsLoaded(result) => {
                self.regions = LoadState::settle(result);
                Vec::new()
            }
            FormEvent::SubRegionsLoaded { region, result } => {
                if region == self.selected_region {
                    self.sub_regions = LoadState::settle(result);
                } else {
                    debug!(
                        %region,
                        selected = %self.selected_region,
                        "discarding cities for a state that is no longer selected"
                    );
                }
                Vec::new()
            }
            FormEvent::PointCreated(result) => match result {
                Ok(()) => {
                    self.submit = SubmitState::Idle;
                    vec![Effect::NavigateHome]
                }
                Err(err) => {
                    warn!(error = %err, "collection point was not created");
                    self.submit = SubmitState::Failed(err);
                    Vec::new()
                }
            },
        }
    }

    fn select_region(&mut self, code: RegionCode) -> Vec<Effect> {
        if code == self.selected_region {
            return Vec::new();
        }

        self.selected_region = code;
        self.selected_sub_region = SubRegionName::unselected();

        if self.selected_region.is_unselected() {
            self.sub_regions = LoadState::Unloaded;
            Vec::new()
        } else {
            self.sub_regions = LoadState::Loading;
            vec![Effect::Request(Request::FetchSubRegions(
                self.selected_region.clone(),
            ))]
        }
    }

    fn submit(&mut self) -> Vec<Effect> {
        if self.submit == SubmitState::Submitting {
            debug!("submit ignored while a create request is in flight");
            return Vec::new();
        }

        self.submit = SubmitState::Submitting;
        vec![Effect::Request(Request::CreatePoint(self.payload()))]
    }

    fn retry(&mut self, resource: Resource) -> Vec<Effect> {
        let request = match resource {
            Resource::Categories if !self.categories.is_loading() => {
                self.categories = LoadState::Loading;
                Request::FetchCategories
            }
            Resource::Regions if !self.regions.is_loading() => {
                self.regions = LoadState::Loading;
                Request::FetchRegions
            }
            Resource::SubRegions
                if !self.sub_regions.is_loading() && !self.selected_region.is_unselected() =>
            {
                self.sub_regions = LoadState::Loading;
                Request::FetchSubRegions(self.selected_region.clone())
            }
            _ => return Vec::new(),
        };
        vec![Effect::Request(request)]
    }

    /// Body the next submit would send.
    ///
    /// Contact values are sent trimmed, matching what `first_invalid` checks.
    #[must_use]
    pub fn payload(&self) -> SubmissionPayload {
        SubmissionPayload {
            name: self.contact.name.trim().to_owned(),
            email: self.contact.email.trim().to_owned(),
            whatsapp: self.contact.whatsapp.trim().to_owned(),
            uf: self.selected_region.clone(),
            city: self.selected_sub_region.clone(),
            latitude: self.selected_position.latitude,
            longitude: self.selected_position.longitude,
            items: self.selected_categories.to_vec(),
        }
    }

    /// Category list state.
    #[must_use]
    pub fn categories(&self) -> &LoadState<Vec<CategoryItem>> {
        &self.categories
    }

    /// State code list state.
    #[must_use]
    pub fn regions(&self) -> &LoadState<Vec<RegionCode>> {
        &self.regions
    }

    /// Currently selected state, possibly the sentinel.
    #[must_use]
    pub fn selected_region(&self) -> &RegionCode {
        &self.selected_region
    }

    /// City list state for the selected state.
    #[must_use]
    pub fn sub_regions(&self) -> &LoadState<Vec<SubRegionName>> {
        &self.sub_regions
    }

    /// Currently selected city, possibly the sentinel.
    #[must_use]
    pub fn selected_sub_region(&self) -> &SubRegionName {
        &self.selected_sub_region
    }

    /// Device-derived default map position.
    #[must_use]
    pub fn initial_position(&self) -> GeoPoint {
        self.initial_position
    }

    /// Point the user clicked, `(0, 0)` until the first click.
    #[must_use]
    pub fn selected_position(&self) -> GeoPoint {
        self.selected_position
    }

    /// Selected category ids.
    #[must_use]
    pub fn selected_categories(&self) -> &SelectedCategorySet {
        &self.selected_categories
    }

    /// Contact fields.
    #[must_use]
    pub fn contact(&self) -> &ContactFormData {
        &self.contact
    }

    /// Create request progress.
    #[must_use]
    pub fn submit_state(&self) -> &SubmitState {
        &self.submit
    }
}
