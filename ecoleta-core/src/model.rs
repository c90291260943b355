//! Domain data structures for categories, regions, positions, and submissions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value the region and city selectors hold while nothing is selected.
pub const UNSELECTED: &str = "0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Identifier of a recyclable-material category.
pub struct CategoryId(pub i64);

impl fmt::Display for CategoryId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Recyclable-material type a collection point can accept.
pub struct CategoryItem {
    /// Backend identifier.
    pub id: CategoryId,
    /// Display title, e.g. “Lâmpadas”.
    pub title: String,
    /// Icon location served by the backend.
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Abbreviation of a federative unit (state), e.g. `SP`.
pub struct RegionCode(pub String);

impl RegionCode {
    /// The “no state selected” value.
    #[must_use]
    pub fn unselected() -> Self {
        Self(UNSELECTED.to_owned())
    }

    /// Whether this is the unselected sentinel rather than a real code.
    #[must_use]
    pub fn is_unselected(&self) -> bool {
        self.0 == UNSELECTED
    }

    /// Borrow the raw code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RegionCode {
    fn default() -> Self {
        Self::unselected()
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for RegionCode {
    fn from(code: &str) -> Self {
        Self(code.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Name of a municipality inside a region.
pub struct SubRegionName(pub String);

impl SubRegionName {
    /// The “no city selected” value.
    #[must_use]
    pub fn unselected() -> Self {
        Self(UNSELECTED.to_owned())
    }

    /// Whether this is the unselected sentinel rather than a real name.
    #[must_use]
    pub fn is_unselected(&self) -> bool {
        self.0 == UNSELECTED
    }

    /// Borrow the raw name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SubRegionName {
    fn default() -> Self {
        Self::unselected()
    }
}

impl fmt::Display for SubRegionName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for SubRegionName {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
/// Latitude/longitude pair in decimal degrees.
pub struct GeoPoint {
    /// Latitude, positive north.
    pub latitude: f64,
    /// Longitude, positive east.
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point from latitude and longitude.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Contact fields of the registration form.
pub enum ContactField {
    /// Entity name.
    Name,
    /// Contact e-mail.
    Email,
    /// `WhatsApp` number.
    Whatsapp,
}

impl ContactField {
    /// All fields in form order.
    pub const ALL: [ContactField; 3] = [
        ContactField::Name,
        ContactField::Email,
        ContactField::Whatsapp,
    ];

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ContactField::Name => "Entity name",
            ContactField::Email => "E-mail",
            ContactField::Whatsapp => "WhatsApp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Contact data typed by the user.
pub struct ContactFormData {
    /// Entity name.
    pub name: String,
    /// Contact e-mail.
    pub email: String,
    /// `WhatsApp` number.
    pub whatsapp: String,
}

impl ContactFormData {
    /// Current value of one field.
    #[must_use]
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Whatsapp => &self.whatsapp,
        }
    }

    /// Replace one field, leaving the other two untouched.
    pub fn set(&mut self, field: ContactField, value: String) {
        match field {
            ContactField::Name => self.name = value,
            ContactField::Email => self.email = value,
            ContactField::Whatsapp => self.whatsapp = value,
        }
    }

    /// First field that would block submission, if any.
    ///
    /// All three fields are required and the e-mail must look like an address.
    #[must_use]
    pub fn first_invalid(&self) -> Option<ContactField> {
        ContactField::ALL.into_iter().find(|field| {
            let value = self.get(*field).trim();
            value.is_empty() || (*field == ContactField::Email && !looks_like_email(value))
        })
    }
}

fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    value.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && !domain.is_empty() && !domain.contains('@')
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Body of the point creation request.
pub struct SubmissionPayload {
    /// Entity name.
    pub name: String,
    /// Contact e-mail.
    pub email: String,
    /// `WhatsApp` number.
    pub whatsapp: String,
    /// Selected state code.
    pub uf: RegionCode,
    /// Selected city.
    pub city: SubRegionName,
    /// Selected latitude.
    pub latitude: f64,
    /// Selected longitude.
    pub longitude: f64,
    /// Accepted categories.
    pub items: Vec<CategoryId>,
}

#[derive(Debug, Clone, Default, Eq)]
/// Categories the user picked, kept in the order they were picked.
///
/// Equality ignores order.
pub struct SelectedCategorySet(Vec<CategoryId>);

impl SelectedCategorySet {
    /// Remove `id` if present, otherwise add it.
    pub fn toggle(&mut self, id: CategoryId) {
        if let Some(position) = self.0.iter().position(|selected| *selected == id) {
            self.0.remove(position);
        } else {
            self.0.push(id);
        }
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: CategoryId) -> bool {
        self.0.contains(&id)
    }

    /// Number of selected categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Selected ids in selection order.
    pub fn iter(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.0.iter().copied()
    }

    /// Selected ids in selection order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<CategoryId> {
        self.0.clone()
    }
}

impl PartialEq for SelectedCategorySet {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().all(|id| other.0.contains(id))
    }
}

impl FromIterator<CategoryId> for SelectedCategorySet {
    fn from_iter<I: IntoIterator<Item = CategoryId>>(iter: I) -> Self {
        let mut set = Self::default();
        for id in iter {
            if !set.contains(id) {
                set.0.push(id);
            }
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_distinct_from_real_codes() {
        assert!(RegionCode::default().is_unselected());
        assert!(!RegionCode::from("SP").is_unselected());
        assert!(SubRegionName::default().is_unselected());
        assert!(!SubRegionName::from("São Paulo").is_unselected());
    }

    #[test]
    fn set_equality_ignores_order() {
        let first: SelectedCategorySet = [CategoryId(1), CategoryId(2)].into_iter().collect();
        let second: SelectedCategorySet = [CategoryId(2), CategoryId(1)].into_iter().collect();
        assert_eq!(first, second, "selection order must not matter");
    }

    #[test]
    fn collecting_drops_duplicates() {
        let set: SelectedCategorySet = [CategoryId(3), CategoryId(3), CategoryId(4)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2, "duplicates must collapse");
    }

    #[test]
    fn collected_duplicates_still_toggle_off_in_one_step() {
        let mut set: SelectedCategorySet = [CategoryId(1), CategoryId(1)].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert_ne!(set, [CategoryId(1), CategoryId(2)].into_iter().collect());

        set.toggle(CategoryId(1));
        assert!(!set.contains(CategoryId(1)));
        assert!(set.is_empty());
    }

    #[test]
    fn email_with_whitespace_is_invalid() {
        let mut contact = ContactFormData::default();
        contact.set(ContactField::Name, "Ong A".to_owned());
        contact.set(ContactField::Whatsapp, "119999".to_owned());

        for email in ["a b@c.com", "a@c .com", "a@\tc.com"] {
            contact.set(ContactField::Email, email.to_owned());
            assert_eq!(contact.first_invalid(), Some(ContactField::Email), "{email:?}");
        }

        contact.set(ContactField::Email, "  a@c.com ".to_owned());
        assert_eq!(contact.first_invalid(), None, "surrounding blanks are trimmed");
    }

    #[test]
    fn first_invalid_checks_required_fields_in_order() {
        let mut contact = ContactFormData::default();
        assert_eq!(contact.first_invalid(), Some(ContactField::Name));

        contact.set(ContactField::Name, "Ong A".to_owned());
        contact.set(ContactField::Email, "not-an-address".to_owned());
        assert_eq!(contact.first_invalid(), Some(ContactField::Email));

        contact.set(ContactField::Email, "a@a.com".to_owned());
        assert_eq!(contact.first_invalid(), Some(ContactField::Whatsapp));

        contact.set(ContactField::Whatsapp, "119999".to_owned());
        assert_eq!(contact.first_invalid(), None);
    }

    #[test]
    fn payload_serializes_with_backend_field_names() {
        let payload = SubmissionPayload {
            name: "Ong A".to_owned(),
            email: "a@a.com".to_owned(),
            whatsapp: "119999".to_owned(),
            uf: RegionCode::from("SP"),
            city: SubRegionName::from("São Paulo"),
            latitude: -23.5,
            longitude: -46.6,
            items: vec![CategoryId(1)],
        };

        let json = serde_json::to_value(&payload).expect("payload serializes");
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Ong A",
                "email": "a@a.com",
                "whatsapp": "119999",
                "uf": "SP",
                "city": "São Paulo",
                "latitude": -23.5,
                "longitude": -46.6,
                "items": [1]
            })
        );
    }

    #[test]
    fn category_item_reads_snake_case_image_url() {
        let item: CategoryItem = serde_json::from_str(
            r#"{"id": 1, "title": "Lâmpadas", "image_url": "http://localhost/lampadas.svg"}"#,
        )
        .expect("item deserializes");
        assert_eq!(item.id, CategoryId(1));
        assert_eq!(item.image_url, "http://localhost/lampadas.svg");
    }
}
