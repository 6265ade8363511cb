use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::errors::{FieldError, ServiceError};
use crate::pagination::Page;

/// Item as exposed by the service (business view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<models::item::Model> for Item {
    fn from(m: models::item::Model) -> Self {
        Self {
            id: m.id,
            owner_id: m.owner_id,
            title: m.title,
            description: m.description,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

pub type ItemsPage = Page<Item>;

/// Fields accepted on create. There is no owner field: the owner is
/// always the authenticated creator, and an `owner_id` in the request body is dropped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ItemCreate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        let mut errors = Vec::new();
        if let Err(e) = models::item::validate_title(&self.title) {
            errors.push(field_error(e));
        }
        if let Some(d) = &self.description {
            if let Err(e) = models::item::validate_description(d) {
                errors.push(field_error(e));
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(ServiceError::Validation(errors)) }
    }
}

/// Tri-state field for partial updates.
///
/// Deserialize with `#[serde(default)]`: a missing key stays `Absent`, `null` becomes
/// `Null`, anything else `Value`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool { matches!(self, Patch::Absent) }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

/// Partial update as received.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ItemUpdate {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
}

/// Validated partial update handed to stores. `title` cannot be cleared, so it is a
/// plain option; `description` keeps all three states.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemChanges {
    pub title: Option<String>,
    pub description: Patch<String>,
}

impl ItemChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_absent()
    }

    /// Merge into `item`, leaving absent fields untouched. Returns whether anything was
    /// written.
    pub fn apply_to(self, item: &mut Item) -> bool {
        let mut changed = false;
        if let Some(t) = self.title {
            item.title = t;
            changed = true;
        }
        match self.description {
            Patch::Absent => {}
            Patch::Null => { item.description = None; changed = true; }
            Patch::Value(d) => { item.description = Some(d); changed = true; }
        }
        changed
    }
}

impl TryFrom<ItemUpdate> for ItemChanges {
    type Error = ServiceError;

    fn try_from(u: ItemUpdate) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();
        let title = match u.title {
            Patch::Absent => None,
            Patch::Null => {
                errors.push(FieldError::new("title", "must not be null"));
                None
            }
            Patch::Value(t) => {
                if let Err(e) = models::item::validate_title(&t) { errors.push(field_error(e)); }
                Some(t)
            }
        };
        if let Patch::Value(d) = &u.description {
            if let Err(e) = models::item::validate_description(d) { errors.push(field_error(e)); }
        }
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }
        Ok(Self { title, description: u.description })
    }
}

fn field_error(e: models::errors::ModelError) -> FieldError {
    match e {
        models::errors::ModelError::Validation { field, message } => FieldError::new(field, message),
        models::errors::ModelError::Db(msg) => FieldError::new("_", msg),
    }
}
