use sea_orm::{entity::prelude::*, Set, ActiveModelTrait, ConnectionTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

pub const TITLE_MAX_LEN: usize = 255;
pub const DESCRIPTION_MAX_LEN: usize = 255;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_title(title: &str) -> Result<(), errors::ModelError> {
    if title.trim().is_empty() {
        return Err(errors::ModelError::invalid("title", "must not be empty"));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(errors::ModelError::invalid("title", format!("must be at most {TITLE_MAX_LEN} characters")));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), errors::ModelError> {
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(errors::ModelError::invalid("description", format!("must be at most {DESCRIPTION_MAX_LEN} characters")));
    }
    Ok(())
}

pub fn validate_owner_id(owner_id: &str) -> Result<(), errors::ModelError> {
    if owner_id.is_empty() || owner_id.chars().count() > 255 {
        return Err(errors::ModelError::invalid("owner_id", "must be 1..=255 characters"));
    }
    Ok(())
}

/// Insert a new item owned by `owner_id`.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    owner_id: &str,
    title: &str,
    description: Option<&str>,
) -> Result<Model, errors::ModelError> {
    validate_owner_id(owner_id)?;
    validate_title(title)?;
    if let Some(d) = description { validate_description(d)?; }

    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id.to_string()),
        title: Set(title.to_string()),
        description: Set(description.map(str::to_string)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
