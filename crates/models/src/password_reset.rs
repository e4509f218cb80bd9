use chrono::{Duration, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "password_reset_token")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTimeWithTimeZone,
    pub used_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(crate::user::Entity)
                .from(Column::UserId)
                .to(crate::user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Issue a fresh one-shot token; validity window in hours.
pub async fn issue(
    db: &DatabaseConnection,
    user_id: Uuid,
    ttl_hours: i64,
) -> Result<Model, ModelError> {
    let now = Utc::now();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        token: Set(Uuid::new_v4().simple().to_string()),
        expires_at: Set((now + Duration::hours(ttl_hours)).into()),
        used_at: Set(None),
        created_at: Set(now.into()),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Mark a token as used if it is still live. Returns the row when consumed,
/// `None` for unknown, expired, or already-used tokens.
pub async fn consume(db: &DatabaseConnection, token: &str) -> Result<Option<Model>, ModelError> {
    let found = Entity::find()
        .filter(Column::Token.eq(token))
        .filter(Column::UsedAt.is_null())
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    let Some(row) = found else { return Ok(None) };
    if row.expires_at < Utc::now() {
        return Ok(None);
    }
    let mut am: ActiveModel = row.into();
    am.used_at = Set(Some(Utc::now().into()));
    let updated = am.update(db).await.map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(Some(updated))
}
