use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::PieceInput;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pieces")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub publisher_id: Option<i32>,
    pub difficulty: String, // '' when unset, else 'EASY' .. 'DIFFICULT'
    pub status: String,     // '' when unset, else 'OWNED', 'RENTED', ...
    pub location_drawer: String,
    pub location_number: String,
    pub copyright_date: Option<Date>,
    pub purchase_date: Option<Date>,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::publisher::Entity",
        from = "Column::PublisherId",
        to = "super::publisher::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Publisher,
    #[sea_orm(has_one = "super::piece_organization_relationship::Entity")]
    OrganizationRelationship,
}

impl Related<super::publisher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Publisher.def()
    }
}

impl Related<super::piece_organization_relationship::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrganizationRelationship.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Scalar columns only; association sets and the relationship record
    /// are written by the repository.
    pub fn apply(&mut self, input: &PieceInput) {
        self.title = Set(input.title.clone());
        self.publisher_id = Set(input.publisher_id);
        self.difficulty = Set(input
            .difficulty
            .map(|d| d.as_str().to_string())
            .unwrap_or_default());
        self.status = Set(input
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or_default());
        self.location_drawer = Set(input.location_drawer.clone());
        self.location_number = Set(input.location_number.clone());
        self.copyright_date = Set(input.copyright_date);
        self.purchase_date = Set(input.purchase_date);
        self.notes = Set(input.notes.clone());
    }
}
