use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{Genre, GenreInput};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "genres")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::piece::Entity> for Entity {
    fn to() -> RelationDef {
        super::piece_genre::Relation::Piece.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::piece_genre::Relation::Genre.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn apply(&mut self, input: &GenreInput) {
        self.name = Set(input.name.clone());
    }
}

impl From<Model> for Genre {
    fn from(m: Model) -> Self {
        Genre {
            id: m.id,
            name: m.name,
        }
    }
}
