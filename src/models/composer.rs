use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{Person, PersonInput, PersonKind};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "composers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: Option<String>,
    pub last_name: String,
    pub instrument: String,
    pub birth_year: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::piece::Entity> for Entity {
    fn to() -> RelationDef {
        super::piece_composer::Relation::Piece.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::piece_composer::Relation::Composer.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn apply(&mut self, input: &PersonInput) {
        self.first_name = Set(input.first_name.clone());
        self.last_name = Set(input.last_name.clone());
        self.instrument = Set(input.instrument.clone());
        self.birth_year = Set(input.birth_year);
    }
}

impl From<Model> for Person {
    fn from(m: Model) -> Self {
        Person {
            id: m.id,
            kind: PersonKind::Composer,
            first_name: m.first_name,
            last_name: m.last_name,
            instrument: m.instrument,
            birth_year: m.birth_year,
            honorific: String::new(),
            middle_initial: String::new(),
            description: String::new(),
        }
    }
}
