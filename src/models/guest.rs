use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{Person, PersonInput, PersonKind};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: Option<String>,
    pub last_name: String,
    pub instrument: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::concert::Entity> for Entity {
    fn to() -> RelationDef {
        super::concert_guest::Relation::Concert.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::concert_guest::Relation::Guest.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn apply(&mut self, input: &PersonInput) {
        self.first_name = Set(input.first_name.clone());
        self.last_name = Set(input.last_name.clone());
        self.instrument = Set(input.instrument.clone());
        self.description = Set(input.description.clone());
    }
}

impl From<Model> for Person {
    fn from(m: Model) -> Self {
        Person {
            id: m.id,
            kind: PersonKind::Guest,
            first_name: m.first_name,
            last_name: m.last_name,
            instrument: m.instrument,
            birth_year: None,
            honorific: String::new(),
            middle_initial: String::new(),
            description: m.description,
        }
    }
}
