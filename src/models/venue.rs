use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{Venue, VenueInput};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "venues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub contact_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub website: String,
    pub notes: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::concert::Entity")]
    Concert,
}

impl Related<super::concert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Concert.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn apply(&mut self, input: &VenueInput) {
        self.name = Set(input.name.clone());
        self.contact_name = Set(input.contact_name.clone());
        self.address = Set(input.address.clone());
        self.city = Set(input.city.clone());
        self.state = Set(input.state.clone());
        self.zip_code = Set(input.zip_code.clone());
        self.phone = Set(input.phone.clone());
        self.website = Set(input.website.clone());
        self.notes = Set(input.notes.clone());
    }
}

impl From<Model> for Venue {
    fn from(m: Model) -> Self {
        Venue {
            id: m.id,
            name: m.name,
            contact_name: m.contact_name,
            address: m.address,
            city: m.city,
            state: m.state,
            zip_code: m.zip_code,
            phone: m.phone,
            website: m.website,
            notes: m.notes,
        }
    }
}
