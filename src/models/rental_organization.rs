use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{Organization, OrganizationInput, OrganizationKind};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rental_organizations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub website: String,
    pub notes: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn apply(&mut self, input: &OrganizationInput) {
        self.name = Set(input.name.clone());
        self.contact_name = Set(input.contact_name.clone());
        self.contact_email = Set(input.contact_email.clone());
        self.contact_phone = Set(input.contact_phone.clone());
        self.website = Set(input.website.clone());
        self.notes = Set(input.notes.clone());
    }
}

impl From<Model> for Organization {
    fn from(m: Model) -> Self {
        Organization {
            id: m.id,
            kind: OrganizationKind::Rental,
            name: m.name,
            contact_name: m.contact_name,
            contact_email: m.contact_email,
            contact_phone: m.contact_phone,
            website: m.website,
            notes: m.notes,
        }
    }
}
