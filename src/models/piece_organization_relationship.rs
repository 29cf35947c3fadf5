use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{OrganizationKind, OrganizationRef, PieceRelationship, RelationshipType};

/// One row per piece at most. `organization_kind` + `organization_id` point
/// into one of the three organization tables.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "piece_organization_relationships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub piece_id: i32,
    pub relationship_type: String, // 'RENTED', 'ON_LOAN', 'BORROWED'
    pub organization_kind: String, // 'rental', 'loaning', 'borrowing'
    pub organization_id: i32,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub rental_cost_cents: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::piece::Entity",
        from = "Column::PieceId",
        to = "super::piece::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Piece,
}

impl Related<super::piece::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Piece.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Rebuild the domain value; `None` if the stored row is inconsistent.
    pub fn to_domain(&self) -> Option<PieceRelationship> {
        let relationship_type = RelationshipType::parse(&self.relationship_type)?;
        let kind = OrganizationKind::parse(&self.organization_kind)?;
        PieceRelationship::new(
            relationship_type,
            OrganizationRef::new(kind, self.organization_id),
            self.start_date,
            self.end_date,
            self.rental_cost_cents,
        )
        .ok()
    }
}
