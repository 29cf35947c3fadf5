use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "concert_guests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub concert_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub guest_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::concert::Entity",
        from = "Column::ConcertId",
        to = "super::concert::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Concert,
    #[sea_orm(
        belongs_to = "super::guest::Entity",
        from = "Column::GuestId",
        to = "super::guest::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Guest,
}

impl ActiveModelBehavior for ActiveModel {}
