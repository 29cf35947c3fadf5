use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "piece_composers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub piece_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub composer_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::piece::Entity",
        from = "Column::PieceId",
        to = "super::piece::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Piece,
    #[sea_orm(
        belongs_to = "super::composer::Entity",
        from = "Column::ComposerId",
        to = "super::composer::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Composer,
}

impl ActiveModelBehavior for ActiveModel {}
