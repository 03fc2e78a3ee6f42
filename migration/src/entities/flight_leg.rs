use sea_orm::entity::prelude::*;

/// 原始航班记录，三个代码在上游数据中都可能缺失
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "flight_legs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub airline_iata: Option<String>,
    pub origin_iata: Option<String>,
    pub destination_iata: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
