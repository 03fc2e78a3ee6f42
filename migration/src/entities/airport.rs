use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "airports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub iata: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub departure_count: i64,
    pub arrival_count: i64,
    pub destinations_count: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// JSON 数组（航站楼名称）
    #[sea_orm(column_type = "Text", nullable)]
    pub terminals: Option<String>,
    /// JSON 数组（周边兴趣点）
    #[sea_orm(column_type = "Text", nullable)]
    pub pois: Option<String>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
