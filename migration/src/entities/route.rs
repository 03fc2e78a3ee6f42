use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "routes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub origin_iata: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub destination_iata: String,
    pub destination_city: String,
    pub flights_per_day: Option<String>,
    pub has_flight_data: bool,
    pub average_duration: Option<String>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
