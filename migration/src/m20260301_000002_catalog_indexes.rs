use sea_orm_migration::prelude::*;

use crate::m20260301_000001_catalog_tables::{Airport, FlightLeg, Route};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 每个航司的采样查询：WHERE airline_iata = ? ORDER BY id LIMIT cap
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_flight_legs_airline_id")
                    .table(FlightLeg::Table)
                    .col(FlightLeg::AirlineIata)
                    .col(FlightLeg::Id)
                    .to_owned(),
            )
            .await?;

        // top-K 枢纽机场
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_airports_departure_count")
                    .table(Airport::Table)
                    .col(Airport::DepartureCount)
                    .to_owned(),
            )
            .await?;

        // distinct origin（机场出港航线检查）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_routes_origin")
                    .table(Route::Table)
                    .col(Route::OriginIata)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop()
                    .name("idx_routes_origin")
                    .table(Route::Table)
                    .to_owned())
            .await?;
        manager
            .drop_index(Index::drop()
                    .name("idx_airports_departure_count")
                    .table(Airport::Table)
                    .to_owned())
            .await?;
        manager
            .drop_index(Index::drop()
                    .name("idx_flight_legs_airline_id")
                    .table(FlightLeg::Table)
                    .to_owned())
            .await
    }
}
