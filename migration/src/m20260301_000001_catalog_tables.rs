use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 机场目录
        manager
            .create_table(
                Table::create()
                    .table(Airport::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Airport::Iata)
                            .string_len(3)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Airport::Name).string().not_null())
                    .col(ColumnDef::new(Airport::City).string().not_null())
                    .col(ColumnDef::new(Airport::Country).string().not_null())
                    .col(
                        ColumnDef::new(Airport::DepartureCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Airport::ArrivalCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Airport::DestinationsCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Airport::Latitude).double().null())
                    .col(ColumnDef::new(Airport::Longitude).double().null())
                    .col(ColumnDef::new(Airport::Terminals).text().null())
                    .col(ColumnDef::new(Airport::Pois).text().null())
                    .col(
                        ColumnDef::new(Airport::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 航线目录，(origin, destination) 复合主键
        manager
            .create_table(
                Table::create()
                    .table(Route::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Route::OriginIata).string_len(3).not_null())
                    .col(
                        ColumnDef::new(Route::DestinationIata)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Route::DestinationCity).string().not_null())
                    .col(ColumnDef::new(Route::FlightsPerDay).string().null())
                    .col(
                        ColumnDef::new(Route::HasFlightData)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Route::AverageDuration).string().null())
                    .col(
                        ColumnDef::new(Route::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(Route::OriginIata)
                            .col(Route::DestinationIata),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Airline::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Airline::Iata)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Airline::Name).string().not_null())
                    .col(ColumnDef::new(Airline::Country).string().not_null())
                    .to_owned(),
            )
            .await?;

        // 原始航班记录（只读输入，代码字段允许为空）
        manager
            .create_table(
                Table::create()
                    .table(FlightLeg::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FlightLeg::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FlightLeg::AirlineIata).string().null())
                    .col(ColumnDef::new(FlightLeg::OriginIata).string().null())
                    .col(ColumnDef::new(FlightLeg::DestinationIata).string().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FlightLeg::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Airline::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Route::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Airport::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Airport {
    #[sea_orm(iden = "airports")]
    Table,
    Iata,
    Name,
    City,
    Country,
    DepartureCount,
    ArrivalCount,
    DestinationsCount,
    Latitude,
    Longitude,
    Terminals,
    Pois,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Route {
    #[sea_orm(iden = "routes")]
    Table,
    OriginIata,
    DestinationIata,
    DestinationCity,
    FlightsPerDay,
    HasFlightData,
    AverageDuration,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Airline {
    #[sea_orm(iden = "airlines")]
    Table,
    Iata,
    Name,
    Country,
}

#[derive(DeriveIden)]
pub(crate) enum FlightLeg {
    #[sea_orm(iden = "flight_legs")]
    Table,
    Id,
    AirlineIata,
    OriginIata,
    DestinationIata,
}
