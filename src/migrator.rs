use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_clients_table::Migration),
            Box::new(m20240101_000002_create_vendors_table::Migration),
            Box::new(m20240101_000003_create_vendor_pincodes_table::Migration),
            Box::new(m20240101_000004_create_zones_table::Migration),
            Box::new(m20240101_000005_create_rate_tables::Migration),
            Box::new(m20240101_000006_create_shipment_tables::Migration),
            Box::new(m20240101_000007_create_bills_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_clients_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_clients_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Clients::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Clients::ClientCode).string().not_null())
                        .col(ColumnDef::new(Clients::ClientName).string().not_null())
                        .col(ColumnDef::new(Clients::ContactNumber).string().null())
                        .col(ColumnDef::new(Clients::EmailId).string().null())
                        .col(ColumnDef::new(Clients::Address).string().null())
                        .col(ColumnDef::new(Clients::PinCode).string().null())
                        .col(ColumnDef::new(Clients::GstNumber).string().null())
                        .col(
                            ColumnDef::new(Clients::CftMultiplier)
                                .double()
                                .not_null()
                                .default(1.0),
                        )
                        .col(ColumnDef::new(Clients::CreatedBy).uuid().null())
                        .col(ColumnDef::new(Clients::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Clients::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_clients_client_code")
                        .table(Clients::Table)
                        .col(Clients::ClientCode)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Clients {
        Table,
        Id,
        ClientCode,
        ClientName,
        ContactNumber,
        EmailId,
        Address,
        PinCode,
        GstNumber,
        CftMultiplier,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_vendors_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_vendors_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Vendors::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Vendors::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Vendors::Name).string().not_null())
                        .col(ColumnDef::new(Vendors::ContactNumber).string().null())
                        .col(ColumnDef::new(Vendors::Email).string().null())
                        .col(ColumnDef::new(Vendors::Address).string().null())
                        .col(ColumnDef::new(Vendors::Pincode).string().null())
                        .col(ColumnDef::new(Vendors::GstNumber).string().null())
                        .col(ColumnDef::new(Vendors::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Vendors::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_vendors_name")
                        .table(Vendors::Table)
                        .col(Vendors::Name)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Vendors::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Vendors {
        Table,
        Id,
        Name,
        ContactNumber,
        Email,
        Address,
        Pincode,
        GstNumber,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_vendor_pincodes_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000002_create_vendors_table::Vendors;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_vendor_pincodes_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(VendorPincodes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(VendorPincodes::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(VendorPincodes::VendorId).uuid().not_null())
                        .col(ColumnDef::new(VendorPincodes::Pincode).string().not_null())
                        .col(
                            ColumnDef::new(VendorPincodes::Oda)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VendorPincodes::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_vendor_pincodes_vendor_id")
                                .from(VendorPincodes::Table, VendorPincodes::VendorId)
                                .to(Vendors::Table, Vendors::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_vendor_pincodes_vendor_pincode")
                        .table(VendorPincodes::Table)
                        .col(VendorPincodes::VendorId)
                        .col(VendorPincodes::Pincode)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(VendorPincodes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum VendorPincodes {
        Table,
        Id,
        VendorId,
        Pincode,
        Oda,
        CreatedAt,
    }
}

mod m20240101_000004_create_zones_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_zones_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Zones::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Zones::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Zones::Name).string().not_null())
                        .col(ColumnDef::new(Zones::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_zones_name")
                        .table(Zones::Table)
                        .col(Zones::Name)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Zones::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Zones {
        Table,
        Id,
        Name,
        CreatedAt,
    }
}

mod m20240101_000005_create_rate_tables {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_clients_table::Clients;
    use super::m20240101_000004_create_zones_table::Zones;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_rate_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ClientRates::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ClientRates::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ClientRates::ClientId).uuid().not_null())
                        .col(ColumnDef::new(ClientRates::Mode).string_len(16).not_null())
                        .col(
                            ColumnDef::new(ClientRates::Cft)
                                .double()
                                .not_null()
                                .default(1.0),
                        )
                        .col(
                            ColumnDef::new(ClientRates::MinimumWeight)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(ClientRates::MinimumFreight)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ClientRates::DocketCharges)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ClientRates::FuelPct)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ClientRates::FovPct)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ClientRates::OdaCharge)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ClientRates::OtherCharges)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(ClientRates::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(ClientRates::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_client_rates_client_id")
                                .from(ClientRates::Table, ClientRates::ClientId)
                                .to(Clients::Table, Clients::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_client_rates_client_mode")
                        .table(ClientRates::Table)
                        .col(ClientRates::ClientId)
                        .col(ClientRates::Mode)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ClientZoneRates::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ClientZoneRates::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ClientZoneRates::ClientRateId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ClientZoneRates::ZoneId).uuid().not_null())
                        .col(
                            ColumnDef::new(ClientZoneRates::RatePerKg)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ClientZoneRates::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_client_zone_rates_client_rate_id")
                                .from(ClientZoneRates::Table, ClientZoneRates::ClientRateId)
                                .to(ClientRates::Table, ClientRates::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_client_zone_rates_zone_id")
                                .from(ClientZoneRates::Table, ClientZoneRates::ZoneId)
                                .to(Zones::Table, Zones::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_client_zone_rates_rate_zone")
                        .table(ClientZoneRates::Table)
                        .col(ClientZoneRates::ClientRateId)
                        .col(ClientZoneRates::ZoneId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ClientZoneRates::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ClientRates::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ClientRates {
        Table,
        Id,
        ClientId,
        Mode,
        Cft,
        MinimumWeight,
        MinimumFreight,
        DocketCharges,
        FuelPct,
        FovPct,
        OdaCharge,
        OtherCharges,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum ClientZoneRates {
        Table,
        Id,
        ClientRateId,
        ZoneId,
        RatePerKg,
        CreatedAt,
    }
}

mod m20240101_000006_create_shipment_tables {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_clients_table::Clients;
    use super::m20240101_000002_create_vendors_table::Vendors;
    use super::m20240101_000004_create_zones_table::Zones;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_shipment_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Shipments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Shipments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Shipments::ClientId).uuid().not_null())
                        .col(ColumnDef::new(Shipments::VendorId).uuid().not_null())
                        .col(ColumnDef::new(Shipments::ZoneId).uuid().null())
                        .col(ColumnDef::new(Shipments::WflNumber).string().not_null())
                        .col(ColumnDef::new(Shipments::VendorAwbNumber).string().null())
                        .col(ColumnDef::new(Shipments::Mode).string_len(16).not_null())
                        .col(ColumnDef::new(Shipments::InvoiceNumber).string().null())
                        .col(
                            ColumnDef::new(Shipments::InvoiceValue)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Shipments::ConsignorFromLocation)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(Shipments::Consignee).string().null())
                        .col(ColumnDef::new(Shipments::Destination).string().null())
                        .col(ColumnDef::new(Shipments::PinCode).string().not_null())
                        .col(ColumnDef::new(Shipments::Oda).string_len(16).not_null())
                        .col(
                            ColumnDef::new(Shipments::TotalBox)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Shipments::ActualWeight)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(Shipments::ActualVolumetricWeight)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(Shipments::WflWeight)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(Shipments::WflVolumetricWeight)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(ColumnDef::new(Shipments::ShipmentDate).date().not_null())
                        .col(ColumnDef::new(Shipments::CreatedBy).uuid().null())
                        .col(ColumnDef::new(Shipments::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Shipments::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_shipments_client_id")
                                .from(Shipments::Table, Shipments::ClientId)
                                .to(Clients::Table, Clients::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_shipments_vendor_id")
                                .from(Shipments::Table, Shipments::VendorId)
                                .to(Vendors::Table, Vendors::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_shipments_zone_id")
                                .from(Shipments::Table, Shipments::ZoneId)
                                .to(Zones::Table, Zones::Id)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_shipments_client_date")
                        .table(Shipments::Table)
                        .col(Shipments::ClientId)
                        .col(Shipments::ShipmentDate)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_shipments_wfl_number")
                        .table(Shipments::Table)
                        .col(Shipments::WflNumber)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ShipmentBoxes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ShipmentBoxes::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ShipmentBoxes::ShipmentId).uuid().not_null())
                        .col(
                            ColumnDef::new(ShipmentBoxes::LineIndex)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShipmentBoxes::NumberOfPieces)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ShipmentBoxes::LengthCm).double().not_null())
                        .col(ColumnDef::new(ShipmentBoxes::BreadthCm).double().not_null())
                        .col(ColumnDef::new(ShipmentBoxes::HeightCm).double().not_null())
                        .col(
                            ColumnDef::new(ShipmentBoxes::ActualWeightPerPiece)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShipmentBoxes::VolumetricWeightPerPiece)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShipmentBoxes::TotalVolumetricWeight)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShipmentBoxes::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_shipment_boxes_shipment_id")
                                .from(ShipmentBoxes::Table, ShipmentBoxes::ShipmentId)
                                .to(Shipments::Table, Shipments::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_shipment_boxes_shipment_id")
                        .table(ShipmentBoxes::Table)
                        .col(ShipmentBoxes::ShipmentId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ShipmentBoxes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Shipments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Shipments {
        Table,
        Id,
        ClientId,
        VendorId,
        ZoneId,
        WflNumber,
        VendorAwbNumber,
        Mode,
        InvoiceNumber,
        InvoiceValue,
        ConsignorFromLocation,
        Consignee,
        Destination,
        PinCode,
        Oda,
        TotalBox,
        ActualWeight,
        ActualVolumetricWeight,
        WflWeight,
        WflVolumetricWeight,
        ShipmentDate,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum ShipmentBoxes {
        Table,
        Id,
        ShipmentId,
        LineIndex,
        NumberOfPieces,
        LengthCm,
        BreadthCm,
        HeightCm,
        ActualWeightPerPiece,
        VolumetricWeightPerPiece,
        TotalVolumetricWeight,
        CreatedAt,
    }
}

mod m20240101_000007_create_bills_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_clients_table::Clients;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_bills_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Bills::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Bills::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Bills::ClientId).uuid().not_null())
                        .col(ColumnDef::new(Bills::PeriodStart).date().not_null())
                        .col(ColumnDef::new(Bills::PeriodEnd).date().not_null())
                        .col(ColumnDef::new(Bills::TotalAmount).decimal().not_null())
                        .col(ColumnDef::new(Bills::ShipmentCount).integer().not_null())
                        .col(ColumnDef::new(Bills::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_bills_client_id")
                                .from(Bills::Table, Bills::ClientId)
                                .to(Clients::Table, Clients::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // One bill per client and period.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_bills_client_period")
                        .table(Bills::Table)
                        .col(Bills::ClientId)
                        .col(Bills::PeriodStart)
                        .col(Bills::PeriodEnd)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Bills::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Bills {
        Table,
        Id,
        ClientId,
        PeriodStart,
        PeriodEnd,
        TotalAmount,
        ShipmentCount,
        CreatedAt,
    }
}
