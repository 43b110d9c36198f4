//! Schema migrations for the relational backend.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240301_000001_create_tables::Migration)]
    }
}

mod m20240301_000001_create_tables {
    use sea_orm_migration::prelude::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockIn::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockIn::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(StockIn::ProductName).string().not_null())
                        .col(ColumnDef::new(StockIn::Type).string().not_null())
                        .col(ColumnDef::new(StockIn::SupplierName).string().not_null())
                        .col(ColumnDef::new(StockIn::InvoiceNumber).string().not_null())
                        .col(ColumnDef::new(StockIn::BatchNumber).string().not_null())
                        .col(ColumnDef::new(StockIn::UseByDate).date().not_null())
                        .col(ColumnDef::new(StockIn::BestBefore).date().not_null())
                        .col(ColumnDef::new(StockIn::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(StockIn::PackageSize)
                                .decimal_len(10, 3)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockIn::PricePerUnit)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockIn::ProductFreeFromDamage)
                                .boolean()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockIn::LabellingMatch).boolean().not_null())
                        .col(ColumnDef::new(StockIn::ProductStatus).string().not_null())
                        .col(ColumnDef::new(StockIn::CheckedBy).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(StockOut::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockOut::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(StockOut::Date).date().not_null())
                        .col(ColumnDef::new(StockOut::ProductName).string().not_null())
                        .col(ColumnDef::new(StockOut::Size).string().null())
                        .col(ColumnDef::new(StockOut::Type).string().not_null())
                        .col(ColumnDef::new(StockOut::Sku).string().null())
                        .col(ColumnDef::new(StockOut::CustomerName).string().not_null())
                        .col(ColumnDef::new(StockOut::OrderNumber).string().not_null())
                        .col(ColumnDef::new(StockOut::BatchNumber).string().not_null())
                        .col(ColumnDef::new(StockOut::BestBefore).date().not_null())
                        .col(ColumnDef::new(StockOut::ProductionDate).date().not_null())
                        .col(ColumnDef::new(StockOut::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(StockOut::PricePerUnit)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockOut::TotalPrice)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockOut::DeliveryMethod).string().not_null())
                        .col(ColumnDef::new(StockOut::LabellingMatch).boolean().not_null())
                        .col(ColumnDef::new(StockOut::CheckedBy).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_stock_out_order_number")
                        .table(StockOut::Table)
                        .col(StockOut::OrderNumber)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Wastage::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Wastage::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Wastage::Date).date().not_null())
                        .col(ColumnDef::new(Wastage::ProductName).string().not_null())
                        .col(ColumnDef::new(Wastage::Reason).string().not_null())
                        .col(ColumnDef::new(Wastage::BatchNumber).string().not_null())
                        .col(ColumnDef::new(Wastage::UseByDate).date().not_null())
                        .col(ColumnDef::new(Wastage::BestBefore).date().not_null())
                        .col(ColumnDef::new(Wastage::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(Wastage::PackageSize)
                                .decimal_len(10, 3)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Wastage::AvgPricePerKg)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Wastage::TotalCost)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Wastage::CheckedBy).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::Category).string().not_null())
                        .col(ColumnDef::new(Products::Sku).string().null())
                        .col(ColumnDef::new(Products::Description).text().null())
                        .col(
                            ColumnDef::new(Products::Price)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::StockLevel).integer().not_null())
                        .col(ColumnDef::new(Products::Size).string().null())
                        .col(ColumnDef::new(Products::ReorderLevel).integer().not_null())
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Wastage::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(StockOut::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(StockIn::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum StockIn {
        Table,
        Id,
        ProductName,
        Type,
        SupplierName,
        InvoiceNumber,
        BatchNumber,
        UseByDate,
        BestBefore,
        Quantity,
        PackageSize,
        PricePerUnit,
        ProductFreeFromDamage,
        LabellingMatch,
        ProductStatus,
        CheckedBy,
    }

    #[derive(DeriveIden)]
    enum StockOut {
        Table,
        Id,
        Date,
        ProductName,
        Size,
        Type,
        Sku,
        CustomerName,
        OrderNumber,
        BatchNumber,
        BestBefore,
        ProductionDate,
        Quantity,
        PricePerUnit,
        TotalPrice,
        DeliveryMethod,
        LabellingMatch,
        CheckedBy,
    }

    #[derive(DeriveIden)]
    enum Wastage {
        Table,
        Id,
        Date,
        ProductName,
        Reason,
        BatchNumber,
        UseByDate,
        BestBefore,
        Quantity,
        PackageSize,
        AvgPricePerKg,
        TotalCost,
        CheckedBy,
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
        Name,
        Category,
        Sku,
        Description,
        Price,
        StockLevel,
        Size,
        ReorderLevel,
        CreatedAt,
    }
}
