use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(self::Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(self::Products::Id)
                            .uuid() // Uuid
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(self::Products::Name)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(self::Products::Description)
                            .string_len(500)
                            .default("")
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(self::Products::RetailPrice)
                            .big_integer() // cents
                            .check(Expr::col(self::Products::RetailPrice).gt(0))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(self::Products::WholesalePrice)
                            .big_integer() // cents
                            .check(Expr::col(self::Products::WholesalePrice).gt(0))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(self::Products::Location)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(self::Products::Stock)
                            .integer() // i32
                            .check(Expr::col(self::Products::Stock).gte(0))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(self::Products::CreatedAt)
                            .timestamp() // NaiveDateTime
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(self::Products::UpdatedAt)
                            .timestamp() // NaiveDateTime
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(self::Products::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum Products {
    Table,
    Id,
    Name,
    Description,
    RetailPrice,
    WholesalePrice,
    Location,
    Stock,
    CreatedAt,
    UpdatedAt,
}
