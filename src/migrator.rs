use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_table::Migration),
            Box::new(m20250301_000002_create_artists_table::Migration),
            Box::new(m20250301_000003_create_paintings_table::Migration),
            Box::new(m20250301_000004_create_orders_table::Migration),
        ]
    }
}

/// Creates a unique index over a single column.
fn unique_index<T, C>(name: &str, table: T, column: C) -> IndexCreateStatement
where
    T: IntoIden + 'static,
    C: IntoIden + 'static,
{
    Index::create()
        .if_not_exists()
        .name(name)
        .table(table)
        .col(column)
        .unique()
        .to_owned()
}

fn lookup_index<T, C>(name: &str, table: T, column: C) -> IndexCreateStatement
where
    T: IntoIden + 'static,
    C: IntoIden + 'static,
{
    Index::create()
        .if_not_exists()
        .name(name)
        .table(table)
        .col(column)
        .to_owned()
}

mod m20250301_000001_create_users_table {
    use super::unique_index;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(ColumnDef::new(Users::Email).string().not_null())
                        .col(ColumnDef::new(Users::Phone).string_len(20).not_null())
                        .col(ColumnDef::new(Users::Password).string().not_null())
                        .col(ColumnDef::new(Users::ProfileImage).string().null())
                        .col(ColumnDef::new(Users::Address).json().not_null())
                        .col(
                            ColumnDef::new(Users::Deleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // Uniqueness holds across soft-deleted rows too.
            manager
                .create_index(unique_index("idx_users_email", Users::Table, Users::Email))
                .await?;
            manager
                .create_index(unique_index("idx_users_phone", Users::Table, Users::Phone))
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Users {
        Table,
        Id,
        Name,
        Email,
        Phone,
        Password,
        ProfileImage,
        Address,
        Deleted,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000002_create_artists_table {
    use super::unique_index;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_artists_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Artists::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Artists::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Artists::Name).string().not_null())
                        .col(ColumnDef::new(Artists::Email).string().not_null())
                        .col(ColumnDef::new(Artists::Phone).string_len(20).not_null())
                        .col(ColumnDef::new(Artists::Password).string().not_null())
                        .col(ColumnDef::new(Artists::Bio).text().null())
                        .col(ColumnDef::new(Artists::ProfileImage).string().null())
                        .col(ColumnDef::new(Artists::Address).json().not_null())
                        .col(
                            ColumnDef::new(Artists::Deleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Artists::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Artists::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(unique_index(
                    "idx_artists_email",
                    Artists::Table,
                    Artists::Email,
                ))
                .await?;
            manager
                .create_index(unique_index(
                    "idx_artists_phone",
                    Artists::Table,
                    Artists::Phone,
                ))
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Artists::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Artists {
        Table,
        Id,
        Name,
        Email,
        Phone,
        Password,
        Bio,
        ProfileImage,
        Address,
        Deleted,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000003_create_paintings_table {
    use super::lookup_index;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_paintings_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Paintings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Paintings::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Paintings::Title).string().not_null())
                        .col(ColumnDef::new(Paintings::Description).text().not_null())
                        .col(ColumnDef::new(Paintings::ImageUrls).json().not_null())
                        .col(ColumnDef::new(Paintings::Category).string().null())
                        .col(
                            ColumnDef::new(Paintings::Theme)
                                .string()
                                .not_null()
                                .default("General"),
                        )
                        .col(
                            ColumnDef::new(Paintings::Price)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Paintings::Discount)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Paintings::FinalPrice)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Paintings::SeasonOrFestival)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Paintings::Dimensions).json().not_null())
                        .col(ColumnDef::new(Paintings::Materials).json().not_null())
                        .col(
                            ColumnDef::new(Paintings::Stock)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(Paintings::Rating)
                                .decimal_len(3, 1)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Paintings::Comments).json().not_null())
                        .col(ColumnDef::new(Paintings::Likes).json().not_null())
                        .col(ColumnDef::new(Paintings::ArtistId).uuid().not_null())
                        .col(
                            ColumnDef::new(Paintings::Deleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Paintings::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Paintings::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(lookup_index(
                    "idx_paintings_artist_id",
                    Paintings::Table,
                    Paintings::ArtistId,
                ))
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Paintings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Paintings {
        Table,
        Id,
        Title,
        Description,
        ImageUrls,
        Category,
        Theme,
        Price,
        Discount,
        FinalPrice,
        SeasonOrFestival,
        Dimensions,
        Materials,
        Stock,
        Rating,
        Comments,
        Likes,
        ArtistId,
        Deleted,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000004_create_orders_table {
    use super::lookup_index;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000004_create_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Orders::UserId).uuid().not_null())
                        .col(ColumnDef::new(Orders::ArtistId).uuid().not_null())
                        .col(ColumnDef::new(Orders::Paintings).json().not_null())
                        .col(
                            ColumnDef::new(Orders::TotalAmount)
                                .decimal_len(14, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Orders::PaymentStatus)
                                .string_len(20)
                                .not_null()
                                .default("Pending"),
                        )
                        .col(
                            ColumnDef::new(Orders::PaymentMethod)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Orders::TransactionId).string().null())
                        .col(ColumnDef::new(Orders::ShippingAddress).json().not_null())
                        .col(
                            ColumnDef::new(Orders::OrderStatus)
                                .string_len(20)
                                .not_null()
                                .default("Pending"),
                        )
                        .col(
                            ColumnDef::new(Orders::DeliveryDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Orders::CancelReason).string().null())
                        .col(
                            ColumnDef::new(Orders::Deleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Orders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Orders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(lookup_index(
                    "idx_orders_user_id",
                    Orders::Table,
                    Orders::UserId,
                ))
                .await?;
            manager
                .create_index(lookup_index(
                    "idx_orders_artist_id",
                    Orders::Table,
                    Orders::ArtistId,
                ))
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Orders {
        Table,
        Id,
        UserId,
        ArtistId,
        Paintings,
        TotalAmount,
        PaymentStatus,
        PaymentMethod,
        TransactionId,
        ShippingAddress,
        OrderStatus,
        DeliveryDate,
        CancelReason,
        Deleted,
        CreatedAt,
        UpdatedAt,
    }
}
