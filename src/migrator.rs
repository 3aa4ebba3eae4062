use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_items_table::Migration),
            Box::new(m20250301_000002_create_vendors_table::Migration),
            Box::new(m20250301_000003_create_pickups_table::Migration),
            Box::new(m20250301_000004_create_bids_table::Migration),
            Box::new(m20250301_000005_create_campaign_participations_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250301_000001_create_items_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create items table aligned with entities::item Model
            manager
                .create_table(
                    Table::create()
                        .table(Items::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Items::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Items::TagId).string().not_null())
                        .col(ColumnDef::new(Items::Name).string().not_null())
                        .col(ColumnDef::new(Items::Department).string().not_null())
                        .col(ColumnDef::new(Items::Category).string().not_null())
                        .col(
                            ColumnDef::new(Items::AgeMonths)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Items::Condition).string().not_null())
                        .col(ColumnDef::new(Items::Notes).string().null())
                        .col(
                            ColumnDef::new(Items::ClassificationType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Items::ClassificationNotes)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(ColumnDef::new(Items::Status).string().not_null())
                        .col(ColumnDef::new(Items::CreatedBy).string().not_null())
                        .col(ColumnDef::new(Items::PickupId).uuid().null())
                        .col(ColumnDef::new(Items::AuditTrail).json().not_null())
                        .col(ColumnDef::new(Items::DisposalHistory).json().not_null())
                        .col(ColumnDef::new(Items::DisposedAt).timestamp().null())
                        .col(ColumnDef::new(Items::DisposedBy).string().null())
                        .col(ColumnDef::new(Items::BiddingStatus).string().null())
                        .col(ColumnDef::new(Items::StartingBid).decimal().null())
                        .col(ColumnDef::new(Items::CurrentHighestBid).decimal().null())
                        .col(ColumnDef::new(Items::BiddingEndDate).timestamp().null())
                        .col(ColumnDef::new(Items::WinningBidderId).uuid().null())
                        .col(ColumnDef::new(Items::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Items::UpdatedAt).timestamp().null())
                        .col(
                            ColumnDef::new(Items::Version)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_items_created_by")
                        .table(Items::Table)
                        .col(Items::CreatedBy)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_items_bidding_status")
                        .table(Items::Table)
                        .col(Items::BiddingStatus)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_items_created_at")
                        .table(Items::Table)
                        .col(Items::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Items::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Items {
        Table,
        Id,
        TagId,
        Name,
        Department,
        Category,
        AgeMonths,
        Condition,
        Notes,
        ClassificationType,
        ClassificationNotes,
        Status,
        CreatedBy,
        PickupId,
        AuditTrail,
        DisposalHistory,
        DisposedAt,
        DisposedBy,
        BiddingStatus,
        StartingBid,
        CurrentHighestBid,
        BiddingEndDate,
        WinningBidderId,
        CreatedAt,
        UpdatedAt,
        Version,
    }
}

mod m20250301_000002_create_vendors_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_vendors_table"
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
                        .col(ColumnDef::new(Vendors::Contact).string().not_null())
                        .col(
                            ColumnDef::new(Vendors::Certified)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Vendors::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Vendors::UpdatedAt).timestamp().null())
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
        Contact,
        Certified,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000003_create_pickups_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_pickups_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Pickups::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Pickups::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Pickups::Date).date().not_null())
                        .col(ColumnDef::new(Pickups::VendorId).uuid().not_null())
                        .col(ColumnDef::new(Pickups::ItemIds).json().not_null())
                        .col(ColumnDef::new(Pickups::Notes).string().null())
                        .col(ColumnDef::new(Pickups::CreatedBy).string().not_null())
                        .col(ColumnDef::new(Pickups::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_pickups_vendor_id")
                        .table(Pickups::Table)
                        .col(Pickups::VendorId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_pickups_created_by")
                        .table(Pickups::Table)
                        .col(Pickups::CreatedBy)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Pickups::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Pickups {
        Table,
        Id,
        Date,
        VendorId,
        ItemIds,
        Notes,
        CreatedBy,
        CreatedAt,
    }
}

mod m20250301_000004_create_bids_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000004_create_bids_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Bids::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Bids::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Bids::ItemId).uuid().not_null())
                        .col(ColumnDef::new(Bids::VendorId).uuid().not_null())
                        .col(ColumnDef::new(Bids::Amount).decimal().not_null())
                        .col(ColumnDef::new(Bids::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bids_item_id")
                        .table(Bids::Table)
                        .col(Bids::ItemId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Bids::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Bids {
        Table,
        Id,
        ItemId,
        VendorId,
        Amount,
        CreatedAt,
    }
}

mod m20250301_000005_create_campaign_participations_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000005_create_campaign_participations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(CampaignParticipations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CampaignParticipations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CampaignParticipations::CampaignId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CampaignParticipations::UserEmail)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CampaignParticipations::JoinedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // Duplicate joins surface as unique-constraint conflicts
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_campaign_participations_campaign_user")
                        .table(CampaignParticipations::Table)
                        .col(CampaignParticipations::CampaignId)
                        .col(CampaignParticipations::UserEmail)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(
                    Table::drop()
                        .table(CampaignParticipations::Table)
                        .to_owned(),
                )
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum CampaignParticipations {
        Table,
        Id,
        CampaignId,
        UserEmail,
        JoinedAt,
    }
}
