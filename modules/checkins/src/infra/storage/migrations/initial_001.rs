use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    CreatedAt,
    CurrentStreak,
    MaxStreak,
    Power,
    LastCheckInDate,
}

#[derive(DeriveIden)]
enum CheckIns {
    Table,
    Id,
    UserId,
    Date,
    Completed,
    CreatedAt,
}

const UX_CHECK_INS_USER_DATE: &str = "ux_check_ins_user_date";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::CurrentStreak)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Users::MaxStreak).integer().not_null().default(0))
                    .col(ColumnDef::new(Users::Power).integer().not_null().default(0))
                    .col(ColumnDef::new(Users::LastCheckInDate).date().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CheckIns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CheckIns::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CheckIns::UserId).string().not_null())
                    .col(ColumnDef::new(CheckIns::Date).date().not_null())
                    .col(
                        ColumnDef::new(CheckIns::Completed)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(CheckIns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_check_ins_user_id")
                            .from(CheckIns::Table, CheckIns::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Same-day uniqueness lives here, not in application code.
        manager
            .create_index(
                Index::create()
                    .name(UX_CHECK_INS_USER_DATE)
                    .table(CheckIns::Table)
                    .col(CheckIns::UserId)
                    .col(CheckIns::Date)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(UX_CHECK_INS_USER_DATE)
                    .table(CheckIns::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(CheckIns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}
