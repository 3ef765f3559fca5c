use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create cities table
        manager
            .create_table(
                Table::create()
                    .table(Cities::Table)
                    .if_not_exists()
                    .col(string(Cities::Code).primary_key())
                    .col(string(Cities::Name))
                    .col(string_len(Cities::State, 2))
                    .to_owned(),
            )
            .await?;

        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::FirstName))
                    .col(string(Users::LastName))
                    .col(string_null(Users::Description))
                    .col(string(Users::ImageUrl))
                    .col(string(Users::HashedPassword))
                    .col(boolean(Users::Admin).default(false))
                    .to_owned(),
            )
            .await?;

        // Create cafes table
        manager
            .create_table(
                Table::create()
                    .table(Cafes::Table)
                    .if_not_exists()
                    .col(pk_auto(Cafes::Id))
                    .col(string(Cafes::Name))
                    .col(string(Cafes::Description))
                    .col(string(Cafes::Url))
                    .col(string(Cafes::Address))
                    .col(string(Cafes::CityCode))
                    .col(string(Cafes::ImageUrl).default("/static/images/default-cafe.jpg"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cafe_city")
                            .from(Cafes::Table, Cafes::CityCode)
                            .to(Cities::Table, Cities::Code)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create users_like_cafes table (join table)
        manager
            .create_table(
                Table::create()
                    .table(UsersLikeCafes::Table)
                    .if_not_exists()
                    .col(integer(UsersLikeCafes::UserId))
                    .col(integer(UsersLikeCafes::CafeId))
                    .primary_key(
                        Index::create()
                            .name("pk_users_like_cafes")
                            .col(UsersLikeCafes::UserId)
                            .col(UsersLikeCafes::CafeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_like_cafes_user")
                            .from(UsersLikeCafes::Table, UsersLikeCafes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_like_cafes_cafe")
                            .from(UsersLikeCafes::Table, UsersLikeCafes::CafeId)
                            .to(Cafes::Table, Cafes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UsersLikeCafes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cafes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cities::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Cities {
    Table,
    Code,
    Name,
    State,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    FirstName,
    LastName,
    Description,
    ImageUrl,
    HashedPassword,
    Admin,
}

#[derive(DeriveIden)]
enum Cafes {
    Table,
    Id,
    Name,
    Description,
    Url,
    Address,
    CityCode,
    ImageUrl,
}

#[derive(DeriveIden)]
enum UsersLikeCafes {
    Table,
    UserId,
    CafeId,
}
