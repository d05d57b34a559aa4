use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_auto(Categories::Id))
                    .col(string(Categories::Name))
                    .col(big_integer(Categories::CreatedAt))
                    .col(big_integer(Categories::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Films::Table)
                    .if_not_exists()
                    .col(pk_auto(Films::Id))
                    .col(string(Films::Title))
                    .col(string(Films::ThumbnailFilm))
                    .col(string(Films::Year))
                    .col(text(Films::Description))
                    .col(integer(Films::CategoryId))
                    .col(big_integer(Films::CreatedAt))
                    .col(big_integer(Films::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_films_category_id")
                            .from(Films::Table, Films::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_films_created_at")
                    .table(Films::Table)
                    .col(Films::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_films_category_id")
                    .table(Films::Table)
                    .col(Films::CategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Films::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Categories::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Films {
    Table,
    Id,
    Title,
    ThumbnailFilm,
    Year,
    Description,
    CategoryId,
    CreatedAt,
    UpdatedAt,
}
