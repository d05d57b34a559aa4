use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Episodes::Table)
                    .if_not_exists()
                    .col(pk_auto(Episodes::Id))
                    .col(string(Episodes::Title))
                    .col(integer(Episodes::FilmId))
                    .col(big_integer(Episodes::CreatedAt))
                    .col(big_integer(Episodes::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_episodes_film_id")
                            .from(Episodes::Table, Episodes::FilmId)
                            .to(Films::Table, Films::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_episodes_film_id")
                    .table(Episodes::Table)
                    .col(Episodes::FilmId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Episodes::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Episodes {
    Table,
    Id,
    Title,
    FilmId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Films {
    Table,
    Id,
}
