use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CompletedLessons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompletedLessons::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CompletedLessons::ProgressId).uuid().not_null())
                    .col(
                        ColumnDef::new(CompletedLessons::LessonSlug)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompletedLessons::LessonIndex)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompletedLessons::CompletedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CompletedLessons::Table, CompletedLessons::ProgressId)
                            .to(Progress::Table, Progress::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CompletedLessons::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CompletedLessons {
    Table,
    Id,
    ProgressId,
    LessonSlug,
    LessonIndex,
    CompletedAt,
}

#[derive(Iden)]
enum Progress {
    Table,
    Id,
}
