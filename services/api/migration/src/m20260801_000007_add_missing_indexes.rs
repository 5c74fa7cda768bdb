use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Lesson slugs are unique per course only.
        manager
            .create_index(
                Index::create()
                    .table(Lessons::Table)
                    .col(Lessons::CourseId)
                    .col(Lessons::Slug)
                    .name("idx_lessons_course_id_slug")
                    .unique()
                    .to_owned(),
            )
            .await?;
        // One progress row per (user, course) pair.
        manager
            .create_index(
                Index::create()
                    .table(Progress::Table)
                    .col(Progress::UserId)
                    .col(Progress::CourseId)
                    .name("idx_progress_user_id_course_id")
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(CompletedLessons::Table)
                    .col(CompletedLessons::ProgressId)
                    .name("idx_completed_lessons_progress_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_completed_lessons_progress_id")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_progress_user_id_course_id")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_lessons_course_id_slug").to_owned())
            .await
    }
}

#[derive(Iden)]
enum Lessons {
    Table,
    CourseId,
    Slug,
}

#[derive(Iden)]
enum Progress {
    Table,
    UserId,
    CourseId,
}

#[derive(Iden)]
enum CompletedLessons {
    Table,
    ProgressId,
}
