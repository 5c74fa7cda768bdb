use sea_orm_migration::prelude::*;

mod m20260801_000001_create_users;
mod m20260801_000002_create_courses;
mod m20260801_000003_create_lessons;
mod m20260801_000004_create_enrollments;
mod m20260801_000005_create_progress;
mod m20260801_000006_create_completed_lessons;
mod m20260801_000007_add_missing_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_users::Migration),
            Box::new(m20260801_000002_create_courses::Migration),
            Box::new(m20260801_000003_create_lessons::Migration),
            Box::new(m20260801_000004_create_enrollments::Migration),
            Box::new(m20260801_000005_create_progress::Migration),
            Box::new(m20260801_000006_create_completed_lessons::Migration),
            Box::new(m20260801_000007_add_missing_indexes::Migration),
        ]
    }
}
