use sea_orm::entity::prelude::*;

/// Per-user-per-course progress record; one row per (user, course) pair.
/// `percent` is denormalized from the completed-lesson count versus the
/// course's total lesson count.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "progress")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub percent: i16,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::completed_lessons::Entity")]
    CompletedLessons,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::completed_lessons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompletedLessons.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
