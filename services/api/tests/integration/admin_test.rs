use chrono::Utc;
use uuid::Uuid;

use opencourse_api::domain::types::{Enrollment, Progress};
use opencourse_api::error::ApiError;
use opencourse_api::usecase::admin::{
    DashboardStatsUseCase, DeleteUserUseCase, GetUserDetailUseCase, SetVerificationUseCase,
    UpdateUserRoleUseCase,
};
use opencourse_domain::user::UserRole;

use crate::helpers::{
    MockCourseRepo, MockEnrollmentRepo, MockLessonRepo, MockProgressRepo, MockUserRepo,
    test_course, test_lesson, test_user,
};

#[tokio::test]
async fn should_aggregate_dashboard_counters() {
    let mut admin = test_user("admin@example.com", true);
    admin.role = UserRole::Admin.as_u8();
    let student = test_user("student@example.com", false);
    let course = test_course("My Course", "my-course");
    let now = Utc::now();

    let uc = DashboardStatsUseCase {
        users: MockUserRepo::new(vec![admin, student.clone()]),
        courses: MockCourseRepo::new(vec![course.clone()]),
        lessons: MockLessonRepo::new(vec![
            test_lesson(course.id, "A", "a", 0),
            test_lesson(course.id, "B", "b", 1),
        ]),
        enrollments: MockEnrollmentRepo::enrolled(student.id, course.id),
        progress: MockProgressRepo::new(vec![Progress {
            id: Uuid::new_v4(),
            user_id: student.id,
            course_id: course.id,
            percent: 0,
            completed: vec![],
            created_at: now,
            updated_at: now,
        }]),
    };
    let stats = uc.execute().await.unwrap();

    assert_eq!(stats.total_users, 2);
    assert_eq!(stats.student_users, 1);
    assert_eq!(stats.admin_users, 1);
    assert_eq!(stats.verified_users, 1);
    assert_eq!(stats.total_courses, 1);
    assert_eq!(stats.total_lessons, 2);
    assert_eq!(stats.total_enrollments, 1);
    assert_eq!(stats.active_progress, 1);
}

#[tokio::test]
async fn should_join_user_detail_with_course_titles_and_percent() {
    let user = test_user("student@example.com", true);
    let course = test_course("My Course", "my-course");
    let now = Utc::now();

    let uc = GetUserDetailUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        courses: MockCourseRepo::new(vec![course.clone()]),
        enrollments: MockEnrollmentRepo::new(vec![Enrollment {
            user_id: user.id,
            course_id: course.id,
            created_at: now,
        }]),
        progress: MockProgressRepo::new(vec![Progress {
            id: Uuid::new_v4(),
            user_id: user.id,
            course_id: course.id,
            percent: 30,
            completed: vec![],
            created_at: now,
            updated_at: now,
        }]),
    };
    let detail = uc.execute(user.id).await.unwrap();

    assert_eq!(detail.user.id, user.id);
    assert_eq!(detail.enrollments.len(), 1);
    assert_eq!(detail.enrollments[0].course_title, "My Course");
    assert_eq!(detail.enrollments[0].percent, 30);
}

#[tokio::test]
async fn should_update_role_of_another_user() {
    let actor_id = Uuid::new_v4();
    let target = test_user("student@example.com", true);
    let users = MockUserRepo::new(vec![target.clone()]);

    let uc = UpdateUserRoleUseCase {
        users: users.clone(),
    };
    uc.execute(actor_id, target.id, "admin").await.unwrap();

    assert_eq!(users.get(target.id).unwrap().role, UserRole::Admin.as_u8());
}

#[tokio::test]
async fn should_reject_unknown_role_name() {
    let uc = UpdateUserRoleUseCase {
        users: MockUserRepo::empty(),
    };

    let result = uc
        .execute(Uuid::new_v4(), Uuid::new_v4(), "superuser")
        .await;
    assert!(
        matches!(result, Err(ApiError::InvalidRole)),
        "expected InvalidRole, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_changing_own_role() {
    let admin = test_user("admin@example.com", true);
    let uc = UpdateUserRoleUseCase {
        users: MockUserRepo::new(vec![admin.clone()]),
    };

    let result = uc.execute(admin.id, admin.id, "student").await;
    assert!(
        matches!(result, Err(ApiError::SelfModification)),
        "expected SelfModification, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_role_change_for_missing_user() {
    let uc = UpdateUserRoleUseCase {
        users: MockUserRepo::empty(),
    };

    let result = uc.execute(Uuid::new_v4(), Uuid::new_v4(), "admin").await;
    assert!(
        matches!(result, Err(ApiError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_toggle_verification_of_another_user() {
    let target = test_user("student@example.com", false);
    let users = MockUserRepo::new(vec![target.clone()]);

    let uc = SetVerificationUseCase {
        users: users.clone(),
    };
    uc.execute(Uuid::new_v4(), target.id, true).await.unwrap();
    assert!(users.get(target.id).unwrap().is_verified);

    uc.execute(Uuid::new_v4(), target.id, false).await.unwrap();
    assert!(!users.get(target.id).unwrap().is_verified);
}

#[tokio::test]
async fn should_reject_changing_own_verification() {
    let admin = test_user("admin@example.com", true);
    let uc = SetVerificationUseCase {
        users: MockUserRepo::new(vec![admin.clone()]),
    };

    let result = uc.execute(admin.id, admin.id, false).await;
    assert!(
        matches!(result, Err(ApiError::SelfModification)),
        "expected SelfModification, got {result:?}"
    );
}

#[tokio::test]
async fn should_delete_user_and_scrub_enrollments_and_progress() {
    let user = test_user("student@example.com", true);
    let course = test_course("My Course", "my-course");
    let now = Utc::now();
    let users = MockUserRepo::new(vec![user.clone()]);
    let enrollments = MockEnrollmentRepo::enrolled(user.id, course.id);
    let progress = MockProgressRepo::new(vec![Progress {
        id: Uuid::new_v4(),
        user_id: user.id,
        course_id: course.id,
        percent: 10,
        completed: vec![],
        created_at: now,
        updated_at: now,
    }]);

    let uc = DeleteUserUseCase {
        users: users.clone(),
        enrollments: enrollments.clone(),
        progress: progress.clone(),
    };
    uc.execute(user.id).await.unwrap();

    assert!(users.get(user.id).is_none());
    assert_eq!(enrollments.len(), 0);
    assert_eq!(progress.len(), 0);
}

#[tokio::test]
async fn should_reject_deleting_missing_user() {
    let uc = DeleteUserUseCase {
        users: MockUserRepo::empty(),
        enrollments: MockEnrollmentRepo::empty(),
        progress: MockProgressRepo::empty(),
    };

    let result = uc.execute(Uuid::new_v4()).await;
    assert!(
        matches!(result, Err(ApiError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}
