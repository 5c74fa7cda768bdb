use chrono::Utc;
use uuid::Uuid;

use opencourse_api::domain::types::{Enrollment, Progress};
use opencourse_api::error::ApiError;
use opencourse_api::usecase::enrollment::{EnrollUseCase, MyEnrolledUseCase};

use crate::helpers::{MockCourseRepo, MockEnrollmentRepo, MockProgressRepo, test_course};

#[tokio::test]
async fn should_enroll_and_seed_empty_progress() {
    let course = test_course("My Course", "my-course");
    let user_id = Uuid::new_v4();
    let enrollments = MockEnrollmentRepo::empty();
    let progress = MockProgressRepo::empty();

    let uc = EnrollUseCase {
        courses: MockCourseRepo::new(vec![course.clone()]),
        enrollments: enrollments.clone(),
        progress: progress.clone(),
    };
    uc.execute(user_id, course.id).await.unwrap();

    assert_eq!(enrollments.len(), 1);
    let record = progress.find_record(user_id, course.id).unwrap();
    assert_eq!(record.percent, 0);
    assert!(record.completed.is_empty());
}

#[tokio::test]
async fn should_reject_duplicate_enrollment() {
    let course = test_course("My Course", "my-course");
    let user_id = Uuid::new_v4();
    let enrollments = MockEnrollmentRepo::enrolled(user_id, course.id);
    let progress = MockProgressRepo::empty();

    let uc = EnrollUseCase {
        courses: MockCourseRepo::new(vec![course.clone()]),
        enrollments: enrollments.clone(),
        progress: progress.clone(),
    };

    let result = uc.execute(user_id, course.id).await;
    assert!(
        matches!(result, Err(ApiError::AlreadyEnrolled)),
        "expected AlreadyEnrolled, got {result:?}"
    );
    assert_eq!(enrollments.len(), 1, "no second enrollment row");
    assert_eq!(progress.len(), 0, "no progress row for the failed attempt");
}

#[tokio::test]
async fn should_not_duplicate_existing_progress_on_enroll() {
    let course = test_course("My Course", "my-course");
    let user_id = Uuid::new_v4();
    let now = Utc::now();
    // Progress left over from an earlier enrollment cycle.
    let progress = MockProgressRepo::new(vec![Progress {
        id: Uuid::new_v4(),
        user_id,
        course_id: course.id,
        percent: 40,
        completed: vec![],
        created_at: now,
        updated_at: now,
    }]);

    let uc = EnrollUseCase {
        courses: MockCourseRepo::new(vec![course.clone()]),
        enrollments: MockEnrollmentRepo::empty(),
        progress: progress.clone(),
    };
    uc.execute(user_id, course.id).await.unwrap();

    assert_eq!(progress.len(), 1, "existing record is kept, not duplicated");
    assert_eq!(progress.find_record(user_id, course.id).unwrap().percent, 40);
}

#[tokio::test]
async fn should_reject_enrollment_in_missing_course() {
    let uc = EnrollUseCase {
        courses: MockCourseRepo::empty(),
        enrollments: MockEnrollmentRepo::empty(),
        progress: MockProgressRepo::empty(),
    };

    let result = uc.execute(Uuid::new_v4(), Uuid::new_v4()).await;
    assert!(
        matches!(result, Err(ApiError::CourseNotFound)),
        "expected CourseNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_list_enrolled_courses_with_percent() {
    let user_id = Uuid::new_v4();
    let course_a = test_course("Course A", "course-a");
    let course_b = test_course("Course B", "course-b");
    let now = Utc::now();

    let enrollments = MockEnrollmentRepo::new(vec![
        Enrollment {
            user_id,
            course_id: course_a.id,
            created_at: now,
        },
        Enrollment {
            user_id,
            course_id: course_b.id,
            created_at: now,
        },
    ]);
    // Only course A has a progress record; B reads as 0%.
    let progress = MockProgressRepo::new(vec![Progress {
        id: Uuid::new_v4(),
        user_id,
        course_id: course_a.id,
        percent: 75,
        completed: vec![],
        created_at: now,
        updated_at: now,
    }]);

    let uc = MyEnrolledUseCase {
        courses: MockCourseRepo::new(vec![course_a.clone(), course_b.clone()]),
        enrollments,
        progress,
    };
    let enrolled = uc.execute(user_id).await.unwrap();

    assert_eq!(enrolled.len(), 2);
    assert_eq!(enrolled[0].course.id, course_a.id);
    assert_eq!(enrolled[0].percent, 75);
    assert_eq!(enrolled[1].course.id, course_b.id);
    assert_eq!(enrolled[1].percent, 0);
}

#[tokio::test]
async fn should_skip_enrollments_whose_course_was_deleted() {
    let user_id = Uuid::new_v4();
    let course = test_course("Course A", "course-a");
    let enrollments = MockEnrollmentRepo::new(vec![
        Enrollment {
            user_id,
            course_id: course.id,
            created_at: Utc::now(),
        },
        Enrollment {
            user_id,
            course_id: Uuid::new_v4(),
            created_at: Utc::now(),
        },
    ]);

    let uc = MyEnrolledUseCase {
        courses: MockCourseRepo::new(vec![course.clone()]),
        enrollments,
        progress: MockProgressRepo::empty(),
    };
    let enrolled = uc.execute(user_id).await.unwrap();

    assert_eq!(enrolled.len(), 1);
    assert_eq!(enrolled[0].course.id, course.id);
}

#[tokio::test]
async fn should_return_empty_list_when_not_enrolled_anywhere() {
    let uc = MyEnrolledUseCase {
        courses: MockCourseRepo::empty(),
        enrollments: MockEnrollmentRepo::empty(),
        progress: MockProgressRepo::empty(),
    };

    let enrolled = uc.execute(Uuid::new_v4()).await.unwrap();
    assert!(enrolled.is_empty());
}
