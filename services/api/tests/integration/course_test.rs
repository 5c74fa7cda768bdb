use uuid::Uuid;

use opencourse_api::error::ApiError;
use opencourse_api::usecase::course::{
    CreateCourseInput, CreateCourseUseCase, DeleteCourseUseCase, GetCourseUseCase,
    ListCoursesUseCase, UpdateCourseInput, UpdateCourseUseCase,
};
use opencourse_domain::pagination::PageRequest;

use crate::helpers::{
    MockCourseRepo, MockEnrollmentRepo, MockLessonRepo, MockProgressRepo, test_course, test_lesson,
};

fn create_input(title: &str) -> CreateCourseInput {
    CreateCourseInput {
        title: title.to_owned(),
        description: "Learn things".to_owned(),
        category: "programming".to_owned(),
        thumbnail_url: None,
    }
}

#[tokio::test]
async fn should_create_course_with_slug_from_title() {
    let courses = MockCourseRepo::empty();
    let uc = CreateCourseUseCase {
        courses: courses.clone(),
    };

    let course = uc
        .execute(Uuid::new_v4(), create_input("My Course"))
        .await
        .unwrap();

    assert_eq!(course.slug, "my-course");
    assert!(courses.get(course.id).is_some());
}

#[tokio::test]
async fn should_suffix_slug_on_duplicate_title() {
    let existing = test_course("My Course", "my-course");
    let uc = CreateCourseUseCase {
        courses: MockCourseRepo::new(vec![existing]),
    };

    let course = uc
        .execute(Uuid::new_v4(), create_input("My Course"))
        .await
        .unwrap();

    assert_eq!(course.slug, "my-course-1");
}

#[tokio::test]
async fn should_keep_counting_suffixes_past_the_first() {
    let uc = CreateCourseUseCase {
        courses: MockCourseRepo::new(vec![
            test_course("My Course", "my-course"),
            test_course("My Course", "my-course-1"),
        ]),
    };

    let course = uc
        .execute(Uuid::new_v4(), create_input("My Course"))
        .await
        .unwrap();

    assert_eq!(course.slug, "my-course-2");
}

#[tokio::test]
async fn should_reject_blank_title_on_create() {
    let uc = CreateCourseUseCase {
        courses: MockCourseRepo::empty(),
    };

    let result = uc.execute(Uuid::new_v4(), create_input("   ")).await;
    assert!(
        matches!(result, Err(ApiError::MissingData)),
        "expected MissingData, got {result:?}"
    );
}

#[tokio::test]
async fn should_regenerate_slug_when_title_changes() {
    let course = test_course("Old Title", "old-title");
    let courses = MockCourseRepo::new(vec![course.clone()]);

    let uc = UpdateCourseUseCase {
        courses: courses.clone(),
    };
    let updated = uc
        .execute(
            course.id,
            UpdateCourseInput {
                title: Some("New Title".to_owned()),
                description: None,
                category: None,
                thumbnail_url: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.slug, "new-title");
    assert_eq!(courses.get(course.id).unwrap().slug, "new-title");
}

#[tokio::test]
async fn should_keep_slug_when_title_unchanged() {
    let course = test_course("My Course", "my-course");
    let uc = UpdateCourseUseCase {
        courses: MockCourseRepo::new(vec![course.clone()]),
    };

    let updated = uc
        .execute(
            course.id,
            UpdateCourseInput {
                title: Some("My Course".to_owned()),
                description: Some("Updated description".to_owned()),
                category: None,
                thumbnail_url: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.slug, "my-course");
    assert_eq!(updated.description, "Updated description");
}

#[tokio::test]
async fn should_exclude_self_when_deduping_updated_slug() {
    // Retitling back and forth must not suffix against the course's own slug.
    let course = test_course("My Course", "my-course");
    let uc = UpdateCourseUseCase {
        courses: MockCourseRepo::new(vec![course.clone()]),
    };

    let updated = uc
        .execute(
            course.id,
            UpdateCourseInput {
                title: Some("My  Course".to_owned()),
                description: None,
                category: None,
                thumbnail_url: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.slug, "my-course");
}

#[tokio::test]
async fn should_return_not_found_when_updating_missing_course() {
    let uc = UpdateCourseUseCase {
        courses: MockCourseRepo::empty(),
    };

    let result = uc
        .execute(
            Uuid::new_v4(),
            UpdateCourseInput {
                title: Some("Anything".to_owned()),
                description: None,
                category: None,
                thumbnail_url: None,
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::CourseNotFound)),
        "expected CourseNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_course_detail_with_ordered_lessons() {
    let course = test_course("My Course", "my-course");
    let lessons = MockLessonRepo::new(vec![
        test_lesson(course.id, "Second", "second", 1),
        test_lesson(course.id, "First", "first", 0),
    ]);
    let enrollments = MockEnrollmentRepo::enrolled(Uuid::new_v4(), course.id);

    let uc = GetCourseUseCase {
        courses: MockCourseRepo::new(vec![course.clone()]),
        lessons,
        enrollments,
    };
    let detail = uc.execute(course.id).await.unwrap();

    assert_eq!(detail.enrolled_count, 1);
    let slugs: Vec<&str> = detail.lessons.iter().map(|l| l.slug.as_str()).collect();
    assert_eq!(slugs, vec!["first", "second"]);
}

#[tokio::test]
async fn should_scrub_enrollments_and_progress_on_course_delete() {
    let course = test_course("My Course", "my-course");
    let user_id = Uuid::new_v4();
    let courses = MockCourseRepo::new(vec![course.clone()]);
    let enrollments = MockEnrollmentRepo::enrolled(user_id, course.id);
    let progress = MockProgressRepo::new(vec![opencourse_api::domain::types::Progress {
        id: Uuid::new_v4(),
        user_id,
        course_id: course.id,
        percent: 50,
        completed: vec![],
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }]);

    let uc = DeleteCourseUseCase {
        courses: courses.clone(),
        enrollments: enrollments.clone(),
        progress: progress.clone(),
    };
    uc.execute(course.id).await.unwrap();

    assert!(courses.get(course.id).is_none());
    assert_eq!(enrollments.len(), 0);
    assert_eq!(progress.len(), 0);
}

#[tokio::test]
async fn should_return_not_found_when_deleting_missing_course() {
    let uc = DeleteCourseUseCase {
        courses: MockCourseRepo::empty(),
        enrollments: MockEnrollmentRepo::empty(),
        progress: MockProgressRepo::empty(),
    };

    let result = uc.execute(Uuid::new_v4()).await;
    assert!(
        matches!(result, Err(ApiError::CourseNotFound)),
        "expected CourseNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_empty_page_far_beyond_range() {
    let courses = MockCourseRepo::new(vec![test_course("My Course", "my-course")]);
    let uc = ListCoursesUseCase {
        courses: courses.clone(),
    };

    // The page * per_page offset must not overflow u32.
    let page = PageRequest {
        per_page: 100,
        page: u32::MAX,
    }
    .clamped();
    let (items, total) = uc.execute(page).await.unwrap();

    assert!(items.is_empty());
    assert_eq!(total, 1);
}
