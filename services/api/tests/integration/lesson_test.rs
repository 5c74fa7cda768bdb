use uuid::Uuid;

use opencourse_api::domain::types::{CompletedLesson, Progress};
use opencourse_api::error::ApiError;
use opencourse_api::usecase::lesson::{
    AddLessonInput, AddLessonUseCase, DeleteLessonUseCase, UpdateLessonInput, UpdateLessonUseCase,
};

use crate::helpers::{MockCourseRepo, MockLessonRepo, MockProgressRepo, test_course, test_lesson};

fn add_input(title: &str) -> AddLessonInput {
    AddLessonInput {
        title: title.to_owned(),
        video_url: "https://videos.example.com/a.mp4".to_owned(),
        duration: "10:00".to_owned(),
    }
}

#[tokio::test]
async fn should_append_lesson_at_end_of_course() {
    let course = test_course("My Course", "my-course");
    let lessons = MockLessonRepo::new(vec![test_lesson(course.id, "Intro", "intro", 0)]);

    let uc = AddLessonUseCase {
        courses: MockCourseRepo::new(vec![course.clone()]),
        lessons: lessons.clone(),
    };
    let lesson = uc.execute(course.id, add_input("Setup")).await.unwrap();

    assert_eq!(lesson.slug, "setup");
    assert_eq!(lesson.position, 1);
}

#[tokio::test]
async fn should_dedupe_lesson_slug_among_siblings_only() {
    let course_a = test_course("Course A", "course-a");
    let course_b = test_course("Course B", "course-b");
    let lessons = MockLessonRepo::new(vec![test_lesson(course_a.id, "Intro", "intro", 0)]);

    let uc = AddLessonUseCase {
        courses: MockCourseRepo::new(vec![course_a.clone(), course_b.clone()]),
        lessons: lessons.clone(),
    };

    // Same title inside the same course gets a suffix.
    let dup = uc.execute(course_a.id, add_input("Intro")).await.unwrap();
    assert_eq!(dup.slug, "intro-1");

    // In a different course the base slug is free.
    let other = uc.execute(course_b.id, add_input("Intro")).await.unwrap();
    assert_eq!(other.slug, "intro");
}

#[tokio::test]
async fn should_reject_lesson_for_missing_course() {
    let uc = AddLessonUseCase {
        courses: MockCourseRepo::empty(),
        lessons: MockLessonRepo::empty(),
    };

    let result = uc.execute(Uuid::new_v4(), add_input("Intro")).await;
    assert!(
        matches!(result, Err(ApiError::CourseNotFound)),
        "expected CourseNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_lesson_without_video_url() {
    let course = test_course("My Course", "my-course");
    let uc = AddLessonUseCase {
        courses: MockCourseRepo::new(vec![course.clone()]),
        lessons: MockLessonRepo::empty(),
    };

    let result = uc
        .execute(
            course.id,
            AddLessonInput {
                title: "Intro".to_owned(),
                video_url: "  ".to_owned(),
                duration: "10:00".to_owned(),
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::MissingData)),
        "expected MissingData, got {result:?}"
    );
}

#[tokio::test]
async fn should_regenerate_lesson_slug_on_retitle() {
    let course_id = Uuid::new_v4();
    let lesson = test_lesson(course_id, "Old Name", "old-name", 0);
    let lessons = MockLessonRepo::new(vec![lesson.clone()]);

    let uc = UpdateLessonUseCase {
        lessons: lessons.clone(),
    };
    let updated = uc
        .execute(
            course_id,
            "old-name",
            UpdateLessonInput {
                title: Some("New Name".to_owned()),
                video_url: None,
                duration: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.slug, "new-name");
    assert_eq!(updated.position, 0, "position survives retitle");
}

#[tokio::test]
async fn should_return_not_found_for_unknown_lesson_slug() {
    let uc = UpdateLessonUseCase {
        lessons: MockLessonRepo::empty(),
    };

    let result = uc
        .execute(
            Uuid::new_v4(),
            "nope",
            UpdateLessonInput {
                title: None,
                video_url: None,
                duration: None,
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::LessonNotFound)),
        "expected LessonNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_drop_completion_markers_when_lesson_deleted() {
    let course_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let keep = test_lesson(course_id, "Keep", "keep", 0);
    let removed = test_lesson(course_id, "Drop", "drop", 1);
    let lessons = MockLessonRepo::new(vec![keep.clone(), removed.clone()]);

    let now = chrono::Utc::now();
    let progress = MockProgressRepo::new(vec![Progress {
        id: Uuid::new_v4(),
        user_id,
        course_id,
        percent: 100,
        completed: vec![
            CompletedLesson {
                lesson_slug: "keep".to_owned(),
                lesson_index: 0,
                completed_at: now,
            },
            CompletedLesson {
                lesson_slug: "drop".to_owned(),
                lesson_index: 1,
                completed_at: now,
            },
        ],
        created_at: now,
        updated_at: now,
    }]);

    let uc = DeleteLessonUseCase {
        lessons: lessons.clone(),
        progress: progress.clone(),
    };
    uc.execute(course_id, "drop").await.unwrap();

    let record = progress.find_record(user_id, course_id).unwrap();
    assert_eq!(record.completed.len(), 1);
    assert_eq!(record.completed[0].lesson_slug, "keep");
    // One of one remaining lessons completed.
    assert_eq!(record.percent, 100);
}

#[tokio::test]
async fn should_recompute_percent_against_remaining_lessons() {
    let course_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let lessons = MockLessonRepo::new(vec![
        test_lesson(course_id, "A", "a", 0),
        test_lesson(course_id, "B", "b", 1),
        test_lesson(course_id, "C", "c", 2),
    ]);

    let now = chrono::Utc::now();
    let progress = MockProgressRepo::new(vec![Progress {
        id: Uuid::new_v4(),
        user_id,
        course_id,
        percent: 66,
        completed: vec![
            CompletedLesson {
                lesson_slug: "a".to_owned(),
                lesson_index: 0,
                completed_at: now,
            },
            CompletedLesson {
                lesson_slug: "b".to_owned(),
                lesson_index: 1,
                completed_at: now,
            },
        ],
        created_at: now,
        updated_at: now,
    }]);

    let uc = DeleteLessonUseCase {
        lessons: lessons.clone(),
        progress: progress.clone(),
    };
    uc.execute(course_id, "a").await.unwrap();

    // 1 completed of 2 remaining.
    let record = progress.find_record(user_id, course_id).unwrap();
    assert_eq!(record.completed.len(), 1);
    assert_eq!(record.percent, 50);
}
