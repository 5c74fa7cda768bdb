
mod account_test;
mod admin_test;
mod course_test;
mod enrollment_test;
mod lesson_test;
