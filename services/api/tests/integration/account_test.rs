use uuid::Uuid;

use opencourse_api::error::ApiError;
use opencourse_api::handlers::auth::{ResendOtpRequest, VerifyEmailRequest};
use opencourse_api::usecase::account::{
    RegisterInput, RegisterUseCase, ResendOtpInput, ResendOtpUseCase, VerifyEmailInput,
    VerifyEmailUseCase,
};
use opencourse_auth::token::validate_session_token;
use opencourse_domain::user::UserRole;

use crate::helpers::{
    MockMailer, MockUserRepo, SentMail, TEST_ADMIN_KEY, TEST_JWT_SECRET, expired_otp, fresh_otp,
    test_user,
};

fn register_usecase(
    users: MockUserRepo,
    mailer: MockMailer,
) -> RegisterUseCase<MockUserRepo, MockMailer> {
    RegisterUseCase {
        users,
        mailer,
        admin_key: TEST_ADMIN_KEY.to_owned(),
    }
}

#[tokio::test]
async fn should_register_unverified_student_with_hashed_password() {
    let users = MockUserRepo::empty();
    let mailer = MockMailer::new();
    let uc = register_usecase(users.clone(), mailer.clone());

    let user_id = uc
        .execute(RegisterInput {
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            password: "correct horse".to_owned(),
            admin_key: None,
        })
        .await
        .unwrap();

    let user = users.get(user_id).expect("user should be stored");
    assert_eq!(user.role, UserRole::Student.as_u8());
    assert!(!user.is_verified);
    assert_ne!(
        user.password_hash, "correct horse",
        "plaintext must never be stored"
    );
    assert!(bcrypt::verify("correct horse", &user.password_hash).unwrap());

    let otp = user.otp.expect("verification otp should be set");
    assert_eq!(otp.code.len(), 6);
    assert!(otp.code.chars().all(|c| c.is_ascii_digit()));
    assert!(!otp.is_expired());

    // The same code goes out by mail.
    assert_eq!(
        mailer.sent_mails(),
        vec![SentMail::Verification {
            email: "ada@example.com".to_owned(),
            otp: otp.code,
        }]
    );
}

#[tokio::test]
async fn should_lowercase_email_on_register() {
    let users = MockUserRepo::empty();
    let uc = register_usecase(users.clone(), MockMailer::new());

    let user_id = uc
        .execute(RegisterInput {
            name: "Ada".to_owned(),
            email: "  Ada@Example.COM ".to_owned(),
            password: "correct horse".to_owned(),
            admin_key: None,
        })
        .await
        .unwrap();

    assert_eq!(users.get(user_id).unwrap().email, "ada@example.com");
}

#[tokio::test]
async fn should_reject_duplicate_email_on_register() {
    let existing = test_user("ada@example.com", true);
    let uc = register_usecase(MockUserRepo::new(vec![existing]), MockMailer::new());

    let result = uc
        .execute(RegisterInput {
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            password: "correct horse".to_owned(),
            admin_key: None,
        })
        .await;

    assert!(
        matches!(result, Err(ApiError::EmailTaken)),
        "expected EmailTaken, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_short_password_on_register() {
    let uc = register_usecase(MockUserRepo::empty(), MockMailer::new());

    let result = uc
        .execute(RegisterInput {
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            password: "short".to_owned(),
            admin_key: None,
        })
        .await;

    assert!(
        matches!(result, Err(ApiError::WeakPassword)),
        "expected WeakPassword, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_blank_name_on_register() {
    let uc = register_usecase(MockUserRepo::empty(), MockMailer::new());

    let result = uc
        .execute(RegisterInput {
            name: "   ".to_owned(),
            email: "ada@example.com".to_owned(),
            password: "correct horse".to_owned(),
            admin_key: None,
        })
        .await;

    assert!(
        matches!(result, Err(ApiError::MissingData)),
        "expected MissingData, got {result:?}"
    );
}

#[tokio::test]
async fn should_elevate_to_admin_with_matching_key() {
    let users = MockUserRepo::empty();
    let uc = register_usecase(users.clone(), MockMailer::new());

    let user_id = uc
        .execute(RegisterInput {
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            password: "correct horse".to_owned(),
            admin_key: Some(TEST_ADMIN_KEY.to_owned()),
        })
        .await
        .unwrap();

    assert_eq!(users.get(user_id).unwrap().role, UserRole::Admin.as_u8());
}

#[tokio::test]
async fn should_stay_student_with_wrong_admin_key() {
    let users = MockUserRepo::empty();
    let uc = register_usecase(users.clone(), MockMailer::new());

    let user_id = uc
        .execute(RegisterInput {
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            password: "correct horse".to_owned(),
            admin_key: Some("wrong".to_owned()),
        })
        .await
        .unwrap();

    assert_eq!(users.get(user_id).unwrap().role, UserRole::Student.as_u8());
}

#[tokio::test]
async fn should_verify_email_and_issue_session_token() {
    let mut user = test_user("ada@example.com", false);
    user.otp = Some(fresh_otp("123456"));
    let users = MockUserRepo::new(vec![user.clone()]);

    let uc = VerifyEmailUseCase {
        users: users.clone(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let (verified, token, exp) = uc
        .execute(VerifyEmailInput {
            user_id: user.id,
            otp: "123456".to_owned(),
        })
        .await
        .unwrap();

    assert!(verified.is_verified);
    assert!(verified.otp.is_none(), "otp should be consumed");

    let stored = users.get(user.id).unwrap();
    assert!(stored.is_verified);
    assert!(stored.otp.is_none());

    let info = validate_session_token(&token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, user.id);
    assert_eq!(info.token_exp, exp);
}

#[tokio::test]
async fn should_reject_wrong_otp_on_verify() {
    let mut user = test_user("ada@example.com", false);
    user.otp = Some(fresh_otp("123456"));
    let user_id = user.id;

    let uc = VerifyEmailUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc
        .execute(VerifyEmailInput {
            user_id,
            otp: "654321".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(ApiError::InvalidOtp)),
        "expected InvalidOtp, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_expired_otp_on_verify() {
    let mut user = test_user("ada@example.com", false);
    user.otp = Some(expired_otp("123456"));
    let user_id = user.id;

    let uc = VerifyEmailUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc
        .execute(VerifyEmailInput {
            user_id,
            otp: "123456".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(ApiError::OtpExpired)),
        "expected OtpExpired, got {result:?}"
    );
}

#[tokio::test]
async fn should_make_otp_single_use() {
    let mut user = test_user("ada@example.com", false);
    user.otp = Some(fresh_otp("123456"));
    let user_id = user.id;
    let users = MockUserRepo::new(vec![user]);

    let uc = VerifyEmailUseCase {
        users: users.clone(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let input = || VerifyEmailInput {
        user_id,
        otp: "123456".to_owned(),
    };
    uc.execute(input()).await.unwrap();

    // A second attempt fails because the account is already verified and
    // the code is gone.
    let result = uc.execute(input()).await;
    assert!(
        matches!(result, Err(ApiError::AlreadyVerified)),
        "expected AlreadyVerified, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_verify_for_unknown_user() {
    let uc = VerifyEmailUseCase {
        users: MockUserRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc
        .execute(VerifyEmailInput {
            user_id: Uuid::new_v4(),
            otp: "123456".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(ApiError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_replace_otp_on_resend() {
    let mut user = test_user("ada@example.com", false);
    user.otp = Some(fresh_otp("123456"));
    let users = MockUserRepo::new(vec![user.clone()]);
    let mailer = MockMailer::new();

    let uc = ResendOtpUseCase {
        users: users.clone(),
        mailer: mailer.clone(),
    };
    uc.execute(ResendOtpInput { user_id: user.id }).await.unwrap();

    let stored = users.get(user.id).unwrap();
    let new_otp = stored.otp.expect("new otp should be set");
    assert_eq!(new_otp.code.len(), 6);

    let sent = mailer.sent_mails();
    assert_eq!(
        sent,
        vec![SentMail::Verification {
            email: "ada@example.com".to_owned(),
            otp: new_otp.code,
        }]
    );
}

#[tokio::test]
async fn should_reject_resend_for_verified_account() {
    let user = test_user("ada@example.com", true);
    let user_id = user.id;
    let uc = ResendOtpUseCase {
        users: MockUserRepo::new(vec![user]),
        mailer: MockMailer::new(),
    };

    let result = uc.execute(ResendOtpInput { user_id }).await;

    assert!(
        matches!(result, Err(ApiError::AlreadyVerified)),
        "expected AlreadyVerified, got {result:?}"
    );
}

#[tokio::test]
async fn should_accept_user_id_keyed_verify_and_resend_bodies() {
    // Registration hands back a user_id; the verify and resend endpoints
    // take that id back, not the email.
    let user_id = Uuid::new_v4();

    let verify: VerifyEmailRequest = serde_json::from_value(serde_json::json!({
        "user_id": user_id,
        "otp": "123456",
    }))
    .expect("verify-email body keyed by user_id should deserialize");
    assert_eq!(verify.user_id, user_id);
    assert_eq!(verify.otp, "123456");

    let resend: ResendOtpRequest = serde_json::from_value(serde_json::json!({
        "user_id": user_id,
    }))
    .expect("resend-otp body keyed by user_id should deserialize");
    assert_eq!(resend.user_id, user_id);
}
