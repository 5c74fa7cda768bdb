pub mod account;
pub mod admin;
pub mod course;
pub mod enrollment;
pub mod lesson;
pub mod password;
pub mod progress;
pub mod session;

use rand::RngExt;

/// Generate a 6-digit numeric OTP.
pub(crate) fn generate_otp() -> String {
    let mut rng = rand::rng();
    rng.random_range(100_000..1_000_000u32).to_string()
}

/// bcrypt work factor for password hashing.
pub(crate) const BCRYPT_COST: u32 = 12;
