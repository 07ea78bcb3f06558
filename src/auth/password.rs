use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::Rng;

pub fn hash_password(password: &str) -> String {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

pub fn verify_password(password: &str, hashed: &str) -> Result<(), argon2::password_hash::Error> {
    let argon2 = Argon2::default();
    let parsed = PasswordHash::new(hashed)?;

    argon2.verify_password(password.as_bytes(), &parsed)
}

/// Initial password for a provisioned teacher account:
/// first name + "SCH" + school id + three random digits, e.g. JaneSCH12842.
/// The teacher is expected to change it after first login.
pub fn generate_teacher_password(teacher_name: &str, school_id: u64) -> String {
    let first = teacher_name
        .split_whitespace()
        .next()
        .unwrap_or(teacher_name);

    let digits = rand::thread_rng().gen_range(100..=999);

    format!("{}SCH{}{}", first, school_id, digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hashed = hash_password("s3cret");
        assert!(verify_password("s3cret", &hashed).is_ok());
        assert!(verify_password("wrong", &hashed).is_err());
    }

    #[test]
    fn teacher_password_shape() {
        let pw = generate_teacher_password("Jane Doe", 12);
        assert!(pw.starts_with("JaneSCH12"));
        let digits = &pw["JaneSCH12".len()..];
        assert_eq!(digits.len(), 3);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn teacher_password_single_name() {
        let pw = generate_teacher_password("Jane", 1);
        assert!(pw.starts_with("JaneSCH1"));
    }
}
