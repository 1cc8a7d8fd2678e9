//! User account persistence and password hashing

use rand::Rng;
use setlist_common::{Error, Result};
use sha2::{Digest, Sha256};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// User account record
#[derive(Debug, Clone)]
pub struct User {
    pub guid: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
}

/// Salted SHA-256, hex encoded
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Random alphanumeric salt, one per user
pub fn generate_salt() -> String {
    let mut rng = rand::thread_rng();
    (0..16)
        .map(|_| rng.sample(rand::distributions::Alphanumeric) as char)
        .collect()
}

/// Constant-shape password check against the stored hash
pub fn verify_password(user: &User, password: &str) -> bool {
    hash_password(password, &user.password_salt) == user.password_hash
}

/// Create a new user account. Emails are stored lowercase; duplicates are
/// rejected before the write.
pub async fn create_user(pool: &SqlitePool, name: &str, email: &str, password: &str) -> Result<User> {
    let email = email.to_lowercase();

    if find_by_email(pool, &email).await?.is_some() {
        return Err(Error::InvalidInput("Email already exists".to_string()));
    }

    let salt = generate_salt();
    let user = User {
        guid: Uuid::new_v4(),
        name: name.to_string(),
        email,
        password_hash: hash_password(password, &salt),
        password_salt: salt,
    };

    sqlx::query(
        r#"
        INSERT INTO users (guid, name, email, password_hash, password_salt)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(user.guid.to_string())
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.password_salt)
    .execute(pool)
    .await?;

    Ok(user)
}

/// Load user by email (lowercased lookup)
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT guid, name, email, password_hash, password_salt FROM users WHERE email = ?",
    )
    .bind(email.to_lowercase())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let guid_str: String = row.get("guid");
            Ok(Some(User {
                guid: Uuid::parse_str(&guid_str)
                    .map_err(|e| Error::Internal(format!("Invalid user guid: {}", e)))?,
                name: row.get("name"),
                email: row.get("email"),
                password_hash: row.get("password_hash"),
                password_salt: row.get("password_salt"),
            }))
        }
        None => Ok(None),
    }
}
