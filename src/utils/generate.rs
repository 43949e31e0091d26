use chrono::{Datelike, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;

/// `STU<year><6 digits>`, e.g. `STU2025048213`.
pub fn generate_unique_id() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("STU{}{:06}", Utc::now().year(), suffix)
}

/// Initial password for accounts created on admission acceptance.
pub fn generate_password(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
