//! Demo data seeding.
//!
//! Seeded rows are recognisable (course name prefix, email domain) so
//! `clear-seed` removes them without touching real data.

pub mod courses;
pub mod models;
pub mod people;

use sqlx::PgPool;
use std::time::Instant;

pub use courses::{clear_courses, seed_courses};
pub use models::SeedConfig;
pub use people::{clear_people, seed_teachers, seed_testimonials};

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🌱 Seeding database with {:?}", config);

    seed_courses(db, config.courses).await?;
    seed_teachers(db, config.teachers).await?;
    seed_testimonials(db, config.testimonials).await?;

    println!("\n✅ Seeding finished in {:?}", start_time.elapsed());
    Ok(())
}

pub async fn clear_seeded_data(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    println!("🗑️  Clearing seeded data...");
    clear_people(db).await?;
    clear_courses(db).await?;
    Ok(())
}
