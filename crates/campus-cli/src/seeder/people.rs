//! Teacher and testimonial seeding.

use campus_models::DEFAULT_AVATAR_URL;
use fake::Fake;
use fake::faker::job::en::Title;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use rayon::prelude::*;
use sqlx::PgPool;
use std::time::Instant;

use super::models::{SEED_EMAIL_DOMAIN, TeacherSeed, TestimonialSeed};

const DESIGNATIONS: &[&str] = &[
    "Professor",
    "Associate Professor",
    "Assistant Professor",
    "Lecturer",
];

const SPECIALIZATIONS: &[&str] = &[
    "Computer Science",
    "Mathematics",
    "Finance",
    "Marketing",
    "Physics",
    "English Literature",
];

fn seed_email(kind: &str, index: usize) -> String {
    format!("{}{}@{}", kind, index, SEED_EMAIL_DOMAIN)
}

pub fn generate_teachers(count: usize) -> Vec<TeacherSeed> {
    (0..count)
        .into_par_iter()
        .map(|i| {
            let name: String = Name().fake();
            let email = seed_email("teacher", i);
            let years: u8 = (2..30).fake();

            TeacherSeed {
                image_url: format!("https://i.pravatar.cc/300?u={}", email),
                linkedin: Some(format!(
                    "https://www.linkedin.com/in/{}",
                    name.to_lowercase().replace(' ', "-")
                )),
                name,
                email,
                role: DESIGNATIONS[i % DESIGNATIONS.len()].to_string(),
                specialization: SPECIALIZATIONS[i % SPECIALIZATIONS.len()].to_string(),
                experience: format!("{} years", years),
            }
        })
        .collect()
}

pub fn generate_testimonials(count: usize) -> Vec<TestimonialSeed> {
    (0..count)
        .into_par_iter()
        .map(|i| TestimonialSeed {
            name: Name().fake(),
            email: seed_email("alumni", i),
            image_url: DEFAULT_AVATAR_URL.to_string(),
            message: Sentence(8..20).fake(),
            job_role: Title().fake(),
            star: (3..6).fake(),
        })
        .collect()
}

pub async fn seed_teachers(db: &PgPool, count: usize) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🧑‍🏫 Seeding {} teachers...", count);

    let teachers = generate_teachers(count);
    let mut tx = db.begin().await?;

    for teacher in &teachers {
        sqlx::query(
            "INSERT INTO teachers (name, email, image_url, role, specialization, experience, linkedin)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&teacher.name)
        .bind(&teacher.email)
        .bind(&teacher.image_url)
        .bind(&teacher.role)
        .bind(&teacher.specialization)
        .bind(&teacher.experience)
        .bind(&teacher.linkedin)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} teachers in {:?}",
        teachers.len(),
        start_time.elapsed()
    );
    Ok(teachers.len() as u64)
}

pub async fn seed_testimonials(
    db: &PgPool,
    count: usize,
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("💬 Seeding {} testimonials...", count);

    let testimonials = generate_testimonials(count);
    let mut tx = db.begin().await?;
    let mut inserted = 0;

    for testimonial in &testimonials {
        inserted += sqlx::query(
            "INSERT INTO testimonials (name, email, image_url, message, job_role, star)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(&testimonial.name)
        .bind(&testimonial.email)
        .bind(&testimonial.image_url)
        .bind(&testimonial.message)
        .bind(&testimonial.job_role)
        .bind(testimonial.star)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} testimonials in {:?}",
        inserted,
        start_time.elapsed()
    );
    Ok(inserted)
}

pub async fn clear_people(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let pattern = format!("%@{}", SEED_EMAIL_DOMAIN);

    let teachers = sqlx::query("DELETE FROM teachers WHERE email LIKE $1")
        .bind(&pattern)
        .execute(db)
        .await?
        .rows_affected();
    let testimonials = sqlx::query("DELETE FROM testimonials WHERE email LIKE $1")
        .bind(&pattern)
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} teachers and {} testimonials",
        teachers, testimonials
    );
    Ok(teachers + testimonials)
}
