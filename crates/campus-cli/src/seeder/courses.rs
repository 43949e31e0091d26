//! Course seeding.

use fake::Fake;
use fake::faker::lorem::en::Paragraph;
use rayon::prelude::*;
use sqlx::PgPool;
use std::time::Instant;

use super::models::{CourseSeed, DEMO_COURSE_PREFIX};

const PROGRAMMES: &[(&str, i32)] = &[
    ("Bachelor of Computer Applications", 6),
    ("Bachelor of Business Administration", 6),
    ("Bachelor of Commerce", 6),
    ("Bachelor of Science", 6),
    ("Master of Computer Applications", 4),
    ("Master of Business Administration", 4),
    ("Diploma in Data Science", 2),
    ("Diploma in Digital Marketing", 2),
];

/// Generates course data in parallel using Rayon. Names carry an index so
/// they stay unique.
pub fn generate_courses(count: usize) -> Vec<CourseSeed> {
    (0..count)
        .into_par_iter()
        .map(|i| {
            let (programme, semesters) = PROGRAMMES[i % PROGRAMMES.len()];
            let fee_thousands: i32 = (20..150).fake();

            CourseSeed {
                course_name: format!("{}{} {}", DEMO_COURSE_PREFIX, programme, i + 1),
                description: Paragraph(2..4).fake(),
                duration: format!("{} years", semesters / 2),
                course_fee: f64::from(fee_thousands * 1000),
                total_semesters: semesters,
            }
        })
        .collect()
}

pub async fn seed_courses(db: &PgPool, count: usize) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("📚 Seeding {} courses...", count);

    let courses = generate_courses(count);
    let mut tx = db.begin().await?;
    let mut inserted = 0;

    for course in &courses {
        inserted += sqlx::query(
            "INSERT INTO courses (course_name, description, duration, course_fee, total_semesters)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (course_name) DO NOTHING",
        )
        .bind(&course.course_name)
        .bind(&course.description)
        .bind(&course.duration)
        .bind(course.course_fee)
        .bind(course.total_semesters)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} courses in {:?}",
        inserted,
        start_time.elapsed()
    );
    Ok(inserted)
}

/// Removes seeded courses that no student has applied to.
pub async fn clear_courses(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let result = sqlx::query(
        "DELETE FROM courses c
         WHERE c.course_name LIKE $1 || '%'
           AND NOT EXISTS (SELECT 1 FROM students s WHERE s.course_id = c.id)",
    )
    .bind(DEMO_COURSE_PREFIX)
    .execute(db)
    .await?
    .rows_affected();

    println!("   ✓ Deleted {} courses", result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_courses_unique_names() {
        let courses = generate_courses(20);
        let mut names: Vec<_> = courses.iter().map(|c| c.course_name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 20);
        assert!(courses.iter().all(|c| c.course_fee > 0.0));
        assert!(courses.iter().all(|c| c.course_name.starts_with(DEMO_COURSE_PREFIX)));
    }
}
