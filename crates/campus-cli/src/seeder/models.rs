//! Seed rows and seeding configuration.

/// Prefix that marks seeded course names so they can be cleared later.
pub const DEMO_COURSE_PREFIX: &str = "Demo ";

/// Email domain used for seeded teachers and testimonials.
pub const SEED_EMAIL_DOMAIN: &str = "seed.campus.test";

pub struct CourseSeed {
    pub course_name: String,
    pub description: String,
    pub duration: String,
    pub course_fee: f64,
    pub total_semesters: i32,
}

pub struct TeacherSeed {
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub role: String,
    pub specialization: String,
    pub experience: String,
    pub linkedin: Option<String>,
}

pub struct TestimonialSeed {
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub message: String,
    pub job_role: String,
    pub star: i32,
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub courses: usize,
    pub teachers: usize,
    pub testimonials: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            courses: 8,
            teachers: 12,
            testimonials: 10,
        }
    }
}

impl SeedConfig {
    pub fn with_courses(mut self, courses: usize) -> Self {
        self.courses = courses;
        self
    }

    pub fn with_teachers(mut self, teachers: usize) -> Self {
        self.teachers = teachers;
        self
    }

    pub fn with_testimonials(mut self, testimonials: usize) -> Self {
        self.testimonials = testimonials;
        self
    }
}
