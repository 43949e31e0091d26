pub use campus_models::testimonials::{CreateTestimonialDto, DEFAULT_AVATAR_URL, Testimonial};

pub const TESTIMONIAL_IMAGE_FOLDER: &str = "testimonials";
