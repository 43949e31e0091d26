use campus_cli::admin::create_admin;
use campus_cli::seeder::{self, SeedConfig};
use campus_db::{init_db_pool, run_migrations};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "campus-cli")]
#[command(about = "Campus CLI - Administrative tools for the Campus API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed demo courses, teachers and testimonials
    Seed {
        #[arg(long, default_value = "8")]
        courses: usize,

        #[arg(long, default_value = "12")]
        teachers: usize,

        #[arg(long, default_value = "10")]
        testimonials: usize,
    },
    /// Remove seeded demo data
    ClearSeed,
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let pool = match init_db_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        }
    };

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => handle_create_admin(&pool, name, email, password).await,
        Commands::Seed {
            courses,
            teachers,
            testimonials,
        } => {
            let config = SeedConfig::default()
                .with_courses(courses)
                .with_teachers(teachers)
                .with_testimonials(testimonials);

            if let Err(e) = seeder::seed_all(&pool, config).await {
                eprintln!("\n❌ Error seeding database: {}", e);
                std::process::exit(1);
            }
        }
        Commands::ClearSeed => {
            if let Err(e) = seeder::clear_seeded_data(&pool).await {
                eprintln!("\n❌ Error clearing seeded data: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Migrate => match run_migrations(&pool).await {
            Ok(()) => println!("✅ Migrations applied"),
            Err(e) => {
                eprintln!("❌ {:#}", e);
                std::process::exit(1);
            }
        },
    }
}

async fn handle_create_admin(
    pool: &sqlx::postgres::PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let prompted = (|| -> Result<(String, String, String), dialoguer::Error> {
        let name = match name {
            Some(name) => name,
            None => Input::new().with_prompt("Name").interact_text()?,
        };
        let email = match email {
            Some(email) => email,
            None => Input::new().with_prompt("Email address").interact_text()?,
        };
        let password = match password {
            Some(password) => password,
            None => Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords don't match")
                .interact()?,
        };
        Ok((name, email, password))
    })();

    let (name, email, password) = match prompted {
        Ok(values) => values,
        Err(e) => {
            eprintln!("\n❌ Failed to read input: {}", e);
            std::process::exit(1);
        }
    };

    match create_admin(pool, &name, &email, &password).await {
        Ok(_) => {
            println!("\n✅ Admin created successfully!");
            println!("   Email: {}", email);
            println!("   Name: {}", name);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating admin: {}", e);
            std::process::exit(1);
        }
    }
}
