use std::{env, fs, path::Path};

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    auth::{hash_password, new_id},
    models::{
        ServiceInput, StaffInput, CATEGORY_HAIR, CATEGORY_MAKEUP, CATEGORY_NAILS, CATEGORY_SPA,
    },
    store,
};

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Creates the parent directory for file-backed sqlite URLs.
pub fn ensure_sqlite_dir(db_url: &str) -> std::io::Result<()> {
    let path = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"));

    let Some(path) = path else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path == ":memory:" || path.is_empty() {
        return Ok(());
    }

    let path = path.strip_prefix("file:").unwrap_or(path);
    if let Some(parent) = Path::new(path).parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub async fn seed_defaults(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    seed_admin(pool).await?;
    seed_site_content(pool).await?;
    Ok(())
}

async fn seed_admin(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let existing = sqlx::query_as::<_, (String,)>("SELECT id FROM users LIMIT 1")
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        return Ok(());
    }

    let email = env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@refinestudio.com".to_string());
    let password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());
    let display_name = env::var("ADMIN_DISPLAY_NAME").unwrap_or_else(|_| "Studio Admin".to_string());

    if password == "admin" {
        log::warn!("ADMIN_PASSWORD not set. Using default password 'admin'. Set ADMIN_PASSWORD in production.");
    }

    let password_hash = hash_password(&password)
        .map_err(|_| sqlx::Error::Protocol("password hash failed".into()))?;
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"INSERT INTO users (id, email, display_name, password_hash, active, created_at)
           VALUES (?, ?, ?, ?, 1, ?)"#,
    )
    .bind(new_id())
    .bind(email)
    .bind(display_name)
    .bind(password_hash)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Seeds the sample roster and service menu on first start. Skipped when
/// the tables already hold records, or when SEED_SAMPLE_DATA=false.
async fn seed_site_content(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let enabled = env::var("SEED_SAMPLE_DATA").unwrap_or_else(|_| "true".to_string());
    if enabled != "true" {
        return Ok(());
    }

    let staff_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM staff")
        .fetch_one(pool)
        .await?;
    if staff_count == 0 {
        for member in sample_staff() {
            store::staff::create(pool, member).await?;
        }
    }

    let service_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM services")
        .fetch_one(pool)
        .await?;
    if service_count == 0 {
        for service in sample_services() {
            store::services::create(pool, service).await?;
        }
    }

    Ok(())
}

fn sample_staff() -> Vec<StaffInput> {
    let member = |name: &str, role: &str, specialties: &[&str], booksy: Option<&str>, email: &str, phone: &str| StaffInput {
        name: name.to_string(),
        role: role.to_string(),
        specialties: specialties.iter().map(|s| s.to_string()).collect(),
        image: "/static/images/placeholder-staff.svg".to_string(),
        booksy_url: booksy.map(|url| url.to_string()),
        email: email.to_string(),
        phone: phone.to_string(),
    };

    vec![
        member(
            "Emma Johnson",
            "Senior Stylist",
            &["Haircuts", "Coloring", "Styling"],
            Some("https://booksy.com/en-us/profile/stylist1"),
            "emma@refinestudio.com",
            "(123) 456-7891",
        ),
        member(
            "Michael Chen",
            "Color Specialist",
            &["Balayage", "Highlights", "Color Correction"],
            Some("https://booksy.com/en-us/profile/stylist2"),
            "michael@refinestudio.com",
            "(123) 456-7892",
        ),
        member(
            "Sofia Rodriguez",
            "Nail Technician",
            &["Manicures", "Pedicures", "Nail Art"],
            None,
            "sofia@refinestudio.com",
            "(123) 456-7893",
        ),
        member(
            "James Wilson",
            "Makeup Artist",
            &["Bridal", "Special Occasion", "Lessons"],
            None,
            "james@refinestudio.com",
            "(123) 456-7894",
        ),
    ]
}

fn sample_services() -> Vec<ServiceInput> {
    let service = |title: &str, description: &str, price: &str, duration: &str, category: &str| ServiceInput {
        title: title.to_string(),
        description: description.to_string(),
        price: price.to_string(),
        duration: duration.to_string(),
        category: category.to_string(),
        image: "/static/images/placeholder-service.svg".to_string(),
    };

    vec![
        service(
            "Haircut & Styling",
            "Precision cutting and styling tailored to your face shape and preferences.",
            "From $45",
            "45 mins",
            CATEGORY_HAIR,
        ),
        service(
            "Hair Coloring",
            "From subtle highlights to bold transformations using premium products.",
            "From $85",
            "2 hours",
            CATEGORY_HAIR,
        ),
        service(
            "Hair Treatments",
            "Nourishing treatments to repair and revitalize damaged hair.",
            "From $65",
            "1 hour",
            CATEGORY_HAIR,
        ),
        service(
            "Manicure",
            "Classic or gel manicures with a wide range of colors to choose from.",
            "From $35",
            "45 mins",
            CATEGORY_NAILS,
        ),
        service(
            "Pedicure",
            "Relaxing foot treatment with exfoliation, massage, and polish.",
            "From $45",
            "1 hour",
            CATEGORY_NAILS,
        ),
        service(
            "Nail Art",
            "Custom designs and embellishments to express your personal style.",
            "From $15",
            "30 mins",
            CATEGORY_NAILS,
        ),
        service(
            "Everyday Makeup",
            "Natural-looking makeup that enhances your features for daily wear.",
            "From $55",
            "45 mins",
            CATEGORY_MAKEUP,
        ),
        service(
            "Special Occasion",
            "Glamorous makeup for weddings, parties, and special events.",
            "From $85",
            "1 hour",
            CATEGORY_MAKEUP,
        ),
        service(
            "Makeup Lesson",
            "Learn techniques and tips from our professional makeup artists.",
            "From $95",
            "1.5 hours",
            CATEGORY_MAKEUP,
        ),
        service(
            "Facial Treatment",
            "Customized facial to address your specific skin concerns.",
            "From $75",
            "1 hour",
            CATEGORY_SPA,
        ),
        service(
            "Massage Therapy",
            "Relaxing massage to relieve tension and promote wellness.",
            "From $85",
            "1 hour",
            CATEGORY_SPA,
        ),
        service(
            "Body Scrub",
            "Exfoliating treatment that leaves your skin smooth and refreshed.",
            "From $65",
            "45 mins",
            CATEGORY_SPA,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::memory_pool;

    #[actix_web::test]
    async fn seeding_twice_inserts_nothing_new() {
        let pool = memory_pool().await;

        seed_defaults(&pool).await.unwrap();
        let staff_after_first = store::staff::list(&pool).await.unwrap().len();
        let services_after_first = store::services::list(&pool).await.unwrap().len();
        assert_eq!(staff_after_first, 4);
        assert_eq!(services_after_first, 12);

        seed_defaults(&pool).await.unwrap();
        assert_eq!(store::staff::list(&pool).await.unwrap().len(), staff_after_first);
        assert_eq!(
            store::services::list(&pool).await.unwrap().len(),
            services_after_first
        );
    }

    #[test]
    fn sqlite_dir_is_ignored_for_memory_urls() {
        ensure_sqlite_dir("sqlite::memory:").unwrap();
        ensure_sqlite_dir("postgres://elsewhere/db").unwrap();
    }
}
