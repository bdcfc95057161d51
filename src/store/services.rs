//! CRUD over the `services` table.
//!
//! The category label set lives in [`crate::models::CATEGORIES`]; the store
//! itself accepts whatever label the caller validated.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::auth::new_id;
use crate::models::{Service, ServiceInput};

pub async fn list(pool: &SqlitePool) -> Result<Vec<Service>, sqlx::Error> {
    sqlx::query_as::<_, Service>(
        r#"SELECT id, title, description, price, duration, category, image, created_at
           FROM services
           ORDER BY created_at ASC"#,
    )
    .fetch_all(pool)
    .await
}

pub async fn list_by_category(
    pool: &SqlitePool,
    category: &str,
) -> Result<Vec<Service>, sqlx::Error> {
    sqlx::query_as::<_, Service>(
        r#"SELECT id, title, description, price, duration, category, image, created_at
           FROM services
           WHERE category = ?
           ORDER BY created_at ASC"#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<Service>, sqlx::Error> {
    sqlx::query_as::<_, Service>(
        r#"SELECT id, title, description, price, duration, category, image, created_at
           FROM services
           WHERE id = ?
           LIMIT 1"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create(pool: &SqlitePool, input: ServiceInput) -> Result<Service, sqlx::Error> {
    let id = new_id();
    let created_at = Utc::now().to_rfc3339();

    sqlx::query(
        r#"INSERT INTO services (id, title, description, price, duration, category, image, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.price)
    .bind(&input.duration)
    .bind(&input.category)
    .bind(&input.image)
    .bind(&created_at)
    .execute(pool)
    .await?;

    Ok(Service {
        id,
        title: input.title,
        description: input.description,
        price: input.price,
        duration: input.duration,
        category: input.category,
        image: input.image,
        created_at,
    })
}

/// Full-record replacement. Returns `None` when no row has this id.
pub async fn update(
    pool: &SqlitePool,
    id: &str,
    input: ServiceInput,
) -> Result<Option<Service>, sqlx::Error> {
    let result = sqlx::query(
        r#"UPDATE services
           SET title = ?, description = ?, price = ?, duration = ?, category = ?, image = ?
           WHERE id = ?"#,
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.price)
    .bind(&input.duration)
    .bind(&input.category)
    .bind(&input.image)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM services WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CATEGORY_HAIR, CATEGORY_SPA};
    use crate::store::testing::memory_pool;

    fn haircut() -> ServiceInput {
        ServiceInput {
            title: "Haircut & Styling".to_string(),
            description: "Precision cutting and styling.".to_string(),
            price: "From $45".to_string(),
            duration: "45 mins".to_string(),
            category: CATEGORY_HAIR.to_string(),
            image: "/images/services/haircut.jpg".to_string(),
        }
    }

    async fn insert_with_timestamp(pool: &SqlitePool, id: &str, category: &str, created_at: &str) {
        sqlx::query(
            r#"INSERT INTO services (id, title, description, price, duration, category, image, created_at)
               VALUES (?, ?, '', '', '', ?, '', ?)"#,
        )
        .bind(id)
        .bind(id)
        .bind(category)
        .bind(created_at)
        .execute(pool)
        .await
        .unwrap();
    }

    #[actix_web::test]
    async fn create_then_list_contains_record_with_generated_fields() {
        let pool = memory_pool().await;

        let created = create(&pool, haircut()).await.unwrap();
        assert!(!created.id.is_empty());
        assert!(!created.created_at.is_empty());

        let listed = list(&pool).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], created);
    }

    #[actix_web::test]
    async fn update_replaces_fields_and_keeps_count() {
        let pool = memory_pool().await;
        let service = create(&pool, haircut()).await.unwrap();

        let mut patch = haircut();
        patch.price = "From $55".to_string();
        let updated = update(&pool, &service.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.id, service.id);
        assert_eq!(updated.price, "From $55");
        assert_eq!(updated.created_at, service.created_at);
        assert_eq!(list(&pool).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn update_missing_id_returns_none() {
        let pool = memory_pool().await;
        assert!(update(&pool, "no-such-id", haircut()).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn delete_reports_success_and_shrinks_list_by_one() {
        let pool = memory_pool().await;
        let service = create(&pool, haircut()).await.unwrap();
        create(&pool, haircut()).await.unwrap();

        assert!(delete(&pool, &service.id).await.unwrap());

        let listed = list(&pool).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed.iter().all(|s| s.id != service.id));
    }

    #[actix_web::test]
    async fn delete_missing_id_reports_failure_and_changes_nothing() {
        let pool = memory_pool().await;
        create(&pool, haircut()).await.unwrap();

        assert!(!delete(&pool, "no-such-id").await.unwrap());
        assert_eq!(list(&pool).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn category_filter_matches_exactly_and_preserves_order() {
        let pool = memory_pool().await;
        insert_with_timestamp(&pool, "spa-day", CATEGORY_SPA, "2024-01-02T09:00:00+00:00").await;
        insert_with_timestamp(&pool, "first-cut", CATEGORY_HAIR, "2024-01-01T09:00:00+00:00").await;
        insert_with_timestamp(&pool, "second-cut", CATEGORY_HAIR, "2024-01-03T09:00:00+00:00").await;

        let hair = list_by_category(&pool, CATEGORY_HAIR).await.unwrap();
        let ids: Vec<&str> = hair.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["first-cut", "second-cut"]);
        assert!(hair.iter().all(|s| s.category == CATEGORY_HAIR));
    }
}
