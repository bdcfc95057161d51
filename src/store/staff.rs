//! CRUD over the `staff` table. Identifiers and creation timestamps are
//! assigned here; callers never supply them.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::auth::new_id;
use crate::models::{StaffInput, StaffMember, StaffRow};

pub async fn list(pool: &SqlitePool) -> Result<Vec<StaffMember>, sqlx::Error> {
    let rows = sqlx::query_as::<_, StaffRow>(
        r#"SELECT id, name, role, specialties, image, booksy_url, email, phone, created_at
           FROM staff
           ORDER BY created_at ASC"#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(StaffMember::from).collect())
}

pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<StaffMember>, sqlx::Error> {
    let row = sqlx::query_as::<_, StaffRow>(
        r#"SELECT id, name, role, specialties, image, booksy_url, email, phone, created_at
           FROM staff
           WHERE id = ?
           LIMIT 1"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(StaffMember::from))
}

pub async fn create(pool: &SqlitePool, input: StaffInput) -> Result<StaffMember, sqlx::Error> {
    let id = new_id();
    let created_at = Utc::now().to_rfc3339();

    sqlx::query(
        r#"INSERT INTO staff (id, name, role, specialties, image, booksy_url, email, phone, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&id)
    .bind(&input.name)
    .bind(&input.role)
    .bind(encode_specialties(&input.specialties))
    .bind(&input.image)
    .bind(&input.booksy_url)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(&created_at)
    .execute(pool)
    .await?;

    Ok(StaffMember {
        id,
        name: input.name,
        role: input.role,
        specialties: input.specialties,
        image: input.image,
        booksy_url: input.booksy_url,
        email: input.email,
        phone: input.phone,
        created_at,
    })
}

/// Full-record replacement. Returns `None` when no row has this id.
pub async fn update(
    pool: &SqlitePool,
    id: &str,
    input: StaffInput,
) -> Result<Option<StaffMember>, sqlx::Error> {
    let result = sqlx::query(
        r#"UPDATE staff
           SET name = ?, role = ?, specialties = ?, image = ?, booksy_url = ?, email = ?, phone = ?
           WHERE id = ?"#,
    )
    .bind(&input.name)
    .bind(&input.role)
    .bind(encode_specialties(&input.specialties))
    .bind(&input.image)
    .bind(&input.booksy_url)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM staff WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn encode_specialties(specialties: &[String]) -> String {
    serde_json::to_string(specialties).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::split_specialties;
    use crate::store::testing::memory_pool;

    fn colorist() -> StaffInput {
        StaffInput {
            name: "Ada Lovelace".to_string(),
            role: "Colorist".to_string(),
            specialties: split_specialties("Balayage, Highlights"),
            image: "/images/staff/ada.jpg".to_string(),
            booksy_url: None,
            email: "ada@refinestudio.com".to_string(),
            phone: "(123) 456-7890".to_string(),
        }
    }

    #[actix_web::test]
    async fn create_then_list_contains_record_with_generated_fields() {
        let pool = memory_pool().await;

        let created = create(&pool, colorist()).await.unwrap();
        assert!(!created.id.is_empty());
        assert!(!created.created_at.is_empty());
        assert_eq!(created.specialties, vec!["Balayage", "Highlights"]);

        let listed = list(&pool).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], created);
    }

    #[actix_web::test]
    async fn update_replaces_fields_and_keeps_count() {
        let pool = memory_pool().await;
        let first = create(&pool, colorist()).await.unwrap();
        let second = create(
            &pool,
            StaffInput {
                name: "Grace Hopper".to_string(),
                role: "Stylist".to_string(),
                ..StaffInput::default()
            },
        )
        .await
        .unwrap();

        let mut patch = colorist();
        patch.role = "Senior Colorist".to_string();
        patch.booksy_url = Some("https://booksy.com/en-us/profile/ada".to_string());
        let updated = update(&pool, &first.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.id, first.id);
        assert_eq!(updated.role, "Senior Colorist");
        assert_eq!(
            updated.booksy_url.as_deref(),
            Some("https://booksy.com/en-us/profile/ada")
        );
        assert_eq!(updated.created_at, first.created_at);

        let listed = list(&pool).await.unwrap();
        assert_eq!(listed.len(), 2);
        let matching: Vec<_> = listed.iter().filter(|m| m.id == first.id).collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].role, "Senior Colorist");
        assert!(listed.iter().any(|m| m.id == second.id));
    }

    #[actix_web::test]
    async fn update_missing_id_returns_none() {
        let pool = memory_pool().await;
        create(&pool, colorist()).await.unwrap();

        let outcome = update(&pool, "no-such-id", colorist()).await.unwrap();
        assert!(outcome.is_none());
        assert_eq!(list(&pool).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn delete_removes_exactly_one_record() {
        let pool = memory_pool().await;
        let keep = create(&pool, colorist()).await.unwrap();
        let gone = create(
            &pool,
            StaffInput {
                name: "Grace Hopper".to_string(),
                role: "Stylist".to_string(),
                ..StaffInput::default()
            },
        )
        .await
        .unwrap();

        assert!(delete(&pool, &gone.id).await.unwrap());

        let listed = list(&pool).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, keep.id);
    }

    #[actix_web::test]
    async fn delete_missing_id_reports_failure_and_changes_nothing() {
        let pool = memory_pool().await;
        create(&pool, colorist()).await.unwrap();

        assert!(!delete(&pool, "no-such-id").await.unwrap());
        assert_eq!(list(&pool).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn list_orders_by_creation_time_ascending() {
        let pool = memory_pool().await;
        for (id, created_at) in [
            ("later", "2024-03-01T10:00:00+00:00"),
            ("earliest", "2024-01-01T10:00:00+00:00"),
            ("middle", "2024-02-01T10:00:00+00:00"),
        ] {
            sqlx::query(
                r#"INSERT INTO staff (id, name, role, specialties, image, email, phone, created_at)
                   VALUES (?, ?, '', '[]', '', '', '', ?)"#,
            )
            .bind(id)
            .bind(id)
            .bind(created_at)
            .execute(&pool)
            .await
            .unwrap();
        }

        let ids: Vec<String> = list(&pool).await.unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["earliest", "middle", "later"]);
    }
}
