pub const CATEGORY_HAIR: &str = "hair";
pub const CATEGORY_NAILS: &str = "nails";
pub const CATEGORY_MAKEUP: &str = "makeup";
pub const CATEGORY_SPA: &str = "spa";

pub const CATEGORIES: [&str; 4] = [CATEGORY_HAIR, CATEGORY_NAILS, CATEGORY_MAKEUP, CATEGORY_SPA];

#[allow(dead_code)]
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub active: i64,
    pub created_at: String,
}

/// Raw `staff` row; `specialties` is stored as a JSON array of labels.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StaffRow {
    pub id: String,
    pub name: String,
    pub role: String,
    pub specialties: String,
    pub image: String,
    pub booksy_url: Option<String>,
    pub email: String,
    pub phone: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub specialties: Vec<String>,
    pub image: String,
    pub booksy_url: Option<String>,
    pub email: String,
    pub phone: String,
    pub created_at: String,
}

impl From<StaffRow> for StaffMember {
    fn from(row: StaffRow) -> Self {
        let specialties = match serde_json::from_str(&row.specialties) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("Invalid specialties payload for staff {}: {err}", row.id);
                Vec::new()
            }
        };
        StaffMember {
            id: row.id,
            name: row.name,
            role: row.role,
            specialties,
            image: row.image,
            booksy_url: row.booksy_url,
            email: row.email,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Service {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub duration: String,
    pub category: String,
    pub image: String,
    pub created_at: String,
}

/// Staff fields as submitted; id and created_at are assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct StaffInput {
    pub name: String,
    pub role: String,
    pub specialties: Vec<String>,
    pub image: String,
    pub booksy_url: Option<String>,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceInput {
    pub title: String,
    pub description: String,
    pub price: String,
    pub duration: String,
    pub category: String,
    pub image: String,
}

/// Turns the comma-separated form field into an ordered specialty list.
pub fn split_specialties(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_string())
        .collect()
}
