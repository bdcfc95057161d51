use actix_web::{http::header, web, HttpRequest, HttpResponse, Result};
use actix_web::http::header::Header;
use actix_web_httpauth::headers::authorization::{Authorization, Basic};
use askama::Template;
use chrono::{Datelike, Utc};
use serde::Deserialize;

use crate::{
    auth::{
        authenticate_credentials, clear_logout_cookie, logout_cookie, session_error_response,
        AUTH_REALM,
    },
    filters,
    models::{StaffMember, CATEGORIES, CATEGORY_HAIR},
    state::AppState,
    store,
    templates::render,
};

#[derive(Clone, Debug)]
struct CategoryTab {
    value: &'static str,
    selected: bool,
}

#[derive(Clone, Debug)]
struct ServiceCardView {
    title: String,
    description: String,
    price: String,
    duration: String,
    image: String,
    has_image: bool,
}

#[derive(Clone, Debug)]
struct StaffCardView {
    name: String,
    role: String,
    specialties: Vec<String>,
    booksy_url: String,
    has_booksy: bool,
    email: String,
    phone: String,
}

#[derive(Clone, Debug, Default)]
struct ContactView {
    name: String,
    email: String,
    phone: String,
    message: String,
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    categories: Vec<CategoryTab>,
    active_category: String,
    services: Vec<ServiceCardView>,
    staff: Vec<StaffCardView>,
    contact: ContactView,
    contact_errors: Vec<String>,
    year: i32,
}

#[derive(Template)]
#[template(path = "contact_success.html")]
struct ContactSuccessTemplate {
    name: String,
    year: i32,
}

#[derive(Deserialize)]
struct CategoryFilter {
    category: Option<String>,
}

#[derive(Deserialize)]
struct ContactForm {
    name: String,
    email: String,
    phone: Option<String>,
    message: String,
}

#[derive(Deserialize)]
struct LoginQuery {
    next: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(home)))
        .service(web::resource("/contact").route(web::post().to(submit_contact)))
        .service(web::resource("/login").route(web::get().to(login)))
        .service(web::resource("/logout").route(web::get().to(logout)))
        .service(web::resource("/health").route(web::get().to(health)));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

async fn logout(req: HttpRequest) -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header((header::LOCATION, "/"))
        .cookie(logout_cookie(&req))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

async fn login(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<LoginQuery>,
) -> HttpResponse {
    let auth = match Authorization::<Basic>::parse(&req) {
        Ok(auth) => auth,
        Err(_) => return auth_challenge(),
    };
    let credentials = auth.into_scheme();
    let email = credentials.user_id();
    let password = credentials.password().unwrap_or_default();

    match authenticate_credentials(&state, email, password).await {
        Ok(Some(_user)) => {}
        Ok(None) => return auth_challenge(),
        Err(_) => return session_error_response(),
    }

    let requested = query.next.as_deref().unwrap_or("");
    let redirect = if requested.starts_with("/admin") {
        requested
    } else {
        "/admin/dashboard"
    };

    HttpResponse::SeeOther()
        .append_header((header::LOCATION, redirect))
        .cookie(clear_logout_cookie(&req))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

fn auth_challenge() -> HttpResponse {
    HttpResponse::Unauthorized()
        .insert_header((header::WWW_AUTHENTICATE, format!("Basic realm=\"{}\"", AUTH_REALM)))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

async fn home(state: web::Data<AppState>, query: web::Query<CategoryFilter>) -> Result<HttpResponse> {
    let active = normalize_category(query.category.as_deref());
    render_home(&state, active, ContactView::default(), Vec::new()).await
}

async fn submit_contact(
    state: web::Data<AppState>,
    form: web::Form<ContactForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let mut errors = Vec::new();
    if form.name.trim().is_empty() {
        errors.push("Your name is required.".to_string());
    }
    if form.email.trim().is_empty() {
        errors.push("An email address is required.".to_string());
    }
    if form.message.trim().is_empty() {
        errors.push("Please tell us how we can help.".to_string());
    }

    if !errors.is_empty() {
        let contact = ContactView {
            name: form.name,
            email: form.email,
            phone: form.phone.unwrap_or_default(),
            message: form.message,
        };
        return render_home(&state, CATEGORY_HAIR, contact, errors).await;
    }

    // Inquiries are relayed, not stored; the log is the paper trail.
    log::info!(
        "Contact inquiry from {} <{}>",
        form.name.trim(),
        form.email.trim()
    );

    Ok(render(ContactSuccessTemplate {
        name: form.name.trim().to_string(),
        year: Utc::now().year(),
    }))
}

async fn render_home(
    state: &web::Data<AppState>,
    active_category: &'static str,
    contact: ContactView,
    contact_errors: Vec<String>,
) -> Result<HttpResponse> {
    let services = store::services::list_by_category(&state.db, active_category)
        .await
        .unwrap_or_else(|err| {
            log::error!("Failed to load services: {err}");
            Vec::new()
        });
    let staff = store::staff::list(&state.db).await.unwrap_or_else(|err| {
        log::error!("Failed to load staff: {err}");
        Vec::new()
    });

    let categories = CATEGORIES
        .iter()
        .copied()
        .map(|value| CategoryTab {
            value,
            selected: value == active_category,
        })
        .collect();

    let services = services
        .into_iter()
        .map(|service| ServiceCardView {
            title: service.title,
            description: service.description,
            price: service.price,
            duration: service.duration,
            has_image: !service.image.trim().is_empty(),
            image: service.image,
        })
        .collect();

    let staff = staff.into_iter().map(staff_card).collect();

    Ok(render(HomeTemplate {
        categories,
        active_category: active_category.to_string(),
        services,
        staff,
        contact,
        contact_errors,
        year: Utc::now().year(),
    }))
}

fn staff_card(member: StaffMember) -> StaffCardView {
    let booksy_url = member.booksy_url.unwrap_or_default();
    StaffCardView {
        name: member.name,
        role: member.role,
        specialties: member.specialties,
        has_booksy: !booksy_url.trim().is_empty(),
        booksy_url,
        email: member.email,
        phone: member.phone,
    }
}

fn normalize_category(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|value| CATEGORIES.iter().find(|known| **known == value))
        .copied()
        .unwrap_or(CATEGORY_HAIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use crate::models::{ServiceInput, CATEGORY_SPA};
    use crate::store::testing::memory_pool;

    async fn seeded_state() -> AppState {
        let pool = memory_pool().await;
        store::services::create(
            &pool,
            ServiceInput {
                title: "Haircut & Styling".to_string(),
                category: CATEGORY_HAIR.to_string(),
                ..ServiceInput::default()
            },
        )
        .await
        .unwrap();
        store::services::create(
            &pool,
            ServiceInput {
                title: "Massage Therapy".to_string(),
                category: CATEGORY_SPA.to_string(),
                ..ServiceInput::default()
            },
        )
        .await
        .unwrap();
        AppState { db: pool }
    }

    #[actix_web::test]
    async fn home_shows_only_the_active_category() {
        let state = seeded_state().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let response = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(response.status().is_success());
        let body = String::from_utf8_lossy(&test::read_body(response).await).to_string();
        assert!(body.contains("Haircut &amp; Styling"));
        assert!(!body.contains("Massage Therapy"));

        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/?category=spa").to_request(),
        )
        .await;
        let body = String::from_utf8_lossy(&test::read_body(response).await).to_string();
        assert!(body.contains("Massage Therapy"));
        assert!(!body.contains("Haircut &amp; Styling"));
    }

    #[actix_web::test]
    async fn unknown_category_falls_back_to_hair() {
        let state = seeded_state().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/?category=lasers").to_request(),
        )
        .await;
        assert!(response.status().is_success());
        let body = String::from_utf8_lossy(&test::read_body(response).await).to_string();
        assert!(body.contains("Haircut &amp; Styling"));
    }

    #[actix_web::test]
    async fn contact_requires_name_email_and_message() {
        let state = seeded_state().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/contact")
                .set_form(vec![("name", "Ada"), ("email", ""), ("message", "")])
                .to_request(),
        )
        .await;
        assert!(response.status().is_success());
        let body = String::from_utf8_lossy(&test::read_body(response).await).to_string();
        assert!(body.contains("An email address is required."));
        assert!(body.contains("Please tell us how we can help."));
        // The submitted name survives the round trip.
        assert!(body.contains("value=\"Ada\""));
    }

    #[actix_web::test]
    async fn contact_with_complete_form_renders_confirmation() {
        let state = seeded_state().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/contact")
                .set_form(vec![
                    ("name", "Ada Lovelace"),
                    ("email", "ada@example.com"),
                    ("message", "Do you take Saturday appointments?"),
                ])
                .to_request(),
        )
        .await;
        assert!(response.status().is_success());
        let body = String::from_utf8_lossy(&test::read_body(response).await).to_string();
        assert!(body.contains("Message sent"));
        assert!(body.contains("Ada Lovelace"));
    }
}
