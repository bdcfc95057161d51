use actix_web::{http::header, middleware::from_fn, web, HttpResponse, Result};
use actix_web_httpauth::middleware::HttpAuthentication;
use askama::Template;
use serde::Deserialize;

use crate::{
    auth::{admin_validator, logout_guard, AuthUser},
    models::{
        split_specialties, Service, ServiceInput, StaffInput, StaffMember, CATEGORIES,
    },
    state::AppState,
    store,
    templates::{not_found, render},
};

#[derive(Clone, Debug)]
struct StatCard {
    label: String,
    value: i64,
}

#[derive(Clone, Debug)]
struct StaffView {
    id: String,
    name: String,
    role: String,
    specialties_text: String,
    email: String,
    phone: String,
    booksy_url: String,
    has_booksy: bool,
}

#[derive(Clone, Debug)]
struct ServiceView {
    id: String,
    title: String,
    category: String,
    price: String,
    duration: String,
}

#[derive(Clone, Debug, Default)]
struct StaffFormView {
    name: String,
    role: String,
    specialties: String,
    image: String,
    booksy_url: String,
    email: String,
    phone: String,
}

#[derive(Clone, Debug, Default)]
struct ServiceFormView {
    title: String,
    description: String,
    price: String,
    duration: String,
    image: String,
}

#[derive(Clone, Debug)]
struct CategoryOption {
    value: &'static str,
    selected: bool,
}

#[derive(Template)]
#[template(path = "admin_dashboard.html")]
struct AdminDashboardTemplate {
    admin_email: String,
    stats: Vec<StatCard>,
    staff: Vec<StaffView>,
    services: Vec<ServiceView>,
}

#[derive(Template)]
#[template(path = "admin_staff.html")]
struct AdminStaffTemplate {
    staff: Vec<StaffView>,
    form: StaffFormView,
    errors: Vec<String>,
    success: String,
    has_success: bool,
}

#[derive(Template)]
#[template(path = "admin_staff_edit.html")]
struct AdminStaffEditTemplate {
    staff_id: String,
    staff_name: String,
    form: StaffFormView,
    errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "admin_staff_delete.html")]
struct AdminStaffDeleteTemplate {
    member: StaffView,
}

#[derive(Template)]
#[template(path = "admin_services.html")]
struct AdminServicesTemplate {
    services: Vec<ServiceView>,
    form: ServiceFormView,
    categories: Vec<CategoryOption>,
    errors: Vec<String>,
    success: String,
    has_success: bool,
}

#[derive(Template)]
#[template(path = "admin_service_edit.html")]
struct AdminServiceEditTemplate {
    service_id: String,
    service_title: String,
    form: ServiceFormView,
    categories: Vec<CategoryOption>,
    errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "admin_service_delete.html")]
struct AdminServiceDeleteTemplate {
    service: ServiceView,
}

#[derive(Deserialize)]
struct StaffForm {
    name: String,
    role: String,
    specialties: String,
    image: String,
    booksy_url: String,
    email: String,
    phone: String,
}

#[derive(Deserialize)]
struct ServiceForm {
    title: String,
    description: String,
    price: String,
    duration: String,
    category: String,
    image: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(HttpAuthentication::basic(admin_validator))
            .wrap(from_fn(logout_guard))
            .service(web::resource("").route(web::get().to(index)))
            .service(web::resource("/").route(web::get().to(index)))
            .service(web::resource("/dashboard").route(web::get().to(dashboard)))
            .service(
                web::resource("/staff")
                    .route(web::get().to(staff_page))
                    .route(web::post().to(create_staff)),
            )
            .service(
                web::resource("/staff/{id}")
                    .route(web::get().to(edit_staff))
                    .route(web::post().to(update_staff)),
            )
            .service(
                web::resource("/staff/{id}/delete")
                    .route(web::get().to(confirm_delete_staff))
                    .route(web::post().to(delete_staff)),
            )
            .service(
                web::resource("/services")
                    .route(web::get().to(services_page))
                    .route(web::post().to(create_service)),
            )
            .service(
                web::resource("/services/{id}")
                    .route(web::get().to(edit_service))
                    .route(web::post().to(update_service)),
            )
            .service(
                web::resource("/services/{id}/delete")
                    .route(web::get().to(confirm_delete_service))
                    .route(web::post().to(delete_service)),
            ),
    );
}

async fn index() -> HttpResponse {
    HttpResponse::Found()
        .append_header((header::LOCATION, "/admin/dashboard"))
        .finish()
}

async fn dashboard(state: web::Data<AppState>, auth: web::ReqData<AuthUser>) -> Result<HttpResponse> {
    let staff = store::staff::list(&state.db).await.unwrap_or_else(|err| {
        log::error!("Failed to load staff for dashboard: {err}");
        Vec::new()
    });
    let services = store::services::list(&state.db).await.unwrap_or_else(|err| {
        log::error!("Failed to load services for dashboard: {err}");
        Vec::new()
    });

    let specialties: usize = staff.iter().map(|member| member.specialties.len()).sum();
    let booksy_linked = staff
        .iter()
        .filter(|member| {
            member
                .booksy_url
                .as_deref()
                .is_some_and(|url| !url.trim().is_empty())
        })
        .count();

    let stats = vec![
        StatCard {
            label: "Team members".to_string(),
            value: staff.len() as i64,
        },
        StatCard {
            label: "Services".to_string(),
            value: services.len() as i64,
        },
        StatCard {
            label: "Specialties listed".to_string(),
            value: specialties as i64,
        },
        StatCard {
            label: "Booking profiles linked".to_string(),
            value: booksy_linked as i64,
        },
    ];

    Ok(render(AdminDashboardTemplate {
        admin_email: auth.email.clone(),
        stats,
        staff: staff.into_iter().map(to_staff_view).collect(),
        services: services.into_iter().map(to_service_view).collect(),
    }))
}

async fn staff_page(state: web::Data<AppState>) -> Result<HttpResponse> {
    staff_page_response(&state, StaffFormView::default(), Vec::new(), String::new()).await
}

async fn create_staff(
    state: web::Data<AppState>,
    form: web::Form<StaffForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let errors = validate_staff(&form);
    if !errors.is_empty() {
        return staff_page_response(&state, staff_form_view(&form), errors, String::new()).await;
    }

    let input = staff_input(form);
    let name = input.name.clone();
    match store::staff::create(&state.db, input).await {
        Ok(_) => {
            staff_page_response(
                &state,
                StaffFormView::default(),
                Vec::new(),
                format!("{name} has been added to your team."),
            )
            .await
        }
        Err(err) => {
            log::error!("Failed to create staff member: {err}");
            staff_page_response(
                &state,
                StaffFormView::default(),
                vec!["There was a problem saving the staff member.".to_string()],
                String::new(),
            )
            .await
        }
    }
}

async fn edit_staff(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let staff_id = path.into_inner();
    let member = store::staff::get(&state.db, &staff_id)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    let Some(member) = member else {
        return Ok(not_found("Staff member not found"));
    };

    Ok(render(AdminStaffEditTemplate {
        staff_id: member.id.clone(),
        staff_name: member.name.clone(),
        form: staff_form_from(&member),
        errors: Vec::new(),
    }))
}

async fn update_staff(
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<StaffForm>,
) -> Result<HttpResponse> {
    let staff_id = path.into_inner();
    let form = form.into_inner();
    let errors = validate_staff(&form);
    if !errors.is_empty() {
        let staff_name = form.name.clone();
        return Ok(render(AdminStaffEditTemplate {
            staff_id,
            staff_name,
            form: staff_form_view(&form),
            errors,
        }));
    }

    let updated = store::staff::update(&state.db, &staff_id, staff_input(form))
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if updated.is_none() {
        return Ok(not_found("Staff member not found"));
    }

    Ok(HttpResponse::SeeOther()
        .append_header((header::LOCATION, "/admin/staff"))
        .finish())
}

async fn confirm_delete_staff(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let staff_id = path.into_inner();
    let member = store::staff::get(&state.db, &staff_id)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    match member {
        Some(member) => Ok(render(AdminStaffDeleteTemplate {
            member: to_staff_view(member),
        })),
        None => Ok(not_found("Staff member not found")),
    }
}

async fn delete_staff(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let staff_id = path.into_inner();
    let deleted = store::staff::delete(&state.db, &staff_id)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if !deleted {
        return Ok(not_found("Staff member not found"));
    }

    Ok(HttpResponse::SeeOther()
        .append_header((header::LOCATION, "/admin/staff"))
        .finish())
}

async fn services_page(state: web::Data<AppState>) -> Result<HttpResponse> {
    services_page_response(
        &state,
        ServiceFormView::default(),
        category_options(None),
        Vec::new(),
        String::new(),
    )
    .await
}

async fn create_service(
    state: web::Data<AppState>,
    form: web::Form<ServiceForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let errors = validate_service(&form);
    if !errors.is_empty() {
        let categories = category_options(Some(&form.category));
        return services_page_response(&state, service_form_view(&form), categories, errors, String::new())
            .await;
    }

    let input = service_input(form);
    let title = input.title.clone();
    match store::services::create(&state.db, input).await {
        Ok(_) => {
            services_page_response(
                &state,
                ServiceFormView::default(),
                category_options(None),
                Vec::new(),
                format!("{title} has been added to the menu."),
            )
            .await
        }
        Err(err) => {
            log::error!("Failed to create service: {err}");
            services_page_response(
                &state,
                ServiceFormView::default(),
                category_options(None),
                vec!["There was a problem saving the service.".to_string()],
                String::new(),
            )
            .await
        }
    }
}

async fn edit_service(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let service_id = path.into_inner();
    let service = store::services::get(&state.db, &service_id)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    let Some(service) = service else {
        return Ok(not_found("Service not found"));
    };

    Ok(render(AdminServiceEditTemplate {
        service_id: service.id.clone(),
        service_title: service.title.clone(),
        categories: category_options(Some(&service.category)),
        form: service_form_from(&service),
        errors: Vec::new(),
    }))
}

async fn update_service(
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<ServiceForm>,
) -> Result<HttpResponse> {
    let service_id = path.into_inner();
    let form = form.into_inner();
    let errors = validate_service(&form);
    if !errors.is_empty() {
        let service_title = form.title.clone();
        let categories = category_options(Some(&form.category));
        return Ok(render(AdminServiceEditTemplate {
            service_id,
            service_title,
            categories,
            form: service_form_view(&form),
            errors,
        }));
    }

    let updated = store::services::update(&state.db, &service_id, service_input(form))
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if updated.is_none() {
        return Ok(not_found("Service not found"));
    }

    Ok(HttpResponse::SeeOther()
        .append_header((header::LOCATION, "/admin/services"))
        .finish())
}

async fn confirm_delete_service(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let service_id = path.into_inner();
    let service = store::services::get(&state.db, &service_id)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    match service {
        Some(service) => Ok(render(AdminServiceDeleteTemplate {
            service: to_service_view(service),
        })),
        None => Ok(not_found("Service not found")),
    }
}

async fn delete_service(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let service_id = path.into_inner();
    let deleted = store::services::delete(&state.db, &service_id)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if !deleted {
        return Ok(not_found("Service not found"));
    }

    Ok(HttpResponse::SeeOther()
        .append_header((header::LOCATION, "/admin/services"))
        .finish())
}

async fn staff_page_response(
    state: &web::Data<AppState>,
    form: StaffFormView,
    errors: Vec<String>,
    success: String,
) -> Result<HttpResponse> {
    let staff = store::staff::list(&state.db).await.unwrap_or_else(|err| {
        log::error!("Failed to load staff: {err}");
        Vec::new()
    });

    let has_success = !success.is_empty();
    Ok(render(AdminStaffTemplate {
        staff: staff.into_iter().map(to_staff_view).collect(),
        form,
        errors,
        success,
        has_success,
    }))
}

async fn services_page_response(
    state: &web::Data<AppState>,
    form: ServiceFormView,
    categories: Vec<CategoryOption>,
    errors: Vec<String>,
    success: String,
) -> Result<HttpResponse> {
    let services = store::services::list(&state.db).await.unwrap_or_else(|err| {
        log::error!("Failed to load services: {err}");
        Vec::new()
    });

    let has_success = !success.is_empty();
    Ok(render(AdminServicesTemplate {
        services: services.into_iter().map(to_service_view).collect(),
        form,
        categories,
        errors,
        success,
        has_success,
    }))
}

fn validate_staff(form: &StaffForm) -> Vec<String> {
    let mut errors = Vec::new();
    if form.name.trim().is_empty() {
        errors.push("Name is required.".to_string());
    }
    if form.role.trim().is_empty() {
        errors.push("Role is required.".to_string());
    }
    errors
}

fn validate_service(form: &ServiceForm) -> Vec<String> {
    let mut errors = Vec::new();
    if form.title.trim().is_empty() {
        errors.push("Title is required.".to_string());
    }
    if !CATEGORIES.contains(&form.category.trim()) {
        errors.push("Choose a valid category.".to_string());
    }
    errors
}

fn staff_input(form: StaffForm) -> StaffInput {
    let booksy_url = form.booksy_url.trim().to_string();
    StaffInput {
        name: form.name.trim().to_string(),
        role: form.role.trim().to_string(),
        specialties: split_specialties(&form.specialties),
        image: form.image.trim().to_string(),
        booksy_url: if booksy_url.is_empty() { None } else { Some(booksy_url) },
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
    }
}

fn service_input(form: ServiceForm) -> ServiceInput {
    ServiceInput {
        title: form.title.trim().to_string(),
        description: form.description.trim().to_string(),
        price: form.price.trim().to_string(),
        duration: form.duration.trim().to_string(),
        category: form.category.trim().to_string(),
        image: form.image.trim().to_string(),
    }
}

fn staff_form_view(form: &StaffForm) -> StaffFormView {
    StaffFormView {
        name: form.name.clone(),
        role: form.role.clone(),
        specialties: form.specialties.clone(),
        image: form.image.clone(),
        booksy_url: form.booksy_url.clone(),
        email: form.email.clone(),
        phone: form.phone.clone(),
    }
}

fn staff_form_from(member: &StaffMember) -> StaffFormView {
    StaffFormView {
        name: member.name.clone(),
        role: member.role.clone(),
        specialties: member.specialties.join(", "),
        image: member.image.clone(),
        booksy_url: member.booksy_url.clone().unwrap_or_default(),
        email: member.email.clone(),
        phone: member.phone.clone(),
    }
}

fn service_form_view(form: &ServiceForm) -> ServiceFormView {
    ServiceFormView {
        title: form.title.clone(),
        description: form.description.clone(),
        price: form.price.clone(),
        duration: form.duration.clone(),
        image: form.image.clone(),
    }
}

fn service_form_from(service: &Service) -> ServiceFormView {
    ServiceFormView {
        title: service.title.clone(),
        description: service.description.clone(),
        price: service.price.clone(),
        duration: service.duration.clone(),
        image: service.image.clone(),
    }
}

fn to_staff_view(member: StaffMember) -> StaffView {
    let booksy_url = member.booksy_url.unwrap_or_default();
    StaffView {
        id: member.id,
        name: member.name,
        role: member.role,
        specialties_text: member.specialties.join(", "),
        email: member.email,
        phone: member.phone,
        has_booksy: !booksy_url.trim().is_empty(),
        booksy_url,
    }
}

fn to_service_view(service: Service) -> ServiceView {
    ServiceView {
        id: service.id,
        title: service.title,
        category: service.category,
        price: service.price,
        duration: service.duration,
    }
}

fn category_options(selected: Option<&str>) -> Vec<CategoryOption> {
    CATEGORIES
        .iter()
        .copied()
        .map(|value| CategoryOption {
            value,
            selected: selected == Some(value),
        })
        .collect()
}
