// Route table for the Garage API

use axum::{
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::auth::login_handler;
use crate::brands::{
    create_brand_handler, delete_brand_handler, find_brands_by_name_handler, get_brand_handler,
    list_brands_handler, update_brand_handler, upload_logo_handler,
};
use crate::cars::{
    create_car_handler, delete_car_handler, get_car_handler, list_cars_handler,
    update_car_handler,
};
use crate::users::{
    delete_user_handler, get_user_handler, list_users_handler, signup_handler,
    update_user_handler,
};
use crate::AppState;

pub const NOT_FOUND_PAGE: &str = "Sorry :( We could not find the requested page.";

/// Creates the application router
///
/// Only PUT and DELETE on /user/:id go through the auth gate, via the
/// `AuthenticatedUser` extractor in their handlers. A known path with an
/// unrouted method gets the same 404 page as an unknown path.
pub fn create_router(state: AppState) -> Router {
    // Allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public_files = ServeDir::new(state.logos.dir().to_path_buf());

    Router::new()
        .route("/", get(root_handler).fallback(fallback_handler))
        // Users
        .route(
            "/user",
            get(list_users_handler)
                .post(signup_handler)
                .fallback(fallback_handler),
        )
        .route("/user/login", post(login_handler).fallback(fallback_handler))
        .route(
            "/user/:id",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler)
                .fallback(fallback_handler),
        )
        // Cars
        .route(
            "/car",
            get(list_cars_handler)
                .post(create_car_handler)
                .fallback(fallback_handler),
        )
        .route(
            "/car/:id",
            get(get_car_handler)
                .put(update_car_handler)
                .delete(delete_car_handler)
                .fallback(fallback_handler),
        )
        // Brands
        .route(
            "/brand",
            get(list_brands_handler)
                .post(create_brand_handler)
                .fallback(fallback_handler),
        )
        .route(
            "/brand/logo-upload",
            post(upload_logo_handler).fallback(fallback_handler),
        )
        .route(
            "/brand/name/:name",
            get(find_brands_by_name_handler).fallback(fallback_handler),
        )
        .route(
            "/brand/:id",
            get(get_brand_handler)
                .put(update_brand_handler)
                .delete(delete_brand_handler)
                .fallback(fallback_handler),
        )
        .nest_service("/public", public_files)
        .fallback(fallback_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

async fn root_handler() -> Html<&'static str> {
    Html("<h3>This is the ROOT of our API.</h3>")
}

async fn fallback_handler() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, NOT_FOUND_PAGE)
}
