//! HTTP routes for the order service

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{auth_middleware, AuthUser},
    models::NewProduct,
    payment::PaymentAttempt,
    services::CheckoutOutcome,
    state::AppState,
};

/// Request for user registration
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request for adding a product to the cart
#[derive(Deserialize)]
pub struct AddCartRequest {
    pub product_id: String,
    pub quantity: u32,
}

/// Request for toggling product availability
#[derive(Deserialize)]
pub struct AvailabilityRequest {
    pub product_id: String,
    pub available: bool,
}

/// Request for reassigning an order's courier
#[derive(Deserialize)]
pub struct ReassignRequest {
    pub order_id: Uuid,
    pub courier: String,
}

/// Create the router for the order service
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/cart", get(get_cart))
        .route("/cart/add", post(add_to_cart))
        .route("/cart/clear", post(clear_cart))
        .route("/checkout/pay", post(pay))
        .route("/invoice/:order_id", get(get_invoice))
        .route("/invoice/resend/:order_id", post(resend_invoice))
        .route("/dispatch/reassign", post(reassign_courier))
        .route("/dispatch/advance/:order_id", post(advance_delivery))
        .route("/tracking/:order_id", get(get_tracking))
        .route("/admin/products", post(create_product))
        .route("/admin/availability", post(set_availability))
        .route("/admin/orders", get(list_orders))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/menu", get(menu))
        .merge(protected)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "fornace"
    }))
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .accounts
        .register(&payload.email, &payload.password)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "ok": true, "user_id": user.id })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let grant = state
        .accounts
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(json!({
        "token": grant.token,
        "is_admin": grant.role.is_admin(),
    })))
}

pub async fn menu(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.catalog.list().await?))
}

pub async fn get_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.carts.get(&user).await?))
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AddCartRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .carts
        .add(&user, &payload.product_id, payload.quantity)
        .await?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn clear_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    state.carts.clear(&user).await?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn pay(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<PaymentAttempt>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.checkout.checkout(&user, &payload).await?;
    let body = match outcome {
        CheckoutOutcome::Approved {
            order_id,
            invoice_id,
            total,
        } => json!({
            "approved": true,
            "order_id": order_id,
            "invoice_id": invoice_id,
            "total": total,
        }),
        CheckoutOutcome::Declined { message } => json!({
            "approved": false,
            "message": message,
        }),
    };
    Ok(Json(body))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.checkout.invoice(&user, order_id).await?))
}

pub async fn resend_invoice(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.checkout.resend_invoice(&user, order_id).await?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn reassign_courier(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ReassignRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let dispatch = state
        .dispatch
        .reassign_courier(&user, payload.order_id, &payload.courier)
        .await?;
    Ok(Json(json!({ "ok": true, "dispatch": dispatch })))
}

pub async fn advance_delivery(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let track = state.dispatch.advance(&user, order_id).await?;
    Ok(Json(json!({ "status": track.status })))
}

pub async fn get_tracking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.dispatch.tracking(&user, order_id).await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewProduct>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state.catalog.create(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn set_availability(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AvailabilityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .catalog
        .set_availability(&user, &payload.product_id, payload.available)
        .await?;
    Ok(Json(json!({ "ok": true, "product": product })))
}

pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.dispatch.list_orders(&user).await?))
}
