use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, State},
};
use serde::Serialize;
use tracing::info;

use crate::{
    database::{self, NewOrder, Order, PaymentMethod, Product},
    error::AppError,
    notify,
    state::AppState,
    uploads::{self, Category},
};

#[derive(Serialize)]
pub struct Message {
    pub message: String,
}

fn message(text: &str) -> Json<Message> {
    Json(Message {
        message: text.to_string(),
    })
}

pub async fn add_product(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Message>, AppError> {
    let mut name = None;
    let mut price = None;
    let mut description = None;
    let mut image: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => name = Some(field.text().await?),
            "price" => price = Some(field.text().await?),
            "description" => description = Some(field.text().await?),
            "image" => {
                if let Some(file_name) = field.file_name().map(str::to_string) {
                    image = Some((file_name, field.bytes().await?));
                }
            }
            _ => {}
        }
    }

    let name = name.ok_or(AppError::MissingField("name"))?;
    let price = price.ok_or(AppError::MissingField("price"))?;
    let description = description.ok_or(AppError::MissingField("description"))?;
    let (file_name, bytes) = image.ok_or(AppError::MissingField("image"))?;

    let relative = uploads::store(
        &state.config.upload_dir,
        Category::Products,
        &file_name,
        &bytes,
    )?;

    let conn = state.connect()?;
    let id = database::insert_product(&conn, &name, &price, &description, &relative)?;

    info!("Added product {id}: {name}");

    Ok(message("Product uploaded successfully"))
}

pub async fn get_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Product>>, AppError> {
    let conn = state.connect()?;

    Ok(Json(database::list_products(&conn)?))
}

/// Row removal only. A missing id and a leftover image file are both fine;
/// neither is reported as an error.
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    let conn = state.connect()?;
    database::delete_product(&conn, id)?;

    Ok(message("Product deleted"))
}

pub async fn make_order(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Message>, AppError> {
    let mut product = None;
    let mut price = None;
    let mut name = None;
    let mut phone = None;
    let mut payment_method = None;
    let mut payment_image: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "product" => product = Some(field.text().await?),
            "price" => price = Some(field.text().await?),
            "name" => name = Some(field.text().await?),
            "phone" => phone = Some(field.text().await?),
            "payment_method" => payment_method = Some(field.text().await?),
            "payment_image" => {
                // Browsers send an empty part for an untouched file input.
                if let Some(file_name) = field.file_name().map(str::to_string) {
                    if !file_name.is_empty() {
                        payment_image = Some((file_name, field.bytes().await?));
                    }
                }
            }
            _ => {}
        }
    }

    let product = product.ok_or(AppError::MissingField("product"))?;
    let price = price.ok_or(AppError::MissingField("price"))?;
    let name = name.ok_or(AppError::MissingField("name"))?;
    let phone = phone.ok_or(AppError::MissingField("phone"))?;
    let method_tag = payment_method.ok_or(AppError::MissingField("payment_method"))?;
    let method = PaymentMethod::parse(&method_tag)
        .ok_or_else(|| AppError::UnknownPaymentMethod(method_tag))?;

    // Cash on delivery needs no proof; any uploaded image is ignored. For the
    // other methods a missing image is a caller mistake that is stored as
    // NULL, not rejected.
    let stored_image = match (method, payment_image) {
        (PaymentMethod::CashOnDelivery, _) | (_, None) => None,
        (_, Some((file_name, bytes))) => Some(uploads::store(
            &state.config.upload_dir,
            Category::Payments,
            &file_name,
            &bytes,
        )?),
    };

    let conn = state.connect()?;
    let id = database::insert_order(
        &conn,
        &NewOrder {
            product: &product,
            price: &price,
            name: &name,
            phone: &phone,
            payment_method: method,
            payment_image: stored_image,
        },
    )?;

    info!("Received order {id} for {product}");

    Ok(message("Order submitted successfully"))
}

pub async fn get_orders(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Order>>, AppError> {
    let conn = state.connect()?;

    Ok(Json(database::list_orders(&conn)?))
}

/// One-way PendingReview -> Confirmed transition. Confirming again is a
/// harmless repeat, and a missing id updates nothing but still reports
/// success.
pub async fn confirm_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    let conn = state.connect()?;

    if let Some(order) = database::confirm_order(&conn, id)? {
        let text = notify::confirmation_message(&order.name, &order.product);
        state.notifier.dispatch(&order.phone, &text);
    }

    Ok(message(
        "Order confirmed and the WhatsApp message was sent to the customer",
    ))
}

pub async fn delete_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    let conn = state.connect()?;
    database::delete_order(&conn, id)?;

    Ok(message("Order deleted"))
}
