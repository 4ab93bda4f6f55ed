/// Car resource handlers. Every route here sits behind `JwtAuthMiddleware`.
use actix_web::{web, HttpResponse};
use validator::Validate;

use super::auth::MessageResponse;
use crate::{
    error::AppError,
    models::{CarUpdate, NewCar},
    services::AuthenticatedUser,
    AppState,
};

fn car_not_found() -> AppError {
    AppError::NotFound("Car not found".to_string())
}

pub async fn list_cars(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let cars = state.cars.list().await?;
    Ok(HttpResponse::Ok().json(cars))
}

pub async fn get_car(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let car = state
        .cars
        .find(path.into_inner())
        .await?
        .ok_or_else(car_not_found)?;

    Ok(HttpResponse::Ok().json(car))
}

pub async fn create_car(
    state: web::Data<AppState>,
    payload: web::Json<NewCar>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let car = state.cars.create(&payload).await?;
    tracing::info!(car_id = car.id, "Car created");

    Ok(HttpResponse::Created().json(car))
}

/// Partial update restricted to the fields of `CarUpdate`
pub async fn update_car(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<CarUpdate>,
) -> Result<HttpResponse, AppError> {
    if payload.is_empty() {
        return Err(AppError::InvalidInput("No data provided".to_string()));
    }
    payload.validate()?;

    let car = state
        .cars
        .update(path.into_inner(), &payload)
        .await?
        .ok_or_else(car_not_found)?;

    Ok(HttpResponse::Ok().json(car))
}

pub async fn delete_car(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if !state.cars.delete(id).await? {
        return Err(car_not_found());
    }
    tracing::info!(car_id = id, "Car deleted");

    Ok(HttpResponse::Ok().json(MessageResponse::new("Car deleted")))
}

/// Identity echo for checking a token
pub async fn protected(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse::new(format!(
        "Hello, user {}!",
        user.user_id()
    )))
}
