use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
}

/// Body of `POST /cars`. The id is always generated by the store.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewCar {
    #[validate(length(min = 1, max = 50))]
    pub make: String,
    #[validate(length(min = 1, max = 50))]
    pub model: String,
    #[validate(range(min = 1886, max = 9999))]
    pub year: i32,
    #[validate(range(min = 0.0))]
    pub price: f64,
}

/// Body of `PUT /cars/{id}`.
///
/// The fields listed here are the only mutable columns; anything else in the
/// request body is rejected at deserialization.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CarUpdate {
    #[validate(length(min = 1, max = 50))]
    pub make: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub model: Option<String>,
    #[validate(range(min = 1886, max = 9999))]
    pub year: Option<i32>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
}

impl CarUpdate {
    pub fn is_empty(&self) -> bool {
        self.make.is_none() && self.model.is_none() && self.year.is_none() && self.price.is_none()
    }

    pub fn apply_to(&self, car: &mut Car) {
        if let Some(make) = &self.make {
            car.make = make.clone();
        }
        if let Some(model) = &self.model {
            car.model = model.clone();
        }
        if let Some(year) = self.year {
            car.year = year;
        }
        if let Some(price) = self.price {
            car.price = price;
        }
    }
}
