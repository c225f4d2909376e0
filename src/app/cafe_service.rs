//! Resource operations over cafes.
//!
//! Each operation composes the field coercions from [`crate::domain::cafe::coercion`], exactly
//! one persistence call per write, and a typed result. The HTTP layer only shapes responses.

use crate::domain::cafe::error::list_params;
use crate::domain::cafe::{
    coerce_boolean, coerce_price, coerce_required_text, coerce_url, Cafe, CafeError, CafeField,
    FieldKind, NewCafe, Price, RawParams,
};
use crate::infra::config::ApiKey;
use crate::storage::{CafeStore, StoreError};
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

pub const CAFE_NOT_FOUND: &str = "a cafe with that id was not found in the database.";

const INTEGRITY_REJECTED: &str =
    "the cafe could not be added, a required parameter is missing or empty.";

impl From<StoreError> for CafeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ValueTooLong(detail) => {
                tracing::warn!(%detail, "write rejected: value too long for its column");
                CafeError::InvalidValue("a parameter value is too long to be stored.".to_string())
            }
            StoreError::Integrity(detail) => {
                tracing::warn!(%detail, "write rejected by an integrity constraint");
                CafeError::MissingParameter(INTEGRITY_REJECTED.to_string())
            }
            other => CafeError::Internal(anyhow::Error::new(other)),
        }
    }
}

/// Typed submission of the interactive add form. Every field is optional at the transport level;
/// presence is decided by validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CafeForm {
    pub name: Option<String>,
    pub map_url: Option<String>,
    pub img_url: Option<String>,
    pub location: Option<String>,
    pub seats: Option<String>,
    pub has_toilet: Option<String>,
    pub has_wifi: Option<String>,
    pub has_sockets: Option<String>,
    pub can_take_calls: Option<String>,
    pub coffee_price: Option<String>,
}

impl CafeForm {
    pub fn value(&self, field: CafeField) -> Option<&str> {
        let value = match field {
            CafeField::Name => &self.name,
            CafeField::MapUrl => &self.map_url,
            CafeField::ImgUrl => &self.img_url,
            CafeField::Location => &self.location,
            CafeField::Seats => &self.seats,
            CafeField::HasToilet => &self.has_toilet,
            CafeField::HasWifi => &self.has_wifi,
            CafeField::HasSockets => &self.has_sockets,
            CafeField::CanTakeCalls => &self.can_take_calls,
            CafeField::CoffeePrice => &self.coffee_price,
        };
        value.as_deref()
    }
}

/// Per-field messages shown next to the inputs of a rejected form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: BTreeMap<CafeField, String>,
}

impl FormErrors {
    pub fn get(&self, field: CafeField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = CafeField> + '_ {
        self.errors.keys().copied()
    }

    fn insert(&mut self, field: CafeField, message: &str) {
        self.errors.insert(field, message.to_string());
    }
}

#[derive(Debug, Error)]
pub enum LenientCreateError {
    #[error("the submitted form has invalid fields")]
    Form(FormErrors),

    #[error(transparent)]
    Service(#[from] CafeError),
}

pub struct CafeService {
    store: Arc<dyn CafeStore>,
    api_key: ApiKey,
}

impl CafeService {
    pub fn new(store: Arc<dyn CafeStore>, api_key: ApiKey) -> Self {
        Self { store, api_key }
    }

    pub fn store(&self) -> &Arc<dyn CafeStore> {
        &self.store
    }

    pub async fn list_all(&self) -> Result<Vec<Cafe>, CafeError> {
        Ok(self.store.list_all().await?)
    }

    pub async fn random(&self) -> Result<Cafe, CafeError> {
        let cafes = self.store.list_all().await?;
        cafes
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| CafeError::NotFound("there are no cafes in the database.".to_string()))
    }

    pub async fn search_by_location(&self, location: Option<&str>) -> Result<Vec<Cafe>, CafeError> {
        let location = location
            .ok_or_else(|| CafeError::MissingParameter("'loc' parameter is missing".to_string()))?;
        let cafes = self
            .store
            .query_by_field(CafeField::Location, location)
            .await?;
        if cafes.is_empty() {
            return Err(CafeError::NotFound(
                "no cafe in such location was found in the database.".to_string(),
            ));
        }
        Ok(cafes)
    }

    /// API create path. Checks run in a fixed order and the first failing class is reported:
    /// booleans, URLs, price, record shape, required fields, then the insert itself.
    pub async fn create_strict(&self, params: &RawParams) -> Result<Cafe, CafeError> {
        let raw = move |field: CafeField| params.get(field.as_str()).map(String::as_str);

        let not_boolean: Vec<&str> = CafeField::BOOLEANS
            .into_iter()
            .filter(|field| coerce_boolean(raw(*field)).is_err())
            .map(CafeField::as_str)
            .collect();
        if !not_boolean.is_empty() {
            return Err(CafeError::InvalidValue(format!(
                "the parameter(s) {} must be boolean.",
                list_params(not_boolean)
            )));
        }

        let not_url: Vec<&str> = CafeField::URLS
            .into_iter()
            .filter(|field| coerce_url(raw(*field)).is_err())
            .map(CafeField::as_str)
            .collect();
        if !not_url.is_empty() {
            return Err(CafeError::InvalidValue(format!(
                "the parameter(s) {} must be a website URL.",
                list_params(not_url)
            )));
        }

        let price = coerce_price(raw(CafeField::CoffeePrice))
            .map_err(|_| invalid_number("coffee_price", raw(CafeField::CoffeePrice)))?;

        let missing: Vec<CafeField> = CafeField::ALL
            .into_iter()
            .filter(|field| raw(*field).is_none())
            .collect();
        let unexpected: Vec<&str> = params
            .keys()
            .filter(|key| key.parse::<CafeField>().is_err())
            .map(String::as_str)
            .collect();
        if !unexpected.is_empty() {
            return Err(incorrect_parameters(&missing, &unexpected));
        }
        if !missing.is_empty() {
            return Err(missing_parameters(&missing));
        }

        let new_cafe = strict_record(params, price);
        match self.store.insert(new_cafe).await {
            Ok(cafe) => {
                tracing::info!(id = cafe.id, name = %cafe.name, "cafe added");
                Ok(cafe)
            }
            Err(StoreError::UniqueViolation(column)) => {
                let value = params.get(&column).map(String::as_str).unwrap_or_default();
                Err(CafeError::InvalidValue(format!(
                    "a cafe with the '{}' '{}' already exists.",
                    column, value
                )))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Interactive create path: every field is required and a rejection carries per-field
    /// messages instead of an error envelope.
    pub async fn create_lenient(&self, form: &CafeForm) -> Result<Cafe, LenientCreateError> {
        let mut errors = FormErrors::default();
        let mut values: BTreeMap<CafeField, String> = BTreeMap::new();
        let mut flags: BTreeMap<CafeField, bool> = BTreeMap::new();
        let mut price: Option<Price> = None;

        for field in CafeField::ALL {
            // A blank input counts as not supplied.
            let supplied = form.value(field).filter(|v| !v.trim().is_empty());
            let raw = match coerce_required_text(supplied) {
                Ok(raw) => raw,
                Err(_) => {
                    errors.insert(field, "This field is required.");
                    continue;
                }
            };
            match field.kind() {
                FieldKind::Text => {
                    values.insert(field, raw.to_string());
                }
                FieldKind::Url => match coerce_url(Some(raw)) {
                    Ok(_) => {
                        values.insert(field, raw.to_string());
                    }
                    Err(_) => errors.insert(field, "Invalid URL."),
                },
                FieldKind::Boolean => match coerce_boolean(Some(raw)) {
                    Ok(Some(flag)) => {
                        flags.insert(field, flag);
                    }
                    Ok(None) | Err(_) => {
                        errors.insert(field, "Choose True or False.")
                    }
                },
                FieldKind::Price => match coerce_price(Some(raw)) {
                    Ok(p) => price = Some(p),
                    Err(_) => errors.insert(field, "Enter a number that is at least 0."),
                },
            }
        }

        let price = match price {
            Some(price) if errors.is_empty() => price,
            _ => return Err(LenientCreateError::Form(errors)),
        };

        let mut text = |field: CafeField| values.remove(&field).unwrap_or_default();
        let flag = |field: CafeField| flags.get(&field).copied().unwrap_or(false);
        let new_cafe = NewCafe {
            name: text(CafeField::Name),
            map_url: text(CafeField::MapUrl),
            img_url: text(CafeField::ImgUrl),
            location: text(CafeField::Location),
            seats: text(CafeField::Seats),
            has_toilet: flag(CafeField::HasToilet),
            has_wifi: flag(CafeField::HasWifi),
            has_sockets: flag(CafeField::HasSockets),
            can_take_calls: flag(CafeField::CanTakeCalls),
            coffee_price: price.formatted(),
        };

        match self.store.insert(new_cafe).await {
            Ok(cafe) => {
                tracing::info!(id = cafe.id, name = %cafe.name, "cafe added from form");
                Ok(cafe)
            }
            Err(StoreError::UniqueViolation(_)) => {
                errors.insert(CafeField::Name, "A cafe with this name already exists.");
                Err(LenientCreateError::Form(errors))
            }
            Err(err) => Err(CafeError::from(err).into()),
        }
    }

    /// Replaces the price of one cafe. The stored value uses the same currency formatting as
    /// creation.
    pub async fn update_price(&self, id: i32, new_price: Option<&str>) -> Result<Cafe, CafeError> {
        let price = parse_new_price(new_price)?;

        let mut cafe = self
            .store
            .get_by_id(id)
            .await?
            .ok_or_else(|| CafeError::NotFound(CAFE_NOT_FOUND.to_string()))?;
        cafe.coffee_price = price.formatted();

        // The row may have been deleted between the lookup and the write.
        if !self.store.update(&cafe).await? {
            return Err(CafeError::NotFound(CAFE_NOT_FOUND.to_string()));
        }
        tracing::info!(id, price = %cafe.coffee_price, "cafe price updated");
        Ok(cafe)
    }

    /// Checks the shared secret that gates deletes. A missing key is a mismatch.
    pub fn authorize(&self, api_key: Option<&str>) -> Result<(), CafeError> {
        if api_key.is_some_and(|key| self.api_key.matches(key)) {
            Ok(())
        } else {
            Err(CafeError::Unauthorized(
                "make sure you have the correct api-key.".to_string(),
            ))
        }
    }

    /// Deletes one cafe. The key is checked before the id is looked at, so an unauthorized
    /// caller cannot probe which ids exist.
    pub async fn delete(&self, id: i32, api_key: Option<&str>) -> Result<(), CafeError> {
        self.authorize(api_key)
            .inspect_err(|_| tracing::warn!(id, "delete rejected: bad api key"))?;
        if !self.store.delete(id).await? {
            return Err(CafeError::NotFound(CAFE_NOT_FOUND.to_string()));
        }
        tracing::info!(id, "cafe deleted");
        Ok(())
    }
}

/// Validates the `new_price` parameter of a price update.
pub fn parse_new_price(raw: Option<&str>) -> Result<Price, CafeError> {
    let raw = raw.ok_or_else(|| {
        CafeError::InvalidValue("The parameter 'new_price' is missing.".to_string())
    })?;
    coerce_price(Some(raw)).map_err(|_| invalid_number("new_price", Some(raw)))
}

fn invalid_number(param: &str, raw: Option<&str>) -> CafeError {
    let received = match raw {
        Some(raw) => format!("'{}'", raw),
        None => "nothing".to_string(),
    };
    CafeError::InvalidValue(format!(
        "The parameter '{}' must be a positive number, but received {} instead.",
        param, received
    ))
}

fn missing_parameters(missing: &[CafeField]) -> CafeError {
    CafeError::MissingParameter(format!(
        "the parameter(s) {} is(are) required to add a new cafe.",
        list_params(missing.iter().map(|f| f.as_str()))
    ))
}

fn incorrect_parameters(missing: &[CafeField], unexpected: &[&str]) -> CafeError {
    let message = if missing.is_empty() {
        format!(
            "The parameter(s) {} is(are) not part of a cafe record.",
            list_params(unexpected)
        )
    } else {
        format!(
            "The parameter(s) {} is(are) expected, but received {} instead.",
            list_params(missing.iter().map(|f| f.as_str())),
            list_params(unexpected)
        )
    };
    CafeError::IncorrectParameters(message)
}

/// Builds the insert payload once every field is known to be present and valid.
fn strict_record(params: &RawParams, price: Price) -> NewCafe {
    let text = |field: CafeField| params.get(field.as_str()).cloned().unwrap_or_default();
    let flag = |field: CafeField| {
        matches!(
            coerce_boolean(params.get(field.as_str()).map(String::as_str)),
            Ok(Some(true))
        )
    };
    NewCafe {
        name: text(CafeField::Name),
        map_url: text(CafeField::MapUrl),
        img_url: text(CafeField::ImgUrl),
        location: text(CafeField::Location),
        seats: text(CafeField::Seats),
        has_toilet: flag(CafeField::HasToilet),
        has_wifi: flag(CafeField::HasWifi),
        has_sockets: flag(CafeField::HasSockets),
        can_take_calls: flag(CafeField::CanTakeCalls),
        coffee_price: price.formatted(),
    }
}
