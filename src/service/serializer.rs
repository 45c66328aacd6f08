//! Wire representation of a customer and the typed parse back into the entity.

use crate::error::PayloadError;
use crate::model::Customer;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Column widths of the `customers` table.
pub const NAME_MAX: usize = 63;
pub const ADDRESS_MAX: usize = 256;
pub const EMAIL_MAX: usize = 63;
pub const PHONE_NUMBER_MAX: usize = 32;

/// JSON body returned for a customer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomerResource {
    pub id: Option<i32>,
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone_number: String,
    pub member_since: NaiveDate,
    pub status: Option<String>,
}

impl From<&Customer> for CustomerResource {
    fn from(c: &Customer) -> Self {
        CustomerResource {
            id: c.id,
            name: c.name.clone(),
            address: c.address.clone(),
            email: c.email.clone(),
            phone_number: c.phone_number.clone(),
            member_since: c.member_since,
            status: c.status.clone(),
        }
    }
}

/// Client-settable fields, fully parsed before anything touches an entity.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomerFields {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone_number: String,
    pub member_since: NaiveDate,
}

impl CustomerFields {
    pub fn parse(payload: &Value) -> Result<Self, PayloadError> {
        let map = payload.as_object().ok_or(PayloadError::WrongShape)?;
        let name = required_string(map, "name", NAME_MAX)?;
        if name.trim().is_empty() {
            return Err(PayloadError::Empty("name"));
        }
        Ok(CustomerFields {
            name,
            address: required_string(map, "address", ADDRESS_MAX)?,
            email: required_string(map, "email", EMAIL_MAX)?,
            phone_number: required_string(map, "phone_number", PHONE_NUMBER_MAX)?,
            member_since: required_date(map, "member_since")?,
        })
    }

    /// Overwrites every editable field; id, status and audit columns are left alone.
    pub fn apply_to(self, customer: &mut Customer) {
        customer.name = self.name;
        customer.address = self.address;
        customer.email = self.email;
        customer.phone_number = self.phone_number;
        customer.member_since = self.member_since;
    }
}

impl From<CustomerFields> for Customer {
    fn from(f: CustomerFields) -> Self {
        Customer {
            id: None,
            name: f.name,
            address: f.address,
            email: f.email,
            phone_number: f.phone_number,
            member_since: f.member_since,
            status: None,
            created_at: None,
            last_updated: None,
        }
    }
}

pub fn serialize(customer: &Customer) -> CustomerResource {
    CustomerResource::from(customer)
}

/// New, unsaved customer from a request body.
pub fn deserialize(payload: &Value) -> Result<Customer, PayloadError> {
    CustomerFields::parse(payload).map(Customer::from)
}

/// Parses `payload` onto an existing customer. On error the customer is untouched.
pub fn deserialize_into(customer: &mut Customer, payload: &Value) -> Result<(), PayloadError> {
    CustomerFields::parse(payload)?.apply_to(customer);
    Ok(())
}

/// Strict calendar date: exactly `YYYY-MM-DD`, zero-padded, no sign or surrounding whitespace.
pub fn parse_date(s: &str) -> Result<NaiveDate, PayloadError> {
    let bad = || PayloadError::BadDate(s.to_string());
    let b = s.as_bytes();
    let shaped = b.len() == 10
        && b.iter()
            .enumerate()
            .all(|(i, c)| if i == 4 || i == 7 { *c == b'-' } else { c.is_ascii_digit() });
    if !shaped {
        return Err(bad());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| bad())
}

fn required<'a>(
    map: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, PayloadError> {
    match map.get(field) {
        None | Some(Value::Null) => Err(PayloadError::MissingField(field)),
        Some(v) => Ok(v),
    }
}

fn required_string(
    map: &Map<String, Value>,
    field: &'static str,
    max: usize,
) -> Result<String, PayloadError> {
    let s = required(map, field)?.as_str().ok_or(PayloadError::WrongType {
        field,
        expected: "a string",
    })?;
    if s.chars().count() > max {
        return Err(PayloadError::TooLong { field, max });
    }
    Ok(s.to_string())
}

fn required_date(map: &Map<String, Value>, field: &'static str) -> Result<NaiveDate, PayloadError> {
    let s = required(map, field)?.as_str().ok_or(PayloadError::WrongType {
        field,
        expected: "an ISO-8601 date string",
    })?;
    parse_date(s)
}
