//! Customer entity and list filters.

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// Value written to `status` by the suspend transition.
pub const STATUS_SUSPENDED: &str = "suspended";

/// One row of the `customers` table.
///
/// `id` is `None` until the store inserts the row; `created_at` and
/// `last_updated` are owned by the store and never come from a request.
#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Customer {
    pub id: Option<i32>,
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone_number: String,
    pub member_since: NaiveDate,
    pub status: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub last_updated: Option<NaiveDateTime>,
}

impl Customer {
    pub fn suspend(&mut self) {
        self.status = Some(STATUS_SUSPENDED.to_string());
    }

    pub fn is_suspended(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUSPENDED)
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Customer {} id=[{}]>", self.name, id),
            None => write!(f, "<Customer {} id=[None]>", self.name),
        }
    }
}

/// Equality filter for list queries. One column per variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CustomerFilter {
    Name(String),
    Address(String),
    Email(String),
    PhoneNumber(String),
    MemberSince(NaiveDate),
}

impl CustomerFilter {
    pub fn column(&self) -> &'static str {
        match self {
            CustomerFilter::Name(_) => "name",
            CustomerFilter::Address(_) => "address",
            CustomerFilter::Email(_) => "email",
            CustomerFilter::PhoneNumber(_) => "phone_number",
            CustomerFilter::MemberSince(_) => "member_since",
        }
    }

    pub fn matches(&self, customer: &Customer) -> bool {
        match self {
            CustomerFilter::Name(v) => &customer.name == v,
            CustomerFilter::Address(v) => &customer.address == v,
            CustomerFilter::Email(v) => &customer.email == v,
            CustomerFilter::PhoneNumber(v) => &customer.phone_number == v,
            CustomerFilter::MemberSince(d) => &customer.member_since == d,
        }
    }
}
