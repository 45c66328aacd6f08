//! Customer persistence: the `CustomerStore` port and its PostgreSQL adapter.
//!
//! Writes run in their own transaction. Any storage failure on a write is rolled back
//! and surfaces as `AppError::Validation` carrying the driver message; reads propagate
//! `AppError::Db` untouched.

use crate::error::{AppError, ConfigError};
use crate::model::{Customer, CustomerFilter};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{ConnectOptions, PgPool, Postgres, Transaction};
use std::str::FromStr;

pub const CUSTOMERS_TABLE: &str = "customers";

const COLUMNS: &str =
    "id, name, address, email, phone_number, member_since, status, created_at, last_updated";

#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Inserts the customer and writes the assigned id and audit timestamps back.
    /// Any id already on the entity is discarded first.
    async fn create(&self, customer: &mut Customer) -> Result<(), AppError>;

    /// Persists every column of an already-created customer.
    async fn update(&self, customer: &mut Customer) -> Result<(), AppError>;

    /// Removes the row if present. A missing row is not an error.
    async fn delete(&self, customer: &Customer) -> Result<(), AppError>;

    async fn find(&self, id: i32) -> Result<Option<Customer>, AppError>;

    /// Every customer whose column equals the filter value, ordered by id.
    async fn find_by(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, AppError>;

    async fn all(&self) -> Result<Vec<Customer>, AppError>;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Vec<Customer>, AppError> {
        self.find_by(&CustomerFilter::Name(name.to_string())).await
    }

    async fn find_by_address(&self, address: &str) -> Result<Vec<Customer>, AppError> {
        self.find_by(&CustomerFilter::Address(address.to_string())).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<Customer>, AppError> {
        self.find_by(&CustomerFilter::Email(email.to_string())).await
    }

    async fn find_by_phone_number(&self, phone_number: &str) -> Result<Vec<Customer>, AppError> {
        self.find_by(&CustomerFilter::PhoneNumber(phone_number.to_string())).await
    }

    async fn find_by_member_since(&self, member_since: chrono::NaiveDate) -> Result<Vec<Customer>, AppError> {
        self.find_by(&CustomerFilter::MemberSince(member_since)).await
    }
}

/// Id of a customer that is about to be updated. Updating an unsaved entity is a validation error.
pub fn require_id(customer: &Customer) -> Result<i32, AppError> {
    customer
        .id
        .ok_or_else(|| AppError::Validation("Update called with empty ID field".into()))
}

/// Logs a failed write and converts it into the uniform validation error.
pub fn write_rejected(action: &str, customer: &Customer, e: impl std::fmt::Display) -> AppError {
    tracing::error!(error = %e, "error {} record: {}", action, customer);
    AppError::Validation(e.to_string())
}

/// `CustomerStore` over a shared PostgreSQL pool.
#[derive(Clone)]
pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    pub fn new(pool: PgPool) -> Self {
        PgCustomerStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn begin(&self, action: &str, customer: &Customer) -> Result<Transaction<'static, Postgres>, AppError> {
        self.pool
            .begin()
            .await
            .map_err(|e| write_rejected(action, customer, e))
    }
}

/// Commits on success, rolls back on failure. Both failure paths become validation errors.
async fn settle<T>(
    tx: Transaction<'static, Postgres>,
    result: Result<T, sqlx::Error>,
    action: &str,
    customer: &Customer,
) -> Result<T, AppError> {
    match result {
        Ok(v) => {
            tx.commit().await.map_err(|e| write_rejected(action, customer, e))?;
            Ok(v)
        }
        Err(e) => {
            if let Err(rb) = tx.rollback().await {
                tracing::warn!(error = %rb, "rollback failed");
            }
            Err(write_rejected(action, customer, e))
        }
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn create(&self, customer: &mut Customer) -> Result<(), AppError> {
        tracing::info!(name = %customer.name, "creating customer");
        customer.id = None;
        let sql = format!(
            "INSERT INTO {} (name, address, email, phone_number, member_since, status) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id, created_at, last_updated",
            CUSTOMERS_TABLE
        );
        tracing::debug!(sql = %sql, "query");
        let mut tx = self.begin("creating", customer).await?;
        let result = sqlx::query_as::<_, (i32, NaiveDateTime, NaiveDateTime)>(&sql)
            .bind(&customer.name)
            .bind(&customer.address)
            .bind(&customer.email)
            .bind(&customer.phone_number)
            .bind(customer.member_since)
            .bind(&customer.status)
            .fetch_one(&mut *tx)
            .await;
        let (id, created_at, last_updated) = settle(tx, result, "creating", customer).await?;
        customer.id = Some(id);
        customer.created_at = Some(created_at);
        customer.last_updated = Some(last_updated);
        Ok(())
    }

    async fn update(&self, customer: &mut Customer) -> Result<(), AppError> {
        tracing::info!(name = %customer.name, "saving customer");
        let id = require_id(customer)?;
        let sql = format!(
            "UPDATE {} SET name = $1, address = $2, email = $3, phone_number = $4, member_since = $5, \
             status = $6, last_updated = NOW() WHERE id = $7 RETURNING last_updated",
            CUSTOMERS_TABLE
        );
        tracing::debug!(sql = %sql, id, "query");
        let mut tx = self.begin("updating", customer).await?;
        let result = sqlx::query_as::<_, (NaiveDateTime,)>(&sql)
            .bind(&customer.name)
            .bind(&customer.address)
            .bind(&customer.email)
            .bind(&customer.phone_number)
            .bind(customer.member_since)
            .bind(&customer.status)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await;
        match settle(tx, result, "updating", customer).await? {
            Some((last_updated,)) => {
                customer.last_updated = Some(last_updated);
                Ok(())
            }
            None => Err(write_rejected(
                "updating",
                customer,
                format!("no customer with id {}", id),
            )),
        }
    }

    async fn delete(&self, customer: &Customer) -> Result<(), AppError> {
        tracing::info!(name = %customer.name, "deleting customer");
        let Some(id) = customer.id else {
            return Ok(());
        };
        let sql = format!("DELETE FROM {} WHERE id = $1", CUSTOMERS_TABLE);
        tracing::debug!(sql = %sql, id, "query");
        let mut tx = self.begin("deleting", customer).await?;
        let result = sqlx::query(&sql).bind(id).execute(&mut *tx).await;
        settle(tx, result, "deleting", customer).await?;
        Ok(())
    }

    async fn find(&self, id: i32) -> Result<Option<Customer>, AppError> {
        tracing::info!(id, "processing lookup");
        let sql = format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, CUSTOMERS_TABLE);
        let row = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, AppError> {
        tracing::info!(column = filter.column(), "processing filtered query");
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = $1 ORDER BY id",
            COLUMNS,
            CUSTOMERS_TABLE,
            filter.column()
        );
        tracing::debug!(sql = %sql, filter = ?filter, "query");
        let query = sqlx::query_as::<_, Customer>(&sql);
        let query = match filter {
            CustomerFilter::MemberSince(d) => query.bind(*d),
            CustomerFilter::Name(v)
            | CustomerFilter::Address(v)
            | CustomerFilter::Email(v)
            | CustomerFilter::PhoneNumber(v) => query.bind(v.clone()),
        };
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn all(&self) -> Result<Vec<Customer>, AppError> {
        tracing::info!("processing all customers");
        let sql = format!("SELECT {} FROM {} ORDER BY id", COLUMNS, CUSTOMERS_TABLE);
        Ok(sqlx::query_as::<_, Customer>(&sql).fetch_all(&self.pool).await?)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Create the database named in `database_url` if it does not exist, via the `postgres` admin database.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = split_database_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| ConfigError::DatabaseUrl(e.to_string()))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Splits a connection URL into (admin URL pointing at `postgres`, target database name).
fn split_database_url(url: &str) -> Result<(String, String), ConfigError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| ConfigError::DatabaseUrl("no database path".into()))?;
    let path_and_query = &url[path_start..];
    let (db_name, query) = match path_and_query.split_once('?') {
        Some((db, q)) => (db.trim(), Some(q)),
        None => (path_and_query.trim(), None),
    };
    let mut admin_url = format!("{}postgres", &url[..path_start]);
    if let Some(q) = query {
        admin_url.push('?');
        admin_url.push_str(q);
    }
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
