/// All database primary keys are PostgreSQL UUIDs (`gen_random_uuid()`).
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Money amounts (premiums, installment amounts) are `NUMERIC(12,2)`.
pub type Money = rust_decimal::Decimal;
