//! chrono <-> BSON date conversion at millisecond precision.

use chrono::{DateTime, Utc};
use mongodb::bson;

pub fn to_bson(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

pub fn from_bson(at: bson::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(at.timestamp_millis())
}
