//! Database models for activities.

use diesel::prelude::*;
use steplog_core::activities::{ActivityRecord, NewActivity};

/// Database model for a stored activity
#[derive(Queryable, Selectable, PartialEq, Eq, Debug, Clone)]
#[diesel(table_name = crate::schema::activities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ActivityDB {
    pub id: i64,
    pub steps: i64,
    pub date: i64,
}

/// Database model for inserting an activity. The id is left to SQLite.
#[derive(Insertable, Debug, Clone, Copy)]
#[diesel(table_name = crate::schema::activities)]
pub struct NewActivityDB {
    pub steps: i64,
    pub date: i64,
}

impl From<ActivityDB> for ActivityRecord {
    fn from(db: ActivityDB) -> Self {
        Self {
            id: db.id,
            steps: db.steps,
            date: db.date,
        }
    }
}

impl From<NewActivity> for NewActivityDB {
    fn from(domain: NewActivity) -> Self {
        Self {
            steps: domain.steps,
            date: domain.date,
        }
    }
}
