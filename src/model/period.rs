//! The accounting period: which monthly sheet a request lands in, and the date written with it.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Month names used in sheet labels, January first.
const MONTHS: [&str; 12] = [
    "Январь",
    "Февраль",
    "Март",
    "Апрель",
    "Май",
    "Июнь",
    "Июль",
    "Август",
    "Сентябрь",
    "Октябрь",
    "Ноябрь",
    "Декабрь",
];

/// Identifies the monthly sheet that a request reads from and writes to.
///
/// A `Period` is computed fresh for every request and never persisted. Its `label` is the sheet
/// name, for example `Март'26`, and its `date` is the calendar date written into the date column of
/// new rows.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Period {
    label: String,
    date: NaiveDate,
}

impl Period {
    /// The period for the local wall-clock date.
    pub fn now() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// The period that `date` falls into.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            label: label_for(date),
            date,
        }
    }

    /// Uses `label` as the sheet name instead of the one derived from `date`. This lets a caller
    /// keep writing into a sheet it picked earlier, e.g. last month's sheet during the first days
    /// of a new month.
    pub fn with_label(date: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            date,
        }
    }

    /// The sheet name.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The value written to the date column of a new row.
    pub fn date_cell(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Month name, an apostrophe, and the two-digit year.
fn label_for(date: NaiveDate) -> String {
    let month = MONTHS[date.month0() as usize];
    let year = date.year().rem_euclid(100);
    format!("{month}'{year:02}")
}
