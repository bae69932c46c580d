use serde::{de, Deserialize, Deserializer};
use std::fmt::Display;
use std::io::Read;
use std::str::FromStr;

/// A monthly report row as exported, before validation.
#[derive(Debug, Deserialize)]
pub(crate) struct ReportRow {
    pub(crate) project_id: u64,
    pub(crate) report_month: u32,
    pub(crate) report_year: i32,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub(crate) first_aid_cases: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub(crate) near_miss_cases: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub(crate) ptw_issued: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub(crate) ptw_closed: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub(crate) training_sessions: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub(crate) tbt_sessions: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub(crate) man_hours: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub(crate) cumulative_man_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectRow {
    pub(crate) id: u64,
    pub(crate) name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub(crate) status: Option<String>,
}

/// Data rows paired with their 1-based position below the header.
pub(crate) fn parse_rows<T, R>(reader: R) -> Result<Vec<(usize, T)>, csv::Error>
where
    T: de::DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<T>()
        .enumerate()
        .map(|(index, row)| row.map(|row| (index + 1, row)))
        .collect()
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value.parse::<T>().map(Some).map_err(de::Error::custom),
        None => Ok(None),
    }
}
