//! Static dropdown metadata for the search form.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default and allowed values for one filterable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub default_value: String,
    pub values: Vec<String>,
}

impl Filters {
    fn new(default_value: &str, values: &[&str]) -> Self {
        Self {
            default_value: default_value.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Field name -> filter metadata, in display order.
pub type FilterOptions = IndexMap<String, Filters>;

// TODO: derive years from `SELECT DISTINCT offence_year FROM traffic_offences_data_parquet`
// once the endpoint can afford an Athena round trip.
const YEARS: &[&str] = &[
    "2023", "2022", "2021", "2020", "2019", "2018", "2017", "2016", "2015", "2014", "2013",
    "2012", "2011", "2010",
];

const MONTHS: &[&str] = &["jan", "feb", "march"];

const STATES: &[&str] = &["wa", "nsw", "nt", "qld", "vic"];

/// The filter options served by `GET /filters`.
///
/// The month default is not in the month list; the frontend treats it as a
/// placeholder.
pub fn filter_options() -> FilterOptions {
    let mut options = IndexMap::with_capacity(3);
    options.insert("year".to_string(), Filters::new("2023", YEARS));
    options.insert("month".to_string(), Filters::new("may", MONTHS));
    options.insert("state".to_string(), Filters::new("wa", STATES));
    options
}
