//! Price data access port.

use crate::domain::error::TraderError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily closes for `symbol` within `[start_date, end_date]`.
    ///
    /// An instrument with no data in the window is an empty series, not an
    /// error. Errors are reserved for a data source that cannot be read.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TraderError>;
}
