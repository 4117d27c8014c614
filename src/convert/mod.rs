//! Conversion engines: linear unit factors, affine temperature formulas and
//! currency rate tables.

pub mod currency;
pub mod temperature;
pub mod units;

pub use currency::{convert_currency, RateTable};
pub use temperature::{convert_temperature, TemperatureUnit};
pub use units::{category_of, conversion_info, convert_unit, find_unit, units_in, Category, Unit, UNITS};
