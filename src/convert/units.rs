//! Unit tables and linear unit conversion
//!
//! Every non-temperature unit carries a factor relative to its category's
//! base unit (factor 1). Temperature units have no factor and are routed to
//! [`convert_temperature`](super::temperature::convert_temperature).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::temperature::{convert_temperature, TemperatureUnit};
use crate::error::{CalcError, CalcResult};
use crate::format::{ensure_finite, format_number};

pub const CROSS_CATEGORY: &str = "Cross-unit type conversion not supported for these types.";
pub const MISSING_FACTOR: &str = "Unit conversion factors not found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Length,
    Mass,
    Temperature,
    Time,
    Area,
    Volume,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Length,
        Category::Mass,
        Category::Temperature,
        Category::Time,
        Category::Area,
        Category::Volume,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Category::Length => "length",
            Category::Mass => "mass",
            Category::Temperature => "temperature",
            Category::Time => "time",
            Category::Area => "area",
            Category::Volume => "volume",
        }
    }

    /// Capitalised label for pickers and listings
    pub fn label(self) -> &'static str {
        match self {
            Category::Length => "Length",
            Category::Mass => "Mass",
            Category::Temperature => "Temperature",
            Category::Time => "Time",
            Category::Area => "Area",
            Category::Volume => "Volume",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| CalcError::parse(format!("Unknown category: '{}'", s)))
    }
}

/// A convertible unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Unit {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    /// Magnitude relative to the category's base unit; `None` for temperature
    pub factor: Option<f64>,
}

const fn unit(id: &'static str, name: &'static str, category: Category, factor: f64) -> Unit {
    Unit {
        id,
        name,
        category,
        factor: Some(factor),
    }
}

const fn temperature(id: &'static str, name: &'static str) -> Unit {
    Unit {
        id,
        name,
        category: Category::Temperature,
        factor: None,
    }
}

pub static UNITS: &[Unit] = &[
    unit("meter", "Meter (m)", Category::Length, 1.0),
    unit("kilometer", "Kilometer (km)", Category::Length, 1000.0),
    unit("centimeter", "Centimeter (cm)", Category::Length, 0.01),
    unit("millimeter", "Millimeter (mm)", Category::Length, 0.001),
    unit("mile", "Mile (mi)", Category::Length, 1609.34),
    unit("yard", "Yard (yd)", Category::Length, 0.9144),
    unit("foot", "Foot (ft)", Category::Length, 0.3048),
    unit("inch", "Inch (in)", Category::Length, 0.0254),
    unit("kilogram", "Kilogram (kg)", Category::Mass, 1.0),
    unit("gram", "Gram (g)", Category::Mass, 0.001),
    unit("milligram", "Milligram (mg)", Category::Mass, 0.000001),
    unit("pound", "Pound (lb)", Category::Mass, 0.453592),
    unit("ounce", "Ounce (oz)", Category::Mass, 0.0283495),
    temperature("celsius", "Celsius (°C)"),
    temperature("fahrenheit", "Fahrenheit (°F)"),
    temperature("kelvin", "Kelvin (K)"),
    unit("second", "Second (s)", Category::Time, 1.0),
    unit("minute", "Minute (min)", Category::Time, 60.0),
    unit("hour", "Hour (hr)", Category::Time, 3600.0),
    unit("day", "Day (d)", Category::Time, 86400.0),
    unit("sq_meter", "Square Meter (m²)", Category::Area, 1.0),
    unit("sq_kilometer", "Square Kilometer (km²)", Category::Area, 1e6),
    unit("sq_foot", "Square Foot (ft²)", Category::Area, 0.092903),
    unit("cubic_meter", "Cubic Meter (m³)", Category::Volume, 1.0),
    unit("liter", "Liter (L)", Category::Volume, 0.001),
    unit("milliliter", "Milliliter (mL)", Category::Volume, 1e-6),
];

pub fn find_unit(id: &str) -> Option<&'static Unit> {
    UNITS.iter().find(|u| u.id == id)
}

pub fn units_in(category: Category) -> impl Iterator<Item = &'static Unit> {
    UNITS.iter().filter(move |u| u.category == category)
}

/// Category a unit id belongs to
pub fn category_of(id: &str) -> Option<Category> {
    find_unit(id).map(|u| u.category)
}

/// Caption for a conversion, e.g. `1 Meter (m) to Centimeter (cm)`
pub fn conversion_info(amount: f64, from: &str, to: &str) -> String {
    let name = |id: &str| find_unit(id).map_or_else(|| id.to_string(), |u| u.name.to_string());
    format!("{} {} to {}", format_number(amount), name(from), name(to))
}

fn lookup(id: &str) -> CalcResult<&'static Unit> {
    find_unit(id).ok_or_else(|| CalcError::parse(format!("Unknown unit: '{}'", id)))
}

/// Convert `amount` from one unit to another within `category`
pub fn convert_unit(category: Category, from: &str, to: &str, amount: f64) -> CalcResult<f64> {
    let from_unit = lookup(from)?;
    let to_unit = lookup(to)?;

    if from_unit.category != category || to_unit.category != category {
        return Err(CalcError::domain(CROSS_CATEGORY));
    }

    if category == Category::Temperature {
        let from_temp: TemperatureUnit = from.parse()?;
        let to_temp: TemperatureUnit = to.parse()?;
        return convert_temperature(from_temp, to_temp, amount);
    }

    let (Some(from_factor), Some(to_factor)) = (from_unit.factor, to_unit.factor) else {
        return Err(CalcError::domain(MISSING_FACTOR));
    };
    ensure_finite(amount * from_factor / to_factor, "Converted value")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_to_centimeter() {
        assert_eq!(
            convert_unit(Category::Length, "meter", "centimeter", 1.0).unwrap(),
            100.0
        );
    }

    #[test]
    fn test_kilogram_to_gram() {
        assert_eq!(convert_unit(Category::Mass, "kilogram", "gram", 2.0).unwrap(), 2000.0);
    }

    #[test]
    fn test_temperature_delegates() {
        let f = convert_unit(Category::Temperature, "celsius", "fahrenheit", 100.0).unwrap();
        assert!((f - 212.0).abs() < 1e-9);
    }

    #[test]
    fn test_cross_category_rejected() {
        assert_eq!(
            convert_unit(Category::Length, "meter", "gram", 1.0),
            Err(CalcError::Domain(CROSS_CATEGORY.to_string()))
        );
        assert_eq!(
            convert_unit(Category::Mass, "meter", "centimeter", 1.0),
            Err(CalcError::Domain(CROSS_CATEGORY.to_string()))
        );
    }

    #[test]
    fn test_unknown_unit() {
        assert!(matches!(
            convert_unit(Category::Length, "furlong", "meter", 1.0),
            Err(CalcError::Parse(_))
        ));
    }

    #[test]
    fn test_every_category_has_one_base_unit() {
        for category in Category::ALL {
            if category == Category::Temperature {
                assert!(units_in(category).all(|u| u.factor.is_none()));
                continue;
            }
            let bases = units_in(category).filter(|u| u.factor == Some(1.0)).count();
            assert_eq!(bases, 1, "{}", category);
        }
    }

    #[test]
    fn test_category_of() {
        assert_eq!(category_of("liter"), Some(Category::Volume));
        assert_eq!(category_of("kelvin"), Some(Category::Temperature));
        assert_eq!(category_of("parsec"), None);
    }

    #[test]
    fn test_conversion_info() {
        assert_eq!(
            conversion_info(1.0, "meter", "centimeter"),
            "1 Meter (m) to Centimeter (cm)"
        );
        assert_eq!(conversion_info(2.5, "celsius", "x"), "2.5 Celsius (°C) to x");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Area".parse::<Category>().unwrap(), Category::Area);
        assert!("speed".parse::<Category>().is_err());
    }
}
