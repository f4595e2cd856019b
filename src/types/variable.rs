//! Defines the measured variables found in PRSA station files.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A numeric column of interest in a station file.
///
/// Each variant maps to exactly one CSV column name, which is also the column
/// name used in every frame produced by this crate. `Display` prints that name.
///
/// # Examples
///
/// ```
/// use air_quality::Variable;
///
/// assert_eq!(Variable::Co.to_string(), "CO");
/// assert_eq!("pm2.5".parse::<Variable>(), Ok(Variable::Pm25));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Variable {
    /// Fine particulate matter, µg/m³.
    #[serde(rename = "PM2.5")]
    Pm25,
    /// Coarse particulate matter, µg/m³.
    #[serde(rename = "PM10")]
    Pm10,
    /// Sulphur dioxide, µg/m³.
    #[serde(rename = "SO2")]
    So2,
    /// Nitrogen dioxide, µg/m³.
    #[serde(rename = "NO2")]
    No2,
    /// Carbon monoxide concentration, µg/m³.
    #[serde(rename = "CO")]
    Co,
    /// Ozone, µg/m³.
    #[serde(rename = "O3")]
    O3,
    /// Air temperature in degrees Celsius.
    #[serde(rename = "TEMP")]
    Temp,
    /// Air pressure, hPa.
    #[serde(rename = "PRES")]
    Pres,
    /// Dew point temperature in degrees Celsius.
    #[serde(rename = "DEWP")]
    Dewp,
    /// Precipitation, mm.
    #[serde(rename = "RAIN")]
    Rain,
    /// Wind speed, m/s.
    #[serde(rename = "WSPM")]
    Wspm,
}

impl Variable {
    pub const ALL: [Variable; 11] = [
        Variable::Pm25,
        Variable::Pm10,
        Variable::So2,
        Variable::No2,
        Variable::Co,
        Variable::O3,
        Variable::Temp,
        Variable::Pres,
        Variable::Dewp,
        Variable::Rain,
        Variable::Wspm,
    ];

    /// The column name as written in the CSV header.
    pub fn column_name(&self) -> &'static str {
        match self {
            Variable::Pm25 => "PM2.5",
            Variable::Pm10 => "PM10",
            Variable::So2 => "SO2",
            Variable::No2 => "NO2",
            Variable::Co => "CO",
            Variable::O3 => "O3",
            Variable::Temp => "TEMP",
            Variable::Pres => "PRES",
            Variable::Dewp => "DEWP",
            Variable::Rain => "RAIN",
            Variable::Wspm => "WSPM",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Variable::Pm25 => "PM2.5",
            Variable::Pm10 => "PM10",
            Variable::So2 => "Sulphur dioxide",
            Variable::No2 => "Nitrogen dioxide",
            Variable::Co => "Carbon monoxide",
            Variable::O3 => "Ozone",
            Variable::Temp => "Temperature",
            Variable::Pres => "Pressure",
            Variable::Dewp => "Dew point",
            Variable::Rain => "Precipitation",
            Variable::Wspm => "Wind speed",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Variable::Pm25
            | Variable::Pm10
            | Variable::So2
            | Variable::No2
            | Variable::Co
            | Variable::O3 => "µg/m³",
            Variable::Temp | Variable::Dewp => "°C",
            Variable::Pres => "hPa",
            Variable::Rain => "mm",
            Variable::Wspm => "m/s",
        }
    }
}

/// Formats a `Variable` using its CSV column name.
impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// Returned when a string does not name a known measured variable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown measured variable '{0}'")]
pub struct UnknownVariableName(pub String);

impl FromStr for Variable {
    type Err = UnknownVariableName;

    /// Parses a column name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Variable::ALL
            .into_iter()
            .find(|v| v.column_name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownVariableName(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_column_names() {
        assert_eq!("CO".parse::<Variable>(), Ok(Variable::Co));
        assert_eq!("temp".parse::<Variable>(), Ok(Variable::Temp));
        assert_eq!(" PM2.5 ".parse::<Variable>(), Ok(Variable::Pm25));
        assert_eq!(
            "wd".parse::<Variable>(),
            Err(UnknownVariableName("wd".to_string()))
        );
    }

    #[test]
    fn test_column_names_round_trip_through_display() {
        for variable in Variable::ALL {
            assert_eq!(variable.to_string().parse::<Variable>(), Ok(variable));
        }
    }

    #[test]
    fn test_unknown_name_error_message() {
        let err = "NOx".parse::<Variable>().unwrap_err();
        assert_eq!(err.to_string(), "unknown measured variable 'NOx'");
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn test_serializes_as_column_name() {
        let json = serde_json::to_string(&Variable::Temp).unwrap();
        assert_eq!(json, "\"TEMP\"");
    }
}
