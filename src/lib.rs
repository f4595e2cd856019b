mod aggregate;
mod dashboard;
mod error;
mod filtering;
mod observations;
mod report;
mod types;

pub use dashboard::*;
pub use error::AirQualityError;
pub use filtering::{date_expr, ObservationFrameFilterExt};

pub use observations::error::DataLoadError;
pub use observations::frame_cache::{FrameCache, SourceKey};
pub use observations::loader::{
    datetime_expr, prepare_observations, validate_columns, ObservationLoader, StationSource,
    COL_DATETIME, COL_DAY, COL_HOUR, COL_MONTH, COL_YEAR, DEFAULT_NULL_VALUE, REQUIRED_COLUMNS,
};

pub use report::{join_daily, labels, DashboardReport, TrendPoint, VariableMetrics};

pub use types::dataset::{Dataset, StationFrame};
pub use types::date_range::{DatePeriod, DateRange, Month, Year};
pub use types::observation_frame::ObservationFrame;
pub use types::summary::{Summary, SummaryStats, DEFAULT_DISPLAY_DECIMALS};
pub use types::variable::{UnknownVariableName, Variable};
pub use types::views::{DailyMean, HourlyCounts, HourlyMeans};
