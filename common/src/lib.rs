//! Shipboard Common Library
//!
//! CLIとデスクトップボードで共有される型とロジック。
//! I/O は一切持たない（取得・描画は呼び出し側の責務）。

pub mod types;
pub mod schema;
pub mod error;
pub mod snapshot;
pub mod filter;
pub mod carousel;
pub mod schedule;
pub mod metrics;
pub mod display;

pub use types::{Cell, CellKey, ShipmentRow};
pub use schema::{RawTable, REQUIRED_COLUMNS};
pub use error::{FilterError, SettingsError, ValidationError};
pub use snapshot::ShipmentSnapshot;
pub use filter::{DateRange, FilterCriteria, FilterOptions, ResolvedFilter};
pub use carousel::{build_sequence, page_count, CarouselItem, Slide};
pub use schedule::{ScheduleSettings, ScheduleState};
pub use metrics::{shipments_by_route, RouteCount, StatusCounts, StatusKind};
