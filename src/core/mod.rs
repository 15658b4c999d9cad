pub mod duration;
pub mod etl;
pub mod forecast;
pub mod header;
pub mod pipeline;
pub mod schedule;

pub use crate::domain::model::{
    ElectiveRecord, Enrollment, RawTable, Row, ScheduleRecord, SemesterManifestEntry, SheetRef,
    Table, TermCode, ON_DEMAND,
};
pub use crate::domain::ports::{Clock, Pipeline, Storage, TableSource};
pub use crate::utils::error::Result;
