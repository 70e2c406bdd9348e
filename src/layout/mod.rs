pub mod epoch;
pub mod infra;
pub mod period;

pub use epoch::{column_shift, select_epoch, Epoch, EPOCH_BOUNDARIES};
pub use infra::{FieldColumn, InfraField, INFRA_LAYOUT};
pub use period::Period;
