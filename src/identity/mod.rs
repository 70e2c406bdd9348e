pub mod bank_type;
pub mod heuristics;
pub mod normalize;
pub mod table;

pub use bank_type::BankType;
pub use heuristics::infer_bank_type;
pub use normalize::{clean_name, normalize_name};
pub use table::{BankEntry, ReferenceTable, Resolution};
