pub mod first_follow;
pub mod grammar;
pub mod ll1_table;
pub mod parse;
pub mod pretty_print;
pub use first_follow::{EpsilonMode, FirstSets, FollowSets};
pub use grammar::{Grammar, Production, Symbol};
pub use ll1_table::{ConflictPolicy, ParseTable, TableCell};

pub const EPSILON: &str = "epsilon";
pub const END_MARK: &str = "$";
