pub mod batch;
pub mod item;
pub mod result;
pub mod summary;

pub use batch::{BatchEntry, BillPair};
pub use item::{LineItem, PurchaseItem, SaleItem};
pub use result::{FieldMatch, MatchOutcome, MatchedPair, ScoreBreakdown};
pub use summary::MatchSummary;
