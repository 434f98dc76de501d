use super::item::{PurchaseItem, SaleItem};
use super::result::MatchOutcome;
use serde::{Deserialize, Serialize};

/// 一组待匹配的采购/销售单据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillPair {
    pub bill_id: String,
    pub purchases: Vec<PurchaseItem>,
    pub sales: Vec<SaleItem>,
}

/// 批量匹配中单组单据的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    pub bill_id: String,
    pub outcome: MatchOutcome,
}
