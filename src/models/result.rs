use super::item::{LineItem, PurchaseItem, SaleItem};
use super::summary::MatchSummary;
use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize, Serializer};

/// 结构化字段 (序列号 / HSN) 的比对状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldMatch {
    /// 任一侧缺失该字段
    Absent,
    /// 字段存在但为空白
    Empty,
    Mismatch,
    Match,
}

impl FieldMatch {
    /// 只有 Match 贡献分数
    pub fn signal(self) -> f64 {
        match self {
            FieldMatch::Match => 1.0,
            _ => 0.0,
        }
    }
}

/// 一对候选的得分明细
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub serial: FieldMatch,
    pub hsn: FieldMatch,
    pub name_similarity: f64,
    pub total: f64,
}

/// 匹配结果 (一条采购明细 <-> 一条销售明细)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub purchase_index: usize,
    pub sale_index: usize,
    pub serial_number: String,
    pub item_name: String,
    pub hsn_code: String,
    pub purchase_price: BigDecimal,
    pub sale_price: BigDecimal,
    pub profit_loss: BigDecimal,
    /// 内存中保留完整精度，输出报告时保留 2 位小数
    #[serde(serialize_with = "serialize_percentage")]
    pub profit_loss_percentage: BigDecimal,
    /// 销售数量非 0 时取销售数量，否则取采购数量
    pub quantity: BigDecimal,
    pub purchase_quantity: BigDecimal,
    pub sale_quantity: BigDecimal,
    pub quantity_mismatch: bool,
    pub score: ScoreBreakdown,
}

/// 采购侧非空优先，其次销售侧，都为空则返回空串
fn prefer_non_empty(purchase: Option<&str>, sale: Option<&str>) -> String {
    [purchase, sale]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// 盈亏百分比, 采购价为 0 时定义为 0
pub fn profit_loss_percentage(
    profit_loss: &BigDecimal,
    purchase_price: &BigDecimal,
) -> BigDecimal {
    if purchase_price.is_zero() {
        return BigDecimal::zero();
    }
    profit_loss / purchase_price * BigDecimal::from(100)
}

pub(crate) fn serialize_percentage<S: Serializer>(
    value: &BigDecimal,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    value.round(2).serialize(serializer)
}

impl MatchedPair {
    pub fn new(
        purchase_index: usize,
        purchase: &PurchaseItem,
        sale_index: usize,
        sale: &SaleItem,
        score: ScoreBreakdown,
    ) -> Self {
        let profit_loss = &sale.sale_price - &purchase.purchase_price;
        let profit_loss_percentage = profit_loss_percentage(&profit_loss, &purchase.purchase_price);
        let quantity = if sale.quantity.is_zero() {
            purchase.quantity.clone()
        } else {
            sale.quantity.clone()
        };

        Self {
            purchase_index,
            sale_index,
            serial_number: prefer_non_empty(purchase.serial_number(), sale.serial_number()),
            item_name: prefer_non_empty(Some(purchase.item_name()), Some(sale.item_name())),
            hsn_code: prefer_non_empty(purchase.hsn_code(), sale.hsn_code()),
            purchase_price: purchase.purchase_price.clone(),
            sale_price: sale.sale_price.clone(),
            profit_loss,
            profit_loss_percentage,
            quantity,
            purchase_quantity: purchase.quantity.clone(),
            sale_quantity: sale.quantity.clone(),
            quantity_mismatch: purchase.quantity != sale.quantity,
            score,
        }
    }
}

/// 一次匹配的完整输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub matched: Vec<MatchedPair>,
    pub unmatched_purchases: Vec<PurchaseItem>,
    pub unmatched_sales: Vec<SaleItem>,
    pub summary: MatchSummary,
}
