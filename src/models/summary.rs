use super::item::{PurchaseItem, SaleItem};
use super::result::{profit_loss_percentage, serialize_percentage, MatchedPair};
use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

/// 汇总统计 (基于匹配集合，附带未匹配侧的计数与金额)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub total_matched_items: usize,
    pub total_purchase_value: BigDecimal,
    pub total_sale_value: BigDecimal,
    pub total_profit_loss: BigDecimal,
    #[serde(serialize_with = "serialize_percentage")]
    pub total_profit_loss_percentage: BigDecimal,
    pub profit_items_count: usize,
    pub loss_items_count: usize,
    pub total_unmatched_purchases: usize,
    pub total_unmatched_sales: usize,
    pub total_unmatched_purchase_value: BigDecimal,
    pub total_unmatched_sale_value: BigDecimal,
}

impl Default for MatchSummary {
    fn default() -> Self {
        Self {
            total_matched_items: 0,
            total_purchase_value: BigDecimal::zero(),
            total_sale_value: BigDecimal::zero(),
            total_profit_loss: BigDecimal::zero(),
            total_profit_loss_percentage: BigDecimal::zero(),
            profit_items_count: 0,
            loss_items_count: 0,
            total_unmatched_purchases: 0,
            total_unmatched_sales: 0,
            total_unmatched_purchase_value: BigDecimal::zero(),
            total_unmatched_sale_value: BigDecimal::zero(),
        }
    }
}

impl MatchSummary {
    /// 每次重新计算，不做增量维护
    pub fn calculate(
        matched: &[MatchedPair],
        unmatched_purchases: &[PurchaseItem],
        unmatched_sales: &[SaleItem],
    ) -> Self {
        let mut summary = matched.iter().fold(Self::default(), |mut acc, pair| {
            acc.total_matched_items += 1;
            acc.total_purchase_value += &pair.purchase_price;
            acc.total_sale_value += &pair.sale_price;
            acc.total_profit_loss += &pair.profit_loss;
            if pair.profit_loss > BigDecimal::zero() {
                acc.profit_items_count += 1;
            } else if pair.profit_loss < BigDecimal::zero() {
                acc.loss_items_count += 1;
            }
            acc
        });

        summary.total_profit_loss_percentage =
            profit_loss_percentage(&summary.total_profit_loss, &summary.total_purchase_value);

        summary.total_unmatched_purchases = unmatched_purchases.len();
        summary.total_unmatched_sales = unmatched_sales.len();
        for item in unmatched_purchases {
            summary.total_unmatched_purchase_value += &item.purchase_price;
        }
        for item in unmatched_sales {
            summary.total_unmatched_sale_value += &item.sale_price;
        }

        summary
    }
}
