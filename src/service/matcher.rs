use crate::config::MatcherConfig;
use crate::error::MatchError;
use crate::models::{
    BatchEntry, BillPair, LineItem, MatchOutcome, MatchSummary, MatchedPair, PurchaseItem,
    SaleItem, ScoreBreakdown,
};
use crate::service::similarity::{compare_code, name_similarity};
use rayon::prelude::*;
use std::cmp::Ordering;

/// 阈值比较容差 (0.5 + 0.2 这类浮点和不应落在阈值下方)
const SCORE_EPSILON: f64 = 1e-9;

/// 候选对 (按输入下标引用，不持有明细)
#[derive(Debug, Clone, Copy)]
struct Candidate {
    purchase_index: usize,
    sale_index: usize,
    score: ScoreBreakdown,
}

/// 候选排序: 分数降序，采购下标升序，销售下标升序
fn candidate_order(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .total
        .total_cmp(&a.score.total)
        .then_with(|| a.purchase_index.cmp(&b.purchase_index))
        .then_with(|| a.sale_index.cmp(&b.sale_index))
}

/// 采购/销售明细匹配器
///
/// 对全部 m×n 候选对评分，过滤阈值以下的候选，按分数降序贪心选取，
/// 每条明细最多参与一次匹配。
#[derive(Debug, Clone)]
pub struct ItemMatcher {
    config: MatcherConfig,
}

impl Default for ItemMatcher {
    fn default() -> Self {
        Self {
            config: MatcherConfig::default(),
        }
    }
}

impl ItemMatcher {
    pub fn new(config: MatcherConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// 计算一对明细的加权得分
    pub fn score<P: LineItem, S: LineItem>(&self, purchase: &P, sale: &S) -> ScoreBreakdown {
        let serial = compare_code(purchase.serial_number(), sale.serial_number());
        let hsn = compare_code(purchase.hsn_code(), sale.hsn_code());
        let name = name_similarity(purchase.item_name(), sale.item_name());

        let total = self.config.serial_weight * serial.signal()
            + self.config.hsn_weight * hsn.signal()
            + self.config.name_weight * name;

        ScoreBreakdown {
            serial,
            hsn,
            name_similarity: name,
            total,
        }
    }

    /// 得分是否达到匹配阈值
    pub fn is_eligible(&self, score: f64) -> bool {
        score + SCORE_EPSILON >= self.config.match_threshold
    }

    /// 全量评分并过滤出合格候选，已按选取顺序排序
    fn ranked_candidates(&self, purchases: &[PurchaseItem], sales: &[SaleItem]) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for (purchase_index, purchase) in purchases.iter().enumerate() {
            for (sale_index, sale) in sales.iter().enumerate() {
                let score = self.score(purchase, sale);
                if self.is_eligible(score.total) {
                    candidates.push(Candidate {
                        purchase_index,
                        sale_index,
                        score,
                    });
                }
            }
        }

        candidates.sort_by(candidate_order);
        candidates
    }

    /// 匹配采购与销售明细
    ///
    /// `matched` 按选取顺序输出 (分数降序)，未匹配明细保持原始顺序。
    pub fn match_items(&self, purchases: &[PurchaseItem], sales: &[SaleItem]) -> MatchOutcome {
        let candidates = self.ranked_candidates(purchases, sales);
        tracing::debug!(
            "候选对: {} 个达到阈值 {} (共 {} 对)",
            candidates.len(),
            self.config.match_threshold,
            purchases.len() * sales.len()
        );

        // 按原始下标记录消费状态
        let mut purchase_used = vec![false; purchases.len()];
        let mut sale_used = vec![false; sales.len()];
        let mut matched = Vec::new();

        for c in &candidates {
            if purchase_used[c.purchase_index] || sale_used[c.sale_index] {
                continue;
            }
            purchase_used[c.purchase_index] = true;
            sale_used[c.sale_index] = true;

            matched.push(MatchedPair::new(
                c.purchase_index,
                &purchases[c.purchase_index],
                c.sale_index,
                &sales[c.sale_index],
                c.score,
            ));
        }

        let unmatched_purchases: Vec<PurchaseItem> = purchases
            .iter()
            .zip(&purchase_used)
            .filter(|(_, used)| !**used)
            .map(|(item, _)| item.clone())
            .collect();
        let unmatched_sales: Vec<SaleItem> = sales
            .iter()
            .zip(&sale_used)
            .filter(|(_, used)| !**used)
            .map(|(item, _)| item.clone())
            .collect();

        let summary = MatchSummary::calculate(&matched, &unmatched_purchases, &unmatched_sales);

        tracing::info!(
            "匹配完成: 采购 {} 条, 销售 {} 条, 已匹配 {}, 未匹配采购 {}, 未匹配销售 {}",
            purchases.len(),
            sales.len(),
            matched.len(),
            unmatched_purchases.len(),
            unmatched_sales.len()
        );

        MatchOutcome {
            matched,
            unmatched_purchases,
            unmatched_sales,
            summary,
        }
    }

    /// 批量匹配: 各单据对互不共享状态，并行执行，输出顺序与输入一致
    pub fn match_batch(&self, pairs: &[BillPair]) -> Vec<BatchEntry> {
        tracing::info!("批量匹配开始: {} 组单据", pairs.len());

        let entries: Vec<BatchEntry> = pairs
            .par_iter()
            .map(|pair| {
                let outcome = self.match_items(&pair.purchases, &pair.sales);
                tracing::info!(
                    "Bill {}: 已匹配 {}, 盈亏 {}",
                    pair.bill_id,
                    outcome.summary.total_matched_items,
                    outcome.summary.total_profit_loss
                );
                BatchEntry {
                    bill_id: pair.bill_id.clone(),
                    outcome,
                }
            })
            .collect();

        let total_matched: usize = entries
            .iter()
            .map(|e| e.outcome.summary.total_matched_items)
            .sum();
        tracing::info!("批量匹配完成: {} 组单据, 共匹配 {} 条", entries.len(), total_matched);

        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldMatch;
    use bigdecimal::BigDecimal;

    fn p(name: &str, price: i64) -> PurchaseItem {
        PurchaseItem::new(name, BigDecimal::from(price))
    }

    fn s(name: &str, price: i64) -> SaleItem {
        SaleItem::new(name, BigDecimal::from(price))
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let cfg = MatcherConfig {
            name_weight: 0.5,
            ..MatcherConfig::default()
        };
        assert!(ItemMatcher::new(cfg).is_err());
    }

    #[test]
    fn test_full_match_scores_one() {
        let matcher = ItemMatcher::default();
        let score = matcher.score(
            &p("Widget A", 100).with_serial("SN1").with_hsn("8471"),
            &s("Widget A", 150).with_serial("sn1").with_hsn("8471"),
        );
        assert_eq!(score.serial, FieldMatch::Match);
        assert_eq!(score.hsn, FieldMatch::Match);
        assert!((score.total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_serial_and_exact_name_reach_threshold() {
        let matcher = ItemMatcher::default();
        let score = matcher.score(
            &p("Router", 10).with_serial("R-1"),
            &s("router", 12).with_serial("R-1"),
        );
        assert!(matcher.is_eligible(score.total), "score {}", score.total);
    }

    #[test]
    fn test_hsn_and_name_alone_below_threshold() {
        let matcher = ItemMatcher::default();
        let score = matcher.score(
            &p("Router", 10).with_hsn("8517"),
            &s("Router", 12).with_hsn("8517"),
        );
        assert!((score.total - 0.5).abs() < 1e-12);
        assert!(!matcher.is_eligible(score.total));
    }

    #[test]
    fn test_candidate_order_ties_break_on_indices() {
        let score = ScoreBreakdown {
            serial: FieldMatch::Match,
            hsn: FieldMatch::Match,
            name_similarity: 1.0,
            total: 1.0,
        };
        let candidate = |purchase_index, sale_index| Candidate {
            purchase_index,
            sale_index,
            score,
        };
        let mut candidates = vec![candidate(1, 0), candidate(0, 1), candidate(0, 0)];
        candidates.sort_by(candidate_order);

        let order: Vec<(usize, usize)> = candidates
            .iter()
            .map(|c| (c.purchase_index, c.sale_index))
            .collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0)]);
    }

    #[test]
    fn test_lower_threshold_allows_name_only_matches() {
        let cfg = MatcherConfig::default().with_threshold(0.15);
        let matcher = ItemMatcher::new(cfg).unwrap();
        let outcome = matcher.match_items(&[p("Steel Bottle", 5)], &[s("steel bottle", 8)]);
        assert_eq!(outcome.matched.len(), 1);
    }

    #[test]
    fn test_duplicates_pair_independently() {
        let matcher = ItemMatcher::default();
        let purchases = vec![
            p("Cable", 5).with_serial("C1").with_hsn("8544"),
            p("Cable", 5).with_serial("C1").with_hsn("8544"),
        ];
        let sales = vec![
            s("Cable", 7).with_serial("C1").with_hsn("8544"),
            s("Cable", 7).with_serial("C1").with_hsn("8544"),
        ];
        let outcome = matcher.match_items(&purchases, &sales);

        let pairs: Vec<(usize, usize)> = outcome
            .matched
            .iter()
            .map(|m| (m.purchase_index, m.sale_index))
            .collect();
        assert_eq!(pairs, vec![(0, 0), (1, 1)]);
        assert!(outcome.unmatched_purchases.is_empty());
        assert!(outcome.unmatched_sales.is_empty());
    }

    #[test]
    fn test_match_batch_keeps_input_order() {
        let matcher = ItemMatcher::default();
        let pairs: Vec<BillPair> = (0..8)
            .map(|i| BillPair {
                bill_id: format!("bill-{}", i),
                purchases: vec![p("Lamp", 10).with_serial(format!("L{}", i)).with_hsn("9405")],
                sales: vec![s("Lamp", 10 + i).with_serial(format!("L{}", i)).with_hsn("9405")],
            })
            .collect();

        let entries = matcher.match_batch(&pairs);
        assert_eq!(entries.len(), 8);
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.bill_id, format!("bill-{}", i));
            assert_eq!(entry.outcome.summary.total_profit_loss, BigDecimal::from(i as i64));
        }
    }
}
