use crate::error::IngestError;
use crate::models::{PurchaseItem, SaleItem};
use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// 抽取结果中的原始值: OCR 返回的编码和金额可能是数字也可能是文本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(serde_json::Number),
    Text(String),
}

impl RawValue {
    pub fn as_text(&self) -> String {
        match self {
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }
}

/// 编码字段按文本保存; JSON 里写成数字的 HSN/序列号转为文本
fn code_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawValue>::deserialize(deserializer)?.map(|v| v.as_text()))
}

/// 抽取协作方返回的原始明细记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawItemRecord {
    #[serde(default, deserialize_with = "code_text")]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default, deserialize_with = "code_text")]
    pub hsn_code: Option<String>,
    #[serde(default, alias = "purchase_price", alias = "sale_price")]
    pub price: Option<RawValue>,
    #[serde(default)]
    pub quantity: Option<RawValue>,
}

/// 去掉货币前缀、千分位和空白: "Rs. 1,250.00" -> "1250.00"
fn clean_amount(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let stripped = lowered
        .trim_start_matches("inr")
        .trim_start_matches("rs.")
        .trim_start_matches("rs")
        .trim_start()
        .trim_start_matches('₹');

    stripped
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect()
}

fn parse_decimal(raw: &RawValue) -> Option<BigDecimal> {
    match raw {
        RawValue::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
        RawValue::Text(s) => BigDecimal::from_str(&clean_amount(s)).ok(),
    }
}

/// 校验后的公共字段
struct ValidatedFields {
    serial_number: Option<String>,
    item_name: String,
    hsn_code: Option<String>,
    price: BigDecimal,
    quantity: BigDecimal,
}

impl RawItemRecord {
    fn validate(&self, index: usize) -> Result<ValidatedFields, IngestError> {
        let item_name = self
            .item_name
            .as_ref()
            .ok_or(IngestError::MissingField {
                index,
                field: "item_name",
            })?
            .trim()
            .to_string();

        let raw_price = self.price.as_ref().ok_or(IngestError::MissingField {
            index,
            field: "price",
        })?;
        let price = parse_decimal(raw_price).ok_or_else(|| IngestError::InvalidPrice {
            index,
            raw: raw_price.as_text(),
        })?;
        if price < BigDecimal::zero() {
            return Err(IngestError::NegativePrice {
                index,
                price: price.to_string(),
            });
        }

        let quantity = match &self.quantity {
            None => BigDecimal::from(1),
            Some(raw) => match parse_decimal(raw) {
                Some(q) if q >= BigDecimal::zero() => q,
                _ => {
                    return Err(IngestError::InvalidQuantity {
                        index,
                        raw: raw.as_text(),
                    })
                }
            },
        };

        Ok(ValidatedFields {
            serial_number: self.serial_number.clone(),
            item_name,
            hsn_code: self.hsn_code.clone(),
            price,
            quantity,
        })
    }

    pub fn to_purchase(&self, index: usize) -> Result<PurchaseItem, IngestError> {
        let f = self.validate(index)?;
        Ok(PurchaseItem {
            serial_number: f.serial_number,
            item_name: f.item_name,
            hsn_code: f.hsn_code,
            purchase_price: f.price,
            quantity: f.quantity,
        })
    }

    pub fn to_sale(&self, index: usize) -> Result<SaleItem, IngestError> {
        let f = self.validate(index)?;
        Ok(SaleItem {
            serial_number: f.serial_number,
            item_name: f.item_name,
            hsn_code: f.hsn_code,
            sale_price: f.price,
            quantity: f.quantity,
        })
    }
}

/// 校验整批采购记录，遇到第一条非法记录即拒绝整批
pub fn ingest_purchases(records: &[RawItemRecord]) -> Result<Vec<PurchaseItem>, IngestError> {
    records
        .iter()
        .enumerate()
        .map(|(index, r)| r.to_purchase(index))
        .collect()
}

/// 校验整批销售记录，遇到第一条非法记录即拒绝整批
pub fn ingest_sales(records: &[RawItemRecord]) -> Result<Vec<SaleItem>, IngestError> {
    records
        .iter()
        .enumerate()
        .map(|(index, r)| r.to_sale(index))
        .collect()
}
