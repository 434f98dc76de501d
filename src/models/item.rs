use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

fn default_quantity() -> BigDecimal {
    BigDecimal::from(1)
}

/// 账单明细的公共视图，评分逻辑只依赖这些字段
pub trait LineItem {
    fn serial_number(&self) -> Option<&str>;
    fn item_name(&self) -> &str;
    fn hsn_code(&self) -> Option<&str>;
    fn price(&self) -> &BigDecimal;
    fn quantity(&self) -> &BigDecimal;
}

/// 采购单明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseItem {
    #[serde(default)]
    pub serial_number: Option<String>,
    pub item_name: String,
    #[serde(default)]
    pub hsn_code: Option<String>,
    pub purchase_price: BigDecimal,
    #[serde(default = "default_quantity")]
    pub quantity: BigDecimal,
}

/// 销售单明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    #[serde(default)]
    pub serial_number: Option<String>,
    pub item_name: String,
    #[serde(default)]
    pub hsn_code: Option<String>,
    pub sale_price: BigDecimal,
    #[serde(default = "default_quantity")]
    pub quantity: BigDecimal,
}

impl PurchaseItem {
    pub fn new(item_name: impl Into<String>, purchase_price: BigDecimal) -> Self {
        Self {
            serial_number: None,
            item_name: item_name.into(),
            hsn_code: None,
            purchase_price,
            quantity: default_quantity(),
        }
    }

    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial_number = Some(serial.into());
        self
    }

    pub fn with_hsn(mut self, hsn: impl Into<String>) -> Self {
        self.hsn_code = Some(hsn.into());
        self
    }

    pub fn with_quantity(mut self, quantity: BigDecimal) -> Self {
        self.quantity = quantity;
        self
    }
}

impl SaleItem {
    pub fn new(item_name: impl Into<String>, sale_price: BigDecimal) -> Self {
        Self {
            serial_number: None,
            item_name: item_name.into(),
            hsn_code: None,
            sale_price,
            quantity: default_quantity(),
        }
    }

    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial_number = Some(serial.into());
        self
    }

    pub fn with_hsn(mut self, hsn: impl Into<String>) -> Self {
        self.hsn_code = Some(hsn.into());
        self
    }

    pub fn with_quantity(mut self, quantity: BigDecimal) -> Self {
        self.quantity = quantity;
        self
    }
}

impl LineItem for PurchaseItem {
    fn serial_number(&self) -> Option<&str> {
        self.serial_number.as_deref()
    }

    fn item_name(&self) -> &str {
        &self.item_name
    }

    fn hsn_code(&self) -> Option<&str> {
        self.hsn_code.as_deref()
    }

    fn price(&self) -> &BigDecimal {
        &self.purchase_price
    }

    fn quantity(&self) -> &BigDecimal {
        &self.quantity
    }
}

impl LineItem for SaleItem {
    fn serial_number(&self) -> Option<&str> {
        self.serial_number.as_deref()
    }

    fn item_name(&self) -> &str {
        &self.item_name
    }

    fn hsn_code(&self) -> Option<&str> {
        self.hsn_code.as_deref()
    }

    fn price(&self) -> &BigDecimal {
        &self.sale_price
    }

    fn quantity(&self) -> &BigDecimal {
        &self.quantity
    }
}
