use super::record::{ingest_purchases, ingest_sales, RawItemRecord, RawValue};
use crate::error::IngestError;
use crate::models::{BillPair, PurchaseItem, SaleItem};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// JSON 明细文件: 直接是数组，或者抽取服务返回的 {"items": [...]}
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordFile {
    List(Vec<RawItemRecord>),
    Wrapped { items: Vec<RawItemRecord> },
}

/// CSV 行: 单元格一律按文本读取，编码的前导零 ("00123", "0402") 原样保留。
/// item_name 列必须存在，单元格为空时按空名称处理。
#[derive(Debug, Deserialize)]
struct CsvItemRow {
    #[serde(default)]
    serial_number: Option<String>,
    item_name: String,
    #[serde(default)]
    hsn_code: Option<String>,
    #[serde(default, alias = "purchase_price", alias = "sale_price")]
    price: Option<String>,
    #[serde(default)]
    quantity: Option<String>,
}

impl From<CsvItemRow> for RawItemRecord {
    fn from(row: CsvItemRow) -> Self {
        RawItemRecord {
            serial_number: row.serial_number,
            item_name: Some(row.item_name),
            hsn_code: row.hsn_code,
            price: row.price.map(RawValue::Text),
            quantity: row.quantity.map(RawValue::Text),
        }
    }
}

/// 批量清单中的一项 (路径相对于清单文件所在目录)
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    pub bill_id: String,
    pub purchases: PathBuf,
    pub sales: PathBuf,
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

/// 读取原始明细记录 (.json / .csv)
pub fn load_records(path: &Path) -> Result<Vec<RawItemRecord>, IngestError> {
    match extension(path).as_str() {
        "json" => {
            let reader = BufReader::new(File::open(path)?);
            let file: RecordFile = serde_json::from_reader(reader)?;
            Ok(match file {
                RecordFile::List(records) => records,
                RecordFile::Wrapped { items } => items,
            })
        }
        "csv" => {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_path(path)?;
            let rows = reader
                .deserialize()
                .collect::<Result<Vec<CsvItemRow>, csv::Error>>()?;
            Ok(rows.into_iter().map(RawItemRecord::from).collect())
        }
        _ => Err(IngestError::UnsupportedFormat(path.display().to_string())),
    }
}

pub fn load_purchases(path: &Path) -> Result<Vec<PurchaseItem>, IngestError> {
    let records = load_records(path)?;
    tracing::debug!("读取采购明细 {} 条: {}", records.len(), path.display());
    ingest_purchases(&records)
}

pub fn load_sales(path: &Path) -> Result<Vec<SaleItem>, IngestError> {
    let records = load_records(path)?;
    tracing::debug!("读取销售明细 {} 条: {}", records.len(), path.display());
    ingest_sales(&records)
}

/// 读取批量清单并加载每组单据
pub fn load_manifest(path: &Path) -> Result<Vec<BillPair>, IngestError> {
    let reader = BufReader::new(File::open(path)?);
    let entries: Vec<ManifestEntry> = serde_json::from_reader(reader)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    entries
        .into_iter()
        .map(|entry| -> Result<BillPair, IngestError> {
            Ok(BillPair {
                purchases: load_purchases(&base.join(&entry.purchases))?,
                sales: load_sales(&base.join(&entry.sales))?,
                bill_id: entry.bill_id,
            })
        })
        .collect()
}
