use crate::domain::model::{BrandTier, ProductRecord};
use crate::domain::ports::ColumnNames;
use crate::utils::error::{RankError, Result};
use std::collections::HashSet;

/// A parsed catalog: the source header row and one record per data row.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub headers: Vec<String>,
    pub products: Vec<ProductRecord>,
}

/// Parses a CSV catalog into product records.
///
/// Every column is kept in `ProductRecord::columns`; the ones named in
/// `columns` must be present and well-formed, otherwise the whole catalog is
/// rejected.
pub fn parse_catalog(path: &str, bytes: &[u8], columns: &ColumnNames) -> Result<Catalog> {
    let source_error = |message: String| RankError::DataSourceError {
        path: path.to_string(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| source_error(e.to_string()))?
        .clone();

    let mut header_names = HashSet::new();
    if let Some(duplicate) = headers.iter().find(|h| !header_names.insert(*h)) {
        return Err(source_error(format!("duplicate column '{}'", duplicate)));
    }

    let index_of = |column: &str| {
        headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| source_error(format!("missing required column '{}'", column)))
    };
    let idx = ColumnIndex {
        name: index_of(columns.name.as_str())?,
        units_in_stock: index_of(columns.units_in_stock.as_str())?,
        volume_sold: index_of(columns.volume_sold.as_str())?,
        views: index_of(columns.views.as_str())?,
        brand_tier: index_of(columns.brand_tier.as_str())?,
        price: index_of(columns.price.as_str())?,
        cost: index_of(columns.cost.as_str())?,
    };

    let mut products = Vec::new();
    let mut seen = HashSet::new();

    for (i, row) in reader.records().enumerate() {
        let row = row.map_err(|e| source_error(e.to_string()))?;
        let line = row
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(i + 2);
        let cell = |index: usize| row.get(index).unwrap_or("").trim();

        let name = cell(idx.name);
        if name.is_empty() {
            return Err(RankError::InvalidRecordError {
                row: line,
                field: columns.name.clone(),
                reason: "product name is empty".to_string(),
            });
        }
        if !seen.insert(name.to_string()) {
            tracing::warn!("Duplicate product name '{}' at row {}", name, line);
        }

        let product = ProductRecord {
            name: name.to_string(),
            units_in_stock: parse_count(line, &columns.units_in_stock, cell(idx.units_in_stock))?,
            volume_sold: parse_count(line, &columns.volume_sold, cell(idx.volume_sold))?,
            views: parse_count(line, &columns.views, cell(idx.views))?,
            brand_tier: BrandTier::parse(cell(idx.brand_tier)),
            price: parse_amount(line, &columns.price, cell(idx.price))?,
            cost: parse_amount(line, &columns.cost, cell(idx.cost))?,
            columns: headers
                .iter()
                .zip(row.iter())
                .map(|(h, v)| (h.to_string(), infer_value(v)))
                .collect(),
        };
        products.push(product);
    }

    tracing::debug!("Parsed {} products from {}", products.len(), path);
    Ok(Catalog {
        headers: headers.iter().map(str::to_string).collect(),
        products,
    })
}

struct ColumnIndex {
    name: usize,
    units_in_stock: usize,
    volume_sold: usize,
    views: usize,
    brand_tier: usize,
    price: usize,
    cost: usize,
}

fn invalid(row: usize, field: &str, reason: String) -> RankError {
    RankError::InvalidRecordError {
        row,
        field: field.to_string(),
        reason,
    }
}

/// Non-negative whole number. Accepts `12.0` as written by spreadsheet exports.
fn parse_count(row: usize, field: &str, raw: &str) -> Result<u64> {
    if raw.is_empty() {
        return Err(invalid(row, field, "value is missing".to_string()));
    }
    if let Ok(n) = raw.parse::<u64>() {
        return Ok(n);
    }
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64 => {
            Ok(n as u64)
        }
        Ok(n) if n < 0.0 => Err(invalid(row, field, format!("'{}' is negative", raw))),
        _ => Err(invalid(row, field, format!("'{}' is not a whole number", raw))),
    }
}

/// Non-negative, finite currency amount.
fn parse_amount(row: usize, field: &str, raw: &str) -> Result<f64> {
    if raw.is_empty() {
        return Err(invalid(row, field, "value is missing".to_string()));
    }
    match raw.parse::<f64>() {
        Ok(n) if !n.is_finite() => Err(invalid(row, field, format!("'{}' is not finite", raw))),
        Ok(n) if n < 0.0 => Err(invalid(row, field, format!("'{}' is negative", raw))),
        Ok(n) => Ok(n),
        Err(_) => Err(invalid(row, field, format!("'{}' is not a number", raw))),
    }
}

fn infer_value(raw: &str) -> serde_json::Value {
    let raw = raw.trim();
    if raw.is_empty() {
        return serde_json::Value::Null;
    }
    if let Ok(n) = raw.parse::<i64>() {
        return serde_json::Value::from(n);
    }
    if let Some(n) = raw
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
    {
        return serde_json::Value::Number(n);
    }
    serde_json::Value::String(raw.to_string())
}
