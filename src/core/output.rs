use crate::domain::model::ScoredProduct;
use crate::utils::error::{RankError, Result};
use serde_json::{Map, Value};

pub const SCORE_FIELD: &str = "Score";
pub const OVERRIDE_FIELD: &str = "Override";

/// Source columns named `Score` or `Override` are replaced by the computed
/// fields, which always come last.
fn to_json_object(scored: &ScoredProduct) -> Map<String, Value> {
    let mut object: Map<String, Value> = scored
        .product
        .columns
        .iter()
        .filter(|(k, _)| k.as_str() != SCORE_FIELD && k.as_str() != OVERRIDE_FIELD)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let score = serde_json::Number::from_f64(scored.score)
        .map(Value::Number)
        .unwrap_or(Value::Null);
    object.insert(SCORE_FIELD.to_string(), score);
    object.insert(OVERRIDE_FIELD.to_string(), Value::Bool(scored.overridden));
    object
}

/// Pretty-printed JSON array, one object per product: every source column
/// followed by `Score` and `Override`.
pub fn render_json(ranked: &[ScoredProduct]) -> Result<String> {
    let records: Vec<Value> = ranked
        .iter()
        .map(|s| Value::Object(to_json_object(s)))
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

fn csv_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// The same table as `render_json`, as CSV with the source headers plus
/// `Score` and `Override`.
pub fn render_csv(ranked: &[ScoredProduct], headers: &[String]) -> Result<String> {
    let mut columns: Vec<&str> = headers
        .iter()
        .map(String::as_str)
        .filter(|h| *h != SCORE_FIELD && *h != OVERRIDE_FIELD)
        .collect();
    columns.push(SCORE_FIELD);
    columns.push(OVERRIDE_FIELD);

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&columns)?;

    for scored in ranked {
        let object = to_json_object(scored);
        writer.write_record(columns.iter().map(|c| csv_cell(object.get(*c))))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| RankError::ProcessingError {
            message: format!("failed to finish CSV output: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| RankError::ProcessingError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}
