use anyhow::Result;
use carousel_ranker::{LocalStorage, RankError, RankerConfig, RankingEngine, RankingPipeline};
use std::path::Path;
use tempfile::TempDir;

const CATALOG: &str = "\
Product ID,Product Name,Category,Units in Stock,Volume Sold Last Month,Views Last Month,Brand Tier,Price (USD),COGS (USD)
P001,Vitamin C Serum,Serum,40,100,50,A,30.00,10.00
P002,Clay Mask,Mask,5,3,400,B,25.00,10.00
P003,Night Cream,Moisturizer,20,0,900,A,60.00,20.00
P004,Budget Toner,Toner,15,2,10,C,8.00,6.00
P005,Gel Cleanser,Cleanser,30,20,100,B,18.00,8.00
P006,Sheet Mask,Mask,50,20,100,B,18.00,8.00
P007,Lip Oil,Lip,12,45,300,Indie,14.00,15.00
";

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn engine_for(dir: &TempDir, config: RankerConfig) -> RankingEngine<RankingPipeline<LocalStorage, RankerConfig>> {
    let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());
    RankingEngine::new(RankingPipeline::new(storage, config))
}

fn read_output(dir: &TempDir) -> Vec<serde_json::Value> {
    let json = std::fs::read_to_string(dir.path().join("output.json")).unwrap();
    serde_json::from_str(&json).unwrap()
}

fn names(records: &[serde_json::Value]) -> Vec<&str> {
    records
        .iter()
        .map(|r| r["Product Name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_end_to_end_ranking() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write(temp_dir.path(), "Mock_Skincare_Dataset.csv", CATALOG);

    let summary = engine_for(&temp_dir, RankerConfig::default()).run().await?;
    assert_eq!(summary.ranked_count, 5);
    assert_eq!(summary.json_path, "output.json");
    assert_eq!(summary.csv_path.as_deref(), Some("output.csv"));

    let records = read_output(&temp_dir);
    // Lip Oil: 90 + 60 + 0 (unknown tier) + 0 (negative margin) = 150
    assert_eq!(
        names(&records),
        vec!["Vitamin C Serum", "Lip Oil", "Gel Cleanser", "Sheet Mask", "Budget Toner"]
    );
    assert_eq!(records[0]["Score"], 270.0);
    assert_eq!(records[0]["Override"], false);
    assert_eq!(records[0]["Product ID"], "P001");
    assert_eq!(records[0]["Category"], "Serum");

    let csv = std::fs::read_to_string(temp_dir.path().join("output.csv"))?;
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Product ID,Product Name,Category,Units in Stock,Volume Sold Last Month,Views Last Month,Brand Tier,Price (USD),COGS (USD),Score,Override")
    );
    assert!(lines.next().unwrap().starts_with("P001,Vitamin C Serum,"));
    assert_eq!(csv.lines().count(), 6);

    Ok(())
}

#[tokio::test]
async fn test_tied_scores_break_on_volume_then_input_order() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let catalog = "\
Product Name,Units in Stock,Volume Sold Last Month,Views Last Month,Brand Tier,Price (USD),COGS (USD)
Low Volume,20,10,200,B,10,0
High Volume,20,20,100,B,10,0
First Twin,20,15,150,B,10,0
Second Twin,20,15,150,B,10,0
";
    write(temp_dir.path(), "Mock_Skincare_Dataset.csv", catalog);

    engine_for(&temp_dir, RankerConfig::default()).run().await?;

    let records = read_output(&temp_dir);
    assert_eq!(
        names(&records),
        vec!["High Volume", "First Twin", "Second Twin", "Low Volume"]
    );
    Ok(())
}

#[tokio::test]
async fn test_override_outranks_every_organic_product() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write(temp_dir.path(), "Mock_Skincare_Dataset.csv", CATALOG);
    write(
        temp_dir.path(),
        "overrides.json",
        r#"{"manual_priority": ["Budget Toner", "Sheet Mask", "Discontinued Balm"]}"#,
    );

    engine_for(&temp_dir, RankerConfig::default()).run().await?;

    let records = read_output(&temp_dir);
    assert_eq!(
        names(&records),
        vec!["Sheet Mask", "Budget Toner", "Vitamin C Serum", "Lip Oil", "Gel Cleanser"]
    );
    assert_eq!(records[0]["Score"], 370.0);
    assert_eq!(records[1]["Score"], 370.0);
    assert_eq!(records[0]["Override"], true);
    assert_eq!(records[2]["Override"], false);
    Ok(())
}

#[tokio::test]
async fn test_missing_override_file_matches_empty_list() -> Result<()> {
    let without_file = TempDir::new()?;
    write(without_file.path(), "Mock_Skincare_Dataset.csv", CATALOG);
    engine_for(&without_file, RankerConfig::default()).run().await?;

    let with_empty_list = TempDir::new()?;
    write(with_empty_list.path(), "Mock_Skincare_Dataset.csv", CATALOG);
    write(with_empty_list.path(), "overrides.json", r#"{"manual_priority": []}"#);
    engine_for(&with_empty_list, RankerConfig::default()).run().await?;

    let a = std::fs::read(without_file.path().join("output.json"))?;
    let b = std::fs::read(with_empty_list.path().join("output.json"))?;
    assert_eq!(a, b);
    Ok(())
}

#[tokio::test]
async fn test_fewer_eligible_than_top_n() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let catalog = "\
Product Name,Units in Stock,Volume Sold Last Month,Views Last Month,Brand Tier,Price (USD),COGS (USD)
Serum,20,3,10,A,10,5
Toner,20,9,10,B,10,5
Mask,20,6,10,C,10,5
Out Of Stock,2,90,10,A,10,5
";
    write(temp_dir.path(), "Mock_Skincare_Dataset.csv", catalog);

    let summary = engine_for(&temp_dir, RankerConfig::default()).run().await?;
    assert_eq!(summary.ranked_count, 3);
    assert_eq!(names(&read_output(&temp_dir)), vec!["Serum", "Toner", "Mask"]);
    Ok(())
}

#[tokio::test]
async fn test_top_n_and_custom_paths() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write(temp_dir.path(), "catalog.csv", CATALOG);

    let mut config = RankerConfig::default();
    config.input.data_file = "catalog.csv".to_string();
    config.output.json_file = "out/top.json".to_string();
    config.output.write_csv = false;
    config.ranking.top_n = 2;

    let summary = engine_for(&temp_dir, config).run().await?;
    assert_eq!(summary.ranked_count, 2);
    assert!(summary.csv_path.is_none());
    assert!(temp_dir.path().join("out/top.json").exists());
    assert!(!temp_dir.path().join("output.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_outputs_are_replaced_not_appended() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write(temp_dir.path(), "Mock_Skincare_Dataset.csv", CATALOG);
    write(temp_dir.path(), "output.json", "stale content that is much longer than nothing");

    engine_for(&temp_dir, RankerConfig::default()).run().await?;
    engine_for(&temp_dir, RankerConfig::default()).run().await?;

    assert_eq!(read_output(&temp_dir).len(), 5);
    let csv = std::fs::read_to_string(temp_dir.path().join("output.csv"))?;
    assert_eq!(csv.lines().count(), 6);
    Ok(())
}

#[tokio::test]
async fn test_failed_csv_write_keeps_previous_json() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write(temp_dir.path(), "Mock_Skincare_Dataset.csv", CATALOG);
    write(temp_dir.path(), "output.json", "OLD");
    std::fs::create_dir(temp_dir.path().join("output.csv"))?;
    write(temp_dir.path(), "output.csv/keep.txt", "occupied");

    let result = engine_for(&temp_dir, RankerConfig::default()).run().await;
    assert!(result.is_err());

    assert_eq!(std::fs::read_to_string(temp_dir.path().join("output.json"))?, "OLD");
    assert!(!temp_dir.path().join("output.json.tmp").exists());
    assert!(!temp_dir.path().join("output.csv.tmp").exists());
    Ok(())
}

#[tokio::test]
async fn test_bad_record_writes_no_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let catalog = "\
Product Name,Units in Stock,Volume Sold Last Month,Views Last Month,Brand Tier,Price (USD),COGS (USD)
Serum,20,3,10,A,10,5
Toner,20,lots,10,B,10,5
";
    write(temp_dir.path(), "Mock_Skincare_Dataset.csv", catalog);

    let err = engine_for(&temp_dir, RankerConfig::default())
        .run()
        .await
        .unwrap_err();
    match err {
        RankError::InvalidRecordError { row, field, .. } => {
            assert_eq!(row, 3);
            assert_eq!(field, "Volume Sold Last Month");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!temp_dir.path().join("output.json").exists());
    assert!(!temp_dir.path().join("output.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_missing_catalog_is_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let err = engine_for(&temp_dir, RankerConfig::default())
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, RankError::DataSourceError { .. }));
    assert!(err.to_string().contains("Mock_Skincare_Dataset.csv"));
    assert!(!temp_dir.path().join("output.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_corrupt_override_file_is_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write(temp_dir.path(), "Mock_Skincare_Dataset.csv", CATALOG);
    write(temp_dir.path(), "overrides.json", "{\"manual_priority\": ");

    let err = engine_for(&temp_dir, RankerConfig::default())
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, RankError::OverrideSourceError { .. }));
    assert!(!temp_dir.path().join("output.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_preview_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write(temp_dir.path(), "Mock_Skincare_Dataset.csv", CATALOG);

    let result = engine_for(&temp_dir, RankerConfig::default()).preview().await?;
    assert_eq!(result.ranked.len(), 5);
    assert_eq!(result.eligible_count, 5);
    assert!(!temp_dir.path().join("output.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_toml_config_drives_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write(temp_dir.path(), "catalog.csv", CATALOG);

    let config = RankerConfig::from_toml_str(
        r#"
[input]
data_file = "catalog.csv"

[ranking]
top_n = 3
min_units_in_stock = 1

[scoring]
tier_c = 0.0
"#,
    )?;

    engine_for(&temp_dir, config).run().await?;

    // Clay Mask (stock 5) is now eligible: 6 + 80 + 15 + 15 = 116
    let records = read_output(&temp_dir);
    assert_eq!(names(&records), vec!["Vitamin C Serum", "Lip Oil", "Clay Mask"]);
    Ok(())
}
