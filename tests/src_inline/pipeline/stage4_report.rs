use std::fs;
use std::path::PathBuf;

use super::*;
use crate::model::fund::FundRankingRow;
use crate::model::weights::{Category, MainScores, WeightPreset};
use crate::pipeline::stage2_aggregate::Aggregator;
use crate::pipeline::stage3_rank::{RankQuery, rank_funds};

fn out_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("fundscore_report_{}", std::process::id()))
        .join(name)
}

fn rows() -> Vec<FundRankingRow> {
    let mut a: FundRankingRow =
        serde_json::from_str(r#"{"scheme_code": "101", "scheme_name": "Alpha Fund", "amc": "Acme"}"#)
            .unwrap();
    a.actual_values.returns.cagr_3y = Some(14.25);
    let b: FundRankingRow =
        serde_json::from_str(r#"{"scheme_code": "102", "scheme_name": "Beta Fund", "amc": "Bolt"}"#)
            .unwrap();
    vec![a, b]
}

fn context(weights: WeightPreset, total: usize) -> ReportContext {
    ReportContext {
        tool_name: "fundscore".to_string(),
        tool_version: "test".to_string(),
        category: Some("Large Cap".to_string()),
        preset: "custom".to_string(),
        weights,
        total_weight: weights.total(),
        weights_valid: weights.is_valid(),
        search: String::new(),
        amc: "all".to_string(),
        sort_field: "overall_score".to_string(),
        sort_direction: "desc".to_string(),
        n_funds_total: total,
    }
}

#[test]
fn test_json_report_round_trips_through_serde() {
    let rows = rows();
    let view = rank_funds(
        &rows,
        &WeightPreset::BALANCED,
        &Aggregator::default(),
        &RankQuery::default(),
    );
    let path = out_path("rankings.json");
    write_rankings(
        &context(WeightPreset::BALANCED, rows.len()),
        &view,
        ReportFormat::Json,
        Some(&path),
    )
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["category"], "Large Cap");
    assert_eq!(value["summary"]["n_shown"], 2);
    assert_eq!(value["summary"]["n_scored"], 0);
    assert!(value["summary"]["median"].is_null());
    assert_eq!(value["funds"][0]["scheme_code"], "101");
    assert!(value["funds"][0]["overall_score"].is_null());
    assert_eq!(value["funds"][1]["scoreRank"], 2);
}

#[test]
fn test_tsv_report_marks_missing_values() {
    let rows = rows();
    let view = rank_funds(
        &rows,
        &WeightPreset::BALANCED,
        &Aggregator::default(),
        &RankQuery::default(),
    );
    let path = out_path("rankings.tsv");
    write_rankings(
        &context(WeightPreset::BALANCED, rows.len()),
        &view,
        ReportFormat::Tsv,
        Some(&path),
    )
    .unwrap();

    let body = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("score_rank\tscheme_code"));
    let first: Vec<&str> = lines[1].split('\t').collect();
    assert_eq!(first[1], "101");
    assert_eq!(first[5], "NA");
    assert_eq!(first[6], "14.25");
}

#[test]
fn test_tsv_report_keeps_columns_for_names_with_tabs() {
    let mut rows = rows();
    rows[0].scheme_name = "Alpha\tFund\nDirect".to_string();
    rows[0].amc = "Acme\tAMC".to_string();
    let view = rank_funds(
        &rows,
        &WeightPreset::BALANCED,
        &Aggregator::default(),
        &RankQuery::default(),
    );
    let path = out_path("rankings_tabs.tsv");
    write_rankings(
        &context(WeightPreset::BALANCED, rows.len()),
        &view,
        ReportFormat::Tsv,
        Some(&path),
    )
    .unwrap();

    let body = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3);
    let header_cols = lines[0].split('\t').count();
    let first: Vec<&str> = lines[1].split('\t').collect();
    assert_eq!(first.len(), header_cols);
    assert_eq!(first[3], "Alpha Fund Direct");
    assert_eq!(first[4], "Acme AMC");
    assert_eq!(first[6], "14.25");
}

#[test]
fn test_text_report_flags_invalid_weights_and_empty_view() {
    let weights = WeightPreset {
        consistency: 30.0,
        ..WeightPreset::BALANCED
    };
    let path = out_path("empty.txt");
    write_rankings(&context(weights, 5), &[], ReportFormat::Text, Some(&path)).unwrap();

    let body = fs::read_to_string(&path).unwrap();
    assert!(body.starts_with("Large Cap Fund Rankings"));
    assert!(body.contains("weights sum to 105"));
    assert!(body.contains("0 of 5 funds ranked"));
    assert!(body.contains("No funds match the current filters."));
}

#[test]
fn test_breakdown_tsv_lists_each_category() {
    let breakdowns = vec![FundBreakdown {
        scheme_code: "101".to_string(),
        scheme_name: "Alpha Fund".to_string(),
        amc: "Acme".to_string(),
        main_scores: MainScores {
            consistency: Some(80.0),
            risk: Some(70.0),
            ..Default::default()
        },
        overall_score: None,
    }];
    let path = out_path("breakdown.tsv");
    write_breakdowns("balanced", &breakdowns, ReportFormat::Tsv, Some(&path)).unwrap();

    let body = fs::read_to_string(&path).unwrap();
    let header: Vec<&str> = body.lines().next().unwrap().split('\t').collect();
    for c in Category::ALL {
        assert!(header.contains(&c.key()));
    }
    let row: Vec<&str> = body.lines().nth(1).unwrap().split('\t').collect();
    assert_eq!(row[2], "80.0000");
    assert_eq!(row[3], "NA");
    assert_eq!(row[7], "NA");
}

#[test]
fn test_weight_steps_json_includes_lock_state() {
    let start = WeightEditor::default();
    let edited = start.slide(Category::Valuation, 25.0);
    let steps = vec![
        ("start".to_string(), start),
        ("valuation=25".to_string(), edited),
    ];
    let path = out_path("steps.json");
    write_weight_steps(&steps, ReportFormat::Json, Some(&path)).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value[0]["step"], "start");
    assert_eq!(value[0]["locked"].as_array().unwrap().len(), 0);
    assert_eq!(value[1]["locked"][0], "valuation");
    assert_eq!(value[1]["active"], "custom");
    assert_eq!(value[1]["valid"], true);
    assert_eq!(value[1]["weights"]["valuation"], 25.0);
}
