use super::*;
use crate::model::fund::FundRankingRow;
use crate::model::subscores::NormalizedSubScores;

fn category_scores(c: f64, p: f64, r: f64, v: f64, q: f64) -> NormalizedSubScores {
    let mut ns = NormalizedSubScores::default();
    ns.consistency.alpha_3y = Some(c);
    ns.consistency.alpha_5y = Some(c);
    ns.consistency.confidence = Some(c);
    ns.consistency.alpha_iqr_3y = Some(c);
    ns.consistency.alpha_iqr_5y = Some(c);
    ns.returns.cagr_1y = Some(p);
    ns.returns.cagr_3y = Some(p);
    ns.returns.cagr_5y = Some(p);
    ns.returns.return_3m = Some(p);
    ns.returns.return_6m = Some(p);
    ns.risk.volatility = Some(r);
    ns.risk.max_dd = Some(r);
    ns.risk.up_beta = Some(r);
    ns.risk.down_beta = Some(r);
    ns.risk_adjusted.sharpe = Some(r);
    ns.risk_adjusted.sortino = Some(r);
    ns.risk_adjusted.ir = Some(r);
    ns.valuation.pe = Some(v);
    ns.valuation.pb = Some(v);
    ns.valuation.roe = Some(v);
    ns.portfolio_quality.stock_count = Some(q);
    ns.portfolio_quality.aum = Some(q);
    ns.portfolio_quality.top10 = Some(q);
    ns.portfolio_quality.sector_hhi = Some(q);
    ns.portfolio_quality.top3_sector = Some(q);
    ns.portfolio_quality.turnover = Some(q);
    ns.portfolio_quality.ter = Some(q);
    ns.portfolio_quality.manager_experience = Some(q);
    ns
}

fn fund(code: &str, name: &str, amc: &str, ns: NormalizedSubScores) -> FundRankingRow {
    FundRankingRow {
        scheme_code: code.to_string(),
        fund_key: code.to_lowercase(),
        scheme_name: name.to_string(),
        amc: amc.to_string(),
        normalized_scores: ns,
        actual_values: Default::default(),
        meta: Default::default(),
    }
}

fn flat(code: &str, amc: &str, score: f64) -> FundRankingRow {
    let s = score;
    fund(code, &format!("{code} Fund"), amc, category_scores(s, s, s, s, s))
}

fn unscored(code: &str, amc: &str) -> FundRankingRow {
    fund(
        code,
        &format!("{code} Fund"),
        amc,
        NormalizedSubScores::default(),
    )
}

fn codes(ranked: &[RankedFund<'_>]) -> Vec<String> {
    ranked.iter().map(|f| f.row.scheme_code.clone()).collect()
}

fn rank_of(ranked: &[RankedFund<'_>], code: &str) -> usize {
    ranked
        .iter()
        .find(|f| f.row.scheme_code == code)
        .map(|f| f.score_rank)
        .unwrap()
}

fn run<'a>(rows: &'a [FundRankingRow], query: &RankQuery) -> Vec<RankedFund<'a>> {
    rank_funds(rows, &WeightPreset::BALANCED, &Aggregator::default(), query)
}

#[test]
fn test_default_query_orders_by_score_desc() {
    let rows = vec![flat("A", "Alpha", 40.0), flat("B", "Beta", 80.0), flat("C", "Alpha", 60.0)];
    let ranked = run(&rows, &RankQuery::default());
    assert_eq!(codes(&ranked), vec!["B", "C", "A"]);
    assert_eq!(
        ranked.iter().map(|f| f.score_rank).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(ranked[0].overall_score, Some(80.0));
}

#[test]
fn test_search_matches_name_or_amc_case_insensitively() {
    let mut rows = vec![flat("A", "Alpha", 40.0), flat("B", "Beta", 80.0), flat("C", "Gamma", 60.0)];
    rows[2].scheme_name = "Bluechip Opportunities".to_string();

    let by_amc = run(
        &rows,
        &RankQuery {
            search: "ALP".to_string(),
            ..Default::default()
        },
    );
    assert_eq!(codes(&by_amc), vec!["A"]);

    let by_name = run(
        &rows,
        &RankQuery {
            search: "blue".to_string(),
            ..Default::default()
        },
    );
    assert_eq!(codes(&by_name), vec!["C"]);

    let blank = run(
        &rows,
        &RankQuery {
            search: "   ".to_string(),
            ..Default::default()
        },
    );
    assert_eq!(blank.len(), 3);
}

#[test]
fn test_amc_filter_is_exact() {
    let rows = vec![flat("A", "Alpha", 40.0), flat("B", "Alpha Two", 80.0)];
    let ranked = run(
        &rows,
        &RankQuery {
            amc: AmcFilter::from_arg(Some("Alpha")),
            ..Default::default()
        },
    );
    assert_eq!(codes(&ranked), vec!["A"]);
    assert_eq!(ranked[0].score_rank, 1);
    assert_eq!(AmcFilter::from_arg(Some("all")), AmcFilter::All);
}

#[test]
fn test_score_rank_treats_missing_score_as_zero() {
    let rows = vec![unscored("N", "X"), flat("Z", "X", 10.0), flat("H", "X", 80.0)];
    let ranked = run(&rows, &RankQuery::default());
    assert_eq!(rank_of(&ranked, "H"), 1);
    assert_eq!(rank_of(&ranked, "Z"), 2);
    assert_eq!(rank_of(&ranked, "N"), 3);
}

#[test]
fn test_display_sort_sinks_missing_scores_in_both_directions() {
    let rows = vec![unscored("N", "X"), flat("Z", "X", 10.0), flat("H", "X", 80.0)];
    let asc = run(
        &rows,
        &RankQuery {
            sort: SortState::new(SortField::OverallScore, SortDirection::Asc),
            ..Default::default()
        },
    );
    assert_eq!(codes(&asc), vec!["Z", "H", "N"]);
    // score ranks do not follow the display order
    assert_eq!(rank_of(&asc, "H"), 1);

    let desc = run(&rows, &RankQuery::default());
    assert_eq!(codes(&desc), vec!["H", "Z", "N"]);
}

#[test]
fn test_actual_value_sort_nulls_last() {
    let mut rows = vec![flat("A", "X", 50.0), flat("B", "X", 60.0), flat("C", "X", 70.0)];
    rows[0].actual_values.risk_adjusted.sharpe = Some(1.2);
    rows[1].actual_values.risk_adjusted.sharpe = None;
    rows[2].actual_values.risk_adjusted.sharpe = Some(0.4);

    for direction in [SortDirection::Asc, SortDirection::Desc] {
        let ranked = run(
            &rows,
            &RankQuery {
                sort: SortState::new(SortField::Sharpe, direction),
                ..Default::default()
            },
        );
        assert_eq!(ranked.last().unwrap().row.scheme_code, "B");
    }

    let asc = run(
        &rows,
        &RankQuery {
            sort: SortState::new(SortField::Sharpe, SortDirection::Asc),
            ..Default::default()
        },
    );
    assert_eq!(codes(&asc), vec!["C", "A", "B"]);
    assert_eq!(rank_of(&asc, "C"), 1);
    assert_eq!(rank_of(&asc, "B"), 2);
}

#[test]
fn test_nan_sort_value_behaves_like_missing() {
    let mut rows = vec![flat("A", "X", 50.0), flat("B", "X", 60.0)];
    rows[0].actual_values.portfolio_quality.aum = Some(f64::NAN);
    rows[1].actual_values.portfolio_quality.aum = Some(1200.0);
    let ranked = run(
        &rows,
        &RankQuery {
            sort: SortState::new(SortField::Aum, SortDirection::Asc),
            ..Default::default()
        },
    );
    assert_eq!(codes(&ranked), vec!["B", "A"]);
}

#[test]
fn test_equal_scores_break_ties_on_cagr_3y() {
    // Recent performance and risk carry the same balanced weight, so both overall at 56.0.
    let rows = vec![
        fund("B", "B Fund", "X", category_scores(50.0, 60.0, 70.0, 50.0, 50.0)),
        fund("A", "A Fund", "X", category_scores(50.0, 70.0, 60.0, 50.0, 50.0)),
    ];
    let ranked = run(&rows, &RankQuery::default());
    assert_eq!(ranked[0].overall_score, ranked[1].overall_score);
    assert_eq!(codes(&ranked), vec!["A", "B"]);
    assert_eq!(rank_of(&ranked, "A"), 1);
}

#[test]
fn test_score_rank_is_consistent_with_overall_then_cagr() {
    let rows = vec![
        flat("A", "X", 44.0),
        fund("B", "B Fund", "X", category_scores(50.0, 60.0, 70.0, 50.0, 50.0)),
        unscored("N", "X"),
        fund("C", "C Fund", "X", category_scores(50.0, 70.0, 60.0, 50.0, 50.0)),
        flat("D", "X", 91.0),
    ];
    let ranked = run(
        &rows,
        &RankQuery {
            sort: SortState::new(SortField::Aum, SortDirection::Desc),
            ..Default::default()
        },
    );
    let mut scored: Vec<&RankedFund<'_>> =
        ranked.iter().filter(|f| f.overall_score.is_some()).collect();
    scored.sort_by(|a, b| compare_overall_then_cagr(a, b));
    let ranks: Vec<usize> = scored.iter().map(|f| f.score_rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);

    // Every aum is missing, so the display sort is all ties and keeps score-rank order.
    assert_eq!(codes(&ranked), vec!["D", "C", "B", "A", "N"]);
    assert_eq!(
        ranked.iter().map(|f| f.score_rank).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );
}

#[test]
fn test_weights_change_reorders() {
    let rows = vec![
        fund("X", "X Fund", "M", category_scores(90.0, 50.0, 50.0, 50.0, 50.0)),
        fund("Y", "Y Fund", "M", category_scores(50.0, 90.0, 50.0, 50.0, 50.0)),
    ];
    let agg = Aggregator::default();
    let balanced = rank_funds(&rows, &WeightPreset::BALANCED, &agg, &RankQuery::default());
    assert_eq!(codes(&balanced), vec!["X", "Y"]);
    let aggressive = rank_funds(&rows, &WeightPreset::AGGRESSIVE, &agg, &RankQuery::default());
    assert_eq!(codes(&aggressive), vec!["Y", "X"]);
    assert_eq!(aggressive[0].overall_score, Some(64.0));
}

#[test]
fn test_order_snapshot_puts_unscored_last() {
    let rows = vec![
        unscored("N", "X"),
        fund("B", "B Fund", "X", category_scores(50.0, 60.0, 70.0, 50.0, 50.0)),
        fund("A", "A Fund", "X", category_scores(50.0, 70.0, 60.0, 50.0, 50.0)),
        flat("Z", "X", 0.0),
    ];
    let ordered = order_snapshot(&rows, &WeightPreset::BALANCED, &Aggregator::default());
    assert_eq!(codes(&ordered), vec!["A", "B", "Z", "N"]);
    assert_eq!(ordered[3].score_rank, 4);
}

#[test]
fn test_sort_toggle() {
    let state = SortState::default();
    assert_eq!(state.field, SortField::OverallScore);
    assert_eq!(state.direction, SortDirection::Desc);

    let flipped = state.toggle(SortField::OverallScore);
    assert_eq!(flipped.direction, SortDirection::Asc);

    let other = flipped.toggle(SortField::Ter);
    assert_eq!(other, SortState::new(SortField::Ter, SortDirection::Desc));
}

#[test]
fn test_sort_field_names() {
    assert_eq!(SortField::from_str("cagr_3y", false).unwrap(), SortField::Cagr3y);
    assert_eq!(SortField::from_str("up_beta", false).unwrap(), SortField::UpBeta);
    let json = serde_json::to_string(&SortField::Rolling5y).unwrap();
    assert_eq!(json, "\"rolling_5y\"");
    for field in SortField::value_variants() {
        let name = field.to_possible_value().unwrap();
        assert_eq!(name.get_name(), field.key());
    }
}

#[test]
fn test_unique_amcs_sorted_and_deduplicated() {
    let rows = vec![flat("A", "Zeta", 1.0), flat("B", "Alpha", 1.0), flat("C", "Zeta", 1.0)];
    assert_eq!(unique_amcs(&rows), vec!["Alpha".to_string(), "Zeta".to_string()]);
}

#[test]
fn test_serialized_row_carries_score_rank() {
    let rows = vec![flat("A", "X", 40.0)];
    let ranked = run(&rows, &RankQuery::default());
    let value = serde_json::to_value(&ranked[0]).unwrap();
    assert_eq!(value["scheme_code"], "A");
    assert_eq!(value["scoreRank"], 1);
    assert_eq!(value["overall_score"], 40.0);
}
