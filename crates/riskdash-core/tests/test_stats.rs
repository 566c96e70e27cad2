use riskdash_core::readers::parse_bytes;
use riskdash_core::stats::{statistics_from_rows, PanelValue};
use riskdash_core::{ActivityStatistics, ParserConfig, RiskLevel, StatsColumns, StatsSummary};

#[test]
fn test_summary_from_external_json() {
    let json = r#"{
        "totalActivities": 1000,
        "averageRiskScore": 85.2,
        "riskScoreDistribution": {"low": 600, "medium": 250, "high": 100, "critical": 50},
        "integrationBreakdown": {"Slack": 400, "GitHub": 300, "Drive": 150, "Jira": 100, "Zoom": 50},
        "breachCategoryBreakdown": {"Data Exfiltration": 3, "Policy Violation": 9}
    }"#;
    let stats = ActivityStatistics::from_json(json).unwrap();
    let summary = StatsSummary::from_statistics(&stats);

    assert_eq!(summary.total_activities, 1000);
    assert_eq!(summary.high_risk_count, 150);
    assert_eq!(summary.breach_count, 12);
    assert_eq!(summary.active_users, 100);
    assert_eq!(summary.risk_level, RiskLevel::Critical);
}

#[test]
fn test_summary_of_empty_payload() {
    let stats = ActivityStatistics::from_json("{}").unwrap();
    let summary = StatsSummary::from_statistics(&stats);
    assert_eq!(summary.high_risk_count, 0);
    assert_eq!(summary.breach_count, 0);
    assert_eq!(summary.active_users, 5);
    assert_eq!(summary.risk_level, RiskLevel::Low);
    assert_eq!(summary.panels()[0].value, PanelValue::Count(0));
}

#[test]
fn test_uploaded_rows_to_panels() {
    let csv = "user,integration,risk_score,breach_category,status,timestamp\n\
               alice,Slack,92,Data Exfiltration,open,2024-06-01 10:00:00\n\
               bob,GitHub,70,,closed,2024-06-01 15:00:00\n\
               carla,Slack,35,,closed,2024-06-01 20:00:00\n";
    let rows = parse_bytes(csv.as_bytes(), &ParserConfig::default()).unwrap();
    let stats = statistics_from_rows(&rows, &StatsColumns::default());
    let summary = StatsSummary::from_statistics(&stats);

    assert_eq!(summary.total_activities, 3);
    assert_eq!(summary.high_risk_count, 2);
    assert_eq!(summary.breach_count, 1);
    assert_eq!(summary.active_users, 5);
    assert_eq!(summary.risk_level, RiskLevel::High);
    assert_eq!(summary.panels()[4].value, PanelValue::Score(197.0 / 3.0));
}
