// crates/se_cli/src/report.rs
//
// Report model + JSON rendering.
//
// The renderer reads the computed outcome only — it never recomputes
// scores. Field names are camelCase so the report lines up with the
// store columns the snapshot came from (`stageId`, `rankingData`, ...).
// No timestamps and no RNG anywhere: identical inputs render
// byte-identical reports.

use serde::Serialize;

use se_algo::StageOutcome;
use se_io::snapshot::StageInput;

/// Per-member award line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberReport {
    pub user_email: String,
    pub display_name: String,
    pub points: f64,
}

/// Per-group result, ordered by final rank.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupReport {
    pub group_id: String,
    pub group_name: String,
    pub rank: u32,
    pub total_score: u64,
    pub vote_count: u64,
    pub average_score: f64,
    pub reward_share: f64,
    pub allocated_points: f64,
    pub per_member_points: f64,
    pub members: Vec<MemberReport>,
}

/// Audit totals (mirrors the store's settlement-history columns).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub ballot_count: u64,
    pub group_count: u64,
    pub participant_count: u64,
    pub total_allocated: f64,
}

/// Top-level settlement report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReport {
    pub stage_id: String,
    pub stage_name: String,
    pub stage_status: String,
    pub reward_pool: f64,
    /// Lowercase SHA-256 hex of the raw snapshot bytes this report was
    /// computed from.
    pub snapshot_sha256: String,
    pub results: Vec<GroupReport>,
    pub summary: SummaryReport,
}

/// Assemble the report from loaded input and the scorer's outcome.
pub fn build_report(
    input: &StageInput,
    outcome: &StageOutcome,
    snapshot_sha256: &str,
) -> SettlementReport {
    let results = outcome
        .results
        .iter()
        .map(|r| GroupReport {
            group_id: r.group_id.to_string(),
            group_name: r.group_name.clone(),
            rank: r.rank,
            total_score: r.total_score,
            vote_count: r.vote_count,
            average_score: r.average_score,
            reward_share: r.reward_share,
            allocated_points: r.allocated_points,
            per_member_points: r.per_member_points,
            members: r
                .awards
                .iter()
                .map(|a| MemberReport {
                    user_email: a.user_id.to_string(),
                    display_name: a.display_name.clone(),
                    points: a.points,
                })
                .collect(),
        })
        .collect();

    SettlementReport {
        stage_id: input.stage.stage_id.to_string(),
        stage_name: input.stage.name.clone(),
        stage_status: input.stage.status.to_string(),
        reward_pool: input.stage.reward_pool,
        snapshot_sha256: snapshot_sha256.to_string(),
        results,
        summary: SummaryReport {
            ballot_count: outcome.summary.ballot_count,
            group_count: outcome.summary.group_count,
            participant_count: outcome.summary.participant_count,
            total_allocated: outcome.summary.total_allocated,
        },
    }
}

/// Serialize the report (compact by default; `pretty` for humans).
pub fn render_json(report: &SettlementReport, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use se_algo::score_stage;
    use se_core::RewardPolicy;
    use se_io::snapshot::StageSnapshot;

    fn loaded_input() -> StageInput {
        let snap: StageSnapshot = serde_json::from_str(
            r#"{
                "stage": {"stageId": "s1", "stageName": "Round One", "status": "voting", "reportRewardPool": 100.0},
                "groups": [
                    {"groupId": "g_a", "groupName": "Alpha"},
                    {"groupId": "g_b", "groupName": "Beta"}
                ],
                "members": [
                    {"groupId": "g_a", "userEmail": "a1@x", "displayName": "A One"}
                ],
                "rankings": [
                    {"proposerEmail": "v@x", "rankingData": "{\"g_a\":1,\"g_b\":2}"}
                ]
            }"#,
        )
        .expect("snapshot parses");
        snap.into_input().expect("converts")
    }

    #[test]
    fn report_carries_rank_order_and_awards() {
        let input = loaded_input();
        let outcome = score_stage(
            input.stage.reward_pool,
            &input.groups,
            &input.memberships,
            &input.rankings,
            &RewardPolicy::default(),
        )
        .expect("scores");

        let report = build_report(&input, &outcome, "ab".repeat(32).as_str());
        assert_eq!(report.stage_id, "s1");
        assert_eq!(report.results[0].group_id, "g_a");
        assert_eq!(report.results[0].rank, 1);
        assert_eq!(report.results[0].members[0].user_email, "a1@x");
        assert_eq!(report.summary.ballot_count, 1);
    }

    #[test]
    fn rendering_is_deterministic() {
        let input = loaded_input();
        let outcome = score_stage(
            input.stage.reward_pool,
            &input.groups,
            &input.memberships,
            &input.rankings,
            &RewardPolicy::default(),
        )
        .expect("scores");
        let report = build_report(&input, &outcome, "00".repeat(32).as_str());
        let a = render_json(&report, false).expect("renders");
        let b = render_json(&report, false).expect("renders");
        assert_eq!(a, b);
        assert!(a.contains("\"snapshotSha256\""));
        assert!(a.contains("\"allocatedPoints\":40.0") || a.contains("\"allocatedPoints\":40"));
    }
}
