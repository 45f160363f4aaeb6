//! Dashboard endpoint — aggregate stats, skill frequencies, and recent flags.

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::pipeline::verification::Flag;
use crate::state::AppState;
use crate::store::StoreStats;

/// Static demo chart buckets carried over from the original dashboard:
/// trust-score shares for 90–100 / 70–89 / 50–69 / 0–49.
const TRUST_SCORE_DISTRIBUTION: [u32; 4] = [25, 45, 20, 10];
/// Verified / review / flagged shares.
const VERIFICATION_STATUS: [u32; 3] = [65, 25, 10];

#[derive(Debug, Serialize)]
pub struct SkillFrequency {
    pub skill: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub stats: StoreStats,
    pub trust_score_distribution: [u32; 4],
    pub verification_status: [u32; 3],
    pub skills_frequency: Vec<SkillFrequency>,
    pub recent_flags: Vec<Flag>,
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AppError> {
    let stats = state.store.stats().await;
    let records = state.store.all().await;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in &records {
        if let Some(claims) = &record.claims {
            for skill in &claims.skills {
                let skill = skill.trim();
                if !skill.is_empty() {
                    *counts.entry(skill.to_string()).or_default() += 1;
                }
            }
        }
    }

    let skills_frequency = if counts.is_empty() {
        default_skills_frequency()
    } else {
        let mut frequencies: Vec<SkillFrequency> = counts
            .into_iter()
            .map(|(skill, count)| SkillFrequency { skill, count })
            .collect();
        frequencies.sort_by(|a, b| b.count.cmp(&a.count).then(a.skill.cmp(&b.skill)));
        frequencies.truncate(10);
        frequencies
    };

    // Flags from the 5 most recent resumes, capped at 10.
    let recent_flags: Vec<Flag> = records
        .iter()
        .take(5)
        .flat_map(|r| r.flags.iter().cloned())
        .take(10)
        .collect();

    Ok(Json(DashboardResponse {
        stats,
        trust_score_distribution: TRUST_SCORE_DISTRIBUTION,
        verification_status: VERIFICATION_STATUS,
        skills_frequency,
        recent_flags,
    }))
}

/// Placeholder chart data shown before any resume has been processed.
fn default_skills_frequency() -> Vec<SkillFrequency> {
    [
        ("JavaScript", 45),
        ("Python", 38),
        ("React", 32),
        ("Node.js", 28),
        ("Java", 25),
    ]
    .into_iter()
    .map(|(skill, count)| SkillFrequency {
        skill: skill.to_string(),
        count,
    })
    .collect()
}
