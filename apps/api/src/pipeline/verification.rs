//! Simulated claim verification — assigns each extracted claim a status
//! against the static reference tables, aggregates a trust score, and
//! derives flags.
//!
//! Outcomes for unmatched claims are randomized on purpose: this mirrors a
//! demo placeholder for real verification back-ends and is unsuitable for
//! production trust decisions. The documented probabilities are preserved
//! exactly. The random source is injectable per call so tests can pin a
//! seed; `verify` is a thin wrapper over the process-global thread RNG.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::pipeline::claims::{CertificationClaim, ClaimSet, EducationClaim, ExperienceClaim};
use crate::pipeline::reference::ReferenceData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    NeedsReview,
    Unverified,
    Flagged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A structured warning attached to a resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flag {
    #[serde(rename = "type")]
    pub flag_type: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedSkill {
    pub skill: String,
    pub status: VerificationStatus,
    pub evidence: BTreeMap<String, u32>,
    pub confidence: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedExperience {
    pub company: String,
    pub position: String,
    pub years: i32,
    pub status: VerificationStatus,
    pub confidence: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedEducation {
    pub degree: String,
    pub institution: String,
    pub year: i32,
    pub status: VerificationStatus,
    pub confidence: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedCertification {
    pub name: String,
    pub issuer: String,
    pub year: i32,
    pub status: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blockchain_hash: Option<String>,
    pub confidence: u8,
}

/// Per-category verified claims, in claim order within each category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationResult {
    pub skills: Vec<VerifiedSkill>,
    pub experience: Vec<VerifiedExperience>,
    pub education: Vec<VerifiedEducation>,
    pub certifications: Vec<VerifiedCertification>,
}

impl VerificationResult {
    fn statuses(&self) -> impl Iterator<Item = VerificationStatus> + '_ {
        self.skills
            .iter()
            .map(|s| s.status)
            .chain(self.experience.iter().map(|e| e.status))
            .chain(self.education.iter().map(|e| e.status))
            .chain(self.certifications.iter().map(|c| c.status))
    }

    pub fn total_items(&self) -> usize {
        self.statuses().count()
    }

    pub fn verified_count(&self) -> usize {
        self.statuses()
            .filter(|s| *s == VerificationStatus::Verified)
            .count()
    }

    /// Items awaiting a human decision: `needs_review` plus `unverified`.
    pub fn review_count(&self) -> usize {
        self.statuses()
            .filter(|s| {
                matches!(
                    s,
                    VerificationStatus::NeedsReview | VerificationStatus::Unverified
                )
            })
            .count()
    }

    pub fn flagged_count(&self) -> usize {
        self.statuses()
            .filter(|s| *s == VerificationStatus::Flagged)
            .count()
    }
}

/// Everything `verify` produces for one claim set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub result: VerificationResult,
    pub flags: Vec<Flag>,
    pub trust_score: f64,
}

/// Verifies claim sets against immutable reference data. Construct once and
/// share; `verify` borrows the claim set and performs no I/O.
pub struct VerificationEngine {
    reference: ReferenceData,
}

impl VerificationEngine {
    pub fn new() -> Self {
        Self {
            reference: ReferenceData::default(),
        }
    }

    pub fn with_reference(reference: ReferenceData) -> Self {
        Self { reference }
    }

    /// Verifies with the process-global thread RNG.
    pub fn verify(&self, claims: &ClaimSet) -> VerificationOutcome {
        self.verify_with_rng(claims, &mut rand::thread_rng())
    }

    /// Verifies with a caller-supplied RNG, for deterministic tests.
    pub fn verify_with_rng<R: Rng>(&self, claims: &ClaimSet, rng: &mut R) -> VerificationOutcome {
        let result = VerificationResult {
            skills: self.verify_skills(&claims.skills, rng),
            experience: self.verify_experience(&claims.experience, rng),
            education: self.verify_education(&claims.education, rng),
            certifications: self.verify_certifications(&claims.certifications, rng),
        };
        let trust_score = calculate_trust_score(&result);
        let flags = generate_flags(&result, claims);
        VerificationOutcome {
            result,
            flags,
            trust_score,
        }
    }

    /// A skill is verified when the lowercased name has a reference evidence
    /// entry; otherwise it is unverified, upgraded to needs_review with
    /// probability 0.3.
    fn verify_skills<R: Rng>(&self, skills: &[String], rng: &mut R) -> Vec<VerifiedSkill> {
        skills
            .iter()
            .map(|skill| {
                let key = skill.to_lowercase();
                let evidence = self.reference.skill_evidence.get(&key).cloned();
                let status = match &evidence {
                    Some(_) => VerificationStatus::Verified,
                    None if rng.gen_bool(0.3) => VerificationStatus::NeedsReview,
                    None => VerificationStatus::Unverified,
                };
                let confidence = confidence_for(status, rng, 60..=95, 20..=60);
                VerifiedSkill {
                    skill: skill.clone(),
                    status,
                    evidence: evidence.unwrap_or_default(),
                    confidence,
                }
            })
            .collect()
    }

    /// An entry is verified when the lowercased company contains a known
    /// company as a substring; otherwise needs_review, escalated to flagged
    /// with probability 0.2.
    fn verify_experience<R: Rng>(
        &self,
        experience: &[ExperienceClaim],
        rng: &mut R,
    ) -> Vec<VerifiedExperience> {
        experience
            .iter()
            .map(|exp| {
                let company_lower = exp.company.to_lowercase();
                let matched = self
                    .reference
                    .companies
                    .iter()
                    .any(|known| company_lower.contains(known));
                let status = match matched {
                    true => VerificationStatus::Verified,
                    false if rng.gen_bool(0.2) => VerificationStatus::Flagged,
                    false => VerificationStatus::NeedsReview,
                };
                let confidence = confidence_for(status, rng, 70..=95, 30..=70);
                VerifiedExperience {
                    company: exp.company.clone(),
                    position: exp.position.clone(),
                    years: exp.years,
                    status,
                    confidence,
                }
            })
            .collect()
    }

    /// Same shape as experience, against known institutions, with escalation
    /// probability 0.1.
    fn verify_education<R: Rng>(
        &self,
        education: &[EducationClaim],
        rng: &mut R,
    ) -> Vec<VerifiedEducation> {
        education
            .iter()
            .map(|edu| {
                let institution_lower = edu.institution.to_lowercase();
                let matched = self
                    .reference
                    .institutions
                    .iter()
                    .any(|known| institution_lower.contains(known));
                let status = match matched {
                    true => VerificationStatus::Verified,
                    false if rng.gen_bool(0.1) => VerificationStatus::Flagged,
                    false => VerificationStatus::NeedsReview,
                };
                let confidence = confidence_for(status, rng, 75..=98, 40..=75);
                VerifiedEducation {
                    degree: edu.degree.clone(),
                    institution: edu.institution.clone(),
                    year: edu.year,
                    status,
                    confidence,
                }
            })
            .collect()
    }

    /// Status drawn from a fixed partition of one uniform draw:
    /// verified < 0.6 ≤ needs_review < 0.9 ≤ flagged. Verified entries get a
    /// synthetic "0x"-prefixed hash simulating an on-chain attestation.
    fn verify_certifications<R: Rng>(
        &self,
        certifications: &[CertificationClaim],
        rng: &mut R,
    ) -> Vec<VerifiedCertification> {
        certifications
            .iter()
            .map(|cert| {
                let draw: f64 = rng.gen();
                let status = if draw < 0.6 {
                    VerificationStatus::Verified
                } else if draw < 0.9 {
                    VerificationStatus::NeedsReview
                } else {
                    VerificationStatus::Flagged
                };
                let blockchain_hash = (status == VerificationStatus::Verified)
                    .then(|| format!("0x{:x}", rng.gen_range(100_000..=999_999)));
                let confidence = confidence_for(status, rng, 80..=99, 25..=80);
                VerifiedCertification {
                    name: cert.name.clone(),
                    issuer: cert.issuer.clone(),
                    year: cert.year,
                    status,
                    blockchain_hash,
                    confidence,
                }
            })
            .collect()
    }
}

impl Default for VerificationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn confidence_for<R: Rng>(
    status: VerificationStatus,
    rng: &mut R,
    verified_range: std::ops::RangeInclusive<u8>,
    other_range: std::ops::RangeInclusive<u8>,
) -> u8 {
    if status == VerificationStatus::Verified {
        rng.gen_range(verified_range)
    } else {
        rng.gen_range(other_range)
    }
}

/// Trust score: `max(0, 100 * verified/total - 10 * flagged)`, one decimal.
/// Zero when there is nothing to verify. Pure in the result.
pub fn calculate_trust_score(result: &VerificationResult) -> f64 {
    let total = result.total_items();
    if total == 0 {
        return 0.0;
    }
    let base_score = result.verified_count() as f64 / total as f64 * 100.0;
    let penalty = result.flagged_count() as f64 * 10.0;
    let final_score = (base_score - penalty).max(0.0);
    (final_score * 10.0).round() / 10.0
}

/// One `verification_failed` flag per flagged item in category order
/// (skills, experience, education, certifications), then the two aggregate
/// checks against the raw claim counts.
pub fn generate_flags(result: &VerificationResult, claims: &ClaimSet) -> Vec<Flag> {
    let mut flags = Vec::new();

    let mut push_failed = |category: &str, item: Option<String>| {
        flags.push(Flag {
            flag_type: "verification_failed".to_string(),
            category: category.to_string(),
            item,
            severity: Severity::High,
            message: format!("Could not verify {category} claim"),
        });
    };

    for skill in &result.skills {
        if skill.status == VerificationStatus::Flagged {
            push_failed("skills", Some(skill.skill.clone()));
        }
    }
    for exp in &result.experience {
        if exp.status == VerificationStatus::Flagged {
            push_failed("experience", Some(exp.company.clone()));
        }
    }
    for edu in &result.education {
        if edu.status == VerificationStatus::Flagged {
            // Education entries carry no single identifying label.
            push_failed("education", None);
        }
    }
    for cert in &result.certifications {
        if cert.status == VerificationStatus::Flagged {
            push_failed("certifications", Some(cert.name.clone()));
        }
    }

    if claims.experience.len() > 5 {
        flags.push(Flag {
            flag_type: "excessive_experience".to_string(),
            category: "experience".to_string(),
            item: None,
            severity: Severity::Medium,
            message: format!(
                "Unusually high number of work experiences ({})",
                claims.experience.len()
            ),
        });
    }

    if claims.skills.len() > 20 {
        flags.push(Flag {
            flag_type: "skill_stuffing".to_string(),
            category: "skills".to_string(),
            item: None,
            severity: Severity::Low,
            message: format!(
                "Possible skill stuffing detected ({} skills listed)",
                claims.skills.len()
            ),
        });
    }

    flags
}
