//! Static reference tables backing extraction and verification.
//!
//! These stand in for real external data sources (skill graphs, employment
//! registries, accreditation databases). They are immutable, loaded once at
//! engine construction, and passed by reference into the verification code.

use std::collections::BTreeMap;

/// Known technology/skill terms matched case-insensitively against resume text.
/// Matches are reported in this order. Substring false positives (e.g. "Java"
/// inside "JavaScript") are accepted as-is.
pub const SKILLS_DB: &[&str] = &[
    "Python",
    "JavaScript",
    "Java",
    "C++",
    "React",
    "Node.js",
    "Django",
    "Flask",
    "HTML",
    "CSS",
    "SQL",
    "MongoDB",
    "PostgreSQL",
    "Git",
    "Docker",
    "Kubernetes",
    "AWS",
    "Azure",
    "Machine Learning",
    "Data Science",
    "TensorFlow",
    "PyTorch",
    "Blockchain",
    "Solidity",
    "Web3",
    "Smart Contracts",
    "DevOps",
    "CI/CD",
];

/// Certification keywords matched case-insensitively against resume text.
pub const CERT_KEYWORDS: &[&str] = &[
    "AWS Certified",
    "Azure Certified",
    "Google Cloud",
    "Certified",
    "Certificate",
    "Certification",
    "CompTIA",
    "Cisco",
    "Microsoft",
    "Oracle Certified",
    "PMP",
    "Scrum Master",
    "Kubernetes",
];

/// Mock verification databases for the engine. Skills map to supporting
/// evidence signals; companies and institutions are matched as lowercase
/// substrings of the claimed name.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub skill_evidence: BTreeMap<String, BTreeMap<String, u32>>,
    pub companies: Vec<String>,
    pub institutions: Vec<String>,
}

impl Default for ReferenceData {
    fn default() -> Self {
        let mut skill_evidence = BTreeMap::new();
        skill_evidence.insert("python".to_string(), evidence(&[("github_repos", 45), ("leetcode_solved", 120)]));
        skill_evidence.insert("javascript".to_string(), evidence(&[("github_repos", 32), ("leetcode_solved", 85)]));
        skill_evidence.insert("react".to_string(), evidence(&[("github_repos", 28), ("projects", 15)]));
        skill_evidence.insert("node.js".to_string(), evidence(&[("github_repos", 22), ("npm_packages", 3)]));
        skill_evidence.insert("machine learning".to_string(), evidence(&[("kaggle_competitions", 5), ("papers", 2)]));

        let companies = [
            "google", "microsoft", "amazon", "apple", "meta", "netflix", "uber", "airbnb",
        ]
        .map(String::from)
        .to_vec();

        let institutions = [
            "mit",
            "stanford",
            "harvard",
            "berkeley",
            "carnegie mellon",
            "caltech",
            "georgia tech",
        ]
        .map(String::from)
        .to_vec();

        Self {
            skill_evidence,
            companies,
            institutions,
        }
    }
}

fn evidence(signals: &[(&str, u32)]) -> BTreeMap<String, u32> {
    signals
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect()
}
