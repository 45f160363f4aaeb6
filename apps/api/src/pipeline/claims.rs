//! Claim extraction — regex/heuristic extraction of a structured claim set
//! from plain resume text.
//!
//! Extraction is best-effort pattern matching with no semantic validation:
//! it never fails, missing data degrades to empty or placeholder values, and
//! duplicate/overlapping matches across patterns are not merged.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::pipeline::reference::{CERT_KEYWORDS, SKILLS_DB};

/// Everything the candidate asserts in one resume. Produced once per upload
/// and consumed immutably by the verification engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimSet {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceClaim>,
    pub education: Vec<EducationClaim>,
    pub certifications: Vec<CertificationClaim>,
    pub raw_text: String,
    pub extracted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceClaim {
    pub company: String,
    pub position: String,
    pub years: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationClaim {
    pub degree: String,
    pub institution: String,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificationClaim {
    pub name: String,
    pub issuer: String,
    pub year: i32,
}

/// Lines containing any of these markers are skipped when guessing the name.
const CONTACT_MARKERS: &[&str] = &["email", "phone", "@", "tel:", "mobile"];

const NAME_PLACEHOLDER: &str = "Name Not Found";
const POSITION_PLACEHOLDER: &str = "Software Developer";
const INSTITUTION_PLACEHOLDER: &str = "University Name";
const ISSUER_PLACEHOLDER: &str = "Certification Body";

/// Heuristic claim extractor. All patterns are compiled once at construction.
pub struct ClaimExtractor {
    email_re: Regex,
    phone_re: Regex,
    year_re: Regex,
    company_res: Vec<Regex>,
    degree_res: Vec<Regex>,
}

impl ClaimExtractor {
    pub fn new() -> Self {
        // The phone pattern is intentionally permissive (no formatting
        // validation) and can match other numeric tokens. Inherited
        // heuristic limitation, documented rather than corrected.
        Self {
            email_re: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap(),
            phone_re: Regex::new(r"\+?[1-9]?[0-9]{7,12}").unwrap(),
            year_re: Regex::new(r"(20\d{2}|19\d{2})").unwrap(),
            company_res: vec![
                Regex::new(
                    r"(?i)(\w+\s+(?:Inc|LLC|Corp|Corporation|Company|Ltd|Limited|Technologies|Tech|Solutions|Systems|Group))",
                )
                .unwrap(),
                Regex::new(r"(?i)at\s+([A-Z][a-zA-Z\s&]+)").unwrap(),
                Regex::new(r"(?i)worked\s+at\s+([A-Z][a-zA-Z\s&]+)").unwrap(),
            ],
            degree_res: vec![
                Regex::new(
                    r"(?i)(Bachelor(?:'s|s)?\s+(?:of\s+)?(?:Science|Arts|Engineering|Technology|Computer Science))",
                )
                .unwrap(),
                Regex::new(
                    r"(?i)(Master(?:'s|s)?\s+(?:of\s+)?(?:Science|Arts|Engineering|Technology|Computer Science))",
                )
                .unwrap(),
                Regex::new(r"(?i)(PhD|Ph\.D\.?|Doctorate)").unwrap(),
                // Word-bounded so that e.g. "Email" does not match "M.A.".
                Regex::new(r"(?i)\b(B\.?S\.?|B\.?A\.?|M\.?S\.?|M\.?A\.?|B\.?Tech|M\.?Tech)\b")
                    .unwrap(),
            ],
        }
    }

    /// Extracts a full claim set from resume text. Never fails; worst case
    /// every optional field is absent or a placeholder.
    pub fn extract(&self, text: &str) -> ClaimSet {
        ClaimSet {
            name: self.extract_name(text),
            email: self.extract_email(text),
            phone: self.extract_phone(text),
            skills: self.extract_skills(text),
            experience: self.extract_experience(text),
            education: self.extract_education(text),
            certifications: self.extract_certifications(text),
            raw_text: text.to_string(),
            extracted_at: Utc::now(),
        }
    }

    /// Scans the first 5 lines for a 2–4 word line where every word is
    /// title-case or all-uppercase, skipping obvious contact lines.
    fn extract_name(&self, text: &str) -> String {
        for line in text.lines().take(5) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let lower = line.to_lowercase();
            if CONTACT_MARKERS.iter().any(|m| lower.contains(m)) {
                continue;
            }
            let words: Vec<&str> = line.split_whitespace().collect();
            if (2..=4).contains(&words.len()) && words.iter().all(|w| is_title_or_upper(w)) {
                return line.to_string();
            }
        }
        NAME_PLACEHOLDER.to_string()
    }

    fn extract_email(&self, text: &str) -> Option<String> {
        self.email_re.find(text).map(|m| m.as_str().to_string())
    }

    fn extract_phone(&self, text: &str) -> Option<String> {
        self.phone_re.find(text).map(|m| m.as_str().to_string())
    }

    /// Case-insensitive substring search against the skills reference list.
    /// Every matching term is reported once, in reference-list order.
    fn extract_skills(&self, text: &str) -> Vec<String> {
        let text_lower = text.to_lowercase();
        SKILLS_DB
            .iter()
            .filter(|skill| text_lower.contains(&skill.to_lowercase()))
            .map(|skill| skill.to_string())
            .collect()
    }

    /// Three alternative company patterns, up to 3 matches each. `years` is
    /// the count of 4-digit years ≥ 2015 anywhere in the text — a crude
    /// proxy, identical for every company found in the same document.
    fn extract_experience(&self, text: &str) -> Vec<ExperienceClaim> {
        let recent_years = self
            .year_re
            .find_iter(text)
            .filter_map(|m| m.as_str().parse::<i32>().ok())
            .filter(|year| *year >= 2015)
            .count() as i32;

        let mut experience = Vec::new();
        for pattern in &self.company_res {
            for caps in pattern.captures_iter(text).take(3) {
                let company = caps
                    .get(1)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();
                experience.push(ExperienceClaim {
                    company,
                    position: POSITION_PLACEHOLDER.to_string(),
                    years: recent_years,
                });
            }
        }
        experience
    }

    fn extract_education(&self, text: &str) -> Vec<EducationClaim> {
        let mut education = Vec::new();
        for pattern in &self.degree_res {
            for caps in pattern.captures_iter(text) {
                let degree = caps
                    .get(1)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();
                education.push(EducationClaim {
                    degree,
                    institution: INSTITUTION_PLACEHOLDER.to_string(),
                    year: 2020,
                });
            }
        }
        education
    }

    fn extract_certifications(&self, text: &str) -> Vec<CertificationClaim> {
        let text_lower = text.to_lowercase();
        CERT_KEYWORDS
            .iter()
            .filter(|keyword| text_lower.contains(&keyword.to_lowercase()))
            .map(|keyword| CertificationClaim {
                name: keyword.to_string(),
                issuer: ISSUER_PLACEHOLDER.to_string(),
                year: 2023,
            })
            .collect()
    }
}

impl Default for ClaimExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// True when the word's alphabetic characters are title-case (first upper,
/// rest lower) or all-uppercase. Punctuation such as `.` in initials is
/// ignored.
fn is_title_or_upper(word: &str) -> bool {
    let alpha: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    match alpha.split_first() {
        Some((first, rest)) => {
            first.is_uppercase()
                && (rest.iter().all(|c| c.is_lowercase()) || rest.iter().all(|c| c.is_uppercase()))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ClaimExtractor {
        ClaimExtractor::new()
    }

    const SAMPLE: &str =
        "John Smith\nEmail: john@x.com\nSkills: Python, React\nWorked at Google Inc\n2016 2019";

    #[test]
    fn test_sample_resume_extracts_expected_fields() {
        let claims = extractor().extract(SAMPLE);
        assert_eq!(claims.name, "John Smith");
        assert_eq!(claims.email.as_deref(), Some("john@x.com"));
        assert_eq!(claims.skills, vec!["Python", "React"]);
        assert!(claims
            .experience
            .iter()
            .any(|e| e.company.to_lowercase().contains("google")));
        assert!(claims.education.is_empty());
        assert!(claims.certifications.is_empty());
    }

    #[test]
    fn test_extract_never_fails_on_empty_text() {
        let claims = extractor().extract("");
        assert_eq!(claims.name, "Name Not Found");
        assert!(claims.email.is_none());
        assert!(claims.phone.is_none());
        assert!(claims.skills.is_empty());
        assert!(claims.experience.is_empty());
        assert!(claims.education.is_empty());
        assert!(claims.certifications.is_empty());
    }

    #[test]
    fn test_name_skips_contact_lines() {
        let text = "john.doe@mail.com\nTel: 12345678\nJane Doe\nSoftware Engineer";
        assert_eq!(extractor().extract(text).name, "Jane Doe");
    }

    #[test]
    fn test_name_requires_two_to_four_words() {
        let text = "Madonna\nOne Two Three Four Five\nSome body";
        // "Some body" fails casing; single word and five words fail the count.
        assert_eq!(extractor().extract(text).name, "Name Not Found");
    }

    #[test]
    fn test_name_accepts_all_uppercase() {
        assert_eq!(extractor().extract("JOHN SMITH\n").name, "JOHN SMITH");
    }

    #[test]
    fn test_name_only_scans_first_five_lines() {
        let text = "a\nb\nc\nd\ne\nJohn Smith";
        assert_eq!(extractor().extract(text).name, "Name Not Found");
    }

    #[test]
    fn test_email_first_match_wins() {
        let text = "contact: first@a.com, second@b.org";
        assert_eq!(
            extractor().extract(text).email.as_deref(),
            Some("first@a.com")
        );
    }

    #[test]
    fn test_phone_matches_digit_run() {
        let claims = extractor().extract("Call +4915123456789 anytime");
        assert!(claims.phone.is_some());
        assert!(claims.phone.unwrap().starts_with('+'));
    }

    #[test]
    fn test_phone_permissive_pattern_matches_years() {
        // Known heuristic limitation: a bare digit run qualifies as a phone.
        let claims = extractor().extract("Graduated 20152016");
        assert_eq!(claims.phone.as_deref(), Some("20152016"));
    }

    #[test]
    fn test_skills_reported_in_reference_order() {
        let claims = extractor().extract("I know React and also Python plus AWS");
        assert_eq!(claims.skills, vec!["Python", "React", "AWS"]);
    }

    #[test]
    fn test_skill_extraction_is_idempotent() {
        let text = "Python, JavaScript, Docker, Machine Learning";
        let first = extractor().extract(text).skills;
        let second = extractor().extract(text).skills;
        assert_eq!(first, second);
    }

    #[test]
    fn test_java_substring_false_positive_accepted() {
        // "JavaScript" alone also matches "Java" — accepted substring behavior.
        let claims = extractor().extract("Expert in JavaScript");
        assert!(claims.skills.contains(&"JavaScript".to_string()));
        assert!(claims.skills.contains(&"Java".to_string()));
    }

    #[test]
    fn test_experience_entity_suffix_pattern() {
        let claims = extractor().extract("Previously employed by Acme Corp in Berlin");
        assert_eq!(claims.experience.len(), 1);
        assert_eq!(claims.experience[0].company, "Acme Corp");
        assert_eq!(claims.experience[0].position, "Software Developer");
    }

    #[test]
    fn test_experience_caps_at_three_matches_per_pattern() {
        let text = "Alpha Inc Beta LLC Gamma Corp Delta Ltd";
        let claims = extractor().extract(text);
        assert_eq!(claims.experience.len(), 3);
    }

    #[test]
    fn test_experience_years_counts_recent_years() {
        let text = "Worked at Globex Corp 2013 2016 2019 2021";
        let claims = extractor().extract(text);
        assert!(!claims.experience.is_empty());
        // 2016, 2019, 2021 are >= 2015; 2013 is not.
        assert!(claims.experience.iter().all(|e| e.years == 3));
    }

    #[test]
    fn test_education_degree_with_field() {
        let claims = extractor().extract("Bachelor of Science, 2018");
        assert!(claims
            .education
            .iter()
            .any(|e| e.degree == "Bachelor of Science"));
        let entry = &claims.education[0];
        assert_eq!(entry.institution, "University Name");
        assert_eq!(entry.year, 2020);
    }

    #[test]
    fn test_education_phd_pattern() {
        let claims = extractor().extract("Holds a PhD in distributed systems");
        assert!(claims.education.iter().any(|e| e.degree == "PhD"));
    }

    #[test]
    fn test_certification_keywords() {
        let claims = extractor().extract("AWS Certified Solutions Architect");
        let names: Vec<&str> = claims.certifications.iter().map(|c| c.name.as_str()).collect();
        assert!(names.contains(&"AWS Certified"));
        // "Certified" alone matches too; overlapping matches are not merged.
        assert!(names.contains(&"Certified"));
        assert!(claims
            .certifications
            .iter()
            .all(|c| c.issuer == "Certification Body" && c.year == 2023));
    }

    #[test]
    fn test_raw_text_is_preserved() {
        let claims = extractor().extract(SAMPLE);
        assert_eq!(claims.raw_text, SAMPLE);
    }
}
