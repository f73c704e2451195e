//! Candidate profile rendering (`0-PROFILE.md`)

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

use crate::models::CandidateDetail;

/// Format a date as "Jan 2024" (UTC). Missing dates read "Present";
/// unparseable ones are returned unchanged.
pub fn format_month(date: Option<&str>) -> String {
    let Some(raw) = date.filter(|d| !d.is_empty()) else {
        return "Present".to_string();
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.naive_utc().format("%b %Y").to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%b %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Skills and tags are strings or objects with a `name`
fn label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("name").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn labels(values: Option<&Vec<Value>>) -> Vec<String> {
    values
        .map(|values| values.iter().filter_map(label).collect())
        .unwrap_or_default()
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Render a candidate's detail record as a Markdown profile
pub fn render_profile(candidate: &CandidateDetail) -> String {
    let mut sections: Vec<String> = Vec::new();

    sections.push(format!("# {}", text(&candidate.name)));

    if let Some(headline) = candidate.headline.as_deref().filter(|h| !h.is_empty()) {
        sections.push(format!("**{}**", headline));
    }

    let mut contact = Vec::new();
    if let Some(email) = candidate.email.as_deref().filter(|v| !v.is_empty()) {
        contact.push(format!("📧 {}", email));
    }
    if let Some(phone) = candidate.phone.as_deref().filter(|v| !v.is_empty()) {
        contact.push(format!("📞 {}", phone));
    }
    if let Some(address) = candidate.address.as_deref().filter(|v| !v.is_empty()) {
        contact.push(format!("📍 {}", address));
    }
    if let Some(location) = &candidate.location
        && let (Some(city), Some(country)) = (
            location.city.as_deref().filter(|v| !v.is_empty()),
            location.country.as_deref().filter(|v| !v.is_empty()),
        )
    {
        contact.push(format!("🌍 {}, {}", city, country));
    }
    if !contact.is_empty() {
        sections.push(format!("## Contact Information\n{}", contact.join("\n")));
    }

    sections.push("## Application Details".to_string());
    let (job_title, job_code) = candidate
        .job
        .as_ref()
        .map(|job| (text(&job.title), text(&job.shortcode)))
        .unwrap_or(("", ""));
    sections.push(format!("**Position:** {} ({})", job_title, job_code));
    sections.push(format!("**Stage:** {}", text(&candidate.stage)));
    sections.push(format!(
        "**Applied:** {}",
        format_month(candidate.created_at.as_deref())
    ));
    if candidate.sourced == Some(true) {
        sections.push("**Source:** Sourced candidate".to_string());
    }

    if let Some(summary) = candidate.summary.as_deref().filter(|v| !v.is_empty()) {
        sections.push(format!("## Summary\n{}", summary));
    }

    let skills = labels(candidate.skills.as_ref());
    if !skills.is_empty() {
        let items: Vec<String> = skills.iter().map(|s| format!("- {}", s)).collect();
        sections.push(format!("## Skills\n{}", items.join("\n")));
    }

    if let Some(entries) = candidate.experience_entries.as_ref().filter(|e| !e.is_empty()) {
        sections.push("## Work Experience".to_string());
        for exp in entries {
            let end = if exp.current == Some(true) {
                "Present".to_string()
            } else {
                format_month(exp.end_date.as_deref())
            };
            let duration = format!("{} - {}", format_month(exp.start_date.as_deref()), end);
            let industry = exp
                .industry
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|i| format!(" | {}", i))
                .unwrap_or_default();
            sections.push(format!(
                "### {} at {}\n**{}**{}\n\n{}",
                text(&exp.title),
                text(&exp.company),
                duration,
                industry,
                text(&exp.summary)
            ));
        }
    }

    if let Some(entries) = candidate.education_entries.as_ref().filter(|e| !e.is_empty()) {
        sections.push("## Education".to_string());
        for edu in entries {
            let duration = format!(
                "{} - {}",
                format_month(edu.start_date.as_deref()),
                format_month(edu.end_date.as_deref())
            );
            sections.push(format!(
                "### {}\n**{}** | {}\n*{}*",
                text(&edu.degree),
                text(&edu.school),
                text(&edu.field_of_study),
                duration
            ));
        }
    }

    if let Some(profiles) = candidate.social_profiles.as_ref().filter(|p| !p.is_empty()) {
        sections.push("## Social Profiles".to_string());
        for profile in profiles {
            sections.push(format!(
                "- **{}:** [{}]({})",
                text(&profile.kind),
                text(&profile.name),
                text(&profile.url)
            ));
        }
    }

    let tags = labels(candidate.tags.as_ref());
    if !tags.is_empty() {
        let items: Vec<String> = tags.iter().map(|t| format!("`{}`", t)).collect();
        sections.push(format!("## Tags\n{}", items.join(" ")));
    }

    if let Some(cover_letter) = candidate.cover_letter() {
        sections.push(format!("## Cover Letter\n{}", cover_letter));
    }

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail() -> CandidateDetail {
        serde_json::from_value(json!({
            "id": "candidate123",
            "name": "John Doe",
            "headline": "Software Engineer",
            "email": "john.doe@example.com",
            "phone": "555-1234",
            "address": "123 Main St",
            "location": { "city": "San Francisco", "country": "United States" },
            "job": { "shortcode": "SE001", "title": "Software Engineer" },
            "stage": "sourced",
            "created_at": "2023-11-01T10:00:00Z",
            "sourced": true,
            "summary": "Experienced software engineer",
            "skills": ["JavaScript", { "name": "TypeScript" }],
            "experience_entries": [
                {
                    "title": "Senior Developer",
                    "company": "Tech Corp",
                    "industry": "Technology",
                    "summary": "Led development team",
                    "start_date": "2022-01-01",
                    "end_date": null,
                    "current": true
                },
                {
                    "title": "Java Developer",
                    "company": "Partners Soft",
                    "industry": null,
                    "summary": "Worked on enterprise applications",
                    "start_date": "2024-10-01",
                    "end_date": "2025-03-01",
                    "current": false
                }
            ],
            "education_entries": [],
            "tags": [],
            "social_profiles": [],
            "cover_letter": "I am interested in this position..."
        }))
        .unwrap()
    }

    #[test]
    fn test_format_month() {
        assert_eq!(format_month(None), "Present");
        assert_eq!(format_month(Some("2022-01-01")), "Jan 2022");
        assert_eq!(format_month(Some("2023-11-01T10:00:00Z")), "Nov 2023");
        assert_eq!(format_month(Some("sometime")), "sometime");
    }

    #[test]
    fn test_profile_sections() {
        let profile = render_profile(&detail());

        assert!(profile.starts_with("# John Doe\n\n**Software Engineer**"));
        assert!(profile.contains("## Contact Information\n📧 john.doe@example.com\n📞 555-1234"));
        assert!(profile.contains("🌍 San Francisco, United States"));
        assert!(profile.contains("**Position:** Software Engineer (SE001)"));
        assert!(profile.contains("**Applied:** Nov 2023"));
        assert!(profile.contains("**Source:** Sourced candidate"));
        assert!(profile.contains("## Skills\n- JavaScript\n- TypeScript"));
        assert!(profile.contains(
            "### Senior Developer at Tech Corp\n**Jan 2022 - Present** | Technology"
        ));
        assert!(profile.contains("### Java Developer at Partners Soft\n**Oct 2024 - Mar 2025**\n\n"));
        assert!(profile.ends_with("## Cover Letter\nI am interested in this position..."));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let profile = render_profile(&detail());
        assert!(!profile.contains("## Education"));
        assert!(!profile.contains("## Tags"));
        assert!(!profile.contains("## Social Profiles"));
    }
}
