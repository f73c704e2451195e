//! Recruitment pipeline rendering (`stages.md`)

use crate::models::{Job, StagesResponse};

/// Render a job's stages as a Markdown pipeline table plus per-stage details
pub fn render_stages(job: &Job, stages: &StagesResponse) -> String {
    let sorted = stages.sorted();
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# {} - Recruitment Stages", job.title()));
    lines.push(format!("**Job Code:** {}\n", job.shortcode()));

    lines.push("## Recruitment Pipeline\n".to_string());
    lines.push("| Position | Stage | Type |".to_string());
    lines.push("|----------|-------|------|".to_string());
    for stage in &sorted {
        lines.push(format!(
            "| {} | {} | {} |",
            stage.position + 1,
            stage.name,
            stage.kind
        ));
    }
    lines.push(String::new());

    lines.push("## Stage Details\n".to_string());
    for stage in &sorted {
        lines.push(format!("### {}. {}", stage.position + 1, stage.name));
        lines.push(format!("- **Type:** {}", stage.kind));
        lines.push(format!("- **Slug:** {}\n", stage.slug));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_stages() {
        let job = Job::new("SE001", "Software Engineer");
        let stages: StagesResponse = serde_json::from_value(json!({
            "stages": [
                { "slug": "applied", "name": "Applied", "kind": "applied", "position": 1 },
                { "slug": "sourced", "name": "Sourced", "kind": "sourced", "position": 0 }
            ]
        }))
        .unwrap();

        let markdown = render_stages(&job, &stages);

        assert!(markdown.starts_with("# Software Engineer - Recruitment Stages\n**Job Code:** SE001\n"));
        assert!(markdown.contains(
            "| Position | Stage | Type |\n|----------|-------|------|\n| 1 | Sourced | sourced |\n| 2 | Applied | applied |\n"
        ));
        assert!(markdown.contains("### 1. Sourced\n- **Type:** sourced\n- **Slug:** sourced\n"));
        assert!(markdown.find("### 1. Sourced").unwrap() < markdown.find("### 2. Applied").unwrap());
    }

    #[test]
    fn test_render_no_stages() {
        let job = Job::new("X1", "Empty");
        let stages: StagesResponse = serde_json::from_value(json!({ "stages": [] })).unwrap();

        let markdown = render_stages(&job, &stages);
        assert!(markdown.contains("|----------|-------|------|\n\n## Stage Details"));
    }
}
