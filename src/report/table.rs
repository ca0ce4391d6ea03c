use crate::domain::model::RankedSkill;

/// Renders the ranking as a fixed-width console table.
pub fn render_skills_table(ranked: &[RankedSkill], total_jobs: usize) -> String {
    let skill_width = ranked
        .iter()
        .map(|r| r.skill.chars().count())
        .max()
        .unwrap_or(0)
        .max("Skill/Tool".len());

    let mut lines = Vec::with_capacity(ranked.len() + 3);
    lines.push(format!("Top Skills from {} AI Job Postings", total_jobs));
    lines.push(format!(
        "{:<6} {:<width$} {:>8} {:>10}",
        "Rank",
        "Skill/Tool",
        "Mentions",
        "% of Jobs",
        width = skill_width + 2
    ));
    lines.push("-".repeat(6 + skill_width + 2 + 8 + 10 + 3));

    for (i, skill) in ranked.iter().enumerate() {
        lines.push(format!(
            "{:<6} {:<width$} {:>8} {:>9.1}%",
            i + 1,
            format!("{} {}", tier_marker(skill.percentage), skill.skill),
            skill.count,
            skill.percentage,
            width = skill_width + 2
        ));
    }

    lines.join("\n")
}

fn tier_marker(percentage: f64) -> &'static str {
    if percentage >= 50.0 {
        "●"
    } else if percentage >= 25.0 {
        "◉"
    } else if percentage >= 10.0 {
        "○"
    } else {
        "·"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rows() {
        let ranked = vec![
            RankedSkill { skill: "Python".to_string(), count: 9, percentage: 90.0 },
            RankedSkill { skill: "Kubernetes".to_string(), count: 1, percentage: 10.0 },
        ];
        let table = render_skills_table(&ranked, 10);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "Top Skills from 10 AI Job Postings");
        assert_eq!(lines.len(), 5);
        assert!(lines[3].starts_with("1 "));
        assert!(lines[3].contains("● Python"));
        assert!(lines[3].ends_with("90.0%"));
        assert!(lines[4].contains("○ Kubernetes"));
    }
}
