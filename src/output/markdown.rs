//! Markdown report generation
//!
//! This module renders the reported bulletins of a run as a human-readable
//! markdown file, grouped by channel, with one table per bulletin.

use crate::channel::Channel;
use crate::output::stats::RunStats;
use crate::output::traits::OutputResult;
use crate::record::Content;
use crate::state::StubOutcome;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report of a run
///
/// # Arguments
///
/// * `contents` - The reported contents
/// * `stats` - Counters of the run
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn generate_markdown_report(
    contents: &[Content],
    stats: &RunStats,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_report(contents, stats);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats reported contents as markdown
pub fn format_markdown_report(contents: &[Content], stats: &RunStats) -> String {
    let mut md = String::new();

    md.push_str("# 游戏审批信息\n\n");
    md.push_str(&format!(
        "- **Generated**: {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    md.push_str(&format!("- **Listing Pages**: {}\n", stats.pages_walked()));
    for outcome in StubOutcome::all() {
        md.push_str(&format!("- **{}**: {}\n", outcome, stats.count(outcome)));
    }
    md.push('\n');

    if contents.is_empty() {
        md.push_str("No new or changed bulletins.\n");
        return md;
    }

    for channel in Channel::ALL {
        let group: Vec<&Content> = contents.iter().filter(|c| c.channel == channel).collect();
        if group.is_empty() {
            continue;
        }

        md.push_str(&format!("## {} ({})\n\n", channel.chinese_name(), channel));
        for content in group {
            push_content(&mut md, content);
        }
    }

    md
}

fn push_content(md: &mut String, content: &Content) {
    md.push_str(&format!("### {}\n\n", escape(&content.title)));
    md.push_str(&format!("- **Date**: {}\n", content.date));
    md.push_str(&format!("- **URL**: {}\n", content.url));
    md.push_str(&format!("- **Items**: {}\n\n", content.items.len()));

    let fields = content.channel.layout().columns;

    md.push('|');
    for field in fields {
        md.push_str(&format!(" {} |", field.label()));
    }
    md.push_str("\n|");
    for _ in fields {
        md.push_str("---|");
    }
    md.push('\n');

    for item in &content.items {
        md.push('|');
        for field in fields {
            md.push_str(&format!(" {} |", escape(item.get(*field).unwrap_or(""))));
        }
        md.push('\n');
    }
    md.push('\n');
}

/// Keeps cell text on one table row
fn escape(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Item;

    fn revoked() -> Content {
        Content {
            channel: Channel::GameRevoked,
            id: "t1".to_string(),
            title: "2024年4月游戏审批撤销信息".to_string(),
            url: "yxspcxxx/202404/t1.html".to_string(),
            date: "2024-04-01".to_string(),
            items: vec![Item {
                seq: "1".to_string(),
                name: "A|B".to_string(),
                catalog: Some("移动".to_string()),
                publisher: Some("Pub".to_string()),
                operator: Some("Op".to_string()),
                approval_number: "GA1".to_string(),
                isbn: Some("ISBN 1".to_string()),
                date: "2024-04-01".to_string(),
                change_info: None,
                revoke_info: Some("主动撤销".to_string()),
            }],
        }
    }

    #[test]
    fn test_groups_under_chinese_name() {
        let md = format_markdown_report(&[revoked()], &RunStats::default());
        assert!(md.contains("## 游戏审批撤销信息 (yxspcxxx)"));
        assert!(md.contains("### 2024年4月游戏审批撤销信息"));
        assert!(!md.contains("游戏审批变更信息"));
    }

    #[test]
    fn test_item_row_in_layout_order() {
        let md = format_markdown_report(&[revoked()], &RunStats::default());
        assert!(md.contains("| 1 | A\\|B | 移动 | Pub | Op | 主动撤销 | GA1 | ISBN 1 | 2024-04-01 |"));
    }

    #[test]
    fn test_empty_report() {
        let mut stats = RunStats::default();
        stats.record(StubOutcome::Skipped);
        let md = format_markdown_report(&[], &stats);
        assert!(md.contains("- **skipped**: 1"));
        assert!(md.contains("No new or changed bulletins."));
    }

    #[test]
    fn test_generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        generate_markdown_report(&[revoked()], &RunStats::default(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# 游戏审批信息"));
    }
}
