//! Human-readable rendering of a run.

use passerelle_core::models::{Notice, NoticeLevel};

use crate::pipeline::RunReport;

/// Render the header block, rebuilt article and connective list.
///
/// The title is followed by three blank lines and the blurb by six, the
/// spacing editors paste into the CMS.
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();

    match &report.header_fields {
        Some(fields) => {
            out.push_str("### Titre\n");
            out.push_str(&fields.title);
            out.push_str("\n\n\n\n");
            out.push_str("### Chapeau\n");
            out.push_str(&fields.blurb);
            out.push_str("\n\n\n\n\n\n\n");
        }
        None => {
            out.push_str("### Titre et chapeau\n");
            out.push_str(&report.header);
            out.push_str("\n\n\n\n\n\n\n");
        }
    }

    out.push_str("### Article reconstruit\n");
    out.push_str(&report.article);
    out.push_str("\n\n");

    out.push_str("### Transitions générées\n");
    for (i, c) in report.connectives.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, c));
    }

    if let Some(version) = &report.version {
        out.push_str(&format!("\nVersion de l'application : {}\n", version));
    }
    out
}

/// One line per notice, prefixed by its level.
pub fn render_notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "attention",
        NoticeLevel::Error => "erreur",
    };
    format!("[{}] {}", tag, notice.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use passerelle_core::header::HeaderResult;

    fn report(header_fields: Option<HeaderResult>) -> RunReport {
        RunReport {
            run_id: "id".to_string(),
            generated_at: "2026-01-01T00:00:00Z".to_string(),
            version: Some("abc123def0".to_string()),
            header: "texte brut".to_string(),
            header_fields,
            article: "A\n\nUn deux trois quatre cinq\n\nB".to_string(),
            connectives: vec!["Un deux trois quatre cinq".to_string()],
            notices: vec![],
        }
    }

    #[test]
    fn test_render_parsed_header_spacing() {
        let text = render_text(&report(Some(HeaderResult {
            title: "Le titre".to_string(),
            blurb: "Le chapeau".to_string(),
        })));
        assert!(text.starts_with("### Titre\nLe titre\n\n\n\n### Chapeau\nLe chapeau\n\n\n\n\n\n\n### Article"));
        assert!(text.contains("1. Un deux trois quatre cinq\n"));
        assert!(text.ends_with("Version de l'application : abc123def0\n"));
    }

    #[test]
    fn test_render_raw_header_fallback() {
        let text = render_text(&report(None));
        assert!(text.starts_with("### Titre et chapeau\ntexte brut\n"));
    }

    #[test]
    fn test_render_notice() {
        assert_eq!(render_notice(&Notice::warning("x")), "[attention] x");
        assert_eq!(render_notice(&Notice::error("y")), "[erreur] y");
    }
}
