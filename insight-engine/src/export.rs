use listenboard_core::{CoreError, InsightKind, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    /// Plain-text insights report over the whole store.
    Report,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Report => "txt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
            ExportFormat::Report => "text/plain",
        }
    }
}

pub fn export_file_name(kind: InsightKind, format: ExportFormat) -> String {
    match format {
        ExportFormat::Report => format!("{}-insights.{}", kind.slug(), format.extension()),
        _ => format!("{}-data.{}", kind.slug(), format.extension()),
    }
}

const CSV_HEADER: [&str; 9] = [
    "Author",
    "Timestamp",
    "Subreddit",
    "Text",
    "Upvotes",
    "Emotion",
    "Intensity",
    "Category",
    "Confidence",
];

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

pub fn to_csv(records: &[&Record]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.join(","));
    for record in records {
        let row = [
            quote(&record.author),
            quote(&record.timestamp_label),
            quote(&record.subreddit),
            quote(&record.full_text),
            record.upvotes.to_string(),
            quote(&record.emotion),
            format!("{}%", (record.intensity * 100.0).round() as u32),
            quote(&record.category),
            record.confidence.to_string(),
        ];
        lines.push(row.join(","));
    }
    lines.join("\n")
}

pub fn to_json(records: &[&Record]) -> Result<String, CoreError> {
    Ok(serde_json::to_string_pretty(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(
            export_file_name(InsightKind::PainPoints, ExportFormat::Csv),
            "painpoints-data.csv"
        );
        assert_eq!(
            export_file_name(InsightKind::DesiresWishes, ExportFormat::Json),
            "desires-wishes-data.json"
        );
        assert_eq!(
            export_file_name(InsightKind::DesiresWishes, ExportFormat::Report),
            "desires-wishes-insights.txt"
        );
    }

    #[test]
    fn test_quote_escapes_embedded_quotes() {
        assert_eq!(quote(r#"he said "no""#), r#""he said ""no""""#);
    }

    #[test]
    fn test_csv_header_only_for_empty_set() {
        assert_eq!(
            to_csv(&[]),
            "Author,Timestamp,Subreddit,Text,Upvotes,Emotion,Intensity,Category,Confidence"
        );
    }
}
