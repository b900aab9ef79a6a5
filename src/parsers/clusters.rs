use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::models::Group;
use crate::utils::validate_file_size;

const MAX_CONSECUTIVE_ERRORS: usize = 100;

/// Parse a clusters JSONL file (one [`Group`] per line)
/// Gracefully handles malformed lines by logging and skipping them
/// Returns an error if more than 50% of lines fail to parse or >100 consecutive errors
pub fn parse_clusters_file(path: &Path) -> Result<Vec<Group>> {
    // Open file and validate size to avoid TOCTOU race condition
    let file = File::open(path)
        .with_context(|| format!("Failed to open clusters file: {}", path.display()))?;
    validate_file_size(&file, path)?;

    let groups = parse_clusters(BufReader::new(file))
        .with_context(|| format!("Failed to parse clusters file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), groups = groups.len(), "loaded clusters file");
    Ok(groups)
}

/// Parse clusters JSONL from any reader
pub fn parse_clusters<R: Read>(reader: BufReader<R>) -> Result<Vec<Group>> {
    let mut groups = Vec::new();
    let mut skipped_count = 0;
    let mut total_lines = 0;
    let mut consecutive_errors = 0;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line from clusters file")?;

        if line.trim().is_empty() {
            continue;
        }

        total_lines += 1;

        match serde_json::from_str::<Group>(&line) {
            Ok(group) if group.visits().is_empty() => {
                tracing::warn!(line = line_num + 1, "skipping cluster without visits");
                skipped_count += 1;
            }
            Ok(group) => {
                groups.push(group);
                consecutive_errors = 0;
            }
            Err(e) => {
                tracing::warn!(line = line_num + 1, error = %e, "failed to parse cluster line");
                skipped_count += 1;
                consecutive_errors += 1;

                if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                    bail!(
                        "Too many consecutive parse errors ({}) in clusters file - file may be corrupted",
                        consecutive_errors
                    );
                }
            }
        }
    }

    if total_lines > 0 {
        let failure_rate = (skipped_count as f64) / (total_lines as f64);
        if failure_rate > 0.5 {
            bail!(
                "Too many parse failures in clusters file: {} of {} lines failed ({:.1}%)",
                skipped_count,
                total_lines,
                failure_rate * 100.0
            );
        }
    }

    if skipped_count > 0 {
        tracing::info!(groups = groups.len(), skipped = skipped_count, "parsed clusters with skips");
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const GOOD_LINE: &str = r#"{"raw_label":"cats","timestamp":1000,"visits":[{"normalized_url":"https://a.test","title":"A","raw_url":"https://a.test","timestamp":1000},{"normalized_url":"https://b.test","title":"B","raw_url":"https://b.test","timestamp":2000}]}"#;

    fn parse_str(content: &str) -> Result<Vec<Group>> {
        parse_clusters(BufReader::new(content.as_bytes()))
    }

    #[test]
    fn test_parse_valid_lines() {
        let content = format!("{}\n\n{}\n", GOOD_LINE, GOOD_LINE);
        let groups = parse_str(&content).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].raw_label, "cats");
        assert_eq!(groups[0].visits().len(), 2);
    }

    #[test]
    fn test_parse_skips_minority_of_bad_lines() {
        let content = format!("{}\n{}\nnot json\n", GOOD_LINE, GOOD_LINE);
        let groups = parse_str(&content).unwrap();
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_parse_fails_when_majority_bad() {
        let content = format!("{}\nnot json\n{{}}\n", GOOD_LINE);
        let err = parse_str(&content).unwrap_err();
        assert!(err.to_string().contains("Too many parse failures"));
    }

    #[test]
    fn test_parse_skips_empty_clusters() {
        let empty = r#"{"raw_label":"empty","timestamp":1,"visits":[]}"#;
        let content = format!("{}\n{}\n{}\n", GOOD_LINE, GOOD_LINE, empty);
        let groups = parse_str(&content).unwrap();
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_parse_consecutive_error_limit() {
        let mut content = String::new();
        for _ in 0..150 {
            content.push_str(GOOD_LINE);
            content.push('\n');
        }
        for _ in 0..MAX_CONSECUTIVE_ERRORS {
            content.push_str("garbage\n");
        }

        let err = parse_str(&content).unwrap_err();
        assert!(err.to_string().contains("consecutive"));
    }

    #[test]
    fn test_parse_clusters_file_missing() {
        let err = parse_clusters_file(Path::new("/definitely/not/here.jsonl")).unwrap_err();
        assert!(err.to_string().contains("Failed to open clusters file"));
    }

    #[test]
    fn test_parse_clusters_file_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "{}", GOOD_LINE).unwrap();
        let groups = parse_clusters_file(tmp.path()).unwrap();
        assert_eq!(groups.len(), 1);
    }
}
