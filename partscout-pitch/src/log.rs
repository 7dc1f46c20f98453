use std::path::Path;

use partscout_catalog::MatchTier;

/// A single entry in the session log.
#[derive(Debug, Clone)]
pub enum LogEntry {
    Matched {
        file: String,
        part_name: String,
        tier: MatchTier,
        /// Number of rows the winning tier returned.
        row_count: usize,
        pitched: bool,
        voiced: bool,
    },
    NoMatch {
        file: String,
        identifier: String,
    },
    Error {
        file: String,
        message: String,
    },
}

/// Collects per-file identification outcomes and writes a log file.
#[derive(Debug, Default)]
pub struct SessionLog {
    entries: Vec<LogEntry>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn summary(&self) -> LogSummary {
        let mut summary = LogSummary::default();
        for entry in &self.entries {
            match entry {
                LogEntry::Matched {
                    tier,
                    pitched,
                    voiced,
                    ..
                } => {
                    summary.total_matched += 1;
                    if *pitched {
                        summary.pitched += 1;
                    }
                    if *voiced {
                        summary.voiced += 1;
                    }
                    match tier {
                        MatchTier::Filename => summary.by_filename += 1,
                        MatchTier::ImageSku => summary.by_image_sku += 1,
                        MatchTier::SkuSubstring => summary.by_sku_substring += 1,
                    }
                }
                LogEntry::NoMatch { .. } => summary.total_unmatched += 1,
                LogEntry::Error { .. } => summary.total_errors += 1,
            }
        }
        summary
    }

    /// Write the log to a file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;

        let mut file = std::fs::File::create(path)?;
        let summary = self.summary();

        writeln!(file, "=== Identify Log ===")?;
        writeln!(
            file,
            "Date: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file)?;
        writeln!(file, "--- Summary ---")?;
        writeln!(
            file,
            "Matched: {} (filename: {}, image-sku: {}, sku-substring: {})",
            summary.total_matched,
            summary.by_filename,
            summary.by_image_sku,
            summary.by_sku_substring
        )?;
        writeln!(file, "Unmatched: {}", summary.total_unmatched)?;
        writeln!(file, "Errors: {}", summary.total_errors)?;
        writeln!(file, "Pitches generated: {}", summary.pitched)?;
        writeln!(file, "Pitches voiced: {}", summary.voiced)?;
        writeln!(file)?;
        writeln!(file, "--- Details ---")?;
        writeln!(file)?;

        for entry in &self.entries {
            match entry {
                LogEntry::Matched {
                    file: f,
                    part_name,
                    tier,
                    row_count,
                    pitched,
                    voiced,
                } => {
                    writeln!(
                        file,
                        "[OK] {} -> \"{}\" (matched by {}, {} row{})",
                        f,
                        part_name,
                        tier,
                        row_count,
                        if *row_count == 1 { "" } else { "s" }
                    )?;
                    if *pitched {
                        writeln!(file, "     Pitch: generated")?;
                    }
                    if *voiced {
                        writeln!(file, "     Audio: generated")?;
                    }
                }
                LogEntry::NoMatch {
                    file: f,
                    identifier,
                } => {
                    writeln!(file, "[NO MATCH] {} (identifier: {})", f, identifier)?;
                }
                LogEntry::Error { file: f, message } => {
                    writeln!(file, "[ERROR] {}: {}", f, message)?;
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct LogSummary {
    pub total_matched: usize,
    pub total_unmatched: usize,
    pub total_errors: usize,
    pub pitched: usize,
    pub voiced: usize,
    pub by_filename: usize,
    pub by_image_sku: usize,
    pub by_sku_substring: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(tier: MatchTier, pitched: bool, voiced: bool) -> LogEntry {
        LogEntry::Matched {
            file: "ABC__123.jpg".to_string(),
            part_name: "Impeller Kit".to_string(),
            tier,
            row_count: 1,
            pitched,
            voiced,
        }
    }

    #[test]
    fn test_summary_counts_tiers() {
        let mut log = SessionLog::new();
        log.add(matched(MatchTier::Filename, true, true));
        log.add(matched(MatchTier::ImageSku, true, false));
        log.add(matched(MatchTier::SkuSubstring, false, false));
        log.add(LogEntry::NoMatch {
            file: "unknown.jpg".to_string(),
            identifier: "unknown".to_string(),
        });
        log.add(LogEntry::Error {
            file: "ABC__123.jpg".to_string(),
            message: "rate limited".to_string(),
        });

        let summary = log.summary();
        assert_eq!(summary.total_matched, 3);
        assert_eq!(summary.by_filename, 1);
        assert_eq!(summary.by_image_sku, 1);
        assert_eq!(summary.by_sku_substring, 1);
        assert_eq!(summary.total_unmatched, 1);
        assert_eq!(summary.total_errors, 1);
        assert_eq!(summary.pitched, 2);
        assert_eq!(summary.voiced, 1);
    }

    #[test]
    fn test_write_to_file() {
        let mut log = SessionLog::new();
        log.add(matched(MatchTier::Filename, true, false));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identify-log.txt");
        log.write_to_file(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("=== Identify Log ==="));
        assert!(contents.contains("matched by filename"));
        assert!(contents.contains("Pitch: generated"));
    }
}
