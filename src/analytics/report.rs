// src/analytics/report.rs
// =============================================================================
// Writes the end-of-crawl reports into the output directory.
//
// Files:
// - subdomains.txt          subdomains by pages visited
// - most_valid_outlinks.txt the page with the most valid out-links
// - urls_and_traps.txt      downloaded URLs, then identified traps
// - most_words.txt          the longest page by word count
// - most_common_words.txt   top 50 words (stop words excluded)
// - report.json             the whole snapshot, only when asked for
//
// The common-words report is written last: it is the only one that can fail
// on its own (no words recorded), and the others must still be on disk.
// =============================================================================

use super::AnalyticsSnapshot;
use crate::error::ReportError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const TOP_WORDS: usize = 50;

pub fn write_reports(snapshot: &AnalyticsSnapshot, dir: &Path, json: bool) -> Result<(), ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    write_file(dir, "subdomains.txt", |out| {
        for (subdomain, visits) in &snapshot.subdomains {
            writeln!(out, "{} visited {} times", subdomain, visits)?;
        }
        Ok(())
    })?;

    write_file(dir, "most_valid_outlinks.txt", |out| {
        writeln!(
            out,
            "{} has {} outlinks",
            snapshot.most_outlinks.url, snapshot.most_outlinks.count
        )
    })?;

    write_file(dir, "urls_and_traps.txt", |out| write_urls_and_traps(out, snapshot))?;

    write_file(dir, "most_words.txt", |out| {
        writeln!(
            out,
            "{} has {} words",
            snapshot.most_words.url, snapshot.most_words.count
        )
    })?;

    if json {
        let path = dir.join("report.json");
        let mut out = BufWriter::new(create(&path)?);
        serde_json::to_writer_pretty(&mut out, snapshot)?;
        out.flush().map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "wrote JSON report");
    }

    if snapshot.word_frequencies.is_empty() {
        return Err(ReportError::NoWords);
    }

    write_file(dir, "most_common_words.txt", |out| {
        for (word, frequency) in snapshot.word_frequencies.iter().take(TOP_WORDS) {
            writeln!(out, "{} was used {} times", word, frequency)?;
        }
        Ok(())
    })?;

    info!(dir = %dir.display(), "reports written");
    Ok(())
}

fn write_urls_and_traps(out: &mut dyn Write, snapshot: &AnalyticsSnapshot) -> std::io::Result<()> {
    writeln!(out, "Downloaded URLs:")?;
    for url in &snapshot.downloaded_urls {
        writeln!(out, "{}", url)?;
    }

    writeln!(out)?;
    writeln!(out, "Identified traps:")?;
    for trap in &snapshot.identified_traps {
        // A trap with a control character can't be written as one report line
        if trap.url.chars().any(char::is_control) {
            debug!(url = ?trap.url, "skipping unprintable trap entry");
            continue;
        }
        writeln!(out, "{}", trap.url)?;
    }
    Ok(())
}

fn create(path: &Path) -> Result<File, ReportError> {
    File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file<F>(dir: &Path, name: &str, body: F) -> Result<(), ReportError>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    let path: PathBuf = dir.join(name);
    let mut out = BufWriter::new(create(&path)?);

    body(&mut out)
        .and_then(|_| out.flush())
        .map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;

    debug!(path = %path.display(), "wrote report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::Analytics;
    use crate::validate::TrapReason;

    fn read(dir: &Path, name: &str) -> String {
        std::fs::read_to_string(dir.join(name)).unwrap()
    }

    fn sample() -> Analytics {
        let analytics = Analytics::new();
        analytics.record_visit("http://www.ics.uci.edu/");
        analytics.record_visit("http://www.ics.uci.edu/about");
        analytics.record_visit("http://vision.ics.uci.edu/");
        analytics.record_words(
            "http://www.ics.uci.edu/about",
            &["research".to_string(), "the".to_string(), "research".to_string()],
        );
        analytics.record_outlinks("http://www.ics.uci.edu/", 4);
        analytics.record_trap("http://example.com/", TrapReason::OffScope);
        analytics
    }

    #[test]
    fn test_all_reports_written() {
        let dir = tempfile::tempdir().unwrap();
        write_reports(&sample().snapshot(), dir.path(), true).unwrap();

        assert_eq!(
            read(dir.path(), "subdomains.txt"),
            "www.ics.uci.edu visited 2 times\nvision.ics.uci.edu visited 1 times\n"
        );
        assert_eq!(
            read(dir.path(), "most_valid_outlinks.txt"),
            "http://www.ics.uci.edu/ has 4 outlinks\n"
        );
        assert_eq!(
            read(dir.path(), "most_words.txt"),
            "http://www.ics.uci.edu/about has 3 words\n"
        );
        assert_eq!(
            read(dir.path(), "most_common_words.txt"),
            "research was used 2 times\n"
        );

        let traps = read(dir.path(), "urls_and_traps.txt");
        assert!(traps.starts_with("Downloaded URLs:\n"));
        assert!(traps.contains("\n\nIdentified traps:\nhttp://example.com/\n"));

        let json: serde_json::Value =
            serde_json::from_str(&read(dir.path(), "report.json")).unwrap();
        assert_eq!(json["most_outlinks"]["count"], 4);
    }

    #[test]
    fn test_no_words_fails_after_other_reports() {
        let dir = tempfile::tempdir().unwrap();
        let analytics = Analytics::new();
        analytics.record_visit("http://www.ics.uci.edu/");

        let err = write_reports(&analytics.snapshot(), dir.path(), false).unwrap_err();
        assert!(matches!(err, ReportError::NoWords));
        assert!(dir.path().join("subdomains.txt").exists());
        assert!(dir.path().join("most_words.txt").exists());
        assert!(!dir.path().join("most_common_words.txt").exists());
        assert!(!dir.path().join("report.json").exists());
    }

    #[test]
    fn test_top_words_capped_at_fifty() {
        let dir = tempfile::tempdir().unwrap();
        let analytics = Analytics::new();
        let words: Vec<String> = (0..80).map(|i| format!("word{}", i)).collect();
        analytics.record_words("http://www.ics.uci.edu/", &words);

        write_reports(&analytics.snapshot(), dir.path(), false).unwrap();
        assert_eq!(read(dir.path(), "most_common_words.txt").lines().count(), TOP_WORDS);
    }

    #[test]
    fn test_unprintable_trap_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let analytics = sample();
        analytics.record_trap("http://bad.ics.uci.edu/a\nb", TrapReason::Malformed);

        write_reports(&analytics.snapshot(), dir.path(), false).unwrap();
        let traps = read(dir.path(), "urls_and_traps.txt");
        assert!(!traps.contains("bad.ics.uci.edu"));
        assert!(traps.contains("http://example.com/"));
    }
}
