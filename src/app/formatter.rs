use crate::app::models::{ScanConfig, ScanResult, Tally, ROOT_DIR_KEY};

/// Extensions shown together in the web-scripting breakdown.
pub const WEB_SCRIPT_EXTENSIONS: &[&str] = &[".cjs", ".js", ".jsx", ".mjs", ".ts", ".tsx", ".vue"];

const DIR_COLUMN_WIDTH: usize = 38;
const RULE: usize = 70;

pub struct OutputGenerator;

impl OutputGenerator {
    /// Full text report for a finished scan.
    pub fn generate_report(result: &ScanResult, config: &ScanConfig, top_n: usize) -> String {
        let mut out = String::new();
        out.push_str(&format!("\n{}\n", "=".repeat(80)));
        out.push_str("📊 Repository character report\n");
        out.push_str(&"=".repeat(80));
        out.push('\n');

        out.push_str(&Self::generate_summary(result, config));
        out.push_str(&Self::generate_type_table(result, top_n));
        out.push_str(&Self::generate_dir_table(result, top_n));
        out.push_str(&Self::generate_web_breakdown(result));
        out.push_str(&Self::generate_exclusions(config));
        out
    }

    pub fn generate_summary(result: &ScanResult, config: &ScanConfig) -> String {
        let total = result.total_chars as f64;
        let average = if result.total_files > 0 {
            total / result.total_files as f64
        } else {
            0.0
        };

        let mut out = String::new();
        out.push_str("\n📈 Totals:\n");
        out.push_str(&format!("   ├─ Files counted: {}\n", group_thousands(result.total_files)));
        out.push_str(&format!("   ├─ Total chars: {}\n", group_thousands(result.total_chars)));
        out.push_str(&format!("   ├─ Skipped files: {}\n", group_thousands(result.skipped_files)));
        out.push_str(&format!(
            "   ├─ Skipped large files (>{}MB): {}\n",
            config.max_file_size_mb(),
            group_thousands(result.skipped_large_files)
        ));
        out.push_str(&format!("   └─ Excluded paths: {}\n", group_thousands(result.excluded_path_hits)));

        out.push_str("\n📊 Volume:\n");
        out.push_str(&format!("   ├─ {} thousand chars\n", format_grouped(total / 1000.0, 1)));
        out.push_str(&format!("   ├─ {} ten-thousand chars\n", format_grouped(total / 10000.0, 1)));
        out.push_str(&format!("   └─ Average per file: {} chars\n", format_grouped(average, 0)));
        out
    }

    pub fn generate_type_table(result: &ScanResult, top_n: usize) -> String {
        let mut out = String::new();
        if result.file_types.is_empty() {
            return out;
        }

        let ranked = ranked(&result.file_types);
        out.push_str(&format!("\n📁 By file type (top {}):\n", top_n));
        out.push_str(&format!("{}\n", "-".repeat(RULE)));
        out.push_str(&format!(
            "{:<10} {:<10} {:<15} {:<8} {:<10}\n",
            "Extension", "Files", "Chars", "Share", "Average"
        ));
        out.push_str(&format!("{}\n", "-".repeat(RULE)));

        for (i, (ext, tally)) in ranked.iter().take(top_n).enumerate() {
            let average = tally.chars as f64 / tally.count.max(1) as f64;
            out.push_str(&format!(
                "{:2}. {:<8} {:<10} {:<15} {:<7.1}% {:<10}\n",
                i + 1,
                ext,
                group_thousands(tally.count),
                group_thousands(tally.chars),
                share(tally.chars, result.total_chars),
                format_grouped(average, 0)
            ));
        }

        if ranked.len() > top_n {
            let mut other = Tally::default();
            for (_, tally) in &ranked[top_n..] {
                other.merge(tally);
            }
            out.push_str(&format!("{}\n", "-".repeat(RULE)));
            out.push_str(&format!(
                "   other {:>2} types {:<10} {:<15} {:<7.1}%\n",
                ranked.len() - top_n,
                group_thousands(other.count),
                group_thousands(other.chars),
                share(other.chars, result.total_chars)
            ));
        }
        out
    }

    pub fn generate_dir_table(result: &ScanResult, top_n: usize) -> String {
        let mut out = String::new();
        if result.dir_stats.is_empty() {
            return out;
        }

        out.push_str(&format!("\n📂 By directory (top {} by chars):\n", top_n));
        out.push_str(&format!("{}\n", "-".repeat(RULE)));
        out.push_str(&format!("{:<40} {:<8} {:<15} {:<8}\n", "Directory", "Files", "Chars", "Share"));
        out.push_str(&format!("{}\n", "-".repeat(RULE)));

        for (i, (dir, tally)) in ranked(&result.dir_stats).iter().take(top_n).enumerate() {
            out.push_str(&format!(
                "{:2}. {:<38} {:<8} {:<15} {:<7.1}%\n",
                i + 1,
                display_dir(dir),
                group_thousands(tally.count),
                group_thousands(tally.chars),
                share(tally.chars, result.total_chars)
            ));
        }
        out
    }

    /// Breakdown of the web-scripting group; empty when none were counted.
    pub fn generate_web_breakdown(result: &ScanResult) -> String {
        let mut out = String::new();
        let present: Vec<(&str, &Tally)> = WEB_SCRIPT_EXTENSIONS
            .iter()
            .filter_map(|ext| {
                result
                    .file_types
                    .get(*ext)
                    .filter(|t| t.count > 0)
                    .map(|t| (*ext, t))
            })
            .collect();
        if present.is_empty() {
            return out;
        }

        out.push_str("\n🔍 JavaScript/TypeScript files:\n");
        out.push_str(&format!("{}\n", "-".repeat(50)));
        out.push_str(&format!("{:<10} {:<10} {:<15} {:<8}\n", "Type", "Files", "Chars", "Share"));
        out.push_str(&format!("{}\n", "-".repeat(50)));

        let mut group = Tally::default();
        for (ext, tally) in &present {
            out.push_str(&format!(
                "  {:<8} {:<10} {:<15} {:<7.1}%\n",
                ext,
                group_thousands(tally.count),
                group_thousands(tally.chars),
                share(tally.chars, result.total_chars)
            ));
            group.merge(tally);
        }

        out.push_str(&format!("{}\n", "-".repeat(50)));
        out.push_str(&format!(
            "  {:<8} {:<10} {:<15} {:<7.1}%\n",
            "total",
            group_thousands(group.count),
            group_thousands(group.chars),
            share(group.chars, result.total_chars)
        ));
        out
    }

    pub fn generate_exclusions(config: &ScanConfig) -> String {
        let mut out = String::from("\n📋 Excluded paths:\n");
        if config.exclude_paths.is_empty() {
            out.push_str("   - (none)\n");
        }
        for path in &config.exclude_paths {
            out.push_str(&format!("   - {}\n", path));
        }
        out.push_str(&format!(
            "   - plus {} directory names and {} suffixes\n",
            config.exclude_dirs.len(),
            config.exclude_extensions.len()
        ));
        out
    }
}

/// Entries by chars descending, ties by key.
fn ranked(map: &std::collections::BTreeMap<String, Tally>) -> Vec<(&str, &Tally)> {
    let mut entries: Vec<(&str, &Tally)> = map.iter().map(|(k, v)| (k.as_str(), v)).collect();
    entries.sort_by(|a, b| b.1.chars.cmp(&a.1.chars).then_with(|| a.0.cmp(b.0)));
    entries
}

fn share(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn display_dir(dir: &str) -> String {
    if dir == ROOT_DIR_KEY {
        return "[root]".to_string();
    }
    let chars: Vec<char> = dir.chars().collect();
    if chars.len() > DIR_COLUMN_WIDTH {
        let tail: String = chars[chars.len() - (DIR_COLUMN_WIDTH - 3)..].iter().collect();
        format!("...{}", tail)
    } else {
        dir.to_string()
    }
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Fixed-point formatting with a grouped integer part, e.g. `12,345.7`.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let grouped = match int_part.parse::<u64>() {
        Ok(n) => group_thousands(n),
        Err(_) => int_part.to_string(),
    };
    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScanResult {
        let mut result = ScanResult::default();
        result.record(".py", "src", 6000);
        result.record(".py", "src/pkg", 2000);
        result.record(".js", "web", 1500);
        result.record(".ts", "web", 400);
        result.record(".md", ".", 100);
        result
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn formats_grouped_floats() {
        assert_eq!(format_grouped(12345.67, 1), "12,345.7");
        assert_eq!(format_grouped(0.0, 1), "0.0");
        assert_eq!(format_grouped(2499.6, 0), "2,500");
        assert_eq!(format_grouped(-1234.5, 1), "-1,234.5");
    }

    #[test]
    fn type_table_folds_tail_into_other() {
        let table = OutputGenerator::generate_type_table(&sample(), 2);
        assert!(table.contains(" 1. .py"));
        assert!(table.contains(" 2. .js"));
        assert!(!table.contains(" 3."));
        assert!(table.contains("other  2 types"));
        // .ts + .md = 500 chars of 10,000
        assert!(table.contains("5.0"));
    }

    #[test]
    fn dir_table_labels_root_and_truncates() {
        let mut result = sample();
        let long = "a/very/long/directory/path/that/keeps/going/on";
        result.record(".rs", long, 1);
        let table = OutputGenerator::generate_dir_table(&result, 10);
        assert!(table.contains("[root]"));
        let expected_tail: String = long.chars().skip(long.len() - 35).collect();
        assert!(table.contains(&format!("...{}", expected_tail)));
    }

    #[test]
    fn web_breakdown_only_when_present() {
        let breakdown = OutputGenerator::generate_web_breakdown(&sample());
        assert!(breakdown.contains(".js"));
        assert!(breakdown.contains(".ts"));
        assert!(!breakdown.contains(".vue"));
        assert!(breakdown.contains("1,900"));

        let mut plain = ScanResult::default();
        plain.record(".py", ".", 1);
        assert!(OutputGenerator::generate_web_breakdown(&plain).is_empty());
    }

    #[test]
    fn summary_handles_empty_scan() {
        let text = OutputGenerator::generate_summary(&ScanResult::default(), &ScanConfig::default());
        assert!(text.contains("Files counted: 0"));
        assert!(text.contains("Average per file: 0 chars"));
        assert!(text.contains(">10MB"));
    }

    #[test]
    fn full_report_lists_exclusions() {
        let report = OutputGenerator::generate_report(&sample(), &ScanConfig::default(), 15);
        assert!(report.contains("Total chars: 10,000"));
        assert!(report.contains("10.0 thousand chars"));
        assert!(report.contains("   - docs"));
    }
}
