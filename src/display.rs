//! Terminal rendering.
//!
//! Owns everything time- or layout-related about showing results: tables,
//! zero-padded balls and the ball-by-ball reveal of a generated game.

use std::io::{self, Write};
use std::time::Duration;

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::generate::Generated;
use crate::models::{format_number, Category, StatsSnapshot};
use crate::provider::LoadedStats;

/// `LABEL  05 10 53 ...`
pub fn ranked_line(label: &str, numbers: &[u8]) -> String {
    let balls = numbers
        .iter()
        .map(|&n| format_number(n))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{:<8} {}", label, balls)
}

/// Per-number table, most frequent first.
pub fn stats_table(snapshot: &StatsSnapshot) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Number", "Frequency", "Last seen", "Delay", "Tags"]);

    let mut rows = snapshot.rows();
    rows.sort_by(|a, b| b.frequency.cmp(&a.frequency));

    for row in &rows {
        let categories = snapshot.categories(row.number);
        let color = match categories.first() {
            Some(Category::Hot) => Color::Red,
            Some(Category::Cold) => Color::Blue,
            Some(Category::Overdue) => Color::Yellow,
            None => Color::Reset,
        };
        let tags = categories
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let last_seen = row
            .last_seen
            .map(|c| c.to_string())
            .unwrap_or_else(|| "never".to_string());

        table.add_row(vec![
            Cell::new(format_number(row.number)).fg(color),
            Cell::new(row.frequency.to_string()),
            Cell::new(last_seen),
            Cell::new(row.delay.to_string()),
            Cell::new(tags),
        ]);
    }

    table
}

pub fn display_notice(notice: &str) {
    println!("⚠  {}", notice);
}

pub fn display_stats(loaded: &LoadedStats, full_table: bool) {
    if let Some(notice) = &loaded.notice {
        display_notice(notice);
    }

    let Some(snapshot) = &loaded.snapshot else {
        println!("No statistics available.");
        return;
    };

    println!(
        "\n📊 {} contests (latest {}) from {}",
        snapshot.total_contests, snapshot.current_contest, loaded.origin
    );
    if let Some(id) = &loaded.dataset_id {
        println!("   dataset {}, loaded {}", id, loaded.loaded_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!();
    println!("{}", ranked_line("Hot", &snapshot.hot));
    println!("{}", ranked_line("Cold", &snapshot.cold));
    println!("{}", ranked_line("Overdue", &snapshot.overdue));

    if full_table {
        println!("\n{}", stats_table(snapshot));
    }
}

/// `#1 [smart]  04 - 10 - 23 - 33 - 53 - 60`
pub fn selection_line(index: usize, generated: &Generated) -> String {
    format!("#{} [{}]  {}", index, generated.mode, generated.selection)
}

/// Print a game one ball at a time, pausing `interval` between balls.
pub async fn reveal_selection<W: Write>(
    out: &mut W,
    index: usize,
    generated: &Generated,
    interval: Duration,
) -> io::Result<()> {
    write!(out, "#{} [{}] ", index, generated.mode)?;
    out.flush()?;

    for (i, token) in generated.selection.tokens().iter().enumerate() {
        if i > 0 {
            write!(out, " -")?;
        }
        write!(out, " {}", token)?;
        out.flush()?;
        if !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
    }

    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::compute_stats;
    use crate::generate::GenerationMode;
    use crate::models::{DrawRecord, Selection};

    fn generated() -> Generated {
        Generated {
            selection: Selection::new(&[60, 4, 10, 23, 33, 53]).unwrap(),
            mode: GenerationMode::Smart,
        }
    }

    #[test]
    fn test_ranked_line() {
        assert_eq!(
            ranked_line("Hot", &[5, 10, 53]),
            "Hot      05 10 53"
        );
    }

    #[test]
    fn test_selection_line() {
        assert_eq!(
            selection_line(1, &generated()),
            "#1 [smart]  04 - 10 - 23 - 33 - 53 - 60"
        );
    }

    #[test]
    fn test_stats_table_has_all_numbers() {
        let snapshot = compute_stats(&[DrawRecord::new(Some(1), [1, 2, 3, 4, 5, 6])]);
        let rendered = stats_table(&snapshot).to_string();

        assert!(rendered.contains("never"));
        assert!(rendered.contains("HOT"));
        // one row per number
        assert_eq!(stats_table(&snapshot).row_iter().count(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_selection() {
        let mut out = Vec::new();
        let start = tokio::time::Instant::now();

        reveal_selection(&mut out, 2, &generated(), Duration::from_millis(200))
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "#2 [smart]  04 - 10 - 23 - 33 - 53 - 60\n");
        assert!(start.elapsed() >= Duration::from_millis(1200));
    }

    #[tokio::test]
    async fn test_reveal_selection_no_interval() {
        let mut out = Vec::new();
        reveal_selection(&mut out, 1, &generated(), Duration::ZERO)
            .await
            .unwrap();
        assert!(String::from_utf8(out).unwrap().ends_with("60\n"));
    }
}
