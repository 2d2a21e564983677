//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use medinstruct_search::MatchResult;
use owo_colors::OwoColorize;

/// Width of the score bar, in cells
pub const SCORE_BAR_WIDTH: usize = 20;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(console::measure_text_width(message)));
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Format a similarity score as a percentage
pub fn format_score(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Horizontal bar filled in proportion to `score`
pub fn score_bar(score: f64, width: usize) -> String {
    let filled = ((score.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Cut `text` to `width` columns, marking the cut with an ellipsis
pub fn truncate(text: &str, width: usize) -> String {
    console::truncate_str(text, width, "…").into_owned()
}

/// Render one result as plain lines: rank, name, score, variant, instructions
pub fn render_match(rank: usize, result: &MatchResult) -> String {
    let mut out = format!(
        "{:>2}. {}  {} {}\n    matched: {}\n",
        rank,
        result.name,
        format_score(result.score),
        score_bar(result.score, SCORE_BAR_WIDTH),
        result.matched_variant,
    );
    for line in result.payload.lines() {
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Print a list of results under a header
pub fn print_matches(title: &str, results: &[MatchResult]) {
    Status::header(&format!(
        "{} ({})",
        title,
        format_count(results.len(), "match", "matches")
    ));

    for (i, result) in results.iter().enumerate() {
        let rendered = render_match(i + 1, result);
        let mut lines = rendered.lines();
        if let Some(first) = lines.next() {
            println!("{}", first.bold());
        }
        for line in lines {
            println!("{}", line);
        }
        println!();
    }
}
