//! Incremental transcript rendering

use colored::*;
use std::io::{self, Write};
use std::time::Duration;
use stepwise_core::{ReasoningUpdate, StepRecord};

/// `Total thinking time: 2.53 seconds`
pub fn format_total(total: Duration) -> String {
    format!("Total thinking time: {:.2} seconds", total.as_secs_f64())
}

/// Prints each record of a reasoning stream once, as it arrives
#[derive(Debug, Default)]
pub struct TranscriptRenderer {
    printed: usize,
}

impl TranscriptRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records written so far
    pub fn printed(&self) -> usize {
        self.printed
    }

    /// Write the records `update` adds over what was already printed
    pub fn render(&mut self, update: &ReasoningUpdate, out: &mut impl Write) -> io::Result<()> {
        for record in update.steps.iter().skip(self.printed) {
            write_record(record, out)?;
        }
        self.printed = self.printed.max(update.steps.len());

        if let Some(total) = update.total_elapsed {
            writeln!(out, "{} {}", "⏱".dimmed(), format_total(total).dimmed())?;
        }
        out.flush()
    }
}

fn write_record(record: &StepRecord, out: &mut impl Write) -> io::Result<()> {
    if record.is_final_answer() {
        writeln!(out)?;
        writeln!(out, "🎯 {}", record.label.green().bold())?;
        writeln!(out, "{}", record.content)?;
    } else {
        writeln!(
            out,
            "📝 {} {}",
            record.label.cyan().bold(),
            format!("({:.2}s)", record.elapsed.as_secs_f64()).dimmed()
        )?;
        for line in record.content.lines() {
            writeln!(out, "   {}", line)?;
        }
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: &str, content: &str) -> StepRecord {
        StepRecord::new(label, content, Duration::from_millis(500))
    }

    fn render_all(updates: &[ReasoningUpdate]) -> String {
        let mut renderer = TranscriptRenderer::new();
        let mut out = Vec::new();
        for update in updates {
            renderer.render(update, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn prints_each_record_once() {
        let first = ReasoningUpdate::partial(vec![record("Step 1: Spell", "s-t-r-a-w")]);
        let last = ReasoningUpdate::complete(
            vec![
                record("Step 1: Spell", "s-t-r-a-w"),
                record("Step 2: Count", "three"),
                record("Final Answer", "3"),
            ],
            Duration::from_millis(2531),
        );

        let output = render_all(&[first, last]);

        assert_eq!(output.matches("Step 1: Spell").count(), 1);
        assert!(output.contains("Step 2: Count"));
        assert!(output.contains("🎯"));
        assert!(output.contains("Total thinking time: 2.53 seconds"));
    }

    #[test]
    fn total_is_only_printed_for_terminal_update() {
        let output = render_all(&[ReasoningUpdate::partial(vec![record("Step 1: a", "b")])]);
        assert!(!output.contains("Total thinking time"));
    }

    #[test]
    fn formats_total_with_two_decimals() {
        assert_eq!(format_total(Duration::from_secs(3)), "Total thinking time: 3.00 seconds");
    }
}
