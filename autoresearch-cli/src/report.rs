//! Console report for a finished run

use autoresearch_core::pipeline::RunResult;
use std::fmt;

const WIDE: usize = 70;

/// Trimmed answer, or the default topic if the answer is blank
pub fn choose_topic(answer: &str, default_topic: &str) -> String {
    match answer.trim() {
        "" => default_topic.to_string(),
        topic => topic.to_string(),
    }
}

/// Human-readable summary of a run
pub struct Report<'a>(pub &'a RunResult);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let run = self.0;
        let rule = "=".repeat(WIDE);
        let thin = "-".repeat(WIDE);

        writeln!(f, "\n{rule}")?;
        writeln!(f, "RESEARCH PROJECT COMPLETE")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Topic: {}", run.topic)?;
        writeln!(f, "Start Time: {}", run.started_at.format("%I:%M:%S %p"))?;
        writeln!(f, "Total Time: {:.1} seconds", run.timings.total.as_secs_f64())?;
        writeln!(f, "Breakdown:")?;
        writeln!(f, "   Phase 1 (Parallel): {:.1}s", run.timings.parallel.as_secs_f64())?;
        writeln!(f, "   Phase 2 (Review): {:.1}s", run.timings.review.as_secs_f64())?;
        writeln!(f, "   Phase 3 (Writing): {:.1}s", run.timings.writing.as_secs_f64())?;
        writeln!(f, "Agents Used: {}", run.agent_results().len())?;
        writeln!(f, "Memories Stored: {}", run.memory.len())?;
        writeln!(f, "Paper Location: {}", run.paper.filename.display())?;
        writeln!(f, "{rule}")?;

        writeln!(f, "\n{rule}")?;
        writeln!(f, "MEMORY BANK")?;
        writeln!(f, "{rule}")?;
        for (i, entry) in run.memory.iter().enumerate() {
            writeln!(f, "\n{}. [{}] at {}", i + 1, entry.agent_name, entry.display_time())?;
            writeln!(f, "   {}", entry.note)?;
        }

        writeln!(f, "\n{rule}")?;
        writeln!(f, "DETAILED RESULTS")?;
        writeln!(f, "{rule}")?;
        for (heading, body) in [
            ("LITERATURE REVIEW", run.library.analysis.as_str()),
            ("EXPERIMENTS", run.science.design.as_str()),
            ("PEER REVIEW", run.review.review.as_str()),
            ("FINAL PAPER", run.paper.paper.as_str()),
        ] {
            writeln!(f, "\n{heading}:\n{thin}\n{body}")?;
        }

        writeln!(f, "\n{rule}")?;
        writeln!(f, "Full paper saved to: {}", run.paper.filename.display())?;
        writeln!(f, "{rule}")
    }
}
