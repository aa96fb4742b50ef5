//! Snapshot delivery
//!
//! A sink receives every completed step and the end-of-run summary. The
//! console reporter prints a human-readable trace; the JSON-lines sink writes
//! one serialized snapshot per line for a dashboard or later analysis.

use std::io::Write;

use tabled::{Table, Tabled};

use super::snapshot::{SimulationSummary, StepSnapshot};
use crate::error::Result;

pub trait SnapshotSink {
    fn publish(&mut self, snapshot: &StepSnapshot) -> Result<()>;

    fn finish(&mut self, _summary: &SimulationSummary) -> Result<()> {
        Ok(())
    }
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn publish(&mut self, _snapshot: &StepSnapshot) -> Result<()> {
        Ok(())
    }
}

/// Fans every report out to several sinks, in order
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn SnapshotSink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Box<dyn SnapshotSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl SnapshotSink for MultiSink {
    fn publish(&mut self, snapshot: &StepSnapshot) -> Result<()> {
        for sink in &mut self.sinks {
            sink.publish(snapshot)?;
        }
        Ok(())
    }

    fn finish(&mut self, summary: &SimulationSummary) -> Result<()> {
        for sink in &mut self.sinks {
            sink.finish(summary)?;
        }
        Ok(())
    }
}

/// One JSON document per line
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SnapshotSink for JsonLinesSink<W> {
    fn publish(&mut self, snapshot: &StepSnapshot) -> Result<()> {
        serde_json::to_writer(&mut self.writer, snapshot)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self, summary: &SimulationSummary) -> Result<()> {
        serde_json::to_writer(&mut self.writer, summary)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Tabled)]
struct FinalRow {
    #[tabled(rename = "Trader")]
    name: String,
    #[tabled(rename = "Final value")]
    value: String,
}

/// Step-by-step text trace
pub struct ConsoleReporter<W: Write> {
    writer: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> SnapshotSink for ConsoleReporter<W> {
    fn publish(&mut self, s: &StepSnapshot) -> Result<()> {
        let w = &mut self.writer;
        writeln!(w, "\n===== STEP {}/{} =====", s.step, s.total_steps)?;
        writeln!(w, "Market price: {:.2}", s.price)?;
        writeln!(w, "Market news:  {}", s.news)?;

        for d in &s.decisions {
            writeln!(
                w,
                "- {:<13} | action={:>4} | cash={:8.2} | pos={:3} | value={:8.2}",
                d.name, d.action, d.cash, d.pos, d.value
            )?;
        }

        let fund = &s.fund;
        writeln!(w, "\n[LLM FUND PIPELINE]")?;
        writeln!(w, "Bullish evidence:\n{}", fund.bullish)?;
        writeln!(w, "Bearish evidence:\n{}", fund.bearish)?;
        if let Some(general) = &fund.general_analysis {
            writeln!(w, "General analysis ({}):\n{}", general.stance, general.text)?;
        }
        writeln!(
            w,
            "Proposal: action={}, size={}",
            fund.proposal.action, fund.proposal.size
        )?;
        writeln!(w, "Rationale: {}", fund.proposal.rationale)?;
        for a in &fund.risk_assessments {
            writeln!(
                w,
                "- {}: approved={}, suggested_size={}",
                a.reviewer, a.approved, a.suggested_size
            )?;
            writeln!(w, "  comment: {}", a.comment)?;
        }
        let d = &fund.manager_decision;
        writeln!(
            w,
            "Manager decision: approved={}, final_action={}, final_size={}",
            d.approved, d.final_action, d.final_size
        )?;
        writeln!(w, "Manager comment: {}", d.comment)?;
        writeln!(
            w,
            "LLM Fund portfolio: cash={:.2}, pos={}, value={:.2}",
            fund.portfolio.cash, fund.portfolio.pos, fund.portfolio.value
        )?;
        Ok(())
    }

    fn finish(&mut self, summary: &SimulationSummary) -> Result<()> {
        let rows: Vec<FinalRow> = summary
            .participants
            .iter()
            .map(|p| FinalRow {
                name: p.name.clone(),
                value: format!("{:.2}", p.value),
            })
            .collect();

        writeln!(self.writer, "\n===== FINAL RESULTS =====")?;
        writeln!(self.writer, "Final price: {:.2}", summary.final_price)?;
        writeln!(self.writer, "{}", Table::new(rows))?;
        if let Some(leader) = summary.leader() {
            writeln!(self.writer, "Leader: {} ({:.2})", leader.name, leader.value)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
