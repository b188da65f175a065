use crate::gate::QualityTier;
use crate::report::progress::{ProgressEvent, ProgressSink};
use crate::report::TierCounts;
use std::sync::Arc;

/// Width of the question preview in progress lines.
pub const PREVIEW_CHARS: usize = 80;

/// One line per graded record. Deterministic, unit-testable.
#[must_use]
pub fn format_record_line(ev: &ProgressEvent) -> String {
    let scores = format!("(A:{}, S:{})", ev.accuracy, ev.style);
    let verdict = match ev.tier {
        Some(QualityTier::Premium) => format!("✅ PREMIUM {}", scores),
        Some(QualityTier::Acceptable) => format!("✓  acceptable {}", scores),
        Some(QualityTier::Rejected) => format!("✗  rejected {}", scores),
        None => format!(
            "⚠️  unevaluated after {} attempt(s): {}",
            ev.attempts,
            ev.reason.as_deref().unwrap_or("unknown")
        ),
    };
    format!(
        "[{}/{}] #{} {}\n    Q: {}",
        ev.done,
        ev.total,
        ev.index + 1,
        verdict,
        ev.question_preview
    )
}

/// Sink that prints every record line to stderr.
pub fn default_progress_sink() -> ProgressSink {
    Arc::new(|ev: ProgressEvent| {
        eprintln!("{}", format_record_line(&ev));
    })
}

#[must_use]
pub fn format_summary(counts: &TierCounts) -> String {
    let mut out = String::new();
    out.push_str("Final statistics:\n");
    out.push_str(&format!("  Input records:      {}\n", counts.total));
    out.push_str(&format!("  Premium records:    {}\n", counts.premium));
    out.push_str(&format!(
        "  Premium yield:      {:.1}%\n",
        counts.premium_yield_pct()
    ));
    out.push_str(&format!("  Acceptable:         {}\n", counts.acceptable));
    out.push_str(&format!("  Rejected:           {}\n", counts.rejected));
    out.push_str(&format!("  Unevaluated:        {}", counts.unevaluated));
    out
}

pub fn print_summary(counts: &TierCounts) {
    eprintln!();
    eprintln!("{}", format_summary(counts));
}
