//! Text output formatting with progress bars and colors.

use chrono::Duration;

use quotabar_core::{ProviderId, ProviderResult, UsageResult};
use quotabar_engine::UpdatePayload;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

// Progress bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 10,
        }
    }

    // ========================================================================
    // Payload Rendering
    // ========================================================================

    /// Formats a terminal payload as a multi-line block.
    pub fn format_payload(&self, id: ProviderId, payload: &UpdatePayload) -> String {
        let header = self.bold(id.display_name());
        match payload {
            UpdatePayload::Refreshing => format!("{header}\n  refreshing..."),
            UpdatePayload::Fresh(result) => {
                format!("{header}\n{}", self.format_result(result))
            }
            UpdatePayload::Cached { snapshot, reason } => {
                format!(
                    "{header} {}\n{}",
                    self.dim(&format!("[{} {}]", reason.tag(), humanize_age(snapshot.age()))),
                    self.format_result(&snapshot.result)
                )
            }
            UpdatePayload::NotSignedIn => {
                format!("{header}\n  {}", self.yellow("not signed in"))
            }
            UpdatePayload::Failed(message) => {
                format!("{header}\n  {}", self.red(&format!("error: {message}")))
            }
        }
    }

    /// Formats a payload as one line, for streaming output.
    pub fn format_line(&self, id: ProviderId, payload: &UpdatePayload) -> String {
        let name = id.display_name();
        match payload {
            UpdatePayload::Refreshing => format!("{name}: refreshing"),
            UpdatePayload::Fresh(result) => {
                format!("{name}: {}", self.usage_summary(&result.usage))
            }
            UpdatePayload::Cached { snapshot, reason } => format!(
                "{name}: {} [{} {}]",
                self.usage_summary(&snapshot.result.usage),
                reason.tag(),
                humanize_age(snapshot.age())
            ),
            UpdatePayload::NotSignedIn => format!("{name}: not signed in"),
            UpdatePayload::Failed(message) => format!("{name}: error: {message}"),
        }
    }

    /// Formats a full result with its detail breakdown.
    fn format_result(&self, result: &ProviderResult) -> String {
        let mut lines = vec![format!(
            "  {} {}",
            self.progress_bar(result.usage.used_percent()),
            self.usage_summary(&result.usage)
        )];

        if let Some(details) = &result.details {
            if let (Some(sessions), Some(messages)) =
                (details.session_count, details.message_count)
            {
                lines.push(format!("  {sessions} sessions, {messages} messages"));
            }
            if let Some(avg) = details.avg_daily_cost {
                lines.push(format!("  avg ${avg:.2}/day"));
            }
            if !details.model_costs.is_empty() {
                let mut models: Vec<_> = details.model_costs.iter().collect();
                models.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
                for (model, cost) in models.iter().take(3) {
                    lines.push(format!("  {model:<24} ${cost:.2}"));
                }
            }
            if !details.daily.is_empty() {
                lines.push(format!(
                    "  {} days of history",
                    self.dim(&details.daily.len().to_string())
                ));
            }
        }

        lines.join("\n")
    }

    /// One-line usage summary.
    fn usage_summary(&self, usage: &UsageResult) -> String {
        let percent = usage.used_percent();
        let colored = self.color_for_percent(percent, &format!("{percent:.0}%"));
        match usage {
            UsageResult::Metered { used, limit, .. } => {
                if *limit == 0 {
                    format!("{used} requests used (no limit info)")
                } else {
                    format!("{colored} ({used}/{limit} requests)")
                }
            }
            UsageResult::PayAsYouGo { cost_so_far, .. } => {
                format!("{colored} (${cost_so_far:.2})")
            }
        }
    }

    /// Renders a usage progress bar.
    fn progress_bar(&self, used_percent: f64) -> String {
        let filled =
            ((used_percent / 100.0) * self.bar_width as f64).round() as usize;
        let filled = filled.min(self.bar_width);
        let bar: String = std::iter::repeat(BAR_FULL)
            .take(filled)
            .chain(std::iter::repeat(BAR_EMPTY).take(self.bar_width - filled))
            .collect();
        self.color_for_percent(used_percent, &bar)
    }

    // ========================================================================
    // Color Helpers
    // ========================================================================

    fn color_for_percent(&self, used_percent: f64, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }
        let color = if used_percent >= 90.0 {
            RED
        } else if used_percent >= 70.0 {
            YELLOW
        } else {
            GREEN
        };
        format!("{color}{text}{RESET}")
    }

    fn bold(&self, text: &str) -> String {
        if self.use_colors {
            format!("{BOLD}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.use_colors {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn yellow(&self, text: &str) -> String {
        if self.use_colors {
            format!("{YELLOW}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn red(&self, text: &str) -> String {
        if self.use_colors {
            format!("{RED}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Humanizes a snapshot age.
fn humanize_age(age: Duration) -> String {
    let minutes = age.num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m old")
    } else if minutes < 24 * 60 {
        format!("{}h old", minutes / 60)
    } else {
        format!("{}d old", minutes / (24 * 60))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quotabar_core::CachedSnapshot;
    use quotabar_engine::StaleReason;

    fn payg(percent: f64, cost: f64) -> ProviderResult {
        ProviderResult::new(UsageResult::PayAsYouGo {
            utilization_percent: percent,
            cost_so_far: cost,
            resets_at: None,
        })
    }

    #[test]
    fn test_fresh_plain_text() {
        let f = TextFormatter::new(false);
        let out = f.format_payload(ProviderId::Claude, &UpdatePayload::Fresh(payg(6.0, 12.34)));

        assert!(out.starts_with("Claude"));
        assert!(out.contains("6%"));
        assert!(out.contains("$12.34"));
        // No escape codes without colors.
        assert!(!out.contains("\x1b["));
    }

    #[test]
    fn test_metered_unknown_limit_text() {
        let f = TextFormatter::new(false);
        let result = ProviderResult::new(UsageResult::Metered {
            used: 45,
            limit: 0,
            resets_at: None,
        });
        let out = f.format_payload(ProviderId::Cursor, &UpdatePayload::Fresh(result));

        // Limit 0 reads as "no limit info", never as zero quota.
        assert!(out.contains("no limit info"));
        assert!(!out.contains("45/0"));
    }

    #[test]
    fn test_cached_is_marked_stale() {
        let f = TextFormatter::new(false);
        let mut snapshot = CachedSnapshot::new(payg(50.0, 10.0));
        snapshot.captured_at = chrono::Utc::now() - Duration::hours(3);

        let out = f.format_payload(
            ProviderId::Cursor,
            &UpdatePayload::Cached {
                snapshot,
                reason: StaleReason::Unauthenticated,
            },
        );

        assert!(out.contains("stale/unauthenticated"));
        assert!(out.contains("3h old"));
    }

    #[test]
    fn test_not_signed_in_and_failed() {
        let f = TextFormatter::new(false);

        let out = f.format_payload(ProviderId::Cursor, &UpdatePayload::NotSignedIn);
        assert!(out.contains("not signed in"));

        let out = f.format_payload(
            ProviderId::OpenRouter,
            &UpdatePayload::Failed("HTTP status 503".to_string()),
        );
        assert!(out.contains("error: HTTP status 503"));
    }

    #[test]
    fn test_format_line() {
        let f = TextFormatter::new(false);
        let line = f.format_line(ProviderId::OpenRouter, &UpdatePayload::Fresh(payg(25.0, 5.0)));
        assert_eq!(line, "OpenRouter: 25% ($5.00)");
    }

    #[test]
    fn test_humanize_age() {
        assert_eq!(humanize_age(Duration::seconds(10)), "just now");
        assert_eq!(humanize_age(Duration::minutes(5)), "5m old");
        assert_eq!(humanize_age(Duration::hours(2)), "2h old");
        assert_eq!(humanize_age(Duration::days(3)), "3d old");
    }
}
