//! Claude ledger fetcher.
//!
//! The expensive provider: eight sequential subprocess invocations per
//! fetch (one 30-day summary plus seven trailing windows for the daily
//! history). Callers must schedule accordingly.

use async_trait::async_trait;
use chrono::{Days, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use quotabar_core::{
    DailyUsageEntry, DetailedUsage, ProviderId, ProviderResult, ProviderType, UsageResult,
};
use quotabar_fetch::{FetchContext, FetchError, UsageProvider};

use super::parser::{parse_cumulative_total, parse_usage_summary};

/// Days of trailing history derived per fetch.
const HISTORY_DAYS: usize = 7;

/// Window length of the main summary invocation.
const SUMMARY_WINDOW_DAYS: u32 = 30;

// ============================================================================
// Ledger Config
// ============================================================================

/// Configuration for the ledger provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Name of the external statistics command.
    pub command: String,
    /// Monthly budget the utilization percentage is derived against, USD.
    pub monthly_budget_usd: f64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            command: "ccusage".to_string(),
            monthly_budget_usd: 200.0,
        }
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Local-CLI-ledger provider for Claude usage.
#[derive(Debug, Clone)]
pub struct ClaudeLedgerProvider {
    config: LedgerConfig,
}

impl ClaudeLedgerProvider {
    /// Creates a provider with the given configuration.
    pub fn new(config: LedgerConfig) -> Self {
        Self { config }
    }

    /// Runs one windowed summary invocation and returns its stdout.
    async fn run_summary(&self, ctx: &FetchContext, days: u32) -> Result<String, FetchError> {
        let days_arg = days.to_string();
        let args = ["summary", "--days", days_arg.as_str()];

        let output = ctx
            .process
            .run(&self.config.command, &args, ctx.timeout())
            .await?;
        let stdout = output.stdout_if_success()?;
        Ok(stdout.to_string())
    }
}

#[async_trait]
impl UsageProvider for ClaudeLedgerProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Claude
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::PayAsYouGo
    }

    #[instrument(skip(self, ctx), fields(command = %self.config.command))]
    async fn fetch(&self, ctx: &FetchContext) -> Result<ProviderResult, FetchError> {
        if !ctx.process.command_exists(&self.config.command) {
            return Err(FetchError::Configuration(format!(
                "Ledger command not found: {}",
                self.config.command
            )));
        }

        let summary = self.run_summary(ctx, SUMMARY_WINDOW_DAYS).await?;
        let stats = parse_usage_summary(&summary)?;

        let utilization = if self.config.monthly_budget_usd > 0.0 {
            ((stats.total_cost / self.config.monthly_budget_usd) * 100.0).min(100.0)
        } else {
            0.0
        };

        // Seven more windows, one per trailing length, sequentially within
        // this task. Any failure fails the whole fetch.
        let mut cumulative = Vec::with_capacity(HISTORY_DAYS);
        for window in 1..=HISTORY_DAYS {
            let text = self.run_summary(ctx, window as u32).await?;
            cumulative.push(parse_cumulative_total(&text)?);
            debug!(window, total = cumulative[window - 1], "Window total parsed");
        }
        let daily_costs = derive_daily_costs(&cumulative);

        let mut details = DetailedUsage::new();
        details.model_costs = stats.model_costs.clone();
        details.session_count = Some(stats.sessions);
        details.message_count = Some(stats.messages);
        details.avg_daily_cost = Some(stats.avg_cost_per_day);

        let today = Utc::now().date_naive();
        for (window, cost) in daily_costs.iter().enumerate() {
            // The N-day window's marginal day lies N-1 days before today.
            let Some(date) = today.checked_sub_days(Days::new(window as u64)) else {
                continue;
            };
            let mut entry = DailyUsageEntry::new(date);
            entry.cost_usd = Some(*cost);
            details.push_day(entry);
        }

        let mut usage = UsageResult::PayAsYouGo {
            utilization_percent: utilization,
            cost_so_far: stats.total_cost,
            resets_at: None,
        };
        usage.sanitize();

        info!(
            total_cost = stats.total_cost,
            utilization = utilization,
            "Claude ledger fetched"
        );

        Ok(ProviderResult::with_details(usage, details))
    }
}

// ============================================================================
// Daily History Derivation
// ============================================================================

/// Derives per-day costs from cumulative window totals.
///
/// `cumulative[i]` is the total over the trailing `i + 1` days; each
/// day's cost is the difference between successive windows, with the
/// 1-day window taken as-is. Differences are left unclamped: a ledger
/// that reset mid-period would surface as a negative day, and upstream
/// behavior there is unconfirmed.
fn derive_daily_costs(cumulative: &[f64]) -> Vec<f64> {
    cumulative
        .iter()
        .enumerate()
        .map(|(i, total)| {
            if i == 0 {
                *total
            } else {
                total - cumulative[i - 1]
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quotabar_fetch::{CommandOutput, CommandRunner, ProcessError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_derive_daily_costs() {
        let cumulative = [1.0, 2.5, 2.5, 4.0, 4.0, 4.0, 9.0];
        let daily = derive_daily_costs(&cumulative);
        assert_eq!(daily, vec![1.0, 1.5, 0.0, 1.5, 0.0, 0.0, 5.0]);
    }

    #[test]
    fn test_derive_daily_costs_unclamped_on_reset() {
        // A mid-period ledger reset shows up as a negative day; the
        // derivation does not hide it.
        let cumulative = [3.0, 1.0];
        assert_eq!(derive_daily_costs(&cumulative), vec![3.0, -2.0]);
    }

    /// Scripted runner returning one canned table per window length.
    struct ScriptedRunner {
        calls: AtomicUsize,
    }

    impl ScriptedRunner {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn table(days: u32) -> String {
            // Cumulative totals grow with the window; windows 1..=7 follow
            // the derivation fixture, the 30-day window is the summary.
            let total = match days {
                1 => 1.0,
                2 => 2.5,
                3 => 2.5,
                4 => 4.0,
                5 => 4.0,
                6 => 4.0,
                7 => 9.0,
                _ => 12.34,
            };
            format!(
                "Total Cost ${total}\nAvg Cost/Day $0.41\nSessions 30\nMessages 120\n\
                 claude-sonnet-4 $8.12\n"
            )
        }
    }

    #[async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn run(
            &self,
            _cmd: &str,
            args: &[&str],
            _timeout: Duration,
        ) -> Result<CommandOutput, ProcessError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let days: u32 = args[2].parse().unwrap();
            Ok(CommandOutput {
                stdout: Self::table(days),
                stderr: String::new(),
                exit_code: 0,
                duration: Duration::from_millis(5),
            })
        }

        fn command_exists(&self, _cmd: &str) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_fetch_runs_eight_invocations() {
        let runner = Arc::new(ScriptedRunner::new());
        let ctx = quotabar_fetch::FetchContext::builder()
            .process(runner.clone())
            .build();

        let provider = ClaudeLedgerProvider::new(LedgerConfig::default());
        let result = provider.fetch(&ctx).await.unwrap();

        assert_eq!(runner.calls.load(Ordering::SeqCst), 8);

        match result.usage {
            UsageResult::PayAsYouGo {
                utilization_percent,
                cost_so_far,
                ..
            } => {
                assert_eq!(cost_so_far, 12.34);
                assert!((utilization_percent - 6.17).abs() < 1e-9);
            }
            UsageResult::Metered { .. } => panic!("wrong variant"),
        }

        let details = result.details.unwrap();
        assert_eq!(details.session_count, Some(30));
        assert_eq!(details.message_count, Some(120));
        assert_eq!(details.daily.len(), 7);

        // Ascending by date; the oldest day carries the 7-day window's
        // marginal cost.
        let costs: Vec<f64> = details.daily.iter().map(|d| d.cost_usd.unwrap()).collect();
        assert_eq!(costs, vec![5.0, 0.0, 0.0, 1.5, 0.0, 1.5, 1.0]);
    }

    /// Runner that fails the sixth invocation.
    struct FailingRunner {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CommandRunner for FailingRunner {
        async fn run(
            &self,
            _cmd: &str,
            args: &[&str],
            _timeout: Duration,
        ) -> Result<CommandOutput, ProcessError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 5 {
                return Ok(CommandOutput {
                    stdout: String::new(),
                    stderr: "ledger unavailable".to_string(),
                    exit_code: 1,
                    duration: Duration::from_millis(1),
                });
            }
            let days: u32 = args[2].parse().unwrap();
            Ok(CommandOutput {
                stdout: ScriptedRunner::table(days),
                stderr: String::new(),
                exit_code: 0,
                duration: Duration::from_millis(1),
            })
        }

        fn command_exists(&self, _cmd: &str) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_any_window_failure_fails_the_fetch() {
        let ctx = quotabar_fetch::FetchContext::builder()
            .process(Arc::new(FailingRunner {
                calls: AtomicUsize::new(0),
            }))
            .build();

        let provider = ClaudeLedgerProvider::new(LedgerConfig::default());
        let err = provider.fetch(&ctx).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    /// Runner that claims the command does not exist.
    struct AbsentRunner;

    #[async_trait]
    impl CommandRunner for AbsentRunner {
        async fn run(
            &self,
            cmd: &str,
            _args: &[&str],
            _timeout: Duration,
        ) -> Result<CommandOutput, ProcessError> {
            Err(ProcessError::NotFound(cmd.to_string()))
        }

        fn command_exists(&self, _cmd: &str) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_missing_binary_is_configuration() {
        let ctx = quotabar_fetch::FetchContext::builder()
            .process(Arc::new(AbsentRunner))
            .build();

        let provider = ClaudeLedgerProvider::new(LedgerConfig::default());
        let err = provider.fetch(&ctx).await.unwrap_err();
        assert!(matches!(err, FetchError::Configuration(_)));
    }
}
