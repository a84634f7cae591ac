// ═══════════════════════════════════════════════════════════════════
// REMINDER SCHEDULER — Background job que processa reminders
// ═══════════════════════════════════════════════════════════════════
//
// Every cycle scans the whole reminder collection and evaluates two
// time windows per record against wall-clock time:
//   - pre-deadline alert:  D - 1h <= now < D   -> "due in 1 hour"
//   - due:                 |D - now| < 1 min   -> "due now"
// Each window fires at most once per reminder, guarded by the persisted
// pre_notified / due_notified flags.
//
// Configuração via env:
//   REMINDER_CHECK_INTERVAL_SECS  — intervalo do loop (default: 60s)
//   REMINDER_SCHEDULER_ENABLED    — "true" para ativar (default: true)
//

use crate::models::{Reminder, ReminderFlag};
use crate::services::telegram_service::NotificationSender;
use crate::state::AppState;
use crate::store::{ReminderStore, UserStore};
use chrono::{DateTime, Utc};
use std::env;
use tokio::time::{interval, Duration};

/// Intervalo padrão do scheduler em segundos
const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Outcome counters for one cycle, for the summary log line.
#[derive(Debug, Default)]
pub struct CycleResult {
    pub total: usize,
    pub pre_sent: usize,
    pub due_sent: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Inicia o scheduler de reminders em background.
///
/// Runs an immediate first cycle, then one cycle per interval tick.
/// Cycles run strictly one after another — the loop awaits each cycle
/// before asking for the next tick, so a slow pass delays the next
/// instead of overlapping it (the interval is "at least this often").
pub async fn start_reminder_scheduler(state: AppState) {
    let enabled = env::var("REMINDER_SCHEDULER_ENABLED").unwrap_or_else(|_| "true".to_string());

    if enabled.to_lowercase() != "true" && enabled != "1" {
        log::info!(
            "⏸️  Reminder scheduler DISABLED (REMINDER_SCHEDULER_ENABLED={})",
            enabled
        );
        return;
    }

    let interval_secs: u64 = env::var("REMINDER_CHECK_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_INTERVAL_SECS)
        .max(5); // Mínimo 5 segundos para evitar sobrecarga

    log::info!("📅 Starting reminder scheduler (interval: {}s)", interval_secs);

    tokio::spawn(async move {
        log::info!("📅 Reminder scheduler: running initial cycle...");
        run_cycle_logged(&state, 0).await;

        let mut tick_interval = interval(Duration::from_secs(interval_secs));
        // First tick completes immediately; skip it so the initial cycle
        // above is not doubled.
        tick_interval.tick().await;

        let mut cycle_count: u64 = 0;
        loop {
            tick_interval.tick().await;
            cycle_count += 1;
            run_cycle_logged(&state, cycle_count).await;
        }
    });

    log::info!("✅ Reminder scheduler started successfully");
}

/// Executa um ciclo com timing e summary log
async fn run_cycle_logged(state: &AppState, cycle: u64) {
    let start = std::time::Instant::now();
    log::debug!("📅 Reminder cycle #{} starting...", cycle);

    let result = run_reminder_cycle(
        state.users.as_ref(),
        state.reminders.as_ref(),
        state.notifier.as_ref(),
        Utc::now(),
    )
    .await;

    let elapsed = start.elapsed();

    if result.pre_sent > 0 || result.due_sent > 0 || result.errors > 0 {
        log::info!(
            "📅 Cycle #{}: {} reminders, {} pre-alerts, {} due, {} skipped, {} errors ({}ms)",
            cycle,
            result.total,
            result.pre_sent,
            result.due_sent,
            result.skipped,
            result.errors,
            elapsed.as_millis()
        );
    } else {
        log::debug!(
            "📅 Cycle #{}: {} reminders, nothing due ({}ms)",
            cycle,
            result.total,
            elapsed.as_millis()
        );
    }
}

/// One full evaluation pass over the reminder collection.
///
/// `now` is injected so the window logic is testable at fixed instants.
/// A failure on one reminder never aborts the pass; each record is
/// processed independently.
pub async fn run_reminder_cycle(
    users: &dyn UserStore,
    reminders: &dyn ReminderStore,
    notifier: &dyn NotificationSender,
    now: DateTime<Utc>,
) -> CycleResult {
    let mut result = CycleResult::default();

    let all = match reminders.find_all().await {
        Ok(all) => all,
        Err(e) => {
            log::error!("❌ Reminder scan failed: {}", e);
            result.errors += 1;
            return result;
        }
    };

    result.total = all.len();

    for reminder in &all {
        process_reminder(users, reminders, notifier, reminder, now, &mut result).await;
    }

    result
}

async fn process_reminder(
    users: &dyn UserStore,
    reminders: &dyn ReminderStore,
    notifier: &dyn NotificationSender,
    reminder: &Reminder,
    now: DateTime<Utc>,
    result: &mut CycleResult,
) {
    let id = match reminder.id {
        Some(oid) => oid.to_hex(),
        None => {
            result.skipped += 1;
            return;
        }
    };

    // 1. Malformed deadline: skip this record, never the whole cycle.
    let deadline = match reminder.deadline() {
        Some(deadline) => deadline,
        None => {
            log::warn!(
                "⚠️  Reminder {} has unparseable timestamp '{}', skipping",
                id,
                reminder.timestamp
            );
            result.skipped += 1;
            return;
        }
    };

    // 2. Resolve the owner's chat target. No user record or no linked
    //    chat is a no-op, not an error.
    let chat_id = match users.find_by_uid(&reminder.user_id).await {
        Ok(Some(user)) => match user.chat_id {
            Some(chat_id) => chat_id,
            None => {
                log::debug!("📅 User {} has no linked chat, skipping {}", reminder.user_id, id);
                result.skipped += 1;
                return;
            }
        },
        Ok(None) => {
            log::debug!("📅 Owner {} of reminder {} not found, skipping", reminder.user_id, id);
            result.skipped += 1;
            return;
        }
        Err(e) => {
            log::error!("❌ User lookup for reminder {} failed: {}", id, e);
            result.errors += 1;
            return;
        }
    };

    // 3. Pre-deadline window. Evaluated independently of the due window;
    //    a short-fuse reminder can fire both in the same cycle.
    if !reminder.pre_notified && Reminder::in_pre_window(deadline, now) {
        let text = pre_alert_text(reminder);
        if let Err(e) = notifier.send(&chat_id, &text).await {
            log::warn!("⚠️  Pre-deadline send for {} failed: {}", id, e);
        }
        // The flag is set whatever the delivery outcome: the window's
        // single notification opportunity is consumed (at-most-once).
        match reminders.set_flag(&id, ReminderFlag::PreNotified).await {
            Ok(()) => result.pre_sent += 1,
            Err(e) => {
                log::error!("❌ Failed to persist pre_notified for {}: {}", id, e);
                result.errors += 1;
            }
        }
    }

    // 4. Due window.
    if !reminder.due_notified && Reminder::in_due_window(deadline, now) {
        let text = due_text(reminder);
        if let Err(e) = notifier.send(&chat_id, &text).await {
            log::warn!("⚠️  Due send for {} failed: {}", id, e);
        }
        match reminders.set_flag(&id, ReminderFlag::DueNotified).await {
            Ok(()) => result.due_sent += 1,
            Err(e) => {
                log::error!("❌ Failed to persist due_notified for {}: {}", id, e);
                result.errors += 1;
            }
        }
    }
}

fn pre_alert_text(reminder: &Reminder) -> String {
    format!(
        "⏰ Reminder: {} is due in 1 hour!\n\n{}\n\nDue at: {}",
        reminder.title, reminder.body, reminder.timestamp
    )
}

fn due_text(reminder: &Reminder) -> String {
    format!(
        "🔔 Reminder: {} is due now!\n\n{}\n\nDue at: {}",
        reminder.title, reminder.body, reminder.timestamp
    )
}
