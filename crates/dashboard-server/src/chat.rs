//! Chat turn handling for the dashboard.

use analysis_core::symbols::parse_symbol_input;
use analysis_core::ChatMessage;

use crate::AppState;

pub const INVALID_SYMBOL_REPLY: &str =
    "❌ Please enter a valid stock symbol like 'TCS', 'INFY', or 'Reliance'.";

fn analyzing_message(symbol: &str) -> String {
    format!("🔍 Analyzing {symbol}...")
}

/// Run one chat turn for a session.
///
/// On failure the previous snapshot and report stay in place so the
/// dashboard keeps showing the last good result.
pub async fn handle_message(state: &AppState, session_id: &str, input: &str) {
    let input = input.trim();
    if input.is_empty() {
        return;
    }

    let symbol = parse_symbol_input(input);
    let pending = symbol.as_deref().map(analyzing_message);

    state.sessions.update(session_id, |session| {
        session.push_message(ChatMessage::user(input));
        match &pending {
            Some(pending) => session.push_message(ChatMessage::assistant(pending.clone())),
            None => session.push_message(ChatMessage::assistant(INVALID_SYMBOL_REPLY)),
        }
    });

    let (Some(symbol), Some(pending)) = (symbol, pending) else {
        return;
    };

    // No session lock is held across this await
    match state.orchestrator.analyze(&symbol).await {
        Ok(analysis) => {
            let reply = format!(
                "✅ Analysis complete for {} ({}). See detailed results below.",
                analysis.snapshot.company_name, symbol
            );
            state.sessions.update(session_id, |session| {
                session.replace_pending(&pending, ChatMessage::assistant(reply));
                session.set_result(analysis.snapshot, analysis.report);
            });
        }
        Err(e) => {
            tracing::warn!("Analysis failed for {}: {}", symbol, e);
            let reply = format!("❌ Error analyzing {symbol}: {e}");
            state.sessions.update(session_id, |session| {
                session.replace_pending(&pending, ChatMessage::assistant(reply));
            });
        }
    }
}
