pub mod attendance;
pub mod cards;
pub mod leaderboard;
pub mod stats;

pub use attendance::{
    build_day_summaries, group_by_date, is_present, records_for_date, summarize_day, DateGroups,
};
pub use cards::{
    classify, compute_expiration, compute_expiration_in, days_until, evaluate_card, evaluate_cards,
    expiration_key, format_card_id, CardEvaluation, CardLifecycle,
};
pub use leaderboard::{order_by_score, rank_by_score, ranked, RankedUser};
pub use stats::{
    daily_stats, day_stats, user_history, weekly_stats, DailyStats, DayStats, HistoryEntry,
    HISTORY_LIMIT,
};
