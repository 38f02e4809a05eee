//! Ad-hoc search across transactions, bills and goals

use std::fmt;

use tracing::debug;

use crate::models::AppState;

/// Entity kind a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Transaction,
    Subscription,
    Goal,
}

impl ResultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transaction => "Transaction",
            Self::Subscription => "Subscription",
            Self::Goal => "Goal",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Top-level screens a result can open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Transactions,
    Planning,
    Wealth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WealthTab {
    Goals,
    Debt,
}

/// Where selecting a result navigates to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavTarget {
    pub view: View,
    pub wealth_tab: Option<WealthTab>,
}

impl NavTarget {
    fn view(view: View) -> Self {
        Self {
            view,
            wealth_tab: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub kind: ResultKind,
    /// Id of the matched entity
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub icon: String,
    pub target: NavTarget,
}

/// Case-insensitive substring search
///
/// Matches transaction name or category, subscription name and goal name.
/// Results are grouped in that order and keep each collection's stored
/// order. Surrounding whitespace is trimmed from the query before
/// matching, so `" netflix "` finds Netflix. A blank query returns nothing.
pub fn search(state: &AppState, query: &str) -> Vec<SearchResult> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let hit = |text: &str| text.to_lowercase().contains(&needle);

    let transactions = state
        .transactions
        .iter()
        .filter(|t| hit(&t.name) || hit(&t.category))
        .map(|t| SearchResult {
            kind: ResultKind::Transaction,
            id: t.id.clone(),
            title: t.name.clone(),
            subtitle: format!("{} • ${:.2}", t.date, t.amount.abs()),
            icon: t.icon.clone(),
            target: NavTarget::view(View::Transactions),
        });

    let subscriptions = state
        .subscriptions
        .iter()
        .filter(|s| hit(&s.name))
        .map(|s| SearchResult {
            kind: ResultKind::Subscription,
            id: s.id.clone(),
            title: s.name.clone(),
            subtitle: format!("Due {} • ${}", s.next_due.format("%Y-%m-%d"), s.amount),
            icon: s.icon.clone(),
            target: NavTarget::view(View::Planning),
        });

    let goals = state
        .goals
        .iter()
        .filter(|g| hit(&g.name))
        .map(|g| SearchResult {
            kind: ResultKind::Goal,
            id: g.id.clone(),
            title: g.name.clone(),
            subtitle: format!("Target: ${}", g.target),
            icon: g.icon.clone(),
            target: NavTarget {
                view: View::Wealth,
                wealth_tab: Some(WealthTab::Goals),
            },
        });

    let results: Vec<SearchResult> = transactions.chain(subscriptions).chain(goals).collect();
    debug!(query = %needle, hits = results.len(), "Search");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{goal, sample_state};

    fn kinds(results: &[SearchResult]) -> Vec<ResultKind> {
        results.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn test_blank_query() {
        let state = sample_state();
        assert!(search(&state, "").is_empty());
        assert!(search(&state, "   ").is_empty());
    }

    #[test]
    fn test_netflix_groups_in_order() {
        let mut state = sample_state();
        state.goals.push(goal("g3", "Netflix Party", 100.0, 0.0));

        let results = search(&state, "NetFlix");
        assert_eq!(
            kinds(&results),
            vec![ResultKind::Transaction, ResultKind::Subscription, ResultKind::Goal]
        );

        let tx = &results[0];
        assert_eq!(tx.title, "Netflix Subscription");
        assert_eq!(tx.subtitle, "Oct 2, 6:30 PM • $15.99");
        assert_eq!(tx.target, NavTarget::view(View::Transactions));

        let sub = &results[1];
        assert_eq!(sub.subtitle, "Due 2026-10-18 • $15.99");
        assert_eq!(sub.target.view, View::Planning);

        let goal = &results[2];
        assert_eq!(goal.subtitle, "Target: $100");
        assert_eq!(goal.target.wealth_tab, Some(WealthTab::Goals));
    }

    #[test]
    fn test_matches_category_and_keeps_order() {
        let state = sample_state();
        let results = search(&state, "transport");
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "5"]);
    }

    #[test]
    fn test_goal_only_match() {
        let state = sample_state();
        let results = search(&state, "japan");
        assert_eq!(kinds(&results), vec![ResultKind::Goal]);
        assert_eq!(results[0].subtitle, "Target: $5000");
    }

    #[test]
    fn test_padded_query_is_trimmed() {
        let state = sample_state();
        let padded = search(&state, "  netflix \t");
        assert!(!padded.is_empty());
        assert_eq!(padded, search(&state, "netflix"));
    }

    #[test]
    fn test_no_matches() {
        let state = sample_state();
        assert!(search(&state, "zzz").is_empty());
    }
}
