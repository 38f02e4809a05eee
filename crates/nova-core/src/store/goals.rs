//! Savings goal operations

use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use super::next_id;
use crate::error::{Error, Result};
use crate::models::{AppState, Goal};

const DEFAULT_GOAL_ICON: &str = "Target";

/// Keyword rules, first match wins
const ICON_RULES: &[(&str, &str)] = &[
    (r"trip|travel|vacation|flight|fly|japan|europe|visit", "Plane"),
    (r"car|auto|vehicle|truck|tesla|bmw|toyota", "Car"),
    (r"house|home|renovation|repair|kitchen|bath|roof", "Home"),
    (r"emergency|fund|save|safe|security", "Shield"),
    (r"wedding|party|gift|birthday|celebration", "Gift"),
    (r"computer|laptop|tech|macbook|pc|gaming", "Monitor"),
    (r"phone|iphone|samsung|mobile", "Smartphone"),
    (r"tv|television|oled|cinema", "Tv"),
    (r"music|concert|festival|guitar|piano", "Music"),
];

fn icon_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        ICON_RULES
            .iter()
            .filter_map(|(pattern, icon)| Regex::new(pattern).ok().map(|re| (re, *icon)))
            .collect()
    })
}

/// Pick a goal icon from keywords in its name
pub fn smart_icon(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    icon_rules()
        .iter()
        .find(|(re, _)| re.is_match(&lower))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_GOAL_ICON)
}

pub fn add_goal(state: &mut AppState, name: &str, target: f64) -> Result<Goal> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Goal name is required".to_string()));
    }
    if !target.is_finite() || target <= 0.0 {
        return Err(Error::Validation(
            "Goal target must be a positive number".to_string(),
        ));
    }

    let goal = Goal {
        id: next_id("g", |id| state.goal(id).is_some()),
        name: name.to_string(),
        target,
        current: 0.0,
        icon: smart_icon(name).to_string(),
    };
    state.goals.push(goal.clone());

    info!(id = %goal.id, name = %goal.name, target, "Goal added");
    Ok(goal)
}

pub fn delete_goal(state: &mut AppState, goal_id: &str) -> Result<Goal> {
    let index = state
        .goals
        .iter()
        .position(|g| g.id == goal_id)
        .ok_or_else(|| Error::NotFound(format!("goal {}", goal_id)))?;
    let removed = state.goals.remove(index);
    info!(id = %removed.id, "Goal deleted");
    Ok(removed)
}
