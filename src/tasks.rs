//! Task lookup and the prerequisite/follow-up joins shown on a task page.

use crate::catalog::{Catalog, record_name};
use crate::graphql::{null_as_empty, skip_unreadable};
use crate::objective::{IdRef, NamedRef, Objective};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskRequirement {
    pub task: IdRef,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraderRequirement {
    pub trader: IdRef,
    pub requirement_type: String,
    #[serde(default)]
    pub compare_method: String,
    pub value: f64,
}

/// A task record with the fields the joins need.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub tarkov_data_id: Option<i64>,
    pub name: String,
    pub normalized_name: String,
    #[serde(default)]
    pub trader: Option<NamedRef>,
    #[serde(default)]
    pub map: Option<NamedRef>,
    #[serde(default)]
    pub min_player_level: Option<u32>,
    #[serde(default)]
    pub faction_name: Option<String>,
    #[serde(default)]
    pub wiki_link: Option<String>,
    #[serde(default, deserialize_with = "skip_unreadable")]
    pub task_requirements: Vec<TaskRequirement>,
    #[serde(default, deserialize_with = "skip_unreadable")]
    pub trader_requirements: Vec<TraderRequirement>,
    #[serde(default, deserialize_with = "skip_unreadable")]
    pub objectives: Vec<Objective>,
}

/// Finds a task by id, legacy numeric id, or normalized name.
pub fn find_task<'a>(tasks: &'a [Task], identifier: &str) -> Option<&'a Task> {
    let normalized = identifier.to_lowercase();
    tasks.iter().find(|task| {
        task.id == identifier
            || task
                .tarkov_data_id
                .is_some_and(|legacy| legacy.to_string() == identifier)
            || task.normalized_name == normalized
    })
}

/// A task unlocked by completing (or failing) another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowUp<'a> {
    pub task: &'a Task,
    /// Unlocked only when the prerequisite fails.
    pub on_failure: bool,
}

/// Tasks that list `task_id` as a prerequisite, excluding those that only
/// need it to be active.
pub fn next_tasks<'a>(tasks: &'a [Task], task_id: &str) -> Vec<FollowUp<'a>> {
    tasks
        .iter()
        .filter_map(|task| {
            let req = task
                .task_requirements
                .iter()
                .find(|req| req.task.id == task_id && !req.status.iter().any(|s| s == "active"))?;
            Some(FollowUp {
                task,
                on_failure: req.status.len() == 1 && req.status[0] == "failed",
            })
        })
        .collect()
}

/// Everything a player needs before a task becomes available.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Requirements {
    pub player_level: Option<u32>,
    /// `(trader name, loyalty level)`
    pub trader_levels: Vec<(String, f64)>,
    /// `(trader name, compare method, reputation)`
    pub trader_reputation: Vec<(String, String, f64)>,
    /// `(task name, accepted statuses)`
    pub prerequisites: Vec<(String, Vec<String>)>,
}

impl Requirements {
    pub fn is_empty(&self) -> bool {
        self.player_level.is_none()
            && self.trader_levels.is_empty()
            && self.trader_reputation.is_empty()
            && self.prerequisites.is_empty()
    }
}

/// Resolves a task's requirements against `catalog`. Requirements naming
/// unknown traders or tasks are dropped.
pub fn requirements(task: &Task, catalog: &Catalog) -> Requirements {
    let mut reqs = Requirements {
        player_level: task.min_player_level.filter(|&level| level > 0),
        ..Default::default()
    };

    for req in &task.trader_requirements {
        let Some(trader) = catalog.trader(&req.trader.id) else {
            continue;
        };
        let name = record_name(trader).to_string();
        match req.requirement_type.as_str() {
            "level" => reqs.trader_levels.push((name, req.value)),
            "reputation" => {
                reqs.trader_reputation
                    .push((name, req.compare_method.clone(), req.value))
            }
            _ => {}
        }
    }

    for req in &task.task_requirements {
        if let Some(prereq) = catalog.task(&req.task.id) {
            reqs.prerequisites
                .push((record_name(prereq).to_string(), req.status.clone()));
        }
    }

    reqs
}

/// Roman numeral for a trader loyalty level.
pub fn roman_level(level: u32) -> Option<&'static str> {
    const NUMERALS: [&str; 11] = ["0", "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X"];
    NUMERALS.get(level as usize).copied()
}

/// "loyalty level II"; levels without a numeral fall back to "LL{n}".
fn loyalty_label(level: f64) -> String {
    let numeral = (level.fract() == 0.0 && level >= 0.0)
        .then(|| roman_level(level as u32))
        .flatten();
    match numeral {
        Some(numeral) => format!("loyalty level {}", numeral),
        None => format!("LL{}", level),
    }
}

/// Plain-text summary of a task: header, requirements, objectives and
/// follow-ups.
pub fn summarize(task: &Task, all_tasks: &[Task], catalog: &Catalog) -> Vec<String> {
    let mut lines = Vec::new();

    let faction = match task.faction_name.as_deref() {
        Some("Any") | None => String::new(),
        Some(faction) => format!(" ({})", faction),
    };
    lines.push(format!("{}{}", task.name, faction));
    if let Some(trader) = &task.trader {
        lines.push(format!("Trader: {}", trader.name));
    }
    if let Some(map) = &task.map {
        lines.push(format!("Map: {}", map.name));
    }
    if let Some(wiki) = &task.wiki_link {
        lines.push(format!("Wiki: {}", wiki));
    }

    let reqs = requirements(task, catalog);
    if !reqs.is_empty() {
        lines.push(String::new());
        lines.push("Requirements".to_string());
        if let Some(level) = reqs.player_level {
            lines.push(format!("  Player level: {}", level));
        }
        for (trader, level) in &reqs.trader_levels {
            lines.push(format!("  {} {}", trader, loyalty_label(*level)));
        }
        for (trader, method, value) in &reqs.trader_reputation {
            lines.push(format!("  {} reputation {} {}", trader, method, value));
        }
        for (name, statuses) in &reqs.prerequisites {
            lines.push(format!("  {}: {}", name, statuses.join(", ")));
        }
    }

    if !task.objectives.is_empty() {
        lines.push(String::new());
        lines.push("Objectives".to_string());
        for objective in &task.objectives {
            let Some(described) = objective.describe(catalog) else {
                tracing::debug!(task = %task.id, objective = %objective.id, "Skipping objective with unresolved references");
                continue;
            };
            for (idx, line) in described.iter().enumerate() {
                let bullet = if idx == 0 { "- " } else { "  " };
                lines.push(format!("  {}{}", bullet, line));
            }
        }
    }

    let next = next_tasks(all_tasks, &task.id);
    if !next.is_empty() {
        lines.push(String::new());
        lines.push("Leads to".to_string());
        for follow_up in next {
            let note = if follow_up.on_failure { " (on failure)" } else { "" };
            lines.push(format!("  {}{}", follow_up.task.name, note));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn task(value: Value) -> Task {
        serde_json::from_value(value).unwrap()
    }

    fn tasks() -> Vec<Task> {
        vec![
            task(json!({
                "id": "t-debut",
                "tarkovDataId": 1,
                "name": "Debut",
                "normalizedName": "debut",
                "trader": {"id": "prapor", "name": "Prapor"},
                "minPlayerLevel": 1,
                "factionName": "Any",
                "taskRequirements": [],
                "traderRequirements": [],
                "objectives": [
                    {"id": "o1", "type": "shoot", "description": "Kill Scavs", "optional": false,
                     "maps": [{"id": "customs", "name": "Customs"}], "target": "Scavs", "count": 5, "shotType": "kill"}
                ]
            })),
            task(json!({
                "id": "t-checking",
                "tarkovDataId": 2,
                "name": "Checking",
                "normalizedName": "checking",
                "factionName": "BEAR",
                "minPlayerLevel": 0,
                "taskRequirements": [{"task": {"id": "t-debut"}, "status": ["complete"]}],
                "traderRequirements": [
                    {"trader": {"id": "prapor"}, "requirementType": "level", "compareMethod": ">=", "value": 2},
                    {"trader": {"id": "prapor"}, "requirementType": "reputation", "compareMethod": ">=", "value": 0.2},
                    {"trader": {"id": "ghost"}, "requirementType": "level", "compareMethod": ">=", "value": 1}
                ]
            })),
            task(json!({
                "id": "t-parallel",
                "name": "Parallel",
                "normalizedName": "parallel",
                "taskRequirements": [{"task": {"id": "t-debut"}, "status": ["active"]}]
            })),
            task(json!({
                "id": "t-fallback",
                "name": "Fallback",
                "normalizedName": "fallback",
                "taskRequirements": [{"task": {"id": "t-debut"}, "status": ["failed"]}]
            })),
        ]
    }

    fn catalog() -> Catalog {
        Catalog::new(
            vec![],
            vec![json!({"id": "prapor", "name": "Prapor"})],
            vec![json!({"id": "t-debut", "name": "Debut"})],
            vec![],
        )
    }

    #[test]
    fn test_find_task_by_any_identifier() {
        let tasks = tasks();
        assert_eq!(find_task(&tasks, "t-checking").unwrap().name, "Checking");
        assert_eq!(find_task(&tasks, "2").unwrap().name, "Checking");
        assert_eq!(find_task(&tasks, "Debut").unwrap().id, "t-debut");
        assert!(find_task(&tasks, "missing").is_none());
    }

    #[test]
    fn test_next_tasks_excludes_active_only() {
        let tasks = tasks();
        let next = next_tasks(&tasks, "t-debut");
        let names: Vec<&str> = next.iter().map(|f| f.task.name.as_str()).collect();
        assert_eq!(names, vec!["Checking", "Fallback"]);
        assert!(!next[0].on_failure);
        assert!(next[1].on_failure);
    }

    #[test]
    fn test_requirements() {
        let tasks = tasks();
        let reqs = requirements(&tasks[1], &catalog());
        assert_eq!(reqs.player_level, None);
        assert_eq!(reqs.trader_levels, vec![("Prapor".to_string(), 2.0)]);
        assert_eq!(
            reqs.trader_reputation,
            vec![("Prapor".to_string(), ">=".to_string(), 0.2)]
        );
        assert_eq!(
            reqs.prerequisites,
            vec![("Debut".to_string(), vec!["complete".to_string()])]
        );
        assert!(requirements(&tasks[2], &Catalog::default()).is_empty());
    }

    #[test]
    fn test_roman_level() {
        assert_eq!(roman_level(0), Some("0"));
        assert_eq!(roman_level(4), Some("IV"));
        assert_eq!(roman_level(10), Some("X"));
        assert_eq!(roman_level(11), None);
    }

    #[test]
    fn test_loyalty_label() {
        assert_eq!(loyalty_label(4.0), "loyalty level IV");
        assert_eq!(loyalty_label(12.0), "LL12");
        assert_eq!(loyalty_label(1.5), "LL1.5");
    }

    #[test]
    fn test_nulled_objective_keeps_task() {
        let task = task(json!({
            "id": "t1",
            "name": "Shortage",
            "normalizedName": "shortage",
            "objectives": [
                {"id": "o1", "type": "visit", "description": "Find the stash"},
                {"id": "o2", "type": "giveItem", "description": "Hand over", "item": null, "count": 1},
                {"id": "o3", "type": "traderLevel", "trader": {"id": "prapor"}, "level": "high"}
            ],
            "traderRequirements": [
                {"trader": null, "requirementType": "level", "value": 2},
                {"trader": {"id": "prapor"}, "requirementType": "level", "compareMethod": ">=", "value": 3}
            ]
        }));
        assert_eq!(task.objectives.len(), 2);
        assert_eq!(task.trader_requirements.len(), 1);

        let lines = summarize(&task, &[], &catalog());
        assert!(lines.contains(&"  - Find the stash".to_string()));
        assert!(!lines.contains(&"  - Hand over".to_string()));
        assert!(lines.contains(&"  Prapor loyalty level III".to_string()));
    }

    #[test]
    fn test_summarize() {
        let tasks = tasks();
        let lines = summarize(&tasks[0], &tasks, &catalog());
        assert_eq!(lines[0], "Debut");
        assert!(lines.contains(&"Trader: Prapor".to_string()));
        assert!(lines.contains(&"  Player level: 1".to_string()));
        assert!(lines.contains(&"  - Kill Scavs".to_string()));
        assert!(lines.contains(&"    Maps: Customs".to_string()));
        assert!(lines.contains(&"    Kill Scavs 5 times".to_string()));
        assert!(lines.contains(&"  Checking".to_string()));
        assert!(lines.contains(&"  Fallback (on failure)".to_string()));
        assert!(!lines.contains(&"  Parallel".to_string()));

        let checking = summarize(&tasks[1], &tasks, &catalog());
        assert_eq!(checking[0], "Checking (BEAR)");
        assert!(checking.contains(&"  Prapor loyalty level II".to_string()));
    }
}
