//! Task objectives as a closed set of variants, each with its own
//! plain-text detail formatter.

use crate::catalog::{Catalog, record_name};
use crate::graphql::null_as_empty;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedRef {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub normalized_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub compare_method: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthEffect {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body_parts: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub effects: Vec<String>,
    #[serde(default)]
    pub time: Option<Comparison>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttributeRequirement {
    pub name: String,
    pub requirement: Comparison,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillLevel {
    pub name: String,
    pub level: f64,
}

/// Hand in or find an item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemObjective {
    #[serde(default)]
    pub item: Option<IdRef>,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub found_in_raid: bool,
    #[serde(default)]
    pub dog_tag_level: Option<u32>,
    #[serde(default)]
    pub max_durability: Option<u32>,
    #[serde(default)]
    pub min_durability: Option<u32>,
}

/// Find, hand in or plant a quest-only item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestItemObjective {
    #[serde(default)]
    pub quest_item: Option<NamedRef>,
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShootObjective {
    pub target: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub shot_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub zone_names: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body_parts: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub using_weapon: Vec<IdRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub using_weapon_mods: Vec<Vec<IdRef>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub wearing: Vec<Vec<IdRef>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub not_wearing: Vec<IdRef>,
    #[serde(default)]
    pub distance: Option<Comparison>,
    #[serde(default)]
    pub player_health_effect: Option<HealthEffect>,
    #[serde(default)]
    pub enemy_health_effect: Option<HealthEffect>,
}

/// The type-specific part of an objective, keyed by the `type` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ObjectiveKind {
    BuildWeapon {
        #[serde(default)]
        item: Option<IdRef>,
        #[serde(default, deserialize_with = "null_as_empty")]
        contains_all: Vec<IdRef>,
        #[serde(default, deserialize_with = "null_as_empty")]
        contains_category: Vec<NamedRef>,
        #[serde(default, deserialize_with = "null_as_empty")]
        attributes: Vec<AttributeRequirement>,
    },
    Experience {
        #[serde(default)]
        health_effect: Option<HealthEffect>,
    },
    Extract {
        #[serde(default, deserialize_with = "null_as_empty")]
        exit_status: Vec<String>,
        #[serde(default)]
        exit_name: Option<String>,
        #[serde(default, deserialize_with = "null_as_empty")]
        zone_names: Vec<String>,
    },
    FindItem(ItemObjective),
    GiveItem(ItemObjective),
    FindQuestItem(QuestItemObjective),
    GiveQuestItem(QuestItemObjective),
    PlantQuestItem(QuestItemObjective),
    Mark {
        #[serde(default)]
        marker_item: Option<IdRef>,
    },
    PlantItem {
        #[serde(default)]
        item: Option<IdRef>,
        #[serde(default)]
        count: u32,
    },
    PlayerLevel {
        player_level: u32,
    },
    Shoot(ShootObjective),
    Skill {
        #[serde(default)]
        skill_level: Option<SkillLevel>,
    },
    TaskStatus {
        #[serde(default)]
        task: Option<IdRef>,
        #[serde(default, deserialize_with = "null_as_empty")]
        status: Vec<String>,
    },
    TraderLevel {
        #[serde(default)]
        trader: Option<IdRef>,
        level: u32,
    },
    TraderStanding {
        #[serde(default)]
        trader: Option<IdRef>,
        compare_method: String,
        value: f64,
    },
    UseItem {
        #[serde(default, deserialize_with = "null_as_empty")]
        use_any: Vec<IdRef>,
        #[serde(default, deserialize_with = "null_as_empty")]
        zone_names: Vec<String>,
    },
    Visit,
    /// Any objective type this crate does not know yet.
    #[serde(other)]
    Unknown,
}

/// A single task objective.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Objective {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub maps: Vec<NamedRef>,
    #[serde(flatten)]
    pub kind: ObjectiveKind,
}

/// Joins items into a human-readable list: "a", "a and b", "a, b, and c".
pub fn format_list<S: AsRef<str>>(parts: &[S]) -> String {
    match parts {
        [] => String::new(),
        [one] => one.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}

fn item_names(catalog: &Catalog, refs: &[IdRef]) -> Vec<String> {
    refs.iter()
        .filter_map(|r| catalog.item(&r.id))
        .map(|item| record_name(item).to_string())
        .collect()
}

fn item_name(catalog: &Catalog, item: &IdRef) -> Option<String> {
    catalog.item(&item.id).map(|v| record_name(v).to_string())
}

fn health_effect_line(effect: &HealthEffect, subject: &str, possessive: &str) -> String {
    let effects = format_list(&effect.effects);
    let body_parts = format_list(&effect.body_parts);
    match &effect.time {
        Some(time) => format!(
            "{} the {} effect(s) on {} {} for {} {} seconds",
            subject, effects, possessive, body_parts, time.compare_method, time.value
        ),
        None => format!(
            "{} the {} effect(s) on {} {}",
            subject, effects, possessive, body_parts
        ),
    }
}

impl ObjectiveKind {
    /// Type-specific detail lines. `None` when a referenced record is
    /// missing from the response or cannot be found in `catalog`.
    pub fn details(&self, catalog: &Catalog) -> Option<Vec<String>> {
        let mut lines = Vec::new();
        match self {
            ObjectiveKind::BuildWeapon {
                item,
                contains_all,
                contains_category,
                attributes,
            } => {
                let base = catalog.item_with_preset_image(&item.as_ref()?.id)?;
                lines.push(format!("Build: {}", record_name(&base)));
                for att in attributes.iter().filter(|a| a.requirement.value != 0.0) {
                    lines.push(format!(
                        "{}: {} {}",
                        att.name, att.requirement.compare_method, att.requirement.value
                    ));
                }
                let parts = item_names(catalog, contains_all);
                if !parts.is_empty() {
                    lines.push(format!("Required parts: {}", parts.join(", ")));
                }
                if !contains_category.is_empty() {
                    let categories: Vec<&str> =
                        contains_category.iter().map(|c| c.name.as_str()).collect();
                    lines.push(format!("Required categories: {}", categories.join(", ")));
                }
            }
            ObjectiveKind::Experience { health_effect } => {
                lines.push(health_effect_line(health_effect.as_ref()?, "Have", "your"));
            }
            ObjectiveKind::Extract { exit_status, .. } => {
                lines.push(format!(
                    "Extract with the status(es): {}",
                    format_list(exit_status)
                ));
            }
            ObjectiveKind::FindItem(objective) | ObjectiveKind::GiveItem(objective) => {
                let item = catalog.item_with_preset_image(&objective.item.as_ref()?.id)?;
                let fir = if objective.found_in_raid {
                    " (found in raid)"
                } else {
                    ""
                };
                lines.push(format!("{} x {}{}", objective.count, record_name(&item), fir));
                if let Some(level) = objective.dog_tag_level.filter(|&l| l > 0) {
                    lines.push(format!("Dogtag level: {}", level));
                }
                if let Some(max) = objective.max_durability.filter(|&d| d > 0 && d < 100) {
                    lines.push(format!("Max durability: {}", max));
                }
                if let Some(min) = objective.min_durability.filter(|&d| d > 0) {
                    lines.push(format!("Min durability: {}", min));
                }
            }
            ObjectiveKind::FindQuestItem(objective)
            | ObjectiveKind::GiveQuestItem(objective)
            | ObjectiveKind::PlantQuestItem(objective) => {
                lines.push(format!("Quest item: {}", objective.quest_item.as_ref()?.name));
            }
            ObjectiveKind::Mark { marker_item } => {
                lines.push(format!("Mark with: {}", item_name(catalog, marker_item.as_ref()?)?));
            }
            ObjectiveKind::PlantItem { item, .. } => {
                let item = catalog.item_with_preset_image(&item.as_ref()?.id)?;
                lines.push(format!("Plant: {}", record_name(&item)));
            }
            ObjectiveKind::PlayerLevel { player_level } => {
                lines.push(format!("Reach level {}", player_level));
            }
            ObjectiveKind::Shoot(objective) => shoot_details(objective, catalog, &mut lines),
            ObjectiveKind::Skill { skill_level } => {
                let skill_level = skill_level.as_ref()?;
                lines.push(format!(
                    "Obtain level {} {} skill",
                    skill_level.level, skill_level.name
                ));
            }
            ObjectiveKind::TaskStatus { task, status } => {
                let task = catalog.task(&task.as_ref()?.id)?;
                lines.push(format!("{}: {}", record_name(task), status.join(", ")));
            }
            ObjectiveKind::TraderLevel { trader, level } => {
                let trader = catalog.trader(&trader.as_ref()?.id)?;
                lines.push(format!("{} LL{}", record_name(trader), level));
            }
            ObjectiveKind::TraderStanding {
                trader,
                compare_method,
                value,
            } => {
                let trader = catalog.trader(&trader.as_ref()?.id)?;
                lines.push(format!(
                    "{} {} {} reputation",
                    record_name(trader),
                    compare_method,
                    value
                ));
            }
            ObjectiveKind::UseItem {
                use_any,
                zone_names,
            } => {
                lines.push(format!(
                    "Use any of: {}",
                    item_names(catalog, use_any).join(", ")
                ));
                if !zone_names.is_empty() {
                    lines.push(format!("In area(s): {}", zone_names.join(", ")));
                }
            }
            ObjectiveKind::Visit | ObjectiveKind::Unknown => {}
        }
        Some(lines)
    }
}

fn shoot_details(objective: &ShootObjective, catalog: &Catalog, lines: &mut Vec<String>) {
    let verb = match objective.shot_type.as_deref() {
        Some("kill") => "Kill",
        _ => "Shoot",
    };
    lines.push(format!(
        "{} {} {} times",
        verb, objective.target, objective.count
    ));
    if let Some(distance) = &objective.distance {
        lines.push(format!(
            "From distance: {} {} meters",
            distance.compare_method, distance.value
        ));
    }
    if !objective.zone_names.is_empty() {
        lines.push(format!(
            "While inside: {}",
            format_list(&objective.zone_names)
        ));
    }
    if !objective.body_parts.is_empty() {
        lines.push(format!("Hitting: {}", format_list(&objective.body_parts)));
    }
    let weapons = item_names(catalog, &objective.using_weapon);
    if !weapons.is_empty() {
        lines.push(format!("Using weapon: {}", weapons.join(", ")));
    }
    for mod_set in &objective.using_weapon_mods {
        let mods = item_names(catalog, mod_set);
        if !mods.is_empty() {
            lines.push(format!("Using weapon mods: {}", mods.join(", ")));
        }
    }
    for outfit in &objective.wearing {
        let accessories = item_names(catalog, outfit);
        if !accessories.is_empty() {
            lines.push(format!("While wearing: {}", accessories.join(", ")));
        }
    }
    let not_wearing = item_names(catalog, &objective.not_wearing);
    if !not_wearing.is_empty() {
        lines.push(format!("Not wearing: {}", not_wearing.join(", ")));
    }
    if let Some(effect) = &objective.player_health_effect {
        lines.push(health_effect_line(effect, "While having", "your"));
    }
    if let Some(effect) = &objective.enemy_health_effect {
        lines.push(health_effect_line(effect, "While target has", "their"));
    }
}

impl Objective {
    /// Full description: heading, maps, then the type-specific details.
    /// `None` when the objective references records missing from `catalog`.
    pub fn describe(&self, catalog: &Catalog) -> Option<Vec<String>> {
        let details = self.kind.details(catalog)?;

        let mut lines = Vec::with_capacity(details.len() + 2);
        if !self.description.is_empty() {
            let optional = if self.optional { " (optional)" } else { "" };
            lines.push(format!("{}{}", self.description, optional));
        }
        if !self.maps.is_empty() {
            let maps: Vec<&str> = self.maps.iter().map(|m| m.name.as_str()).collect();
            lines.push(format!("Maps: {}", maps.join(", ")));
        }
        lines.extend(details);
        Some(lines)
    }
}
