//! Default-preset icon substitution.
//!
//! Weapons are listed as bare receivers; their default preset is the fully
//! assembled gun, and its icon is the one worth showing.

use crate::collection::Collection;
use serde_json::Value;

/// Item containers inside barter and craft records.
const ITEM_LISTS: [&str; 2] = ["rewardItems", "requiredItems"];

/// Returns the default preset's icon link, if the item has one.
pub fn default_preset_icon(item: &Value) -> Option<&str> {
    item.get("properties")?
        .get("defaultPreset")?
        .get("iconLink")?
        .as_str()
        .filter(|link| !link.is_empty())
}

/// Replaces `iconLink` with the default preset's icon link when present.
/// Items without a preset icon are left untouched.
pub fn apply_default_preset_icon(item: &mut Value) {
    let Some(preset_icon) = default_preset_icon(item).map(str::to_string) else {
        return;
    };
    if let Some(obj) = item.as_object_mut() {
        obj.insert("iconLink".to_string(), Value::String(preset_icon));
    }
}

/// Applies the icon transform to every item occurrence in `records`.
pub fn apply_to_records(collection: Collection, records: &mut [Value]) {
    if !collection.uses_preset_icons() {
        return;
    }

    for record in records.iter_mut() {
        if collection == Collection::Items {
            apply_default_preset_icon(record);
            continue;
        }
        for list in ITEM_LISTS {
            let Some(entries) = record.get_mut(list).and_then(Value::as_array_mut) else {
                continue;
            };
            for entry in entries {
                if let Some(item) = entry.get_mut("item") {
                    apply_default_preset_icon(item);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn weapon() -> Value {
        json!({
            "id": "m4a1",
            "iconLink": "Y",
            "properties": {"defaultPreset": {"iconLink": "X"}}
        })
    }

    #[test]
    fn test_preset_icon_wins() {
        let mut item = weapon();
        apply_default_preset_icon(&mut item);
        assert_eq!(item["iconLink"], "X");
    }

    #[test]
    fn test_plain_item_unchanged() {
        let mut item = json!({"id": "salewa", "iconLink": "Y", "properties": null});
        let before = item.clone();
        apply_default_preset_icon(&mut item);
        assert_eq!(item, before);

        let mut item = json!({"id": "ammo", "iconLink": "Y", "properties": {}});
        apply_default_preset_icon(&mut item);
        assert_eq!(item["iconLink"], "Y");
    }

    #[test]
    fn test_empty_preset_icon_ignored() {
        let mut item = json!({
            "iconLink": "Y",
            "properties": {"defaultPreset": {"iconLink": ""}}
        });
        apply_default_preset_icon(&mut item);
        assert_eq!(item["iconLink"], "Y");
    }

    #[test]
    fn test_idempotent() {
        let mut once = weapon();
        apply_default_preset_icon(&mut once);
        let mut twice = once.clone();
        apply_default_preset_icon(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_barter_both_sides() {
        let mut records = vec![json!({
            "rewardItems": [{"item": weapon(), "count": 1}],
            "requiredItems": [
                {"item": weapon(), "count": 2},
                {"item": {"id": "bolts", "iconLink": "B"}, "count": 4}
            ]
        })];
        apply_to_records(Collection::Barters, &mut records);
        assert_eq!(records[0]["rewardItems"][0]["item"]["iconLink"], "X");
        assert_eq!(records[0]["requiredItems"][0]["item"]["iconLink"], "X");
        assert_eq!(records[0]["requiredItems"][1]["item"]["iconLink"], "B");
    }

    #[test]
    fn test_items_collection() {
        let mut records = vec![weapon(), json!({"id": "x", "iconLink": "Z"})];
        apply_to_records(Collection::Items, &mut records);
        assert_eq!(records[0]["iconLink"], "X");
        assert_eq!(records[1]["iconLink"], "Z");
    }

    #[test]
    fn test_other_collections_untouched() {
        let mut records = vec![json!({"rewardItems": [{"item": weapon()}]})];
        let before = records.clone();
        apply_to_records(Collection::Bosses, &mut records);
        assert_eq!(records, before);
    }
}
