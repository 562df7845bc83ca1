//! Id-keyed lookup over fetched collections, used to join records that
//! only reference each other by id (tasks → traders, items, maps).

use foldhash::HashMap;
use serde_json::Value;

/// Records of one collection plus an index from `id` to position.
#[derive(Debug, Default)]
pub struct Table {
    records: Vec<Value>,
    by_id: HashMap<String, usize>,
}

impl Table {
    /// Indexes `records` by their `id` field. Records without a string id
    /// stay in the table but cannot be looked up; on duplicate ids the
    /// first record wins.
    pub fn new(records: Vec<Value>) -> Self {
        let mut by_id: HashMap<String, usize> = HashMap::default();
        for (idx, record) in records.iter().enumerate() {
            if let Some(id) = record_id(record) {
                by_id.entry(id.to_string()).or_insert(idx);
            }
        }
        Self { records, by_id }
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.by_id.get(id).map(|&idx| &self.records[idx])
    }
}

/// The `id` of a record, if it has a string one.
pub fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

/// The display name of a record, falling back to its id.
pub fn record_name(record: &Value) -> &str {
    record
        .get("name")
        .and_then(Value::as_str)
        .or_else(|| record_id(record))
        .unwrap_or("")
}

/// Joined view over items, traders, tasks and maps.
#[derive(Debug, Default)]
pub struct Catalog {
    pub items: Table,
    pub traders: Table,
    pub tasks: Table,
    pub maps: Table,
}

impl Catalog {
    pub fn new(items: Vec<Value>, traders: Vec<Value>, tasks: Vec<Value>, maps: Vec<Value>) -> Self {
        Self {
            items: Table::new(items),
            traders: Table::new(traders),
            tasks: Table::new(tasks),
            maps: Table::new(maps),
        }
    }

    pub fn item(&self, id: &str) -> Option<&Value> {
        self.items.get(id)
    }

    pub fn trader(&self, id: &str) -> Option<&Value> {
        self.traders.get(id)
    }

    pub fn task(&self, id: &str) -> Option<&Value> {
        self.tasks.get(id)
    }

    pub fn map(&self, id: &str) -> Option<&Value> {
        self.maps.get(id)
    }

    /// The item with its default preset's image and grid size, so weapons
    /// show fully assembled. Falls back to the base item when the preset
    /// is unknown.
    pub fn item_with_preset_image(&self, id: &str) -> Option<Value> {
        let mut item = self.item(id)?.clone();

        let preset = item
            .pointer("/properties/defaultPreset/id")
            .and_then(Value::as_str)
            .and_then(|preset_id| self.item(preset_id));

        if let (Some(preset), Some(obj)) = (preset, item.as_object_mut()) {
            for field in ["baseImageLink", "width", "height"] {
                if let Some(value) = preset.get(field) {
                    obj.insert(field.to_string(), value.clone());
                }
            }
        }

        Some(item)
    }
}
