//! The named top-level datasets served by the API and the query documents
//! that select them.

use std::fmt;
use std::str::FromStr;

/// Placeholder in query templates replaced by the requested locale.
const LOCALE: &str = "%LOCALE%";
/// Placeholder in query templates replaced by [`ITEM_FIELDS`].
const ITEM: &str = "%ITEM_FIELDS%";

/// Item selection shared by every collection that embeds full items.
const ITEM_FIELDS: &str = r#"
            id
            name
            normalizedName
            shortName
            iconLink
            baseImageLink
            wikiLink
            width
            height
            properties {
                ...on ItemPropertiesWeapon {
                    defaultPreset {
                        id
                        iconLink
                    }
                }
            }
            avg24hPrice
            lastLowPrice
            buyFor {
                source
                vendor {
                    name
                    normalizedName
                    __typename
                    ...on TraderOffer {
                        trader { id name normalizedName }
                        minTraderLevel
                        taskUnlock { id tarkovDataId name normalizedName }
                    }
                }
                priceRUB
                price
                currency
            }
            sellFor {
                source
                vendor {
                    name
                    normalizedName
                    __typename
                    ...on TraderOffer {
                        trader { id name normalizedName }
                        minTraderLevel
                    }
                }
                priceRUB
                price
                currency
            }
            containsItems {
                item { id }
                count
            }"#;

const ITEMS_QUERY: &str = r#"{
    items(lang: %LOCALE%) {%ITEM_FIELDS%
        types
        categories { id name normalizedName }
    }
}"#;

const BARTERS_QUERY: &str = r#"{
    barters(lang: %LOCALE%) {
        id
        rewardItems {
            item {%ITEM_FIELDS%
            }
            count
        }
        requiredItems {
            item {%ITEM_FIELDS%
            }
            count
            attributes { name value }
        }
        source
        trader { id name normalizedName }
        level
        taskUnlock { id tarkovDataId name normalizedName }
    }
}"#;

const CRAFTS_QUERY: &str = r#"{
    crafts(lang: %LOCALE%) {
        id
        rewardItems {
            item {%ITEM_FIELDS%
            }
            count
        }
        requiredItems {
            item {%ITEM_FIELDS%
            }
            count
            attributes { name value }
        }
        source
        duration
        station { id name normalizedName }
        level
        taskUnlock { id tarkovDataId name normalizedName }
    }
}"#;

const BOSSES_QUERY: &str = r#"{
    bosses(lang: %LOCALE%) {
        name
        normalizedName
        health { id max }
        equipment {
            item {
                id
                containsItems { item { id } }
            }
            attributes { name value }
        }
        items { id }
    }
}"#;

const HIDEOUT_QUERY: &str = r#"{
    hideoutStations(lang: %LOCALE%) {
        id
        name
        normalizedName
        levels {
            id
            level
            constructionTime
            itemRequirements {
                item { id name normalizedName iconLink }
                count
                attributes { name value }
            }
            stationLevelRequirements { station { id name } level }
            traderRequirements { trader { id name } level }
            skillRequirements { name level }
        }
    }
}"#;

const MAPS_QUERY: &str = r#"{
    maps(lang: %LOCALE%) {
        id
        tarkovDataId
        name
        normalizedName
        wiki
        description
        enemies
        raidDuration
        players
        bosses {
            boss { name normalizedName }
            spawnChance
            spawnLocations { name chance }
            escorts { boss { name normalizedName } amount { count chance } }
            spawnTime
            spawnTimeRandom
            spawnTrigger
        }
    }
}"#;

const META_QUERY: &str = r#"{
    armorMaterials(lang: %LOCALE%) {
        id
        name
        destructibility
        minRepairDegradation
        maxRepairDegradation
    }
}"#;

const TRADERS_QUERY: &str = r#"{
    traders(lang: %LOCALE%) {
        id
        name
        normalizedName
        resetTime
        discount
        levels {
            id
            level
            requiredPlayerLevel
            requiredReputation
            requiredCommerce
            payRate
            insuranceRate
            repairCostMultiplier
        }
    }
}"#;

const QUESTS_QUERY: &str = r#"{
    tasks(lang: %LOCALE%) {
        id
        tarkovDataId
        name
        normalizedName
        trader { id name normalizedName }
        map { id name normalizedName }
        experience
        wikiLink
        minPlayerLevel
        factionName
        taskRequirements {
            task { id name normalizedName }
            status
        }
        traderRequirements {
            trader { id name normalizedName }
            requirementType
            compareMethod
            value
        }
        objectives {
            id
            type
            description
            optional
            maps { id name normalizedName }
            ...on TaskObjectiveBuildItem {
                item { id }
                containsAll { id }
                containsCategory { id name normalizedName }
                attributes { name requirement { compareMethod value } }
            }
            ...on TaskObjectiveExperience {
                healthEffect { bodyParts effects time { compareMethod value } }
            }
            ...on TaskObjectiveExtract {
                exitStatus
                exitName
                zoneNames
            }
            ...on TaskObjectiveItem {
                item { id }
                count
                foundInRaid
                dogTagLevel
                maxDurability
                minDurability
            }
            ...on TaskObjectiveMark {
                markerItem { id }
            }
            ...on TaskObjectivePlayerLevel {
                playerLevel
            }
            ...on TaskObjectiveQuestItem {
                questItem { id name shortName baseImageLink }
                count
            }
            ...on TaskObjectiveShoot {
                target
                count
                shotType
                zoneNames
                bodyParts
                usingWeapon { id }
                usingWeaponMods { id }
                wearing { id }
                notWearing { id }
                distance { compareMethod value }
                playerHealthEffect { bodyParts effects time { compareMethod value } }
                enemyHealthEffect { bodyParts effects time { compareMethod value } }
            }
            ...on TaskObjectiveSkill {
                skillLevel { name level }
            }
            ...on TaskObjectiveTaskStatus {
                task { id }
                status
            }
            ...on TaskObjectiveTraderLevel {
                trader { id }
                level
            }
            ...on TaskObjectiveTraderStanding {
                trader { id }
                compareMethod
                value
            }
            ...on TaskObjectiveUseItem {
                useAny { id }
                compareMethod
                count
                zoneNames
            }
        }
    }
}"#;

/// One named top-level dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Items,
    Barters,
    Bosses,
    Crafts,
    Hideout,
    Maps,
    Meta,
    Traders,
    Quests,
}

impl Collection {
    pub const ALL: [Collection; 9] = [
        Collection::Items,
        Collection::Barters,
        Collection::Bosses,
        Collection::Crafts,
        Collection::Hideout,
        Collection::Maps,
        Collection::Meta,
        Collection::Traders,
        Collection::Quests,
    ];

    /// Lowercase name used on the command line and in snapshot file names.
    pub fn name(self) -> &'static str {
        match self {
            Collection::Items => "items",
            Collection::Barters => "barters",
            Collection::Bosses => "bosses",
            Collection::Crafts => "crafts",
            Collection::Hideout => "hideout",
            Collection::Maps => "maps",
            Collection::Meta => "meta",
            Collection::Traders => "traders",
            Collection::Quests => "quests",
        }
    }

    /// The field under `data` that holds this collection's records.
    pub fn field(self) -> &'static str {
        match self {
            Collection::Items => "items",
            Collection::Barters => "barters",
            Collection::Bosses => "bosses",
            Collection::Crafts => "crafts",
            Collection::Hideout => "hideoutStations",
            Collection::Maps => "maps",
            Collection::Meta => "armorMaterials",
            Collection::Traders => "traders",
            Collection::Quests => "tasks",
        }
    }

    fn template(self) -> &'static str {
        match self {
            Collection::Items => ITEMS_QUERY,
            Collection::Barters => BARTERS_QUERY,
            Collection::Bosses => BOSSES_QUERY,
            Collection::Crafts => CRAFTS_QUERY,
            Collection::Hideout => HIDEOUT_QUERY,
            Collection::Maps => MAPS_QUERY,
            Collection::Meta => META_QUERY,
            Collection::Traders => TRADERS_QUERY,
            Collection::Quests => QUESTS_QUERY,
        }
    }

    /// Builds the query document for `locale`. The locale is inserted
    /// verbatim.
    pub fn document(self, locale: &str) -> String {
        self.template()
            .replace(ITEM, ITEM_FIELDS)
            .replace(LOCALE, locale)
    }

    /// Whether records of this collection embed items whose icon should be
    /// replaced by their default preset's icon.
    pub fn uses_preset_icons(self) -> bool {
        matches!(
            self,
            Collection::Items | Collection::Barters | Collection::Crafts
        )
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Collection::ALL
            .into_iter()
            .find(|c| c.name() == lower || c.field().eq_ignore_ascii_case(&lower))
            .ok_or_else(|| {
                let names: Vec<&str> = Collection::ALL.iter().map(|c| c.name()).collect();
                format!("Unknown collection '{}'. Expected one of: {}", s, names.join(", "))
            })
    }
}
