//! Pain assessment data: body regions, sub-regions, and the intensity scale.

use crate::scan::{ItemKind, ItemSet, ScanItem};

pub const TOP_PROMPT: &str = "Wo haben Sie Schmerzen?";
pub const INTENSITY_PROMPT: &str = "Wie stark sind Ihre Schmerzen?";

const MAIN_REGIONS: &[(&str, &str)] = &[
    ("kopf", "Kopf"),
    ("beine", "Beine"),
    ("arme", "Arme"),
    ("torso", "Torso"),
];

const KOPF: &[(&str, &str)] = &[
    ("stirn", "Stirn"),
    ("hinterkopf", "Hinterkopf"),
    ("schlaefe", "Schläfe"),
    ("nacken", "Nacken"),
    ("kiefer", "Kiefer"),
    ("nebenhoehlen", "Nebenhöhlen"),
    ("hals", "Hals"),
    ("auge", "Auge"),
    ("nase", "Nase"),
    ("mund", "Mund"),
    ("speiseroehre", "Speiseröhre"),
];

const BEINE: &[(&str, &str)] = &[
    ("oberschenkel", "Oberschenkel"),
    ("knie", "Knie"),
    ("unterschenkel", "Unterschenkel"),
    ("knoechel", "Knöchel"),
    ("fuss", "Fuß"),
    ("zehen", "Zehen"),
    ("huefte", "Hüfte"),
    ("wade", "Wade"),
    ("leiste", "Leiste"),
    ("gesaess", "Gesäß"),
    ("sprunggelenk", "Sprunggelenk"),
];

const ARME: &[(&str, &str)] = &[
    ("oberarm", "Oberarm"),
    ("unterarm", "Unterarm"),
    ("ellenbogen", "Ellenbogen"),
    ("handgelenk", "Handgelenk"),
    ("hand", "Hand"),
    ("finger", "Finger"),
    ("schulter", "Schulter"),
    ("daumen", "Daumen"),
    ("achsel", "Achsel"),
    ("handruecken", "Handrücken"),
    ("handflaeche", "Handfläche"),
];

const TORSO: &[(&str, &str)] = &[
    ("brust", "Brust"),
    ("ruecken", "Rücken"),
    ("schulterblatt", "Schulterblatt"),
    ("wirbelsaeule", "Wirbelsäule"),
    ("bauch", "Bauch"),
    ("lunge", "Lunge"),
    ("herz", "Herz"),
    ("magen", "Magen"),
    ("leber", "Leber"),
    ("niere", "Niere"),
    ("blase", "Blase"),
];

/// Intensity scale 1-10. Labels show the ordinal word; narration reads the
/// digit plus description so the scale stays unambiguous by ear.
const INTENSITY: &[(u8, &str, &str)] = &[
    (1, "Eins", "kein Schmerz"),
    (2, "Zwei", "sehr leicht"),
    (3, "Drei", "leicht"),
    (4, "Vier", "leicht bis mäßig"),
    (5, "Fünf", "mäßig"),
    (6, "Sechs", "mäßig bis stark"),
    (7, "Sieben", "stark"),
    (8, "Acht", "sehr stark"),
    (9, "Neun", "extrem stark"),
    (10, "Zehn", "unerträglich"),
];

fn region_set(name: &'static str, entries: &[(&str, &str)], kind: ItemKind) -> ItemSet {
    let mut items: Vec<ScanItem> = entries
        .iter()
        .map(|(id, label)| ScanItem::plain(id, label, kind.clone()))
        .collect();
    items.push(ScanItem::back("Zurück"));
    ItemSet::new(name, items)
}

pub fn main_regions() -> ItemSet {
    region_set("pain.main", MAIN_REGIONS, ItemKind::Topic)
}

pub fn sub_regions(main_region_id: &str) -> Option<ItemSet> {
    let (name, entries) = match main_region_id {
        "kopf" => ("pain.kopf", KOPF),
        "beine" => ("pain.beine", BEINE),
        "arme" => ("pain.arme", ARME),
        "torso" => ("pain.torso", TORSO),
        _ => return None,
    };
    Some(region_set(name, entries, ItemKind::SubTopic))
}

/// The scale has no back entry: once a location is chosen, an intensity is
/// always collected before the dialog resets.
pub fn intensity_scale() -> ItemSet {
    let items = INTENSITY
        .iter()
        .map(|(level, label, description)| {
            ScanItem::new(
                format!("level-{level}"),
                *label,
                format!("{level}, {description}"),
                ItemKind::Intensity(*level),
            )
        })
        .collect();
    ItemSet::new("pain.intensity", items)
}
