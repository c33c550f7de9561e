//! Everyday needs picker: topics and sub-items with dedicated narration text.
//!
//! Sub-item narration is the grammatical object later embedded in the
//! confirmation sentence ("die Jacke" folds into "Ich möchte die Jacke
//! anziehen."), so it can differ from the display label.

use crate::scan::{ItemKind, ItemSet, ScanItem};

pub const TOP_PROMPT: &str = "Was möchten Sie machen?";

const TOPICS: &[(&str, &str)] = &[
    ("ernaehrung", "Ernährung"),
    ("gefuehle", "Gefühle"),
    ("kleidung", "Kleidung"),
    ("hygiene", "Hygiene"),
    ("bewegung", "Bewegung"),
];

/// (id, label, narration)
const ERNAEHRUNG: &[(&str, &str, &str)] = &[
    ("essen", "Essen", "etwas zu essen"),
    ("trinken", "Trinken", "etwas zu trinken"),
    ("suess", "süß", "etwas Süßes"),
    ("herzhaft", "herzhaft", "etwas Herzhaftes"),
    ("scharf", "scharf", "etwas Scharfes"),
    ("kalt", "kalt", "etwas Kaltes"),
    ("warm", "warm", "etwas Warmes"),
    ("lauwarm", "lauwarm", "etwas Lauwarmes"),
    ("trocken", "trocken", "etwas Trockenes"),
    ("nass", "nass", "etwas Nasses"),
    ("breiig", "breiig", "etwas Breiiges"),
    ("wasser", "Wasser", "Wasser"),
    ("saft", "Saft", "den Saft"),
    ("milch", "Milch", "die Milch"),
];

const GEFUEHLE: &[(&str, &str, &str)] = &[
    ("gluecklich", "glücklich", "glücklich"),
    ("traurig", "traurig", "traurig"),
    ("wuetend", "wütend", "wütend"),
    ("aengstlich", "ängstlich", "ängstlich"),
    ("muede", "müde", "müde"),
    ("energisch", "energisch", "energisch"),
    ("entspannt", "entspannt", "entspannt"),
    ("angespannt", "angespannt", "angespannt"),
    ("einsam", "einsam", "einsam"),
    ("geliebt", "geliebt", "geliebt"),
    ("stolz", "stolz", "stolz"),
];

const KLEIDUNG: &[(&str, &str, &str)] = &[
    ("muetze", "Mütze", "die Mütze"),
    ("schal", "Schal", "den Schal"),
    ("hemd", "Hemd", "das Hemd"),
    ("tshirt", "T-Shirt", "das T-Shirt"),
    ("pullover", "Pullover", "den Pullover"),
    ("jacke", "Jacke", "die Jacke"),
    ("hose", "Hose", "die Hose"),
    ("socken", "Socken", "die Socken"),
    ("schuhe", "Schuhe", "die Schuhe"),
    ("unterwaesche", "Unterwäsche", "die Unterwäsche"),
];

const HYGIENE: &[(&str, &str, &str)] = &[
    ("duschen", "Duschen", "duschen"),
    ("baden", "Baden", "baden"),
    ("haare", "Haare waschen", "mir die Haare waschen"),
    ("zaehne", "Zähne putzen", "mir die Zähne putzen"),
    ("gesicht", "Gesicht waschen", "mir das Gesicht waschen"),
    ("rasieren", "Rasieren", "mich rasieren"),
    ("eincremen", "Creme auftragen", "mich eincremen"),
    ("toilette", "Toilette", "auf die Toilette gehen"),
    ("haende", "Hände waschen", "mir die Hände waschen"),
];

const BEWEGUNG: &[(&str, &str, &str)] = &[
    ("gehen", "Gehen", "gehen"),
    ("aufstehen", "Aufstehen", "aufstehen"),
    ("sitzen", "Sitzen", "sitzen"),
    ("spazieren", "Spazieren", "spazieren"),
    ("dehnen", "Dehnen", "mich dehnen"),
    ("massage", "Massage", "eine Massage"),
    ("meditieren", "Meditieren", "meditieren"),
];

fn topic_set(name: &'static str, entries: &[(&str, &str, &str)]) -> ItemSet {
    let mut items: Vec<ScanItem> = entries
        .iter()
        .map(|(id, label, narration)| ScanItem::new(*id, *label, *narration, ItemKind::SubTopic))
        .collect();
    items.push(ScanItem::back("Zurück"));
    ItemSet::new(name, items)
}

pub fn topics() -> ItemSet {
    let mut items: Vec<ScanItem> = TOPICS
        .iter()
        .map(|(id, label)| ScanItem::plain(id, label, ItemKind::Topic))
        .collect();
    items.push(ScanItem::back("Zurück"));
    ItemSet::new("needs.topics", items)
}

pub fn sub_items(topic_id: &str) -> Option<ItemSet> {
    let (name, entries) = match topic_id {
        "ernaehrung" => ("needs.ernaehrung", ERNAEHRUNG),
        "gefuehle" => ("needs.gefuehle", GEFUEHLE),
        "kleidung" => ("needs.kleidung", KLEIDUNG),
        "hygiene" => ("needs.hygiene", HYGIENE),
        "bewegung" => ("needs.bewegung", BEWEGUNG),
        _ => return None,
    };
    Some(topic_set(name, entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::needs_confirmation;

    #[test]
    fn every_topic_has_sub_items_ending_in_back() {
        let topics = topics();
        for topic in topics.iter().filter(|item| !item.is_back()) {
            let subs = sub_items(&topic.id).expect("every topic has sub items");
            assert!(subs.get(subs.len() - 1).unwrap().is_back());
        }
    }

    #[test]
    fn narration_feeds_the_confirmation_sentence() {
        let subs = sub_items("kleidung").unwrap();
        let jacke = subs.iter().find(|item| item.id == "jacke").unwrap();
        assert_eq!(
            needs_confirmation("kleidung", &jacke.narration),
            "Ich möchte die Jacke anziehen."
        );
    }
}
