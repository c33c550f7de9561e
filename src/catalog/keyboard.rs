//! The fixed six-row keyboard layout and its per-key narration labels.

use crate::scan::{ItemKind, ItemSet, KeyToken, ScanItem};

/// Spoken once per user before the very first row scan.
pub const INTRO: &str = "Willkommen in der virtuellen Tastatur. \
Blinzeln Sie, um eine Zeile auszuwählen. Danach laufen die Buchstaben dieser \
Zeile automatisch durch. Blinzeln Sie erneut, um einen Buchstaben auszuwählen. \
So können Sie Schritt für Schritt Wörter und Sätze bilden. Die Tastatur läuft \
in einer Endlosschleife, damit Sie jederzeit weiterschreiben können.";

pub const ROW_SELECTED: &str = "Zeile ausgewählt. Buchstaben laufen.";
pub const INACTIVITY_NOTICE: &str = "Keine Eingabe erkannt. Zurück zur Zeilenauswahl.";

/// One keyboard row: the entry scanned at row level plus its key list.
struct KeyboardRow {
    id: &'static str,
    narration: &'static str,
    glyphs: &'static [&'static str],
    control: bool,
}

const ROWS: &[KeyboardRow] = &[
    KeyboardRow {
        id: "row1",
        narration: "Zeile eins, Buchstaben A bis K",
        glyphs: &["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K"],
        control: false,
    },
    KeyboardRow {
        id: "row2",
        narration: "Zeile zwei, Buchstaben L bis V",
        glyphs: &["L", "M", "N", "O", "P", "Q", "R", "S", "T", "U", "V"],
        control: false,
    },
    KeyboardRow {
        id: "row3",
        narration: "Zeile drei, Buchstaben W bis Fragezeichen",
        glyphs: &["W", "X", "Y", "Z", "Ä", "Ö", "Ü", "ß", ".", ",", "?"],
        control: false,
    },
    KeyboardRow {
        id: "row4",
        narration: "Zeile vier, Silben und Lautkombinationen",
        glyphs: &[
            "SCH", "CH", "EI", "IE", "AU", "EU", "ÄU", "PF", "PH", "CK", "NK",
        ],
        control: false,
    },
    KeyboardRow {
        id: "row5",
        narration: "Zeile fünf, kurze Wörter",
        glyphs: &["JA", "NEIN", "ICH", "DU", "ES", "IST", "BIN"],
        control: false,
    },
    KeyboardRow {
        id: "row6",
        narration: "Zeile sechs, Steuerungstasten",
        glyphs: &[],
        control: true,
    },
];

const DIGRAPHS: &[&str] = &[
    "SCH", "CH", "EI", "IE", "AU", "EU", "ÄU", "PF", "PH", "CK", "NK",
];
const SHORT_WORDS: &[&str] = &["JA", "NEIN", "ICH", "DU", "ES", "IST", "BIN"];

/// How a key is read aloud. Single letters are prefixed so "E" and "D" stay
/// distinguishable; specials get their German names.
pub fn key_narration(glyph: &str) -> String {
    match glyph {
        "ß" => "scharfes S".to_string(),
        "Ä" => "Ä Umlaut".to_string(),
        "Ö" => "Ö Umlaut".to_string(),
        "Ü" => "Ü Umlaut".to_string(),
        "." => "Punkt".to_string(),
        "," => "Komma".to_string(),
        "?" => "Fragezeichen".to_string(),
        glyph if DIGRAPHS.contains(&glyph) => format!("Silbe {glyph}"),
        glyph if SHORT_WORDS.contains(&glyph) => format!("Wort {glyph}"),
        glyph => format!("Buchstabe {glyph}"),
    }
}

pub fn row_count() -> usize {
    ROWS.len()
}

/// The row-level item set: one entry per row, no back entry (leaving the
/// keyboard goes through the control row's Zurück key).
pub fn row_set() -> ItemSet {
    let items = ROWS
        .iter()
        .enumerate()
        .map(|(index, row)| ScanItem::new(row.id, row.narration, row.narration, ItemKind::Row(index)))
        .collect();
    ItemSet::new("keyboard.rows", items)
}

/// Keys of one row. The control row carries space, delete, and the terminal
/// back key; every other row is its glyphs.
pub fn key_set(row_index: usize) -> Option<ItemSet> {
    let row = ROWS.get(row_index)?;
    let items: Vec<ScanItem> = if row.control {
        vec![
            ScanItem::new(
                "leerzeichen",
                "LEERZEICHEN",
                "Leerzeichen",
                ItemKind::Key(KeyToken::Space),
            ),
            ScanItem::new(
                "loeschen",
                "LÖSCHEN",
                "Löschen",
                ItemKind::Key(KeyToken::Delete),
            ),
            ScanItem::new("zurueck", "ZURÜCK", "Zurück", ItemKind::Back),
        ]
    } else {
        row.glyphs
            .iter()
            .map(|glyph| {
                ScanItem::new(
                    glyph.to_lowercase(),
                    *glyph,
                    key_narration(glyph),
                    ItemKind::Key(KeyToken::Glyph((*glyph).to_string())),
                )
            })
            .collect()
    };
    Some(ItemSet::new("keyboard.keys", items))
}

/// Display labels per row, for the layout listing.
pub fn row_labels(row_index: usize) -> Vec<String> {
    key_set(row_index)
        .map(|set| set.iter().map(|item| item.label.clone()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_rows_and_control_row_is_last() {
        assert_eq!(row_count(), 6);
        let control = key_set(5).unwrap();
        assert_eq!(control.len(), 3);
        assert!(control.get(2).unwrap().is_back());
    }

    #[test]
    fn letter_rows_have_no_terminal_entry() {
        for row in 0..5 {
            let keys = key_set(row).unwrap();
            assert!(keys.iter().all(|item| !item.is_back()), "row {row}");
        }
    }

    #[test]
    fn key_narrations_disambiguate_specials() {
        assert_eq!(key_narration("A"), "Buchstabe A");
        assert_eq!(key_narration("SCH"), "Silbe SCH");
        assert_eq!(key_narration("JA"), "Wort JA");
        assert_eq!(key_narration("ß"), "scharfes S");
        assert_eq!(key_narration("?"), "Fragezeichen");
    }

    #[test]
    fn out_of_range_row_yields_nothing() {
        assert!(key_set(6).is_none());
    }
}
