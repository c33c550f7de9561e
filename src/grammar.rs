//! German phrasing for confirmation sentences.
//!
//! Body parts do not share one pattern: some regions read best as a compound
//! ("Stirnschmerzen"), others need a declined prepositional phrase ("Schmerzen
//! am Hinterkopf", "Schmerzen an den Fingern"). The table below resolves the
//! correct form per sub-region; anything unknown falls back to a generic
//! compound so the sentence stays speakable.

/// How the pain phrase for one body part is built.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PainPhrase {
    /// "Schmerzen <preposition> <object>", with the noun already declined.
    Prepositional {
        preposition: &'static str,
        object: &'static str,
    },
    /// "<stem>schmerzen", with linking letters baked into the stem.
    Compound { stem: &'static str },
}

/// Phrase rules keyed by sub-region id.
const PHRASES: &[(&str, PainPhrase)] = &[
    // Kopf
    ("stirn", PainPhrase::Compound { stem: "Stirn" }),
    (
        "hinterkopf",
        PainPhrase::Prepositional {
            preposition: "am",
            object: "Hinterkopf",
        },
    ),
    ("schlaefe", PainPhrase::Compound { stem: "Schläfen" }),
    (
        "nacken",
        PainPhrase::Prepositional {
            preposition: "im",
            object: "Nacken",
        },
    ),
    (
        "kiefer",
        PainPhrase::Prepositional {
            preposition: "im",
            object: "Kiefer",
        },
    ),
    (
        "nebenhoehlen",
        PainPhrase::Prepositional {
            preposition: "in den",
            object: "Nebenhöhlen",
        },
    ),
    (
        "hals",
        PainPhrase::Prepositional {
            preposition: "im",
            object: "Hals",
        },
    ),
    ("auge", PainPhrase::Compound { stem: "Augen" }),
    ("nase", PainPhrase::Compound { stem: "Nasen" }),
    ("mund", PainPhrase::Compound { stem: "Mund" }),
    (
        "speiseroehre",
        PainPhrase::Prepositional {
            preposition: "in der",
            object: "Speiseröhre",
        },
    ),
    // Beine
    (
        "oberschenkel",
        PainPhrase::Prepositional {
            preposition: "am",
            object: "Oberschenkel",
        },
    ),
    (
        "knie",
        PainPhrase::Prepositional {
            preposition: "am",
            object: "Knie",
        },
    ),
    (
        "unterschenkel",
        PainPhrase::Prepositional {
            preposition: "am",
            object: "Unterschenkel",
        },
    ),
    (
        "knoechel",
        PainPhrase::Prepositional {
            preposition: "am",
            object: "Knöchel",
        },
    ),
    ("fuss", PainPhrase::Compound { stem: "Fuß" }),
    (
        "zehen",
        PainPhrase::Prepositional {
            preposition: "an den",
            object: "Zehen",
        },
    ),
    (
        "huefte",
        PainPhrase::Prepositional {
            preposition: "an der",
            object: "Hüfte",
        },
    ),
    (
        "wade",
        PainPhrase::Prepositional {
            preposition: "an der",
            object: "Wade",
        },
    ),
    (
        "leiste",
        PainPhrase::Prepositional {
            preposition: "in der",
            object: "Leiste",
        },
    ),
    (
        "gesaess",
        PainPhrase::Prepositional {
            preposition: "am",
            object: "Gesäß",
        },
    ),
    (
        "sprunggelenk",
        PainPhrase::Prepositional {
            preposition: "am",
            object: "Sprunggelenk",
        },
    ),
    // Arme
    (
        "oberarm",
        PainPhrase::Prepositional {
            preposition: "am",
            object: "Oberarm",
        },
    ),
    (
        "unterarm",
        PainPhrase::Prepositional {
            preposition: "am",
            object: "Unterarm",
        },
    ),
    (
        "ellenbogen",
        PainPhrase::Prepositional {
            preposition: "am",
            object: "Ellenbogen",
        },
    ),
    (
        "handgelenk",
        PainPhrase::Prepositional {
            preposition: "am",
            object: "Handgelenk",
        },
    ),
    ("hand", PainPhrase::Compound { stem: "Hand" }),
    (
        "finger",
        PainPhrase::Prepositional {
            preposition: "an den",
            object: "Fingern",
        },
    ),
    (
        "schulter",
        PainPhrase::Prepositional {
            preposition: "an der",
            object: "Schulter",
        },
    ),
    ("daumen", PainPhrase::Compound { stem: "Daumen" }),
    (
        "achsel",
        PainPhrase::Prepositional {
            preposition: "in der",
            object: "Achsel",
        },
    ),
    (
        "handruecken",
        PainPhrase::Prepositional {
            preposition: "am",
            object: "Handrücken",
        },
    ),
    (
        "handflaeche",
        PainPhrase::Prepositional {
            preposition: "auf der",
            object: "Handfläche",
        },
    ),
    // Torso
    ("brust", PainPhrase::Compound { stem: "Brust" }),
    ("ruecken", PainPhrase::Compound { stem: "Rücken" }),
    (
        "schulterblatt",
        PainPhrase::Prepositional {
            preposition: "am",
            object: "Schulterblatt",
        },
    ),
    (
        "wirbelsaeule",
        PainPhrase::Prepositional {
            preposition: "an der",
            object: "Wirbelsäule",
        },
    ),
    ("bauch", PainPhrase::Compound { stem: "Bauch" }),
    ("lunge", PainPhrase::Compound { stem: "Lungen" }),
    ("herz", PainPhrase::Compound { stem: "Herz" }),
    ("magen", PainPhrase::Compound { stem: "Magen" }),
    ("leber", PainPhrase::Compound { stem: "Leber" }),
    ("niere", PainPhrase::Compound { stem: "Nieren" }),
    ("blase", PainPhrase::Compound { stem: "Blasen" }),
];

pub fn pain_phrase(sub_region_id: &str) -> Option<PainPhrase> {
    PHRASES
        .iter()
        .find(|(id, _)| *id == sub_region_id)
        .map(|(_, phrase)| *phrase)
}

fn render_phrase(sub_region_id: &str, sub_region_label: &str) -> String {
    match pain_phrase(sub_region_id) {
        Some(PainPhrase::Prepositional {
            preposition,
            object,
        }) => format!("Schmerzen {preposition} {object}"),
        Some(PainPhrase::Compound { stem }) => format!("{stem}schmerzen"),
        None => format!("{sub_region_label}schmerzen"),
    }
}

/// Confirmation sentence for a completed pain assessment. `intensity_text`
/// already carries digit and description ("3, leicht").
pub fn pain_confirmation(
    sub_region_id: &str,
    sub_region_label: &str,
    intensity_text: &str,
) -> String {
    format!(
        "Der Patient hat {} Level {}.",
        render_phrase(sub_region_id, sub_region_label),
        intensity_text
    )
}

/// Spoken when a confirmation sentence cannot be assembled.
pub const PAIN_CONFIRMATION_FALLBACK: &str = "Ihre Angabe wurde gespeichert.";

/// Prompt spoken when entering a main region's sub-region list.
pub fn pain_sub_prompt(main_region_id: &str, main_region_label: &str) -> String {
    match main_region_id {
        // Plural regions take "an den" with a declined noun.
        "beine" => "Wählen Sie einen Bereich an den Beinen aus.".to_string(),
        "arme" => "Wählen Sie einen Bereich an den Armen aus.".to_string(),
        _ => format!("Wählen Sie einen Bereich im {main_region_label} aus."),
    }
}

/// Confirmation sentence for the needs dialog, built from the sub-item's
/// dedicated narration text ("etwas zu essen", "die Jacke", ...).
pub fn needs_confirmation(topic_id: &str, sub_item_narration: &str) -> String {
    match topic_id {
        "ernaehrung" => format!("Ich möchte gerne {sub_item_narration} zu mir nehmen."),
        "gefuehle" => format!("Ich fühle mich {sub_item_narration}."),
        "kleidung" => format!("Ich möchte {sub_item_narration} anziehen."),
        _ => format!("Ich möchte {sub_item_narration}."),
    }
}

pub const NEEDS_CONFIRMATION_FALLBACK: &str = "Auswahl erfasst.";

/// Prompt spoken when entering a needs topic's sub-item list.
pub fn needs_sub_prompt(topic_id: &str) -> &'static str {
    match topic_id {
        "ernaehrung" => "Was wollen Sie zu sich nehmen?",
        "gefuehle" => "Wie fühlen Sie sich?",
        "kleidung" => "Was möchten Sie anziehen?",
        _ => "Was möchten Sie machen?",
    }
}
