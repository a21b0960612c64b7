//! Closed registries for dialects, word classes, tenses, attributes, and tags.
//!
//! Every code that may appear inside a document is drawn from one of these
//! enums and validated at the serde boundary, so downstream code never
//! handles an unregistered dialect or word class. Each registry entry carries
//! `{code, value, label}` the way the public dictionary API exposes them.

use serde::{Deserialize, Serialize};

/// Regional dialect of Igbo with its own spelling and pronunciation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dialect {
    NSA,
    UMU,
    ANI,
    AWK,
    BON,
    ECH,
    EGB,
    EZA,
    IZZ,
    IKA,
    IKW,
    MBA,
    NGW,
    OGU,
    OHU,
    OKA,
    ONI,
    OWE,
}

impl Dialect {
    pub const fn all() -> &'static [Dialect] {
        use Dialect::*;
        &[
            NSA, UMU, ANI, AWK, BON, ECH, EGB, EZA, IZZ, IKA, IKW, MBA, NGW, OGU, OHU, OKA, ONI,
            OWE,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Dialect::NSA => "NSA",
            Dialect::UMU => "UMU",
            Dialect::ANI => "ANI",
            Dialect::AWK => "AWK",
            Dialect::BON => "BON",
            Dialect::ECH => "ECH",
            Dialect::EGB => "EGB",
            Dialect::EZA => "EZA",
            Dialect::IZZ => "IZZ",
            Dialect::IKA => "IKA",
            Dialect::IKW => "IKW",
            Dialect::MBA => "MBA",
            Dialect::NGW => "NGW",
            Dialect::OGU => "OGU",
            Dialect::OHU => "OHU",
            Dialect::OKA => "OKA",
            Dialect::ONI => "ONI",
            Dialect::OWE => "OWE",
        }
    }

    /// Stored value; identical to the code for dialects.
    pub fn value(&self) -> &'static str {
        self.code()
    }

    /// Human-readable dialect name.
    pub fn label(&self) -> &'static str {
        match self {
            Dialect::NSA => "Nsụka",
            Dialect::UMU => "Ụmụahịa",
            Dialect::ANI => "Anịọcha",
            Dialect::AWK => "Ọka (Awka)",
            Dialect::BON => "Ụbanị (Bonny)",
            Dialect::ECH => "Echie",
            Dialect::EGB => "Egbema",
            Dialect::EZA => "Ezaa",
            Dialect::IZZ => "Izzi",
            Dialect::IKA => "Ika",
            Dialect::IKW => "Ikwere",
            Dialect::MBA => "Mbaise",
            Dialect::NGW => "Ngwa",
            Dialect::OGU => "Ogụta",
            Dialect::OHU => "Ohuhu",
            Dialect::OKA => "Ọka",
            Dialect::ONI => "Onịcha",
            Dialect::OWE => "Owere",
        }
    }

    pub fn from_code(code: &str) -> Option<Dialect> {
        Dialect::all().iter().copied().find(|d| d.code() == code)
    }
}

/// Grammatical word class. The set is closed: a word either has one of these
/// or has no class assigned yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WordClass {
    ADJ,
    ADV,
    AV,
    MV,
    PV,
    CJN,
    DEM,
    NM,
    NNC,
    NNP,
    CD,
    PREP,
    ISUF,
    ESUF,
    INTJ,
    PRN,
    WH,
}

impl WordClass {
    pub fn value(&self) -> &'static str {
        match self {
            WordClass::ADJ => "ADJ",
            WordClass::ADV => "ADV",
            WordClass::AV => "AV",
            WordClass::MV => "MV",
            WordClass::PV => "PV",
            WordClass::CJN => "CJN",
            WordClass::DEM => "DEM",
            WordClass::NM => "NM",
            WordClass::NNC => "NNC",
            WordClass::NNP => "NNP",
            WordClass::CD => "CD",
            WordClass::PREP => "PREP",
            WordClass::ISUF => "ISUF",
            WordClass::ESUF => "ESUF",
            WordClass::INTJ => "INTJ",
            WordClass::PRN => "PRN",
            WordClass::WH => "WH",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WordClass::ADJ => "Adjective",
            WordClass::ADV => "Adverb",
            WordClass::AV => "Active verb",
            WordClass::MV => "Medial verb",
            WordClass::PV => "Passive verb",
            WordClass::CJN => "Conjunction",
            WordClass::DEM => "Demonstrative",
            WordClass::NM => "Name",
            WordClass::NNC => "Common noun",
            WordClass::NNP => "Proper noun",
            WordClass::CD => "Numeral",
            WordClass::PREP => "Preposition",
            WordClass::ISUF => "Interfix",
            WordClass::ESUF => "Extensional suffix",
            WordClass::INTJ => "Interjection",
            WordClass::PRN => "Pronoun",
            WordClass::WH => "Interrogative",
        }
    }

    /// Whether words of this class carry example sentences at all.
    ///
    /// Suffixes, interfixes, interrogatives, and numerals never take
    /// standalone examples; this structural signal feeds the
    /// "as complete as possible" waiver.
    pub fn takes_examples(&self) -> bool {
        !matches!(
            self,
            WordClass::ESUF | WordClass::ISUF | WordClass::WH | WordClass::CD
        )
    }
}

/// Verb tense slots on a word document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tense {
    Infinitive,
    Imperative,
    SimplePresent,
    PresentContinuous,
    PresentPassive,
    SimplePast,
    Future,
}

impl Tense {
    pub fn value(&self) -> &'static str {
        match self {
            Tense::Infinitive => "infinitive",
            Tense::Imperative => "imperative",
            Tense::SimplePresent => "simplePresent",
            Tense::PresentContinuous => "presentContinuous",
            Tense::PresentPassive => "presentPassive",
            Tense::SimplePast => "simplePast",
            Tense::Future => "future",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tense::Infinitive => "Infinitive",
            Tense::Imperative => "Imperative",
            Tense::SimplePresent => "Simple present",
            Tense::PresentContinuous => "Present continuous",
            Tense::PresentPassive => "Present passive",
            Tense::SimplePast => "Simple past",
            Tense::Future => "Future",
        }
    }
}

/// Boolean attributes a word document may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WordAttribute {
    IsStandardIgbo,
    IsAccented,
    IsSlang,
    IsConstructedTerm,
}

impl WordAttribute {
    pub fn value(&self) -> &'static str {
        match self {
            WordAttribute::IsStandardIgbo => "isStandardIgbo",
            WordAttribute::IsAccented => "isAccented",
            WordAttribute::IsSlang => "isSlang",
            WordAttribute::IsConstructedTerm => "isConstructedTerm",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WordAttribute::IsStandardIgbo => "Is Standard Igbo",
            WordAttribute::IsAccented => "Is Accented",
            WordAttribute::IsSlang => "Is Slang",
            WordAttribute::IsConstructedTerm => "Is Constructed Term",
        }
    }
}

/// Register of an example sentence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExampleStyle {
    #[default]
    Standard,
    Proverb,
}

impl ExampleStyle {
    pub fn value(&self) -> &'static str {
        match self {
            ExampleStyle::Standard => "standard",
            ExampleStyle::Proverb => "proverb",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExampleStyle::Standard => "Standard",
            ExampleStyle::Proverb => "Proverb",
        }
    }
}

/// Topical tag on a word document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WordTag {
    Commerce,
    Agriculture,
    Technology,
    Medicine,
    Kinship,
    Religion,
}

impl WordTag {
    pub fn value(&self) -> &'static str {
        match self {
            WordTag::Commerce => "commerce",
            WordTag::Agriculture => "agriculture",
            WordTag::Technology => "technology",
            WordTag::Medicine => "medicine",
            WordTag::Kinship => "kinship",
            WordTag::Religion => "religion",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WordTag::Commerce => "Commerce",
            WordTag::Agriculture => "Agriculture",
            WordTag::Technology => "Technology",
            WordTag::Medicine => "Medicine",
            WordTag::Kinship => "Kinship",
            WordTag::Religion => "Religion",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_codes_roundtrip() {
        for dialect in Dialect::all() {
            assert_eq!(Dialect::from_code(dialect.code()), Some(*dialect));
        }
    }

    #[test]
    fn unknown_dialect_code_rejected() {
        assert_eq!(Dialect::from_code("XYZ"), None);
        assert!(serde_json::from_str::<Dialect>("\"XYZ\"").is_err());
    }

    #[test]
    fn every_dialect_has_a_label() {
        for dialect in Dialect::all() {
            assert!(!dialect.label().is_empty());
        }
    }

    #[test]
    fn suffixes_and_numerals_never_take_examples() {
        assert!(!WordClass::ESUF.takes_examples());
        assert!(!WordClass::ISUF.takes_examples());
        assert!(!WordClass::WH.takes_examples());
        assert!(!WordClass::CD.takes_examples());
        assert!(WordClass::NNC.takes_examples());
        assert!(WordClass::AV.takes_examples());
    }

    #[test]
    fn tense_serializes_by_value() {
        assert_eq!(
            serde_json::to_string(&Tense::SimplePresent).unwrap(),
            "\"simplePresent\""
        );
    }
}
