//! Property definitions read from an SGF specification table.
//!
//! Each line of the table describes one property: an optional note character
//! (`*` new in FF[4], `!` changed, `#` non-standard), the identifier, a
//! fixed-width description, the node class keyword, an optional qualifier and
//! the value grammar phrase. An empty line ends the table.

use std::fmt::{self, Write as _};
use std::sync::LazyLock;

static STANDARD_SPEC: &str = include_str!("../data/sgf_properties.txt");

static STANDARD: LazyLock<PropertyTable> = LazyLock::new(|| {
    let (table, _) = PropertyTable::load(STANDARD_SPEC).expect("embedded property table");
    table
});

const DESCRIPTION_WIDTH: usize = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Note {
    Standard,
    New,
    Changed,
    NonStandard,
    Unknown,
}

impl Note {
    fn marker(self) -> &'static str {
        match self {
            Self::Standard => "",
            Self::New => "*",
            Self::Changed => "!",
            Self::NonStandard => "#",
            Self::Unknown => "?",
        }
    }
}

/// Where a property may appear in a game tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropClass {
    None,
    Root,
    Setup,
    GameInfo,
    Move,
}

impl PropClass {
    /// Search order matters: the first keyword found in the line wins.
    const KEYWORDS: [(&'static str, Self); 5] = [
        ("--", Self::None),
        ("root", Self::Root),
        ("setup", Self::Setup),
        ("game-info", Self::GameInfo),
        ("move", Self::Move),
    ];

    pub fn keyword(self) -> &'static str {
        Self::KEYWORDS.iter().find(|(_, class)| *class == self).map_or("--", |(kw, _)| *kw)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Qualifier {
    None,
    Inherit,
    Loa,
    Go,
    Sgc,
}

impl Qualifier {
    const KEYWORDS: [(&'static str, Self); 4] = [
        ("(inherit)", Self::Inherit),
        ("(LOA)", Self::Loa),
        ("(Go)", Self::Go),
        ("(SGC)", Self::Sgc),
    ];

    pub fn keyword(self) -> &'static str {
        Self::KEYWORDS.iter().find(|(_, q)| *q == self).map_or("", |(kw, _)| *kw)
    }
}

/// Value grammar of a property, also used to tag parsed values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Unknown,
    NoneOrComposedNumberText,
    None,
    ComposedNumberText,
    CompressedListOfPoint,
    ListOfComposedPointText,
    ListOfComposedPointPoint,
    EListOfPoint,
    ListOfPoint,
    Point,
    ComposedTextText,
    SimpleText,
    Text,
    NumberOrComposedNumber,
    Number0To3,
    Number1To4,
    Number1To5Or7To16,
    Number,
    Move,
    ListOfStone,
    Stone,
    Real,
    Double,
    Color,
}

impl ValueKind {
    const PHRASES: [(&'static str, Self); 23] = [
        ("none | composed number \":\" simpletext", Self::NoneOrComposedNumberText),
        ("none", Self::None),
        ("composed number \":\" simpletext", Self::ComposedNumberText),
        ("compressed list of point", Self::CompressedListOfPoint),
        ("list of composed point ':' simpletext", Self::ListOfComposedPointText),
        ("list of composed point ':' point", Self::ListOfComposedPointPoint),
        ("elist of point", Self::EListOfPoint),
        ("list of point", Self::ListOfPoint),
        ("point", Self::Point),
        ("composed simpletext ':' simpletext", Self::ComposedTextText),
        ("simpletext", Self::SimpleText),
        ("text", Self::Text),
        ("(number | composed number ':' number)", Self::NumberOrComposedNumber),
        ("number (range: 0-3)", Self::Number0To3),
        ("number (range: 1-4)", Self::Number1To4),
        ("number (range: 1-5,7-16)", Self::Number1To5Or7To16),
        ("number", Self::Number),
        ("move", Self::Move),
        ("list of stone", Self::ListOfStone),
        ("stone", Self::Stone),
        ("real", Self::Real),
        ("double", Self::Double),
        ("color", Self::Color),
    ];

    pub fn from_phrase(phrase: &str) -> Option<Self> {
        Self::PHRASES.iter().find(|(p, _)| *p == phrase).map(|(_, kind)| *kind)
    }

    pub fn phrase(self) -> &'static str {
        Self::PHRASES.iter().find(|(_, kind)| *kind == self).map_or("unknown", |(p, _)| *p)
    }

    /// Kinds whose value may span several bracket groups.
    pub fn is_list(self) -> bool {
        matches!(
            self,
            Self::CompressedListOfPoint
                | Self::ListOfComposedPointText
                | Self::ListOfComposedPointPoint
                | Self::EListOfPoint
                | Self::ListOfPoint
                | Self::ListOfStone
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyDef {
    pub note: Note,
    pub id: Box<str>,
    pub description: Box<str>,
    pub class: PropClass,
    pub qualifier: Qualifier,
    pub value: ValueKind,
}

impl PropertyDef {
    /// Stand-in definition for an identifier missing from the table.
    pub fn unknown(id: &str) -> Self {
        Self {
            note: Note::Unknown,
            id: id.into(),
            description: "Unknown".into(),
            class: PropClass::None,
            qualifier: Qualifier::None,
            value: ValueKind::Unknown,
        }
    }
}

/// Index of a property in the standard table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropId(u8);

impl PropId {
    pub const AB: Self = Self(0);
    pub const AE: Self = Self(1);
    pub const AN: Self = Self(2);
    pub const AP: Self = Self(3);
    pub const AR: Self = Self(4);
    pub const AS: Self = Self(5);
    pub const AW: Self = Self(6);
    pub const B: Self = Self(7);
    pub const BL: Self = Self(8);
    pub const BM: Self = Self(9);
    pub const BR: Self = Self(10);
    pub const BT: Self = Self(11);
    pub const C: Self = Self(12);
    pub const CA: Self = Self(13);
    pub const CP: Self = Self(14);
    pub const CR: Self = Self(15);
    pub const DD: Self = Self(16);
    pub const DM: Self = Self(17);
    pub const DO: Self = Self(18);
    pub const DT: Self = Self(19);
    pub const EV: Self = Self(20);
    pub const FF: Self = Self(21);
    pub const FG: Self = Self(22);
    pub const GB: Self = Self(23);
    pub const GC: Self = Self(24);
    pub const GM: Self = Self(25);
    pub const GN: Self = Self(26);
    pub const GW: Self = Self(27);
    pub const HA: Self = Self(28);
    pub const HO: Self = Self(29);
    pub const IP: Self = Self(30);
    pub const IT: Self = Self(31);
    pub const IY: Self = Self(32);
    pub const KM: Self = Self(33);
    pub const KO: Self = Self(34);
    pub const LB: Self = Self(35);
    pub const LN: Self = Self(36);
    pub const MA: Self = Self(37);
    pub const MN: Self = Self(38);
    pub const N: Self = Self(39);
    pub const OB: Self = Self(40);
    pub const OH: Self = Self(41);
    pub const ON: Self = Self(42);
    pub const OT: Self = Self(43);
    pub const OW: Self = Self(44);
    pub const PB: Self = Self(45);
    pub const PC: Self = Self(46);
    pub const PL: Self = Self(47);
    pub const PM: Self = Self(48);
    pub const PW: Self = Self(49);
    pub const RE: Self = Self(50);
    pub const RO: Self = Self(51);
    pub const RU: Self = Self(52);
    pub const S: Self = Self(53);
    pub const SE: Self = Self(54);
    pub const SL: Self = Self(55);
    pub const SO: Self = Self(56);
    pub const SQ: Self = Self(57);
    pub const ST: Self = Self(58);
    pub const SU: Self = Self(59);
    pub const SZ: Self = Self(60);
    pub const TB: Self = Self(61);
    pub const TE: Self = Self(62);
    pub const TM: Self = Self(63);
    pub const TR: Self = Self(64);
    pub const TW: Self = Self(65);
    pub const UC: Self = Self(66);
    pub const US: Self = Self(67);
    pub const V: Self = Self(68);
    pub const VW: Self = Self(69);
    pub const W: Self = Self(70);
    pub const WL: Self = Self(71);
    pub const WR: Self = Self(72);
    pub const WT: Self = Self(73);

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub fn def(self) -> &'static PropertyDef {
        PropertyTable::standard().get(self)
    }

    pub fn name(self) -> &'static str {
        &self.def().id
    }
}

impl fmt::Display for PropId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolved<'a> {
    Known(PropId, &'a PropertyDef),
    Unknown(PropertyDef),
}

impl Resolved<'_> {
    pub fn def(&self) -> &PropertyDef {
        match self {
            Self::Known(_, def) => def,
            Self::Unknown(def) => def,
        }
    }
}

/// Counts reported after a table has been read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub lines: usize,
    pub bytes: usize,
    pub properties: usize,
    pub warnings: Vec<String>,
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} lines, {} bytes, {} properties", self.lines, self.bytes, self.properties)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("line {line}: {message}")]
    Line { line: usize, message: String },
    #[error("property {current} does not sort after {previous}")]
    Order { previous: String, current: String },
    #[error("line {line}: more than {} properties", PropertyTable::MAX_PROPERTIES)]
    TooLarge { line: usize },
}

#[derive(Clone, Debug, Default)]
pub struct PropertyTable {
    defs: Vec<PropertyDef>,
}

impl PropertyTable {
    /// Properties addressable by a [`PropId`].
    pub const MAX_PROPERTIES: usize = u8::MAX as usize + 1;

    /// The FF[4] table shipped with the crate.
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Reads the shipped table text again and reports what it holds.
    pub fn standard_report() -> Result<LoadReport, LoadError> {
        Self::load(STANDARD_SPEC).map(|(_, report)| report)
    }

    pub fn load(text: &str) -> Result<(Self, LoadReport), LoadError> {
        let mut table = Self::default();
        let mut report = LoadReport::default();

        for line in text.split_inclusive('\n') {
            report.lines += 1;
            report.bytes += line.len();
            let content = line.trim_end_matches(['\n', '\r']);
            if content.is_empty() {
                break;
            }
            if table.defs.len() == Self::MAX_PROPERTIES {
                return Err(LoadError::TooLarge { line: report.lines });
            }
            let def = parse_line(content, &mut report.warnings)
                .map_err(|message| LoadError::Line { line: report.lines, message })?;
            table.defs.push(def);
        }
        report.properties = table.defs.len();
        table.verify_order()?;
        Ok((table, report))
    }

    /// Checks that identifiers are strictly ascending, which binary search
    /// relies on.
    pub fn verify_order(&self) -> Result<(), LoadError> {
        for pair in self.defs.windows(2) {
            if pair[0].id >= pair[1].id {
                return Err(LoadError::Order {
                    previous: pair[0].id.to_string(),
                    current: pair[1].id.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Option<PropId> {
        let index = self.defs.binary_search_by(|def| (*def.id).cmp(id)).ok()?;
        u8::try_from(index).ok().map(PropId)
    }

    pub fn resolve(&self, id: &str) -> Resolved<'_> {
        match self.lookup(id) {
            Some(prop) => Resolved::Known(prop, self.get(prop)),
            None => Resolved::Unknown(PropertyDef::unknown(id)),
        }
    }

    pub fn get(&self, id: PropId) -> &PropertyDef {
        &self.defs[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PropId, &PropertyDef)> {
        (0..=u8::MAX).map(PropId).zip(&self.defs)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (id, def) in self.iter() {
            let _ = writeln!(
                out,
                "{:>2} {:1}{:<3} {:<15} {:<9} {:<9} {}",
                id.index(),
                def.note.marker(),
                def.id,
                def.description,
                def.class.keyword(),
                def.qualifier.keyword(),
                def.value.phrase(),
            );
        }
        out
    }
}

fn parse_line(line: &str, warnings: &mut Vec<String>) -> Result<PropertyDef, String> {
    let (note, rest) = match line.as_bytes()[0] {
        b'*' => (Note::New, &line[1..]),
        b'!' => (Note::Changed, &line[1..]),
        b'#' => (Note::NonStandard, &line[1..]),
        _ => (Note::Standard, line),
    };

    let id_len = rest.find(char::is_whitespace).ok_or("no property after identifier")?;
    if id_len == 0 {
        return Err("no identifier".to_owned());
    }
    let (id, rest) = rest.split_at(id_len);
    let rest = rest.trim();

    let split = rest.char_indices().nth(DESCRIPTION_WIDTH).map_or(rest.len(), |(i, _)| i);
    let (description, rest) = rest.split_at(split);
    let rest = rest.trim();

    let (class, rest) = PropClass::KEYWORDS
        .iter()
        .find_map(|&(kw, class)| rest.find(kw).map(|i| (class, rest[i + kw.len()..].trim())))
        .ok_or_else(|| format!("node class not found: {rest}"))?;

    let (qualifier, rest) = Qualifier::KEYWORDS
        .iter()
        .find_map(|&(kw, q)| rest.find(kw).map(|i| (q, rest[i + kw.len()..].trim())))
        .unwrap_or((Qualifier::None, rest));

    let value = ValueKind::from_phrase(rest).unwrap_or_else(|| {
        warnings.push(format!("{id}: unknown value type {rest:?}"));
        ValueKind::Unknown
    });

    Ok(PropertyDef {
        note,
        id: id.into(),
        description: description.trim().into(),
        class,
        qualifier,
        value,
    })
}
