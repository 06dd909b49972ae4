use serde::Serialize;
use std::fmt;

/// Number of classes the trained model scores.
pub const NUM_CLASSES: usize = 15;

/// Class names in model output order.
///
/// Index `i` names output score `i` of the trained network, so this order is
/// fixed by the label encoding used at training time. Reordering, adding, or
/// removing an entry silently mislabels every prediction unless the model is
/// retrained (or a remapping layer is put in front of this table).
pub const CLASS_NAMES: [&str; NUM_CLASSES] = [
    "apel busuk",
    "apel segar",
    "apel setengah segar",
    "jeruk busuk",
    "jeruk segar",
    "jeruk setengah segar",
    "melon busuk",
    "melon segar",
    "melon setengah segar",
    "pisang busuk",
    "pisang segar",
    "pisang setengah segar",
    "tomat busuk",
    "tomat segar",
    "tomat setengah segar",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Fruit {
    Apel,
    Jeruk,
    Melon,
    Pisang,
    Tomat,
}

impl Fruit {
    pub const ALL: [Fruit; 5] = [
        Fruit::Apel,
        Fruit::Jeruk,
        Fruit::Melon,
        Fruit::Pisang,
        Fruit::Tomat,
    ];

    /// Display name, as shown on the browse page.
    pub fn name(&self) -> &'static str {
        match self {
            Fruit::Apel => "Apel",
            Fruit::Jeruk => "Jeruk",
            Fruit::Melon => "Melon",
            Fruit::Pisang => "Pisang",
            Fruit::Tomat => "Tomat",
        }
    }

    /// Lowercase form used in class names, URLs and cookies.
    pub fn slug(&self) -> &'static str {
        match self {
            Fruit::Apel => "apel",
            Fruit::Jeruk => "jeruk",
            Fruit::Melon => "melon",
            Fruit::Pisang => "pisang",
            Fruit::Tomat => "tomat",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|fruit| fruit.slug().eq_ignore_ascii_case(slug))
    }
}

impl fmt::Display for Fruit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordinal ripeness condition, freshest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Ripeness {
    Segar,
    SetengahSegar,
    Busuk,
}

impl Ripeness {
    pub const ALL: [Ripeness; 3] = [Ripeness::Segar, Ripeness::SetengahSegar, Ripeness::Busuk];

    pub fn name(&self) -> &'static str {
        match self {
            Ripeness::Segar => "Segar",
            Ripeness::SetengahSegar => "Setengah Segar",
            Ripeness::Busuk => "Busuk",
        }
    }

    fn label_suffix(&self) -> &'static str {
        match self {
            Ripeness::Segar => "segar",
            Ripeness::SetengahSegar => "setengah segar",
            Ripeness::Busuk => "busuk",
        }
    }
}

impl fmt::Display for Ripeness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the class name for a model output index.
pub fn class_name(index: usize) -> Option<&'static str> {
    CLASS_NAMES.get(index).copied()
}

/// Splits a class name such as `"pisang setengah segar"` into its parts.
pub fn parse_class(name: &str) -> Option<(Fruit, Ripeness)> {
    let (fruit, rest) = name.split_once(' ')?;
    let fruit = Fruit::from_slug(fruit)?;
    let ripeness = Ripeness::ALL
        .into_iter()
        .find(|ripeness| ripeness.label_suffix() == rest)?;
    Some((fruit, ripeness))
}
