use std::fmt;

/// Barcode symbologies the scanner can be configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbology {
    /// Code 128
    Code128 = 0,
    /// Code 39
    Code39 = 1,
    /// Code 93
    Code93 = 2,
    /// Codabar
    Codabar = 3,
    /// Interleaved 2 of 5
    Itf = 4,
    /// EAN-13
    Ean13 = 5,
    /// EAN-8
    Ean8 = 6,
    /// UPC-A
    UpcA = 7,
    /// UPC-E
    UpcE = 8,
    /// QR Code
    QrCode = 9,
    /// Data Matrix
    DataMatrix = 10,
    /// PDF417
    Pdf417 = 11,
    /// Aztec
    Aztec = 12,
}

/// Broad symbology family, used to route work to specialized backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbologyFamily {
    /// One-dimensional bar/space codes
    Linear,
    /// Two-dimensional matrix and stacked codes
    Matrix,
}

impl Symbology {
    /// Number of symbologies
    pub const COUNT: usize = 13;

    /// Every symbology, in table order
    pub const ALL: [Symbology; Symbology::COUNT] = [
        Symbology::Code128,
        Symbology::Code39,
        Symbology::Code93,
        Symbology::Codabar,
        Symbology::Itf,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::UpcA,
        Symbology::UpcE,
        Symbology::QrCode,
        Symbology::DataMatrix,
        Symbology::Pdf417,
        Symbology::Aztec,
    ];

    /// The retail EAN/UPC family, toggled together by presets
    pub const EAN_FAMILY: [Symbology; 4] = [
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::UpcA,
        Symbology::UpcE,
    ];

    /// Position in configuration tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short display name used in reports
    pub fn name(self) -> &'static str {
        match self {
            Symbology::Code128 => "Code128",
            Symbology::Code39 => "Code39",
            Symbology::Code93 => "Code93",
            Symbology::Codabar => "Codabar",
            Symbology::Itf => "ITF",
            Symbology::Ean13 => "EAN13",
            Symbology::Ean8 => "EAN8",
            Symbology::UpcA => "UPCA",
            Symbology::UpcE => "UPCE",
            Symbology::QrCode => "QR",
            Symbology::DataMatrix => "DataMatrix",
            Symbology::Pdf417 => "PDF417",
            Symbology::Aztec => "Aztec",
        }
    }

    /// Linear or matrix family
    pub fn family(self) -> SymbologyFamily {
        match self {
            Symbology::QrCode | Symbology::DataMatrix | Symbology::Pdf417 | Symbology::Aztec => {
                SymbologyFamily::Matrix
            }
            _ => SymbologyFamily::Linear,
        }
    }

    /// True for one-dimensional codes
    pub fn is_linear(self) -> bool {
        self.family() == SymbologyFamily::Linear
    }

    /// True for two-dimensional codes
    pub fn is_matrix(self) -> bool {
        self.family() == SymbologyFamily::Matrix
    }

    /// True for codes carrying a GTIN check digit
    pub fn is_gtin(self) -> bool {
        matches!(self, Symbology::Ean13 | Symbology::Ean8 | Symbology::UpcA)
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compact set of symbologies (the decoder "format mask")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SymbologySet(u16);

impl SymbologySet {
    /// Empty set
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Set containing every symbology
    pub fn all() -> Self {
        Symbology::ALL.into_iter().collect()
    }

    /// Every linear symbology
    pub fn linear() -> Self {
        Symbology::ALL.into_iter().filter(|s| s.is_linear()).collect()
    }

    /// Every matrix symbology
    pub fn matrix() -> Self {
        Symbology::ALL.into_iter().filter(|s| s.is_matrix()).collect()
    }

    /// Add a symbology
    pub fn insert(&mut self, symbology: Symbology) {
        self.0 |= 1 << symbology.index();
    }

    /// Remove a symbology
    pub fn remove(&mut self, symbology: Symbology) {
        self.0 &= !(1 << symbology.index());
    }

    /// Membership test
    pub fn contains(&self, symbology: Symbology) -> bool {
        self.0 & (1 << symbology.index()) != 0
    }

    /// Set intersection
    pub fn intersection(&self, other: SymbologySet) -> SymbologySet {
        Self(self.0 & other.0)
    }

    /// True when no symbology is present
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of symbologies in the set
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate members in table order
    pub fn iter(&self) -> impl Iterator<Item = Symbology> + '_ {
        Symbology::ALL.into_iter().filter(|s| self.contains(*s))
    }
}

impl FromIterator<Symbology> for SymbologySet {
    fn from_iter<I: IntoIterator<Item = Symbology>>(iter: I) -> Self {
        let mut set = SymbologySet::empty();
        for s in iter {
            set.insert(s);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_index() {
        for (i, s) in Symbology::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
    }

    #[test]
    fn test_families() {
        assert!(Symbology::Code128.is_linear());
        assert!(Symbology::UpcE.is_linear());
        assert!(Symbology::QrCode.is_matrix());
        assert!(Symbology::Pdf417.is_matrix());
        assert!(Symbology::UpcA.is_gtin());
        assert!(!Symbology::UpcE.is_gtin());
    }

    #[test]
    fn test_set_operations() {
        let mut set: SymbologySet = [Symbology::QrCode, Symbology::Ean13].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(Symbology::QrCode));
        assert!(!set.contains(Symbology::Aztec));

        assert_eq!(
            set.intersection(SymbologySet::linear()).iter().collect::<Vec<_>>(),
            vec![Symbology::Ean13]
        );

        set.remove(Symbology::QrCode);
        set.remove(Symbology::Ean13);
        assert!(set.is_empty());
        assert_eq!(SymbologySet::all().len(), Symbology::COUNT);
        assert_eq!(
            SymbologySet::linear().len() + SymbologySet::matrix().len(),
            Symbology::COUNT
        );
    }
}
