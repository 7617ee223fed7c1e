//! Declarative scanner configuration and presets
//!
//! Per-symbology flags live in a fixed table indexed by [`Symbology`], so a
//! configuration can only ever mention symbologies the scanner knows about.

use crate::models::{Symbology, SymbologySet};

/// Flags kept for every symbology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SymbologySettings {
    /// Decode this symbology
    pub enabled: bool,
    /// Also try a color-inverted image for it
    pub inverted_retry: bool,
}

/// Image enhancement profile applied before decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreprocessProfile {
    /// Grayscale only; printed labels are usually high contrast
    #[default]
    ShippingLabel,
    /// Upscale, equalize, denoise, sharpen and binarize
    LowResolution,
}

/// Named configuration presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPreset {
    /// Common 1D codes plus QR and DataMatrix on printed labels
    ShippingLabel,
    /// Everything enabled, aggressive enhancement for small or blurry codes
    LowResolution,
}

/// Scanner settings; handed by reference to each decode call
#[derive(Debug, Clone, PartialEq)]
pub struct ScannerConfiguration {
    symbologies: [SymbologySettings; Symbology::COUNT],
    max_codes_per_frame: usize,
    search_whole_image: bool,
    try_harder: bool,
    profile: PreprocessProfile,
}

impl Default for ScannerConfiguration {
    fn default() -> Self {
        Self {
            symbologies: [SymbologySettings::default(); Symbology::COUNT],
            max_codes_per_frame: 1,
            search_whole_image: false,
            try_harder: false,
            profile: PreprocessProfile::ShippingLabel,
        }
    }
}

impl ScannerConfiguration {
    /// Empty configuration: nothing enabled, one code per frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a preset configuration
    pub fn from_preset(preset: ScanPreset) -> Self {
        match preset {
            ScanPreset::ShippingLabel => Self::shipping_label(),
            ScanPreset::LowResolution => Self::low_resolution(),
        }
    }

    /// Printed shipping labels: Code128, Code39, the EAN/UPC family, QR and
    /// DataMatrix, with inversion retry on the 1D codes.
    pub fn shipping_label() -> Self {
        let mut config = Self::default();
        let linear = [Symbology::Code128, Symbology::Code39]
            .into_iter()
            .chain(Symbology::EAN_FAMILY);
        for symbology in linear {
            config.set_symbology_enabled(symbology, true);
            config.set_inversion_enabled(symbology, true);
        }
        config.set_symbology_enabled(Symbology::QrCode, true);
        config.set_symbology_enabled(Symbology::DataMatrix, true);

        config.set_max_codes_per_frame(10);
        config.set_search_whole_image(true);
        config.set_try_harder(true);
        config.set_profile(PreprocessProfile::ShippingLabel);
        config
    }

    /// Small, blurry or low-contrast codes: every symbology, inversion retry
    /// everywhere, full enhancement chain.
    pub fn low_resolution() -> Self {
        let mut config = Self::default();
        for symbology in Symbology::ALL {
            config.set_symbology_enabled(symbology, true);
            config.set_inversion_enabled(symbology, true);
        }
        config.set_max_codes_per_frame(20);
        config.set_search_whole_image(true);
        config.set_try_harder(true);
        config.set_profile(PreprocessProfile::LowResolution);
        config
    }

    /// Enable or disable a symbology
    pub fn set_symbology_enabled(&mut self, symbology: Symbology, enabled: bool) -> &mut Self {
        self.symbologies[symbology.index()].enabled = enabled;
        self
    }

    /// Enable or disable the inverted-image retry for a symbology
    pub fn set_inversion_enabled(&mut self, symbology: Symbology, enabled: bool) -> &mut Self {
        self.symbologies[symbology.index()].inverted_retry = enabled;
        self
    }

    /// Maximum results per frame; values below 1 are raised to 1
    pub fn set_max_codes_per_frame(&mut self, max_codes: usize) -> &mut Self {
        self.max_codes_per_frame = max_codes.max(1);
        self
    }

    /// Search the whole image for multiple codes
    pub fn set_search_whole_image(&mut self, search: bool) -> &mut Self {
        self.search_whole_image = search;
        self
    }

    /// Trade latency for recall in the backends
    pub fn set_try_harder(&mut self, try_harder: bool) -> &mut Self {
        self.try_harder = try_harder;
        self
    }

    /// Select the preprocessing profile
    pub fn set_profile(&mut self, profile: PreprocessProfile) -> &mut Self {
        self.profile = profile;
        self
    }

    /// Settings for one symbology
    pub fn symbology(&self, symbology: Symbology) -> SymbologySettings {
        self.symbologies[symbology.index()]
    }

    /// Whether `symbology` is decoded
    pub fn is_enabled(&self, symbology: Symbology) -> bool {
        self.symbology(symbology).enabled
    }

    /// Whether inverted variants are tried for `symbology`
    pub fn is_inversion_enabled(&self, symbology: Symbology) -> bool {
        self.symbology(symbology).inverted_retry
    }

    /// Enabled symbologies as a format mask
    pub fn enabled_symbologies(&self) -> SymbologySet {
        Symbology::ALL
            .into_iter()
            .filter(|s| self.is_enabled(*s))
            .collect()
    }

    /// True when any enabled symbology asks for an inverted retry
    pub fn wants_inverted_variants(&self) -> bool {
        Symbology::ALL
            .into_iter()
            .any(|s| self.is_enabled(s) && self.is_inversion_enabled(s))
    }

    /// Result cap per frame, at least 1
    pub fn max_codes_per_frame(&self) -> usize {
        self.max_codes_per_frame
    }

    /// Multi-symbol search over the whole image
    pub fn search_whole_image(&self) -> bool {
        self.search_whole_image
    }

    /// Slower, more thorough decoding
    pub fn try_harder(&self) -> bool {
        self.try_harder
    }

    /// Preprocessing chain selected by the configuration
    pub fn profile(&self) -> PreprocessProfile {
        self.profile
    }
}
