//! Symbology-specific interpretation of decoded payloads
//!
//! Parsing never changes a result's data and never fails: structural
//! problems (a short GTIN, say) are reported inside the details.

/// DataMatrix payload classification
pub mod datamatrix;
/// GTIN check-digit validation
pub mod gtin;
/// QR payload classification
pub mod qr;

pub use datamatrix::{DataMatrixPayload, Gs1Element};
pub use gtin::GtinCheck;
pub use qr::{QrPayload, VCard, WifiConfig};

use crate::models::{BarcodeResult, Symbology};
use std::fmt;

/// Structured format details attached to every result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatDetails {
    /// EAN-13, EAN-8 and UPC-A
    Gtin {
        /// Payload as read
        gtin: String,
        /// Check-digit outcome
        check: GtinCheck,
    },
    /// QR content class
    Qr(QrPayload),
    /// DataMatrix content class
    DataMatrix(DataMatrixPayload),
    /// Symbologies without a dedicated parser
    Standard,
}

impl FormatDetails {
    /// Details for `payload` read as `symbology`
    pub fn parse(symbology: Symbology, payload: &str) -> Self {
        match symbology {
            s if s.is_gtin() => FormatDetails::Gtin {
                gtin: payload.to_string(),
                check: gtin::validate(payload),
            },
            Symbology::QrCode => FormatDetails::Qr(qr::classify(payload)),
            Symbology::DataMatrix => FormatDetails::DataMatrix(datamatrix::classify(payload)),
            _ => FormatDetails::Standard,
        }
    }

    /// True for a structurally invalid payload
    pub fn is_invalid_format(&self) -> bool {
        matches!(
            self,
            FormatDetails::Gtin {
                check: GtinCheck::Invalid { .. },
                ..
            }
        )
    }
}

fn field(f: &mut fmt::Formatter<'_>, label: &str, value: &Option<String>) -> fmt::Result {
    match value {
        Some(v) => write!(f, "\n{label}: {v}"),
        None => Ok(()),
    }
}

impl fmt::Display for FormatDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatDetails::Gtin {
                check: GtinCheck::Invalid { reason },
                ..
            } => write!(f, "Invalid GTIN: {reason}"),
            FormatDetails::Gtin {
                gtin,
                check: GtinCheck::Checked { computed, valid },
            } => write!(
                f,
                "GTIN: {gtin}\nCheck Digit: {computed}\nValid: {}",
                if *valid { "Yes" } else { "No" }
            ),
            FormatDetails::Qr(payload) => {
                f.write_str("QR Code Data:\n")?;
                match payload {
                    QrPayload::Url(url) => write!(f, "Type: URL\nURL: {url}"),
                    QrPayload::VCard(card) => {
                        f.write_str("Type: vCard")?;
                        field(f, "Name", &card.name)?;
                        field(f, "Phone", &card.phone)?;
                        field(f, "Email", &card.email)
                    }
                    QrPayload::Wifi(wifi) => {
                        f.write_str("Type: WiFi")?;
                        field(f, "SSID", &wifi.ssid)?;
                        field(f, "Security", &wifi.security)?;
                        field(f, "Password", &wifi.password)?;
                        if wifi.hidden {
                            f.write_str("\nHidden: Yes")?;
                        }
                        Ok(())
                    }
                    QrPayload::Text(text) => write!(f, "Type: Text\nContent: {text}"),
                }
            }
            FormatDetails::DataMatrix(payload) => {
                f.write_str("DataMatrix Content:\n")?;
                match payload {
                    DataMatrixPayload::Gs1(elements) => {
                        f.write_str("Type: GS1")?;
                        for e in elements {
                            match e.description() {
                                Some(title) => write!(f, "\nAI {} ({title}): {}", e.ai, e.value)?,
                                None => write!(f, "\nAI {}: {}", e.ai, e.value)?,
                            }
                        }
                        Ok(())
                    }
                    DataMatrixPayload::Raw(raw) => write!(f, "Type: Raw Data\nContent: {raw}"),
                }
            }
            FormatDetails::Standard => f.write_str("Standard format"),
        }
    }
}

/// Fill in structured and rendered details for aggregated results
pub fn annotate(results: &mut [BarcodeResult]) {
    for result in results {
        let details = FormatDetails::parse(result.symbology, &result.data);
        result.format_details = details.to_string();
        result.details = details;
    }
}
