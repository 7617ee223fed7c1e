/// One `(AI)value` element of a GS1 payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gs1Element {
    /// Application identifier digits, without parentheses
    pub ai: String,
    /// Data following the identifier
    pub value: String,
}

impl Gs1Element {
    /// Short GS1 data title for common identifiers
    pub fn description(&self) -> Option<&'static str> {
        ai_title(&self.ai)
    }
}

/// DataMatrix content classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataMatrixPayload {
    /// GS1 element string in human-readable `(AI)value` form
    Gs1(Vec<Gs1Element>),
    /// Anything else, verbatim
    Raw(String),
}

fn ai_title(ai: &str) -> Option<&'static str> {
    let title = match ai {
        "00" => "SSCC",
        "01" => "GTIN",
        "02" => "CONTENT",
        "10" => "BATCH/LOT",
        "11" => "PROD DATE",
        "12" => "DUE DATE",
        "13" => "PACK DATE",
        "15" => "BEST BEFORE",
        "16" => "SELL BY",
        "17" => "USE BY",
        "20" => "VARIANT",
        "21" => "SERIAL",
        "22" => "CPV",
        "30" => "VAR. COUNT",
        "37" => "COUNT",
        "240" => "ADDITIONAL ID",
        "241" => "CUST. PART No.",
        "400" => "ORDER NUMBER",
        "410" => "SHIP TO LOC",
        "420" => "SHIP TO POST",
        _ => return None,
    };
    Some(title)
}

/// True when the payload opens with a known two-digit `(AI)`
fn has_gs1_prefix(payload: &str) -> bool {
    let bytes = payload.as_bytes();
    bytes.len() >= 4
        && bytes[0] == b'('
        && bytes[1].is_ascii_digit()
        && bytes[2].is_ascii_digit()
        && bytes[3] == b')'
        && ai_title(&payload[1..3]).is_some()
}

/// Classify a DataMatrix payload
pub fn classify(payload: &str) -> DataMatrixPayload {
    if has_gs1_prefix(payload) {
        DataMatrixPayload::Gs1(gs1_elements(payload))
    } else {
        DataMatrixPayload::Raw(payload.to_string())
    }
}

/// Split `(AI)value(AI)value...` into elements; an unclosed `(` ends the scan
fn gs1_elements(payload: &str) -> Vec<Gs1Element> {
    let mut elements = Vec::new();
    let mut rest = payload;
    while let Some(open) = rest.find('(') {
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find(')') else {
            break;
        };
        let ai = &after_open[..close];
        let tail = &after_open[close + 1..];
        let end = tail.find('(').unwrap_or(tail.len());
        elements.push(Gs1Element {
            ai: ai.to_string(),
            value: tail[..end].to_string(),
        });
        rest = &tail[end..];
    }
    elements
}
