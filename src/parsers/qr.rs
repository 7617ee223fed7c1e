/// Contact fields pulled from a vCard payload
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VCard {
    /// `FN` property
    pub name: Option<String>,
    /// First `TEL` property
    pub phone: Option<String>,
    /// First `EMAIL` property
    pub email: Option<String>,
}

/// Network fields of a `WIFI:` payload
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WifiConfig {
    /// Network name (`S:`)
    pub ssid: Option<String>,
    /// Authentication type (`WPA`, `WEP`, `nopass`, ...)
    pub security: Option<String>,
    /// Passphrase (`P:`)
    pub password: Option<String>,
    /// `H:true`
    pub hidden: bool,
}

/// Content classes recognised in QR payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrPayload {
    /// `http://` or `https://` link
    Url(String),
    /// Payload containing `BEGIN:VCARD`
    VCard(VCard),
    /// `WIFI:` network configuration
    Wifi(WifiConfig),
    /// Anything else
    Text(String),
}

/// Classify a QR payload. First match wins: URL, vCard, WiFi, text.
pub fn classify(payload: &str) -> QrPayload {
    if payload.starts_with("http://") || payload.starts_with("https://") {
        QrPayload::Url(payload.to_string())
    } else if payload.contains("BEGIN:VCARD") {
        QrPayload::VCard(parse_vcard(payload))
    } else if let Some(body) = payload.strip_prefix("WIFI:") {
        QrPayload::Wifi(parse_wifi(body))
    } else {
        QrPayload::Text(payload.to_string())
    }
}

fn parse_vcard(payload: &str) -> VCard {
    let mut card = VCard::default();
    for line in payload.lines() {
        let line = line.trim_end_matches('\r');
        let Some((head, value)) = line.split_once(':') else {
            continue;
        };
        // TEL;TYPE=CELL:... carries parameters after the property name
        let property = head.split(';').next().unwrap_or(head);
        let slot = if property.eq_ignore_ascii_case("FN") {
            &mut card.name
        } else if property.eq_ignore_ascii_case("TEL") {
            &mut card.phone
        } else if property.eq_ignore_ascii_case("EMAIL") {
            &mut card.email
        } else {
            continue;
        };
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }
    card
}

/// `S:ssid;T:WPA;P:pass;H:true;;` with `\` escaping `;`, `:`, `,` and `\`
fn parse_wifi(body: &str) -> WifiConfig {
    let mut config = WifiConfig::default();
    for (key, value) in wifi_fields(body) {
        match key.as_str() {
            "S" => config.ssid = Some(value),
            "T" => config.security = Some(value),
            "P" => config.password = Some(value),
            "H" => config.hidden = value.eq_ignore_ascii_case("true"),
            _ => {}
        }
    }
    config
}

fn wifi_fields(body: &str) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    let mut key = String::new();
    let mut value = String::new();
    let mut in_value = false;

    let mut chars = body.chars();
    while let Some(mut c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => c = escaped,
                None => break,
            },
            ':' if !in_value => {
                in_value = true;
                continue;
            }
            ';' => {
                if in_value {
                    fields.push((std::mem::take(&mut key), std::mem::take(&mut value)));
                }
                key.clear();
                in_value = false;
                continue;
            }
            _ => {}
        }
        if in_value {
            value.push(c);
        } else {
            key.push(c);
        }
    }
    if in_value {
        fields.push((key, value));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url() {
        assert_eq!(
            classify("https://example.com"),
            QrPayload::Url("https://example.com".into())
        );
        assert!(matches!(classify("http://a.b/c"), QrPayload::Url(_)));
        assert!(matches!(classify("ftp://a.b"), QrPayload::Text(_)));
    }

    #[test]
    fn test_vcard() {
        let payload = "BEGIN:VCARD\nVERSION:3.0\nFN:John Doe\nTEL:555-1234\nEND:VCARD";
        let QrPayload::VCard(card) = classify(payload) else {
            panic!("expected vCard");
        };
        assert_eq!(card.name.as_deref(), Some("John Doe"));
        assert_eq!(card.phone.as_deref(), Some("555-1234"));
        assert_eq!(card.email, None);
    }

    #[test]
    fn test_vcard_parameters_and_crlf() {
        let payload = "BEGIN:VCARD\r\nfn:Jane Roe\r\nTEL;TYPE=CELL:+1 555 0000\r\n\
                       EMAIL;TYPE=INTERNET:jane@example.com\r\nTEL:ignored\r\nEND:VCARD\r\n";
        let QrPayload::VCard(card) = classify(payload) else {
            panic!("expected vCard");
        };
        assert_eq!(card.name.as_deref(), Some("Jane Roe"));
        assert_eq!(card.phone.as_deref(), Some("+1 555 0000"));
        assert_eq!(card.email.as_deref(), Some("jane@example.com"));
    }

    #[test]
    fn test_wifi() {
        let QrPayload::Wifi(wifi) = classify("WIFI:S:home;T:WPA;P:secret;;") else {
            panic!("expected WiFi");
        };
        assert_eq!(wifi.ssid.as_deref(), Some("home"));
        assert_eq!(wifi.security.as_deref(), Some("WPA"));
        assert_eq!(wifi.password.as_deref(), Some("secret"));
        assert!(!wifi.hidden);
    }

    #[test]
    fn test_wifi_escapes_and_hidden() {
        let QrPayload::Wifi(wifi) = classify(r"WIFI:T:WEP;S:my\;net;P:pa\:ss\\;H:true;;") else {
            panic!("expected WiFi");
        };
        assert_eq!(wifi.ssid.as_deref(), Some("my;net"));
        assert_eq!(wifi.password.as_deref(), Some(r"pa:ss\"));
        assert!(wifi.hidden);
    }

    #[test]
    fn test_url_wins_over_vcard() {
        assert!(matches!(
            classify("https://x.test/?q=BEGIN:VCARD"),
            QrPayload::Url(_)
        ));
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(classify("hello"), QrPayload::Text("hello".into()));
    }
}
