//! SOAP 1.2 request envelopes for the registry service
//!
//! BIR 1.1 rejects requests without WS-Addressing `To`/`Action` headers,
//! and the search parameter block must list every criterion element in
//! schema order with unused ones explicitly nil.

const SERVICE_NS: &str = "http://CIS/BIR/PUBL/2014/07";
const CONTRACT_NS: &str = "http://CIS/BIR/PUBL/2014/07/DataContract";

/// Escapes text for embedding in an XML element.
pub fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Login request carrying the deployment-wide user key.
pub fn login_envelope(service_url: &str, user_key: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope" xmlns:ns="{ns}">"#,
            r#"<soap:Header xmlns:wsa="http://www.w3.org/2005/08/addressing">"#,
            "<wsa:To>{to}</wsa:To>",
            "<wsa:Action>{ns}/IUslugaBIRzewnPubl/Zaloguj</wsa:Action>",
            "</soap:Header>",
            "<soap:Body>",
            "<ns:Zaloguj>",
            "<ns:pKluczUzytkownika>{key}</ns:pKluczUzytkownika>",
            "</ns:Zaloguj>",
            "</soap:Body>",
            "</soap:Envelope>",
        ),
        ns = SERVICE_NS,
        to = xml_escape(service_url),
        key = xml_escape(user_key),
    )
}

/// Search request for entities matching one tax ID.
pub fn search_envelope(service_url: &str, tax_id: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope" xmlns:ns="{ns}" xmlns:q1="{contract}" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            r#"<soap:Header xmlns:wsa="http://www.w3.org/2005/08/addressing">"#,
            "<wsa:To>{to}</wsa:To>",
            "<wsa:Action>{ns}/IUslugaBIRzewnPubl/DaneSzukajPodmioty</wsa:Action>",
            "</soap:Header>",
            "<soap:Body>",
            "<ns:DaneSzukajPodmioty>",
            "<ns:pParametryWyszukiwania>",
            r#"<q1:Krs xsi:nil="true"/>"#,
            r#"<q1:Krsy xsi:nil="true"/>"#,
            "<q1:Nip>{nip}</q1:Nip>",
            r#"<q1:Nipy xsi:nil="true"/>"#,
            r#"<q1:Regon xsi:nil="true"/>"#,
            r#"<q1:Regony14zn xsi:nil="true"/>"#,
            r#"<q1:Regony9zn xsi:nil="true"/>"#,
            "</ns:pParametryWyszukiwania>",
            "</ns:DaneSzukajPodmioty>",
            "</soap:Body>",
            "</soap:Envelope>",
        ),
        ns = SERVICE_NS,
        contract = CONTRACT_NS,
        to = xml_escape(service_url),
        nip = xml_escape(tax_id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_all_special_characters() {
        assert_eq!(xml_escape(r#"a&b<c>d"e'f"#), "a&amp;b&lt;c&gt;d&quot;e&apos;f");
        assert_eq!(xml_escape("plain"), "plain");
    }

    #[test]
    fn login_envelope_escapes_the_user_key() {
        let envelope = login_envelope("https://registry.example/svc", "key<&>");

        assert!(envelope.contains("<wsa:To>https://registry.example/svc</wsa:To>"));
        assert!(envelope
            .contains("<wsa:Action>http://CIS/BIR/PUBL/2014/07/IUslugaBIRzewnPubl/Zaloguj</wsa:Action>"));
        assert!(envelope.contains("<ns:pKluczUzytkownika>key&lt;&amp;&gt;</ns:pKluczUzytkownika>"));
        assert!(!envelope.contains("key<&>"));
    }

    /// Validates the search parameter block ordering.
    ///
    /// Assertions:
    /// - Ensures every criterion element is present, nil ones included
    /// - Confirms the schema order Krs, Krsy, Nip, Nipy, Regon,
    ///   Regony14zn, Regony9zn is preserved
    #[test]
    fn search_envelope_lists_criteria_in_schema_order() {
        let envelope = search_envelope("https://registry.example/svc", "5260305006");

        let positions: Vec<usize> = [
            "<q1:Krs xsi:nil=\"true\"/>",
            "<q1:Krsy xsi:nil=\"true\"/>",
            "<q1:Nip>5260305006</q1:Nip>",
            "<q1:Nipy xsi:nil=\"true\"/>",
            "<q1:Regon xsi:nil=\"true\"/>",
            "<q1:Regony14zn xsi:nil=\"true\"/>",
            "<q1:Regony9zn xsi:nil=\"true\"/>",
        ]
        .iter()
        .map(|needle| envelope.find(needle).expect("criterion element missing"))
        .collect();

        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn search_envelope_escapes_hostile_tax_id() {
        let envelope = search_envelope("https://registry.example/svc", "<injected/>");

        assert!(envelope.contains("<q1:Nip>&lt;injected/&gt;</q1:Nip>"));
        assert!(!envelope.contains("<q1:Nip><injected/>"));
    }
}
