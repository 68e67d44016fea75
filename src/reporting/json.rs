use crate::reporting::model::EnumerationReport;

/// Two-space indented JSON document
pub fn render(report: &EnumerationReport) -> anyhow::Result<String> {
    let json = serde_json::to_string_pretty(report)?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capability::Capability;
    use crate::reporting::model::{EnvType, HostIdentity, ResultSet};
    use pretty_assertions::assert_eq;

    fn parse(raw: &str) -> EnumerationReport {
        serde_json::from_str(raw).unwrap()
    }

    fn sample() -> EnumerationReport {
        let mut report = EnumerationReport::new(HostIdentity {
            hostname: Some("web-1".to_string()),
            env_type: EnvType::Container,
        });
        let cloud: ResultSet = [
            ("all".to_string(), "{\"project\":{\"projectId\":\"p\"}}".to_string()),
            ("token".to_string(), "ya29.secret".to_string()),
        ]
        .into_iter()
        .collect();
        report.results.insert("cloud".to_string(), Some(cloud));
        report.provider = Some("gcp".to_string());
        report
    }

    #[test]
    fn test_wire_shape() {
        let json = render(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["hostname"], "web-1");
        assert_eq!(value["env"], "container");
        assert_eq!(value["ssrf_results"]["cloud"]["token"], "ya29.secret");
        assert!(value["ssrf_results"]["net"].is_null());
        assert!(value["ssrf_results"]["env"].is_null());
    }

    #[test]
    fn test_two_space_indent() {
        let json = render(&sample()).unwrap();
        assert!(json.starts_with("{\n  \"hostname\""));
    }

    #[test]
    fn test_round_trip() {
        let report = sample();
        let parsed = parse(&render(&report).unwrap());

        assert_eq!(parsed, report);
        assert_eq!(
            parsed.category(Capability::Cloud),
            report.category(Capability::Cloud)
        );
    }

    #[test]
    fn test_parse_without_provider() {
        let raw = r#"{"hostname": null, "env": "vm", "ssrf_results": {"cloud": {}, "net": null, "env": null}}"#;
        let parsed = parse(raw);

        assert!(parsed.hostname.is_none());
        assert!(parsed.provider.is_none());
        assert_eq!(parsed.env_type, EnvType::Vm);
        assert_eq!(parsed.category(Capability::Cloud), Some(&ResultSet::new()));
    }
}
