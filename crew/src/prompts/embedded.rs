//! Templates compiled into the binary
//!
//! A `.pmt` file with the same name in the prompts directory overrides the
//! embedded copy.

/// Name and body of every built-in template
const TEMPLATES: &[(&str, &str)] = &[
    ("agent", include_str!("../../prompts/agent.pmt")),
    ("research", include_str!("../../prompts/research.pmt")),
    ("copywriting", include_str!("../../prompts/copywriting.pmt")),
    ("visual_direction", include_str!("../../prompts/visual_direction.pmt")),
    ("management", include_str!("../../prompts/management.pmt")),
    ("final-answer", include_str!("../../prompts/final-answer.pmt")),
];

pub fn get_embedded(name: &str) -> Option<&'static str> {
    TEMPLATES.iter().find(|(n, _)| *n == name).map(|(_, body)| *body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StageKind;

    #[test]
    fn test_every_stage_has_a_template() {
        for stage in StageKind::ALL {
            assert!(get_embedded(stage.as_str()).is_some(), "missing template for {}", stage);
        }
        assert!(get_embedded("agent").is_some());
        assert!(get_embedded("final-answer").is_some());
        assert!(get_embedded("unknown-template").is_none());
    }

    #[test]
    fn test_templates_reference_all_upstream_outputs() {
        let expected = [
            ("copywriting", &["{{research}}"][..]),
            ("visual_direction", &["{{research}}", "{{copy}}"][..]),
            ("management", &["{{research}}", "{{copy}}", "{{visual}}"][..]),
        ];
        for (name, vars) in expected {
            let body = get_embedded(name).unwrap_or_default();
            for var in vars {
                assert!(body.contains(var), "{} is missing {}", name, var);
            }
        }
    }
}
