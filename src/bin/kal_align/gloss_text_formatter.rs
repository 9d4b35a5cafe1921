use da_kal_align::GlossToken;

const RULE_WIDTH: usize = 70;

/// Renders glossed tokens as plain-text blocks separated by rules.
pub fn render(tokens: &[GlossToken]) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    let mut lines = vec![heavy];
    for token in tokens {
        lines.push(String::new());
        lines.push(token.surface().to_string());
        match token {
            GlossToken::Punctuation { .. } => {}
            GlossToken::Unknown { .. } => lines.push("UNKNOWN".to_string()),
            GlossToken::Translated { translation, .. } => {
                lines.push(format!("\"{translation}\""));
            }
            GlossToken::Analyzed {
                morphemes,
                glosses,
                translation,
                analysis_count,
                ..
            } => {
                lines.push(morphemes.clone());
                lines.push(glosses.clone());
                if let Some(translation) = translation {
                    lines.push(format!("\"{translation}\""));
                }
                if *analysis_count > 1 {
                    lines.push(format!("({analysis_count} analyses)"));
                }
            }
        }
        lines.push(light.clone());
    }

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}
