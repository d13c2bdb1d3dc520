//! Prompt construction for the planner, generator, and refinement calls.
//!
//! Prompts are assembled line by line so the strict-output sections stay easy
//! to diff against what the model actually receives. User text is always
//! truncated before interpolation.

/// User request text is cut to this many characters before it enters any
/// prompt.
pub const USER_PROMPT_LIMIT: usize = 500;

/// Truncates on a char boundary without splitting a code point.
pub fn truncate_prompt(prompt: &str) -> &str {
    match prompt.char_indices().nth(USER_PROMPT_LIMIT) {
        Some((idx, _)) => &prompt[..idx],
        None => prompt,
    }
}

/// Prompt asking the model to assign a role and template id to each slide.
pub fn planner_prompt(
    slide_count: u32,
    language: &str,
    templates_json: &str,
    user_request: &str,
) -> String {
    [
        format!("Plan exactly {slide_count} slides for a presentation in {language}."),
        String::new(),
        "You will receive:".to_string(),
        "- Templates: objects with {id, isCover, hasTitle, hasSubtitle, hasBody, hasBullets, hasNumber, numberExample}.".to_string(),
        "- UserRequest: short text describing topic, audience, tone, structure hints.".to_string(),
        String::new(),
        "Your job for EACH slide i (0-based):".to_string(),
        "- Choose a role (e.g. \"cover\",\"overview\",\"content\",\"example\",\"summary\",\"cta\",\"toc\",\"divider\").".to_string(),
        "- Choose one templateId from Templates (do NOT invent ids).".to_string(),
        String::new(),
        "Important rules:".to_string(),
        "- First slide MUST use a template where isCover === true.".to_string(),
        "- Use templates that match the role: cover templates for cover, bullets templates for agenda, etc.".to_string(),
        "- Do NOT worry about word counts; word targets are derived from template box sizes.".to_string(),
        format!("- Generate content in {language} language."),
        String::new(),
        "Output (STRICT):".to_string(),
        format!("- Return ONLY a JSON array of length {slide_count}."),
        "- No text before or after.".to_string(),
        "- item i corresponds to slide i.".to_string(),
        "- Each item: {".to_string(),
        "    \"role\": string,".to_string(),
        "    \"templateId\": string".to_string(),
        "  }".to_string(),
        String::new(),
        format!("Templates: {templates_json}"),
        format!("UserRequest: {}", truncate_prompt(user_request)),
    ]
    .join("\n")
}

/// Prompt asking the model to write the final text for each planned slide.
pub fn generator_prompt(
    language: &str,
    plan_json: &str,
    templates_json: &str,
    user_request: &str,
) -> String {
    [
        format!("You write final slide text for a planned deck in {language}."),
        String::new(),
        "You will receive:".to_string(),
        "- SlidePlan: array of {role, templateId, wordTargets}.".to_string(),
        "- Templates: basic info about what each template supports, including hasNumber and numberExample (keep numbers as-is).".to_string(),
        "- UserRequest: topic, audience, tone, language.".to_string(),
        String::new(),
        "For EACH slide i in SlidePlan:".to_string(),
        "- Use the SAME templateId and role as in SlidePlan[i].".to_string(),
        "- Generate text fields that the template supports: title?, subtitle?, body?, bullets?.".to_string(),
        "- Do NOT add extra fields.".to_string(),
        "- If template hasNumber === true, DO NOT change that numeric slot; keep existing numberExample content.".to_string(),
        String::new(),
        "Length rules:".to_string(),
        "- For every field f in wordTargets, target = wordTargets[f].".to_string(),
        "- Words(f) should land between 0.7\u{d7}target and 0.9\u{d7}target; shorter is always safer than longer.".to_string(),
        "- A word = tokens separated by spaces; treat hyphenated words as one.".to_string(),
        "- If template does NOT support a field, omit it even if a target exists.".to_string(),
        String::new(),
        "Content rules:".to_string(),
        format!("- Generate ALL content in {language} language."),
        "- Plain text only. No Markdown, no emojis, no bullet characters (\"-\",\"\u{2022}\",\"*\"), no numbering. (Template number slots stay unchanged).".to_string(),
        "- bullets MUST be an array of strings; each string is one bullet.".to_string(),
        "- Each bullet string should also respect the bullets wordTargets range (words per bullet).".to_string(),
        "- Respect role: cover/overview should be short; content slides can be denser; summary slides are concise.".to_string(),
        "- Follow language/tone from UserRequest consistently.".to_string(),
        String::new(),
        "Output (STRICT):".to_string(),
        "- Return ONLY a JSON array of length SlidePlan.length.".to_string(),
        "- No text before or after.".to_string(),
        "- item i corresponds to slide i.".to_string(),
        "- Each item: {".to_string(),
        "    \"templateId\": string,".to_string(),
        "    \"role\": string,".to_string(),
        "    \"title\"?: string,".to_string(),
        "    \"subtitle\"?: string,".to_string(),
        "    \"bullets\"?: string[],".to_string(),
        "    \"body\"?: string".to_string(),
        "  }".to_string(),
        String::new(),
        format!("SlidePlan: {plan_json}"),
        format!("Templates: {templates_json}"),
        format!("UserRequest: {}", truncate_prompt(user_request)),
    ]
    .join("\n")
}

/// Prompt asking the model to rewrite a handful of overlong fields. Only the
/// offending tuples travel, keeping this call cheap.
pub fn refine_prompt(offenders_json: &str) -> String {
    [
        "You shorten slide text that does not fit its box.".to_string(),
        String::new(),
        "You will receive Offenders: a JSON array of {slideIndex, field, targetChars, currentLength, currentText}.".to_string(),
        String::new(),
        "For EACH offender:".to_string(),
        "- Rewrite currentText so it keeps the meaning but fits within targetChars characters.".to_string(),
        "- refinedText MUST be strictly shorter than currentText.".to_string(),
        "- Keep the same language and tone as currentText.".to_string(),
        "- Plain text only, no Markdown.".to_string(),
        String::new(),
        "Output (STRICT):".to_string(),
        "- Return ONLY a JSON array with one item per offender, same order.".to_string(),
        "- Each item: {\"slideIndex\": number, \"field\": string, \"refinedText\": string}.".to_string(),
        String::new(),
        format!("Offenders: {offenders_json}"),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let long = "é".repeat(600);
        let cut = truncate_prompt(&long);
        assert_eq!(cut.chars().count(), USER_PROMPT_LIMIT);
        assert_eq!(truncate_prompt("short"), "short");
    }

    #[test]
    fn test_planner_prompt_embeds_count_language_and_payloads() {
        let p = planner_prompt(4, "Spanish", "[{\"id\":\"template-0\"}]", "abejas");
        assert!(p.contains("Plan exactly 4 slides"));
        assert!(p.contains("in Spanish"));
        assert!(p.contains("Templates: [{\"id\":\"template-0\"}]"));
        assert!(p.contains("UserRequest: abejas"));
    }

    #[test]
    fn test_generator_prompt_biases_short() {
        let p = generator_prompt("English", "[]", "[]", "bees");
        assert!(p.contains("0.7\u{d7}target and 0.9\u{d7}target"));
        assert!(p.contains("Return ONLY a JSON array"));
    }

    #[test]
    fn test_user_request_is_truncated_in_prompts() {
        let long = "x".repeat(2000);
        let p = planner_prompt(1, "English", "[]", &long);
        let request_line = p.lines().last().unwrap();
        assert_eq!(request_line.len(), "UserRequest: ".len() + USER_PROMPT_LIMIT);
    }
}
