use crate::domain::content::ContentCategory;

pub const HOST_SYSTEM_PROMPT: &str = "You are an expert podcast host with deep knowledge across all fields. Your specialty is \
taking complex information and making it fascinating and accessible. You speak naturally, \
like you're having an engaging conversation with a curious friend. No robotic language, \
no filler words, just clear expert insights that keep listeners hooked.";

pub const EDITOR_SYSTEM_PROMPT: &str =
    "You are an expert podcast editor. Create seamless, engaging scripts.";

pub const STRUCTURE_PROMPT: &str = "Structure your podcast script with:\n\
1. A compelling hook that immediately shows why this topic matters\n\
2. The core content broken down into digestible, fascinating insights\n\
3. Real-world implications and why listeners should care\n\
4. A memorable conclusion that ties it all together\n\n\
Write like you're speaking, not reading. Use natural transitions. Make every sentence count.";

pub const COMBINE_PROMPT: &str = "Combine these podcast segments into one cohesive script. \
Ensure smooth transitions and natural flow:\n\n";

pub const SEGMENT_DELIMITER: &str = "\n\n--- SEGMENT BREAK ---\n\n";

pub const SMOKE_TEST_PROMPT: &str = "Say hello";

pub fn content_instruction(category: ContentCategory) -> &'static str {
    match category {
        ContentCategory::Research => {
            "Explain the research methodology, findings, and implications in accessible terms."
        }
        ContentCategory::News => {
            "Present facts, provide context, and analyze broader implications."
        }
        ContentCategory::Tutorial => "Walk through concepts step-by-step with clear explanations.",
        ContentCategory::General => "Extract key insights and explain their significance.",
    }
}

/// Build the user turn: length instruction, content instruction, structure, then the content.
/// `part` is `(index, total)` with a 1-based index for multi-chunk generation.
pub fn script_prompt(
    length_instruction: &str,
    category: ContentCategory,
    content: &str,
    part: Option<(usize, usize)>,
) -> String {
    let prefix = match part {
        Some((index, total)) => format!("Part {} of {}. ", index, total),
        None => String::new(),
    };

    format!(
        "{}{} {}\n\n{}\n\nContent: {}",
        prefix,
        length_instruction,
        content_instruction(category),
        STRUCTURE_PROMPT,
        content
    )
}

/// Prompt for the combination pass over successfully generated segments
pub fn combine_prompt(segments: &[String]) -> String {
    format!("{}{}", COMBINE_PROMPT, segments.join(SEGMENT_DELIMITER))
}
