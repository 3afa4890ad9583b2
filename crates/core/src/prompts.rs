//! Fixed instructions and prompt templates sent to the model.

/// Seed instruction and opening message for a chat tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolPrompt {
    pub instruction: &'static str,
    pub greeting: &'static str,
}

pub const PDF_CHAT: ToolPrompt = ToolPrompt {
    instruction: "You are a PDF analysis assistant. Answer questions using only the \
                  attached document. Quote the relevant passage and its page when you can, \
                  and say so plainly when the document does not contain the answer.",
    greeting: "Hi! Ready to help with your PDF.",
};

pub const CSV_CHAT: ToolPrompt = ToolPrompt {
    instruction: "You are a data assistant. The attached CSV file is the user's dataset. \
                  Answer questions about its columns, values and trends, show the \
                  calculations you perform, and keep answers concise.",
    greeting: "Hi! I have loaded your CSV file.",
};

/// Number of slides the structure prompt asks for.
pub const REQUESTED_SLIDES: usize = 5;

/// Truncate `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Build the prompt asking the model for a slide outline of `content`.
///
/// At most `budget` characters of `content` are included.
pub fn slide_structure_prompt(title: &str, content: &str, budget: usize) -> String {
    let content = truncate_chars(content, budget);
    format!(
        r#"
You are an expert presentation designer. Based on the content below, create a PowerPoint structure for the title: '{title}'.
PDF CONTENT:
{content}
Return exactly {REQUESTED_SLIDES} slides in this format:
**Slide 1: [Title Slide]**
* **Title:** "{title}"
* **Subtitle:** "[1-line summary]"
**Slide 2: [Introduction]**
* **Title:** "Intro title"
* **Bullet Points:**
    * Bullet 1
    * Bullet 2
...
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 50), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_prompt_embeds_title_and_budgeted_content() {
        let content = "a".repeat(100);
        let prompt = slide_structure_prompt("Business Report", &content, 10);

        assert!(prompt.contains("title: 'Business Report'"));
        assert!(prompt.contains("* **Title:** \"Business Report\""));
        assert!(prompt.contains(&format!("PDF CONTENT:\n{}\n", "a".repeat(10))));
        assert!(!prompt.contains(&"a".repeat(11)));
        assert!(prompt.contains("Return exactly 5 slides"));
    }

    #[test]
    fn test_greetings() {
        assert_eq!(PDF_CHAT.greeting, "Hi! Ready to help with your PDF.");
        assert_eq!(CSV_CHAT.greeting, "Hi! I have loaded your CSV file.");
    }
}
