//! Prompt construction for the generation endpoints

/// Build the story-generation instruction (pure function)
///
/// Embeds the page count and, when the trimmed theme is non-blank, a Theme
/// section. The sample answer pins the response shape the script parser
/// expects: a fenced JSON array of page objects.
pub fn build_story_prompt(page_count: u32, theme: &str) -> String {
    let theme = theme.trim();
    let theme_section = if theme.is_empty() {
        String::new()
    } else {
        format!("# Theme\n{theme}\n\n")
    };

    format!(
        r#"# Task
Write a book for children under 5 years old.

{theme_section}# Requirements
- The total number of pages is {page_count}.
- Return the pages as a JSON array inside a fenced ```json block.
- For your response, as in the sample, please return IllustrationIdea in English and PageText in Japanese.

# Characters in the Picture Book
1. Shiki-chan (older brother)
2. Shiro-chan (younger sister)
3. Mama (Shiki-chan and Shiro-chan's mother)

# Sample Answer
```json
[
    {{
        "IllustrationIdea": "A picture of the older brother and younger sister looking at a pill bug in the park",
        "PageText": "ある日、お兄ちゃんと妹は公園に遊びに行ったところ、ダンゴムシを見つけました",
        "page": 1
    }},
    {{
        "IllustrationIdea": "A picture of the pill bug curling up in surprise",
        "PageText": "ダンゴムシは突然丸くなったので、お兄ちゃんと妹はとてもびっくりしました",
        "page": 2
    }}
]
```"#
    )
}

/// Build the per-page illustration prompt (pure function)
pub fn build_image_prompt(style_prefix: &str, illustration_idea: &str) -> String {
    let style_prefix = style_prefix.trim();
    if style_prefix.is_empty() {
        illustration_idea.to_string()
    } else {
        format!("{style_prefix} {illustration_idea}")
    }
}
