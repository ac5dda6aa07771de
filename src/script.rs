//! Normalization of model-generated Manim scripts.
//!
//! The model is instructed to return bare Python, but completions still
//! arrive wrapped in markdown fences or missing the import line. These
//! fixups are enforced here rather than trusted to the model, so the
//! renderer always receives something at least syntactically scaffolded.
//!
//! `normalize` is deterministic and idempotent: running it on an already
//! compliant script returns the text unchanged.

/// Import line every Manim scene script needs
pub const MANIM_IMPORT: &str = "from manim import *";

/// Fallback scene appended when the model produced no class at all
const PLACEHOLDER_SCENE: &str = "\
class AnimationScene(Scene):
    def construct(self):
        pass";

/// Normalize raw model output into a minimally valid Manim script.
///
/// Strips markdown code fences, guarantees the top-level Manim import,
/// and guarantees at least one class definition.
pub fn normalize(raw: &str) -> String {
    let mut code = strip_code_fences(raw).trim().to_string();

    if !code.contains(MANIM_IMPORT) {
        code = format!("{MANIM_IMPORT}\n\n{code}");
    }

    if !code.contains("class ") {
        code = format!("{}\n\n{PLACEHOLDER_SCENE}", code.trim_end());
    }

    code
}

/// Remove markdown code fence markers commonly wrapping generated code
fn strip_code_fences(text: &str) -> String {
    text.replace("```python", "").replace("```", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLIANT: &str = "from manim import *\n\nclass Circle2Square(Scene):\n    def construct(self):\n        self.play(Transform(Circle(), Square()))";

    #[test]
    fn test_compliant_script_unchanged() {
        assert_eq!(normalize(COMPLIANT), COMPLIANT);
    }

    #[test]
    fn test_idempotent() {
        let messy = "```python\nclass Demo(Scene):\n    def construct(self):\n        pass\n```";
        let once = normalize(messy);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_strips_fences() {
        let fenced = format!("```python\n{COMPLIANT}\n```");
        assert_eq!(normalize(&fenced), COMPLIANT);
    }

    #[test]
    fn test_prepends_missing_import() {
        let without_import = "class Demo(Scene):\n    def construct(self):\n        pass";
        let normalized = normalize(without_import);
        assert!(normalized.starts_with(MANIM_IMPORT));
        assert!(normalized.contains("class Demo"));
    }

    #[test]
    fn test_appends_placeholder_scene() {
        let prose_only = "circle = Circle()";
        let normalized = normalize(prose_only);
        assert!(normalized.contains("class AnimationScene(Scene):"));
        assert!(normalized.starts_with(MANIM_IMPORT));
    }

    #[test]
    fn test_empty_input_yields_scaffold() {
        let normalized = normalize("");
        assert!(normalized.starts_with(MANIM_IMPORT));
        assert!(normalized.contains("class AnimationScene(Scene):"));
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let padded = format!("\n\n  {COMPLIANT}\n\n");
        assert_eq!(normalize(&padded), COMPLIANT);
    }
}
