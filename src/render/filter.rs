use std::fmt;

use crate::render::types::{AspectHandling, RenderConfig, TextOverlay};

/// Ordered chain of video filter stages, rendered as a single `-vf` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterGraph {
    stages: Vec<String>,
}

impl FilterGraph {
    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stages.join(","))
    }
}

/// Build the filter graph for `config`.
///
/// Returns `None` for [`AspectHandling::Original`], meaning the segment is
/// stream-copied. Stage order is scale, then crop or pad, then text, so the
/// caption lands on the centre of the final frame.
pub fn compose(config: &RenderConfig) -> Option<FilterGraph> {
    let (width, height) = config.aspect_mode.target_dimensions();
    let mut stages = Vec::with_capacity(3);

    match config.handling {
        AspectHandling::Crop => {
            stages.push(format!(
                "scale={width}:{height}:force_original_aspect_ratio=increase"
            ));
            stages.push(format!("crop={width}:{height}"));
        }
        AspectHandling::Pad => {
            stages.push(format!(
                "scale={width}:{height}:force_original_aspect_ratio=decrease"
            ));
            stages.push(format!(
                "pad={width}:{height}:(ow-iw)/2:(oh-ih)/2:color={}",
                config.background
            ));
        }
        AspectHandling::Stretch => {
            stages.push(format!("scale={width}:{height}"));
        }
        AspectHandling::Original => return None,
    }

    if let Some(overlay) = &config.text {
        stages.push(drawtext_stage(overlay, config));
    }

    Some(FilterGraph { stages })
}

fn drawtext_stage(overlay: &TextOverlay, config: &RenderConfig) -> String {
    let font = overlay
        .font
        .as_ref()
        .map(|path| format!(":fontfile={}", escape_value(&path.display().to_string())))
        .unwrap_or_default();

    format!(
        "drawtext=text={}{}:fontcolor={}:fontsize={}:x=(w-text_w)/2:y=(h-text_h)/2",
        escape_value(&overlay.text),
        font,
        overlay.resolved_color(config.background),
        overlay.size,
    )
}

/// Escape a free-form option value for a `-vf` argument.
///
/// FFmpeg unescapes twice: the option parser splits on `:`, and before that
/// the graph parser splits on `,`, `;` and brackets.
fn escape_value(value: &str) -> String {
    escape_chars(&escape_chars(value, &['\\', '\'', ':']), &['\\', '\'', ',', ';', '[', ']'])
}

fn escape_chars(value: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::types::{AspectMode, BackgroundColor};

    #[test]
    fn test_original_has_no_graph() {
        let config = RenderConfig::new(AspectMode::Portrait)
            .with_handling(AspectHandling::Original)
            .with_text(TextOverlay::new("ignored"));
        assert!(compose(&config).is_none());
    }

    #[test]
    fn test_portrait_pad_black() {
        let graph = compose(&RenderConfig::new(AspectMode::Portrait)).unwrap();

        assert_eq!(graph.len(), 2);
        assert_eq!(
            graph.stages()[0],
            "scale=1080:1920:force_original_aspect_ratio=decrease"
        );
        assert_eq!(graph.stages()[1], "pad=1080:1920:(ow-iw)/2:(oh-ih)/2:color=black");
        assert_eq!(
            graph.to_string(),
            "scale=1080:1920:force_original_aspect_ratio=decrease,pad=1080:1920:(ow-iw)/2:(oh-ih)/2:color=black"
        );
    }

    #[test]
    fn test_text_is_appended_after_pad() {
        let config = RenderConfig::new(AspectMode::Portrait).with_text(TextOverlay::new("Part 1"));
        let graph = compose(&config).unwrap();

        assert_eq!(graph.len(), 3);
        assert!(graph.stages()[1].starts_with("pad="));
        assert_eq!(
            graph.stages()[2],
            "drawtext=text=Part 1:fontcolor=white:fontsize=48:x=(w-text_w)/2:y=(h-text_h)/2"
        );
    }

    #[test]
    fn test_landscape_crop() {
        let config = RenderConfig::new(AspectMode::Landscape).with_handling(AspectHandling::Crop);
        let graph = compose(&config).unwrap();

        assert_eq!(
            graph.stages(),
            &[
                "scale=1920:1080:force_original_aspect_ratio=increase".to_string(),
                "crop=1920:1080".to_string(),
            ]
        );
    }

    #[test]
    fn test_stretch_is_single_stage() {
        let config = RenderConfig::new(AspectMode::Landscape).with_handling(AspectHandling::Stretch);
        let graph = compose(&config).unwrap();
        assert_eq!(graph.to_string(), "scale=1920:1080");
    }

    #[test]
    fn test_white_background_flips_text_color() {
        let config = RenderConfig::new(AspectMode::Portrait)
            .with_background(BackgroundColor::White)
            .with_text(TextOverlay::new("hi").with_size(64));
        let graph = compose(&config).unwrap();

        assert!(graph.stages()[1].ends_with("color=white"));
        assert!(graph.stages()[2].contains("fontcolor=black"));
        assert!(graph.stages()[2].contains("fontsize=64"));
    }

    #[test]
    fn test_custom_font_and_color() {
        let config = RenderConfig::new(AspectMode::Portrait)
            .with_handling(AspectHandling::Crop)
            .with_text(
                TextOverlay::new("hi")
                    .with_color("red")
                    .with_font("/fonts/Inter.ttf"),
            );
        let graph = compose(&config).unwrap();

        assert_eq!(
            graph.stages()[2],
            "drawtext=text=hi:fontfile=/fonts/Inter.ttf:fontcolor=red:fontsize=48:x=(w-text_w)/2:y=(h-text_h)/2"
        );
    }

    fn caption_stage(overlay: TextOverlay) -> String {
        let config = RenderConfig::new(AspectMode::Portrait).with_text(overlay);
        compose(&config).unwrap().stages()[2].clone()
    }

    #[test]
    fn test_quote_in_text_is_escaped_for_both_levels() {
        let stage = caption_stage(TextOverlay::new("it's"));
        assert!(stage.starts_with(r"drawtext=text=it\\\'s:fontcolor=white:"), "{stage}");
    }

    #[test]
    fn test_colon_in_text_does_not_split_options() {
        let stage = caption_stage(TextOverlay::new("Part 1: Intro"));
        assert!(stage.starts_with(r"drawtext=text=Part 1\\: Intro:fontcolor="), "{stage}");
    }

    #[test]
    fn test_comma_in_text_does_not_split_filters() {
        let stage = caption_stage(TextOverlay::new("one, two; [three]"));
        assert!(stage.starts_with(r"drawtext=text=one\, two\; \[three\]:"), "{stage}");
    }

    #[test]
    fn test_windows_font_path_is_escaped() {
        let stage = caption_stage(TextOverlay::new("hi").with_font(r"C:\Windows\Fonts\arial.ttf"));
        assert!(
            stage.contains(r":fontfile=C\\:\\\\Windows\\\\Fonts\\\\arial.ttf:fontcolor="),
            "{stage}"
        );
    }
}
