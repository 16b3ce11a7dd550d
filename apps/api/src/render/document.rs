//! Final document assembly: evaluated body + inlined stylesheet + print
//! rules, with body overrides derived from the resume's presentation
//! settings. The result is self-contained — the exporter loads it into the
//! render engine with no external stylesheet fetches beyond fonts.

use crate::models::resume::{FontSize, ResumeSettings, Spacing};

const FONT_LINK: &str = "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&family=Playfair+Display:wght@400;500;600;700&display=swap";

pub fn wrap_document(body: &str, css: &str, settings: &ResumeSettings) -> String {
    let font_size = match settings.font_size {
        FontSize::Small => "12px",
        FontSize::Medium => "14px",
        FontSize::Large => "16px",
    };
    let line_height = match settings.spacing {
        Spacing::Compact => "1.3",
        Spacing::Normal => "1.6",
        Spacing::Spacious => "1.9",
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Resume</title>
  <link href="{FONT_LINK}" rel="stylesheet">
  <style>
    {css}

    body {{
      font-family: '{font_family}', sans-serif;
      font-size: {font_size};
      line-height: {line_height};
    }}

    @media print {{
      body {{ margin: 0; }}
      .no-print {{ display: none !important; }}
    }}

    .page-break {{
      page-break-before: always;
    }}

    .avoid-break {{
      page-break-inside: avoid;
    }}
  </style>
</head>
<body>
{body}
</body>
</html>
"#,
        font_family = settings.font_family,
    )
}
