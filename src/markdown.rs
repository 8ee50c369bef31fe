//! Markdown rendering with responsive images.
//!
//! Post bodies are CommonMark plus tables, strikethrough, task lists,
//! footnotes and smart punctuation. Image references are rewritten while the
//! event stream is being rendered: `![Alt](photo.jpg)` becomes a `<picture>`
//! pointing at the resized variants the renderer writes next to the page.
//!
//! ```html
//! <picture>
//!   <source srcset="images/photo_large.jpg" media="(min-width: 860px)">
//!   <source srcset="images/photo_medium.jpg" media="(min-width: 480px)">
//!   <img src="images/photo_small.jpg" alt="Alt">
//! </picture>
//! ```
//!
//! The entry with the smallest breakpoint is the `<img>` fallback. The others
//! are listed widest breakpoint first, so the first matching media query wins.
//! Remote URLs and non-image destinations are emitted as a plain `<img>`.

use crate::config::ResponsiveImageSpec;
use crate::content::IMAGES_DIR;
use crate::imaging::{is_supported_image, variant_file_name};
use maud::{Markup, html};
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd};

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_SMART_PUNCTUATION
}

/// Render a post body to HTML.
pub fn render_markdown(text: &str, specs: &[ResponsiveImageSpec]) -> String {
    let parser = Parser::new_ext(text, options());
    let mut out = String::with_capacity(text.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut out, PictureImages::new(parser, specs));
    out
}

/// Local file name of an image destination, or `None` for anything that
/// should not be rewritten.
fn local_image_name(dest: &str) -> Option<&str> {
    if dest.starts_with("//") || dest.contains("://") || dest.starts_with("data:") {
        return None;
    }
    let name = dest.rsplit('/').next().unwrap_or(dest);
    (!name.is_empty() && is_supported_image(name)).then_some(name)
}

/// `<picture>` markup for one local image.
///
/// `specs` must be sorted by ascending breakpoint and non-empty.
pub fn picture_markup(
    image_name: &str,
    alt: &str,
    title: Option<&str>,
    specs: &[&ResponsiveImageSpec],
) -> Markup {
    let Some((fallback, larger)) = specs.split_first() else {
        return plain_img(image_name, alt, title);
    };
    html! {
        picture {
            @for spec in larger.iter().rev() {
                source srcset=(variant_src(image_name, spec)) media=(format!("(min-width: {}px)", spec.breakpoint));
            }
            img src=(variant_src(image_name, fallback)) alt=(alt) title=[title];
        }
    }
}

fn variant_src(image_name: &str, spec: &ResponsiveImageSpec) -> String {
    format!("{}/{}", IMAGES_DIR, variant_file_name(image_name, &spec.label))
}

fn plain_img(src: &str, alt: &str, title: Option<&str>) -> Markup {
    html! { img src=(src) alt=(alt) title=[title]; }
}

/// Event adapter that swaps every image for a single inline HTML event.
struct PictureImages<'s, I> {
    inner: I,
    specs: Vec<&'s ResponsiveImageSpec>,
}

impl<'s, I> PictureImages<'s, I> {
    fn new(inner: I, specs: &'s [ResponsiveImageSpec]) -> Self {
        let mut specs: Vec<_> = specs.iter().collect();
        specs.sort_by_key(|s| s.breakpoint);
        Self { inner, specs }
    }
}

impl<'a, I> PictureImages<'_, I>
where
    I: Iterator<Item = Event<'a>>,
{
    /// Consume events up to the matching image end, keeping the plain text.
    fn collect_alt(&mut self) -> String {
        let mut alt = String::new();
        let mut depth = 0usize;
        for event in self.inner.by_ref() {
            match event {
                Event::End(TagEnd::Image) if depth == 0 => break,
                Event::End(TagEnd::Image) => depth -= 1,
                Event::Start(Tag::Image { .. }) => depth += 1,
                Event::Text(t) | Event::Code(t) => alt.push_str(&t),
                Event::SoftBreak | Event::HardBreak => alt.push(' '),
                _ => {}
            }
        }
        alt
    }
}

impl<'a, I> Iterator for PictureImages<'_, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next()? {
            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => {
                let alt = self.collect_alt();
                let title = (!title.is_empty()).then_some(&*title);
                let markup = match local_image_name(&dest_url) {
                    Some(name) => picture_markup(name, &alt, title, &self.specs),
                    None => plain_img(&dest_url, &alt, title),
                };
                Some(Event::InlineHtml(CowStr::from(markup.into_string())))
            }
            other => Some(other),
        }
    }
}
