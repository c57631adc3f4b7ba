//! Cursor style injection.
//!
//! A [`StyleHost`] is wherever rules end up: a live document, an in-memory
//! [`StyleSheet`], or nowhere at all ([`Detached`]). [`CursorStyler`]
//! builds the rules and hands them to its host.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Attribute scoping [`CursorStyler::apply_cursors`] rules to one element
pub const CURSOR_SCOPE_ATTR: &str = "data-cursor-id";

/// Attribute scoping [`CursorStyler::animate_cursor`] rules to one element
pub const ANIMATION_SCOPE_ATTR: &str = "data-cursor-anim-id";

/// Marker attribute on injected cursor styles
pub const CURSOR_STYLE_MARKER: &str = "data-cursors";

/// Marker attribute on injected animation styles
pub const ANIMATION_STYLE_MARKER: &str = "data-cursor-animate";

/// Default length of one animation cycle
pub const DEFAULT_ANIMATION_MS: u64 = 1000;

/// CSS cursor states a mapping can override
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CursorState {
    Default,
    Pointer,
    Wait,
    Text,
    Move,
    Crosshair,
    Grab,
    Grabbing,
    NotAllowed,
    Help,
    Progress,
    Cell,
    Copy,
    Alias,
    NoDrop,
    ColResize,
    RowResize,
    NResize,
    EResize,
    SResize,
    WResize,
    ZoomIn,
    ZoomOut,
}

impl CursorState {
    pub const ALL: [CursorState; 23] = [
        CursorState::Default,
        CursorState::Pointer,
        CursorState::Wait,
        CursorState::Text,
        CursorState::Move,
        CursorState::Crosshair,
        CursorState::Grab,
        CursorState::Grabbing,
        CursorState::NotAllowed,
        CursorState::Help,
        CursorState::Progress,
        CursorState::Cell,
        CursorState::Copy,
        CursorState::Alias,
        CursorState::NoDrop,
        CursorState::ColResize,
        CursorState::RowResize,
        CursorState::NResize,
        CursorState::EResize,
        CursorState::SResize,
        CursorState::WResize,
        CursorState::ZoomIn,
        CursorState::ZoomOut,
    ];

    /// CSS keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            CursorState::Default => "default",
            CursorState::Pointer => "pointer",
            CursorState::Wait => "wait",
            CursorState::Text => "text",
            CursorState::Move => "move",
            CursorState::Crosshair => "crosshair",
            CursorState::Grab => "grab",
            CursorState::Grabbing => "grabbing",
            CursorState::NotAllowed => "not-allowed",
            CursorState::Help => "help",
            CursorState::Progress => "progress",
            CursorState::Cell => "cell",
            CursorState::Copy => "copy",
            CursorState::Alias => "alias",
            CursorState::NoDrop => "no-drop",
            CursorState::ColResize => "col-resize",
            CursorState::RowResize => "row-resize",
            CursorState::NResize => "n-resize",
            CursorState::EResize => "e-resize",
            CursorState::SResize => "s-resize",
            CursorState::WResize => "w-resize",
            CursorState::ZoomIn => "zoom-in",
            CursorState::ZoomOut => "zoom-out",
        }
    }

    /// Keyword the browser falls back to when the image cannot be used
    fn fallback(&self) -> &'static str {
        match self {
            CursorState::Default => "auto",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for CursorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// States to override; unlisted states keep the browser default
pub type CursorMapping = BTreeMap<CursorState, String>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnimateError {
    #[error("animate_cursor requires at least 2 frames, received {received}.")]
    TooFewFrames { received: usize },
}

/// Where injected styles go
pub trait StyleHost {
    /// Element handle used for scoping
    type Element: Clone;

    /// Whether styles can be injected at all
    fn is_attached(&self) -> bool;

    /// Add a style block and return its id
    fn inject_style(&mut self, css: &str, marker: &str) -> u64;

    fn remove_style(&mut self, id: u64);

    fn set_attribute(&mut self, element: &Self::Element, name: &str, value: &str);

    fn remove_attribute(&mut self, element: &Self::Element, name: &str);
}

/// No presentation layer; every operation is a no-op
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl StyleHost for Detached {
    type Element = ();

    fn is_attached(&self) -> bool {
        false
    }

    fn inject_style(&mut self, _css: &str, _marker: &str) -> u64 {
        0
    }

    fn remove_style(&mut self, _id: u64) {}

    fn set_attribute(&mut self, _element: &(), _name: &str, _value: &str) {}

    fn remove_attribute(&mut self, _element: &(), _name: &str) {}
}

/// An injected style block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedStyle {
    pub id: u64,
    pub marker: String,
    pub css: String,
}

/// In-memory document: style blocks plus attributes on named elements
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    next_id: u64,
    styles: Vec<InjectedStyle>,
    attributes: BTreeMap<(String, String), String>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn styles(&self) -> &[InjectedStyle] {
        &self.styles
    }

    pub fn attribute(&self, element: &str, name: &str) -> Option<&str> {
        self.attributes
            .get(&(element.to_string(), name.to_string()))
            .map(String::as_str)
    }

    /// All live style blocks, in injection order
    pub fn render(&self) -> String {
        self.styles
            .iter()
            .map(|style| style.css.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl StyleHost for StyleSheet {
    type Element = String;

    fn is_attached(&self) -> bool {
        true
    }

    fn inject_style(&mut self, css: &str, marker: &str) -> u64 {
        self.next_id += 1;
        self.styles.push(InjectedStyle {
            id: self.next_id,
            marker: marker.to_string(),
            css: css.to_string(),
        });
        self.next_id
    }

    fn remove_style(&mut self, id: u64) {
        self.styles.retain(|style| style.id != id);
    }

    fn set_attribute(&mut self, element: &String, name: &str, value: &str) {
        self.attributes
            .insert((element.clone(), name.to_string()), value.to_string());
    }

    fn remove_attribute(&mut self, element: &String, name: &str) {
        self.attributes.remove(&(element.clone(), name.to_string()));
    }
}

/// Undo token for an injected style.
///
/// An inert handle (from a detached host) reverts nothing.
#[derive(Debug, Clone)]
#[must_use = "dropping the handle leaves the style applied"]
pub struct StyleHandle<E> {
    style: Option<u64>,
    scope: Option<(E, &'static str)>,
}

impl<E> StyleHandle<E> {
    fn inert() -> Self {
        Self {
            style: None,
            scope: None,
        }
    }

    pub fn is_inert(&self) -> bool {
        self.style.is_none()
    }
}

/// Options for [`CursorStyler::animate_cursor`]
#[derive(Debug, Clone)]
pub struct AnimateOptions<E> {
    /// One full cycle; each frame gets an equal slice
    pub duration_ms: u64,
    /// Element to scope to; the whole page when `None`
    pub target: Option<E>,
    /// Cycle count; loops forever when `None`
    pub iterations: Option<u32>,
}

impl<E> Default for AnimateOptions<E> {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_ANIMATION_MS,
            target: None,
            iterations: None,
        }
    }
}

/// Builds cursor rules and injects them into its host
pub struct CursorStyler<H: StyleHost> {
    host: H,
    counter: u64,
}

impl<H: StyleHost> CursorStyler<H> {
    pub fn new(host: H) -> Self {
        Self { host, counter: 0 }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Map cursor states to cursor values, page-wide or on `target`.
    pub fn apply_cursors(
        &mut self,
        mapping: &CursorMapping,
        target: Option<&H::Element>,
    ) -> StyleHandle<H::Element> {
        if !self.host.is_attached() {
            return StyleHandle::inert();
        }

        let scope_id = target.map(|_| self.next_id("cursor"));
        let selector = match &scope_id {
            Some(id) => format!("[{}=\"{}\"]", CURSOR_SCOPE_ATTR, id),
            None => "*".to_string(),
        };

        let css = cursor_rules(&selector, mapping);
        let style = self.host.inject_style(&css, CURSOR_STYLE_MARKER);

        let scope = match (target, scope_id) {
            (Some(element), Some(id)) => {
                self.host.set_attribute(element, CURSOR_SCOPE_ATTR, &id);
                Some((element.clone(), CURSOR_SCOPE_ATTR))
            }
            _ => None,
        };

        StyleHandle {
            style: Some(style),
            scope,
        }
    }

    /// Cycle through `frames` with a step-end keyframe animation.
    ///
    /// Fails with [`AnimateError::TooFewFrames`] for fewer than two frames,
    /// whether or not the host is attached.
    pub fn animate_cursor<S: AsRef<str>>(
        &mut self,
        frames: &[S],
        options: AnimateOptions<H::Element>,
    ) -> Result<StyleHandle<H::Element>, AnimateError> {
        if frames.len() < 2 {
            return Err(AnimateError::TooFewFrames {
                received: frames.len(),
            });
        }

        if !self.host.is_attached() {
            return Ok(StyleHandle::inert());
        }

        let name = self.next_id("cursor-anim");
        let scope_id = format!("{}-scope", name);
        let selector = match options.target {
            Some(_) => format!("[{}=\"{}\"]", ANIMATION_SCOPE_ATTR, scope_id),
            None => "*".to_string(),
        };

        let css = animation_rules(&name, &selector, frames, options.duration_ms, options.iterations);
        let style = self.host.inject_style(&css, ANIMATION_STYLE_MARKER);

        let scope = options.target.map(|element| {
            self.host
                .set_attribute(&element, ANIMATION_SCOPE_ATTR, &scope_id);
            (element, ANIMATION_SCOPE_ATTR)
        });

        Ok(StyleHandle {
            style: Some(style),
            scope,
        })
    }

    /// Remove the style and scoping attribute behind `handle`
    pub fn revert(&mut self, handle: StyleHandle<H::Element>) {
        if let Some(style) = handle.style {
            self.host.remove_style(style);
        }
        if let Some((element, attribute)) = handle.scope {
            self.host.remove_attribute(&element, attribute);
        }
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        let nonce = Uuid::new_v4().simple().to_string();
        format!("{}-{}-{}", prefix, self.counter, &nonce[..8])
    }
}

/// One `cursor` rule per mapped state
pub fn cursor_rules(selector: &str, mapping: &CursorMapping) -> String {
    mapping
        .iter()
        .map(|(state, value)| {
            let value = value.replacen(", auto", &format!(", {}", state.fallback()), 1);
            format!("{} {{ cursor: {}; }}", selector, value)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `@keyframes` block plus the rule running it
pub fn animation_rules<S: AsRef<str>>(
    name: &str,
    selector: &str,
    frames: &[S],
    duration_ms: u64,
    iterations: Option<u32>,
) -> String {
    let steps = frames
        .iter()
        .enumerate()
        .map(|(index, frame)| {
            let percentage = index as f64 / frames.len() as f64 * 100.0;
            format!("  {:.2}% {{ cursor: {}; }}", percentage, frame.as_ref())
        })
        .collect::<Vec<_>>()
        .join("\n");

    let count = iterations.map_or_else(|| "infinite".to_string(), |n| n.to_string());

    [
        format!("@keyframes {} {{", name),
        steps,
        "}".to_string(),
        format!("{} {{", selector),
        format!("  animation: {} {}ms step-end {};", name, duration_ms, count),
        "}".to_string(),
    ]
    .join("\n")
}
