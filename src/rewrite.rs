//! Content stream rewriting.
//!
//! Replays one page's tokens through a small state machine and keeps or
//! drops each operator group (an operator plus the operands before it)
//! depending on which color space is active when a path is built.
//!
//! Two requests are supported:
//!
//! - [`RewriteRequest::KeepOnly`] isolates one colorant: only paths painted
//!   with it survive, and text, XObjects and inline images are removed.
//! - [`RewriteRequest::RemoveSet`] strips paths painted with any of the given
//!   colorants and leaves everything else, including text and images, alone.
//!
//! Color space and color value operators are kept outside text objects, so
//! the graphics state seen by surviving content is the same as in the
//! source. Inside a text object dropped by an isolation pass they go with the
//! rest of the text, but the state still follows them.

use crate::catalog::{ColorantEntry, PageView};
use crate::content::{ContentToken, Operator, OperatorCategory, parse_content_stream};
use crate::error::Result;
use crate::object::{Object, ObjectRef};
use crate::writer::serialize_content;

/// What a rewrite pass should do with colorant paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteRequest {
    /// Keep only paint under these entries. All entries share one decoded
    /// colorant name; usually there is exactly one.
    KeepOnly(Vec<ColorantEntry>),
    /// Drop paint under any of these entries.
    RemoveSet(Vec<ColorantEntry>),
}

impl RewriteRequest {
    /// Whether this is an isolation pass.
    pub fn is_keep(&self) -> bool {
        matches!(self, RewriteRequest::KeepOnly(_))
    }

    /// The entries the request refers to.
    pub fn entries(&self) -> &[ColorantEntry] {
        match self {
            RewriteRequest::KeepOnly(entries) | RewriteRequest::RemoveSet(entries) => entries,
        }
    }

    fn targets(&self, source: ObjectRef) -> bool {
        self.entries().iter().any(|e| e.source == source)
    }
}

/// Rewrite state for a single page. Never shared between pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRewriteState {
    /// Resource key of the last color space selected by `cs`/`CS`
    pub active_color_space: Option<String>,
    /// Whether paths built now are to be dropped
    pub needs_deletion: bool,
    /// Between a path start and its painting operator
    pub inside_path: bool,
    /// `BT` nesting depth; only tracked when keeping
    pub text_depth: usize,
}

impl PageRewriteState {
    /// Initial state for `request`.
    ///
    /// An isolation pass starts out deleting: until a targeted color space
    /// is selected, paint falls under the default process color space.
    pub fn new(request: &RewriteRequest) -> Self {
        Self {
            active_color_space: None,
            needs_deletion: request.is_keep(),
            inside_path: false,
            text_depth: 0,
        }
    }

    /// Advance over one operator and decide whether its group is emitted.
    ///
    /// `operands` are the operands collected since the previous operator.
    pub fn step(
        &mut self,
        op: &Operator,
        operands: &[&Object],
        request: &RewriteRequest,
        view: &PageView,
    ) -> bool {
        let keep_mode = request.is_keep();

        match op.category() {
            OperatorCategory::ColorSpace => {
                self.active_color_space = operands
                    .first()
                    .and_then(|o| o.as_name())
                    .map(str::to_string);
                self.needs_deletion = self.deletion_under_active(request, view);
                self.text_depth == 0
            },
            OperatorCategory::ColorValue => {
                self.needs_deletion = self.deletion_under_active(request, view);
                self.text_depth == 0
            },
            OperatorCategory::ProcessColor => {
                self.needs_deletion = keep_mode;
                self.text_depth == 0
            },
            OperatorCategory::BeginText if keep_mode => {
                self.text_depth += 1;
                false
            },
            OperatorCategory::EndText if keep_mode => {
                self.text_depth = self.text_depth.saturating_sub(1);
                false
            },
            OperatorCategory::XObject | OperatorCategory::BeginText | OperatorCategory::EndText => {
                !keep_mode
            },
            _ if self.text_depth > 0 => false,
            OperatorCategory::PathStart => {
                self.inside_path = true;
                !self.needs_deletion
            },
            OperatorCategory::PathPaint => {
                let emit = !(self.needs_deletion && self.inside_path);
                self.inside_path = false;
                emit
            },
            OperatorCategory::Other => !(self.needs_deletion && self.inside_path),
        }
    }

    /// Whether an inline image met in the current state is emitted.
    pub fn keeps_inline_image(&self, request: &RewriteRequest) -> bool {
        !request.is_keep()
    }

    fn deletion_under_active(&self, request: &RewriteRequest, view: &PageView) -> bool {
        let targeted = self
            .active_color_space
            .as_deref()
            .and_then(|key| view.source(key))
            .map_or(false, |source| request.targets(source));

        match request {
            RewriteRequest::KeepOnly(_) => !targeted,
            RewriteRequest::RemoveSet(_) => targeted,
        }
    }
}

/// Rewrite one page's tokens.
///
/// Pure function of its inputs. Operands are held back until their
/// operator is seen and then emitted or dropped together with it; operands
/// left over at the end are emitted as they are.
pub fn rewrite_page(
    tokens: &[ContentToken],
    request: &RewriteRequest,
    view: &PageView,
) -> Vec<ContentToken> {
    let mut state = PageRewriteState::new(request);
    let mut output = Vec::with_capacity(tokens.len());
    let mut pending: Vec<&Object> = Vec::new();

    for tok in tokens {
        match tok {
            ContentToken::Operand(obj) => pending.push(obj),
            ContentToken::Operator(op) => {
                if state.step(op, &pending, request, view) {
                    output.extend(pending.drain(..).cloned().map(ContentToken::Operand));
                    output.push(tok.clone());
                } else {
                    pending.clear();
                }
            },
            ContentToken::InlineImage(_) => {
                if state.keeps_inline_image(request) {
                    output.extend(pending.drain(..).cloned().map(ContentToken::Operand));
                    output.push(tok.clone());
                } else {
                    pending.clear();
                }
            },
        }
    }
    output.extend(pending.into_iter().cloned().map(ContentToken::Operand));

    output
}

/// Tokenize, rewrite and re-serialize one page's content.
///
/// # Errors
///
/// Returns [`Error::ParseError`](crate::error::Error::ParseError) when the
/// content cannot be tokenized; nothing is rewritten in that case.
pub fn rewrite_content(
    content: &[u8],
    request: &RewriteRequest,
    view: &PageView,
) -> Result<Vec<u8>> {
    let tokens = parse_content_stream(content)?;
    let rewritten = rewrite_page(&tokens, request, view);
    log::trace!("Kept {} of {} tokens", rewritten.len(), tokens.len());
    Ok(serialize_content(&rewritten))
}
